// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! One ownership snapshot of a root namespace and its children.

use std::collections::{BTreeMap, BTreeSet};

use crate::alias::NamespaceAlias;
use crate::error::NamespaceError;
use crate::ident::{Height, Key, NamespaceId};
use crate::lifetime::NamespaceLifetime;
use crate::path::NamespacePath;

/// A path paired with the alias of the node it names.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NamespaceNode {
    /// Full path, root id first.
    pub path: NamespacePath,
    /// Alias of the terminal node.
    pub alias: NamespaceAlias,
}

impl NamespaceNode {
    /// A node with no alias.
    #[must_use]
    pub fn new(path: NamespacePath) -> Self {
        Self {
            path,
            alias: NamespaceAlias::None,
        }
    }

    /// A node with an alias.
    #[must_use]
    pub fn with_alias(path: NamespacePath, alias: NamespaceAlias) -> Self {
        Self { path, alias }
    }

    /// Terminal id; [`NamespaceId::RESERVED`] for an empty path.
    #[must_use]
    pub fn id(&self) -> NamespaceId {
        self.path.last().unwrap_or(NamespaceId::RESERVED)
    }
}

/// Root namespace state as of one owner/lifetime.
///
/// # Invariants
///
/// - Children are keyed by terminal id; no two children share one.
/// - Every child path has length `2..=MAX_NAMESPACE_DEPTH`, starts with
///   [`id`](Self::id) and contains no reserved ids.
/// - [`sorted_child_paths`](Self::sorted_child_paths) depends only on the set
///   of child paths, never on insertion order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RootNamespace {
    id: NamespaceId,
    owner: Key,
    lifetime: NamespaceLifetime,
    alias: NamespaceAlias,
    children: BTreeMap<NamespaceId, NamespaceNode>,
    // Ordered index over `children` paths.
    paths: BTreeSet<NamespacePath>,
}

impl RootNamespace {
    /// A snapshot with no children and no root alias.
    #[must_use]
    pub fn new(id: NamespaceId, owner: Key, lifetime: NamespaceLifetime) -> Self {
        Self {
            id,
            owner,
            lifetime,
            alias: NamespaceAlias::None,
            children: BTreeMap::new(),
            paths: BTreeSet::new(),
        }
    }

    /// Root id.
    #[must_use]
    pub fn id(&self) -> NamespaceId {
        self.id
    }

    /// Owner of this snapshot.
    #[must_use]
    pub fn owner(&self) -> &Key {
        &self.owner
    }

    /// Validity interval of this snapshot.
    #[must_use]
    pub fn lifetime(&self) -> NamespaceLifetime {
        self.lifetime
    }

    /// Returns `true` if the snapshot is active at `height`.
    #[must_use]
    pub fn is_active(&self, height: Height) -> bool {
        self.lifetime.is_active(height)
    }

    /// Number of children (any depth).
    #[must_use]
    pub fn child_count(&self) -> usize {
        self.children.len()
    }

    /// Returns `true` if `id` is the root or one of its children.
    #[must_use]
    pub fn contains(&self, id: NamespaceId) -> bool {
        id == self.id || self.children.contains_key(&id)
    }

    /// The child named by `id`.
    #[must_use]
    pub fn child(&self, id: NamespaceId) -> Option<&NamespaceNode> {
        self.children.get(&id)
    }

    /// Attaches a child.
    ///
    /// # Errors
    ///
    /// - [`NamespaceError::InvalidPath`] if the path does not start with this
    ///   root's id, has length 1 (or 0), contains a reserved id, or repeats
    ///   an id (including the root id) below the root.
    /// - [`NamespaceError::DuplicateChild`] if the terminal id is taken.
    pub fn add(&mut self, node: NamespaceNode) -> Result<(), NamespaceError> {
        let path = node.path;
        let ids = path.as_slice();
        // Below the root every id is non-reserved, distinct and not the root id.
        let valid = ids.len() >= 2
            && ids[0] == self.id
            && ids[1..].iter().enumerate().all(|(i, id)| {
                !id.is_reserved() && *id != self.id && !ids[1..=i].contains(id)
            });
        if !valid {
            return Err(NamespaceError::InvalidPath { root: self.id });
        }

        let id = node.id();
        if self.children.contains_key(&id) {
            return Err(NamespaceError::DuplicateChild(id));
        }

        self.paths.insert(path);
        self.children.insert(id, node);
        Ok(())
    }

    /// Detaches the child `id`.
    ///
    /// # Errors
    ///
    /// - [`NamespaceError::UnknownNode`] if `id` is not a child.
    /// - [`NamespaceError::ChildHasDescendants`] if another child lives below it.
    pub fn remove(&mut self, id: NamespaceId) -> Result<NamespaceNode, NamespaceError> {
        let path = self
            .children
            .get(&id)
            .map(|node| node.path)
            .ok_or(NamespaceError::UnknownNode(id))?;

        // Descendants sort immediately after their ancestor.
        let has_descendants = self
            .paths
            .range(path..)
            .nth(1)
            .is_some_and(|next| path.is_ancestor_of(next));
        if has_descendants {
            return Err(NamespaceError::ChildHasDescendants(id));
        }

        self.paths.remove(&path);
        self.children
            .remove(&id)
            .ok_or(NamespaceError::UnknownNode(id))
    }

    /// Sets the alias of the root or of one of its children.
    ///
    /// # Errors
    ///
    /// [`NamespaceError::UnknownNode`] if `id` is neither.
    pub fn set_alias(&mut self, id: NamespaceId, alias: NamespaceAlias) -> Result<(), NamespaceError> {
        if id == self.id {
            self.alias = alias;
            return Ok(());
        }

        let node = self
            .children
            .get_mut(&id)
            .ok_or(NamespaceError::UnknownNode(id))?;
        node.alias = alias;
        Ok(())
    }

    /// Alias of the root or of one of its children.
    ///
    /// # Errors
    ///
    /// [`NamespaceError::UnknownNode`] if `id` is neither.
    pub fn alias(&self, id: NamespaceId) -> Result<NamespaceAlias, NamespaceError> {
        if id == self.id {
            return Ok(self.alias);
        }

        self.children
            .get(&id)
            .map(|node| node.alias)
            .ok_or(NamespaceError::UnknownNode(id))
    }

    /// Child paths in ascending lexicographic order.
    ///
    /// The iterator is lazy and `Clone`; calling this again restarts it.
    pub fn sorted_child_paths(&self) -> impl Iterator<Item = &NamespacePath> + Clone + '_ {
        self.paths.iter()
    }

    /// Child nodes in the same order as [`sorted_child_paths`](Self::sorted_child_paths).
    pub fn children(&self) -> impl Iterator<Item = &NamespaceNode> + Clone + '_ {
        self.paths
            .iter()
            .filter_map(|path| path.last().and_then(|id| self.children.get(&id)))
    }
}
