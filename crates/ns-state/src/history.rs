// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Append-only ownership history of one root namespace.

use tracing::debug;

use crate::error::NamespaceError;
use crate::ident::{Height, Key, NamespaceId};
use crate::lifetime::NamespaceLifetime;
use crate::root::RootNamespace;

/// Chronological snapshots of one root namespace.
///
/// The last snapshot is the current state. Every snapshot carries the history
/// id. Renewals and transfers append a fresh snapshot via
/// [`push`](Self::push); children are not carried over, so callers that want
/// them to survive a renewal must re-attach them.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RootNamespaceHistory {
    id: NamespaceId,
    roots: Vec<RootNamespace>,
}

impl RootNamespaceHistory {
    /// An empty history for root `id`.
    #[must_use]
    pub fn new(id: NamespaceId) -> Self {
        Self {
            id,
            roots: Vec::new(),
        }
    }

    /// Root id shared by every snapshot.
    #[must_use]
    pub fn id(&self) -> NamespaceId {
        self.id
    }

    /// Number of snapshots.
    #[must_use]
    pub fn history_depth(&self) -> usize {
        self.roots.len()
    }

    /// Returns `true` if there are no snapshots.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// Appends an empty snapshot and makes it current.
    pub fn push(&mut self, owner: Key, lifetime: NamespaceLifetime) -> &mut RootNamespace {
        let index = self.roots.len();
        self.roots.push(RootNamespace::new(self.id, owner, lifetime));
        &mut self.roots[index]
    }

    /// Removes the current snapshot (rollback).
    ///
    /// # Errors
    ///
    /// [`NamespaceError::EmptyHistory`] if there is nothing to remove.
    pub fn pop_back(&mut self) -> Result<RootNamespace, NamespaceError> {
        self.roots
            .pop()
            .ok_or(NamespaceError::EmptyHistory(self.id))
    }

    /// The current snapshot.
    ///
    /// # Errors
    ///
    /// [`NamespaceError::EmptyHistory`] if there are no snapshots.
    pub fn back(&self) -> Result<&RootNamespace, NamespaceError> {
        self.roots.last().ok_or(NamespaceError::EmptyHistory(self.id))
    }

    /// The current snapshot, mutably.
    ///
    /// # Errors
    ///
    /// [`NamespaceError::EmptyHistory`] if there are no snapshots.
    pub fn back_mut(&mut self) -> Result<&mut RootNamespace, NamespaceError> {
        self.roots
            .last_mut()
            .ok_or(NamespaceError::EmptyHistory(self.id))
    }

    /// Snapshots, oldest first.
    pub fn iter(&self) -> core::slice::Iter<'_, RootNamespace> {
        self.roots.iter()
    }

    /// Returns `true` if the current snapshot is active at `height`.
    #[must_use]
    pub fn is_active(&self, height: Height) -> bool {
        self.roots.last().is_some_and(|root| root.is_active(height))
    }

    /// Owner of the current snapshot, if it is active at `height`.
    #[must_use]
    pub fn active_owner(&self, height: Height) -> Option<&Key> {
        self.roots
            .last()
            .filter(|root| root.is_active(height))
            .map(RootNamespace::owner)
    }

    /// Total children across all snapshots.
    #[must_use]
    pub fn num_all_children(&self) -> usize {
        self.roots.iter().map(RootNamespace::child_count).sum()
    }

    /// Drops snapshots whose lifetime ended at or before `height`.
    ///
    /// The current snapshot is always kept. Returns the number of snapshots
    /// removed.
    pub fn prune(&mut self, height: Height) -> usize {
        let Some(keep_from) = self.roots.len().checked_sub(1) else {
            return 0;
        };
        let expired = self.roots[..keep_from]
            .iter()
            .take_while(|root| root.lifetime().end() <= height)
            .count();
        self.roots.drain(..expired);
        if expired > 0 {
            debug!(root = self.id.0, expired, %height, "pruned expired snapshots");
        }
        expired
    }
}

impl<'a> IntoIterator for &'a RootNamespaceHistory {
    type Item = &'a RootNamespace;
    type IntoIter = core::slice::Iter<'a, RootNamespace>;

    fn into_iter(self) -> Self::IntoIter {
        self.roots.iter()
    }
}
