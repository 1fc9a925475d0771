// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Fixed-capacity namespace paths.

use core::cmp::Ordering;
use core::fmt;

use crate::constants::MAX_NAMESPACE_DEPTH;
use crate::error::NamespaceError;
use crate::ident::NamespaceId;

/// Position of a node in a namespace hierarchy: root id first, descendants after.
///
/// Stored inline as `[NamespaceId; MAX_NAMESPACE_DEPTH]` plus a length. Slots
/// past `len` are always [`NamespaceId::RESERVED`], and equality, ordering and
/// hashing only look at the first `len` ids, so ordering is lexicographic with
/// a shorter prefix sorting first.
///
/// With the `serde` feature a path serializes as its id sequence, and
/// deserializing goes through [`try_from_ids`](Self::try_from_ids).
#[derive(Clone, Copy, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(into = "Vec<NamespaceId>", try_from = "Vec<NamespaceId>")
)]
pub struct NamespacePath {
    ids: [NamespaceId; MAX_NAMESPACE_DEPTH],
    len: usize,
}

impl NamespacePath {
    /// An empty path.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            ids: [NamespaceId::RESERVED; MAX_NAMESPACE_DEPTH],
            len: 0,
        }
    }

    /// A single-element path naming a root.
    #[must_use]
    pub const fn root(id: NamespaceId) -> Self {
        let mut path = Self::new();
        path.ids[0] = id;
        path.len = 1;
        path
    }

    /// Builds a path from a slice of ids.
    ///
    /// # Errors
    ///
    /// [`NamespaceError::CapacityExceeded`] if `ids` is longer than
    /// [`MAX_NAMESPACE_DEPTH`].
    pub fn try_from_ids(ids: &[NamespaceId]) -> Result<Self, NamespaceError> {
        let mut path = Self::new();
        for id in ids {
            path.push(*id)?;
        }
        Ok(path)
    }

    /// Appends `id`.
    ///
    /// # Errors
    ///
    /// [`NamespaceError::CapacityExceeded`] if the path is already full; the
    /// path is left unchanged.
    pub fn push(&mut self, id: NamespaceId) -> Result<(), NamespaceError> {
        if self.len == MAX_NAMESPACE_DEPTH {
            return Err(NamespaceError::CapacityExceeded {
                capacity: MAX_NAMESPACE_DEPTH,
            });
        }
        self.ids[self.len] = id;
        self.len += 1;
        Ok(())
    }

    /// Maximum number of ids this path can hold.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        MAX_NAMESPACE_DEPTH
    }

    /// Number of ids in the path.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the path holds no ids.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The stored ids.
    #[must_use]
    pub fn as_slice(&self) -> &[NamespaceId] {
        &self.ids[..self.len]
    }

    /// The id at `index`, if present.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<NamespaceId> {
        self.as_slice().get(index).copied()
    }

    /// The root id (element 0).
    #[must_use]
    pub fn root_id(&self) -> Option<NamespaceId> {
        self.get(0)
    }

    /// The terminal id, which identifies the node this path names.
    #[must_use]
    pub fn last(&self) -> Option<NamespaceId> {
        self.as_slice().last().copied()
    }

    /// The path without its terminal id, or `None` for root and empty paths.
    #[must_use]
    pub fn parent(&self) -> Option<Self> {
        if self.len < 2 {
            return None;
        }
        let mut parent = *self;
        parent.len -= 1;
        parent.ids[parent.len] = NamespaceId::RESERVED;
        Some(parent)
    }

    /// Returns `true` if `self` is a strict prefix of `other`.
    #[must_use]
    pub fn is_ancestor_of(&self, other: &Self) -> bool {
        self.len < other.len && other.as_slice().starts_with(self.as_slice())
    }
}

impl Default for NamespacePath {
    fn default() -> Self {
        Self::new()
    }
}

impl From<NamespacePath> for Vec<NamespaceId> {
    fn from(path: NamespacePath) -> Self {
        path.as_slice().to_vec()
    }
}

impl TryFrom<Vec<NamespaceId>> for NamespacePath {
    type Error = NamespaceError;

    fn try_from(ids: Vec<NamespaceId>) -> Result<Self, Self::Error> {
        Self::try_from_ids(&ids)
    }
}

impl PartialEq for NamespacePath {
    fn eq(&self, other: &Self) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl Eq for NamespacePath {}

impl PartialOrd for NamespacePath {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for NamespacePath {
    fn cmp(&self, other: &Self) -> Ordering {
        self.as_slice().cmp(other.as_slice())
    }
}

impl core::hash::Hash for NamespacePath {
    fn hash<H: core::hash::Hasher>(&self, state: &mut H) {
        self.as_slice().hash(state);
    }
}

impl fmt::Display for NamespacePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, id) in self.as_slice().iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            write!(f, "{id}")?;
        }
        Ok(())
    }
}
