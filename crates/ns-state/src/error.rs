// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Errors raised by the in-memory namespace model.

use thiserror::Error;

use crate::alias::AliasType;
use crate::ident::{Height, NamespaceId};

/// Invariant violations detected while building or mutating namespace state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NamespaceError {
    /// A path push would exceed the fixed maximum depth.
    #[error("namespace path capacity {capacity} exceeded")]
    CapacityExceeded {
        /// The fixed maximum depth.
        capacity: usize,
    },

    /// A child with the same terminal id is already attached.
    #[error("child namespace {0} already exists")]
    DuplicateChild(NamespaceId),

    /// The path cannot name a child of this root.
    ///
    /// Raised for paths that do not start with the root id, for single-element
    /// paths (which would collide with the root), and for paths containing the
    /// reserved zero id.
    #[error("path is not a valid child of root {root}")]
    InvalidPath {
        /// The root the path was offered to.
        root: NamespaceId,
    },

    /// The id is neither the root nor one of its children.
    #[error("unknown namespace {0}")]
    UnknownNode(NamespaceId),

    /// An alias accessor was called for a different alias kind.
    #[error("alias is {actual:?}, not {expected:?}")]
    WrongAliasKind {
        /// Kind the caller asked for.
        expected: AliasType,
        /// Kind actually held.
        actual: AliasType,
    },

    /// The history has no snapshots.
    #[error("namespace history {0} is empty")]
    EmptyHistory(NamespaceId),

    /// A lifetime did not satisfy `start < end`.
    #[error("invalid lifetime [{start}, {end})")]
    InvalidLifetime {
        /// Lifetime start.
        start: Height,
        /// Lifetime end.
        end: Height,
    },

    /// The child still has descendants and cannot be removed.
    #[error("namespace {0} has descendants")]
    ChildHasDescendants(NamespaceId),
}
