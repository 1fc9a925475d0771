// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Save/restore of namespace histories over a [`HistoryStore`].

use ns_state::{NamespaceId, RootNamespaceHistory, SerializerMode};
use tracing::{debug, info, instrument};

use crate::frame::{read_history, write_history};
use crate::{HistoryStore, StoreError};

/// Persists histories with a fixed write mode.
///
/// Reads honor the mode recorded in each record, so a store written under one
/// mode remains readable after the configuration switches to the other.
#[derive(Debug)]
pub struct NamespaceStateStore<S> {
    store: S,
    mode: SerializerMode,
}

impl<S> NamespaceStateStore<S> {
    /// Wraps `store`, writing new records with `mode`.
    pub fn new(store: S, mode: SerializerMode) -> Self {
        Self { store, mode }
    }

    /// Write mode.
    pub fn mode(&self) -> SerializerMode {
        self.mode
    }

    /// Borrow the underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Consume the service and return the inner store.
    pub fn into_inner(self) -> S {
        self.store
    }
}

impl<S: HistoryStore> NamespaceStateStore<S> {
    /// Serializes and stores `history`, replacing any previous record for its id.
    ///
    /// Returns the record size in bytes.
    ///
    /// # Errors
    ///
    /// Serializer errors (an empty history is refused) and store errors. The
    /// previous record is untouched on failure.
    #[instrument(skip(self, history), fields(root = history.id().0, depth = history.history_depth()))]
    pub fn persist(&mut self, history: &RootNamespaceHistory) -> Result<usize, StoreError> {
        let record = write_history(self.mode, history)?;
        self.store.put(history.id(), &record)?;
        info!(bytes = record.len(), mode = ?self.mode, "persisted namespace history");
        Ok(record.len())
    }

    /// Loads the history for `id`, or `None` if nothing is stored.
    ///
    /// # Errors
    ///
    /// Store, framing and serializer errors, and [`StoreError::IdMismatch`]
    /// if the record holds a different root.
    #[instrument(skip(self), fields(root = id.0))]
    pub fn restore(&self, id: NamespaceId) -> Result<Option<RootNamespaceHistory>, StoreError> {
        let Some(record) = self.store.get(id)? else {
            debug!("no record stored");
            return Ok(None);
        };
        let (mode, history) = read_history(&record)?;
        if history.id() != id {
            return Err(StoreError::IdMismatch {
                expected: id,
                found: history.id(),
            });
        }
        debug!(?mode, depth = history.history_depth(), "restored namespace history");
        Ok(Some(history))
    }

    /// Loads every stored history in ascending root id order.
    ///
    /// Stops at the first failure.
    ///
    /// # Errors
    ///
    /// See [`restore`](Self::restore).
    pub fn restore_all(&self) -> Result<Vec<RootNamespaceHistory>, StoreError> {
        let mut histories = Vec::new();
        for id in self.store.ids()? {
            if let Some(history) = self.restore(id)? {
                histories.push(history);
            }
        }
        info!(count = histories.len(), "restored namespace histories");
        Ok(histories)
    }

    /// Deletes the record for `id`. Returns `false` if none was stored.
    ///
    /// # Errors
    ///
    /// Store errors.
    #[instrument(skip(self), fields(root = id.0))]
    pub fn evict(&mut self, id: NamespaceId) -> Result<bool, StoreError> {
        let removed = self.store.remove(id)?;
        debug!(removed, "evicted namespace history");
        Ok(removed)
    }
}
