// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! In-memory history record store.

use std::collections::BTreeMap;
use std::sync::Arc;

use ns_state::NamespaceId;

use crate::{HistoryStore, StoreError};

/// In-memory record store keyed by root id.
///
/// Records are kept as `Arc<[u8]>` so readers hold immutable bytes while the
/// owner keeps writing. Iteration order is ascending root id.
#[derive(Debug, Default, Clone)]
pub struct MemoryTier {
    records: BTreeMap<NamespaceId, Arc<[u8]>>,
    byte_count: usize,
}

impl MemoryTier {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of records currently stored.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns `true` if no records are stored.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Total bytes stored across all records.
    pub fn byte_count(&self) -> usize {
        self.byte_count
    }
}

impl HistoryStore for MemoryTier {
    fn put(&mut self, id: NamespaceId, record: &[u8]) -> Result<(), StoreError> {
        if let Some(old) = self.records.insert(id, Arc::from(record)) {
            self.byte_count -= old.len();
        }
        self.byte_count += record.len();
        Ok(())
    }

    fn get(&self, id: NamespaceId) -> Result<Option<Arc<[u8]>>, StoreError> {
        Ok(self.records.get(&id).cloned())
    }

    fn remove(&mut self, id: NamespaceId) -> Result<bool, StoreError> {
        Ok(match self.records.remove(&id) {
            Some(old) => {
                self.byte_count -= old.len();
                true
            }
            None => false,
        })
    }

    fn ids(&self) -> Result<Vec<NamespaceId>, StoreError> {
        Ok(self.records.keys().copied().collect())
    }
}

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn put_replaces_and_tracks_bytes() {
        let mut store = MemoryTier::new();
        store.put(NamespaceId(2), b"abc").expect("put");
        store.put(NamespaceId(1), b"de").expect("put");
        assert_eq!(store.byte_count(), 5);

        store.put(NamespaceId(2), b"z").expect("replace");
        assert_eq!(store.len(), 2);
        assert_eq!(store.byte_count(), 3);
        assert_eq!(
            store.get(NamespaceId(2)).expect("get").as_deref(),
            Some(&b"z"[..])
        );
        assert_eq!(store.ids().expect("ids"), [NamespaceId(1), NamespaceId(2)]);
    }

    #[test]
    fn readers_keep_old_bytes_after_overwrite() {
        let mut store = MemoryTier::new();
        store.put(NamespaceId(1), b"old").expect("put");
        let held = store.get(NamespaceId(1)).expect("get").expect("present");
        store.put(NamespaceId(1), b"new").expect("replace");
        assert_eq!(&*held, b"old");
    }

    #[test]
    fn remove_missing_is_false() {
        let mut store = MemoryTier::new();
        assert!(!store.remove(NamespaceId(9)).expect("remove"));
        store.put(NamespaceId(9), b"x").expect("put");
        assert!(store.remove(NamespaceId(9)).expect("remove"));
        assert!(store.is_empty());
        assert_eq!(store.byte_count(), 0);
        assert_eq!(store.get(NamespaceId(9)).expect("get"), None);
    }
}
