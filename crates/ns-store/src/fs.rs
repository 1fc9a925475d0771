// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Directory-backed history record store.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use ns_state::NamespaceId;
use tracing::{debug, warn};

use crate::{HistoryStore, StoreError};

/// File extension of a stored record.
pub const RECORD_EXTENSION: &str = "nsh";

/// One file per root id under a data directory: `{id:016x}.nsh`.
///
/// Writes go to a temporary sibling first and are renamed into place, so a
/// crash mid-write leaves the previous record intact.
#[derive(Debug, Clone)]
pub struct FsTier {
    base: PathBuf,
}

impl FsTier {
    /// Opens (and creates if needed) a store rooted at `base`.
    ///
    /// # Errors
    ///
    /// [`StoreError::Io`] if the directory cannot be created.
    pub fn open(base: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let base = base.into();
        fs::create_dir_all(&base)?;
        Ok(Self { base })
    }

    /// Data directory.
    pub fn base(&self) -> &Path {
        &self.base
    }

    /// Path of the record for `id`.
    pub fn path_for(&self, id: NamespaceId) -> PathBuf {
        self.base.join(format!("{:016x}.{RECORD_EXTENSION}", id.0))
    }
}

fn parse_record_name(path: &Path) -> Option<NamespaceId> {
    if path.extension()? != RECORD_EXTENSION {
        return None;
    }
    let stem = path.file_stem()?.to_str()?;
    if stem.len() != 16 {
        return None;
    }
    u64::from_str_radix(stem, 16).ok().map(NamespaceId)
}

impl HistoryStore for FsTier {
    fn put(&mut self, id: NamespaceId, record: &[u8]) -> Result<(), StoreError> {
        let path = self.path_for(id);
        let tmp = path.with_extension(format!("{RECORD_EXTENSION}.tmp"));
        fs::write(&tmp, record)?;
        fs::rename(&tmp, &path)?;
        debug!(path = %path.display(), bytes = record.len(), "wrote history record");
        Ok(())
    }

    fn get(&self, id: NamespaceId) -> Result<Option<Arc<[u8]>>, StoreError> {
        match fs::read(self.path_for(id)) {
            Ok(bytes) => Ok(Some(Arc::from(bytes))),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(StoreError::Io(err)),
        }
    }

    fn remove(&mut self, id: NamespaceId) -> Result<bool, StoreError> {
        match fs::remove_file(self.path_for(id)) {
            Ok(()) => Ok(true),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(false),
            Err(err) => Err(StoreError::Io(err)),
        }
    }

    fn ids(&self) -> Result<Vec<NamespaceId>, StoreError> {
        let mut ids = Vec::new();
        for entry in fs::read_dir(&self.base)? {
            let path = entry?.path();
            match parse_record_name(&path) {
                Some(id) => ids.push(id),
                None => warn!(path = %path.display(), "ignoring foreign file in data directory"),
            }
        }
        ids.sort_unstable();
        Ok(ids)
    }
}
