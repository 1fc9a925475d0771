// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Durable storage for namespace histories.
//!
//! `ns-store` wraps each serialized [`RootNamespaceHistory`](ns_state::RootNamespaceHistory)
//! in a checksummed record (see [`frame`]) and keeps one record per root id in
//! a [`HistoryStore`]. Two tiers ship: [`MemoryTier`] and the directory-backed
//! [`FsTier`]. [`NamespaceStateStore`] ties a tier to a serializer mode.
//!
//! # Absence Semantics
//!
//! A missing record is `None`, never an error. Error variants are reserved for
//! I/O failures and integrity violations.
#![forbid(unsafe_code)]
#![deny(missing_docs, rust_2018_idioms, unused_must_use)]
#![deny(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    clippy::cargo,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::todo,
    clippy::unimplemented,
    clippy::dbg_macro,
    clippy::print_stdout,
    clippy::print_stderr
)]
#![allow(
    clippy::must_use_candidate,
    clippy::return_self_not_must_use,
    clippy::missing_const_for_fn,
    clippy::module_name_repetitions,
    clippy::missing_errors_doc
)]

/// Store configuration and its file-backed storage.
pub mod config;
pub mod frame;
mod fs;
mod memory;
mod service;

pub use config::{
    ConfigError, ConfigService, ConfigStore, FsConfigStore, StoreConfig, STORE_CONFIG_KEY,
};
pub use fs::{FsTier, RECORD_EXTENSION};
pub use memory::MemoryTier;
pub use service::NamespaceStateStore;

use std::sync::Arc;

use ns_state::{NamespaceId, SerializeError};
use thiserror::Error;

/// Errors from framing, storage and decoding of history records.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Underlying I/O failed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    /// Record does not start with the expected magic.
    #[error("bad record magic")]
    BadMagic,
    /// Record version is not supported.
    #[error("unsupported record version {0}")]
    UnsupportedVersion(u16),
    /// Record carries an unknown serializer mode tag.
    #[error("unknown serializer mode tag {0}")]
    UnknownMode(u8),
    /// Record ends before its declared length.
    #[error("truncated record")]
    Truncated,
    /// Stored checksum does not match the record contents.
    #[error("record checksum mismatch")]
    ChecksumMismatch,
    /// Payload length does not fit the 32-bit length field.
    #[error("payload of {0} bytes is too large for a record")]
    PayloadTooLarge(usize),
    /// Bytes remain after the record or its payload.
    #[error("{0} trailing bytes")]
    TrailingBytes(usize),
    /// Record stored under one root id decodes to another.
    #[error("record for root {expected:?} holds root {found:?}")]
    IdMismatch {
        /// Id the record was stored under.
        expected: NamespaceId,
        /// Id found in the decoded history.
        found: NamespaceId,
    },
    /// Payload failed to serialize or deserialize.
    #[error(transparent)]
    Serialize(#[from] SerializeError),
}

/// Record store keyed by root namespace id.
///
/// Implementations hold opaque framed records; decoding belongs to
/// [`NamespaceStateStore`]. `ids` is sorted ascending.
pub trait HistoryStore {
    /// Stores `record` for `id`, replacing any previous record.
    fn put(&mut self, id: NamespaceId, record: &[u8]) -> Result<(), StoreError>;

    /// Returns the record for `id`, or `None` if not stored.
    fn get(&self, id: NamespaceId) -> Result<Option<Arc<[u8]>>, StoreError>;

    /// Removes the record for `id`. Returns `true` if one was stored.
    fn remove(&mut self, id: NamespaceId) -> Result<bool, StoreError>;

    /// Root ids with a stored record, ascending.
    fn ids(&self) -> Result<Vec<NamespaceId>, StoreError>;
}
