// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Checksummed record framing around a serialized history.
//!
//! # Record Format
//!
//! ```text
//! HistoryRecord (variable length):
//!   magic[4]      = "NSHR" (0x4E, 0x53, 0x48, 0x52)
//!   version[2]    = 0x0001 (little-endian)
//!   mode[1]       = serializer mode tag (0 = full, 1 = latest only)
//!   reserved[1]   = 0x00
//!   length[4]     = payload byte length (little-endian)
//!   payload[len]  = serialized RootNamespaceHistory
//!   checksum[32]  = blake3(header || payload)
//! ```

use ns_codec::{InputStream, OutputStream, Reader, Writer};
use ns_state::{RootNamespaceHistory, SerializerMode};

use crate::StoreError;

/// Record magic bytes: "NSHR" in ASCII.
pub const RECORD_MAGIC: [u8; 4] = *b"NSHR";

/// Record version (v1).
pub const RECORD_VERSION: u16 = 0x0001;

/// Header size in bytes: magic(4) + version(2) + mode(1) + reserved(1) + length(4).
pub const HEADER_SIZE: usize = 12;

/// Checksum size in bytes.
pub const CHECKSUM_SIZE: usize = 32;

fn checksum(header: &[u8], payload: &[u8]) -> [u8; CHECKSUM_SIZE] {
    let mut hasher = blake3::Hasher::new();
    hasher.update(header);
    hasher.update(payload);
    *hasher.finalize().as_bytes()
}

/// Wraps a serialized history payload in a record.
///
/// # Errors
///
/// [`StoreError::PayloadTooLarge`] if the payload length does not fit in `u32`.
pub fn encode_record(mode: SerializerMode, payload: &[u8]) -> Result<Vec<u8>, StoreError> {
    let len = u32::try_from(payload.len()).map_err(|_| StoreError::PayloadTooLarge(payload.len()))?;

    let mut out = Writer::with_capacity(HEADER_SIZE + payload.len() + CHECKSUM_SIZE);
    out.write_array(&RECORD_MAGIC);
    out.write_u16_le(RECORD_VERSION);
    out.write_u8(mode.tag());
    out.write_u8(0); // reserved
    out.write_u32_le(len);
    let sum = checksum(out.as_slice(), payload);
    out.write_bytes(payload);
    out.write_array(&sum);
    Ok(out.into_vec())
}

/// Validates a record and returns its mode and payload.
///
/// # Errors
///
/// [`StoreError::Truncated`], [`StoreError::BadMagic`],
/// [`StoreError::UnsupportedVersion`], [`StoreError::UnknownMode`],
/// [`StoreError::ChecksumMismatch`] or [`StoreError::TrailingBytes`].
pub fn decode_record(bytes: &[u8]) -> Result<(SerializerMode, &[u8]), StoreError> {
    let mut reader = Reader::new(bytes);
    let magic: [u8; 4] = reader.read_array().map_err(|_| StoreError::Truncated)?;
    if magic != RECORD_MAGIC {
        return Err(StoreError::BadMagic);
    }
    let version = reader.read_u16_le().map_err(|_| StoreError::Truncated)?;
    if version != RECORD_VERSION {
        return Err(StoreError::UnsupportedVersion(version));
    }
    let tag = reader.read_u8().map_err(|_| StoreError::Truncated)?;
    let mode = SerializerMode::from_tag(tag).ok_or(StoreError::UnknownMode(tag))?;
    let _reserved = reader.read_u8().map_err(|_| StoreError::Truncated)?;
    let len = reader.read_u32_le().map_err(|_| StoreError::Truncated)? as usize;

    let payload = reader.take(len).map_err(|_| StoreError::Truncated)?;
    let stored: [u8; CHECKSUM_SIZE] = reader.read_array().map_err(|_| StoreError::Truncated)?;
    if !reader.is_exhausted() {
        return Err(StoreError::TrailingBytes(reader.remaining()));
    }
    if checksum(&bytes[..HEADER_SIZE], payload) != stored {
        return Err(StoreError::ChecksumMismatch);
    }
    Ok((mode, payload))
}

/// Serializes `history` with `mode` and frames it.
///
/// # Errors
///
/// Serializer errors (e.g. an empty history) and framing errors.
pub fn write_history(mode: SerializerMode, history: &RootNamespaceHistory) -> Result<Vec<u8>, StoreError> {
    let mut payload = Writer::default();
    mode.save(history, &mut payload)?;
    encode_record(mode, payload.as_slice())
}

/// Validates a record and decodes the history inside it.
///
/// The payload must be consumed exactly.
///
/// # Errors
///
/// Framing errors, serializer errors, and [`StoreError::TrailingBytes`] if
/// the payload holds more than one history.
pub fn read_history(bytes: &[u8]) -> Result<(SerializerMode, RootNamespaceHistory), StoreError> {
    let (mode, payload) = decode_record(bytes)?;
    let mut reader = Reader::new(payload);
    let history = mode.load(&mut reader)?;
    if !reader.is_exhausted() {
        return Err(StoreError::TrailingBytes(reader.remaining()));
    }
    Ok((mode, history))
}
