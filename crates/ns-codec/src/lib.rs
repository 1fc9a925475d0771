// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Typed byte stream primitives (fixed-width LE scalars, fixed-size values).
//!
//! The namespace serializers never own a stream: they borrow an
//! [`OutputStream`] or [`InputStream`] from the caller for the duration of one
//! save or load. [`Writer`] and [`Reader`] are the in-memory implementations.
//!
//! All multi-byte integers are **little-endian**.
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
    clippy::module_name_repetitions,
    clippy::missing_errors_doc
)]

use thiserror::Error;

/// Errors produced by stream readers.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum CodecError {
    /// Attempted to read beyond the end of the buffer.
    #[error("buffer too short: needed {needed} bytes, {remaining} remaining")]
    OutOfBounds {
        /// Bytes requested by the read.
        needed: usize,
        /// Bytes left in the stream.
        remaining: usize,
    },
}

/// Sink for fixed-width values.
///
/// Writes are infallible; implementations buffer or forward bytes as they see
/// fit. Only [`write_bytes`](OutputStream::write_bytes) is required.
pub trait OutputStream {
    /// Write raw bytes.
    fn write_bytes(&mut self, bytes: &[u8]);

    /// Write a single byte.
    fn write_u8(&mut self, value: u8) {
        self.write_bytes(&[value]);
    }

    /// Write a little-endian u16.
    fn write_u16_le(&mut self, value: u16) {
        self.write_bytes(&value.to_le_bytes());
    }

    /// Write a little-endian u32.
    fn write_u32_le(&mut self, value: u32) {
        self.write_bytes(&value.to_le_bytes());
    }

    /// Write a little-endian u64.
    fn write_u64_le(&mut self, value: u64) {
        self.write_bytes(&value.to_le_bytes());
    }

    /// Write a fixed-size opaque value (key, hash, address).
    fn write_array<const N: usize>(&mut self, value: &[u8; N]) {
        self.write_bytes(value);
    }
}

/// Source of fixed-width values.
///
/// Short reads surface as [`CodecError::OutOfBounds`]; nothing is consumed by
/// a failed read.
pub trait InputStream {
    /// Read exactly `buf.len()` bytes into `buf`.
    fn read_exact(&mut self, buf: &mut [u8]) -> Result<(), CodecError>;

    /// Read a single byte.
    fn read_u8(&mut self) -> Result<u8, CodecError> {
        let mut raw = [0u8; 1];
        self.read_exact(&mut raw)?;
        Ok(raw[0])
    }

    /// Read a little-endian u16.
    fn read_u16_le(&mut self) -> Result<u16, CodecError> {
        Ok(u16::from_le_bytes(self.read_array()?))
    }

    /// Read a little-endian u32.
    fn read_u32_le(&mut self) -> Result<u32, CodecError> {
        Ok(u32::from_le_bytes(self.read_array()?))
    }

    /// Read a little-endian u64.
    fn read_u64_le(&mut self) -> Result<u64, CodecError> {
        Ok(u64::from_le_bytes(self.read_array()?))
    }

    /// Read a fixed-size opaque value.
    fn read_array<const N: usize>(&mut self) -> Result<[u8; N], CodecError> {
        let mut raw = [0u8; N];
        self.read_exact(&mut raw)?;
        Ok(raw)
    }
}

/// Growable in-memory output stream.
#[derive(Debug, Default, Clone)]
pub struct Writer {
    buf: Vec<u8>,
}

impl Writer {
    /// Create a new writer with a pre-allocated capacity.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: Vec::with_capacity(capacity),
        }
    }

    /// Bytes written so far.
    pub fn as_slice(&self) -> &[u8] {
        &self.buf
    }

    /// Number of bytes written so far.
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Returns `true` if nothing has been written.
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Consume the writer and return the buffer.
    #[must_use]
    pub fn into_vec(self) -> Vec<u8> {
        self.buf
    }
}

impl OutputStream for Writer {
    fn write_bytes(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }
}

/// Cursor over a borrowed byte slice.
#[derive(Debug, Clone)]
pub struct Reader<'a> {
    bytes: &'a [u8],
    offset: usize,
}

impl<'a> Reader<'a> {
    /// Create a reader over the provided byte slice.
    #[must_use]
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, offset: 0 }
    }

    /// Current read position.
    pub fn position(&self) -> usize {
        self.offset
    }

    /// Bytes left to read.
    pub fn remaining(&self) -> usize {
        self.bytes.len() - self.offset
    }

    /// Returns `true` once every byte has been consumed.
    pub fn is_exhausted(&self) -> bool {
        self.remaining() == 0
    }

    /// Borrow the next `len` bytes and advance past them.
    pub fn take(&mut self, len: usize) -> Result<&'a [u8], CodecError> {
        let out_of_bounds = CodecError::OutOfBounds {
            needed: len,
            remaining: self.remaining(),
        };
        let end = self.offset.checked_add(len).ok_or(out_of_bounds)?;
        if end > self.bytes.len() {
            return Err(out_of_bounds);
        }
        let out = &self.bytes[self.offset..end];
        self.offset = end;
        Ok(out)
    }
}

impl InputStream for Reader<'_> {
    fn read_exact(&mut self, buf: &mut [u8]) -> Result<(), CodecError> {
        let chunk = self.take(buf.len())?;
        buf.copy_from_slice(chunk);
        Ok(())
    }
}
