// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Fixed sizes shared by the state model and the wire format.

/// Maximum number of ids in a [`NamespacePath`](crate::NamespacePath), root included.
///
/// The serialized child record stores `MAX_NAMESPACE_DEPTH - 1` id slots, so
/// changing this value changes the on-disk layout.
pub const MAX_NAMESPACE_DEPTH: usize = 3;

/// Size in bytes of an owner public key.
pub const KEY_SIZE: usize = 32;

/// Size in bytes of a raw account address.
pub const ADDRESS_SIZE: usize = 25;
