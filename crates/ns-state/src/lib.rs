// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! ns-state: versioned namespace ownership state.
//!
//! A root namespace is owned over a height interval, may carry an alias, and
//! may have children up to [`MAX_NAMESPACE_DEPTH`] levels deep (root
//! included). Every renewal or transfer appends a [`RootNamespace`] snapshot
//! to the root's [`RootNamespaceHistory`].
//!
//! Histories persist through one of two serializers:
//!
//! - [`RootNamespaceHistorySerializer`] writes every snapshot and elides the
//!   children of a snapshot whose owner matches its predecessor's.
//! - [`RootNamespaceHistoryNonHistoricalSerializer`] writes only the current
//!   snapshot.
//!
//! The model is synchronous and unsynchronized: one history is mutated by one
//! owner at a time.
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
    clippy::cast_possible_truncation
)]

mod alias;
mod constants;
mod error;
mod history;
mod ident;
mod lifetime;
/// Mosaic supply and levy state.
pub mod mosaic;
mod path;
mod root;
/// History serializers and their error type.
pub mod serializer;

pub use alias::{AliasType, NamespaceAlias};
pub use constants::{ADDRESS_SIZE, KEY_SIZE, MAX_NAMESPACE_DEPTH};
pub use error::NamespaceError;
pub use history::RootNamespaceHistory;
pub use ident::{Address, Amount, Height, Key, MosaicId, NamespaceId};
pub use lifetime::NamespaceLifetime;
pub use path::NamespacePath;
pub use root::{NamespaceNode, RootNamespace};
pub use serializer::{
    HistorySerializer, RootNamespaceHistoryNonHistoricalSerializer,
    RootNamespaceHistorySerializer, SerializeError, SerializerMode,
};
