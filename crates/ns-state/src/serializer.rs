// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Binary serializers for [`RootNamespaceHistory`].
//!
//! # Stream Format
//!
//! ```text
//! full history:  depth:u64 || root_id:u64 || snapshot * depth   (oldest first)
//! latest only:   root_id:u64 || snapshot                        (current only)
//!
//! snapshot:      owner[32] || start:u64 || end:u64 || alias
//!                || child_count:u64 || child * child_count
//! alias:         tag:u8 || payload   (0 = none, 1 = mosaic id:u64, 2 = address[25])
//! child:         id:u64 * (MAX_NAMESPACE_DEPTH - 1) || alias
//! ```
//!
//! All multi-byte integers are **little-endian**.
//!
//! A child record never repeats the root id and pads its path with
//! [`NamespaceId::RESERVED`] so every record has the same size.
//!
//! # Owner Sharing
//!
//! In full-history mode a snapshot whose owner equals the previous snapshot's
//! owner is written with `child_count = 0`. Loading such a snapshot yields no
//! children; re-deriving them from the predecessor is the caller's job.

use ns_codec::{CodecError, InputStream, OutputStream};
use thiserror::Error;
use tracing::{debug, trace};

use crate::alias::{AliasType, NamespaceAlias};
use crate::constants::MAX_NAMESPACE_DEPTH;
use crate::error::NamespaceError;
use crate::history::RootNamespaceHistory;
use crate::ident::{Address, Height, Key, MosaicId, NamespaceId};
use crate::lifetime::NamespaceLifetime;
use crate::path::NamespacePath;
use crate::root::{NamespaceNode, RootNamespace};

/// Errors raised while saving or loading a history.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SerializeError {
    /// Refused to persist a history with no snapshots.
    #[error("cannot save empty namespace history {0}")]
    EmptyHistoryOnSave(NamespaceId),

    /// The stream declared a history depth of zero.
    #[error("namespace history in storage is empty")]
    EmptyHistoryOnLoad,

    /// The stream ended early.
    #[error("truncated namespace history stream: {0}")]
    TruncatedStream(CodecError),

    /// An alias tag outside `{0, 1, 2}`.
    #[error("unknown alias kind {0}")]
    UnknownAliasKind(u8),

    /// Decoded values violate a model invariant.
    #[error("corrupt namespace history: {0}")]
    CorruptState(NamespaceError),
}

impl From<CodecError> for SerializeError {
    fn from(err: CodecError) -> Self {
        Self::TruncatedStream(err)
    }
}

/// Which serializer a persisted history was (or should be) written with.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum SerializerMode {
    /// Every snapshot, with owner-sharing compaction.
    #[default]
    Full,
    /// Current snapshot only.
    LatestOnly,
}

impl SerializerMode {
    /// Wire tag used by containers that record the mode.
    #[must_use]
    pub const fn tag(self) -> u8 {
        match self {
            Self::Full => 0,
            Self::LatestOnly => 1,
        }
    }

    /// Inverse of [`tag`](Self::tag).
    #[must_use]
    pub const fn from_tag(tag: u8) -> Option<Self> {
        match tag {
            0 => Some(Self::Full),
            1 => Some(Self::LatestOnly),
            _ => None,
        }
    }

    /// Saves `history` with the serializer this mode names.
    ///
    /// # Errors
    ///
    /// See [`HistorySerializer::save`].
    pub fn save<O: OutputStream>(
        self,
        history: &RootNamespaceHistory,
        output: &mut O,
    ) -> Result<(), SerializeError> {
        match self {
            Self::Full => RootNamespaceHistorySerializer::save(history, output),
            Self::LatestOnly => RootNamespaceHistoryNonHistoricalSerializer::save(history, output),
        }
    }

    /// Loads a history with the serializer this mode names.
    ///
    /// # Errors
    ///
    /// See [`HistorySerializer::load`].
    pub fn load<I: InputStream>(self, input: &mut I) -> Result<RootNamespaceHistory, SerializeError> {
        match self {
            Self::Full => RootNamespaceHistorySerializer::load(input),
            Self::LatestOnly => RootNamespaceHistoryNonHistoricalSerializer::load(input),
        }
    }
}

/// Save/load pair over borrowed streams.
///
/// Implementations never take ownership of the stream and never publish a
/// partially decoded history: `load` returns either a complete history or an
/// error.
pub trait HistorySerializer {
    /// Writes `history` to `output`.
    ///
    /// # Errors
    ///
    /// [`SerializeError::EmptyHistoryOnSave`] if the history has no snapshots.
    fn save<O: OutputStream>(
        history: &RootNamespaceHistory,
        output: &mut O,
    ) -> Result<(), SerializeError>;

    /// Reads one history from `input`.
    ///
    /// # Errors
    ///
    /// - [`SerializeError::TruncatedStream`] on a short read.
    /// - [`SerializeError::UnknownAliasKind`] on a bad alias tag.
    /// - [`SerializeError::EmptyHistoryOnLoad`] if a full-history header
    ///   declares zero snapshots.
    /// - [`SerializeError::CorruptState`] if decoded values break a model
    ///   invariant.
    fn load<I: InputStream>(input: &mut I) -> Result<RootNamespaceHistory, SerializeError>;
}

/// Serializer for the full history.
#[derive(Clone, Copy, Debug, Default)]
pub struct RootNamespaceHistorySerializer;

/// Serializer for the current snapshot only.
#[derive(Clone, Copy, Debug, Default)]
pub struct RootNamespaceHistoryNonHistoricalSerializer;

impl HistorySerializer for RootNamespaceHistorySerializer {
    fn save<O: OutputStream>(
        history: &RootNamespaceHistory,
        output: &mut O,
    ) -> Result<(), SerializeError> {
        save_header(output, history, HeaderMode::IncludeHistoryDepth)?;

        let mut last_owner: Option<&Key> = None;
        for root in history {
            save_root(output, root, last_owner)?;
            last_owner = Some(root.owner());
        }
        Ok(())
    }

    fn load<I: InputStream>(input: &mut I) -> Result<RootNamespaceHistory, SerializeError> {
        let header = read_header(input, HeaderMode::IncludeHistoryDepth)?;
        let mut history = RootNamespaceHistory::new(header.id);
        for _ in 0..header.history_depth {
            load_root(input, &mut history)?;
        }
        Ok(history)
    }
}

impl HistorySerializer for RootNamespaceHistoryNonHistoricalSerializer {
    fn save<O: OutputStream>(
        history: &RootNamespaceHistory,
        output: &mut O,
    ) -> Result<(), SerializeError> {
        save_header(output, history, HeaderMode::ExcludeHistoryDepth)?;
        let current = history.back().map_err(SerializeError::CorruptState)?;
        save_root(output, current, None)
    }

    fn load<I: InputStream>(input: &mut I) -> Result<RootNamespaceHistory, SerializeError> {
        let header = read_header(input, HeaderMode::ExcludeHistoryDepth)?;
        let mut history = RootNamespaceHistory::new(header.id);
        load_root(input, &mut history)?;
        Ok(history)
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum HeaderMode {
    IncludeHistoryDepth,
    ExcludeHistoryDepth,
}

struct Header {
    history_depth: u64,
    id: NamespaceId,
}

fn save_header<O: OutputStream>(
    output: &mut O,
    history: &RootNamespaceHistory,
    mode: HeaderMode,
) -> Result<(), SerializeError> {
    if history.is_empty() {
        return Err(SerializeError::EmptyHistoryOnSave(history.id()));
    }

    if mode == HeaderMode::IncludeHistoryDepth {
        output.write_u64_le(history.history_depth() as u64);
    }
    output.write_u64_le(history.id().0);
    debug!(
        root = history.id().0,
        depth = history.history_depth(),
        ?mode,
        "saving namespace history"
    );
    Ok(())
}

fn read_header<I: InputStream>(input: &mut I, mode: HeaderMode) -> Result<Header, SerializeError> {
    // Latest-only streams carry exactly one snapshot.
    let history_depth = match mode {
        HeaderMode::IncludeHistoryDepth => input.read_u64_le()?,
        HeaderMode::ExcludeHistoryDepth => 1,
    };
    if history_depth == 0 {
        return Err(SerializeError::EmptyHistoryOnLoad);
    }

    let id = NamespaceId(input.read_u64_le()?);
    debug!(root = id.0, depth = history_depth, ?mode, "loading namespace history");
    Ok(Header { history_depth, id })
}

fn save_alias<O: OutputStream>(output: &mut O, alias: &NamespaceAlias) {
    output.write_u8(alias.kind() as u8);
    match alias {
        NamespaceAlias::None => {}
        NamespaceAlias::Mosaic(id) => output.write_u64_le(id.0),
        NamespaceAlias::Address(address) => output.write_array(address.as_bytes()),
    }
}

fn save_children<O: OutputStream>(output: &mut O, root: &RootNamespace) -> Result<(), SerializeError> {
    output.write_u64_le(root.child_count() as u64);
    for path in root.sorted_child_paths() {
        // The root id is implied by the header.
        let ids = path.as_slice();
        for id in &ids[1..] {
            output.write_u64_le(id.0);
        }
        for _ in ids.len()..MAX_NAMESPACE_DEPTH {
            output.write_u64_le(NamespaceId::RESERVED.0);
        }

        let id = path.last().unwrap_or(NamespaceId::RESERVED);
        let alias = root.alias(id).map_err(SerializeError::CorruptState)?;
        save_alias(output, &alias);
    }
    Ok(())
}

fn save_root<O: OutputStream>(
    output: &mut O,
    root: &RootNamespace,
    last_owner: Option<&Key>,
) -> Result<(), SerializeError> {
    output.write_array(root.owner().as_bytes());
    output.write_u64_le(root.lifetime().start().0);
    output.write_u64_le(root.lifetime().end().0);
    let alias = root.alias(root.id()).map_err(SerializeError::CorruptState)?;
    save_alias(output, &alias);

    if last_owner == Some(root.owner()) {
        trace!(
            root = root.id().0,
            skipped = root.child_count(),
            "owner unchanged, eliding children"
        );
        output.write_u64_le(0);
        Ok(())
    } else {
        save_children(output, root)
    }
}

fn load_path<I: InputStream>(input: &mut I, root_id: NamespaceId) -> Result<NamespacePath, SerializeError> {
    let mut path = NamespacePath::root(root_id);
    for _ in 1..MAX_NAMESPACE_DEPTH {
        let id = NamespaceId(input.read_u64_le()?);
        if id.is_reserved() {
            continue;
        }
        path.push(id).map_err(SerializeError::CorruptState)?;
    }
    Ok(path)
}

fn load_alias<I: InputStream>(input: &mut I) -> Result<NamespaceAlias, SerializeError> {
    let tag = input.read_u8()?;
    let kind = AliasType::try_from(tag).map_err(SerializeError::UnknownAliasKind)?;
    Ok(match kind {
        AliasType::None => NamespaceAlias::None,
        AliasType::Mosaic => NamespaceAlias::Mosaic(MosaicId(input.read_u64_le()?)),
        AliasType::Address => NamespaceAlias::Address(Address(input.read_array()?)),
    })
}

fn load_root<I: InputStream>(
    input: &mut I,
    history: &mut RootNamespaceHistory,
) -> Result<(), SerializeError> {
    let owner = Key(input.read_array()?);
    let start = Height(input.read_u64_le()?);
    let end = Height(input.read_u64_le()?);
    let lifetime = NamespaceLifetime::new(start, end).map_err(SerializeError::CorruptState)?;
    let alias = load_alias(input)?;
    let num_children = input.read_u64_le()?;

    // Children are staged before the snapshot is appended; the count comes
    // from the stream and is not trusted as a capacity hint.
    let mut children = Vec::new();
    for _ in 0..num_children {
        let path = load_path(input, history.id())?;
        let alias = load_alias(input)?;
        children.push(NamespaceNode::with_alias(path, alias));
    }

    let root = history.push(owner, lifetime);
    root.set_alias(root.id(), alias)
        .map_err(SerializeError::CorruptState)?;
    for child in children {
        root.add(child).map_err(SerializeError::CorruptState)?;
    }
    Ok(())
}
