// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
#![allow(dead_code)]

use ns_codec::{Reader, Writer};
use ns_state::{
    HistorySerializer, Height, Key, NamespaceId, NamespaceLifetime, NamespaceNode, NamespacePath,
    RootNamespaceHistory, SerializeError,
};

pub const ROOT: NamespaceId = NamespaceId(100);
pub const OWNER_A: Key = Key([0xA1; 32]);
pub const OWNER_B: Key = Key([0xB2; 32]);

/// Byte offset of the first snapshot in a full-history stream.
pub const FULL_HEADER_LEN: usize = 16;
/// owner + start + end.
pub const SNAPSHOT_PREFIX_LEN: usize = 32 + 8 + 8;

pub fn lifetime(start: u64, end: u64) -> NamespaceLifetime {
    NamespaceLifetime::new(Height(start), Height(end)).expect("lifetime")
}

pub fn path(raw: &[u64]) -> NamespacePath {
    let ids: Vec<_> = raw.iter().copied().map(NamespaceId).collect();
    NamespacePath::try_from_ids(&ids).expect("path")
}

pub fn node(raw: &[u64]) -> NamespaceNode {
    NamespaceNode::new(path(raw))
}

pub fn save<S: HistorySerializer>(history: &RootNamespaceHistory) -> Vec<u8> {
    let mut w = Writer::default();
    S::save(history, &mut w).expect("save");
    w.into_vec()
}

pub fn load<S: HistorySerializer>(bytes: &[u8]) -> Result<RootNamespaceHistory, SerializeError> {
    S::load(&mut Reader::new(bytes))
}

pub fn u64_at(bytes: &[u8], offset: usize) -> u64 {
    let raw: [u8; 8] = bytes[offset..offset + 8].try_into().expect("8 bytes");
    u64::from_le_bytes(raw)
}

/// One snapshot, owner A, lifetime [10, 100), child 100.200 aliased to mosaic 7.
pub fn literal_history() -> RootNamespaceHistory {
    let mut history = RootNamespaceHistory::new(ROOT);
    let root = history.push(OWNER_A, lifetime(10, 100));
    root.add(node(&[100, 200])).expect("child");
    root.set_alias(NamespaceId(200), ns_state::MosaicId(7).into())
        .expect("alias");
    history
}

/// Two snapshots: owner A [10, 50) with child 100.200, then `second_owner`
/// [50, 100) with whatever `second_children` holds.
pub fn two_snapshot_history(second_owner: Key, second_children: &[&[u64]]) -> RootNamespaceHistory {
    let mut history = RootNamespaceHistory::new(ROOT);
    history
        .push(OWNER_A, lifetime(10, 50))
        .add(node(&[100, 200]))
        .expect("first child");
    let second = history.push(second_owner, lifetime(50, 100));
    for raw in second_children {
        second.add(node(raw)).expect("second child");
    }
    history
}
