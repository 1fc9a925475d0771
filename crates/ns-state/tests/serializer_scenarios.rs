// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Byte-level checks of the namespace history serializers.

mod common;

use common::*;
use ns_codec::{OutputStream, Writer};
use ns_state::{
    Address, AliasType, MosaicId, NamespaceAlias, NamespaceError, NamespaceId,
    RootNamespaceHistory, RootNamespaceHistoryNonHistoricalSerializer as LatestOnly,
    RootNamespaceHistorySerializer as Full, SerializeError, SerializerMode, MAX_NAMESPACE_DEPTH,
};

#[test]
fn literal_scenario_full_history_layout() {
    let bytes = save::<Full>(&literal_history());

    assert_eq!(u64_at(&bytes, 0), 1, "history depth");
    assert_eq!(u64_at(&bytes, 8), 100, "root id");
    assert_eq!(&bytes[16..48], &[0xA1; 32], "owner");
    assert_eq!(u64_at(&bytes, 48), 10, "lifetime start");
    assert_eq!(u64_at(&bytes, 56), 100, "lifetime end");
    assert_eq!(bytes[64], AliasType::None as u8, "root alias");
    assert_eq!(u64_at(&bytes, 65), 1, "child count");

    // child record: [200, 0] then alias [1, 7]
    assert_eq!(u64_at(&bytes, 73), 200);
    assert_eq!(u64_at(&bytes, 81), 0);
    assert_eq!(bytes[89], 1);
    assert_eq!(u64_at(&bytes, 90), 7);
    assert_eq!(bytes.len(), 98);

    let loaded = load::<Full>(&bytes).expect("load");
    assert_eq!(loaded.id(), ROOT);
    assert_eq!(loaded.history_depth(), 1);
    let root = loaded.back().expect("back");
    assert_eq!(root.owner(), &OWNER_A);
    assert_eq!(root.lifetime(), lifetime(10, 100));
    assert_eq!(root.child_count(), 1);
    assert_eq!(
        root.alias(NamespaceId(200)).and_then(|alias| alias.mosaic_id()),
        Ok(MosaicId(7))
    );
    assert_eq!(loaded, literal_history());
}

#[test]
fn latest_only_header_has_no_depth() {
    let full = save::<Full>(&literal_history());
    let latest = save::<LatestOnly>(&literal_history());

    assert_eq!(u64_at(&latest, 0), 100);
    assert_eq!(&latest[..], &full[8..]);
    assert_eq!(load::<LatestOnly>(&latest).expect("load"), literal_history());
}

#[test]
fn same_owner_renewal_writes_zero_children() {
    // Children added to the renewed snapshot in memory are still elided.
    let history = two_snapshot_history(OWNER_A, &[&[100, 300], &[100, 300, 301]]);
    let bytes = save::<Full>(&history);

    let first_len = SNAPSHOT_PREFIX_LEN + 1 + 8 + (8 * (MAX_NAMESPACE_DEPTH - 1) + 1);
    let second = FULL_HEADER_LEN + first_len;
    assert_eq!(u64_at(&bytes, FULL_HEADER_LEN + SNAPSHOT_PREFIX_LEN + 1), 1);
    assert_eq!(u64_at(&bytes, second + SNAPSHOT_PREFIX_LEN + 1), 0);
    assert_eq!(bytes.len(), second + SNAPSHOT_PREFIX_LEN + 1 + 8);

    let loaded = load::<Full>(&bytes).expect("load");
    let snapshots: Vec<_> = loaded.iter().collect();
    assert_eq!(snapshots.len(), 2);
    assert_eq!(snapshots[0].child_count(), 1);
    assert_eq!(snapshots[1].child_count(), 0);
    assert_eq!(snapshots[1].owner(), &OWNER_A);
    assert_eq!(snapshots[1].lifetime(), lifetime(50, 100));
}

#[test]
fn same_owner_renewal_without_children_does_not_inherit() {
    let history = two_snapshot_history(OWNER_A, &[]);
    let loaded = load::<Full>(&save::<Full>(&history)).expect("load");
    assert_eq!(loaded, history);
    assert_eq!(loaded.back().expect("back").child_count(), 0);
}

#[test]
fn owner_change_writes_real_children() {
    let history = two_snapshot_history(OWNER_B, &[&[100, 300]]);
    let bytes = save::<Full>(&history);

    let first_len = SNAPSHOT_PREFIX_LEN + 1 + 8 + (8 * (MAX_NAMESPACE_DEPTH - 1) + 1);
    let second = FULL_HEADER_LEN + first_len;
    assert_eq!(&bytes[second..second + 32], &[0xB2; 32]);
    assert_eq!(u64_at(&bytes, second + SNAPSHOT_PREFIX_LEN + 1), 1);
    assert_eq!(u64_at(&bytes, second + SNAPSHOT_PREFIX_LEN + 9), 300);

    assert_eq!(load::<Full>(&bytes).expect("load"), history);
}

#[test]
fn owner_change_with_no_children_writes_empty_set() {
    let history = two_snapshot_history(OWNER_B, &[]);
    let loaded = load::<Full>(&save::<Full>(&history)).expect("load");
    assert_eq!(loaded, history);
}

#[test]
fn compaction_restarts_after_an_owner_change() {
    // A, A, B, B, A: only snapshots 1, 3 and 5 carry children.
    let owners = [OWNER_A, OWNER_A, OWNER_B, OWNER_B, OWNER_A];
    let mut history = RootNamespaceHistory::new(ROOT);
    for (i, owner) in owners.iter().enumerate() {
        let start = 10 * (i as u64 + 1);
        let root = history.push(*owner, lifetime(start, start + 10));
        root.add(node(&[100, 200 + i as u64])).expect("child");
    }

    let loaded = load::<Full>(&save::<Full>(&history)).expect("load");
    let counts: Vec<_> = loaded.iter().map(|root| root.child_count()).collect();
    assert_eq!(counts, [1, 0, 1, 0, 1]);
}

#[test]
fn latest_only_never_compacts() {
    let history = two_snapshot_history(OWNER_A, &[&[100, 300]]);
    let loaded = load::<LatestOnly>(&save::<LatestOnly>(&history)).expect("load");
    assert_eq!(loaded.history_depth(), 1);
    let root = loaded.back().expect("back");
    assert_eq!(root.lifetime(), lifetime(50, 100));
    assert_eq!(
        root.sorted_child_paths().copied().collect::<Vec<_>>(),
        [path(&[100, 300])]
    );
}

#[test]
fn padding_fills_unused_slots_with_reserved_ids() {
    let mut history = RootNamespaceHistory::new(ROOT);
    let root = history.push(OWNER_A, lifetime(1, 2));
    root.add(node(&[100, 200])).expect("depth 2");
    root.add(node(&[100, 200, 300])).expect("depth 3");
    let bytes = save::<LatestOnly>(&history);

    let slots = MAX_NAMESPACE_DEPTH - 1;
    let record_len = 8 * slots + 1;
    let first = 8 + SNAPSHOT_PREFIX_LEN + 1 + 8;
    assert_eq!(u64_at(&bytes, first - 8), 2);

    // 100.200 sorts before 100.200.300
    assert_eq!(u64_at(&bytes, first), 200);
    assert_eq!(u64_at(&bytes, first + 8), 0);
    let second = first + record_len;
    assert_eq!(u64_at(&bytes, second), 200);
    assert_eq!(u64_at(&bytes, second + 8), 300);
    assert_eq!(bytes.len(), second + record_len);
}

#[test]
fn address_aliases_round_trip_on_root_and_children() {
    let mut history = literal_history();
    let root = history.back_mut().expect("back");
    root.set_alias(ROOT, Address([0x42; 25]).into()).expect("root alias");
    root.add(node(&[100, 200, 201])).expect("grandchild");
    root.set_alias(NamespaceId(201), Address([0x43; 25]).into())
        .expect("grandchild alias");

    let loaded = load::<Full>(&save::<Full>(&history)).expect("load");
    let root = loaded.back().expect("back");
    assert_eq!(root.alias(ROOT), Ok(NamespaceAlias::Address(Address([0x42; 25]))));
    assert_eq!(
        root.alias(NamespaceId(201)).and_then(|alias| alias.address()),
        Ok(Address([0x43; 25]))
    );
}

#[test]
fn empty_history_is_rejected_on_save_in_both_modes() {
    let history = RootNamespaceHistory::new(ROOT);
    for mode in [SerializerMode::Full, SerializerMode::LatestOnly] {
        let mut w = Writer::default();
        assert_eq!(
            mode.save(&history, &mut w),
            Err(SerializeError::EmptyHistoryOnSave(ROOT))
        );
        assert!(w.is_empty(), "nothing written for {mode:?}");
    }
}

#[test]
fn zero_depth_is_rejected_on_load() {
    let mut w = Writer::default();
    w.write_u64_le(0);
    w.write_u64_le(100);
    assert_eq!(
        load::<Full>(&w.into_vec()),
        Err(SerializeError::EmptyHistoryOnLoad)
    );
}

#[test]
fn every_truncation_fails_cleanly() {
    let history = two_snapshot_history(OWNER_B, &[&[100, 300]]);
    let bytes = save::<Full>(&history);
    for cut in 0..bytes.len() {
        assert!(
            matches!(
                load::<Full>(&bytes[..cut]),
                Err(SerializeError::TruncatedStream(_))
            ),
            "cut at {cut}"
        );
    }
}

#[test]
fn unknown_alias_tag_is_rejected() {
    let mut bytes = save::<Full>(&literal_history());
    bytes[64] = 9;
    assert_eq!(load::<Full>(&bytes), Err(SerializeError::UnknownAliasKind(9)));
}

#[test]
fn corrupt_snapshots_surface_model_errors() {
    let mut inverted = save::<Full>(&literal_history());
    inverted[48..56].copy_from_slice(&200u64.to_le_bytes());
    assert!(matches!(
        load::<Full>(&inverted),
        Err(SerializeError::CorruptState(NamespaceError::InvalidLifetime { .. }))
    ));

    // Declare two children and repeat the first record.
    let mut duplicate = save::<Full>(&literal_history());
    duplicate[65..73].copy_from_slice(&2u64.to_le_bytes());
    let record = duplicate[73..98].to_vec();
    duplicate.extend_from_slice(&record);
    assert_eq!(
        load::<Full>(&duplicate),
        Err(SerializeError::CorruptState(NamespaceError::DuplicateChild(
            NamespaceId(200)
        )))
    );
}

#[test]
fn all_padding_child_record_is_rejected() {
    let mut bytes = save::<Full>(&literal_history());
    bytes[73..81].copy_from_slice(&0u64.to_le_bytes());
    assert_eq!(
        load::<Full>(&bytes),
        Err(SerializeError::CorruptState(NamespaceError::InvalidPath {
            root: ROOT
        }))
    );
}

#[test]
fn child_record_naming_the_root_is_rejected() {
    // 100.200 -> mosaic 7 becomes 100.100 -> mosaic 7.
    let mut bytes = save::<Full>(&literal_history());
    bytes[73..81].copy_from_slice(&ROOT.0.to_le_bytes());
    assert_eq!(
        load::<Full>(&bytes),
        Err(SerializeError::CorruptState(NamespaceError::InvalidPath {
            root: ROOT
        }))
    );
}

#[test]
fn mode_dispatch_matches_direct_serializers() {
    let history = two_snapshot_history(OWNER_B, &[&[100, 300]]);
    for (mode, direct) in [
        (SerializerMode::Full, save::<Full>(&history)),
        (SerializerMode::LatestOnly, save::<LatestOnly>(&history)),
    ] {
        let mut w = Writer::default();
        mode.save(&history, &mut w).expect("save");
        assert_eq!(w.as_slice(), direct.as_slice());
    }
}
