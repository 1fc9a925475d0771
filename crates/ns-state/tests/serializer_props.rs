// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

#![allow(missing_docs)]
mod common;

use std::collections::BTreeSet;

use common::*;
use ns_state::{
    Address, Key, MosaicId, NamespaceAlias, NamespaceId, RootNamespaceHistory,
    RootNamespaceHistoryNonHistoricalSerializer as LatestOnly,
    RootNamespaceHistorySerializer as Full,
};
use proptest::prelude::*;

#[derive(Debug, Clone)]
struct SnapshotSpec {
    owner: u8,
    length: u64,
    root_alias: NamespaceAlias,
    children: Vec<(Vec<u64>, NamespaceAlias)>,
}

fn alias_strategy() -> impl Strategy<Value = NamespaceAlias> {
    prop_oneof![
        Just(NamespaceAlias::None),
        any::<u64>().prop_map(|id| NamespaceAlias::Mosaic(MosaicId(id))),
        any::<[u8; 25]>().prop_map(|raw| NamespaceAlias::Address(Address(raw))),
    ]
}

// Child tails under root 100; ids are non-zero and drawn from a small range so
// depth-3 paths often share a parent.
fn children_strategy() -> impl Strategy<Value = Vec<(Vec<u64>, NamespaceAlias)>> {
    prop::collection::vec(
        (prop::collection::vec(1u64..20, 1..=2), alias_strategy()),
        0..6,
    )
}

fn snapshot_strategy() -> impl Strategy<Value = SnapshotSpec> {
    (0u8..3, 1u64..1_000, alias_strategy(), children_strategy()).prop_map(
        |(owner, length, root_alias, children)| SnapshotSpec {
            owner,
            length,
            root_alias,
            children,
        },
    )
}

fn build(specs: &[SnapshotSpec]) -> RootNamespaceHistory {
    let mut history = RootNamespaceHistory::new(ROOT);
    let mut start = 1;
    for spec in specs {
        let root = history.push(Key([spec.owner; 32]), lifetime(start, start + spec.length));
        start += spec.length;
        root.set_alias(ROOT, spec.root_alias).expect("root alias");

        let mut taken = BTreeSet::new();
        for (tail, alias) in &spec.children {
            let terminal = *tail.last().expect("non-empty tail");
            if !taken.insert(terminal) {
                continue;
            }
            let mut raw = vec![100];
            raw.extend(tail);
            root.add(node(&raw)).expect("child");
            root.set_alias(NamespaceId(terminal), *alias).expect("child alias");
        }
    }
    history
}

proptest! {
    #[test]
    fn full_history_round_trips_except_compacted_children(
        specs in prop::collection::vec(snapshot_strategy(), 1..6)
    ) {
        let history = build(&specs);
        let loaded = load::<Full>(&save::<Full>(&history)).expect("load");

        prop_assert_eq!(loaded.id(), history.id());
        prop_assert_eq!(loaded.history_depth(), history.history_depth());

        let mut previous_owner: Option<Key> = None;
        for (original, decoded) in history.iter().zip(loaded.iter()) {
            prop_assert_eq!(decoded.owner(), original.owner());
            prop_assert_eq!(decoded.lifetime(), original.lifetime());
            prop_assert_eq!(decoded.alias(ROOT), original.alias(ROOT));

            if previous_owner == Some(*original.owner()) {
                prop_assert_eq!(decoded.child_count(), 0);
            } else {
                prop_assert!(decoded.children().eq(original.children()));
            }
            previous_owner = Some(*original.owner());
        }
    }

    #[test]
    fn latest_only_round_trips_current_snapshot(
        specs in prop::collection::vec(snapshot_strategy(), 1..6)
    ) {
        let history = build(&specs);
        let loaded = load::<LatestOnly>(&save::<LatestOnly>(&history)).expect("load");
        prop_assert_eq!(loaded.history_depth(), 1);
        prop_assert_eq!(loaded.back().expect("back"), history.back().expect("back"));
    }

    #[test]
    fn save_is_deterministic(specs in prop::collection::vec(snapshot_strategy(), 1..4)) {
        let history = build(&specs);
        prop_assert_eq!(save::<Full>(&history), save::<Full>(&history.clone()));
    }
}
