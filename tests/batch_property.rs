// tests/batch_property.rs

use std::time::Duration;

use proptest::prelude::*;

use watchrun::engine::{ChangeEvent, DebounceCore};
use watchrun::types::ChangeKind;

fn kind_strategy() -> impl Strategy<Value = ChangeKind> {
    prop_oneof![
        Just(ChangeKind::Added),
        Just(ChangeKind::Modified),
        Just(ChangeKind::Removed),
        Just(ChangeKind::DirAdded),
        Just(ChangeKind::DirRemoved),
    ]
}

proptest! {
    /// Flush-boundary invariant: no matter where flushes land in a
    /// stream of recorded changes, every change is delivered exactly
    /// once and overall order is preserved.
    #[test]
    fn every_change_flushes_exactly_once_in_order(
        ops in proptest::collection::vec(
            (kind_strategy(), "[a-z]{1,8}", any::<bool>()),
            0..64,
        )
    ) {
        let mut core = DebounceCore::new(Duration::from_millis(10));
        let mut recorded = Vec::new();
        let mut flushed = Vec::new();

        for (kind, name, flush_after) in ops {
            let change = ChangeEvent { kind, path: name.into() };
            recorded.push(change.clone());
            core.record(change);
            if flush_after {
                flushed.extend(core.take_batch().into_changes());
                prop_assert_eq!(core.pending(), 0);
            }
        }
        flushed.extend(core.take_batch().into_changes());

        prop_assert_eq!(flushed, recorded);
    }
}
