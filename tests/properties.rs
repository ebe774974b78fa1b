//! Property tests for collection invariants

use kollect::{collection, Collection, Key, Value};
use proptest::prelude::*;

fn scalar() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        (-1000i64..1000).prop_map(Value::Int),
        (-1.0e6f64..1.0e6).prop_map(Value::Float),
        "[a-z]{0,6}".prop_map(Value::from),
    ]
}

fn value() -> impl Strategy<Value = Value> {
    prop_oneof![
        4 => scalar(),
        1 => prop::collection::vec(scalar(), 0..4).prop_map(Value::from),
    ]
}

fn key() -> impl Strategy<Value = Key> {
    prop_oneof![
        (0u64..20).prop_map(Key::Int),
        "[a-z]{1,4}".prop_map(|s| Key::from(s.as_str())),
    ]
}

prop_compose! {
    fn arbitrary_collection()(entries in prop::collection::vec((key(), value()), 0..12)) -> Collection {
        Collection::from_pairs(entries)
    }
}

prop_compose! {
    fn arbitrary_records()(
        rows in prop::collection::vec((prop::option::of(0usize..3), -50i64..50), 0..12)
    ) -> Collection {
        let teams = ["red", "green", "blue"];
        rows.into_iter()
            .map(|(team, n)| {
                let mut record = collection!{"n" => n};
                if let Some(team) = team {
                    record.put("team", teams[team]);
                }
                Value::from(record)
            })
            .collect()
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn test_map_preserves_keys(c in arbitrary_collection()) {
        let mapped = c.map(|v, _| v.to_text());
        prop_assert_eq!(mapped.keys(), c.keys());
    }

    #[test]
    fn test_array_round_trip(c in arbitrary_collection()) {
        prop_assert_eq!(Collection::from(c.to_array()), c);
    }

    #[test]
    fn test_unique_is_idempotent(c in arbitrary_collection()) {
        let once = c.unique();
        prop_assert_eq!(once.unique(), once);
    }

    #[test]
    fn test_sort_is_idempotent(c in arbitrary_collection()) {
        let once = c.sort();
        prop_assert_eq!(once.sort(), once);
    }

    #[test]
    fn test_partition_is_complete(c in arbitrary_collection()) {
        let halves = c.partition(|v, _| v.is_truthy());
        let passing = halves.get(0).and_then(Value::as_collection).cloned().unwrap_or_default();
        let failing = halves.get(1).and_then(Value::as_collection).cloned().unwrap_or_default();

        prop_assert_eq!(passing.count() + failing.count(), c.count());
        for (key, _) in c.iter() {
            prop_assert!(passing.has(key) != failing.has(key));
        }
    }

    #[test]
    fn test_group_by_is_complete(records in arbitrary_records()) {
        let groups = records.group_by("team");
        let total: usize = groups
            .iter()
            .filter_map(|(_, group)| group.as_collection())
            .map(Collection::count)
            .sum();
        prop_assert_eq!(total, records.count());
    }

    #[test]
    fn test_chunk_then_collapse_recovers_values(c in arbitrary_collection(), size in 1usize..6) {
        prop_assert_eq!(c.chunk(size).collapse().values(), c.values());
    }

    #[test]
    fn test_shuffle_keeps_entries(c in arbitrary_collection(), seed in any::<u64>()) {
        use rand::SeedableRng;

        let mut shuffled = c.clone();
        shuffled.shuffle(&mut rand::rngs::StdRng::seed_from_u64(seed));
        prop_assert_eq!(shuffled.count(), c.count());
        for (key, value) in c.iter() {
            prop_assert_eq!(shuffled.get(key), Some(value));
        }
    }
}

#[test]
fn test_median_literals() {
    assert_eq!(collection![1, 2, 3, 4].median(), Some(Value::Float(2.5)));
    assert_eq!(collection![1, 2, 3].median(), Some(Value::Int(2)));
}

#[test]
fn test_sum_and_avg_scenario() {
    let c = collection![1, 2, 3];
    assert_eq!(c.sum(), Value::Int(6));
    assert_eq!(c.avg(), Some(Value::Int(2)));
}

#[test]
fn test_except_scenario() {
    let mut c = collection!{"a" => 1, "b" => 2};
    c.except(["a"]).unwrap();
    assert_eq!(c, collection!{"b" => 2});
}

#[test]
fn test_cross_joins_scenario() {
    let c = collection![collection![1, 2], collection![3, 4]];
    assert_eq!(
        c.cross_joins(&[collection![5, 6]]),
        collection![
            collection![1, 2, 5],
            collection![1, 2, 6],
            collection![3, 4, 5],
            collection![3, 4, 6]
        ]
    );
}
