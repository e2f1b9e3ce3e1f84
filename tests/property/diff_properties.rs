//! Property-based tests for change classification, field diffing, and
//! chunking

use proptest::prelude::*;
use serde_json::Value;

use docstore_triggers::{
    array_value_change, foreign_key_change, single_values, value_change, ArrayChunk,
    DocumentChange, DocumentSnapshot, Fields,
};

fn arb_value() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i32>().prop_map(|n| Value::from(n)),
        "[a-z]{0,6}".prop_map(Value::String),
    ];
    leaf.prop_recursive(2, 16, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Value::Array),
            prop::collection::btree_map("[a-z]{1,3}", inner, 0..4)
                .prop_map(|m| Value::Object(m.into_iter().collect())),
        ]
    })
}

fn arb_fields() -> impl Strategy<Value = Fields> {
    prop::collection::btree_map("[a-z]{1,4}", arb_value(), 0..5)
        .prop_map(|m| m.into_iter().collect())
}

fn change(before: Option<Fields>, after: Option<Fields>) -> DocumentChange {
    DocumentChange::new(
        before.map(|f| DocumentSnapshot::new("c/doc", f)),
        after.map(|f| DocumentSnapshot::new("c/doc", f)),
    )
}

proptest! {
    /// Exactly one transition holds for any snapshot pair, except the
    /// both-absent no-op.
    #[test]
    fn classification_is_exclusive(
        before in prop::option::of(arb_fields()),
        after in prop::option::of(arb_fields()),
    ) {
        let c = change(before.clone(), after.clone());
        let held = [c.is_create(), c.is_update(), c.is_delete()]
            .iter()
            .filter(|b| **b)
            .count();
        if before.is_none() && after.is_none() {
            prop_assert_eq!(held, 0);
        } else {
            prop_assert_eq!(held, 1);
        }
    }

    /// An unchanged field never reports a change, whatever its shape.
    #[test]
    fn identical_fields_report_no_change(fields in arb_fields()) {
        let c = change(Some(fields.clone()), Some(fields.clone()));
        for name in fields.keys() {
            prop_assert!(!value_change(&c, name));
        }
        prop_assert!(!value_change(&c, "never-present"));
    }

    /// A field present on exactly one side always reports a change.
    #[test]
    fn one_sided_field_reports_change(name in "[a-z]{1,4}", value in arb_value()) {
        let mut with = Fields::new();
        with.insert(name.clone(), value);
        let added = change(Some(Fields::new()), Some(with.clone()));
        prop_assert!(value_change(&added, &name));

        let removed = change(Some(with), Some(Fields::new()));
        prop_assert!(value_change(&removed, &name));
    }

    /// The multi-field variants are disjunctions of the single-field ones.
    #[test]
    fn multi_field_checks_are_disjunctions(
        before in arb_fields(),
        after in arb_fields(),
    ) {
        let c = change(Some(before), Some(after));
        let names = ["a", "b", "c"];
        prop_assert_eq!(
            array_value_change(&c, &names),
            names.iter().any(|n| value_change(&c, n))
        );
        prop_assert_eq!(
            foreign_key_change(&c, &names),
            names.iter().any(|n| foreign_key_change(&c, &[*n]))
        );
    }

    /// Every value from the symmetric difference belongs to exactly one
    /// input array.
    #[test]
    fn single_values_are_one_sided(
        a in prop::collection::vec(arb_value(), 0..6),
        b in prop::collection::vec(arb_value(), 0..6),
    ) {
        for v in single_values(&a, &b) {
            prop_assert!(a.contains(&v) != b.contains(&v));
        }
        prop_assert!(single_values(&a, &a).is_empty());
    }

    /// Chunking partitions the input: order preserved, no chunk larger
    /// than the configured size.
    #[test]
    fn chunking_partitions_input(
        items in prop::collection::vec(any::<u32>(), 0..50),
        size in 1usize..10,
    ) {
        let chunks = ArrayChunk::with_size(items.clone(), size);
        let flat: Vec<u32> = chunks.iter().flatten().copied().collect();
        prop_assert_eq!(flat, items);
        for chunk in chunks.iter() {
            prop_assert!(chunk.len() <= size);
        }
    }
}
