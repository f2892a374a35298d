//! Tests for `group_by` and `reduce_by`

use arbor::reducer::{
    Merge, concat, first, flatten, group_by, group_by_with, last, merge, reduce_by,
    reduce_by_with, single,
};
use serde_json::json;

use crate::helpers::*;

#[test]
fn test_empty_key_is_rejected() {
    let err = group_by("").unwrap_err();
    assert!(err.is_invalid_argument());
    assert!(err.to_string().contains("missing group by key"));

    assert!(group_by_with("", first()).unwrap_err().is_invalid_argument());
    assert!(reduce_by("").unwrap_err().is_invalid_argument());
    assert!(reduce_by_with("", first()).unwrap_err().is_invalid_argument());
}

#[test]
fn test_group_by_concat() {
    let reducer = group_by("k").unwrap();
    assert_eq!(
        fold_ok(
            &reducer,
            vec![
                json!({"k": 1, "a": 1}),
                json!({"k": 1, "b": 2}),
                json!({"k": 2, "c": 3}),
            ]
        ),
        Some(json!({
            "1": [{"k": 1, "a": 1}, {"k": 1, "b": 2}],
            "2": [{"k": 2, "c": 3}],
        }))
    );
}

#[test]
fn test_group_by_without_values() {
    assert_eq!(fold_ok(&group_by("k").unwrap(), vec![]), Some(json!({})));
    assert_eq!(fold_ok(&reduce_by("k").unwrap(), vec![]), Some(json!([])));
}

#[test]
fn test_group_keys_are_stringified() {
    let reducer = group_by_with("k", last()).unwrap();
    let grouped = fold_ok(
        &reducer,
        vec![
            json!({"k": "1", "v": "text"}),
            json!({"k": 1.0, "v": "float"}),
            json!({"k": true, "v": "bool"}),
            json!({"k": null, "v": "null"}),
            json!({"v": "missing"}),
            json!({"k": [1, 2], "v": "array"}),
        ],
    );
    assert_eq!(
        grouped,
        Some(json!({
            "1": {"k": 1.0, "v": "float"},
            "true": {"k": true, "v": "bool"},
            "null": {"k": null, "v": "null"},
            "undefined": {"v": "missing"},
            "1,2": {"k": [1, 2], "v": "array"},
        }))
    );
}

#[test]
fn test_group_buckets_keep_first_seen_order() {
    let reducer = reduce_by_with("k", first()).unwrap();
    let reduced = fold_ok(
        &reducer,
        vec![
            json!({"k": "b", "n": 1}),
            json!({"k": "a", "n": 2}),
            json!({"k": "b", "n": 3}),
        ],
    );
    assert_eq!(
        reduced,
        Some(json!([{"k": "b", "n": 1}, {"k": "a", "n": 2}]))
    );
}

#[test]
fn test_group_by_with_bucket_policy() {
    let reducer = group_by_with("type", Merge::new().special("type", first()).build()).unwrap();
    assert_eq!(
        fold_ok(
            &reducer,
            vec![
                json!({"type": "a", "x": {"one": 1}}),
                json!({"type": "b"}),
                json!({"type": "a", "x": {"two": 2}}),
            ]
        ),
        Some(json!({
            "a": {"type": "a", "x": {"one": 1, "two": 2}},
            "b": {"type": "b"},
        }))
    );
}

#[test]
fn test_reduce_by_merges_records_keeping_the_key() {
    let reducer = reduce_by("k").unwrap();
    assert_eq!(
        fold_ok(&reducer, vec![json!({"k": 1, "a": 1}), json!({"k": 1, "b": 2})]),
        Some(json!([{"k": 1, "a": 1, "b": 2}]))
    );
    assert_eq!(
        fold_ok(
            &reducer,
            vec![
                json!({"k": 1, "a": {"x": 1}}),
                json!({"k": 2, "a": 2}),
                json!({"k": 1, "a": {"y": 2}}),
            ]
        ),
        Some(json!([{"k": 1, "a": {"x": 1, "y": 2}}, {"k": 2, "a": 2}]))
    );
}

#[test]
fn test_group_by_merge_conflicts_on_the_key() {
    let reducer = group_by_with("type", merge()).unwrap();
    let err = fold_err(&reducer, vec![json!({"type": "a"}), json!({"type": "a"})]);
    assert!(err.is_type_error());
}

#[test]
fn test_reduce_by_conflicts_fail() {
    let err = fold_err(
        &reduce_by("k").unwrap(),
        vec![json!({"k": 1, "a": 1}), json!({"k": 1, "a": 2})],
    );
    assert!(err.is_type_error());
}

#[test]
fn test_reduce_by_with_custom_merge() {
    let policy = Merge::new()
        .policy(last())
        .special("k", first())
        .special("tags", flatten())
        .build();
    let reducer = reduce_by_with("k", policy).unwrap();
    assert_eq!(
        fold_ok(
            &reducer,
            vec![
                json!({"k": 1, "name": "a", "tags": ["x"]}),
                json!({"k": 1, "name": "b", "tags": "y"}),
                json!({"k": 2, "name": "c"}),
            ]
        ),
        Some(json!([
            {"tags": ["x", "y"], "k": 1, "name": "b"},
            {"tags": [], "k": 2, "name": "c"},
        ]))
    );
}

#[test]
fn test_bucket_errors_propagate() {
    let reducer = group_by_with("k", single()).unwrap();
    let err = fold_err(&reducer, vec![json!({"k": 1}), json!({"k": 2}), json!({"k": 1})]);
    assert!(err.is_cardinality_error());
}

#[test]
fn test_group_by_array_index_key() {
    let reducer = group_by_with("0", concat()).unwrap();
    assert_eq!(
        fold_ok(&reducer, vec![json!(["a", 1]), json!(["b", 2]), json!(["a", 3])]),
        Some(json!({"a": [["a", 1], ["a", 3]], "b": [["b", 2]]}))
    );
}
