//! Tests for `merge` and its builder

use arbor::reducer::{
    Merge, Reducer, concat, first, flatten, last, lazy, merge, merge_with, none, single,
};
use serde_json::{Value, json};

use crate::helpers::*;

#[test]
fn test_merge_without_values_is_empty_object() {
    assert_eq!(fold_ok(&merge(), vec![]), Some(json!({})));
}

#[test]
fn test_merge_single_object_is_deep_copy() {
    let record = json!({"a": {"b": [1, {"c": null}]}, "d": "text"});
    let merged = fold_ok(&merge(), vec![record.clone()]);
    assert_eq!(merged, Some(record));
}

#[test]
fn test_merge_rejects_scalars_next_to_containers() {
    for values in [
        vec![json!(1), json!({})],
        vec![json!({}), json!(1)],
        vec![json!("x")],
        vec![json!([]), json!(null)],
    ] {
        let err = fold_err(&merge(), values);
        assert!(err.is_type_error(), "expected a type error, got {err}");
    }
}

#[test]
fn test_merge_is_deep() {
    assert_eq!(
        fold_ok(
            &merge(),
            vec![json!({"a": {"b": {"c": 1}}}), json!({"a": {"b": {"d": 2}}})]
        ),
        Some(json!({"a": {"b": {"c": 1, "d": 2}}}))
    );
}

#[test]
fn test_merge_conflicting_scalars_fail() {
    let err = fold_err(&merge(), vec![json!({"a": 1}), json!({"a": 2})]);
    assert!(err.is_type_error());
}

#[test]
fn test_merge_array_shape_inference() {
    assert_eq!(
        fold_ok(&merge(), vec![json!([{"a": 1}]), json!([{"b": 2}])]),
        Some(json!([{"a": 1, "b": 2}]))
    );
    // `null` is a scalar too, so it cannot be merged with 1
    assert!(fold_err(&merge(), vec![json!([1]), json!([null])]).is_type_error());

    assert_eq!(
        fold_ok(&merge(), vec![json!({"a": [1]}), json!({"a": {"x": 2}})]),
        Some(json!({"a": {"0": 1, "x": 2}}))
    );
    assert_eq!(
        fold_ok(&merge(), vec![json!({"a": [[1]]}), json!({"a": [[], [2]]})]),
        Some(json!({"a": [[1], [2]]}))
    );
}

#[test]
fn test_merge_with_default_policy() {
    assert_eq!(
        fold_ok(
            &merge_with(last()),
            vec![json!({"a": 1, "b": 1}), json!({"a": 2}), json!({"c": 3})]
        ),
        Some(json!({"a": 2, "b": 1, "c": 3}))
    );
    assert_eq!(
        fold_ok(&merge_with(concat()), vec![json!([1, 2]), json!([3])]),
        Some(json!([[1, 3], [2]]))
    );
}

#[test]
fn test_merge_specials_override_fields() {
    let reducer = Merge::new()
        .policy(first())
        .specials([("tags", concat()), ("owner", single())])
        .build();
    assert_eq!(
        fold_ok(
            &reducer,
            vec![
                json!({"id": 1, "tags": "a", "owner": "ada"}),
                json!({"id": 2, "tags": "b"}),
            ]
        ),
        Some(json!({"tags": ["a", "b"], "id": 1, "owner": "ada"}))
    );

    let err = fold_err(&reducer, vec![json!({"owner": "ada"}), json!({"owner": "alan"})]);
    assert!(err.is_cardinality_error());
}

#[test]
fn test_specials_with_initial_are_always_present() {
    let reducer = Merge::new().policy(first()).special("b", concat()).build();
    assert_eq!(
        fold_ok(&reducer, vec![json!({"a": 1})]),
        Some(json!({"b": [], "a": 1}))
    );
    assert_eq!(fold_ok(&reducer, vec![]), Some(json!({"b": []})));
}

#[test]
fn test_specials_that_terminate_undefined_drop_the_field() {
    let reducer = Merge::new()
        .special("children", lazy(concat()))
        .special("forbidden", none())
        .build();
    assert_eq!(
        fold_ok(&reducer, vec![json!({"name": "root"})]),
        Some(json!({"name": "root"}))
    );
    assert_eq!(
        fold_ok(&reducer, vec![json!({"name": "root", "children": 1})]),
        Some(json!({"name": "root", "children": [1]}))
    );
    assert!(fold_err(&reducer, vec![json!({"forbidden": true})]).is_cardinality_error());
}

#[test]
fn test_flatten_special_without_data_uses_inner_initial() {
    let reducer = Merge::new().special("list", flatten()).build();
    assert_eq!(
        fold_ok(&reducer, vec![json!({"a": {"b": 1}})]),
        Some(json!({"list": [], "a": {"b": 1}}))
    );
    assert_eq!(
        fold_ok(&reducer, vec![json!({"list": [1]}), json!({"list": [2, 3]})]),
        Some(json!({"list": [1, 2, 3]}))
    );
}

#[test]
fn test_specials_only_accept_objects() {
    let reducer = Merge::new().special("a", first()).build();
    let err = fold_err(&reducer, vec![json!([1, 2])]);
    assert!(err.is_type_error());
    assert!(err.to_string().contains("object"));
}

#[test]
fn test_merge_fields_terminate_once() {
    let (spy, accumulated, terminated) = spy_reducer();
    let reducer = merge_with(spy);
    assert_eq!(
        fold_ok(
            &reducer,
            vec![json!({"a": 1, "b": 1}), json!({"a": 2}), json!({"a": 3})]
        ),
        Some(json!({"a": 3, "b": 1}))
    );
    assert_eq!(accumulated.count(), 2);
    assert_eq!(terminated.count(), 2);
}

#[test]
fn test_merge_is_reusable() {
    let reducer: Reducer = Merge::default().special("n", concat()).build();
    let one = fold_ok(&reducer, vec![json!({"n": 1})]);
    let two = fold_ok(&reducer, vec![json!({"n": 2})]);
    assert_eq!(one, Some(json!({"n": [1]})));
    assert_eq!(two, Some(json!({"n": [2]})));
}

#[test]
fn test_merge_custom_reducer_special() {
    let max = Reducer::new(|acc: Value, value: Value| {
        Ok(if value.as_f64() > acc.as_f64() { value } else { acc })
    });
    let reducer = Merge::new().special("score", max).build();
    assert_eq!(
        fold_ok(
            &reducer,
            vec![
                json!({"score": 3, "meta": {"a": 1}}),
                json!({"score": 7, "meta": {"b": 2}}),
                json!({"score": 5}),
            ]
        ),
        Some(json!({"score": 7, "meta": {"a": 1, "b": 2}}))
    );
}
