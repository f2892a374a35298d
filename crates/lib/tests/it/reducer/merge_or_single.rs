//! Tests for `merge_or_single`, the default nested-field policy of `merge`

use arbor::reducer::merge_or_single;
use serde_json::json;

use crate::helpers::*;

#[test]
fn test_without_values_is_empty_object() {
    assert_eq!(fold_ok(&merge_or_single(), vec![]), Some(json!({})));
}

#[test]
fn test_single_scalar_passes_through() {
    for value in [json!(1), json!("text"), json!(true), json!(null)] {
        assert_eq!(fold_ok(&merge_or_single(), vec![value.clone()]), Some(value));
    }
}

#[test]
fn test_two_scalars_fail() {
    let err = fold_err(&merge_or_single(), vec![json!(1), json!(1)]);
    assert!(err.is_type_error());
}

#[test]
fn test_scalar_and_container_fail() {
    assert!(fold_err(&merge_or_single(), vec![json!(1), json!({})]).is_type_error());
    assert!(fold_err(&merge_or_single(), vec![json!([]), json!(1)]).is_type_error());
}

#[test]
fn test_containers_merge_deeply() {
    assert_eq!(
        fold_ok(
            &merge_or_single(),
            vec![json!({"a": [{"b": 1}]}), json!({"a": [{"c": 2}, "d"]})]
        ),
        Some(json!({"a": [{"b": 1, "c": 2}, "d"]}))
    );
}

#[test]
fn test_nested_scalar_conflict_fails() {
    let err = fold_err(
        &merge_or_single(),
        vec![json!({"a": {"b": 1}}), json!({"a": {"b": {"c": 2}}})],
    );
    assert!(err.is_type_error());
}
