//! Tests for `lazy`

use arbor::reducer::{Reducer, concat, first, lazy, merge, none};
use serde_json::{Value, json};

use crate::helpers::*;

#[test]
fn test_lazy_without_values_never_touches_inner() {
    let (inner, accumulated, terminated) = spy_reducer();
    let reducer = lazy(inner);
    assert_eq!(fold_ok(&reducer, vec![]), None);
    assert_eq!(accumulated.count(), 0);
    assert_eq!(terminated.count(), 0);
}

#[test]
fn test_lazy_first_value_seeds_inner() {
    let (inner, accumulated, terminated) = spy_reducer();
    let reducer = lazy(inner);
    assert_eq!(fold_ok(&reducer, vec![json!("a")]), Some(json!("a")));
    assert_eq!(accumulated.count(), 0);
    assert_eq!(terminated.count(), 1);

    assert_eq!(fold_ok(&reducer, vec![json!("a"), json!("b")]), Some(json!("b")));
    assert_eq!(accumulated.count(), 1);
    assert_eq!(terminated.count(), 2);
}

#[test]
fn test_lazy_respects_inner_initial() {
    assert_eq!(fold_ok(&lazy(concat()), vec![]), None);
    assert_eq!(
        fold_ok(&lazy(concat()), vec![json!([1]), json!(2)]),
        Some(json!([[1], 2]))
    );

    let sum = Reducer::new(|acc: Value, value: Value| {
        Ok(json!(acc.as_i64().unwrap_or(0) + value.as_i64().unwrap_or(0)))
    })
    .with_initial(json!(10));
    assert_eq!(fold_ok(&lazy(sum.clone()), vec![]), None);
    assert_eq!(fold_ok(&lazy(sum), vec![json!(1)]), Some(json!(11)));
}

#[test]
fn test_lazy_does_not_unwrap_arrays() {
    assert_eq!(fold_ok(&lazy(first()), vec![json!([1, 2])]), Some(json!([1, 2])));
}

#[test]
fn test_lazy_merge_drops_empty_results() {
    assert_eq!(fold_ok(&merge(), vec![]), Some(json!({})));
    assert_eq!(fold_ok(&lazy(merge()), vec![]), None);
    assert_eq!(
        fold_ok(&lazy(merge()), vec![json!({"a": 1}), json!({"b": 2})]),
        Some(json!({"a": 1, "b": 2}))
    );
}

#[test]
fn test_lazy_none_fails_on_first_value() {
    assert_eq!(fold_ok(&lazy(none()), vec![]), None);
    assert!(fold_err(&lazy(none()), vec![json!(1)]).is_cardinality_error());
}
