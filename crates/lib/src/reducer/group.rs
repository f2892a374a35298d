//! Grouping policies: bucket records by a key field, then fold each bucket.

use std::sync::Arc;

use serde_json::{Map, Value};

use crate::Result;
use crate::reducer::{Accumulator, Buckets, Merge, Reducer, ReducerError, concat, first};
use crate::value::{field, group_key};

struct Grouping {
    key: String,
    policy: Reducer,
}

impl Grouping {
    fn new(key: String, policy: Reducer) -> Result<Self> {
        if key.is_empty() {
            return Err(ReducerError::invalid_argument("missing group by key configuration").into());
        }
        Ok(Self { key, policy })
    }

    fn accumulate(&self, acc: Accumulator, record: Value) -> Result<Accumulator> {
        let mut buckets = expect_buckets(acc)?;
        let bucket = group_key(field(&record, &self.key));
        match buckets.get_mut(&bucket) {
            Some(slot) => {
                let acc = std::mem::take(slot);
                *slot = self.policy.accumulate(acc, record)?;
            }
            None => {
                let acc = self.policy.step(None, record)?;
                buckets.insert(bucket, acc);
            }
        }
        Ok(Accumulator::Groups(buckets))
    }

    /// Terminated buckets in first-seen order; undefined buckets are dropped.
    fn finish_buckets(&self, acc: Accumulator) -> Result<Vec<(String, Value)>> {
        let mut finished = Vec::new();
        for (bucket, acc) in expect_buckets(acc)? {
            if let Some(value) = self.policy.finish(acc)? {
                finished.push((bucket, value));
            }
        }
        Ok(finished)
    }

    fn into_reducer<F>(self, name: &'static str, shape: F) -> Reducer
    where
        F: Fn(Vec<(String, Value)>) -> Value + Send + Sync + 'static,
    {
        let grouping = Arc::new(self);
        let accumulate = Arc::clone(&grouping);
        Reducer::from_parts(
            name,
            Arc::new(
                move |acc: Accumulator, value: Value| -> Result<Accumulator> {
                    accumulate.accumulate(acc, value)
                },
            ),
            Some(Accumulator::Groups(Buckets::new())),
            Some(Arc::new(
                move |acc: Accumulator| -> Result<Option<Value>> {
                    Ok(Some(shape(grouping.finish_buckets(acc)?)))
                },
            )),
        )
    }
}

fn expect_buckets(acc: Accumulator) -> Result<Buckets> {
    match acc {
        Accumulator::Groups(buckets) => Ok(buckets),
        other => Err(ReducerError::invalid_type("group buckets", other.kind()).into()),
    }
}

/// Groups records into arrays keyed by the stringified value of `key`.
///
/// Fails with [`ReducerError::InvalidArgument`] if `key` is empty.
pub fn group_by(key: impl Into<String>) -> Result<Reducer> {
    group_by_with(key, concat())
}

/// Groups records by `key` and folds every bucket through `policy`.
///
/// The result is an object mapping each bucket key to its folded value, in
/// first-seen key order.
///
/// # Examples
///
/// ```
/// use arbor::reducer::{first, group_by_with};
/// use serde_json::json;
///
/// let reducer = group_by_with("k", first()).unwrap();
/// let grouped = reducer
///     .fold(vec![json!({"k": 1, "a": 1}), json!({"k": 1, "a": 2}), json!({"k": "x"})])
///     .unwrap();
/// assert_eq!(grouped, Some(json!({"1": {"k": 1, "a": 1}, "x": {"k": "x"}})));
/// ```
pub fn group_by_with(key: impl Into<String>, policy: Reducer) -> Result<Reducer> {
    let grouping = Grouping::new(key.into(), policy)?;
    Ok(grouping.into_reducer("groupBy", |buckets| {
        Value::Object(buckets.into_iter().collect::<Map<String, Value>>())
    }))
}

/// Merges records sharing the same `key` into one record each.
///
/// The default bucket policy deep-merges records while keeping the first value
/// of the key field. The result is an array of merged records in first-seen key
/// order.
pub fn reduce_by(key: impl Into<String>) -> Result<Reducer> {
    let key = key.into();
    let policy = Merge::new().special(key.clone(), first()).build();
    reduce_by_with(key, policy)
}

/// Groups records by `key`, folds every bucket through `policy` and returns
/// the folded buckets as an array.
pub fn reduce_by_with(key: impl Into<String>, policy: Reducer) -> Result<Reducer> {
    let grouping = Grouping::new(key.into(), policy)?;
    Ok(grouping.into_reducer("reduceBy", |buckets| {
        Value::Array(buckets.into_iter().map(|(_, value)| value).collect())
    }))
}
