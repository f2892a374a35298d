//! Flatten and lazy policies.
//!
//! Both wrap an inner policy and only start its fold once a real element shows
//! up. The inner fold is one continuous stream across all outer values, so an
//! element in the third outer value may be the one that seeds it.

use std::sync::Arc;

use serde_json::Value;

use crate::Result;
use crate::reducer::{Accumulator, Reducer, ReducerError, StreamStatus, concat};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Depth {
    /// Unwrap one level of arrays
    Shallow,
    /// Unwrap arrays recursively
    Deep,
    /// Feed every value as is
    Keep,
}

impl Depth {
    fn unwrap(self, value: Value) -> Vec<Value> {
        match (self, value) {
            (Depth::Shallow, Value::Array(items)) => items,
            (Depth::Deep, value) => {
                let mut out = Vec::new();
                unwrap_deep(value, &mut out);
                out
            }
            (_, value) => vec![value],
        }
    }
}

fn unwrap_deep(value: Value, out: &mut Vec<Value>) {
    match value {
        Value::Array(items) => {
            for item in items {
                unwrap_deep(item, out);
            }
        }
        other => out.push(other),
    }
}

fn expect_stream(acc: Accumulator) -> Result<StreamStatus> {
    match acc {
        Accumulator::Stream(status) => Ok(status),
        other => Err(ReducerError::invalid_type("stream status", other.kind()).into()),
    }
}

fn stream_accumulate(inner: Reducer, depth: Depth) -> crate::reducer::AccumulateFn {
    Arc::new(
        move |acc: Accumulator, value: Value| -> Result<Accumulator> {
            let mut status = expect_stream(acc)?;
            for element in depth.unwrap(value) {
                let state = status.take();
                status.set(inner.step(state, element)?);
            }
            Ok(Accumulator::Stream(status))
        },
    )
}

fn flatten_reducer(name: &'static str, policy: Reducer, depth: Depth) -> Reducer {
    let inner = policy.clone();
    Reducer::from_parts(
        name,
        stream_accumulate(policy, depth),
        Some(Accumulator::Stream(StreamStatus::default())),
        Some(Arc::new(
            move |acc: Accumulator| -> Result<Option<Value>> {
                match expect_stream(acc)?.into_inner() {
                    Some(acc) => inner.finish(acc),
                    None => match inner.initial() {
                        Some(seed) => inner.finish(seed),
                        None => Ok(None),
                    },
                }
            },
        )),
    )
}

/// Concatenates values, unwrapping one level of arrays.
pub fn flatten() -> Reducer {
    flatten_with(concat())
}

/// Feeds the elements of each value (one array level unwrapped, scalars as
/// themselves) to `policy` as a single stream.
///
/// When no element ever arrives the result is undefined, unless `policy` has an
/// initial accumulator, in which case it terminates a fresh copy of it.
pub fn flatten_with(policy: Reducer) -> Reducer {
    flatten_reducer("flatten", policy, Depth::Shallow)
}

/// Concatenates values, unwrapping nested arrays at any depth.
pub fn flatten_deep() -> Reducer {
    flatten_deep_with(concat())
}

/// Like [`flatten_with`], but arrays are unwrapped recursively.
pub fn flatten_deep_with(policy: Reducer) -> Reducer {
    flatten_reducer("flattenDeep", policy, Depth::Deep)
}

/// Defers the inner policy until the first value arrives.
///
/// The first value seeds the inner fold (through a copy of the inner initial
/// accumulator when there is one). Zero values fold to undefined without ever
/// invoking the inner policy, terminate included.
pub fn lazy(policy: Reducer) -> Reducer {
    let inner = policy.clone();
    Reducer::from_parts(
        "lazy",
        stream_accumulate(policy, Depth::Keep),
        Some(Accumulator::Stream(StreamStatus::default())),
        Some(Arc::new(
            move |acc: Accumulator| -> Result<Option<Value>> {
                match expect_stream(acc)?.into_inner() {
                    Some(acc) => inner.finish(acc),
                    None => Ok(None),
                }
            },
        )),
    )
}
