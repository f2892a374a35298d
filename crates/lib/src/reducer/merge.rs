//! Merge policies: field-by-field deep merging of objects and arrays.
//!
//! [`merge`] folds a sequence of containers into one. Each field (or array
//! position) runs its own sub-fold through a per-field policy: an override from
//! the configured specials, or the default policy, [`merge_or_single`], which
//! keeps merging nested containers recursively.
//!
//! # Output shape
//!
//! The result is an array when every folded value was an array, and an object
//! otherwise. Fields whose policy terminates to undefined are dropped.
//!
//! # Examples
//!
//! ```
//! use arbor::reducer::{Merge, concat, first, merge};
//! use serde_json::json;
//!
//! let merged = merge()
//!     .fold(vec![json!({"a": {"b": {"c": 1}}}), json!({"a": {"b": {"d": 2}}})])
//!     .unwrap();
//! assert_eq!(merged, Some(json!({"a": {"b": {"c": 1, "d": 2}}})));
//!
//! let tagged = Merge::new()
//!     .policy(first())
//!     .special("tags", concat())
//!     .build()
//!     .fold(vec![json!({"id": 1, "tags": "x"}), json!({"id": 2, "tags": "y"})])
//!     .unwrap();
//! assert_eq!(tagged, Some(json!({"id": 1, "tags": ["x", "y"]})));
//! ```

use std::sync::Arc;

use indexmap::IndexMap;
use serde_json::{Map, Value};
use tracing::debug;

use crate::Result;
use crate::reducer::{Accumulator, MergeStatus, Reducer, ReducerError};
use crate::value::{OBJECT_TYPE, type_name};

/// Shape accepted by the merge policies
pub const MERGEABLE: &str = "object or array";

/// Deep-merges objects and arrays with the default nested policy.
pub fn merge() -> Reducer {
    Merge::new().build()
}

/// Merges objects and arrays, folding every field through `policy`.
pub fn merge_with(policy: Reducer) -> Reducer {
    Merge::new().policy(policy).build()
}

/// Builder for a configured [`merge`] policy.
///
/// Defaults: `policy` is [`merge_or_single`], no specials.
#[derive(Debug, Clone)]
pub struct Merge {
    policy: Reducer,
    specials: IndexMap<String, Reducer>,
}

impl Default for Merge {
    fn default() -> Self {
        Self::new()
    }
}

impl Merge {
    pub fn new() -> Self {
        Self {
            policy: merge_or_single(),
            specials: IndexMap::new(),
        }
    }

    /// Set the policy used for fields without an override
    pub fn policy(mut self, policy: Reducer) -> Self {
        self.policy = policy;
        self
    }

    /// Override the policy of a single field.
    ///
    /// Once any override is configured, only objects can be merged.
    pub fn special(mut self, field: impl Into<String>, policy: Reducer) -> Self {
        self.specials.insert(field.into(), policy);
        self
    }

    /// Override the policies of several fields
    pub fn specials<I, K>(mut self, specials: I) -> Self
    where
        I: IntoIterator<Item = (K, Reducer)>,
        K: Into<String>,
    {
        self.specials
            .extend(specials.into_iter().map(|(field, policy)| (field.into(), policy)));
        self
    }

    /// Build the reducer. No policy is invoked here.
    pub fn build(self) -> Reducer {
        let config = Arc::new(MergeConfig {
            policy: self.policy,
            specials: self.specials,
        });
        let initial = config.seed();
        let accumulate = Arc::clone(&config);
        let terminate = config;
        Reducer::from_parts(
            "merge",
            Arc::new(
                move |acc: Accumulator, value: Value| -> Result<Accumulator> {
                    accumulate.accumulate(acc, value)
                },
            ),
            Some(Accumulator::Merge(initial)),
            Some(Arc::new(
                move |acc: Accumulator| -> Result<Option<Value>> { terminate.terminate(acc) },
            )),
        )
    }
}

struct MergeConfig {
    policy: Reducer,
    specials: IndexMap<String, Reducer>,
}

impl MergeConfig {
    fn policy_for(&self, field: &str) -> &Reducer {
        self.specials.get(field).unwrap_or(&self.policy)
    }

    /// Overrides with an initial accumulator are present from the start.
    fn seed(&self) -> MergeStatus {
        let mut status = MergeStatus::default();
        for (field, policy) in &self.specials {
            if let Some(initial) = policy.initial() {
                status.fields.insert(field.clone(), initial);
            }
        }
        status
    }

    fn accumulate(&self, acc: Accumulator, value: Value) -> Result<Accumulator> {
        let mut status = expect_status(acc)?;
        match value {
            Value::Object(map) => {
                status.record(false);
                for (field, value) in map {
                    self.fold_field(&mut status, field, value)?;
                }
            }
            Value::Array(items) if self.specials.is_empty() => {
                status.record(true);
                for (index, value) in items.into_iter().enumerate() {
                    self.fold_field(&mut status, index.to_string(), value)?;
                }
            }
            other => {
                let expected = if self.specials.is_empty() {
                    MERGEABLE
                } else {
                    OBJECT_TYPE
                };
                debug!(actual = type_name(&other), expected, "Rejecting merge input");
                return Err(ReducerError::invalid_type(expected, type_name(&other)).into());
            }
        }
        Ok(Accumulator::Merge(status))
    }

    fn fold_field(&self, status: &mut MergeStatus, field: String, value: Value) -> Result<()> {
        let policy = self.policy_for(&field);
        match status.fields.get_mut(&field) {
            Some(slot) => {
                let acc = std::mem::take(slot);
                *slot = policy.accumulate(acc, value)?;
            }
            None => {
                let acc = policy.step(None, value)?;
                status.fields.insert(field, acc);
            }
        }
        Ok(())
    }

    fn terminate(&self, acc: Accumulator) -> Result<Option<Value>> {
        let status = expect_status(acc)?;
        let array_shaped = status.is_array_shaped();
        let mut merged = Map::new();
        for (field, acc) in status.fields {
            if let Some(value) = self.policy_for(&field).finish(acc)? {
                merged.insert(field, value);
            }
        }
        Ok(Some(into_container(merged, array_shaped)))
    }
}

/// The default nested-field policy of [`merge`].
///
/// Containers are deep-merged recursively. A lone scalar passes through
/// unchanged, but a scalar can never be merged with anything: folding a second
/// value after a scalar, or a scalar after a container, fails with
/// [`ReducerError::InvalidType`]. Zero values fold to `{}`.
pub fn merge_or_single() -> Reducer {
    Reducer::from_parts(
        "mergeOrSingle",
        Arc::new(|acc: Accumulator, value: Value| -> Result<Accumulator> {
            Ok(Accumulator::Merge(deep_accumulate(expect_status(acc)?, value)?))
        }),
        Some(Accumulator::Merge(MergeStatus::default())),
        Some(Arc::new(|acc: Accumulator| -> Result<Option<Value>> {
            Ok(Some(deep_terminate(expect_status(acc)?)?))
        })),
    )
}

fn deep_accumulate(mut status: MergeStatus, value: Value) -> Result<MergeStatus> {
    if let Some(scalar) = &status.scalar {
        return Err(ReducerError::invalid_type(MERGEABLE, type_name(scalar)).into());
    }
    match value {
        Value::Object(map) => {
            status.record(false);
            for (field, value) in map {
                deep_field(&mut status, field, value)?;
            }
        }
        Value::Array(items) => {
            status.record(true);
            for (index, value) in items.into_iter().enumerate() {
                deep_field(&mut status, index.to_string(), value)?;
            }
        }
        scalar if status.folded == 0 => {
            status.folded = 1;
            status.scalar = Some(scalar);
        }
        scalar => {
            debug!(actual = type_name(&scalar), "Rejecting scalar after container");
            return Err(ReducerError::invalid_type(MERGEABLE, type_name(&scalar)).into());
        }
    }
    Ok(status)
}

fn deep_field(status: &mut MergeStatus, field: String, value: Value) -> Result<()> {
    match status.fields.get_mut(&field) {
        Some(slot) => {
            let child = expect_status(std::mem::take(slot))?;
            *slot = Accumulator::Merge(deep_accumulate(child, value)?);
        }
        None => {
            let child = deep_accumulate(MergeStatus::default(), value)?;
            status.fields.insert(field, Accumulator::Merge(child));
        }
    }
    Ok(())
}

fn deep_terminate(status: MergeStatus) -> Result<Value> {
    if let Some(scalar) = status.scalar {
        return Ok(scalar);
    }
    let array_shaped = status.is_array_shaped();
    let mut merged = Map::new();
    for (field, child) in status.fields {
        merged.insert(field, deep_terminate(expect_status(child)?)?);
    }
    Ok(into_container(merged, array_shaped))
}

fn expect_status(acc: Accumulator) -> Result<MergeStatus> {
    match acc {
        Accumulator::Merge(status) => Ok(status),
        other => Err(ReducerError::invalid_type("merge status", other.kind()).into()),
    }
}

fn into_container(fields: Map<String, Value>, array_shaped: bool) -> Value {
    if array_shaped {
        Value::Array(fields.into_iter().map(|(_, value)| value).collect())
    } else {
        Value::Object(fields)
    }
}
