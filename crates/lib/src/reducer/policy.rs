//! Declarative policy descriptions.
//!
//! A [`PolicySpec`] describes a reducer as data, so transformation pipelines can
//! be configured from JSON instead of code. Descriptions are tagged by their
//! `"policy"` field:
//!
//! ```json
//! {"policy": "reduceBy", "key": "id", "bucket": {"policy": "flatten"}}
//! ```
//!
//! Unknown policies and malformed nested descriptions are rejected with
//! [`ReducerError::InvalidArgument`].
//!
//! # Examples
//!
//! ```
//! use arbor::reducer::PolicySpec;
//! use serde_json::json;
//!
//! let spec = PolicySpec::from_value(&json!({
//!     "policy": "merge",
//!     "default": {"policy": "first"},
//!     "specials": {"tags": {"policy": "concat"}}
//! }))
//! .unwrap();
//! let reducer = spec.build().unwrap();
//! assert_eq!(
//!     reducer.fold(vec![json!({"id": 1, "tags": "a"}), json!({"id": 2, "tags": "b"})]).unwrap(),
//!     Some(json!({"id": 1, "tags": ["a", "b"]}))
//! );
//! ```

use std::str::FromStr;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::reducer::{
    Merge, Reducer, ReducerError, concat, first, flatten_deep_with, flatten_with, group_by_with,
    last, lazy, merge_or_single, none, none_with, reduce_by, reduce_by_with, single, single_with,
};
use crate::{Error, Result};

/// A reducer described as data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "policy", rename_all = "camelCase", deny_unknown_fields)]
pub enum PolicySpec {
    /// Keep the first value
    First,
    /// Keep the last value
    Last,
    /// Collect values into an array
    Concat,
    /// Expect no values
    None {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        message: Option<String>,
    },
    /// Expect at most one value
    Single {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        message: Option<String>,
    },
    /// Unwrap one array level into `inner` (default `concat`)
    Flatten {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        inner: Option<Box<PolicySpec>>,
    },
    /// Unwrap arrays recursively into `inner` (default `concat`)
    FlattenDeep {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        inner: Option<Box<PolicySpec>>,
    },
    /// Defer `inner` until the first value; `inner` is required
    Lazy {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        inner: Option<Box<PolicySpec>>,
    },
    /// Merge containers field by field
    Merge {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        default: Option<Box<PolicySpec>>,
        #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
        specials: IndexMap<String, PolicySpec>,
    },
    /// Deep-merge containers, passing a single scalar through
    MergeOrSingle,
    /// Bucket records by `key` into an object of folded buckets
    GroupBy {
        #[serde(default)]
        key: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        bucket: Option<Box<PolicySpec>>,
    },
    /// Bucket records by `key` into an array of folded buckets
    ReduceBy {
        #[serde(default)]
        key: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        bucket: Option<Box<PolicySpec>>,
    },
}

impl PolicySpec {
    /// Parse a description from a JSON value.
    pub fn from_value(value: &Value) -> Result<Self> {
        PolicySpec::deserialize(value).map_err(invalid_description)
    }

    /// Build the described reducer.
    ///
    /// Fails with [`ReducerError::InvalidArgument`] when `lazy` has no inner
    /// policy or a grouping key is empty.
    pub fn build(&self) -> Result<Reducer> {
        let reducer = match self {
            PolicySpec::First => first(),
            PolicySpec::Last => last(),
            PolicySpec::Concat => concat(),
            PolicySpec::None { message: None } => none(),
            PolicySpec::None {
                message: Some(message),
            } => none_with(message.clone()),
            PolicySpec::Single { message: None } => single(),
            PolicySpec::Single {
                message: Some(message),
            } => single_with(message.clone()),
            PolicySpec::Flatten { inner } => flatten_with(build_or(inner, concat)?),
            PolicySpec::FlattenDeep { inner } => flatten_deep_with(build_or(inner, concat)?),
            PolicySpec::Lazy { inner: Some(inner) } => lazy(inner.build()?),
            PolicySpec::Lazy { inner: None } => {
                return Err(ReducerError::invalid_argument("lazy requires an inner policy").into());
            }
            PolicySpec::Merge { default, specials } => {
                let mut merge = Merge::new().policy(build_or(default, merge_or_single)?);
                for (field, spec) in specials {
                    merge = merge.special(field.clone(), spec.build()?);
                }
                merge.build()
            }
            PolicySpec::MergeOrSingle => merge_or_single(),
            PolicySpec::GroupBy { key, bucket } => {
                group_by_with(key.clone(), build_or(bucket, concat)?)?
            }
            PolicySpec::ReduceBy { key, bucket: None } => reduce_by(key.clone())?,
            PolicySpec::ReduceBy {
                key,
                bucket: Some(bucket),
            } => reduce_by_with(key.clone(), bucket.build()?)?,
        };
        Ok(reducer)
    }
}

impl TryFrom<&Value> for PolicySpec {
    type Error = Error;

    fn try_from(value: &Value) -> Result<Self> {
        PolicySpec::from_value(value)
    }
}

impl FromStr for PolicySpec {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        serde_json::from_str(s).map_err(invalid_description)
    }
}

fn build_or(spec: &Option<Box<PolicySpec>>, default: fn() -> Reducer) -> Result<Reducer> {
    match spec {
        Some(spec) => spec.build(),
        None => Ok(default()),
    }
}

fn invalid_description(err: serde_json::Error) -> Error {
    ReducerError::invalid_argument(format!("invalid policy description: {err}")).into()
}
