//! Composable reduce policies.
//!
//! A [`Reducer`] defines how a stream of values is incrementally folded into a
//! single result: a combining step, an optional initial accumulator and an
//! optional terminate step. The policies in this module are built from that
//! protocol and compose with each other.
//!
//! # Policies
//!
//! - [`first`], [`last`], [`concat`] - keep one value, or collect all of them
//! - [`none`], [`single`] - cardinality checks
//! - [`flatten`], [`flatten_deep`] - unwrap arrays into an inner policy
//! - [`lazy`] - defer an inner policy until the first value
//! - [`merge`], [`merge_or_single`] - deep, per-field merging of containers
//! - [`group_by`], [`reduce_by`] - bucket records by key, fold each bucket
//!
//! Policies can also be described as data with [`PolicySpec`].
//!
//! # Examples
//!
//! ```
//! use arbor::reducer::{flatten, reduce_by};
//! use serde_json::json;
//!
//! assert_eq!(
//!     flatten().fold(vec![json!(1), json!([2, [3]])]).unwrap(),
//!     Some(json!([1, 2, [3]]))
//! );
//!
//! let people = reduce_by("id").unwrap();
//! assert_eq!(
//!     people
//!         .fold(vec![json!({"id": 7, "name": "Ada"}), json!({"id": 7, "born": 1815})])
//!         .unwrap(),
//!     Some(json!([{"id": 7, "name": "Ada", "born": 1815}]))
//! );
//! ```

pub mod accumulator;
pub mod errors;
pub mod flatten;
pub mod group;
pub mod merge;
pub mod policy;
pub mod primitive;
mod protocol;

pub use accumulator::{Accumulator, Buckets, MergeStatus, StreamStatus};
pub use errors::ReducerError;
pub use flatten::{flatten, flatten_deep, flatten_deep_with, flatten_with, lazy};
pub use group::{group_by, group_by_with, reduce_by, reduce_by_with};
pub use merge::{Merge, merge, merge_or_single, merge_with};
pub use policy::PolicySpec;
pub use primitive::{concat, first, last, none, none_with, single, single_with};
pub use protocol::{AccumulateFn, Fold, Reducer, TerminateFn};
