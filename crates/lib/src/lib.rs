//!
//! Arbor: declarative, rule-driven transformation and reduction of tree-shaped data.
//! This library provides composable reduce policies and the drivers that feed them.
//!
//! ## Core Concepts
//!
//! * **Reducers (`reducer::Reducer`)**: A fold protocol made of an accumulate step, an optional initial accumulator and an optional terminate step.
//! * **Policies (`reducer::first`, `reducer::merge`, ...)**: Built-in reducers that compose with each other:
//!     * **Cardinality**: `first`, `last`, `none`, `single`.
//!     * **Collection**: `concat`, `flatten`, `flatten_deep`, `lazy`.
//!     * **Merging**: `merge`, `merge_or_single`, with per-field overrides.
//!     * **Grouping**: `group_by`, `reduce_by`, bucketing records by a key field.
//! * **Policy descriptions (`reducer::PolicySpec`)**: Reducers described as JSON data.
//! * **Rules (`rule::Rule`)**: A condition predicate guarding a body.
//! * **Transformers (`transformer::Transformer`)**: Walk a model, invoke the emitted producers and fold their results.
//!
//! Values are [`serde_json::Value`]s; an absent result (`None`) stands for undefined.

pub mod reducer;
pub mod rule;
pub mod transformer;
pub mod value;

pub use reducer::Reducer;
pub use rule::Rule;
pub use transformer::Transformer;

/// Result type used throughout the Arbor library.
pub type Result<T> = std::result::Result<T, Error>;

/// Common error type for the Arbor library.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    /// Structured reducer errors from the reducer module
    #[error(transparent)]
    Reducer(reducer::ReducerError),
}

impl Error {
    /// Get the originating module for this error.
    pub fn module(&self) -> &'static str {
        match self {
            Error::Reducer(_) => "reducer",
        }
    }

    /// Check if this error is reducer-related.
    pub fn is_reducer_error(&self) -> bool {
        matches!(self, Error::Reducer(_))
    }

    /// Check if this error indicates an invalid configuration argument.
    pub fn is_invalid_argument(&self) -> bool {
        match self {
            Error::Reducer(reducer_err) => reducer_err.is_invalid_argument(),
        }
    }

    /// Check if this error is a cardinality violation (`none` or `single`).
    pub fn is_cardinality_error(&self) -> bool {
        match self {
            Error::Reducer(reducer_err) => reducer_err.is_cardinality_error(),
        }
    }

    /// Check if this error is type-related.
    pub fn is_type_error(&self) -> bool {
        match self {
            Error::Reducer(reducer_err) => reducer_err.is_type_error(),
        }
    }

    /// The caller-facing message of a cardinality violation, if any.
    pub fn message(&self) -> Option<&str> {
        match self {
            Error::Reducer(reducer_err) => reducer_err.message(),
        }
    }
}
