//! Error types for reducer construction and folding.
//!
//! Every failure raised while building a policy or running values through it is
//! a [`ReducerError`]. Folding never recovers from an error: a failed fold
//! produces no result at all.

use thiserror::Error;

/// Structured error types for reducer operations.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReducerError {
    /// Malformed construction input, such as a missing grouping key or a
    /// policy description that does not describe a policy.
    #[error("Invalid reducer argument: {reason}")]
    InvalidArgument { reason: String },

    /// An element reached a policy that expects none.
    #[error("{message}")]
    UnexpectedElement { message: String },

    /// A second element reached a policy that expects at most one.
    #[error("{message}")]
    MultipleElements { message: String },

    /// A folded value does not have the shape the policy can merge.
    #[error("Invalid value type: expected {expected}, found {actual}")]
    InvalidType { expected: String, actual: String },
}

impl ReducerError {
    /// Build an [`ReducerError::InvalidArgument`] from any displayable reason.
    pub fn invalid_argument(reason: impl Into<String>) -> Self {
        ReducerError::InvalidArgument {
            reason: reason.into(),
        }
    }

    /// Build an [`ReducerError::InvalidType`].
    pub fn invalid_type(expected: impl Into<String>, actual: impl Into<String>) -> Self {
        ReducerError::InvalidType {
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    /// Check if this error was raised while constructing a policy
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, ReducerError::InvalidArgument { .. })
    }

    /// Check if this error was raised by a cardinality policy (`none` or `single`)
    pub fn is_cardinality_error(&self) -> bool {
        matches!(
            self,
            ReducerError::UnexpectedElement { .. } | ReducerError::MultipleElements { .. }
        )
    }

    /// Check if this error is related to value shapes
    pub fn is_type_error(&self) -> bool {
        matches!(self, ReducerError::InvalidType { .. })
    }

    /// Get the caller supplied message of a cardinality error
    pub fn message(&self) -> Option<&str> {
        match self {
            ReducerError::UnexpectedElement { message }
            | ReducerError::MultipleElements { message } => Some(message),
            _ => None,
        }
    }
}

// Conversion from ReducerError to the main Error type
impl From<ReducerError> for crate::Error {
    fn from(err: ReducerError) -> Self {
        crate::Error::Reducer(err)
    }
}
