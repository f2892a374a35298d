//! Primitive policies: `first`, `last`, `concat`, `none` and `single`.

use std::sync::Arc;

use serde_json::Value;

use crate::Result;
use crate::reducer::{Accumulator, Reducer, ReducerError};

/// Default message of [`none`]
pub const UNEXPECTED_ELEMENT: &str = "element was not expected";
/// Default message of [`single`]
pub const MULTIPLE_ELEMENTS: &str = "a single element was expected";

/// Keeps the first value seen.
pub fn first() -> Reducer {
    Reducer::from_parts(
        "first",
        Arc::new(|acc: Accumulator, _: Value| -> Result<Accumulator> { Ok(acc) }),
        None,
        None,
    )
}

/// Keeps the most recent value.
pub fn last() -> Reducer {
    Reducer::from_parts(
        "last",
        Arc::new(|_: Accumulator, value: Value| -> Result<Accumulator> {
            Ok(Accumulator::Value(value))
        }),
        None,
        None,
    )
}

/// Collects every value into an array, without flattening nested arrays.
pub fn concat() -> Reducer {
    Reducer::from_parts(
        "concat",
        Arc::new(|acc: Accumulator, value: Value| -> Result<Accumulator> {
            match acc {
                Accumulator::Value(Value::Array(mut items)) => {
                    items.push(value);
                    Ok(Accumulator::Value(Value::Array(items)))
                }
                other => Err(ReducerError::invalid_type("array", other.kind()).into()),
            }
        }),
        Some(Accumulator::Value(Value::Array(Vec::new()))),
        None,
    )
}

/// Expects no values at all: zero values fold to undefined, any value fails
/// with [`ReducerError::UnexpectedElement`].
pub fn none() -> Reducer {
    none_with(UNEXPECTED_ELEMENT)
}

/// [`none`] with a caller supplied error message.
pub fn none_with(message: impl Into<String>) -> Reducer {
    let message = message.into();
    Reducer::from_parts(
        "none",
        Arc::new(move |_: Accumulator, _: Value| -> Result<Accumulator> {
            Err(ReducerError::UnexpectedElement {
                message: message.clone(),
            }
            .into())
        }),
        // An empty initial accumulator makes the very first value reach accumulate.
        Some(Accumulator::Empty),
        None,
    )
}

/// Expects at most one value: zero values fold to undefined, one value folds to
/// itself, a second value fails with [`ReducerError::MultipleElements`].
pub fn single() -> Reducer {
    single_with(MULTIPLE_ELEMENTS)
}

/// [`single`] with a caller supplied error message.
pub fn single_with(message: impl Into<String>) -> Reducer {
    let message = message.into();
    Reducer::from_parts(
        "single",
        Arc::new(move |_: Accumulator, _: Value| -> Result<Accumulator> {
            Err(ReducerError::MultipleElements {
                message: message.clone(),
            }
            .into())
        }),
        None,
        None,
    )
}
