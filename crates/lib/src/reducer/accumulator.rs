//! Accumulator states threaded through a fold.
//!
//! Simple policies accumulate plain values. Composite policies (merge, flatten,
//! lazy and the grouping policies) carry an internal state that only their own
//! terminate step knows how to turn into a public result.

use indexmap::IndexMap;
use serde_json::Value;

use crate::Result;
use crate::reducer::ReducerError;
use crate::value::type_name;

/// Per-bucket accumulators of a grouping policy, in first-seen key order.
pub type Buckets = IndexMap<String, Accumulator>;

/// The in-progress aggregate of a fold.
///
/// Cloning an accumulator deep-copies it; no two folds ever share one.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Accumulator {
    /// Nothing accumulated; terminates to `None`
    #[default]
    Empty,
    /// A plain value accumulated by a simple policy
    Value(Value),
    /// State of the merge family of policies
    Merge(MergeStatus),
    /// State of the flatten and lazy policies
    Stream(StreamStatus),
    /// Buckets of the grouping policies
    Groups(Buckets),
}

impl Accumulator {
    /// Returns a human-readable name for this accumulator state
    pub fn kind(&self) -> &'static str {
        match self {
            Accumulator::Empty => "undefined",
            Accumulator::Value(value) => type_name(value),
            Accumulator::Merge(_) => "merge status",
            Accumulator::Stream(_) => "stream status",
            Accumulator::Groups(_) => "group buckets",
        }
    }

    /// Returns true if nothing has been accumulated
    pub fn is_empty(&self) -> bool {
        matches!(self, Accumulator::Empty)
    }

    /// Attempts to view the accumulator as a plain value
    pub fn as_value(&self) -> Option<&Value> {
        match self {
            Accumulator::Value(value) => Some(value),
            _ => None,
        }
    }

    /// Converts a plain accumulator into the value it holds.
    ///
    /// Fails with [`ReducerError::InvalidType`] for `Empty` and for internal
    /// policy states.
    pub fn into_value(self) -> Result<Value> {
        match self {
            Accumulator::Value(value) => Ok(value),
            other => Err(ReducerError::invalid_type("value", other.kind()).into()),
        }
    }

    /// Converts the accumulator into a public result, `None` meaning undefined.
    ///
    /// Internal policy states have no public shape without their terminate step.
    pub fn into_output(self) -> Result<Option<Value>> {
        match self {
            Accumulator::Empty => Ok(None),
            Accumulator::Value(value) => Ok(Some(value)),
            other => Err(ReducerError::invalid_type("value or undefined", other.kind()).into()),
        }
    }
}

impl From<Value> for Accumulator {
    fn from(value: Value) -> Self {
        Accumulator::Value(value)
    }
}

impl From<Option<Value>> for Accumulator {
    fn from(value: Option<Value>) -> Self {
        value.map_or(Accumulator::Empty, Accumulator::Value)
    }
}

/// Accumulated fields of a merge fold.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MergeStatus {
    pub(crate) fields: IndexMap<String, Accumulator>,
    pub(crate) folded: usize,
    pub(crate) all_arrays: bool,
    pub(crate) scalar: Option<Value>,
}

impl MergeStatus {
    /// Number of values folded so far
    pub fn folded(&self) -> usize {
        self.folded
    }

    /// Number of fields accumulated so far
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Check if no field has been accumulated
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Sub-accumulator of a field, if any
    pub fn field(&self, name: &str) -> Option<&Accumulator> {
        self.fields.get(name)
    }

    /// True when at least one value was folded and every one of them was an array.
    pub fn is_array_shaped(&self) -> bool {
        self.folded > 0 && self.all_arrays
    }

    pub(crate) fn record(&mut self, is_array: bool) {
        self.all_arrays = if self.folded == 0 {
            is_array
        } else {
            self.all_arrays && is_array
        };
        self.folded += 1;
    }
}

/// State of a policy that defers to an inner policy once elements arrive.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StreamStatus {
    inner: Option<Box<Accumulator>>,
}

impl StreamStatus {
    /// Check if the inner fold has seen its first element
    pub fn started(&self) -> bool {
        self.inner.is_some()
    }

    pub(crate) fn take(&mut self) -> Option<Accumulator> {
        self.inner.take().map(|inner| *inner)
    }

    pub(crate) fn set(&mut self, inner: Accumulator) {
        self.inner = Some(Box::new(inner));
    }

    pub(crate) fn into_inner(self) -> Option<Accumulator> {
        self.inner.map(|inner| *inner)
    }
}
