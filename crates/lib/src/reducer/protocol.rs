//! The reducer protocol: accumulate, an optional initial accumulator and an
//! optional terminate step.

use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use serde_json::Value;
use tracing::trace;

use crate::Result;
use crate::reducer::Accumulator;

/// Combining step of a reducer.
pub type AccumulateFn = Arc<dyn Fn(Accumulator, Value) -> Result<Accumulator> + Send + Sync>;

/// One-time conversion of the final accumulator into the public result.
pub type TerminateFn = Arc<dyn Fn(Accumulator) -> Result<Option<Value>> + Send + Sync>;

/// A reduce policy: how a sequence of values folds into one result.
///
/// A reducer is immutable and can drive any number of folds. Every fold starts
/// from a fresh deep copy of [`Reducer::initial`], so folds never share state.
///
/// # Fold semantics
///
/// Given values `v1..vn`:
/// - with an initial accumulator, `accumulate` runs once per value starting
///   from a copy of it;
/// - without one, `v1` seeds the accumulator and `accumulate` runs for
///   `v2..vn` only (never for a single value);
/// - `terminate`, when present, runs exactly once at the end, even for an
///   empty sequence. It then sees the initial copy, or [`Accumulator::Empty`].
///
/// # Examples
///
/// ```
/// use arbor::reducer::Reducer;
/// use serde_json::{Value, json};
///
/// let sum = Reducer::new(|acc: Value, value: Value| {
///     Ok(json!(acc.as_i64().unwrap_or(0) + value.as_i64().unwrap_or(0)))
/// })
/// .with_initial(json!(0));
///
/// assert_eq!(sum.fold(vec![json!(1), json!(2), json!(3)]).unwrap(), Some(json!(6)));
/// assert_eq!(sum.fold(vec![]).unwrap(), Some(json!(0)));
/// ```
#[derive(Clone)]
pub struct Reducer {
    name: Cow<'static, str>,
    accumulate: AccumulateFn,
    initial: Option<Accumulator>,
    terminate: Option<TerminateFn>,
}

impl Reducer {
    /// Create a reducer from a combining function over plain values.
    ///
    /// The function is not invoked until the reducer folds at least two values
    /// (or one, once an initial accumulator is attached).
    pub fn new<F>(accumulate: F) -> Self
    where
        F: Fn(Value, Value) -> Result<Value> + Send + Sync + 'static,
    {
        Self::from_parts(
            "reduce",
            Arc::new(move |acc: Accumulator, value: Value| -> Result<Accumulator> {
                Ok(Accumulator::Value(accumulate(acc.into_value()?, value)?))
            }),
            None,
            None,
        )
    }

    /// Attach an initial accumulator.
    ///
    /// The reducer owns the value, so later changes to the caller's data never
    /// leak into it. Meant for reducers created with [`Reducer::new`]; the
    /// built-in composite policies rely on their own internal initial state.
    pub fn with_initial(mut self, initial: Value) -> Self {
        self.initial = Some(Accumulator::Value(initial));
        self
    }

    /// Attach a terminate step. `None` stands for undefined on both sides.
    pub fn with_terminate<F>(mut self, terminate: F) -> Self
    where
        F: Fn(Option<Value>) -> Result<Option<Value>> + Send + Sync + 'static,
    {
        self.terminate = Some(Arc::new(move |acc: Accumulator| -> Result<Option<Value>> {
            terminate(acc.into_output()?)
        }));
        self
    }

    /// Rename the reducer. Names only show up in logs and `Debug` output.
    pub fn named(mut self, name: impl Into<Cow<'static, str>>) -> Self {
        self.name = name.into();
        self
    }

    pub(crate) fn from_parts(
        name: impl Into<Cow<'static, str>>,
        accumulate: AccumulateFn,
        initial: Option<Accumulator>,
        terminate: Option<TerminateFn>,
    ) -> Self {
        Self {
            name: name.into(),
            accumulate,
            initial,
            terminate,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn has_initial(&self) -> bool {
        self.initial.is_some()
    }

    pub fn has_terminate(&self) -> bool {
        self.terminate.is_some()
    }

    /// A fresh deep copy of the initial accumulator, if the reducer has one.
    pub fn initial(&self) -> Option<Accumulator> {
        self.initial.clone()
    }

    /// Run the combining step once.
    pub fn accumulate(&self, acc: Accumulator, value: Value) -> Result<Accumulator> {
        (self.accumulate)(acc, value)
    }

    /// Fold one value into an optional running state.
    ///
    /// With no running state the value is folded into a copy of the initial
    /// accumulator, or adopted as the accumulator when there is none. This is
    /// the seeding rule every composite policy applies to its sub-folds.
    pub fn step(&self, state: Option<Accumulator>, value: Value) -> Result<Accumulator> {
        match state {
            Some(acc) => self.accumulate(acc, value),
            None => match self.initial() {
                Some(seed) => self.accumulate(seed, value),
                None => Ok(Accumulator::Value(value)),
            },
        }
    }

    /// Turn a final accumulator into the public result.
    ///
    /// Applies the terminate step when present; otherwise the accumulator is
    /// the result.
    pub fn finish(&self, acc: Accumulator) -> Result<Option<Value>> {
        match &self.terminate {
            Some(terminate) => terminate(acc),
            None => acc.into_output(),
        }
    }

    /// Start an incremental fold.
    pub fn begin(&self) -> Fold<'_> {
        trace!(reducer = %self.name, "Starting fold");
        Fold {
            reducer: self,
            state: self.initial(),
            folded: 0,
        }
    }

    /// Fold a whole sequence, left to right.
    pub fn fold<I>(&self, values: I) -> Result<Option<Value>>
    where
        I: IntoIterator<Item = Value>,
    {
        let mut fold = self.begin();
        for value in values {
            fold.push(value)?;
        }
        fold.finish()
    }
}

impl fmt::Debug for Reducer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Reducer")
            .field("name", &self.name)
            .field("initial", &self.initial)
            .field("terminate", &self.terminate.is_some())
            .finish()
    }
}

/// An in-progress fold of a [`Reducer`].
///
/// Values are pushed one at a time; [`Fold::finish`] consumes the fold and runs
/// the terminate step.
pub struct Fold<'a> {
    reducer: &'a Reducer,
    state: Option<Accumulator>,
    folded: usize,
}

impl Fold<'_> {
    /// Fold the next value.
    pub fn push(&mut self, value: Value) -> Result<()> {
        let state = self.state.take();
        self.state = Some(self.reducer.step(state, value)?);
        self.folded += 1;
        Ok(())
    }

    /// Number of values pushed so far
    pub fn folded(&self) -> usize {
        self.folded
    }

    /// Finish the fold and produce its result.
    pub fn finish(self) -> Result<Option<Value>> {
        trace!(reducer = %self.reducer.name, folded = self.folded, "Finishing fold");
        self.reducer.finish(self.state.unwrap_or_default())
    }
}
