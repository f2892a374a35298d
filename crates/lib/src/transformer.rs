//! Model transformation driver.
//!
//! A [`Transformer`] walks an input model with a caller-supplied traversal.
//! The traversal emits producers, functions of the input, which are invoked
//! afterwards; their results are folded through a [`Reducer`].
//!
//! # Examples
//!
//! ```
//! use arbor::transformer::{Emitter, Transformer};
//! use arbor::reducer::merge;
//! use serde_json::{Value, json};
//!
//! let names = Transformer::new(|model: &Value, emitter: &mut Emitter| {
//!     for (index, _) in model["people"].as_array().into_iter().flatten().enumerate() {
//!         emitter.emit(move |model: &Value| {
//!             let person = &model["people"][index];
//!             Ok(json!({ person["id"].to_string(): person["name"] }))
//!         });
//!     }
//!     Ok(())
//! })
//! .with_reducer(merge());
//!
//! let model = json!({"people": [{"id": 1, "name": "Ada"}, {"id": 2, "name": "Alan"}]});
//! assert_eq!(names.transform(&model).unwrap(), Some(json!({"1": "Ada", "2": "Alan"})));
//! ```

use std::fmt;
use std::sync::Arc;

use serde_json::Value;
use tracing::debug;

use crate::Result;
use crate::reducer::{Reducer, concat};

/// A per-node function, invoked with the transformed model.
pub type Producer = Arc<dyn Fn(&Value) -> Result<Value> + Send + Sync>;

type Traversal = Arc<dyn Fn(&Value, &mut Emitter) -> Result<()> + Send + Sync>;

/// Something a traversal emits: a producer, or a nested group of emissions.
#[derive(Clone)]
pub enum Emission {
    Producer(Producer),
    Many(Vec<Emission>),
}

impl Emission {
    /// Wrap a closure as a producer emission
    pub fn producer<F>(producer: F) -> Self
    where
        F: Fn(&Value) -> Result<Value> + Send + Sync + 'static,
    {
        Emission::Producer(Arc::new(producer))
    }

    fn flatten_into(self, out: &mut Vec<Producer>) {
        match self {
            Emission::Producer(producer) => out.push(producer),
            Emission::Many(emissions) => {
                for emission in emissions {
                    emission.flatten_into(out);
                }
            }
        }
    }
}

impl FromIterator<Emission> for Emission {
    fn from_iter<I: IntoIterator<Item = Emission>>(iter: I) -> Self {
        Emission::Many(iter.into_iter().collect())
    }
}

impl fmt::Debug for Emission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Emission::Producer(_) => f.write_str("Producer"),
            Emission::Many(emissions) => f.debug_list().entries(emissions).finish(),
        }
    }
}

/// Collects emissions during a traversal, flattened in emission order.
#[derive(Default)]
pub struct Emitter {
    producers: Vec<Producer>,
}

impl Emitter {
    /// Emit a single producer
    pub fn emit<F>(&mut self, producer: F)
    where
        F: Fn(&Value) -> Result<Value> + Send + Sync + 'static,
    {
        self.producers.push(Arc::new(producer));
    }

    /// Emit a producer or an arbitrarily nested group of producers
    pub fn emit_emission(&mut self, emission: Emission) {
        emission.flatten_into(&mut self.producers);
    }

    /// Emit every item of a sequence of emissions
    pub fn emit_all<I>(&mut self, emissions: I)
    where
        I: IntoIterator<Item = Emission>,
    {
        for emission in emissions {
            self.emit_emission(emission);
        }
    }

    /// Number of producers collected so far
    pub fn len(&self) -> usize {
        self.producers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.producers.is_empty()
    }

    fn into_producers(self) -> Vec<Producer> {
        self.producers
    }
}

/// Traverses a model, invokes the emitted producers and folds their results.
#[derive(Clone)]
pub struct Transformer {
    traversal: Traversal,
    reducer: Reducer,
}

impl Transformer {
    /// Create a transformer that collects produced values with [`concat`].
    ///
    /// Neither the traversal nor any reducer step runs until [`Transformer::transform`].
    pub fn new<F>(traversal: F) -> Self
    where
        F: Fn(&Value, &mut Emitter) -> Result<()> + Send + Sync + 'static,
    {
        Self {
            traversal: Arc::new(traversal),
            reducer: concat(),
        }
    }

    /// Replace the reducer used to fold produced values
    pub fn with_reducer(mut self, reducer: Reducer) -> Self {
        self.reducer = reducer;
        self
    }

    pub fn reducer(&self) -> &Reducer {
        &self.reducer
    }

    /// Run the transformation over `input`.
    ///
    /// The traversal runs once, then each producer runs once with `input`, in
    /// emission order. The produced values are folded through the reducer.
    pub fn transform(&self, input: &Value) -> Result<Option<Value>> {
        let mut emitter = Emitter::default();
        (self.traversal)(input, &mut emitter)?;
        let producers = emitter.into_producers();
        debug!(
            producers = producers.len(),
            reducer = self.reducer.name(),
            "Folding produced values"
        );

        let mut fold = self.reducer.begin();
        for producer in producers {
            fold.push(producer(input)?)?;
        }
        fold.finish()
    }
}

impl fmt::Debug for Transformer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transformer")
            .field("reducer", &self.reducer)
            .finish_non_exhaustive()
    }
}
