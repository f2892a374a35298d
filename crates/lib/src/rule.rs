//! Guarded functions: a condition predicate paired with a body.
//!
//! Traversals typically hold a list of rules and invoke each of them on every
//! node of a model, emitting whatever the matching bodies return.

use std::fmt;
use std::sync::Arc;

type Condition<A> = Arc<dyn Fn(&A) -> bool + Send + Sync>;
type Body<A, T> = Arc<dyn Fn(&A) -> T + Send + Sync>;

/// A body that only runs when its condition holds.
///
/// # Examples
///
/// ```
/// use arbor::rule::Rule;
/// use serde_json::{Value, json};
///
/// let is_person = Rule::new(
///     |node: &Value| node.get("kind") == Some(&json!("person")),
///     |node: &Value| node["name"].clone(),
/// );
/// assert_eq!(is_person.invoke(&json!({"kind": "person", "name": "Ada"})), Some(json!("Ada")));
/// assert_eq!(is_person.invoke(&json!({"kind": "place"})), None);
/// ```
pub struct Rule<A: ?Sized, T> {
    condition: Condition<A>,
    body: Body<A, T>,
}

impl<A: ?Sized, T> Rule<A, T> {
    /// Pair a condition with a body. Neither is invoked here.
    pub fn new<C, B>(condition: C, body: B) -> Self
    where
        C: Fn(&A) -> bool + Send + Sync + 'static,
        B: Fn(&A) -> T + Send + Sync + 'static,
    {
        Self {
            condition: Arc::new(condition),
            body: Arc::new(body),
        }
    }

    /// Evaluate the condition once and, when it holds, return the body's result.
    pub fn invoke(&self, args: &A) -> Option<T> {
        if (self.condition)(args) {
            Some((self.body)(args))
        } else {
            None
        }
    }

    /// Check the condition without running the body
    pub fn matches(&self, args: &A) -> bool {
        (self.condition)(args)
    }
}

impl<A: ?Sized, T> Clone for Rule<A, T> {
    fn clone(&self) -> Self {
        Self {
            condition: Arc::clone(&self.condition),
            body: Arc::clone(&self.body),
        }
    }
}

impl<A: ?Sized, T> fmt::Debug for Rule<A, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule").finish_non_exhaustive()
    }
}

/// Condition that always holds
pub fn always<A: ?Sized>(_: &A) -> bool {
    true
}

/// Condition that never holds
pub fn never<A: ?Sized>(_: &A) -> bool {
    false
}
