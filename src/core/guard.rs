//! Guard predicates for controlling transition validity.
//!
//! Guards only ever see a shared reference to the current state, so
//! evaluating one cannot mutate the model.

use super::context::Context;
use super::state::State;
use std::fmt;

type Predicate = Box<dyn Fn(&dyn State, &Context) -> bool + Send + Sync>;

/// Predicate deciding whether a transition is usable from the current state.
///
/// # Example
///
/// ```rust
/// use ladon::core::{Context, Guard, State};
///
/// #[derive(Debug, Default)]
/// struct Cart {
///     items: usize,
/// }
///
/// impl State for Cart {
///     fn type_name(&self) -> &'static str {
///         "Cart"
///     }
///
///     fn verify_as_current_state(&self) -> bool {
///         true
///     }
/// }
///
/// let can_checkout = Guard::for_state(|cart: &Cart, _ctx: &Context| cart.items > 0);
///
/// assert!(!can_checkout.check(&Cart { items: 0 }, &Context::new()));
/// assert!(can_checkout.check(&Cart { items: 2 }, &Context::new()));
/// ```
pub struct Guard {
    predicate: Predicate,
}

impl Guard {
    /// Create a guard from a predicate over any state.
    pub fn new<F>(predicate: F) -> Self
    where
        F: Fn(&dyn State, &Context) -> bool + Send + Sync + 'static,
    {
        Guard {
            predicate: Box::new(predicate),
        }
    }

    /// Guard that only inspects the context.
    pub fn on_context<F>(predicate: F) -> Self
    where
        F: Fn(&Context) -> bool + Send + Sync + 'static,
    {
        Self::new(move |_, context| predicate(context))
    }

    /// Guard over a concrete state type.
    ///
    /// Evaluates to `false` when the current state is of another type.
    pub fn for_state<S, F>(predicate: F) -> Self
    where
        S: State,
        F: Fn(&S, &Context) -> bool + Send + Sync + 'static,
    {
        Self::new(move |state, context| {
            state
                .downcast_ref::<S>()
                .is_some_and(|state| predicate(state, context))
        })
    }

    /// Guard that always passes.
    pub fn always() -> Self {
        Self::new(|_, _| true)
    }

    pub fn check(&self, state: &dyn State, context: &Context) -> bool {
        (self.predicate)(state, context)
    }
}

impl Default for Guard {
    fn default() -> Self {
        Self::always()
    }
}

impl fmt::Debug for Guard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Guard")
    }
}
