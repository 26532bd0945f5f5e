//! Model-level hooks for the transition pipeline.
//!
//! A [`ModelPolicy`] narrows candidates before guards run
//! (`passes_prefilter`) and picks the transition to execute
//! (`selection_strategy`). The base policy has no selection strategy; a
//! model author always has to choose one.

use super::error::ModelError;
use crate::transition::Transition;
use std::sync::Arc;

/// Hooks a model author supplies to a machine.
pub trait ModelPolicy {
    /// Model-level acceptance rule applied during the prefilter phase.
    ///
    /// Accepts everything unless overridden.
    fn passes_prefilter(&self, _transition: &Transition) -> bool {
        true
    }

    /// Pick one of the validated candidates, by index.
    ///
    /// Fails with [`ModelError::MissingImplementation`] unless overridden.
    fn selection_strategy(&mut self, _candidates: &[Arc<Transition>]) -> Result<usize, ModelError> {
        Err(ModelError::MissingImplementation {
            hook: "selection_strategy",
        })
    }

    /// Add a prefilter in front of this policy.
    fn with_prefilter<F>(self, prefilter: F) -> WithPrefilter<Self, F>
    where
        Self: Sized,
        F: Fn(&Transition) -> bool,
    {
        WithPrefilter {
            inner: self,
            prefilter,
        }
    }
}

/// Policy of a machine whose model has not chosen a selection strategy.
#[derive(Clone, Copy, Debug, Default)]
pub struct BasePolicy;

impl ModelPolicy for BasePolicy {}

/// Select the first valid transition in declaration order.
#[derive(Clone, Copy, Debug, Default)]
pub struct FirstMatch;

impl ModelPolicy for FirstMatch {
    fn selection_strategy(&mut self, candidates: &[Arc<Transition>]) -> Result<usize, ModelError> {
        if candidates.is_empty() {
            return Err(ModelError::NoValidTransition);
        }
        Ok(0)
    }
}

/// Require exactly one valid transition.
#[derive(Clone, Copy, Debug, Default)]
pub struct SingleMatch;

impl ModelPolicy for SingleMatch {
    fn selection_strategy(&mut self, candidates: &[Arc<Transition>]) -> Result<usize, ModelError> {
        match candidates.len() {
            0 => Err(ModelError::NoValidTransition),
            1 => Ok(0),
            count => Err(ModelError::AmbiguousSelection { count }),
        }
    }
}

/// Selection strategy injected as a function.
///
/// # Example
///
/// ```rust
/// use ladon::fsm::{ModelError, ModelPolicy, SelectWith};
/// use ladon::transition::Transition;
/// use std::sync::Arc;
///
/// // always take the last candidate
/// let mut policy = SelectWith(|candidates: &[Arc<Transition>]| {
///     candidates
///         .len()
///         .checked_sub(1)
///         .ok_or(ModelError::NoValidTransition)
/// });
///
/// assert!(policy.selection_strategy(&[]).is_err());
/// ```
pub struct SelectWith<F>(pub F);

impl<F> ModelPolicy for SelectWith<F>
where
    F: FnMut(&[Arc<Transition>]) -> Result<usize, ModelError>,
{
    fn selection_strategy(&mut self, candidates: &[Arc<Transition>]) -> Result<usize, ModelError> {
        (self.0)(candidates)
    }
}

/// Policy with an extra model-level prefilter; see [`ModelPolicy::with_prefilter`].
pub struct WithPrefilter<P, F> {
    inner: P,
    prefilter: F,
}

impl<P, F> ModelPolicy for WithPrefilter<P, F>
where
    P: ModelPolicy,
    F: Fn(&Transition) -> bool,
{
    fn passes_prefilter(&self, transition: &Transition) -> bool {
        (self.prefilter)(transition) && self.inner.passes_prefilter(transition)
    }

    fn selection_strategy(&mut self, candidates: &[Arc<Transition>]) -> Result<usize, ModelError> {
        self.inner.selection_strategy(candidates)
    }
}
