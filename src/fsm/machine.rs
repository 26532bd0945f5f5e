//! Finite state machine that executes transitions over a graph.

use super::driver::Driver;
use super::error::ModelError;
use super::policy::{BasePolicy, ModelPolicy};
use crate::config::Config;
use crate::core::{Context, LoadStrategy, ModelRef, State, StateType};
use crate::graph::Graph;
use crate::transition::{TargetRef, Transition};
use std::sync::Arc;
use tracing::{debug, info, info_span, warn};

/// Caller-supplied predicate applied during the prefilter phase.
pub type TransitionFilter<'a> = dyn Fn(&Transition) -> bool + 'a;

struct CurrentState {
    state_type: StateType,
    state: Box<dyn State>,
}

/// An executable [`Graph`]: a graph plus a single current state.
///
/// Every transition goes through five phases:
/// - *Read* the transitions known for the current state's type, loading
///   them if needed
/// - *Prefilter* them with the caller's filter and the policy's
///   `passes_prefilter`
/// - *Validate* the remaining ones against their guards
/// - *Select* one through the policy's `selection_strategy`
/// - *Execute* it, replacing the current state with an instance of the
///   target type and verifying it
///
/// A machine is not meant to be shared: every pipeline call takes
/// `&mut self`, so calls on one machine are serialized.
pub struct FiniteStateMachine<P = BasePolicy> {
    graph: Graph,
    policy: P,
    driver: Option<Box<dyn Driver>>,
    current: Option<CurrentState>,
}

/// Short alias for [`FiniteStateMachine`].
pub type Fsm<P = BasePolicy> = FiniteStateMachine<P>;

impl FiniteStateMachine<BasePolicy> {
    /// Create an uninitialized machine with the base policy.
    pub fn new(config: Config) -> Self {
        Self {
            graph: Graph::new(config),
            policy: BasePolicy,
            driver: None,
            current: None,
        }
    }
}

impl Default for FiniteStateMachine<BasePolicy> {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

impl<P: ModelPolicy> FiniteStateMachine<P> {
    /// Replace the model policy.
    pub fn with_policy<Q: ModelPolicy>(self, policy: Q) -> FiniteStateMachine<Q> {
        FiniteStateMachine {
            graph: self.graph,
            policy,
            driver: self.driver,
            current: self.current,
        }
    }

    /// Register the driver told to settle after each transition action.
    pub fn with_driver(mut self, driver: impl Driver + 'static) -> Self {
        self.driver = Some(Box::new(driver));
        self
    }

    pub fn config(&self) -> &Config {
        self.graph.config()
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn graph_mut(&mut self) -> &mut Graph {
        &mut self.graph
    }

    pub fn policy(&self) -> &P {
        &self.policy
    }

    pub fn policy_mut(&mut self) -> &mut P {
        &mut self.policy
    }

    /// Back-reference handed to every state this machine instantiates.
    pub fn model_ref(&self) -> ModelRef {
        ModelRef::new(self.config().id())
    }

    /// Make an instance of `state_type` the current state.
    ///
    /// Loads the type with `strategy` first if it is not loaded yet.
    pub fn use_state_type(
        &mut self,
        state_type: StateType,
        strategy: LoadStrategy,
    ) -> Result<&dyn State, ModelError> {
        if !self.graph.state_loaded(&state_type) {
            self.graph.load_state_type(state_type, strategy)?;
        }

        let mut state = state_type.instantiate();
        state.attach_model(self.model_ref());
        debug!(
            model = %self.config().id(),
            state = state_type.name(),
            "Current state replaced"
        );

        let current = self.current.insert(CurrentState { state_type, state });
        Ok(&*current.state)
    }

    /// Like [`use_state_type`](Self::use_state_type), for a declared name.
    pub fn use_state_type_named(
        &mut self,
        name: &str,
        strategy: LoadStrategy,
    ) -> Result<&dyn State, ModelError> {
        let state_type = self.graph.resolve(name)?;
        self.use_state_type(state_type, strategy)
    }

    pub fn current_state(&self) -> Option<&dyn State> {
        self.current.as_ref().map(|current| &*current.state)
    }

    pub fn current_state_type(&self) -> Option<StateType> {
        self.current.as_ref().map(|current| current.state_type)
    }

    /// The current state, if it is of type `S`.
    pub fn current_state_as<S: State>(&self) -> Option<&S> {
        self.current_state()
            .and_then(|state| state.downcast_ref::<S>())
    }

    /// Apply `f` to the current state and return its result.
    pub fn with_current_state<R>(&self, f: impl FnOnce(Option<&dyn State>) -> R) -> R {
        f(self.current_state())
    }

    /// Apply `f` to the current state with mutable access limited to the call.
    pub fn with_current_state_mut<R>(&mut self, f: impl FnOnce(Option<&mut dyn State>) -> R) -> R {
        f(self.current.as_mut().map(|current| &mut *current.state))
    }

    /// Prefilter phase.
    ///
    /// Keeps, in order, the transitions accepted by `filter` (when given)
    /// and by the policy's `passes_prefilter`.
    pub fn prefiltered_transitions(
        &self,
        options: &[Arc<Transition>],
        filter: Option<&TransitionFilter<'_>>,
    ) -> Vec<Arc<Transition>> {
        options
            .iter()
            .filter(|transition| {
                filter.is_none_or(|f| f(transition)) && self.policy.passes_prefilter(transition)
            })
            .cloned()
            .collect()
    }

    /// Validate phase: keep the transitions whose guard passes from the current state.
    pub fn valid_transitions(
        &self,
        options: &[Arc<Transition>],
        context: &Context,
    ) -> Result<Vec<Arc<Transition>>, ModelError> {
        let current = self.current_state().ok_or(ModelError::NoCurrentState)?;
        Ok(options
            .iter()
            .filter(|transition| transition.valid_for(current, context))
            .cloned()
            .collect())
    }

    /// Run the full pipeline from the current state.
    ///
    /// `strategy` is used to load the current type's transitions if they
    /// are not loaded yet. `context` is handed to guards and to the action.
    pub fn make_transition(
        &mut self,
        strategy: LoadStrategy,
        context: &Context,
        filter: Option<&TransitionFilter<'_>>,
    ) -> Result<&dyn State, ModelError> {
        let span = info_span!("make_transition", model = %self.config().id());
        let _entered = span.enter();

        let state_type = self.current_state_type().ok_or(ModelError::NoCurrentState)?;
        if !self.graph.transitions_loaded(&state_type) {
            self.graph.load_transitions(state_type, strategy)?;
        }

        let available = self.graph.transitions_for(&state_type).to_vec();
        let prefiltered = self.prefiltered_transitions(&available, filter);
        let valid = self.valid_transitions(&prefiltered, context)?;
        debug!(
            state = state_type.name(),
            available = available.len(),
            prefiltered = prefiltered.len(),
            valid = valid.len(),
            "Transition candidates"
        );

        let index = self.policy.selection_strategy(&valid)?;
        let selected = valid
            .get(index)
            .cloned()
            .ok_or(ModelError::InvalidSelection {
                index,
                candidates: valid.len(),
            })?;

        self.execute_transition(&selected, context)
    }

    /// Run the pipeline, only considering transitions into `target`.
    ///
    /// A type target is reduced to its declared name before the pipeline
    /// starts. When nothing leads there the validated set is empty and the
    /// selection strategy decides what that means.
    pub fn make_transition_to(
        &mut self,
        target: impl Into<TargetRef>,
        strategy: LoadStrategy,
        context: &Context,
        filter: Option<&TransitionFilter<'_>>,
    ) -> Result<&dyn State, ModelError> {
        let target = target.into();
        let name = target.name();
        let leads_to_target = |transition: &Transition| {
            transition.target_name() == name && filter.is_none_or(|f| f(transition))
        };

        self.make_transition(strategy, context, Some(&leads_to_target))
    }

    /// Execute `transition` from the current state.
    ///
    /// The current state is left untouched if the transition does not start
    /// from it, if its target cannot be resolved or if its action fails.
    /// Once the action has run the current state advances, and a failed
    /// verification is reported while the unverified state stays current.
    pub fn execute_transition(
        &mut self,
        transition: &Transition,
        context: &Context,
    ) -> Result<&dyn State, ModelError> {
        let span = info_span!(
            "execute_transition",
            model = %self.config().id(),
            transition = %transition
        );
        let _entered = span.enter();

        let current = self.current.as_mut().ok_or(ModelError::NoCurrentState)?;
        if current.state_type != transition.source_type() {
            return Err(ModelError::InvalidArgument(format!(
                "transition '{transition}' does not start from current state '{}'",
                current.state_type.name()
            )));
        }
        let target = self.graph.resolve_target(transition.target())?;

        transition
            .execute(&mut *current.state, context)
            .map_err(|source| ModelError::ActionFailed {
                transition: transition.to_string(),
                source,
            })?;

        self.use_state_type(target, LoadStrategy::Lazy)?;

        let settle_timeout = self.graph.config().settle_timeout();
        if let Some(driver) = self.driver.as_mut() {
            driver.wait_until_settled(settle_timeout);
        }

        let state = self.current_state().ok_or(ModelError::NoCurrentState)?;
        if !state.verify_as_current_state() {
            warn!(state = target.name(), "Failed to verify current state");
            return Err(ModelError::TransitionFailed {
                state: target.name().to_string(),
            });
        }

        info!(
            from = transition.source_type().name(),
            to = target.name(),
            "Transition complete"
        );
        Ok(state)
    }
}
