//! Builder for constructing transitions.

use super::error::BuildError;
use super::{Action, ActionError, TargetRef, Transition};
use crate::core::{Context, Guard, State, StateDefinition, StateType};
use std::borrow::Cow;

/// Builder for constructing transitions with a fluent API.
#[derive(Default)]
pub struct TransitionBuilder {
    source: Option<StateType>,
    target: Option<TargetRef>,
    guard: Option<Guard>,
    action: Option<Action>,
}

impl TransitionBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the source state type (required).
    pub fn from<S: StateDefinition>(self) -> Self {
        self.from_type(StateType::of::<S>())
    }

    pub fn from_type(mut self, state_type: StateType) -> Self {
        self.source = Some(state_type);
        self
    }

    /// Set the target state type (required unless `to_name` is used).
    pub fn to<S: StateDefinition>(self) -> Self {
        self.to_type(StateType::of::<S>())
    }

    pub fn to_type(mut self, state_type: StateType) -> Self {
        self.target = Some(TargetRef::Type(state_type));
        self
    }

    /// Target a state type by name, resolved when the transition executes.
    pub fn to_name(mut self, name: impl Into<Cow<'static, str>>) -> Self {
        self.target = Some(TargetRef::Name(name.into()));
        self
    }

    /// Set the guard (optional, defaults to always valid).
    pub fn guard(mut self, guard: Guard) -> Self {
        self.guard = Some(guard);
        self
    }

    /// Guard using a closure over the current state and context.
    pub fn when<F>(self, predicate: F) -> Self
    where
        F: Fn(&dyn State, &Context) -> bool + Send + Sync + 'static,
    {
        self.guard(Guard::new(predicate))
    }

    /// Guard using a closure over the context only.
    pub fn when_context<F>(self, predicate: F) -> Self
    where
        F: Fn(&Context) -> bool + Send + Sync + 'static,
    {
        self.guard(Guard::on_context(predicate))
    }

    /// Set the action (optional, defaults to doing nothing).
    pub fn by<F>(mut self, action: F) -> Self
    where
        F: Fn(&mut dyn State, &Context) -> Result<(), ActionError> + Send + Sync + 'static,
    {
        self.action = Some(Box::new(action));
        self
    }

    /// Action over a concrete state type.
    ///
    /// Fails when invoked with a state of another type.
    pub fn by_state<S, F>(self, action: F) -> Self
    where
        S: State,
        F: Fn(&mut S, &Context) -> Result<(), ActionError> + Send + Sync + 'static,
    {
        self.by(move |state, context| {
            let found = state.type_name();
            match state.downcast_mut::<S>() {
                Some(state) => action(state, context),
                None => Err(format!(
                    "action expected state type {}, found {found}",
                    std::any::type_name::<S>()
                )
                .into()),
            }
        })
    }

    /// Build the transition.
    pub fn build(self) -> Result<Transition, BuildError> {
        let source = self.source.ok_or(BuildError::MissingSourceType)?;
        let target = self.target.ok_or(BuildError::MissingTarget)?;

        if target.name().is_empty() {
            return Err(BuildError::EmptyTargetName);
        }

        Ok(Transition {
            source,
            target,
            guard: self.guard.unwrap_or_default(),
            action: self.action,
        })
    }
}
