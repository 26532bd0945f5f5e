//! Directed edges of a model.
//!
//! A transition knows its source state type, its target (either a type or
//! a late-bound name), a guard deciding when it is valid and an action that
//! drives the system under test across the edge.

mod builder;
mod error;

pub use builder::TransitionBuilder;
pub use error::BuildError;

use crate::core::{Context, Guard, State, StateType};
use std::borrow::Cow;
use std::fmt;

/// Error produced by a transition action.
pub type ActionError = Box<dyn std::error::Error + Send + Sync>;

pub(crate) type Action =
    Box<dyn Fn(&mut dyn State, &Context) -> Result<(), ActionError> + Send + Sync>;

/// Where a transition leads.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TargetRef {
    /// A state type known at declaration time.
    Type(StateType),

    /// A state type looked up by name when the transition executes.
    Name(Cow<'static, str>),
}

impl TargetRef {
    /// Canonical name of the target state type.
    pub fn name(&self) -> &str {
        match self {
            Self::Type(state_type) => state_type.name(),
            Self::Name(name) => name,
        }
    }
}

impl From<StateType> for TargetRef {
    fn from(state_type: StateType) -> Self {
        Self::Type(state_type)
    }
}

impl From<&'static str> for TargetRef {
    fn from(name: &'static str) -> Self {
        Self::Name(Cow::Borrowed(name))
    }
}

impl From<String> for TargetRef {
    fn from(name: String) -> Self {
        Self::Name(Cow::Owned(name))
    }
}

/// An immutable edge from a source state type to a target.
///
/// Build one through [`Transition::builder`].
///
/// # Example
///
/// ```rust
/// use ladon::core::{Context, State, StateDefinition};
/// use ladon::transition::Transition;
///
/// #[derive(Debug, Default)]
/// struct Login;
///
/// impl State for Login {
///     fn type_name(&self) -> &'static str { Self::NAME }
///     fn verify_as_current_state(&self) -> bool { true }
/// }
///
/// impl StateDefinition for Login {
///     const NAME: &'static str = "Login";
///     fn transitions() -> Vec<Transition> {
///         vec![Transition::builder()
///             .from::<Login>()
///             .to_name("Home")
///             .when_context(|ctx| ctx.get_str("password").is_some())
///             .build()
///             .expect("login transition")]
///     }
/// }
///
/// let transitions = Login::transitions();
/// assert_eq!(transitions[0].target_name(), "Home");
/// assert!(transitions[0].target_type().is_none());
/// assert!(!transitions[0].valid_for(&Login, &Context::new()));
/// ```
pub struct Transition {
    source: StateType,
    target: TargetRef,
    guard: Guard,
    action: Option<Action>,
}

impl Transition {
    pub fn builder() -> TransitionBuilder {
        TransitionBuilder::new()
    }

    pub fn source_type(&self) -> StateType {
        self.source
    }

    pub fn target(&self) -> &TargetRef {
        &self.target
    }

    /// Declared name of the target state type.
    pub fn target_name(&self) -> &str {
        self.target.name()
    }

    /// Target type, when it was declared as a type rather than a name.
    pub fn target_type(&self) -> Option<StateType> {
        match &self.target {
            TargetRef::Type(state_type) => Some(*state_type),
            TargetRef::Name(_) => None,
        }
    }

    /// Evaluate the guard against the current state.
    pub fn valid_for(&self, state: &dyn State, context: &Context) -> bool {
        self.guard.check(state, context)
    }

    /// Run the action against the current state.
    ///
    /// A transition without an action succeeds without touching anything.
    pub fn execute(&self, state: &mut dyn State, context: &Context) -> Result<(), ActionError> {
        match &self.action {
            Some(action) => action(state, context),
            None => Ok(()),
        }
    }
}

impl fmt::Debug for Transition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transition")
            .field("source", &self.source)
            .field("target", &self.target)
            .field("has_action", &self.action.is_some())
            .finish()
    }
}

impl fmt::Display for Transition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.source.name(), self.target_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::StateDefinition;

    #[derive(Debug, Default)]
    struct Start {
        visits: u32,
    }

    impl State for Start {
        fn type_name(&self) -> &'static str {
            Self::NAME
        }

        fn verify_as_current_state(&self) -> bool {
            true
        }
    }

    impl StateDefinition for Start {
        const NAME: &'static str = "Start";

        fn transitions() -> Vec<Transition> {
            vec![Transition::builder()
                .from::<Start>()
                .to::<End>()
                .build()
                .unwrap()]
        }
    }

    #[derive(Debug, Default)]
    struct End;

    impl State for End {
        fn type_name(&self) -> &'static str {
            Self::NAME
        }

        fn verify_as_current_state(&self) -> bool {
            true
        }
    }

    impl StateDefinition for End {
        const NAME: &'static str = "End";

        fn transitions() -> Vec<Transition> {
            Vec::new()
        }
    }

    #[test]
    fn typed_target_exposes_type_and_name() {
        let transitions = Start::transitions();
        let transition = &transitions[0];

        assert_eq!(transition.source_type(), StateType::of::<Start>());
        assert_eq!(transition.target_type(), Some(StateType::of::<End>()));
        assert_eq!(transition.target_name(), "End");
    }

    #[test]
    fn named_target_has_no_type() {
        let transition = Transition::builder()
            .from::<Start>()
            .to_name("End")
            .build()
            .unwrap();

        assert_eq!(transition.target_name(), "End");
        assert_eq!(transition.target_type(), None);
        assert_eq!(transition.target(), &TargetRef::from("End"));
    }

    #[test]
    fn target_ref_names_agree() {
        assert_eq!(TargetRef::from(StateType::of::<End>()).name(), "End");
        assert_eq!(TargetRef::from(String::from("End")).name(), "End");
    }

    #[test]
    fn execute_runs_action_against_state() {
        let transition = Transition::builder()
            .from::<Start>()
            .to::<End>()
            .by_state(|start: &mut Start, ctx| {
                start.visits += ctx.get_i64("step").unwrap_or(1) as u32;
                Ok(())
            })
            .build()
            .unwrap();

        let mut start = Start::default();
        transition
            .execute(&mut start, &Context::new().with("step", 2))
            .unwrap();
        assert_eq!(start.visits, 2);
    }

    #[test]
    fn execute_without_action_is_a_no_op() {
        let transition = Transition::builder()
            .from::<Start>()
            .to::<End>()
            .build()
            .unwrap();

        let mut start = Start::default();
        assert!(transition.execute(&mut start, &Context::new()).is_ok());
        assert_eq!(start.visits, 0);
    }

    #[test]
    fn action_errors_are_returned() {
        let transition = Transition::builder()
            .from::<Start>()
            .to::<End>()
            .by(|_, _| Err("button not found".into()))
            .build()
            .unwrap();

        let err = transition
            .execute(&mut Start::default(), &Context::new())
            .unwrap_err();
        assert_eq!(err.to_string(), "button not found");
    }

    #[test]
    fn display_shows_edge() {
        let transitions = Start::transitions();
        assert_eq!(transitions[0].to_string(), "Start -> End");
    }
}
