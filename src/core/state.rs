//! State contracts for model states.
//!
//! A model has two views of a state: the *runtime instance* the machine
//! currently occupies ([`State`]) and the *static declaration* of a state
//! type with its outgoing transitions ([`StateDefinition`]). The
//! [`StateType`] descriptor is the value the graph stores and loads.

use crate::transition::Transition;
use serde::{Deserialize, Serialize};
use std::any::{Any, TypeId};
use std::fmt::{self, Debug};

/// Upcast helper so guards and actions can downcast `&dyn State`.
///
/// Implemented for every `'static` type; never implement it by hand.
pub trait AsAny: Any {
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Non-owning reference from a state instance back to the machine that owns it.
///
/// The machine owns its current state; a state only learns the identity of
/// its owner, which is the machine's configuration id.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ModelRef {
    model_id: String,
}

impl ModelRef {
    pub fn new(model_id: impl Into<String>) -> Self {
        Self {
            model_id: model_id.into(),
        }
    }

    /// Identifier of the owning machine.
    pub fn model_id(&self) -> &str {
        &self.model_id
    }
}

/// Runtime contract for a state instance.
///
/// # Example
///
/// ```rust
/// use ladon::core::State;
///
/// #[derive(Debug, Default)]
/// struct Dashboard {
///     loaded: bool,
/// }
///
/// impl State for Dashboard {
///     fn type_name(&self) -> &'static str {
///         "Dashboard"
///     }
///
///     fn verify_as_current_state(&self) -> bool {
///         self.loaded
///     }
/// }
///
/// assert!(!Dashboard::default().verify_as_current_state());
/// ```
pub trait State: AsAny + Debug + Send + 'static {
    /// Declared name of this state's type.
    fn type_name(&self) -> &'static str;

    /// Check that the system under test really is in this state.
    fn verify_as_current_state(&self) -> bool;

    /// Receive the back-reference to the owning machine.
    ///
    /// Called once, right after instantiation. The default discards it.
    fn attach_model(&mut self, _model: ModelRef) {}
}

impl dyn State {
    /// Downcast to a concrete state type.
    pub fn downcast_ref<S: State>(&self) -> Option<&S> {
        self.as_any().downcast_ref::<S>()
    }

    /// Mutable downcast to a concrete state type.
    pub fn downcast_mut<S: State>(&mut self) -> Option<&mut S> {
        self.as_any_mut().downcast_mut::<S>()
    }

    /// True when this instance is of state type `S`.
    pub fn is<S: State>(&self) -> bool {
        self.as_any().is::<S>()
    }
}

/// Static declaration of a state type.
///
/// Instances are constructed with no arguments through `Default`; the
/// outgoing transitions are declared by [`StateDefinition::transitions`],
/// which the graph calls at most once per machine.
pub trait StateDefinition: State + Default + Sized {
    /// Name used for late-bound lookups and target matching.
    const NAME: &'static str;

    /// Outgoing transitions, in declaration order.
    fn transitions() -> Vec<Transition>;
}

/// Descriptor of a declared state type.
///
/// A `StateType` is a plain `Copy` value: passing one around never loads
/// anything. Two descriptors are equal when they describe the same Rust type.
#[derive(Clone, Copy)]
pub struct StateType {
    name: &'static str,
    type_id: TypeId,
    create: fn() -> Box<dyn State>,
    transitions: fn() -> Vec<Transition>,
}

impl StateType {
    /// Descriptor for the state type `S`.
    pub fn of<S: StateDefinition>() -> Self {
        fn create<S: StateDefinition>() -> Box<dyn State> {
            Box::new(S::default())
        }

        Self {
            name: S::NAME,
            type_id: TypeId::of::<S>(),
            create: create::<S>,
            transitions: S::transitions,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// True when `state` is an instance of this type.
    pub fn describes(&self, state: &dyn State) -> bool {
        state.as_any().type_id() == self.type_id
    }

    pub(crate) fn instantiate(&self) -> Box<dyn State> {
        (self.create)()
    }

    pub(crate) fn declared_transitions(&self) -> Vec<Transition> {
        (self.transitions)()
    }
}

impl PartialEq for StateType {
    fn eq(&self, other: &Self) -> bool {
        self.type_id == other.type_id && self.name == other.name
    }
}

impl Eq for StateType {}

impl Debug for StateType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("StateType").field(&self.name).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default)]
    struct Home {
        model: Option<ModelRef>,
    }

    impl State for Home {
        fn type_name(&self) -> &'static str {
            Self::NAME
        }

        fn verify_as_current_state(&self) -> bool {
            true
        }

        fn attach_model(&mut self, model: ModelRef) {
            self.model = Some(model);
        }
    }

    impl StateDefinition for Home {
        const NAME: &'static str = "Home";

        fn transitions() -> Vec<Transition> {
            Vec::new()
        }
    }

    #[derive(Debug, Default)]
    struct Settings;

    impl State for Settings {
        fn type_name(&self) -> &'static str {
            Self::NAME
        }

        fn verify_as_current_state(&self) -> bool {
            false
        }
    }

    impl StateDefinition for Settings {
        const NAME: &'static str = "Settings";

        fn transitions() -> Vec<Transition> {
            Vec::new()
        }
    }

    #[test]
    fn state_type_uses_declared_name() {
        assert_eq!(StateType::of::<Home>().name(), "Home");
        assert_eq!(StateType::of::<Settings>().name(), "Settings");
    }

    #[test]
    fn state_types_compare_by_rust_type() {
        assert_eq!(StateType::of::<Home>(), StateType::of::<Home>());
        assert_ne!(StateType::of::<Home>(), StateType::of::<Settings>());
    }

    #[test]
    fn instantiate_builds_default_instance() {
        let home_type = StateType::of::<Home>();
        let state = home_type.instantiate();

        assert_eq!(state.type_name(), "Home");
        assert!(home_type.describes(state.as_ref()));
        assert!(!StateType::of::<Settings>().describes(state.as_ref()));
    }

    #[test]
    fn dyn_state_downcasts_to_concrete_type() {
        let mut state: Box<dyn State> = Box::new(Home::default());
        state.attach_model(ModelRef::new("model-1"));

        assert!(state.is::<Home>());
        assert!(state.downcast_ref::<Settings>().is_none());

        let home = state.downcast_ref::<Home>().unwrap();
        assert_eq!(home.model.as_ref().unwrap().model_id(), "model-1");
    }

    #[test]
    fn default_attach_model_is_a_no_op() {
        let mut settings = Settings;
        settings.attach_model(ModelRef::new("ignored"));
        assert!(!settings.verify_as_current_state());
    }
}
