//! Ladon: a model-based execution engine.
//!
//! Ladon represents a system under test (a UI flow, an API workflow) as a
//! directed graph of state types and transitions, then drives a live
//! instance of that model by repeatedly selecting and executing valid
//! transitions from the state it currently occupies.
//!
//! # Core Concepts
//!
//! - **State**: a state type declared through `StateDefinition`, instantiated
//!   by the machine and asked to verify itself after every transition
//! - **Transition**: a guarded, immutable edge with an action
//! - **Graph**: instance-scoped registry that loads state types and their
//!   transitions lazily
//! - **FiniteStateMachine**: a graph plus a current state and the
//!   read → prefilter → validate → select → execute pipeline
//! - **ModelPolicy**: the model author's prefilter and selection hooks
//!
//! # Example
//!
//! ```rust
//! use ladon::core::{Context, LoadStrategy, StateType};
//! use ladon::fsm::{FiniteStateMachine, FirstMatch};
//! use ladon::transition::Transition;
//! use ladon::{model_state, Config};
//!
//! model_state! {
//!     struct Closed;
//!     transitions: vec![Transition::builder()
//!         .from::<Closed>()
//!         .to::<Open>()
//!         .when_context(|ctx| ctx.flag("go"))
//!         .build()
//!         .expect("door transition")];
//! }
//!
//! model_state! {
//!     struct Open;
//!     transitions: Vec::new();
//! }
//!
//! let mut fsm = FiniteStateMachine::new(Config::new()).with_policy(FirstMatch);
//! fsm.use_state_type(StateType::of::<Closed>(), LoadStrategy::Lazy)?;
//!
//! assert!(fsm
//!     .make_transition(LoadStrategy::Lazy, &Context::new().with("go", false), None)
//!     .is_err());
//!
//! let state = fsm.make_transition(LoadStrategy::Lazy, &Context::new().with("go", true), None)?;
//! assert_eq!(state.type_name(), "Open");
//! # Ok::<(), ladon::fsm::ModelError>(())
//! ```

#[macro_use]
mod macros;

pub mod config;
pub mod core;
pub mod fsm;
pub mod graph;
pub mod transition;

// Re-export commonly used types
pub use config::{Config, LogLevel};
pub use crate::core::{Context, Guard, LoadStrategy, ModelRef, State, StateDefinition, StateType};
pub use fsm::{FiniteStateMachine, Fsm, ModelError, ModelPolicy};
pub use graph::{Graph, LoadError};
pub use transition::{Transition, TransitionBuilder};
