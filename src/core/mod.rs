//! Core model types.
//!
//! This module contains the leaf building blocks of a model:
//! - State contracts via the `State` and `StateDefinition` traits
//! - Guard predicates for transition validity
//! - The keyword `Context` passed to guards and actions
//! - The `LoadStrategy` used by graph lookups

mod context;
mod guard;
mod load_strategy;
mod state;

pub use context::Context;
pub use guard::Guard;
pub use load_strategy::LoadStrategy;
pub use state::{AsAny, ModelRef, State, StateDefinition, StateType};
