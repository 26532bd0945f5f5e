//! Executable models.
//!
//! This module turns a [`Graph`](crate::graph::Graph) into a running
//! machine with a current state and the transition pipeline, plus the
//! seams a model author plugs into it:
//!
//! - **Policy**: `passes_prefilter` and `selection_strategy` hooks
//! - **Driver**: settles the system under test after each action
//! - **Errors**: everything the pipeline reports

mod driver;
mod error;
mod machine;
mod policy;

pub use driver::Driver;
pub use error::ModelError;
pub use machine::{FiniteStateMachine, Fsm, TransitionFilter};
pub use policy::{BasePolicy, FirstMatch, ModelPolicy, SelectWith, SingleMatch, WithPrefilter};
