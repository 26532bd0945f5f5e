//! Errors reported by the transition pipeline.

use crate::graph::LoadError;
use crate::transition::ActionError;
use thiserror::Error;

/// Errors that can occur while driving a machine.
///
/// None of these are retried by the machine; any retry policy belongs to
/// the caller or to the selection strategy.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("No current state to validate against")]
    NoCurrentState,

    #[error(transparent)]
    Load(#[from] LoadError),

    #[error("Missing implementation of '{hook}'")]
    MissingImplementation { hook: &'static str },

    #[error("Failed to verify '{state}' as current state")]
    TransitionFailed { state: String },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Selection strategy chose candidate {index} out of {candidates}")]
    InvalidSelection { index: usize, candidates: usize },

    #[error("No valid transition to select")]
    NoValidTransition,

    #[error("Expected exactly one valid transition, found {count}")]
    AmbiguousSelection { count: usize },

    #[error("Action of transition '{transition}' failed: {source}")]
    ActionFailed {
        transition: String,
        #[source]
        source: ActionError,
    },
}
