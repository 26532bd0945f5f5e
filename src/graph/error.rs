//! Load errors raised by the graph registry.

use thiserror::Error;

/// Errors that can occur while resolving state types and transition sets.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LoadError {
    #[error("Unknown state type '{name}'")]
    UnknownStateType { name: String },

    #[error("State type name '{name}' is already used by another type")]
    NameConflict { name: String },

    #[error("Transition '{transition}' declared by '{declared_by}' does not start from it")]
    SourceMismatch {
        declared_by: String,
        transition: String,
    },
}
