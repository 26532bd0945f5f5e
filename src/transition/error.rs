//! Build errors for the transition builder.

use thiserror::Error;

/// Errors that can occur when building a transition.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BuildError {
    #[error("Transition source state type not specified. Call .from::<S>() or .from_type(..)")]
    MissingSourceType,

    #[error("Transition target not specified. Call .to::<S>(), .to_type(..) or .to_name(..)")]
    MissingTarget,

    #[error("Transition target name must not be empty")]
    EmptyTargetName,
}
