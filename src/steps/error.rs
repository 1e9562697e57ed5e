//! Errors surfaced by the step registry

use thiserror::Error;

/// Errors specific to step declaration
///
/// Missing transition targets and empty registries are not errors: they are
/// absorbed by the manager's fallback resolution.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StepError {
    #[error("step '{name}' is already declared")]
    DuplicateName { name: String },
}

impl StepError {
    /// Create a duplicate name error
    pub fn duplicate(name: impl Into<String>) -> Self {
        StepError::DuplicateName { name: name.into() }
    }

    /// Name of the step that caused the error
    pub fn step_name(&self) -> &str {
        match self {
            StepError::DuplicateName { name } => name,
        }
    }
}
