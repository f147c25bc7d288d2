//! Fact registration errors
//!
//! Only collaborator misuse surfaces here. Anything that goes wrong while
//! probing the host (missing facts, failing commands, recursive confines)
//! is logged and absorbed as a nil value instead.

use thiserror::Error;

/// Result type for fact registration
pub type FactResult<T> = Result<T, FactError>;

/// Fact registration errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FactError {
    #[error("Resolution for fact '{0}' has no command or computation")]
    MissingExecution(String),

    #[error("Resolution for fact '{0}' sets more than one execution")]
    ConflictingExecution(String),

    #[error("A fact named '{0}' already exists")]
    DuplicateFact(String),

    #[error("Fact names must not be empty")]
    EmptyName,

    #[error("Interpreter '{0}' is not usable")]
    UnsupportedInterpreter(String),
}

impl FactError {
    /// Stable error code
    pub fn code(&self) -> &'static str {
        match self {
            FactError::MissingExecution(_) => "FACT_MISSING_EXECUTION",
            FactError::ConflictingExecution(_) => "FACT_CONFLICTING_EXECUTION",
            FactError::DuplicateFact(_) => "FACT_DUPLICATE",
            FactError::EmptyName => "FACT_EMPTY_NAME",
            FactError::UnsupportedInterpreter(_) => "FACT_UNSUPPORTED_INTERPRETER",
        }
    }
}
