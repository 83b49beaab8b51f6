use std::error::Error as StdError;

use thiserror::Error;

use crate::domain::ErrorBag;

/// Raised by dangerous-mode runs when validation fails, before or during
/// `execute`. Carries every field error, not just the first.
#[derive(Debug, Clone, Error)]
#[error("{interaction} failed validation: {errors}")]
pub struct ValidationError {
    interaction: &'static str,
    errors: ErrorBag,
}

impl ValidationError {
    pub fn new(interaction: &'static str, errors: ErrorBag) -> Self {
        Self {
            interaction,
            errors,
        }
    }

    pub fn interaction(&self) -> &'static str {
        self.interaction
    }

    pub fn errors(&self) -> &ErrorBag {
        &self.errors
    }

    pub fn into_errors(self) -> ErrorBag {
        self.errors
    }
}

/// An unhandled failure inside `execute`. Never folded into an outcome.
#[derive(Debug, Error)]
#[error("interaction {interaction} failed: {source}")]
pub struct ExecutionFailure {
    interaction: &'static str,
    #[source]
    source: Box<dyn StdError + Send + Sync>,
}

impl ExecutionFailure {
    pub fn new(interaction: &'static str, source: Box<dyn StdError + Send + Sync>) -> Self {
        Self {
            interaction,
            source,
        }
    }

    pub fn interaction(&self) -> &'static str {
        self.interaction
    }

    pub fn into_source(self) -> Box<dyn StdError + Send + Sync> {
        self.source
    }
}

/// Error of a dangerous-mode run.
#[derive(Debug, Error)]
pub enum RunError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Execution(#[from] ExecutionFailure),
}

impl RunError {
    /// Field errors when this is a validation failure.
    pub fn validation_errors(&self) -> Option<&ErrorBag> {
        match self {
            RunError::Validation(e) => Some(e.errors()),
            RunError::Execution(_) => None,
        }
    }
}
