//! Outcome model: the uniform result of running an interaction.
//!
//! Construction runs validate → execute → finalize exactly once. The
//! resulting value is immutable: `result` is present if and only if `valid`
//! is true, and `valid` is true if and only if `errors` is empty.

use serde::Serialize;

use super::errors::ErrorBag;
use super::ids::RunId;
use super::params::Parameters;
use crate::error::{ExecutionFailure, ValidationError};
use crate::typed::{Input, Interaction, Prepared, Rejection};

/// Message attached under the interaction name when `execute` rejects with
/// an empty error bag.
pub const EMPTY_REJECTION_MESSAGE: &str = "was rejected";

#[derive(Debug, Clone, Serialize)]
pub struct Outcome<R> {
    run_id: RunId,
    interaction: &'static str,
    valid: bool,
    errors: ErrorBag,
    parameters: Parameters,
    result: Option<R>,
}

impl<R> Outcome<R> {
    /// Validates the prepared interaction and executes it if validation
    /// passes.
    ///
    /// `execute` is called at most once. An `Err(Rejection::Fault)` from it
    /// is returned as [`ExecutionFailure`]; no outcome is produced.
    pub fn from_prepared<I>(prepared: Prepared<I>) -> Result<Self, ExecutionFailure>
    where
        I: Interaction<Output = R>,
    {
        let (run_id, interaction, validator) = prepared.into_parts();
        let span = tracing::debug_span!("interaction", name = I::NAME, run_id = %run_id);
        let _guard = span.enter();

        let mut errors = validator.validate();
        if !errors.is_empty() {
            tracing::debug!(fields = errors.len(), "validation failed, skipping execute");
            return Ok(Self::invalid(run_id, I::NAME, errors, validator.into_parameters()));
        }

        let executed = interaction.execute(&Input::new(validator.parameters()));
        let parameters = validator.into_parameters();

        match executed {
            Ok(result) => {
                tracing::debug!("interaction succeeded");
                Ok(Self {
                    run_id,
                    interaction: I::NAME,
                    valid: true,
                    errors,
                    parameters,
                    result: Some(result),
                })
            }
            Err(Rejection::Invalid(rejected)) => {
                // execute の副作用は既に起きている。ロールバックはしない
                if rejected.is_empty() {
                    errors.add(I::NAME, EMPTY_REJECTION_MESSAGE);
                } else {
                    errors.merge(rejected);
                }
                tracing::debug!(fields = errors.len(), "execute rejected the input");
                Ok(Self::invalid(run_id, I::NAME, errors, parameters))
            }
            Err(Rejection::Fault(source)) => {
                tracing::debug!(error = %source, "execute failed");
                Err(ExecutionFailure::new(I::NAME, source))
            }
        }
    }

    fn invalid(
        run_id: RunId,
        interaction: &'static str,
        errors: ErrorBag,
        parameters: Parameters,
    ) -> Self {
        Self {
            run_id,
            interaction,
            valid: false,
            errors,
            parameters,
            result: None,
        }
    }

    pub fn run_id(&self) -> RunId {
        self.run_id
    }

    pub fn interaction(&self) -> &'static str {
        self.interaction
    }

    pub fn is_valid(&self) -> bool {
        self.valid
    }

    pub fn errors(&self) -> &ErrorBag {
        &self.errors
    }

    pub fn parameters(&self) -> &Parameters {
        &self.parameters
    }

    pub fn result(&self) -> Option<&R> {
        self.result.as_ref()
    }

    pub fn into_result(self) -> Option<R> {
        self.result
    }

    /// Dangerous-mode conversion: the raw result, or every field error.
    pub fn into_value(self) -> Result<R, ValidationError> {
        match self.result {
            Some(result) if self.valid => Ok(result),
            _ => Err(ValidationError::new(self.interaction, self.errors)),
        }
    }
}
