//! Fluid property errors.

use crate::state::StateInput;
use rk_core::RkError;
use thiserror::Error;

/// Result type for fluid operations.
pub type FluidResult<T> = Result<T, FluidError>;

/// Errors that can occur during fluid property calculations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FluidError {
    /// Non-physical values (negative density, pressure, etc.).
    #[error("Non-physical value for {what}")]
    NonPhysical { what: &'static str },

    /// Requested state lies outside the model's validity envelope.
    #[error("State out of range ({what}): {input:?}")]
    OutOfRange {
        what: &'static str,
        input: StateInput,
    },

    /// Invalid argument.
    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    /// Operation not supported by this model.
    #[error("Not supported: {what}")]
    NotSupported { what: &'static str },

    /// Convergence failure (e.g., solving for T given P,h).
    #[error("Convergence failed for {what}")]
    ConvergenceFailed { what: &'static str },
}

impl FluidError {
    pub fn is_out_of_range(&self) -> bool {
        matches!(self, FluidError::OutOfRange { .. })
    }
}

impl From<FluidError> for RkError {
    fn from(err: FluidError) -> Self {
        match err {
            FluidError::InvalidArg { what } => RkError::InvalidArg { what },
            other => RkError::Invariant {
                what: format!("fluid property error: {other}"),
            },
        }
    }
}
