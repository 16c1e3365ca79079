//! Error types for solver operations.

use rk_components::ComponentError;
use rk_core::error::RkError;
use rk_fluids::FluidError;
use rk_graph::GraphError;
use rk_results::SolveStatus;
use thiserror::Error;

/// Errors that can occur while setting up or running a solve.
#[derive(Error, Debug, Clone)]
pub enum SolverError {
    #[error("Network error: {0}")]
    Graph(#[from] GraphError),

    /// A property lookup left the fluid model's validity envelope.
    #[error("Property lookup out of range: {0}")]
    OutOfRange(FluidError),

    #[error("Fluid error: {0}")]
    Fluid(FluidError),

    #[error("Component error: {0}")]
    Component(ComponentError),

    #[error("Diverged after {iterations} iterations (residual {residual_norm:.3e}): {reason}")]
    Diverged {
        iterations: usize,
        residual_norm: f64,
        reason: String,
    },

    #[error("No convergence within {iterations} iterations (residual {residual_norm:.3e})")]
    MaxIterationsExceeded {
        iterations: usize,
        residual_norm: f64,
    },

    #[error("Numeric error: {what}")]
    Numeric { what: String },
}

pub type SolverResult<T> = Result<T, SolverError>;

impl From<FluidError> for SolverError {
    fn from(e: FluidError) -> Self {
        if e.is_out_of_range() {
            SolverError::OutOfRange(e)
        } else {
            SolverError::Fluid(e)
        }
    }
}

impl From<ComponentError> for SolverError {
    fn from(e: ComponentError) -> Self {
        match e {
            ComponentError::Fluid(fluid) => fluid.into(),
            other => SolverError::Component(other),
        }
    }
}

impl SolverError {
    /// Status value reported to callers for this failure.
    pub fn status(&self) -> SolveStatus {
        match self {
            SolverError::Graph(GraphError::DegreesOfFreedom { delta }) => {
                SolveStatus::DegreesOfFreedomError { delta: *delta }
            }
            SolverError::Graph(GraphError::OverSpecified { .. }) => SolveStatus::OverSpecifiedError,
            SolverError::Graph(_) => SolveStatus::StructuralError,
            SolverError::OutOfRange(_) => SolveStatus::OutOfRangeError,
            SolverError::MaxIterationsExceeded { .. } => SolveStatus::MaxIterationsExceeded,
            SolverError::Fluid(_)
            | SolverError::Component(_)
            | SolverError::Diverged { .. }
            | SolverError::Numeric { .. } => SolveStatus::Diverged,
        }
    }
}

impl From<SolverError> for RkError {
    fn from(e: SolverError) -> Self {
        match e {
            SolverError::Graph(g) => g.into(),
            SolverError::OutOfRange(f) | SolverError::Fluid(f) => f.into(),
            SolverError::Component(c) => c.into(),
            other => RkError::Invariant {
                what: other.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rk_core::units::pa;
    use rk_fluids::StateInput;

    fn out_of_range() -> FluidError {
        FluidError::OutOfRange {
            what: "pressure below triple point",
            input: StateInput::PH { p: pa(0.0), h: 2.0e6 },
        }
    }

    #[test]
    fn component_fluid_errors_are_unwrapped() {
        let e: SolverError = ComponentError::Fluid(out_of_range()).into();
        assert!(matches!(e, SolverError::OutOfRange(_)));
        assert_eq!(e.status(), SolveStatus::OutOfRangeError);
    }

    #[test]
    fn convergence_failures_map_to_diverged() {
        let e: SolverError = FluidError::ConvergenceFailed { what: "flash" }.into();
        assert_eq!(e.status(), SolveStatus::Diverged);
    }

    #[test]
    fn graph_errors_keep_their_category() {
        let dof = SolverError::Graph(GraphError::DegreesOfFreedom { delta: -1 });
        assert_eq!(dof.status(), SolveStatus::DegreesOfFreedomError { delta: -1 });
        let over = SolverError::Graph(GraphError::OverSpecified { what: "T".into() });
        assert_eq!(over.status(), SolveStatus::OverSpecifiedError);
        let dup = SolverError::Graph(GraphError::DuplicateLabel { label: "1".into() });
        assert_eq!(dup.status(), SolveStatus::StructuralError);
    }
}
