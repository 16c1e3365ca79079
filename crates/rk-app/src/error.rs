//! Error types for the rk-app service layer.

use std::path::PathBuf;

use rk_components::ComponentError;
use rk_core::RkError;
use rk_graph::GraphError;
use rk_results::{ResultsError, SolveStatus};
use rk_solver::SolverError;

/// Application error type that wraps errors from the backend crates and
/// gives the CLI one error to report.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Failed to read config file: {path}")]
    ConfigRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    ConfigParse(#[from] serde_yaml::Error),

    /// A configuration value outside its documented range.
    #[error("{field} = {value} is outside the valid range {range}")]
    OutOfRange {
        field: &'static str,
        value: f64,
        range: String,
    },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Network error: {0}")]
    Graph(#[from] GraphError),

    #[error("Component error: {0}")]
    Component(#[from] ComponentError),

    #[error("Solver error: {0}")]
    Solver(#[from] SolverError),

    #[error("Results error: {0}")]
    Results(#[from] ResultsError),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for rk-app operations.
pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    /// Status value reported for this failure.
    pub fn status(&self) -> SolveStatus {
        match self {
            AppError::OutOfRange { .. } => SolveStatus::OutOfRangeError,
            AppError::Solver(e) => e.status(),
            AppError::Graph(e) => SolverError::from(e.clone()).status(),
            AppError::Results(ResultsError::NotConverged { status }) => *status,
            _ => SolveStatus::StructuralError,
        }
    }
}

impl From<AppError> for RkError {
    fn from(err: AppError) -> Self {
        match err {
            AppError::Graph(e) => e.into(),
            AppError::Component(e) => e.into(),
            AppError::Solver(e) => e.into(),
            AppError::Results(e) => e.into(),
            other => RkError::Invariant {
                what: other.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn out_of_range_names_the_field() {
        let err = AppError::OutOfRange {
            field: "condenser_p",
            value: 0.0,
            range: "(0, 220.64) bar".into(),
        };
        assert_eq!(err.status(), SolveStatus::OutOfRangeError);
        assert!(err.to_string().contains("condenser_p = 0"));
    }

    #[test]
    fn graph_errors_map_like_solver_errors() {
        let err = AppError::from(GraphError::DegreesOfFreedom { delta: 2 });
        assert_eq!(err.status(), SolveStatus::DegreesOfFreedomError { delta: 2 });
    }
}
