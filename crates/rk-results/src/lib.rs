//! rk-results: solve status, converged-result snapshots and the read-only
//! results accessor.

pub mod accessor;
pub mod status;
pub mod types;

pub use accessor::{ComponentView, ConnectionView, Results, ResultsTable};
pub use status::SolveStatus;
pub use types::*;

pub type ResultsResult<T> = Result<T, ResultsError>;

#[derive(thiserror::Error, Debug)]
pub enum ResultsError {
    #[error("Results are not available: solve status is {status}")]
    NotConverged { status: SolveStatus },

    #[error("Connection not found: {label}")]
    ConnectionNotFound { label: String },

    #[error("Component not found: {name}")]
    ComponentNotFound { name: String },

    #[error("Component '{component}' reports no {what}")]
    ValueNotFound { component: String, what: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<ResultsError> for rk_core::RkError {
    fn from(err: ResultsError) -> Self {
        rk_core::RkError::Invariant {
            what: err.to_string(),
        }
    }
}
