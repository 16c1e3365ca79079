//! Solve status reported to callers.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle and outcome of a solve.
///
/// `Unsolved → Iterating → {Converged, Diverged, MaxIterationsExceeded}`;
/// the `*Error` variants are reached before iteration starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "status")]
pub enum SolveStatus {
    Unsolved,
    Iterating,
    Converged,
    Diverged,
    MaxIterationsExceeded,
    DegreesOfFreedomError { delta: i64 },
    OverSpecifiedError,
    OutOfRangeError,
    StructuralError,
}

impl SolveStatus {
    pub fn is_converged(&self) -> bool {
        matches!(self, SolveStatus::Converged)
    }

    /// True once a solve attempt has finished, successfully or not.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, SolveStatus::Unsolved | SolveStatus::Iterating)
    }

    pub fn label(&self) -> &'static str {
        match self {
            SolveStatus::Unsolved => "Unsolved",
            SolveStatus::Iterating => "Iterating",
            SolveStatus::Converged => "Converged",
            SolveStatus::Diverged => "Diverged",
            SolveStatus::MaxIterationsExceeded => "MaxIterationsExceeded",
            SolveStatus::DegreesOfFreedomError { .. } => "DegreesOfFreedomError",
            SolveStatus::OverSpecifiedError => "OverSpecifiedError",
            SolveStatus::OutOfRangeError => "OutOfRangeError",
            SolveStatus::StructuralError => "StructuralError",
        }
    }
}

impl fmt::Display for SolveStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SolveStatus::DegreesOfFreedomError { delta } => {
                write!(f, "DegreesOfFreedomError(delta={})", delta)
            }
            other => f.write_str(other.label()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terminal_states() {
        assert!(!SolveStatus::Unsolved.is_terminal());
        assert!(!SolveStatus::Iterating.is_terminal());
        assert!(SolveStatus::Diverged.is_terminal());
        assert!(SolveStatus::Converged.is_converged());
        assert!(!SolveStatus::MaxIterationsExceeded.is_converged());
    }

    #[test]
    fn display_includes_delta() {
        let s = SolveStatus::DegreesOfFreedomError { delta: -1 };
        assert_eq!(s.to_string(), "DegreesOfFreedomError(delta=-1)");
    }

    #[test]
    fn serializes_with_tag() {
        let json = serde_json::to_string(&SolveStatus::DegreesOfFreedomError { delta: 1 }).unwrap();
        assert_eq!(json, r#"{"status":"degrees_of_freedom_error","delta":1}"#);
        let back: SolveStatus = serde_json::from_str(&json).unwrap();
        assert_eq!(back, SolveStatus::DegreesOfFreedomError { delta: 1 });
    }
}
