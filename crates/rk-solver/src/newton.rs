//! Damped Newton iteration on scaled residuals.
//!
//! Residuals are expected to be pre-scaled by their tolerances, so the
//! iteration has converged once every entry has magnitude below one.

use crate::config::SolverConfig;
use crate::error::SolverResult;
use nalgebra::{DMatrix, DVector};
use tracing::debug;

/// Newton solver configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct NewtonConfig {
    /// Maximum iterations
    pub max_iterations: usize,
    /// Iterations without a new best residual before declaring divergence
    pub stall_window: usize,
    /// Step halvings allowed when the trial point cannot be evaluated
    pub max_backtracks: usize,
}

impl Default for NewtonConfig {
    fn default() -> Self {
        Self::from(&SolverConfig::default())
    }
}

impl From<&SolverConfig> for NewtonConfig {
    fn from(config: &SolverConfig) -> Self {
        Self {
            max_iterations: config.max_iterations,
            stall_window: config.stall_window,
            max_backtracks: config.max_backtracks,
        }
    }
}

/// How an iteration ended.
#[derive(Debug, Clone, PartialEq)]
pub enum NewtonOutcome {
    Converged,
    Diverged { reason: String },
    MaxIterationsExceeded,
}

/// Newton iteration result.
///
/// `x` is the last accepted iterate whatever the outcome.
#[derive(Debug, Clone)]
pub struct NewtonResult {
    /// Solution vector
    pub x: DVector<f64>,
    /// Scaled infinity norm of the residual at `x`
    pub residual_norm: f64,
    /// Number of Newton steps taken
    pub iterations: usize,
    pub outcome: NewtonOutcome,
}

impl NewtonResult {
    pub fn converged(&self) -> bool {
        self.outcome == NewtonOutcome::Converged
    }
}

/// Keeps Newton steps inside the domain where residuals can be evaluated.
pub trait StepControl {
    /// Largest fraction of `dx`, in (0, 1], that may be applied at `x`.
    fn max_step(&self, x: &DVector<f64>, dx: &DVector<f64>) -> f64;

    /// Move a trial point back inside hard bounds.
    fn project(&self, x: &mut DVector<f64>);
}

/// No damping and no bounds.
#[derive(Debug, Clone, Copy, Default)]
pub struct Unbounded;

impl StepControl for Unbounded {
    fn max_step(&self, _x: &DVector<f64>, _dx: &DVector<f64>) -> f64 {
        1.0
    }

    fn project(&self, _x: &mut DVector<f64>) {}
}

/// Largest absolute entry; zero for an empty vector.
pub fn inf_norm(v: &DVector<f64>) -> f64 {
    v.iter().fold(0.0_f64, |acc, x| acc.max(x.abs()))
}

/// Newton solver with step limiting, backtracking on evaluation failures
/// and stall detection.
///
/// A failure to evaluate `residual_fn` at `x0` is returned as an error.
/// Every later problem (singular Jacobian, a step that cannot be evaluated
/// even after `max_backtracks` halvings, a stalled residual) ends the
/// iteration with [`NewtonOutcome::Diverged`] and the last good iterate.
pub fn newton_solve<F, J, S>(
    x0: DVector<f64>,
    residual_fn: F,
    jacobian_fn: J,
    step: &S,
    config: &NewtonConfig,
) -> SolverResult<NewtonResult>
where
    F: Fn(&DVector<f64>) -> SolverResult<DVector<f64>>,
    J: Fn(&DVector<f64>, &DVector<f64>) -> SolverResult<DMatrix<f64>>,
    S: StepControl + ?Sized,
{
    let mut x = x0;
    let mut r = residual_fn(&x)?;
    let mut r_norm = inf_norm(&r);
    let mut best = r_norm;
    let mut since_best = 0;

    let finish = |x, residual_norm, iterations, outcome| NewtonResult {
        x,
        residual_norm,
        iterations,
        outcome,
    };
    let diverged = |reason: String| NewtonOutcome::Diverged { reason };

    for iter in 0..config.max_iterations {
        if r_norm < 1.0 {
            return Ok(finish(x, r_norm, iter, NewtonOutcome::Converged));
        }

        let jac = match jacobian_fn(&x, &r) {
            Ok(jac) => jac,
            Err(e) => {
                let reason = diverged(format!("Jacobian evaluation failed: {e}"));
                return Ok(finish(x, r_norm, iter, reason));
            }
        };

        // Solve J * dx = -r
        let dx = match jac.lu().solve(&(-&r)) {
            Some(dx) if dx.iter().all(|v| v.is_finite()) => dx,
            _ => {
                let reason = diverged("singular Jacobian".to_string());
                return Ok(finish(x, r_norm, iter, reason));
            }
        };

        let mut alpha = step.max_step(&x, &dx);
        if !(alpha > 0.0) {
            let reason = diverged("step limit collapsed to zero".to_string());
            return Ok(finish(x, r_norm, iter, reason));
        }
        alpha = alpha.min(1.0);

        let mut accepted = None;
        for _ in 0..=config.max_backtracks {
            let mut trial = &x + &dx * alpha;
            step.project(&mut trial);
            match residual_fn(&trial) {
                Ok(r_trial) if r_trial.iter().all(|v| v.is_finite()) => {
                    accepted = Some((trial, r_trial));
                    break;
                }
                Ok(_) => alpha *= 0.5,
                Err(e) => {
                    debug!(iteration = iter, alpha, error = %e, "trial step rejected");
                    alpha *= 0.5;
                }
            }
        }
        let Some((x_new, r_new)) = accepted else {
            let reason = diverged(format!(
                "residuals could not be evaluated after {} step halvings",
                config.max_backtracks
            ));
            return Ok(finish(x, r_norm, iter, reason));
        };

        x = x_new;
        r = r_new;
        r_norm = inf_norm(&r);
        debug!(iteration = iter + 1, residual = r_norm, step = alpha, "newton step");

        if r_norm < best {
            best = r_norm;
            since_best = 0;
        } else {
            since_best += 1;
            if since_best >= config.stall_window {
                let reason = diverged(format!(
                    "residual did not decrease for {} iterations",
                    config.stall_window
                ));
                return Ok(finish(x, r_norm, iter + 1, reason));
            }
        }
    }

    let outcome = if r_norm < 1.0 {
        NewtonOutcome::Converged
    } else {
        NewtonOutcome::MaxIterationsExceeded
    };
    Ok(finish(x, r_norm, config.max_iterations, outcome))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SolverError;
    use crate::jacobian::finite_difference_jacobian;

    fn fd_jacobian<F>(f: &F) -> impl Fn(&DVector<f64>, &DVector<f64>) -> SolverResult<DMatrix<f64>>
    where
        F: Fn(&DVector<f64>) -> SolverResult<DVector<f64>>,
    {
        move |x, fx| finite_difference_jacobian(x, fx, f, 1e-7)
    }

    #[test]
    fn simple_quadratic() {
        // Solve x^2 - 4 = 0 to 1e-9
        let residual = |x: &DVector<f64>| -> SolverResult<DVector<f64>> {
            Ok(DVector::from_element(1, (x[0] * x[0] - 4.0) / 1e-9))
        };
        let jacobian = |x: &DVector<f64>, _: &DVector<f64>| -> SolverResult<DMatrix<f64>> {
            Ok(DMatrix::from_element(1, 1, 2.0 * x[0] / 1e-9))
        };

        let x0 = DVector::from_element(1, 3.0);
        let result =
            newton_solve(x0, residual, jacobian, &Unbounded, &NewtonConfig::default()).unwrap();

        assert!(result.converged());
        assert!((result.x[0] - 2.0).abs() < 1e-9);
        assert!(result.iterations > 0);
    }

    #[test]
    fn converged_start_takes_no_steps() {
        let residual =
            |_: &DVector<f64>| -> SolverResult<DVector<f64>> { Ok(DVector::from_element(2, 0.5)) };
        let jac = fd_jacobian(&residual);
        let result = newton_solve(
            DVector::zeros(2),
            residual,
            jac,
            &Unbounded,
            &NewtonConfig::default(),
        )
        .unwrap();
        assert!(result.converged());
        assert_eq!(result.iterations, 0);
    }

    #[test]
    fn no_root_stalls_and_diverges() {
        // x^2 + 1 has no real root; Newton wanders without improving
        let residual = |x: &DVector<f64>| -> SolverResult<DVector<f64>> {
            Ok(DVector::from_element(1, (x[0] * x[0] + 1.0) / 1e-6))
        };
        let jac = fd_jacobian(&residual);
        let config = NewtonConfig {
            max_iterations: 500,
            ..NewtonConfig::default()
        };
        let result =
            newton_solve(DVector::from_element(1, 0.7), residual, jac, &Unbounded, &config)
                .unwrap();
        assert!(matches!(result.outcome, NewtonOutcome::Diverged { .. }));
        assert!(result.iterations < 500);
    }

    #[test]
    fn singular_jacobian_diverges() {
        let residual =
            |_: &DVector<f64>| -> SolverResult<DVector<f64>> { Ok(DVector::from_element(1, 5.0)) };
        let jac = fd_jacobian(&residual);
        let result = newton_solve(
            DVector::from_element(1, 1.0),
            residual,
            jac,
            &Unbounded,
            &NewtonConfig::default(),
        )
        .unwrap();
        assert_eq!(
            result.outcome,
            NewtonOutcome::Diverged {
                reason: "singular Jacobian".into()
            }
        );
    }

    #[test]
    fn backtracks_out_of_undefined_region() {
        // ln(x) = 0; the full step from x = 10 lands at a negative x
        let residual = |x: &DVector<f64>| -> SolverResult<DVector<f64>> {
            if x[0] <= 0.0 {
                return Err(SolverError::Numeric {
                    what: "log of non-positive value".into(),
                });
            }
            Ok(DVector::from_element(1, x[0].ln() / 1e-10))
        };
        let jac = fd_jacobian(&residual);
        let result = newton_solve(
            DVector::from_element(1, 10.0),
            residual,
            jac,
            &Unbounded,
            &NewtonConfig::default(),
        )
        .unwrap();
        assert!(result.converged());
        assert!((result.x[0] - 1.0).abs() < 1e-9);
    }

    #[test]
    fn failure_at_start_is_an_error() {
        let residual = |_: &DVector<f64>| -> SolverResult<DVector<f64>> {
            Err(SolverError::Numeric {
                what: "undefined".into(),
            })
        };
        let jac = fd_jacobian(&residual);
        let result = newton_solve(
            DVector::from_element(1, 1.0),
            residual,
            jac,
            &Unbounded,
            &NewtonConfig::default(),
        );
        assert!(result.is_err());
    }

    #[test]
    fn iteration_budget_is_reported() {
        let residual = |x: &DVector<f64>| -> SolverResult<DVector<f64>> {
            Ok(DVector::from_element(1, (x[0] * x[0] - 4.0) / 1e-12))
        };
        let jac = fd_jacobian(&residual);
        let config = NewtonConfig {
            max_iterations: 1,
            ..NewtonConfig::default()
        };
        let result =
            newton_solve(DVector::from_element(1, 100.0), residual, jac, &Unbounded, &config)
                .unwrap();
        assert_eq!(result.outcome, NewtonOutcome::MaxIterationsExceeded);
        assert_eq!(result.iterations, 1);
    }
}
