//! Finite difference Jacobian computation.

use crate::error::{SolverError, SolverResult};
use nalgebra::{DMatrix, DVector};

/// Compute the Jacobian of `f` at `x` by one-sided finite differences.
///
/// Column `j` perturbs `x[j]` by `epsilon * max(|x[j]|, 1)`. The forward
/// difference is used unless `f` fails at the perturbed point (for example
/// a property lookup just outside the valid range), in which case the
/// backward difference is tried. `f_x` is `f(x)`, already known to the
/// caller.
pub fn finite_difference_jacobian<F>(
    x: &DVector<f64>,
    f_x: &DVector<f64>,
    f: F,
    epsilon: f64,
) -> SolverResult<DMatrix<f64>>
where
    F: Fn(&DVector<f64>) -> SolverResult<DVector<f64>>,
{
    let n = x.len();
    let m = f_x.len();

    let mut jac = DMatrix::zeros(m, n);
    let mut x_perturbed = x.clone();

    for j in 0..n {
        let dx = epsilon * x[j].abs().max(1.0);

        x_perturbed[j] = x[j] + dx;
        let column = match f(&x_perturbed) {
            Ok(f_plus) => (f_plus - f_x) / dx,
            Err(forward) => {
                x_perturbed[j] = x[j] - dx;
                match f(&x_perturbed) {
                    Ok(f_minus) => (f_x - f_minus) / dx,
                    Err(_) => return Err(forward),
                }
            }
        };
        x_perturbed[j] = x[j];

        if column.iter().any(|v| !v.is_finite()) {
            return Err(SolverError::Numeric {
                what: format!("non-finite Jacobian column {j}"),
            });
        }
        jac.set_column(j, &column);
    }

    Ok(jac)
}
