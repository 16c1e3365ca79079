//! Parameter sweeps over one plant input.

use rayon::prelude::*;
use serde::Serialize;
use tracing::info;

use crate::config::{RankineConfig, SweepParameter};
use crate::error::{AppError, AppResult};
use crate::service::{self, PlantReport};
use crate::session::PlantSession;

/// `steps` evenly spaced values from `from` to `to`, both included.
pub fn linspace(from: f64, to: f64, steps: usize) -> Vec<f64> {
    match steps {
        0 => Vec::new(),
        1 => vec![from],
        n => {
            let dx = (to - from) / (n - 1) as f64;
            (0..n)
                .map(|i| if i == n - 1 { to } else { from + dx * i as f64 })
                .collect()
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SweepPoint {
    pub value: f64,
    pub report: PlantReport,
}

#[derive(Debug, Clone, Serialize)]
pub struct SweepResult {
    pub parameter: SweepParameter,
    pub points: Vec<SweepPoint>,
}

impl SweepResult {
    pub fn converged_count(&self) -> usize {
        self.points.iter().filter(|p| p.report.is_converged()).count()
    }
}

/// Solve the plant at each value in turn, each point starting from the
/// previous converged one.
///
/// `base` must be valid; individual points that fail are reported in their
/// own [`PlantReport`].
pub fn sweep(base: &RankineConfig, param: SweepParameter, values: &[f64]) -> AppResult<SweepResult> {
    let mut session = PlantSession::new(base.clone())?;
    let mut points = Vec::with_capacity(values.len());
    for &value in values {
        let report = session.update(base.with(param, value));
        log_point(param, value, &report);
        points.push(SweepPoint { value, report });
    }
    Ok(SweepResult {
        parameter: param,
        points,
    })
}

/// Solve every point on its own network, in parallel and from cold starts.
pub fn sweep_parallel(
    base: &RankineConfig,
    param: SweepParameter,
    values: &[f64],
) -> AppResult<SweepResult> {
    base.validate()?;
    let points = values
        .par_iter()
        .map(|&value| {
            let report = service::run(&base.with(param, value));
            log_point(param, value, &report);
            SweepPoint { value, report }
        })
        .collect();
    Ok(SweepResult {
        parameter: param,
        points,
    })
}

/// Sweep over `steps` values from `from` to `to`.
pub fn sweep_range(
    base: &RankineConfig,
    param: SweepParameter,
    from: f64,
    to: f64,
    steps: usize,
    parallel: bool,
) -> AppResult<SweepResult> {
    if steps == 0 {
        return Err(AppError::InvalidInput("a sweep needs at least one step".into()));
    }
    let values = linspace(from, to, steps);
    if parallel {
        sweep_parallel(base, param, &values)
    } else {
        sweep(base, param, &values)
    }
}

fn log_point(param: SweepParameter, value: f64, report: &PlantReport) {
    let net_power = report.summary.map(|s| s.net_power_w);
    info!(
        parameter = %param,
        value,
        status = %report.status,
        net_power_w = ?net_power,
        "sweep point solved"
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn linspace_includes_both_ends() {
        assert_eq!(linspace(0.0, 1.0, 5), vec![0.0, 0.25, 0.5, 0.75, 1.0]);
        assert_eq!(linspace(2.0, 3.0, 1), vec![2.0]);
        assert!(linspace(2.0, 3.0, 0).is_empty());
    }

    #[test]
    fn zero_steps_is_invalid() {
        let err = sweep_range(
            &RankineConfig::default(),
            SweepParameter::TurbineEtaS,
            0.8,
            0.9,
            0,
            false,
        )
        .unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(_)));
    }

    proptest! {
        #[test]
        fn linspace_is_monotonic(from in -100.0f64..100.0, span in 0.001f64..100.0, steps in 2usize..50) {
            let values = linspace(from, from + span, steps);
            prop_assert_eq!(values.len(), steps);
            prop_assert_eq!(values[0], from);
            prop_assert_eq!(values[steps - 1], from + span);
            for pair in values.windows(2) {
                prop_assert!(pair[1] > pair[0]);
            }
        }
    }
}
