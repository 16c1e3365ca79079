//! Turbine component model.

use crate::common::{DEFAULT_ETA_GUESS, isentropic_enthalpy, isentropic_enthalpy_raw, ratio};
use crate::error::ComponentResult;
use crate::params::{ParamSet, ParamSpec};
use crate::ports::{GuessPorts, GuessValues, PortKind, PortStates, fill};
use crate::residual::Residual;
use crate::traits::{ComponentKind, ComponentModel, ComponentOutputs};
use rk_core::units::watts;

const PARAMS: &[ParamSpec] = &[
    ParamSpec::efficiency("eta_s"),
    ParamSpec::ratio("pr"),
    ParamSpec::power("P"),
];
const ETA: usize = 0;
const PR: usize = 1;
const POWER: usize = 2;

/// Steam turbine for work extraction.
///
/// ## Model
///
/// The outlet pressure is not set by the turbine; it comes from a connection
/// specification or from a fixed pressure ratio. The expansion follows an
/// isentropic efficiency:
///
/// ```text
/// h_s   = h(p_out, s_in)
/// h_out = h_in - eta_s * (h_in - h_s)
/// P     = m * (h_in - h_out)
/// ```
///
/// ## Sign Conventions
///
/// - `P` is positive when the turbine delivers power.
/// - Mass flow is positive when flowing inlet → outlet.
#[derive(Clone, Debug, PartialEq)]
pub struct Turbine {
    /// Component name for debugging
    pub name: String,
    params: ParamSet,
}

impl Turbine {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            params: ParamSet::new(PARAMS),
        }
    }

    /// Fix the isentropic efficiency (0 < eta <= 1).
    pub fn with_eta_s(mut self, eta: f64) -> ComponentResult<Self> {
        self.params.fix("eta_s", eta)?;
        Ok(self)
    }

    pub fn with_pr(mut self, pr: f64) -> ComponentResult<Self> {
        self.params.fix("pr", pr)?;
        Ok(self)
    }
}

impl ComponentModel for Turbine {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> ComponentKind {
        ComponentKind::Turbine
    }

    fn inlet_count(&self) -> usize {
        1
    }

    fn outlet_count(&self) -> usize {
        1
    }

    fn params(&self) -> &ParamSet {
        &self.params
    }

    fn params_mut(&mut self) -> &mut ParamSet {
        &mut self.params
    }

    fn structural_equation_count(&self) -> usize {
        1
    }

    fn residuals(
        &self,
        ports: &PortStates<'_>,
        params: &[f64],
        out: &mut Vec<Residual>,
    ) -> ComponentResult<()> {
        let inlet = ports.inlet(0)?;
        let outlet = ports.outlet(0)?;
        let h_s = isentropic_enthalpy(inlet, outlet.p)?;
        out.push(Residual::mass(outlet.m - inlet.m));
        out.push(Residual::enthalpy(
            (outlet.h - inlet.h) - params[ETA] * (h_s - inlet.h),
        ));
        out.push(Residual::pressure(outlet.p - params[PR] * inlet.p));
        out.push(Residual::power(inlet.m * (inlet.h - outlet.h) - params[POWER]));
        Ok(())
    }

    fn implied_params(&self, ports: &PortStates<'_>) -> ComponentResult<Vec<f64>> {
        let inlet = ports.inlet(0)?;
        let outlet = ports.outlet(0)?;
        let h_s = isentropic_enthalpy(inlet, outlet.p)?;
        Ok(vec![
            ratio(inlet.h - outlet.h, inlet.h - h_s, "turbine isentropic drop")?,
            ratio(outlet.p, inlet.p, "turbine inlet pressure")?,
            inlet.m * (inlet.h - outlet.h),
        ])
    }

    fn outputs(&self, ports: &PortStates<'_>, _params: &[f64]) -> ComponentResult<ComponentOutputs> {
        let inlet = ports.inlet(0)?;
        let outlet = ports.outlet(0)?;
        Ok(ComponentOutputs {
            power: Some(watts(inlet.m * (inlet.h - outlet.h))),
            heat_duty: None,
            extras: vec![("pr", ratio(outlet.p, inlet.p, "turbine inlet pressure")?)],
        })
    }

    fn propagate_guess(&self, ports: &mut GuessPorts<'_>) -> ComponentResult<bool> {
        let mut changed = ports.share_mass(0, 0);
        changed |= ports.share_pressure(0, 0, self.params.fixed("pr"));

        let fluid = ports.inlets[0].fluid;
        let inlet = ports.inlets[0].values;
        let p_out = ports.outlets[0].values.p;
        if ports.outlets[0].values.h.is_none() {
            if let (Some(p_in), Some(h_in), Some(p_out)) = (inlet.p, inlet.h, p_out) {
                let eta = self.params.fixed("eta_s").unwrap_or(DEFAULT_ETA_GUESS);
                let h_s = isentropic_enthalpy_raw(fluid, p_in, h_in, p_out)?;
                changed |= fill(&mut ports.outlets[0].values.h, Some(h_in - eta * (h_in - h_s)));
            } else if let (Some(power), Some(m), Some(h_in)) =
                (self.params.fixed("P"), inlet.m, inlet.h)
            {
                if m.abs() > 0.0 {
                    changed |= fill(&mut ports.outlets[0].values.h, Some(h_in - power / m));
                }
            }
        }
        Ok(changed)
    }

    fn default_guess(&self, kind: PortKind, _index: usize) -> GuessValues {
        match kind {
            PortKind::Inlet => GuessValues::new(None, Some(1.0e7), Some(3.4e6)),
            PortKind::Outlet => GuessValues::new(None, Some(1.0e4), Some(2.3e6)),
        }
    }
}
