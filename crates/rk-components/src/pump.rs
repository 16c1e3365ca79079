//! Pump component model.

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

/// Liquid feed pump.
///
/// ## Model
///
/// ```text
/// h_s   = h(p_out, s_in)
/// h_out = h_in + (h_s - h_in) / eta_s
/// P     = m * (h_out - h_in)
/// ```
///
/// The efficiency residual is written as `eta_s * (h_out - h_in) - (h_s - h_in)`
/// so it stays finite as `eta_s` varies.
///
/// ## Sign Conventions
///
/// - `P` is positive when the pump consumes power.
#[derive(Clone, Debug, PartialEq)]
pub struct Pump {
    pub name: String,
    params: ParamSet,
}

impl Pump {
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

impl ComponentModel for Pump {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> ComponentKind {
        ComponentKind::Pump
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
            params[ETA] * (outlet.h - inlet.h) - (h_s - inlet.h),
        ));
        out.push(Residual::pressure(outlet.p - params[PR] * inlet.p));
        out.push(Residual::power(inlet.m * (outlet.h - inlet.h) - params[POWER]));
        Ok(())
    }

    fn implied_params(&self, ports: &PortStates<'_>) -> ComponentResult<Vec<f64>> {
        let inlet = ports.inlet(0)?;
        let outlet = ports.outlet(0)?;
        let h_s = isentropic_enthalpy(inlet, outlet.p)?;
        Ok(vec![
            ratio(h_s - inlet.h, outlet.h - inlet.h, "pump enthalpy rise")?,
            ratio(outlet.p, inlet.p, "pump inlet pressure")?,
            inlet.m * (outlet.h - inlet.h),
        ])
    }

    fn outputs(&self, ports: &PortStates<'_>, _params: &[f64]) -> ComponentResult<ComponentOutputs> {
        let inlet = ports.inlet(0)?;
        let outlet = ports.outlet(0)?;
        Ok(ComponentOutputs {
            power: Some(watts(inlet.m * (outlet.h - inlet.h))),
            heat_duty: None,
            extras: vec![("pr", ratio(outlet.p, inlet.p, "pump inlet pressure")?)],
        })
    }

    fn propagate_guess(&self, ports: &mut GuessPorts<'_>) -> ComponentResult<bool> {
        let mut changed = ports.share_mass(0, 0);
        changed |= ports.share_pressure(0, 0, self.params.fixed("pr"));

        let fluid = ports.inlets[0].fluid;
        let inlet = ports.inlets[0].values;
        if ports.outlets[0].values.h.is_none() {
            if let (Some(p_in), Some(h_in), Some(p_out)) =
                (inlet.p, inlet.h, ports.outlets[0].values.p)
            {
                let eta = self.params.fixed("eta_s").unwrap_or(DEFAULT_ETA_GUESS);
                let h_s = isentropic_enthalpy_raw(fluid, p_in, h_in, p_out)?;
                changed |= fill(&mut ports.outlets[0].values.h, Some(h_in + (h_s - h_in) / eta));
            }
        }
        Ok(changed)
    }

    fn default_guess(&self, kind: PortKind, _index: usize) -> GuessValues {
        match kind {
            PortKind::Inlet => GuessValues::new(None, Some(1.0e4), Some(2.0e5)),
            PortKind::Outlet => GuessValues::new(None, Some(1.0e7), Some(2.2e5)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::{GuessPort, PortState};
    use rk_core::units::pa;
    use rk_fluids::{FluidModel, Iapws97};

    #[test]
    fn pump_invalid_efficiency() {
        assert!(Pump::new("bad_pump").with_eta_s(1.5).is_err());
    }

    #[test]
    fn pump_outlet_enthalpy_increases() {
        let water = Iapws97::new();
        let h_in = water.saturated_liquid_enthalpy(pa(1.0e4)).unwrap();
        let pump = Pump::new("feed pump").with_eta_s(0.75).unwrap();
        let mut guess = GuessPorts {
            inlets: vec![GuessPort {
                values: GuessValues::new(Some(532.0), Some(1.0e4), Some(h_in)),
                fluid: &water,
            }],
            outlets: vec![GuessPort {
                values: GuessValues::new(None, Some(166.67e5), None),
                fluid: &water,
            }],
        };
        pump.propagate_guess(&mut guess).unwrap();
        let h_out = guess.outlets[0].values.h.unwrap();
        assert!(h_out > h_in);
        assert!((h_out - 2.1417e5).abs() < 500.0, "h_out = {h_out}");
    }

    #[test]
    fn residuals_vanish_with_implied_params() {
        let water = Iapws97::new();
        let h_in = water.saturated_liquid_enthalpy(pa(1.0e4)).unwrap();
        let pump = Pump::new("feed pump");
        let ports = PortStates {
            inlets: vec![PortState {
                m: 10.0,
                p: 1.0e4,
                h: h_in,
                fluid: &water,
            }],
            outlets: vec![PortState {
                m: 10.0,
                p: 1.0e7,
                h: h_in + 1.5e4,
                fluid: &water,
            }],
        };
        let implied = pump.implied_params(&ports).unwrap();
        assert!(implied[ETA] > 0.5 && implied[ETA] < 1.0);
        assert!((implied[POWER] - 1.5e5).abs() < 1e-6);

        let mut out = Vec::new();
        pump.residuals(&ports, &implied, &mut out).unwrap();
        assert!(out.iter().all(|r| r.value.abs() < 1e-6));

        let outputs = pump.outputs(&ports, &implied).unwrap();
        assert!(outputs.power.unwrap().value > 0.0);
    }
}
