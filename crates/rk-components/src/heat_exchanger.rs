//! Single-stream heat exchanger (boiler / steam generator).

use crate::common::ratio;
use crate::error::ComponentResult;
use crate::params::{ParamSet, ParamSpec};
use crate::ports::{GuessPorts, GuessValues, PortKind, PortStates, fill};
use crate::residual::Residual;
use crate::traits::{ComponentKind, ComponentModel, ComponentOutputs};
use rk_core::units::watts;

const PARAMS: &[ParamSpec] = &[ParamSpec::ratio("pr"), ParamSpec::power("Q")];
const PR: usize = 0;
const Q: usize = 1;

/// One inlet, one outlet; heat is added or removed across the wall.
///
/// ## Equations
///
/// ```text
/// m_out - m_in          = 0
/// p_out - pr * p_in     = 0        (pr)
/// m * (h_out - h_in) - Q = 0       (Q)
/// ```
///
/// `Q` is positive when heat enters the fluid.
#[derive(Clone, Debug, PartialEq)]
pub struct SimpleHeatExchanger {
    pub name: String,
    params: ParamSet,
}

impl SimpleHeatExchanger {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            params: ParamSet::new(PARAMS),
        }
    }

    pub fn with_pr(mut self, pr: f64) -> ComponentResult<Self> {
        self.params.fix("pr", pr)?;
        Ok(self)
    }

    pub fn with_heat(mut self, q: f64) -> ComponentResult<Self> {
        self.params.fix("Q", q)?;
        Ok(self)
    }
}

impl ComponentModel for SimpleHeatExchanger {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> ComponentKind {
        ComponentKind::SimpleHeatExchanger
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
        out.push(Residual::mass(outlet.m - inlet.m));
        out.push(Residual::pressure(outlet.p - params[PR] * inlet.p));
        out.push(Residual::power(inlet.m * (outlet.h - inlet.h) - params[Q]));
        Ok(())
    }

    fn implied_params(&self, ports: &PortStates<'_>) -> ComponentResult<Vec<f64>> {
        let inlet = ports.inlet(0)?;
        let outlet = ports.outlet(0)?;
        Ok(vec![
            ratio(outlet.p, inlet.p, "heat exchanger inlet pressure")?,
            inlet.m * (outlet.h - inlet.h),
        ])
    }

    fn outputs(&self, ports: &PortStates<'_>, _params: &[f64]) -> ComponentResult<ComponentOutputs> {
        let inlet = ports.inlet(0)?;
        let outlet = ports.outlet(0)?;
        Ok(ComponentOutputs {
            heat_duty: Some(watts(inlet.m * (outlet.h - inlet.h))),
            ..ComponentOutputs::default()
        })
    }

    fn propagate_guess(&self, ports: &mut GuessPorts<'_>) -> ComponentResult<bool> {
        let mut changed = ports.share_mass(0, 0);
        changed |= ports.share_pressure(0, 0, self.params.fixed("pr"));
        if let Some(q) = self.params.fixed("Q") {
            let m = ports.inlets[0].values.m;
            let h_in = ports.inlets[0].values.h;
            let h_out = ports.outlets[0].values.h;
            if let Some(m) = m.filter(|m| m.abs() > 0.0) {
                changed |= fill(&mut ports.outlets[0].values.h, h_in.map(|h| h + q / m));
                changed |= fill(&mut ports.inlets[0].values.h, h_out.map(|h| h - q / m));
            }
        }
        Ok(changed)
    }

    fn default_guess(&self, kind: PortKind, _index: usize) -> GuessValues {
        match kind {
            PortKind::Inlet => GuessValues::new(None, None, Some(2.0e5)),
            PortKind::Outlet => GuessValues::new(None, None, Some(3.0e6)),
        }
    }
}
