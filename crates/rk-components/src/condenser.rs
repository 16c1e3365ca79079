//! Two-stream condenser.

use crate::common::ratio;
use crate::error::ComponentResult;
use crate::params::{ParamSet, ParamSpec};
use crate::ports::{GuessPorts, GuessValues, PortKind, PortStates, StateVar, fill};
use crate::residual::Residual;
use crate::traits::{ComponentKind, ComponentModel, ComponentOutputs};
use rk_core::units::{pa, watts};

const PARAMS: &[ParamSpec] = &[
    ParamSpec::ratio("pr1"),
    ParamSpec::ratio("pr2"),
    ParamSpec::power("Q"),
];
const PR1: usize = 0;
const PR2: usize = 1;
const Q: usize = 2;

/// Shell-and-tube condenser with a hot (process) side and a cold (cooling)
/// side.
///
/// Port 0 on each side is the hot stream, port 1 the cooling stream.
///
/// ## Equations
///
/// ```text
/// m_out1 - m_in1                                 = 0
/// m_out2 - m_in2                                 = 0
/// m1 * (h_in1 - h_out1) - m2 * (h_out2 - h_in2)  = 0
/// h_out1 - h'(p_out1)                            = 0   unless subcooling
/// p_out1 - pr1 * p_in1                           = 0   (pr1)
/// p_out2 - pr2 * p_in2                           = 0   (pr2)
/// m1 * (h_in1 - h_out1) - Q                      = 0   (Q)
/// ```
///
/// `Q` is the heat rejected by the hot side (positive when condensing).
#[derive(Clone, Debug, PartialEq)]
pub struct Condenser {
    pub name: String,
    /// Allow a subcooled hot outlet; drops the saturated-liquid equation.
    pub subcooling: bool,
    params: ParamSet,
}

impl Condenser {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            subcooling: false,
            params: ParamSet::new(PARAMS),
        }
    }

    pub fn with_pr1(mut self, pr: f64) -> ComponentResult<Self> {
        self.params.fix("pr1", pr)?;
        Ok(self)
    }

    pub fn with_pr2(mut self, pr: f64) -> ComponentResult<Self> {
        self.params.fix("pr2", pr)?;
        Ok(self)
    }

    pub fn with_subcooling(mut self, subcooling: bool) -> Self {
        self.subcooling = subcooling;
        self
    }

    /// Upper and lower terminal temperature differences [K].
    ///
    /// `ttd_u = Tsat(p_in1) - T_out2`, `ttd_l = T_out1 - T_in2`.
    pub fn terminal_differences(&self, ports: &PortStates<'_>) -> ComponentResult<(f64, f64)> {
        let hot_in = ports.inlet(0)?;
        let hot_out = ports.outlet(0)?;
        let cold_in = ports.inlet(1)?;
        let cold_out = ports.outlet(1)?;
        let t_sat = hot_in.fluid.saturation_temperature(pa(hot_in.p))?.value;
        let ttd_u = t_sat - cold_out.temperature()?;
        let ttd_l = hot_out.temperature()? - cold_in.temperature()?;
        Ok((ttd_u, ttd_l))
    }
}

impl ComponentModel for Condenser {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> ComponentKind {
        ComponentKind::Condenser
    }

    fn inlet_count(&self) -> usize {
        2
    }

    fn outlet_count(&self) -> usize {
        2
    }

    fn params(&self) -> &ParamSet {
        &self.params
    }

    fn params_mut(&mut self) -> &mut ParamSet {
        &mut self.params
    }

    fn structural_equation_count(&self) -> usize {
        if self.subcooling { 3 } else { 4 }
    }

    fn residuals(
        &self,
        ports: &PortStates<'_>,
        params: &[f64],
        out: &mut Vec<Residual>,
    ) -> ComponentResult<()> {
        let hot_in = ports.inlet(0)?;
        let cold_in = ports.inlet(1)?;
        let hot_out = ports.outlet(0)?;
        let cold_out = ports.outlet(1)?;
        let rejected = hot_in.m * (hot_in.h - hot_out.h);

        out.push(Residual::mass(hot_out.m - hot_in.m));
        out.push(Residual::mass(cold_out.m - cold_in.m));
        out.push(Residual::power(
            rejected - cold_in.m * (cold_out.h - cold_in.h),
        ));
        if !self.subcooling {
            let h_liquid = hot_out.fluid.saturated_liquid_enthalpy(pa(hot_out.p))?;
            out.push(Residual::enthalpy(hot_out.h - h_liquid));
        }
        out.push(Residual::pressure(hot_out.p - params[PR1] * hot_in.p));
        out.push(Residual::pressure(cold_out.p - params[PR2] * cold_in.p));
        out.push(Residual::power(rejected - params[Q]));
        Ok(())
    }

    fn implied_params(&self, ports: &PortStates<'_>) -> ComponentResult<Vec<f64>> {
        let hot_in = ports.inlet(0)?;
        let cold_in = ports.inlet(1)?;
        let hot_out = ports.outlet(0)?;
        let cold_out = ports.outlet(1)?;
        Ok(vec![
            ratio(hot_out.p, hot_in.p, "condenser hot inlet pressure")?,
            ratio(cold_out.p, cold_in.p, "condenser cold inlet pressure")?,
            hot_in.m * (hot_in.h - hot_out.h),
        ])
    }

    fn outputs(&self, ports: &PortStates<'_>, _params: &[f64]) -> ComponentResult<ComponentOutputs> {
        let hot_in = ports.inlet(0)?;
        let hot_out = ports.outlet(0)?;
        let mut extras = Vec::new();
        // Terminal differences need saturation data; skip them for models
        // without it.
        if let Ok((ttd_u, ttd_l)) = self.terminal_differences(ports) {
            extras.push(("ttd_u", ttd_u));
            extras.push(("ttd_l", ttd_l));
        }
        Ok(ComponentOutputs {
            power: None,
            heat_duty: Some(watts(hot_in.m * (hot_in.h - hot_out.h))),
            extras,
        })
    }

    fn implied_variables(&self) -> Vec<(PortKind, usize, StateVar)> {
        if self.subcooling {
            return Vec::new();
        }
        vec![
            (PortKind::Outlet, 0, StateVar::Enthalpy),
            (PortKind::Outlet, 0, StateVar::Temperature),
        ]
    }

    fn propagate_guess(&self, ports: &mut GuessPorts<'_>) -> ComponentResult<bool> {
        let mut changed = ports.share_mass(0, 0);
        changed |= ports.share_mass(1, 1);
        changed |= ports.share_pressure(0, 0, self.params.fixed("pr1"));
        changed |= ports.share_pressure(1, 1, self.params.fixed("pr2"));

        if !self.subcooling && ports.outlets[0].values.h.is_none() {
            if let Some(p) = ports.outlets[0].values.p {
                let h = ports.outlets[0].fluid.saturated_liquid_enthalpy(pa(p))?;
                changed |= fill(&mut ports.outlets[0].values.h, Some(h));
            }
        }

        // Cooling flow from the heat balance once all four enthalpies are known.
        let (hot_in, hot_out) = (ports.inlets[0].values, ports.outlets[0].values);
        let (cold_in, cold_out) = (ports.inlets[1].values, ports.outlets[1].values);
        if let (Some(m1), Some(h1), Some(h2), Some(c1), Some(c2)) =
            (hot_in.m, hot_in.h, hot_out.h, cold_in.h, cold_out.h)
        {
            let rise = c2 - c1;
            if rise.abs() > 1.0 {
                let m2 = m1 * (h1 - h2) / rise;
                if m2 > 0.0 {
                    changed |= fill(&mut ports.inlets[1].values.m, Some(m2));
                    changed |= fill(&mut ports.outlets[1].values.m, Some(m2));
                }
            }
        }
        Ok(changed)
    }

    fn default_guess(&self, kind: PortKind, index: usize) -> GuessValues {
        match (kind, index) {
            (PortKind::Inlet, 0) => GuessValues::new(None, Some(1.0e4), Some(2.3e6)),
            (PortKind::Outlet, 0) => GuessValues::new(None, Some(1.0e4), Some(1.9e5)),
            (PortKind::Inlet, _) => GuessValues::new(None, Some(1.2e5), Some(8.4e4)),
            (PortKind::Outlet, _) => GuessValues::new(None, Some(1.2e5), Some(1.25e5)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::{GuessPort, PortState};
    use rk_core::units::k;
    use rk_fluids::{FluidModel, Iapws97};

    struct Sides {
        hot_in: (f64, f64, f64),
        hot_out: (f64, f64, f64),
        cold_in: (f64, f64, f64),
        cold_out: (f64, f64, f64),
    }

    fn states<'a>(water: &'a Iapws97, s: &Sides) -> PortStates<'a> {
        let port = |v: (f64, f64, f64)| PortState {
            m: v.0,
            p: v.1,
            h: v.2,
            fluid: water,
        };
        PortStates {
            inlets: vec![port(s.hot_in), port(s.cold_in)],
            outlets: vec![port(s.hot_out), port(s.cold_out)],
        }
    }

    fn design_point(water: &Iapws97) -> Sides {
        let h_liquid = water.saturated_liquid_enthalpy(pa(1.0e4)).unwrap();
        let h_cw_in = water.h_pt(pa(1.2e5), k(293.15)).unwrap();
        let h_cw_out = water.h_pt(pa(1.176e5), k(303.15)).unwrap();
        let rejected = 532.0 * (2.262e6 - h_liquid);
        let m_cw = rejected / (h_cw_out - h_cw_in);
        Sides {
            hot_in: (532.0, 1.0e4, 2.262e6),
            hot_out: (532.0, 1.0e4, h_liquid),
            cold_in: (m_cw, 1.2e5, h_cw_in),
            cold_out: (m_cw, 1.176e5, h_cw_out),
        }
    }

    #[test]
    fn equation_count_depends_on_subcooling() {
        let c = Condenser::new("main condenser");
        assert_eq!(c.equation_count(), 7);
        assert_eq!(c.implied_variables().len(), 2);
        let c = c.with_subcooling(true);
        assert_eq!(c.equation_count(), 6);
        assert!(c.implied_variables().is_empty());
    }

    #[test]
    fn residuals_vanish_at_design_point() {
        let water = Iapws97::new();
        let sides = design_point(&water);
        let ports = states(&water, &sides);
        let condenser = Condenser::new("main condenser")
            .with_pr1(1.0)
            .unwrap()
            .with_pr2(0.98)
            .unwrap();
        let params = condenser.implied_params(&ports).unwrap();
        assert!((params[PR2] - 0.98).abs() < 1e-12);
        let mut out = Vec::new();
        condenser.residuals(&ports, &params, &mut out).unwrap();
        assert_eq!(out.len(), 7);
        for r in &out {
            assert!(r.value.abs() < 1e-4, "{r:?}");
        }
    }

    #[test]
    fn terminal_differences_reported() {
        let water = Iapws97::new();
        let sides = design_point(&water);
        let ports = states(&water, &sides);
        let condenser = Condenser::new("main condenser");
        let outputs = condenser.outputs(&ports, &[1.0, 0.98, 0.0]).unwrap();
        let ttd_u = outputs.extras.iter().find(|(n, _)| *n == "ttd_u").unwrap().1;
        let ttd_l = outputs.extras.iter().find(|(n, _)| *n == "ttd_l").unwrap().1;
        // Tsat(0.1 bar) is about 45.8 °C
        assert!((ttd_u - 15.8).abs() < 0.2, "ttd_u = {ttd_u}");
        assert!((ttd_l - 25.8).abs() < 0.2, "ttd_l = {ttd_l}");
        assert!(outputs.heat_duty.unwrap().value > 1.0e9);
    }

    #[test]
    fn guess_derives_cooling_flow() {
        let water = Iapws97::new();
        let sides = design_point(&water);
        let condenser = Condenser::new("main condenser").with_pr2(0.98).unwrap();
        let guess = |v: GuessValues| GuessPort {
            values: v,
            fluid: &water,
        };
        let mut ports = GuessPorts {
            inlets: vec![
                guess(GuessValues::new(Some(532.0), Some(1.0e4), Some(2.262e6))),
                guess(GuessValues::new(None, Some(1.2e5), Some(sides.cold_in.2))),
            ],
            outlets: vec![
                guess(GuessValues::new(None, Some(1.0e4), None)),
                guess(GuessValues::new(None, None, Some(sides.cold_out.2))),
            ],
        };
        while condenser.propagate_guess(&mut ports).unwrap() {}
        let m_cw = ports.inlets[1].values.m.unwrap();
        assert!((m_cw - sides.cold_in.0).abs() < 1e-6 * m_cw);
        assert_eq!(ports.outlets[1].values.m, Some(m_cw));
        assert!((ports.outlets[1].values.p.unwrap() - 1.176e5).abs() < 1e-6);
    }
}
