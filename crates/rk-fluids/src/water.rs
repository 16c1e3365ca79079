//! Water/steam property model backed by IAPWS-IF97.

use crate::composition::Composition;
use crate::error::FluidResult;
use crate::if97::{self, Point, Region};
use crate::model::FluidModel;
use crate::state::{Phase, SpecEnthalpy, StateInput, ThermoState};
use rk_core::units::{Density, Pressure, Temperature, k, pa};
use uom::si::mass_density::kilogram_per_cubic_meter;

/// Lowest enthalpy reachable in regions 1/2 (liquid near 0 °C) [J/kg].
const H_FLOOR: f64 = -1.0e3;
/// Highest enthalpy reachable in region 2 (vapor at 800 °C, low pressure) [J/kg].
const H_CEILING: f64 = 4.2e6;

/// IAPWS-IF97 water and steam (regions 1, 2 and 4).
#[derive(Debug, Clone, Copy, Default)]
pub struct Iapws97;

impl Iapws97 {
    pub fn new() -> Self {
        Self
    }

    fn to_state(point: Point) -> FluidResult<ThermoState> {
        let p = pa(point.p);
        let t = k(point.t);
        let rho = Density::new::<kilogram_per_cubic_meter>(1.0 / point.v);
        match (point.region, point.quality, point.cp, point.dh_dp_t) {
            (Region::Four, Some(x), _, _) => {
                ThermoState::two_phase(p, t, point.h, point.s, rho, x)
            }
            (region, _, Some(cp), Some(dh_dp)) => {
                let phase = if region == Region::One {
                    Phase::Liquid
                } else {
                    Phase::Vapor
                };
                ThermoState::single_phase(p, t, point.h, point.s, rho, (cp, dh_dp), phase)
            }
            _ => ThermoState::two_phase(p, t, point.h, point.s, rho, 0.0),
        }
    }
}

impl FluidModel for Iapws97 {
    fn name(&self) -> &str {
        "IAPWS-IF97"
    }

    fn supports_composition(&self, comp: &Composition) -> bool {
        comp.is_water()
    }

    fn state(&self, input: StateInput) -> FluidResult<ThermoState> {
        let point = match input {
            StateInput::PT { p, t } => if97::flash_pt(p.value, t.value)?,
            StateInput::PH { p, h } => if97::flash_ph(p.value, h)?,
            StateInput::PS { p, s } => if97::flash_ps(p.value, s)?,
        };
        Self::to_state(point)
    }

    fn saturation_temperature(&self, p: Pressure) -> FluidResult<Temperature> {
        Ok(k(if97::tsat(p.value)?))
    }

    fn saturation_pressure(&self, t: Temperature) -> FluidResult<Pressure> {
        Ok(pa(if97::psat(t.value)?))
    }

    fn saturated_liquid_enthalpy(&self, p: Pressure) -> FluidResult<SpecEnthalpy> {
        Ok(if97::saturation_points(p.value)?.0.h)
    }

    fn saturated_vapor_enthalpy(&self, p: Pressure) -> FluidResult<SpecEnthalpy> {
        Ok(if97::saturation_points(p.value)?.1.h)
    }

    fn pressure_limits(&self) -> (Pressure, Pressure) {
        (pa(if97::P_MIN), pa(if97::P_MAX))
    }

    fn enthalpy_limits(&self) -> (SpecEnthalpy, SpecEnthalpy) {
        (H_FLOOR, H_CEILING)
    }
}
