//! Incompressible liquid model for cooling circuits.
//!
//! Constant heat capacity and density:
//!
//! ```text
//! h = cp (T - T_ref) + (p - p_ref) / rho
//! s = cp ln(T / T_ref)
//! ```
//!
//! The reference state is the water triple point so that enthalpies line up
//! with IF97 liquid values to within a fraction of a percent below 100 °C.

use crate::composition::Composition;
use crate::error::{FluidError, FluidResult};
use crate::model::FluidModel;
use crate::state::{Phase, SpecEnthalpy, StateInput, ThermoState};
use rk_core::units::{Density, Pressure, k, pa};
use uom::si::mass_density::kilogram_per_cubic_meter;

const T_REF: f64 = 273.16;
const P_REF: f64 = 611.657;

/// Liquid with constant cp and density.
#[derive(Debug, Clone, Copy)]
pub struct IncompressibleLiquid {
    cp: f64,
    rho: f64,
    t_min: f64,
    t_max: f64,
    p_max: f64,
}

impl IncompressibleLiquid {
    /// Build a model with the given cp [J/(kg·K)] and density [kg/m³].
    pub fn new(cp: f64, rho: f64) -> FluidResult<Self> {
        if !cp.is_finite() || cp <= 0.0 {
            return Err(FluidError::InvalidArg {
                what: "cp must be positive",
            });
        }
        if !rho.is_finite() || rho <= 0.0 {
            return Err(FluidError::InvalidArg {
                what: "density must be positive",
            });
        }
        Ok(Self {
            cp,
            rho,
            t_min: 273.15,
            t_max: 373.15,
            p_max: 100.0e6,
        })
    }

    /// Liquid water at ambient conditions (cp = 4184 J/(kg·K), rho = 997.047 kg/m³).
    pub fn water() -> Self {
        Self {
            cp: 4184.0,
            rho: 997.047,
            t_min: 273.15,
            t_max: 373.15,
            p_max: 100.0e6,
        }
    }

    fn check(&self, p: f64, t: f64, input: &StateInput) -> FluidResult<()> {
        if !p.is_finite() || p < P_REF || p > self.p_max {
            return Err(FluidError::OutOfRange {
                what: "pressure outside incompressible liquid range",
                input: input.clone(),
            });
        }
        if !t.is_finite() || t < self.t_min || t > self.t_max {
            return Err(FluidError::OutOfRange {
                what: "temperature outside incompressible liquid range",
                input: input.clone(),
            });
        }
        Ok(())
    }

    fn build(&self, p: f64, t: f64) -> FluidResult<ThermoState> {
        let h = self.cp * (t - T_REF) + (p - P_REF) / self.rho;
        let s = self.cp * (t / T_REF).ln();
        ThermoState::single_phase(
            pa(p),
            k(t),
            h,
            s,
            Density::new::<kilogram_per_cubic_meter>(self.rho),
            (self.cp, 1.0 / self.rho),
            Phase::Liquid,
        )
    }
}

impl FluidModel for IncompressibleLiquid {
    fn name(&self) -> &str {
        "incompressible liquid"
    }

    fn supports_composition(&self, comp: &Composition) -> bool {
        comp.is_water()
    }

    fn state(&self, input: StateInput) -> FluidResult<ThermoState> {
        let (p, t) = match &input {
            StateInput::PT { p, t } => (p.value, t.value),
            StateInput::PH { p, h } => (p.value, T_REF + (h - (p.value - P_REF) / self.rho) / self.cp),
            StateInput::PS { p, s } => (p.value, T_REF * (s / self.cp).exp()),
        };
        self.check(p, t, &input)?;
        self.build(p, t)
    }

    fn pressure_limits(&self) -> (Pressure, Pressure) {
        (pa(P_REF), pa(self.p_max))
    }

    fn enthalpy_limits(&self) -> (SpecEnthalpy, SpecEnthalpy) {
        (
            self.cp * (self.t_min - T_REF),
            self.cp * (self.t_max - T_REF) + (self.p_max - P_REF) / self.rho,
        )
    }
}
