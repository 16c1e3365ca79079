//! Fluid property model trait and validation helpers.

use crate::composition::Composition;
use crate::error::{FluidError, FluidResult};
use crate::state::{SpecEnthalpy, SpecEntropy, StateInput, ThermoState};
use rk_core::units::{Pressure, Temperature};
use std::fmt;

/// Trait for fluid property models.
///
/// Implementations must be thread-safe (Send + Sync) and free of interior
/// mutation: every call is a pure function of its inputs, so independent
/// networks can be solved in parallel against one shared model.
pub trait FluidModel: Send + Sync + fmt::Debug {
    /// Get the model name (for debugging/logging).
    fn name(&self) -> &str;

    /// Check if this model supports the given composition.
    fn supports_composition(&self, comp: &Composition) -> bool;

    /// Resolve a full thermodynamic state from two independent properties.
    fn state(&self, input: StateInput) -> FluidResult<ThermoState>;

    /// Specific enthalpy at (p, T).
    fn h_pt(&self, p: Pressure, t: Temperature) -> FluidResult<SpecEnthalpy> {
        Ok(self.state(StateInput::PT { p, t })?.h())
    }

    /// Temperature at (p, h).
    fn t_ph(&self, p: Pressure, h: SpecEnthalpy) -> FluidResult<Temperature> {
        Ok(self.state(StateInput::PH { p, h })?.temperature())
    }

    /// Specific entropy at (p, h).
    fn s_ph(&self, p: Pressure, h: SpecEnthalpy) -> FluidResult<SpecEntropy> {
        Ok(self.state(StateInput::PH { p, h })?.s())
    }

    /// Specific enthalpy at (p, s); used for isentropic end points.
    fn h_ps(&self, p: Pressure, s: SpecEntropy) -> FluidResult<SpecEnthalpy> {
        Ok(self.state(StateInput::PS { p, s })?.h())
    }

    /// Saturation temperature at pressure.
    fn saturation_temperature(&self, _p: Pressure) -> FluidResult<Temperature> {
        Err(FluidError::NotSupported {
            what: "saturation properties",
        })
    }

    /// Saturation pressure at temperature.
    fn saturation_pressure(&self, _t: Temperature) -> FluidResult<Pressure> {
        Err(FluidError::NotSupported {
            what: "saturation properties",
        })
    }

    /// Enthalpy of saturated liquid at pressure.
    fn saturated_liquid_enthalpy(&self, _p: Pressure) -> FluidResult<SpecEnthalpy> {
        Err(FluidError::NotSupported {
            what: "saturation properties",
        })
    }

    /// Enthalpy of saturated vapor at pressure.
    fn saturated_vapor_enthalpy(&self, _p: Pressure) -> FluidResult<SpecEnthalpy> {
        Err(FluidError::NotSupported {
            what: "saturation properties",
        })
    }

    /// Closed pressure interval covered by the model.
    fn pressure_limits(&self) -> (Pressure, Pressure);

    /// Enthalpy interval outside of which no state exists at any covered pressure.
    fn enthalpy_limits(&self) -> (SpecEnthalpy, SpecEnthalpy);
}

/// Validation helpers for fluid properties.
pub(crate) mod validation {
    use super::*;
    use rk_core::units::Density;

    /// Ensure pressure is positive and finite.
    pub fn validate_pressure(p: Pressure) -> FluidResult<()> {
        if !p.value.is_finite() || p.value <= 0.0 {
            return Err(FluidError::NonPhysical {
                what: "pressure must be positive and finite",
            });
        }
        Ok(())
    }

    /// Ensure temperature is positive and finite.
    pub fn validate_temperature(t: Temperature) -> FluidResult<()> {
        if !t.value.is_finite() || t.value <= 0.0 {
            return Err(FluidError::NonPhysical {
                what: "temperature must be positive and finite",
            });
        }
        Ok(())
    }

    /// Ensure density is positive and finite.
    pub fn validate_density(rho: Density) -> FluidResult<()> {
        if !rho.value.is_finite() || rho.value <= 0.0 {
            return Err(FluidError::NonPhysical {
                what: "density must be positive and finite",
            });
        }
        Ok(())
    }

    /// Ensure specific heat capacity is positive and finite.
    pub fn validate_cp(cp: f64) -> FluidResult<()> {
        if !cp.is_finite() || cp <= 0.0 {
            return Err(FluidError::NonPhysical {
                what: "cp must be positive and finite",
            });
        }
        Ok(())
    }

    /// Ensure enthalpy is finite (can be negative).
    pub fn validate_enthalpy(h: f64) -> FluidResult<()> {
        if !h.is_finite() {
            return Err(FluidError::NonPhysical {
                what: "enthalpy must be finite",
            });
        }
        Ok(())
    }
}
