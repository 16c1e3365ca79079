//! Thermodynamic state definitions.

use crate::error::FluidResult;
use crate::model::validation;
use rk_core::units::{Density, Pressure, Temperature};

/// Specific enthalpy [J/kg].
pub type SpecEnthalpy = f64;

/// Specific entropy [J/(kg·K)].
pub type SpecEntropy = f64;

/// Specific heat capacity [J/(kg·K)].
pub type SpecHeatCapacity = f64;

/// Input specification for creating a thermodynamic state.
#[derive(Debug, Clone, PartialEq)]
pub enum StateInput {
    /// Pressure and temperature.
    PT { p: Pressure, t: Temperature },
    /// Pressure and specific enthalpy.
    PH { p: Pressure, h: SpecEnthalpy },
    /// Pressure and specific entropy.
    PS { p: Pressure, s: SpecEntropy },
}

/// Phase of a resolved state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Phase {
    Liquid,
    Vapor,
    /// Inside the saturation dome, with vapor mass fraction.
    TwoPhase { quality: f64 },
}

impl Phase {
    pub fn label(&self) -> &'static str {
        match self {
            Phase::Liquid => "liquid",
            Phase::Vapor => "vapor",
            Phase::TwoPhase { .. } => "two-phase",
        }
    }
}

/// Fully resolved thermodynamic state.
///
/// Produced by a [`crate::FluidModel`]; every field is consistent with the
/// model's equation of state at (p, T) or (p, h).
#[derive(Debug, Clone, PartialEq)]
pub struct ThermoState {
    p: Pressure,
    t: Temperature,
    h: SpecEnthalpy,
    s: SpecEntropy,
    rho: Density,
    cp: Option<SpecHeatCapacity>,
    dh_dp_t: Option<f64>,
    phase: Phase,
}

impl ThermoState {
    /// Single-phase state with its derivatives.
    pub(crate) fn single_phase(
        p: Pressure,
        t: Temperature,
        h: SpecEnthalpy,
        s: SpecEntropy,
        rho: Density,
        derivs: (SpecHeatCapacity, f64),
        phase: Phase,
    ) -> FluidResult<Self> {
        validation::validate_pressure(p)?;
        validation::validate_temperature(t)?;
        validation::validate_enthalpy(h)?;
        validation::validate_density(rho)?;
        validation::validate_cp(derivs.0)?;
        Ok(Self {
            p,
            t,
            h,
            s,
            rho,
            cp: Some(derivs.0),
            dh_dp_t: Some(derivs.1),
            phase,
        })
    }

    /// Saturated mixture; cp and (∂h/∂p)_T are undefined inside the dome.
    pub(crate) fn two_phase(
        p: Pressure,
        t: Temperature,
        h: SpecEnthalpy,
        s: SpecEntropy,
        rho: Density,
        quality: f64,
    ) -> FluidResult<Self> {
        validation::validate_pressure(p)?;
        validation::validate_temperature(t)?;
        validation::validate_enthalpy(h)?;
        validation::validate_density(rho)?;
        Ok(Self {
            p,
            t,
            h,
            s,
            rho,
            cp: None,
            dh_dp_t: None,
            phase: Phase::TwoPhase { quality },
        })
    }

    /// Get pressure.
    pub fn pressure(&self) -> Pressure {
        self.p
    }

    /// Get temperature.
    pub fn temperature(&self) -> Temperature {
        self.t
    }

    /// Specific enthalpy [J/kg].
    pub fn h(&self) -> SpecEnthalpy {
        self.h
    }

    /// Specific entropy [J/(kg·K)].
    pub fn s(&self) -> SpecEntropy {
        self.s
    }

    pub fn density(&self) -> Density {
        self.rho
    }

    /// Isobaric heat capacity; `None` inside the dome.
    pub fn cp(&self) -> Option<SpecHeatCapacity> {
        self.cp
    }

    /// (∂h/∂p) at constant T [J/(kg·Pa)]; `None` inside the dome.
    pub fn dh_dp_t(&self) -> Option<f64> {
        self.dh_dp_t
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Vapor mass fraction for two-phase states.
    pub fn quality(&self) -> Option<f64> {
        match self.phase {
            Phase::TwoPhase { quality } => Some(quality),
            _ => None,
        }
    }
}
