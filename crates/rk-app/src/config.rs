//! Plant configuration: the boundary conditions a caller may change.
//!
//! Values are in engineering units (°C, bar, kg/s). Every field has a
//! default, so an empty YAML document describes the reference plant:
//!
//! ```yaml
//! live_steam_T: 600.0
//! live_steam_p: 150.0
//! live_steam_m: 532.0
//! condenser_p: 0.1
//! cw_inlet_T: 20.0
//! cw_outlet_T: 30.0
//! cw_p: 1.2
//! turbine_eta_s: 0.9
//! pump_eta_s: 0.75
//! ```

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

/// Critical pressure of water [bar].
pub const CRITICAL_PRESSURE_BAR: f64 = 220.64;

/// Property model used for the cooling-water streams.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CoolingModel {
    #[default]
    Iapws97,
    Incompressible,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RankineConfig {
    /// Live steam temperature [°C].
    #[serde(rename = "live_steam_T")]
    pub live_steam_t: f64,
    /// Live steam pressure [bar].
    pub live_steam_p: f64,
    /// Live steam mass flow [kg/s].
    pub live_steam_m: f64,
    /// Condenser pressure [bar].
    pub condenser_p: f64,
    /// Cooling water inlet temperature [°C].
    #[serde(rename = "cw_inlet_T")]
    pub cw_inlet_t: f64,
    /// Cooling water outlet temperature [°C].
    #[serde(rename = "cw_outlet_T")]
    pub cw_outlet_t: f64,
    /// Cooling water inlet pressure [bar].
    pub cw_p: f64,
    pub turbine_eta_s: f64,
    pub pump_eta_s: f64,
    /// Steam generator outlet/inlet pressure ratio.
    pub boiler_pr: f64,
    /// Condenser hot-side pressure ratio.
    pub condenser_pr_hot: f64,
    /// Condenser cooling-side pressure ratio.
    pub condenser_pr_cold: f64,
    pub cooling_model: CoolingModel,
}

impl Default for RankineConfig {
    fn default() -> Self {
        Self {
            live_steam_t: 600.0,
            live_steam_p: 150.0,
            live_steam_m: 532.0,
            condenser_p: 0.1,
            cw_inlet_t: 20.0,
            cw_outlet_t: 30.0,
            cw_p: 1.2,
            turbine_eta_s: 0.9,
            pump_eta_s: 0.75,
            boiler_pr: 0.9,
            condenser_pr_hot: 1.0,
            condenser_pr_cold: 0.98,
            cooling_model: CoolingModel::Iapws97,
        }
    }
}

/// Bounds of one field, each side open or closed.
struct Range {
    lo: f64,
    lo_open: bool,
    hi: f64,
    hi_open: bool,
}

impl Range {
    const fn open_closed(lo: f64, hi: f64) -> Self {
        Self {
            lo,
            lo_open: true,
            hi,
            hi_open: false,
        }
    }

    const fn open(lo: f64, hi: f64) -> Self {
        Self {
            lo,
            lo_open: true,
            hi,
            hi_open: true,
        }
    }

    fn contains(&self, v: f64) -> bool {
        let above = if self.lo_open { v > self.lo } else { v >= self.lo };
        let below = if self.hi_open { v < self.hi } else { v <= self.hi };
        v.is_finite() && above && below
    }

    fn check(&self, field: &'static str, value: f64, unit: &str) -> AppResult<()> {
        if self.contains(value) {
            return Ok(());
        }
        Err(AppError::OutOfRange {
            field,
            value,
            range: format!("{self} {unit}").trim_end().to_string(),
        })
    }
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let open = if self.lo_open { '(' } else { '[' };
        let close = if self.hi_open { ')' } else { ']' };
        write!(f, "{open}{}, {}{close}", self.lo, self.hi)
    }
}

impl RankineConfig {
    pub fn from_yaml_str(yaml: &str) -> AppResult<Self> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Load from a YAML file.
    pub fn load(path: &Path) -> AppResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| AppError::ConfigRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::from_yaml_str(&content)
    }

    pub fn to_yaml(&self) -> AppResult<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Check every value against its documented range.
    ///
    /// Values are reported, never clamped.
    pub fn validate(&self) -> AppResult<()> {
        Range::open_closed(0.01, 800.0).check("live_steam_T", self.live_steam_t, "°C")?;
        Range::open_closed(0.0, 1000.0).check("live_steam_p", self.live_steam_p, "bar")?;
        Range::open_closed(0.0, 1.0e5).check("live_steam_m", self.live_steam_m, "kg/s")?;
        Range::open(0.0, CRITICAL_PRESSURE_BAR).check("condenser_p", self.condenser_p, "bar")?;
        Range::open(0.01, 100.0).check("cw_inlet_T", self.cw_inlet_t, "°C")?;
        Range::open(self.cw_inlet_t, 100.0).check("cw_outlet_T", self.cw_outlet_t, "°C")?;
        Range::open(0.0, CRITICAL_PRESSURE_BAR).check("cw_p", self.cw_p, "bar")?;
        Range::open_closed(0.0, 1.0).check("turbine_eta_s", self.turbine_eta_s, "")?;
        Range::open_closed(0.0, 1.0).check("pump_eta_s", self.pump_eta_s, "")?;
        Range::open_closed(0.0, 1.0).check("boiler_pr", self.boiler_pr, "")?;
        Range::open_closed(0.0, 1.0).check("condenser_pr_hot", self.condenser_pr_hot, "")?;
        Range::open_closed(0.0, 1.0).check("condenser_pr_cold", self.condenser_pr_cold, "")?;
        Ok(())
    }

    pub fn get(&self, param: SweepParameter) -> f64 {
        match param {
            SweepParameter::LiveSteamT => self.live_steam_t,
            SweepParameter::LiveSteamP => self.live_steam_p,
            SweepParameter::LiveSteamM => self.live_steam_m,
            SweepParameter::CondenserP => self.condenser_p,
            SweepParameter::CwInletT => self.cw_inlet_t,
            SweepParameter::CwOutletT => self.cw_outlet_t,
            SweepParameter::CwP => self.cw_p,
            SweepParameter::TurbineEtaS => self.turbine_eta_s,
            SweepParameter::PumpEtaS => self.pump_eta_s,
        }
    }

    pub fn set(&mut self, param: SweepParameter, value: f64) {
        let slot = match param {
            SweepParameter::LiveSteamT => &mut self.live_steam_t,
            SweepParameter::LiveSteamP => &mut self.live_steam_p,
            SweepParameter::LiveSteamM => &mut self.live_steam_m,
            SweepParameter::CondenserP => &mut self.condenser_p,
            SweepParameter::CwInletT => &mut self.cw_inlet_t,
            SweepParameter::CwOutletT => &mut self.cw_outlet_t,
            SweepParameter::CwP => &mut self.cw_p,
            SweepParameter::TurbineEtaS => &mut self.turbine_eta_s,
            SweepParameter::PumpEtaS => &mut self.pump_eta_s,
        };
        *slot = value;
    }

    /// Copy with one input replaced.
    pub fn with(&self, param: SweepParameter, value: f64) -> Self {
        let mut config = self.clone();
        config.set(param, value);
        config
    }
}

/// One of the externally adjustable inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SweepParameter {
    #[serde(rename = "live_steam_T")]
    LiveSteamT,
    #[serde(rename = "live_steam_p")]
    LiveSteamP,
    #[serde(rename = "live_steam_m")]
    LiveSteamM,
    #[serde(rename = "condenser_p")]
    CondenserP,
    #[serde(rename = "cw_inlet_T")]
    CwInletT,
    #[serde(rename = "cw_outlet_T")]
    CwOutletT,
    #[serde(rename = "cw_p")]
    CwP,
    #[serde(rename = "turbine_eta_s")]
    TurbineEtaS,
    #[serde(rename = "pump_eta_s")]
    PumpEtaS,
}

impl SweepParameter {
    pub const ALL: [SweepParameter; 9] = [
        SweepParameter::LiveSteamT,
        SweepParameter::LiveSteamP,
        SweepParameter::LiveSteamM,
        SweepParameter::CondenserP,
        SweepParameter::CwInletT,
        SweepParameter::CwOutletT,
        SweepParameter::CwP,
        SweepParameter::TurbineEtaS,
        SweepParameter::PumpEtaS,
    ];

    /// Configuration key of this input.
    pub fn name(&self) -> &'static str {
        match self {
            SweepParameter::LiveSteamT => "live_steam_T",
            SweepParameter::LiveSteamP => "live_steam_p",
            SweepParameter::LiveSteamM => "live_steam_m",
            SweepParameter::CondenserP => "condenser_p",
            SweepParameter::CwInletT => "cw_inlet_T",
            SweepParameter::CwOutletT => "cw_outlet_T",
            SweepParameter::CwP => "cw_p",
            SweepParameter::TurbineEtaS => "turbine_eta_s",
            SweepParameter::PumpEtaS => "pump_eta_s",
        }
    }
}

impl fmt::Display for SweepParameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SweepParameter {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SweepParameter::ALL
            .into_iter()
            .find(|p| p.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| AppError::InvalidInput(format!("unknown parameter '{s}'")))
    }
}
