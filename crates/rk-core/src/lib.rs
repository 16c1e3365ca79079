//! rk-core: stable foundation for the Rankine plant solver.
//!
//! Contains:
//! - units (uom SI types + constructors)
//! - unit_system (explicit display/input unit selection)
//! - numeric (Real + tolerances + float helpers)
//! - ids (stable compact IDs for components and connections)
//! - error (shared error types)

pub mod error;
pub mod ids;
pub mod numeric;
pub mod unit_system;
pub mod units;

pub use error::{RkError, RkResult};
pub use ids::*;
pub use numeric::*;
pub use unit_system::{
    EnthalpyUnit, EntropyUnit, PowerUnit, PressureUnit, TemperatureUnit, UnitSystem,
};
pub use units::*;
