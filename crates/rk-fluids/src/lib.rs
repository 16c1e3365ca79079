//! rk-fluids: water and steam properties for the Rankine plant solver.
//!
//! Provides:
//! - IAPWS-IF97 regions 1, 2 and 4 (with the B23 boundary) as pure functions
//! - An incompressible liquid model for cooling-water circuits
//! - Composition handling (mass-fraction map)
//! - Thermodynamic state representation
//! - FluidModel trait for property calculations
//!
//! # Example
//!
//! ```
//! use rk_fluids::{FluidModel, Iapws97, StateInput};
//! use rk_core::units::{bar, celsius};
//!
//! let model = Iapws97::new();
//! let state = model
//!     .state(StateInput::PT { p: bar(150.0), t: celsius(600.0) })
//!     .unwrap();
//! assert!((state.h() / 1e3 - 3583.3).abs() < 0.5);
//! ```

pub mod composition;
pub mod error;
pub mod if97;
pub mod incompressible;
pub mod model;
pub mod state;
pub mod water;

pub use composition::Composition;
pub use error::{FluidError, FluidResult};
pub use incompressible::IncompressibleLiquid;
pub use model::FluidModel;
pub use state::{Phase, SpecEnthalpy, SpecEntropy, SpecHeatCapacity, StateInput, ThermoState};
pub use water::Iapws97;
