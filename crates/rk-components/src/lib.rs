//! rk-components: component library for steady-state power cycles.
//!
//! Provides models for the elements of a Rankine plant:
//! - Simple heat exchanger (boiler)
//! - Turbine and feed pump with isentropic efficiencies
//! - Two-stream condenser
//! - Sources, sinks and the loop-breaking cycle closer
//!
//! Every model implements [`ComponentModel`]: a fixed set of residual
//! equations over the (m, p, h) of its ports and its [`ParamSet`].
//! Networks store them as the [`Component`] enum.
//!
//! # Example
//!
//! ```
//! use rk_components::{ComponentModel, PortState, PortStates, Turbine};
//! use rk_fluids::Iapws97;
//!
//! let water = Iapws97::new();
//! let turbine = Turbine::new("steam turbine").with_eta_s(0.9).unwrap();
//!
//! let ports = PortStates {
//!     inlets: vec![PortState { m: 10.0, p: 15.0e6, h: 3.58e6, fluid: &water }],
//!     outlets: vec![PortState { m: 10.0, p: 1.0e4, h: 2.26e6, fluid: &water }],
//! };
//!
//! let outputs = turbine.outputs(&ports, &[0.9, 1.0, 0.0]).unwrap();
//! println!("Power: {} W", outputs.power.unwrap().value);
//! ```

pub mod boundary;
pub mod common;
pub mod component;
pub mod condenser;
pub mod cycle_closer;
pub mod error;
pub mod heat_exchanger;
pub mod params;
pub mod ports;
pub mod pump;
pub mod residual;
pub mod traits;
pub mod turbine;

// Re-exports
pub use boundary::{Sink, Source};
pub use component::Component;
pub use condenser::Condenser;
pub use cycle_closer::CycleCloser;
pub use error::{ComponentError, ComponentResult};
pub use heat_exchanger::SimpleHeatExchanger;
pub use params::{ParamSet, ParamSpec, ParamValue};
pub use ports::{GuessPort, GuessPorts, GuessValues, PortKind, PortState, PortStates, StateVar};
pub use pump::Pump;
pub use residual::{Residual, ResidualKind};
pub use traits::{ComponentKind, ComponentModel, ComponentOutputs};
pub use turbine::Turbine;
