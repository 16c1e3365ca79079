//! Application layer for the Rankine plant.
//!
//! This crate is the one interface frontends use: it turns a
//! [`RankineConfig`] into a specified network, solves it, and reports
//! plant-level figures. [`PlantSession`] keeps a plant alive for repeated
//! warm-started solves; [`sweep`] varies one input over a range.

pub mod config;
pub mod error;
pub mod plant;
pub mod service;
pub mod session;
pub mod sweep;

// Re-export key types for convenience
pub use config::{CoolingModel, RankineConfig, SweepParameter};
pub use error::{AppError, AppResult};
pub use plant::{apply_config, build_network, check};
pub use service::{PlantReport, PlantSummary, RunTiming, run};
pub use session::PlantSession;
pub use sweep::{SweepPoint, SweepResult, linspace, sweep_parallel, sweep_range};
