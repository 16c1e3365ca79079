//! Steady-state solver for Rankine plant networks.
//!
//! The unknowns are (m, p, h) of every connection plus every free component
//! parameter. Temperature is never an unknown; it is evaluated from (p, h)
//! wherever a specification or a component needs it. Residuals from the
//! components and the connection specifications form a square system that
//! is solved by a damped Newton iteration with a finite-difference
//! Jacobian.
//!
//! # Example
//!
//! ```
//! use rk_components::{Pump, Sink, Source};
//! use rk_core::UnitSystem;
//! use rk_graph::{ConnAttrs, Network, PortRef};
//! use rk_solver::Solver;
//!
//! let mut net = Network::new();
//! let src = net.add_component(Source::new("source")).unwrap();
//! let pump = net.add_component(Pump::new("pump").with_eta_s(0.8).unwrap()).unwrap();
//! let sink = net.add_component(Sink::new("sink")).unwrap();
//! let a = net.add_connection("a", PortRef::outlet(src, 0), PortRef::inlet(pump, 0)).unwrap();
//! let b = net.add_connection("b", PortRef::outlet(pump, 0), PortRef::inlet(sink, 0)).unwrap();
//!
//! let units = UnitSystem::engineering();
//! net.connection_mut(a).unwrap().set_attr(&units, ConnAttrs::new().m(10.0).p(1.0).t(25.0)).unwrap();
//! net.connection_mut(b).unwrap().set_attr(&units, ConnAttrs::new().p(50.0)).unwrap();
//!
//! let mut solver = Solver::default();
//! let results = solver.solve(&mut net).unwrap();
//! assert!(results.power("pump", &units).unwrap() > 0.0);
//! ```

pub mod config;
pub mod error;
pub mod initialization;
pub mod jacobian;
pub mod newton;
pub mod problem;
pub mod solve;

pub use config::{InitializationStrategy, ResidualTolerances, SolverConfig};
pub use error::{SolverError, SolverResult};
pub use newton::{NewtonConfig, NewtonOutcome, NewtonResult, StepControl};
pub use problem::SteadyProblem;
pub use solve::{Solver, solve};
