//! rk-graph: network layer for the Rankine plant solver.
//!
//! Provides:
//! - Connections with user specifications and a current state
//! - The component/connection network with structural validation
//! - Degrees-of-freedom ledger
//! - Stable unknown-vector layout for solver integration
//!
//! # Example
//!
//! ```
//! use rk_components::{Pump, Sink, Source};
//! use rk_core::UnitSystem;
//! use rk_graph::{ConnAttrs, Network, PortRef};
//!
//! let mut net = Network::new();
//! let src = net.add_component(Source::new("source")).unwrap();
//! let pump = net.add_component(Pump::new("pump").with_eta_s(0.8).unwrap()).unwrap();
//! let sink = net.add_component(Sink::new("sink")).unwrap();
//! let a = net.add_connection("a", PortRef::outlet(src, 0), PortRef::inlet(pump, 0)).unwrap();
//! net.add_connection("b", PortRef::outlet(pump, 0), PortRef::inlet(sink, 0)).unwrap();
//!
//! net.connection_mut(a)
//!     .unwrap()
//!     .set_attr(&UnitSystem::engineering(), ConnAttrs::new().m(1.0).p(1.0).t(25.0))
//!     .unwrap();
//!
//! // Outlet pressure still missing
//! assert_eq!(net.dof().delta(), 1);
//! ```

pub mod connection;
pub mod error;
pub mod layout;
pub mod ledger;
pub mod network;
pub(crate) mod validate;

// Re-exports for ergonomics
pub use connection::{ConnAttrs, Connection, ConnectionState, PortRef, SpecSet};
pub use error::{GraphError, GraphResult};
pub use layout::{VarKind, VariableLayout};
pub use ledger::DofLedger;
pub use network::{ComponentPorts, Network};
