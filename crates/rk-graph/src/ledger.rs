//! Degrees-of-freedom bookkeeping.

use std::fmt;

use crate::network::Network;

/// Itemized unknown and equation counts of a network.
///
/// Each connection carries four state variables (m, p, T, h) tied by one
/// equation of state. Every component parameter owns one equation; free
/// parameters add one unknown each.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DofLedger {
    pub connections: usize,
    pub connection_unknowns: usize,
    pub free_params: usize,
    pub state_relations: usize,
    pub component_equations: usize,
    pub specifications: usize,
}

impl DofLedger {
    pub fn from_network(net: &Network) -> Self {
        let connections = net.connections().len();
        let mut ledger = Self {
            connections,
            connection_unknowns: 4 * connections,
            state_relations: connections,
            ..Self::default()
        };
        for component in net.components() {
            let model = component.model();
            ledger.free_params += model.params().free_count();
            ledger.component_equations += model.equation_count();
        }
        ledger.specifications = net.connections().iter().map(|c| c.specs().count()).sum();
        ledger
    }

    pub fn unknowns(&self) -> usize {
        self.connection_unknowns + self.free_params
    }

    pub fn equations(&self) -> usize {
        self.state_relations + self.component_equations + self.specifications
    }

    /// Unknowns minus equations: positive when specifications are missing,
    /// negative when there are too many.
    pub fn delta(&self) -> i64 {
        self.unknowns() as i64 - self.equations() as i64
    }

    pub fn is_balanced(&self) -> bool {
        self.delta() == 0
    }
}

impl fmt::Display for DofLedger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "connection variables  {:>5}", self.connection_unknowns)?;
        writeln!(f, "free parameters       {:>5}", self.free_params)?;
        writeln!(f, "unknowns              {:>5}", self.unknowns())?;
        writeln!(f, "state relations       {:>5}", self.state_relations)?;
        writeln!(f, "component equations   {:>5}", self.component_equations)?;
        writeln!(f, "specifications        {:>5}", self.specifications)?;
        writeln!(f, "equations             {:>5}", self.equations())?;
        write!(f, "delta                 {:>5}", self.delta())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connection::{ConnAttrs, PortRef};
    use rk_components::{Pump, Sink, Source};
    use rk_core::UnitSystem;

    #[test]
    fn open_pump_line_balances() {
        let mut net = Network::new();
        let src = net.add_component(Source::new("source")).unwrap();
        let pump = net
            .add_component(Pump::new("pump").with_eta_s(0.8).unwrap())
            .unwrap();
        let sink = net.add_component(Sink::new("sink")).unwrap();
        let a = net
            .add_connection("a", PortRef::outlet(src, 0), PortRef::inlet(pump, 0))
            .unwrap();
        let b = net
            .add_connection("b", PortRef::outlet(pump, 0), PortRef::inlet(sink, 0))
            .unwrap();
        let si = UnitSystem::si();
        net.connection_mut(a)
            .unwrap()
            .set_attr(&si, ConnAttrs::new().m(1.0).p(1.0e5).t(300.0))
            .unwrap();

        // pr and P free: 8 + 2 unknowns; 2 EOS + 4 pump + 3 specs equations
        let ledger = net.dof();
        assert_eq!(ledger.unknowns(), 10);
        assert_eq!(ledger.equations(), 9);
        assert_eq!(ledger.delta(), 1);

        net.connection_mut(b)
            .unwrap()
            .set_attr(&si, ConnAttrs::new().p(1.0e6))
            .unwrap();
        assert!(net.dof().is_balanced());
        assert!(net.validate().is_ok());
        assert!(net.dof().to_string().contains("delta"));
    }
}
