//! Network validation logic.

use std::collections::{HashSet, VecDeque};

use rk_components::{ComponentKind, PortKind};
use rk_core::CompId;
use rk_core::units::pa;

use crate::connection::PortRef;
use crate::error::{GraphError, GraphResult};
use crate::network::Network;

/// Temperatures this close to saturation count as "on the dome" [K].
const SATURATION_BAND_K: f64 = 1e-4;

/// Validate the network structure: ports, fluids and loop breaking.
pub(crate) fn check_structure(net: &Network) -> GraphResult<()> {
    // Every port carries exactly one connection
    for comp in net.comp_ids() {
        net.port_connections(comp)?;
    }

    for (conn, id) in net.connections().iter().zip(net.conn_ids()) {
        if !net.fluid_for(id)?.supports_composition(conn.composition()) {
            return Err(GraphError::UnsupportedFluid {
                label: conn.label.clone(),
            });
        }
    }

    check_cycles(net)
}

fn is_closer(net: &Network, comp: CompId) -> bool {
    net.component(comp)
        .map(|c| c.kind() == ComponentKind::CycleCloser)
        .unwrap_or(false)
}

/// Component adjacency along connection direction.
fn successors(net: &Network) -> Vec<Vec<CompId>> {
    let mut next = vec![Vec::new(); net.components().len()];
    for conn in net.connections() {
        next[conn.source.comp.slot()].push(conn.target.comp);
    }
    next
}

/// Every directed cycle must pass through exactly one cycle closer.
///
/// Two conditions together give that: the graph without closers is acyclic,
/// and every closer reaches its own inlet again without crossing another
/// closer.
fn check_cycles(net: &Network) -> GraphResult<()> {
    let next = successors(net);
    let n = next.len();

    // Kahn's algorithm on the closer-free subgraph
    let mut indegree = vec![0usize; n];
    for (from, targets) in next.iter().enumerate() {
        if is_closer(net, CompId::from_index(from as u32)) {
            continue;
        }
        for to in targets {
            if !is_closer(net, *to) {
                indegree[to.slot()] += 1;
            }
        }
    }
    let mut queue: VecDeque<usize> = (0..n)
        .filter(|&i| indegree[i] == 0 && !is_closer(net, CompId::from_index(i as u32)))
        .collect();
    let mut visited = 0;
    let open_count = (0..n)
        .filter(|&i| !is_closer(net, CompId::from_index(i as u32)))
        .count();
    while let Some(i) = queue.pop_front() {
        visited += 1;
        for to in &next[i] {
            if is_closer(net, *to) {
                continue;
            }
            indegree[to.slot()] -= 1;
            if indegree[to.slot()] == 0 {
                queue.push_back(to.slot());
            }
        }
    }
    if visited < open_count {
        let stuck = (0..n)
            .find(|&i| indegree[i] > 0)
            .map(|i| CompId::from_index(i as u32))
            .ok_or_else(|| GraphError::UnbrokenCycle {
                component: String::new(),
            })?;
        return Err(GraphError::UnbrokenCycle {
            component: net.component(stuck)?.name().to_string(),
        });
    }

    for closer in net.comp_ids().filter(|c| is_closer(net, *c)) {
        let ports = net.port_connections(closer)?;
        let start = net.connection(ports.outlets[0])?.target.comp;
        let goal = net.connection(ports.inlets[0])?.source.comp;
        if !reaches_without_closer(net, &next, start, goal) {
            return Err(GraphError::RedundantCycleCloser {
                component: net.component(closer)?.name().to_string(),
            });
        }
    }
    Ok(())
}

fn reaches_without_closer(net: &Network, next: &[Vec<CompId>], start: CompId, goal: CompId) -> bool {
    if is_closer(net, start) || is_closer(net, goal) {
        return false;
    }
    let mut seen = HashSet::from([start]);
    let mut queue = VecDeque::from([start]);
    while let Some(comp) = queue.pop_front() {
        if comp == goal {
            return true;
        }
        for to in &next[comp.slot()] {
            if !is_closer(net, *to) && seen.insert(*to) {
                queue.push_back(*to);
            }
        }
    }
    false
}

/// Detect variables fixed twice.
///
/// - T and p fixed on a stream that sits on the saturation line.
/// - A user specification on a variable a component equation already sets.
pub(crate) fn check_over_specification(net: &Network) -> GraphResult<()> {
    for (conn, id) in net.connections().iter().zip(net.conn_ids()) {
        let specs = conn.specs();
        if let (Some(p), Some(t)) = (specs.p, specs.t) {
            if let Ok(t_sat) = net.fluid_for(id)?.saturation_temperature(pa(p)) {
                if (t - t_sat.value).abs() < SATURATION_BAND_K {
                    return Err(GraphError::OverSpecified {
                        what: format!(
                            "connection '{}' fixes T and p on the saturation line",
                            conn.label
                        ),
                    });
                }
            }
        }
    }

    for (component, comp) in net.components().iter().zip(net.comp_ids()) {
        for (kind, index, var) in component.model().implied_variables() {
            let port = match kind {
                PortKind::Inlet => PortRef::inlet(comp, index),
                PortKind::Outlet => PortRef::outlet(comp, index),
            };
            let Some(conn_id) = net.connection_at(port) else {
                continue;
            };
            let conn = net.connection(conn_id)?;
            if conn.specs().get(var).is_some() {
                return Err(GraphError::OverSpecified {
                    what: format!(
                        "{} on connection '{}' is set by '{}'",
                        var.symbol(),
                        conn.label,
                        component.name()
                    ),
                });
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connection::ConnAttrs;
    use rk_components::{Condenser, CycleCloser, Pump, SimpleHeatExchanger, Sink, Source};
    use rk_core::UnitSystem;

    /// Pump -> heater -> (closer) -> pump
    fn loop_net(with_closer: bool) -> Network {
        let mut net = Network::new();
        let pump = net.add_component(Pump::new("pump")).unwrap();
        let heater = net.add_component(SimpleHeatExchanger::new("heater")).unwrap();
        if with_closer {
            let closer = net.add_component(CycleCloser::new("closer")).unwrap();
            net.add_connection("a", PortRef::outlet(pump, 0), PortRef::inlet(heater, 0))
                .unwrap();
            net.add_connection("b", PortRef::outlet(heater, 0), PortRef::inlet(closer, 0))
                .unwrap();
            net.add_connection("c", PortRef::outlet(closer, 0), PortRef::inlet(pump, 0))
                .unwrap();
        } else {
            net.add_connection("a", PortRef::outlet(pump, 0), PortRef::inlet(heater, 0))
                .unwrap();
            net.add_connection("b", PortRef::outlet(heater, 0), PortRef::inlet(pump, 0))
                .unwrap();
        }
        net
    }

    #[test]
    fn closed_loop_needs_closer() {
        let err = check_structure(&loop_net(false)).unwrap_err();
        assert!(matches!(err, GraphError::UnbrokenCycle { .. }));
        assert!(check_structure(&loop_net(true)).is_ok());
    }

    #[test]
    fn closer_on_open_line_is_redundant() {
        let mut net = Network::new();
        let src = net.add_component(Source::new("source")).unwrap();
        let closer = net.add_component(CycleCloser::new("closer")).unwrap();
        let sink = net.add_component(Sink::new("sink")).unwrap();
        net.add_connection("a", PortRef::outlet(src, 0), PortRef::inlet(closer, 0))
            .unwrap();
        net.add_connection("b", PortRef::outlet(closer, 0), PortRef::inlet(sink, 0))
            .unwrap();
        assert!(matches!(
            check_structure(&net),
            Err(GraphError::RedundantCycleCloser { .. })
        ));
    }

    #[test]
    fn two_closers_in_one_loop_rejected() {
        let mut net = Network::new();
        let pump = net.add_component(Pump::new("pump")).unwrap();
        let c1 = net.add_component(CycleCloser::new("closer 1")).unwrap();
        let c2 = net.add_component(CycleCloser::new("closer 2")).unwrap();
        net.add_connection("a", PortRef::outlet(pump, 0), PortRef::inlet(c1, 0))
            .unwrap();
        net.add_connection("b", PortRef::outlet(c1, 0), PortRef::inlet(c2, 0))
            .unwrap();
        net.add_connection("c", PortRef::outlet(c2, 0), PortRef::inlet(pump, 0))
            .unwrap();
        assert!(matches!(
            check_structure(&net),
            Err(GraphError::RedundantCycleCloser { .. })
        ));
    }

    #[test]
    fn saturated_t_and_p_are_over_specified() {
        let mut net = loop_net(true);
        let a = net.connection_id("a").unwrap();
        let t_sat = net
            .default_fluid()
            .saturation_temperature(pa(1.0e5))
            .unwrap()
            .value;
        net.connection_mut(a)
            .unwrap()
            .set_attr(&UnitSystem::si(), ConnAttrs::new().p(1.0e5).t(t_sat))
            .unwrap();
        assert!(matches!(
            check_over_specification(&net),
            Err(GraphError::OverSpecified { .. })
        ));

        net.connection_mut(a)
            .unwrap()
            .set_attr(&UnitSystem::si(), ConnAttrs::new().t(t_sat + 5.0))
            .unwrap();
        assert!(check_over_specification(&net).is_ok());
    }

    #[test]
    fn condenser_outlet_enthalpy_is_implied() {
        let mut net = Network::new();
        let cond = net.add_component(Condenser::new("condenser")).unwrap();
        let hot_in = net.add_component(Source::new("hot in")).unwrap();
        let hot_out = net.add_component(Sink::new("hot out")).unwrap();
        net.add_connection("h1", PortRef::outlet(hot_in, 0), PortRef::inlet(cond, 0))
            .unwrap();
        let h2 = net
            .add_connection("h2", PortRef::outlet(cond, 0), PortRef::inlet(hot_out, 0))
            .unwrap();
        net.connection_mut(h2)
            .unwrap()
            .set_attr(&UnitSystem::si(), ConnAttrs::new().h(1.9e5))
            .unwrap();
        let err = check_over_specification(&net).unwrap_err();
        assert!(err.to_string().contains("h on connection 'h2'"));
    }
}
