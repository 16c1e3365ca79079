//! End-to-end solves of the reference Rankine plant.

use proptest::prelude::*;
use rk_components::{
    Condenser, CycleCloser, Pump, SimpleHeatExchanger, Sink, Source, StateVar, Turbine,
};
use rk_core::UnitSystem;
use rk_core::units::{k, pa};
use rk_fluids::{FluidModel, Iapws97};
use rk_graph::{ConnAttrs, Network, PortRef};
use rk_results::{ResultsError, SolveStatus};
use rk_solver::{Solver, SolverConfig, SolverError};

fn rankine_with(p_cond_bar: f64, eta_turbine: f64) -> Network {
    let mut net = Network::new();
    let closer = net.add_component(CycleCloser::new("cycle closer")).unwrap();
    let boiler = net
        .add_component(SimpleHeatExchanger::new("steam generator").with_pr(0.9).unwrap())
        .unwrap();
    let condenser = net
        .add_component(
            Condenser::new("main condenser")
                .with_pr1(1.0)
                .unwrap()
                .with_pr2(0.98)
                .unwrap(),
        )
        .unwrap();
    let turbine = net
        .add_component(Turbine::new("steam turbine").with_eta_s(eta_turbine).unwrap())
        .unwrap();
    let pump = net
        .add_component(Pump::new("feed pump").with_eta_s(0.75).unwrap())
        .unwrap();
    let cw_in = net.add_component(Source::new("cooling water source")).unwrap();
    let cw_out = net.add_component(Sink::new("cooling water sink")).unwrap();

    let links = [
        ("1", PortRef::outlet(closer, 0), PortRef::inlet(turbine, 0)),
        ("2", PortRef::outlet(turbine, 0), PortRef::inlet(condenser, 0)),
        ("3", PortRef::outlet(condenser, 0), PortRef::inlet(pump, 0)),
        ("4", PortRef::outlet(pump, 0), PortRef::inlet(boiler, 0)),
        ("0", PortRef::outlet(boiler, 0), PortRef::inlet(closer, 0)),
        ("11", PortRef::outlet(cw_in, 0), PortRef::inlet(condenser, 1)),
        ("12", PortRef::outlet(condenser, 1), PortRef::inlet(cw_out, 0)),
    ];
    for (label, from, to) in links {
        net.add_connection(label, from, to).unwrap();
    }

    let eng = UnitSystem::engineering();
    let specs = [
        ("1", ConnAttrs::new().t(600.0).p(150.0).m(532.0)),
        ("2", ConnAttrs::new().p(p_cond_bar)),
        ("11", ConnAttrs::new().t(20.0).p(1.2)),
        ("12", ConnAttrs::new().t(30.0)),
    ];
    for (label, attrs) in specs {
        let id = net.connection_id(label).unwrap();
        net.connection_mut(id).unwrap().set_attr(&eng, attrs).unwrap();
    }
    net
}

fn rankine() -> Network {
    rankine_with(0.1, 0.9)
}

fn assert_rel(actual: f64, expected: f64, rel: f64, what: &str) {
    assert!(
        ((actual - expected) / expected).abs() < rel,
        "{what}: {actual} vs {expected}"
    );
}

#[test]
fn reference_plant_matches_expected_values() {
    let mut net = rankine();
    let mut solver = Solver::default();
    let results = solver.solve(&mut net).unwrap();
    let eng = UnitSystem::engineering();

    let h = |label: &str| results.connection_in(label, &eng).unwrap().h;
    assert_rel(h("1"), 3583.31, 1e-3, "h1");
    assert_rel(h("2"), 2262.09, 1e-3, "h2");
    assert_rel(h("3"), 191.81, 1e-3, "h3");
    assert_rel(h("4"), 214.17, 1e-3, "h4");
    assert_rel(results.connection_in("4", &eng).unwrap().p, 166.67, 1e-3, "p4");
    assert_rel(results.connection("11").unwrap().m_kg_s, 26337.7, 2e-3, "m_cw");

    let p_t = results.power("steam turbine", &eng).unwrap();
    let p_p = results.power("feed pump", &eng).unwrap();
    let q_b = results.heat_duty("steam generator", &eng).unwrap();
    let q_c = results.heat_duty("main condenser", &eng).unwrap();
    assert_rel(p_t, 702.888, 1e-3, "turbine power");
    assert_rel(p_p, 11.895, 2e-3, "pump power");
    assert_rel(q_b, 1792.38, 1e-3, "boiler heat");
    assert_rel(q_c, 1101.39, 1e-3, "condenser heat");
    assert!(p_t - p_p > 0.0);
    assert_rel((p_t - p_p) / q_b, 0.38552, 1e-3, "efficiency");
}

#[test]
fn energy_balance_closes() {
    let mut net = rankine();
    let mut solver = Solver::default();
    let results = solver.solve(&mut net).unwrap();
    let si = UnitSystem::si();

    let p_t = results.power("steam turbine", &si).unwrap();
    let p_p = results.power("feed pump", &si).unwrap();
    let q_b = results.heat_duty("steam generator", &si).unwrap();
    let q_c = results.heat_duty("main condenser", &si).unwrap();

    // Q_boiler + P_pump = P_turbine + Q_condenser, within a few watts of ~1.8 GW
    assert!((q_b + p_p - p_t - q_c).abs() < 10.0);
    // efficiency identity of the net work
    let eta = (p_t - p_p) / q_b;
    assert!((p_t - p_p - q_b * eta).abs() < 1e-6);

    let closer = results.component("cycle closer").unwrap();
    assert!(closer.diagnostic("mass_imbalance").unwrap().abs() < 1e-6);
    assert!(closer.diagnostic("energy_imbalance").unwrap().abs() < 10.0);
}

#[test]
fn specifications_hold_at_the_solution() {
    let mut net = rankine();
    let mut solver = Solver::default();
    let results = solver.solve(&mut net).unwrap();

    let live = results.connection("1").unwrap();
    assert!((live.t_k - 873.15).abs() < 1e-5);
    assert!((live.p_pa - 150.0e5).abs() < 1e-2);
    assert!((live.m_kg_s - 532.0).abs() < 1e-6);
    assert!((results.connection("2").unwrap().p_pa - 1.0e4).abs() < 1e-2);
    assert!((results.connection("12").unwrap().t_k - 303.15).abs() < 1e-5);

    // saturated liquid leaves the condenser
    let water = Iapws97::new();
    let h_sat = water.saturated_liquid_enthalpy(pa(1.0e4)).unwrap();
    assert!((results.connection("3").unwrap().h_j_per_kg - h_sat).abs() < 1e-2);
    assert_eq!(results.connection("2").unwrap().phase, "two-phase");
    assert_eq!(results.connection("1").unwrap().phase, "vapor");
}

#[test]
fn single_phase_states_round_trip_through_the_equation_of_state() {
    let mut net = rankine();
    let mut solver = Solver::default();
    let results = solver.solve(&mut net).unwrap();
    let water = Iapws97::new();

    for label in ["1", "4", "0", "11", "12"] {
        let c = results.connection(label).unwrap();
        let h = water.h_pt(pa(c.p_pa), k(c.t_k)).unwrap();
        assert!((h - c.h_j_per_kg).abs() < 0.1, "{label}: {h} vs {}", c.h_j_per_kg);
    }
}

#[test]
fn states_are_written_back_to_connections() {
    let mut net = rankine();
    Solver::default().solve(&mut net).unwrap();
    for conn in net.connections() {
        let state = conn.get_state();
        assert!(state.m > 0.0, "{}", conn.label);
        assert!(state.p > 0.0, "{}", conn.label);
        assert!(state.t.is_some(), "{}", conn.label);
    }
    let one = net.connection_id("1").unwrap();
    assert!((net.connection(one).unwrap().get_state().t.unwrap() - 873.15).abs() < 1e-5);
}

#[test]
fn repeated_cold_solves_are_identical() {
    let mut a = rankine();
    let mut b = rankine();
    let ra = Solver::default().solve(&mut a).unwrap().clone();
    let rb = Solver::default().solve(&mut b).unwrap().clone();
    let (sa, sb) = (ra.snapshot().unwrap(), rb.snapshot().unwrap());
    for (x, y) in sa.connections.iter().zip(&sb.connections) {
        assert_eq!(x.label, y.label);
        assert!((x.h_j_per_kg - y.h_j_per_kg).abs() < 1e-6);
        assert!((x.p_pa - y.p_pa).abs() < 1e-6);
        assert!((x.m_kg_s - y.m_kg_s).abs() < 1e-9);
    }
}

#[test]
fn warm_start_after_parameter_change_matches_cold_solve() {
    let mut net = rankine();
    let mut solver = Solver::new(SolverConfig::warm());
    solver.solve(&mut net).unwrap();
    let eng = UnitSystem::engineering();
    let before = solver.results().power("steam turbine", &eng).unwrap();

    net.set_param("steam turbine", "eta_s", 0.85).unwrap();
    let warm = solver
        .solve(&mut net)
        .unwrap()
        .power("steam turbine", &eng)
        .unwrap();
    assert!(warm < before);

    let mut fresh = rankine_with(0.1, 0.85);
    let cold = Solver::default()
        .solve(&mut fresh)
        .unwrap()
        .power("steam turbine", &eng)
        .unwrap();
    assert!((warm - cold).abs() < 1e-4);
}

#[test]
fn higher_turbine_efficiency_gives_more_net_power() {
    let eng = UnitSystem::engineering();
    let mut last = f64::NEG_INFINITY;
    for eta in [0.8, 0.85, 0.9, 0.95] {
        let mut net = rankine_with(0.1, eta);
        let mut solver = Solver::default();
        let results = solver.solve(&mut net).unwrap();
        let net_power = results.power("steam turbine", &eng).unwrap()
            - results.power("feed pump", &eng).unwrap();
        assert!(net_power > last, "eta {eta}: {net_power} <= {last}");
        last = net_power;
    }
}

#[test]
fn zero_condenser_pressure_is_out_of_range() {
    let mut net = rankine_with(0.0, 0.9);
    let mut solver = Solver::default();
    let err = solver.solve(&mut net).unwrap_err();
    assert!(matches!(err, SolverError::OutOfRange(_)), "{err}");
    assert_eq!(solver.status(), SolveStatus::OutOfRangeError);
    assert!(matches!(
        solver.results().connection("1"),
        Err(ResultsError::NotConverged { .. })
    ));
}

#[test]
fn missing_specification_is_a_dof_error() {
    let mut net = rankine();
    let two = net.connection_id("2").unwrap();
    net.connection_mut(two).unwrap().unset_attr(StateVar::Pressure);
    let mut solver = Solver::default();
    solver.solve(&mut net).unwrap_err();
    assert_eq!(solver.status(), SolveStatus::DegreesOfFreedomError { delta: 1 });
}

#[test]
fn redundant_specification_is_a_dof_error() {
    let mut net = rankine();
    let two = net.connection_id("2").unwrap();
    net.connection_mut(two)
        .unwrap()
        .set_attr(&UnitSystem::si(), ConnAttrs::new().m(532.0))
        .unwrap();
    let mut solver = Solver::default();
    let err = solver.solve(&mut net).unwrap_err();
    assert_eq!(err.status(), SolveStatus::DegreesOfFreedomError { delta: -1 });
}

#[test]
fn iteration_budget_reports_max_iterations_and_keeps_last_iterate() {
    let mut net = rankine();
    let mut solver = Solver::new(SolverConfig::warm());
    solver.solve(&mut net).unwrap();

    // Warm start from the 0.1 bar solution, then allow a single step
    let two = net.connection_id("2").unwrap();
    net.connection_mut(two)
        .unwrap()
        .set_attr(&UnitSystem::engineering(), ConnAttrs::new().p(0.3))
        .unwrap();
    solver.config_mut().max_iterations = 1;
    let err = solver.solve(&mut net).unwrap_err();
    assert!(
        matches!(err, SolverError::MaxIterationsExceeded { iterations: 1, .. }),
        "{err}"
    );
    assert_eq!(solver.status(), SolveStatus::MaxIterationsExceeded);

    let one = net.connection_id("1").unwrap();
    assert!((net.connection(one).unwrap().get_state().m - 532.0).abs() < 1e-6);
    assert!((net.connection(two).unwrap().get_state().p - 0.3e5).abs() < 1e-2);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn energy_balance_closes_across_operating_points(
        p_cond in 0.04f64..1.0,
        eta in 0.7f64..0.99,
    ) {
        let mut net = rankine_with(p_cond, eta);
        let mut solver = Solver::default();
        let results = solver.solve(&mut net).unwrap();
        let si = UnitSystem::si();
        let p_t = results.power("steam turbine", &si).unwrap();
        let p_p = results.power("feed pump", &si).unwrap();
        let q_b = results.heat_duty("steam generator", &si).unwrap();
        let q_c = results.heat_duty("main condenser", &si).unwrap();
        prop_assert_eq!(solver.status(), SolveStatus::Converged);
        prop_assert!(p_t > p_p);
        prop_assert!(
            (q_b + p_p - p_t - q_c).abs() < 1e-7 * q_b,
            "p_cond={} eta={} imbalance={}", p_cond, eta, q_b + p_p - p_t - q_c
        );
    }
}
