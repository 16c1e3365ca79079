//! Integration tests for rk-components with the IAPWS-IF97 water model.

use proptest::prelude::*;
use rk_components::{
    Component, ComponentModel, Condenser, CycleCloser, PortState, PortStates, Pump,
    SimpleHeatExchanger, Turbine,
};
use rk_core::units::{k, pa};
use rk_fluids::{FluidModel, Iapws97};

fn two_port<'a>(fluid: &'a Iapws97, m: f64, a: (f64, f64), b: (f64, f64)) -> PortStates<'a> {
    PortStates {
        inlets: vec![PortState {
            m,
            p: a.0,
            h: a.1,
            fluid,
        }],
        outlets: vec![PortState {
            m,
            p: b.0,
            h: b.1,
            fluid,
        }],
    }
}

/// Hand-built design point of the reference plant; every component's
/// residuals must vanish and the closed energy balance must hold.
#[test]
fn rankine_loop_closes_by_hand() {
    let water = Iapws97::new();
    let m = 532.0;
    let (p1, p2) = (150.0e5, 0.1e5);
    let p4 = p1 / 0.9;

    let h1 = water.h_pt(pa(p1), k(873.15)).unwrap();
    let s1 = water.s_ph(pa(p1), h1).unwrap();
    let h2 = h1 - 0.9 * (h1 - water.h_ps(pa(p2), s1).unwrap());
    let h3 = water.saturated_liquid_enthalpy(pa(p2)).unwrap();
    let s3 = water.s_ph(pa(p2), h3).unwrap();
    let h4 = h3 + (water.h_ps(pa(p4), s3).unwrap() - h3) / 0.75;

    let turbine: Component = Turbine::new("steam turbine").with_eta_s(0.9).unwrap().into();
    let pump: Component = Pump::new("feed pump").with_eta_s(0.75).unwrap().into();
    let boiler: Component = SimpleHeatExchanger::new("steam generator")
        .with_pr(0.9)
        .unwrap()
        .into();
    let closer: Component = CycleCloser::new("cycle closer").into();

    let checks = [
        (&turbine, two_port(&water, m, (p1, h1), (p2, h2))),
        (&pump, two_port(&water, m, (p2, h3), (p4, h4))),
        (&boiler, two_port(&water, m, (p4, h4), (p1, h1))),
        (&closer, two_port(&water, m, (p1, h1), (p1, h1))),
    ];

    let mut outputs = Vec::new();
    for (component, ports) in &checks {
        let model = component.model();
        let params = model.implied_params(ports).unwrap();
        let mut residuals = Vec::new();
        model.residuals(ports, &params, &mut residuals).unwrap();
        assert_eq!(residuals.len(), model.equation_count());
        for r in &residuals {
            assert!(r.value.abs() < 1e-3, "{}: {r:?}", model.name());
        }
        outputs.push(model.outputs(ports, &params).unwrap());
    }

    let p_turbine = outputs[0].power.unwrap().value;
    let p_pump = outputs[1].power.unwrap().value;
    let q_boiler = outputs[2].heat_duty.unwrap().value;
    let q_condenser = m * (h2 - h3);
    assert!((q_boiler + p_pump - p_turbine - q_condenser).abs() < 1e-3);
    assert!((p_turbine / 1.0e6 - 702.9).abs() < 0.5, "P_t = {p_turbine}");
}

#[test]
fn condenser_guess_and_residual_counts_agree() {
    let condenser = Condenser::new("main condenser");
    assert_eq!(
        condenser.equation_count(),
        condenser.structural_equation_count() + condenser.params().len()
    );
}

proptest! {
    #[test]
    fn turbine_implied_efficiency_round_trips(eta in 0.3f64..1.0, p_out in 5.0e3f64..1.0e6) {
        let water = Iapws97::new();
        let p_in = 10.0e6;
        let h_in = water.h_pt(pa(p_in), k(823.15)).unwrap();
        let s_in = water.s_ph(pa(p_in), h_in).unwrap();
        let h_s = water.h_ps(pa(p_out), s_in).unwrap();
        let h_out = h_in - eta * (h_in - h_s);

        let turbine = Turbine::new("t");
        let ports = two_port(&water, 1.0, (p_in, h_in), (p_out, h_out));
        let implied = turbine.implied_params(&ports).unwrap();
        prop_assert!((implied[0] - eta).abs() < 1e-6);
        prop_assert!((implied[1] - p_out / p_in).abs() < 1e-12);
    }
}
