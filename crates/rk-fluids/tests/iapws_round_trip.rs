//! IF97 consistency checks across the regions the plant solver visits.

use proptest::prelude::*;
use rk_core::units::{k, pa};
use rk_fluids::{FluidError, FluidModel, Iapws97, Phase, StateInput};

fn near_saturation(p: f64, t: f64) -> bool {
    let model = Iapws97::new();
    match model.saturation_temperature(pa(p)) {
        Ok(ts) => (ts.value - t).abs() < 0.5,
        Err(_) => false,
    }
}

#[test]
fn rankine_state_points_are_consistent() {
    let model = Iapws97::new();
    // (p [Pa], T [K]) pairs matching live steam, feed water and cooling water.
    for (p, t) in [(150.0e5, 873.15), (166.7e5, 320.0), (1.2e5, 293.15), (1.0e4, 350.0)] {
        let pt = model.state(StateInput::PT { p: pa(p), t: k(t) }).unwrap();
        let ph = model.state(StateInput::PH { p: pa(p), h: pt.h() }).unwrap();
        assert!((ph.temperature().value - t).abs() < 1e-6, "p={p} T={t}");
        assert!((ph.s() - pt.s()).abs() < 1e-6);
    }
}

#[test]
fn isentropic_expansion_enters_dome() {
    let model = Iapws97::new();
    let inlet = model
        .state(StateInput::PT {
            p: pa(150.0e5),
            t: k(873.15),
        })
        .unwrap();
    let outlet = model
        .state(StateInput::PS {
            p: pa(1.0e4),
            s: inlet.s(),
        })
        .unwrap();
    match outlet.phase() {
        Phase::TwoPhase { quality } => assert!(quality > 0.7 && quality < 0.9),
        other => panic!("expected wet steam, got {other:?}"),
    }
    assert!((outlet.s() - inlet.s()).abs() < 1e-6);
}

#[test]
fn enthalpy_above_region2_is_out_of_range() {
    let model = Iapws97::new();
    let err = model
        .state(StateInput::PH {
            p: pa(1.0e5),
            h: 5.0e6,
        })
        .unwrap_err();
    assert!(matches!(err, FluidError::OutOfRange { .. }));
}

proptest! {
    #[test]
    fn ph_flash_inverts_pt(p in 1.0e3f64..1.6e7, t in 275.0f64..1000.0) {
        prop_assume!(!near_saturation(p, t));
        let model = Iapws97::new();
        let h = model.h_pt(pa(p), k(t)).unwrap();
        let back = model.t_ph(pa(p), h).unwrap();
        prop_assert!((back.value - t).abs() < 1e-6, "p={} t={} back={}", p, t, back.value);
    }

    #[test]
    fn ps_flash_inverts_pt(p in 1.0e3f64..1.6e7, t in 275.0f64..1000.0) {
        prop_assume!(!near_saturation(p, t));
        let model = Iapws97::new();
        let state = model.state(StateInput::PT { p: pa(p), t: k(t) }).unwrap();
        let h = model.h_ps(pa(p), state.s()).unwrap();
        prop_assert!((h - state.h()).abs() < 1e-3 * state.h().abs().max(1.0));
    }

    #[test]
    fn two_phase_quality_is_bounded(p in 1.0e3f64..1.5e7, x in 0.0f64..1.0) {
        let model = Iapws97::new();
        let hl = model.saturated_liquid_enthalpy(pa(p)).unwrap();
        let hv = model.saturated_vapor_enthalpy(pa(p)).unwrap();
        let state = model.state(StateInput::PH { p: pa(p), h: hl + x * (hv - hl) }).unwrap();
        let q = state.quality().unwrap_or(if x < 0.5 { 0.0 } else { 1.0 });
        prop_assert!((q - x).abs() < 1e-9);
    }
}
