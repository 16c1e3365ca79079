//! Common utilities for component calculations.

use crate::error::{ComponentError, ComponentResult};
use crate::ports::PortState;
use rk_core::numeric::ensure_finite;
use rk_core::units::pa;
use rk_fluids::FluidModel;

/// Isentropic efficiency assumed for initial guesses when it is unknown.
pub const DEFAULT_ETA_GUESS: f64 = 0.85;

/// Ensure a value is finite, returning ComponentError if not.
pub fn check_finite(value: f64, what: &'static str) -> ComponentResult<f64> {
    ensure_finite(value, what).map_err(|_| ComponentError::NonPhysical { what })
}

/// `num / den`, rejecting a vanishing denominator.
pub fn ratio(num: f64, den: f64, what: &'static str) -> ComponentResult<f64> {
    if den.abs() < f64::EPSILON * num.abs().max(1.0) {
        return Err(ComponentError::NonPhysical { what });
    }
    check_finite(num / den, what)
}

/// Enthalpy reached by an isentropic change from `inlet` to `p_out`.
pub fn isentropic_enthalpy(inlet: &PortState<'_>, p_out: f64) -> ComponentResult<f64> {
    isentropic_enthalpy_raw(inlet.fluid, inlet.p, inlet.h, p_out)
}

pub(crate) fn isentropic_enthalpy_raw(
    fluid: &dyn FluidModel,
    p_in: f64,
    h_in: f64,
    p_out: f64,
) -> ComponentResult<f64> {
    let s_in = fluid.s_ph(pa(p_in), h_in)?;
    Ok(fluid.h_ps(pa(p_out), s_in)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rk_fluids::Iapws97;

    #[test]
    fn test_check_finite() {
        assert!(check_finite(1.0, "test").is_ok());
        assert!(check_finite(f64::INFINITY, "test").is_err());
        assert!(check_finite(f64::NAN, "test").is_err());
    }

    #[test]
    fn ratio_rejects_zero_denominator() {
        assert!(ratio(1.0, 0.0, "test").is_err());
        assert_eq!(ratio(3.0, 2.0, "test").unwrap(), 1.5);
    }

    #[test]
    fn isentropic_expansion_lowers_enthalpy() {
        let water = Iapws97::new();
        let h_in = water.h_pt(pa(15.0e6), rk_core::units::k(873.15)).unwrap();
        let inlet = PortState {
            m: 1.0,
            p: 15.0e6,
            h: h_in,
            fluid: &water,
        };
        let h_s = isentropic_enthalpy(&inlet, 1.0e4).unwrap();
        assert!(h_s < h_in - 1.0e6);
    }
}
