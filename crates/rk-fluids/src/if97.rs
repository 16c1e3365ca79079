//! IAPWS-IF97 industrial formulation for water and steam.
//!
//! Implements region 1 (compressed liquid), region 2 (superheated vapor),
//! region 4 (saturation line) and the B23 boundary equation. Region 3 (near
//! critical) and region 5 (high temperature) are not covered; states there
//! are rejected with [`FluidError::OutOfRange`].
//!
//! All public functions take and return SI values: Pa, K, J/kg, J/(kg·K), m³/kg.

use crate::error::{FluidError, FluidResult};
use crate::state::StateInput;
use rk_core::units::{k, pa};

/// Specific gas constant of water [J/(kg·K)].
pub const R: f64 = 461.526;

/// Lowest pressure covered (triple point) [Pa].
pub const P_MIN: f64 = 611.657;
/// Highest pressure covered [Pa].
pub const P_MAX: f64 = 100.0e6;
/// Lowest temperature covered [K].
pub const T_MIN: f64 = 273.15;
/// Highest temperature covered by region 2 [K].
pub const T_MAX: f64 = 1073.15;
/// Critical temperature [K].
pub const T_CRIT: f64 = 647.096;
/// Critical pressure [Pa].
pub const P_CRIT: f64 = 22.064e6;
/// Region 1/3 boundary temperature [K].
pub const T_13: f64 = 623.15;
/// Saturation pressure at [`T_13`], where region 4 meets region 3 [Pa].
pub const P_13: f64 = 16.529_164_252_6e6;

const FLASH_MAX_ITERS: usize = 100;

// Region 1: (I, J, n)
const REGION1: [(i32, i32, f64); 34] = [
    (0, -2, 0.14632971213167),
    (0, -1, -0.84548187169114),
    (0, 0, -0.37563603672040e1),
    (0, 1, 0.33855169168385e1),
    (0, 2, -0.95791963387872),
    (0, 3, 0.15772038513228),
    (0, 4, -0.16616417199501e-1),
    (0, 5, 0.81214629983568e-3),
    (1, -9, 0.28319080123804e-3),
    (1, -7, -0.60706301565874e-3),
    (1, -1, -0.18990068218419e-1),
    (1, 0, -0.32529748770505e-1),
    (1, 1, -0.21841717175414e-1),
    (1, 3, -0.52838357969930e-4),
    (2, -3, -0.47184321073267e-3),
    (2, 0, -0.30001780793026e-3),
    (2, 1, 0.47661393906987e-4),
    (2, 3, -0.44141845330846e-5),
    (2, 17, -0.72694996297594e-15),
    (3, -4, -0.31679644845054e-4),
    (3, 0, -0.28270797985312e-5),
    (3, 6, -0.85205128120103e-9),
    (4, -5, -0.22425281908000e-5),
    (4, -2, -0.65171222895601e-6),
    (4, 10, -0.14341729937924e-12),
    (5, -8, -0.40516996860117e-6),
    (8, -11, -0.12734301741641e-8),
    (8, -6, -0.17424871230634e-9),
    (21, -29, -0.68762131295531e-18),
    (23, -31, 0.14478307828521e-19),
    (29, -38, 0.26335781662795e-22),
    (30, -39, -0.11947622640071e-22),
    (31, -40, 0.18228094581404e-23),
    (32, -41, -0.93537087292458e-25),
];

// Region 2 ideal-gas part: (J, n)
const REGION2_IDEAL: [(i32, f64); 9] = [
    (0, -0.96927686500217e1),
    (1, 0.10086655968018e2),
    (-5, -0.56087911283020e-2),
    (-4, 0.71452738081455e-1),
    (-3, -0.40710498223928),
    (-2, 0.14240819171444e1),
    (-1, -0.43839511319450e1),
    (2, -0.28408632460772),
    (3, 0.21268463753307e-1),
];

// Region 2 residual part: (I, J, n)
const REGION2_RES: [(i32, i32, f64); 43] = [
    (1, 0, -0.17731742473213e-2),
    (1, 1, -0.17834862292358e-1),
    (1, 2, -0.45996013696365e-1),
    (1, 3, -0.57581259083432e-1),
    (1, 6, -0.50325278727930e-1),
    (2, 1, -0.33032641670203e-4),
    (2, 2, -0.18948987516315e-3),
    (2, 4, -0.39392777243355e-2),
    (2, 7, -0.43797295650573e-1),
    (2, 36, -0.26674547914087e-4),
    (3, 0, 0.20481737692309e-7),
    (3, 1, 0.43870667284435e-6),
    (3, 3, -0.32277677238570e-4),
    (3, 6, -0.15033924542148e-2),
    (3, 35, -0.40668253562649e-1),
    (4, 1, -0.78847309559367e-9),
    (4, 2, 0.12790717852285e-7),
    (4, 3, 0.48225372718507e-6),
    (5, 7, 0.22922076337661e-5),
    (6, 3, -0.16714766451061e-10),
    (6, 16, -0.21171472321355e-2),
    (6, 35, -0.23895741934104e2),
    (7, 0, -0.59059564324270e-17),
    (7, 11, -0.12621808899101e-5),
    (7, 25, -0.38946842435739e-1),
    (8, 8, 0.11256211360459e-10),
    (8, 36, -0.82311340897998e1),
    (9, 13, 0.19809712802088e-7),
    (10, 4, 0.10406965210174e-18),
    (10, 10, -0.10234747095929e-12),
    (10, 14, -0.10018179379511e-8),
    (16, 29, -0.80882908646985e-10),
    (16, 50, 0.10693031879409),
    (18, 57, -0.33662250574171),
    (20, 20, 0.89185845355421e-24),
    (20, 35, 0.30629316876232e-12),
    (20, 48, -0.42002467698208e-5),
    (21, 21, -0.59056029685639e-25),
    (22, 53, 0.37826947613457e-5),
    (23, 39, -0.12768608934681e-14),
    (24, 26, 0.73087610595061e-28),
    (24, 40, 0.55414715350778e-16),
    (24, 58, -0.94369707241210e-6),
];

// Region 4 saturation-line coefficients n1..n10.
const REGION4: [f64; 10] = [
    0.11670521452767e4,
    -0.72421316703206e6,
    -0.17073846940092e2,
    0.12020824702470e5,
    -0.32325550322333e7,
    0.14915108613530e2,
    -0.48232657361591e4,
    0.40511340542057e6,
    -0.23855557567849,
    0.65017534844798e3,
];

// B23 boundary coefficients n1..n5 (MPa, K).
const B23: [f64; 5] = [
    0.34805185628969e3,
    -0.11671859879975e1,
    0.10192970039326e-2,
    0.57254459862746e3,
    0.13918839778870e2,
];

/// IF97 region of a state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Region {
    One,
    Two,
    Four,
}

/// Single-phase properties from one Gibbs-function evaluation.
#[derive(Debug, Clone, Copy)]
pub struct Props {
    /// Specific enthalpy [J/kg]
    pub h: f64,
    /// Specific entropy [J/(kg·K)]
    pub s: f64,
    /// Specific volume [m³/kg]
    pub v: f64,
    /// Isobaric heat capacity [J/(kg·K)]
    pub cp: f64,
    /// Isothermal enthalpy derivative (∂h/∂p)_T [J/(kg·Pa)]
    pub dh_dp_t: f64,
}

/// Fully resolved state point.
#[derive(Debug, Clone, Copy)]
pub struct Point {
    pub p: f64,
    pub t: f64,
    pub h: f64,
    pub s: f64,
    pub v: f64,
    /// `None` inside the two-phase dome.
    pub cp: Option<f64>,
    /// `None` inside the two-phase dome.
    pub dh_dp_t: Option<f64>,
    /// Vapor mass fraction, `Some` only inside the dome.
    pub quality: Option<f64>,
    pub region: Region,
}

impl Point {
    fn single_phase(p: f64, t: f64, props: Props, region: Region) -> Self {
        Self {
            p,
            t,
            h: props.h,
            s: props.s,
            v: props.v,
            cp: Some(props.cp),
            dh_dp_t: Some(props.dh_dp_t),
            quality: None,
            region,
        }
    }
}

/// Region 1 Gibbs free energy and derivatives at (p [Pa], T [K]).
pub fn region1(p: f64, t: f64) -> Props {
    const P_STAR: f64 = 16.53e6;
    const T_STAR: f64 = 1386.0;
    let pi = p / P_STAR;
    let tau = T_STAR / t;
    let a = 7.1 - pi;
    let b = tau - 1.222;

    let mut g = 0.0;
    let mut g_p = 0.0;
    let mut g_t = 0.0;
    let mut g_tt = 0.0;
    let mut g_pt = 0.0;
    for &(i, j, n) in REGION1.iter() {
        let fi = f64::from(i);
        let fj = f64::from(j);
        g += n * a.powi(i) * b.powi(j);
        g_p -= n * fi * a.powi(i - 1) * b.powi(j);
        g_t += n * a.powi(i) * fj * b.powi(j - 1);
        g_tt += n * a.powi(i) * fj * (fj - 1.0) * b.powi(j - 2);
        g_pt -= n * fi * a.powi(i - 1) * fj * b.powi(j - 1);
    }

    Props {
        h: R * T_STAR * g_t,
        s: R * (tau * g_t - g),
        v: R * t / p * pi * g_p,
        cp: -R * tau * tau * g_tt,
        dh_dp_t: R * T_STAR * g_pt / P_STAR,
    }
}

/// Region 2 Gibbs free energy and derivatives at (p [Pa], T [K]).
pub fn region2(p: f64, t: f64) -> Props {
    const P_STAR: f64 = 1.0e6;
    const T_STAR: f64 = 540.0;
    let pi = p / P_STAR;
    let tau = T_STAR / t;
    let b = tau - 0.5;

    let mut g0 = pi.ln();
    let mut g0_t = 0.0;
    let mut g0_tt = 0.0;
    for &(j, n) in REGION2_IDEAL.iter() {
        let fj = f64::from(j);
        g0 += n * tau.powi(j);
        g0_t += n * fj * tau.powi(j - 1);
        g0_tt += n * fj * (fj - 1.0) * tau.powi(j - 2);
    }

    let mut gr = 0.0;
    let mut gr_p = 0.0;
    let mut gr_t = 0.0;
    let mut gr_tt = 0.0;
    let mut gr_pt = 0.0;
    for &(i, j, n) in REGION2_RES.iter() {
        let fi = f64::from(i);
        let fj = f64::from(j);
        gr += n * pi.powi(i) * b.powi(j);
        gr_p += n * fi * pi.powi(i - 1) * b.powi(j);
        gr_t += n * pi.powi(i) * fj * b.powi(j - 1);
        gr_tt += n * pi.powi(i) * fj * (fj - 1.0) * b.powi(j - 2);
        gr_pt += n * fi * pi.powi(i - 1) * fj * b.powi(j - 1);
    }

    Props {
        h: R * T_STAR * (g0_t + gr_t),
        s: R * (tau * (g0_t + gr_t) - (g0 + gr)),
        v: R * t / p * pi * (1.0 / pi + gr_p),
        cp: -R * tau * tau * (g0_tt + gr_tt),
        dh_dp_t: R * T_STAR * gr_pt / P_STAR,
    }
}

/// Saturation pressure [Pa] at temperature [K].
pub fn psat(t: f64) -> FluidResult<f64> {
    if !t.is_finite() || !(T_MIN..=T_CRIT).contains(&t) {
        return Err(out_of_range_pt("saturation temperature", f64::NAN, t));
    }
    let n = &REGION4;
    let theta = t + n[8] / (t - n[9]);
    let a = theta * theta + n[0] * theta + n[1];
    let b = n[2] * theta * theta + n[3] * theta + n[4];
    let c = n[5] * theta * theta + n[6] * theta + n[7];
    let p_mpa = (2.0 * c / (-b + (b * b - 4.0 * a * c).sqrt())).powi(4);
    Ok(p_mpa * 1.0e6)
}

/// Saturation temperature [K] at pressure [Pa].
pub fn tsat(p: f64) -> FluidResult<f64> {
    if !p.is_finite() || !(P_MIN..=P_CRIT).contains(&p) {
        return Err(out_of_range_pt("saturation pressure", p, f64::NAN));
    }
    let n = &REGION4;
    let beta = (p / 1.0e6).powf(0.25);
    let e = beta * beta + n[2] * beta + n[5];
    let f = n[0] * beta * beta + n[3] * beta + n[6];
    let g = n[1] * beta * beta + n[4] * beta + n[7];
    let d = 2.0 * g / (-f - (f * f - 4.0 * e * g).sqrt());
    Ok((n[9] + d - ((n[9] + d).powi(2) - 4.0 * (n[8] + n[9] * d)).sqrt()) / 2.0)
}

/// B23 boundary pressure [Pa] at temperature [K].
pub fn p_b23(t: f64) -> f64 {
    (B23[0] + B23[1] * t + B23[2] * t * t) * 1.0e6
}

/// B23 boundary temperature [K] at pressure [Pa].
pub fn t_b23(p: f64) -> f64 {
    B23[3] + ((p / 1.0e6 - B23[4]) / B23[2]).sqrt()
}

/// Region containing (p, T), or an error outside regions 1 and 2.
pub fn region_pt(p: f64, t: f64) -> FluidResult<Region> {
    check_pressure(p)?;
    if !t.is_finite() || !(T_MIN..=T_MAX).contains(&t) {
        return Err(out_of_range_pt("temperature", p, t));
    }
    if t <= T_13 {
        if p >= psat(t)? {
            Ok(Region::One)
        } else {
            Ok(Region::Two)
        }
    } else if p <= p_b23(t) {
        Ok(Region::Two)
    } else {
        Err(out_of_range_pt("region 3 (near-critical) state", p, t))
    }
}

/// Resolve a state from pressure and temperature.
pub fn flash_pt(p: f64, t: f64) -> FluidResult<Point> {
    match region_pt(p, t)? {
        Region::One => Ok(Point::single_phase(p, t, region1(p, t), Region::One)),
        _ => Ok(Point::single_phase(p, t, region2(p, t), Region::Two)),
    }
}

/// Resolve a state from pressure and specific enthalpy.
pub fn flash_ph(p: f64, h: f64) -> FluidResult<Point> {
    check_pressure(p)?;
    if !h.is_finite() {
        return Err(out_of_range_ph(p, h));
    }
    flash_on_isobar(p, h, Isobar::Enthalpy)
}

/// Resolve a state from pressure and specific entropy.
pub fn flash_ps(p: f64, s: f64) -> FluidResult<Point> {
    check_pressure(p)?;
    if !s.is_finite() {
        return Err(out_of_range_ps(p, s));
    }
    flash_on_isobar(p, s, Isobar::Entropy)
}

/// Saturated liquid and vapor points at pressure [Pa].
pub fn saturation_points(p: f64) -> FluidResult<(Point, Point)> {
    let t = tsat(p)?;
    if p > P_13 {
        return Err(out_of_range_pt("saturation above region 4 coverage", p, t));
    }
    let liquid = Point::single_phase(p, t, region1(p, t), Region::One);
    let vapor = Point::single_phase(p, t, region2(p, t), Region::Two);
    Ok((liquid, vapor))
}

pub(crate) fn check_pressure(p: f64) -> FluidResult<()> {
    if !p.is_finite() || !(P_MIN..=P_MAX).contains(&p) {
        return Err(FluidError::OutOfRange {
            what: "pressure outside IF97 envelope",
            input: StateInput::PT {
                p: pa(p),
                t: k(f64::NAN),
            },
        });
    }
    Ok(())
}

#[derive(Clone, Copy)]
enum Isobar {
    Enthalpy,
    Entropy,
}

impl Isobar {
    fn value(self, props: &Props) -> f64 {
        match self {
            Isobar::Enthalpy => props.h,
            Isobar::Entropy => props.s,
        }
    }

    fn slope(self, props: &Props, t: f64) -> f64 {
        match self {
            Isobar::Enthalpy => props.cp,
            Isobar::Entropy => props.cp / t,
        }
    }

    fn out_of_range(self, p: f64, target: f64) -> FluidError {
        match self {
            Isobar::Enthalpy => out_of_range_ph(p, target),
            Isobar::Entropy => out_of_range_ps(p, target),
        }
    }
}

fn flash_on_isobar(p: f64, target: f64, kind: Isobar) -> FluidResult<Point> {
    if p <= P_13 {
        let (liquid, vapor) = saturation_points(p)?;
        let ts = liquid.t;
        let (lo, hi) = match kind {
            Isobar::Enthalpy => (liquid.h, vapor.h),
            Isobar::Entropy => (liquid.s, vapor.s),
        };
        if target < lo {
            let t = solve_isobar(p, target, T_MIN, ts, region1, kind)?;
            return Ok(Point::single_phase(p, t, region1(p, t), Region::One));
        }
        if target > hi {
            let t = solve_isobar(p, target, ts, T_MAX, region2, kind)?;
            return Ok(Point::single_phase(p, t, region2(p, t), Region::Two));
        }
        let x = if hi > lo { (target - lo) / (hi - lo) } else { 0.0 };
        return Ok(Point {
            p,
            t: ts,
            h: liquid.h + x * (vapor.h - liquid.h),
            s: liquid.s + x * (vapor.s - liquid.s),
            v: liquid.v + x * (vapor.v - liquid.v),
            cp: None,
            dh_dp_t: None,
            quality: Some(x),
            region: Region::Four,
        });
    }

    let liquid_edge = kind.value(&region1(p, T_13));
    if target <= liquid_edge {
        let t = solve_isobar(p, target, T_MIN, T_13, region1, kind)?;
        return Ok(Point::single_phase(p, t, region1(p, t), Region::One));
    }
    let tb = t_b23(p).min(T_MAX);
    let vapor_edge = kind.value(&region2(p, tb));
    if target >= vapor_edge {
        let t = solve_isobar(p, target, tb, T_MAX, region2, kind)?;
        return Ok(Point::single_phase(p, t, region2(p, t), Region::Two));
    }
    Err(kind.out_of_range(p, target))
}

/// Safeguarded Newton on T over `[t_lo, t_hi]` for a monotone isobar.
fn solve_isobar(
    p: f64,
    target: f64,
    t_lo: f64,
    t_hi: f64,
    props_fn: fn(f64, f64) -> Props,
    kind: Isobar,
) -> FluidResult<f64> {
    let f_lo = kind.value(&props_fn(p, t_lo)) - target;
    let f_hi = kind.value(&props_fn(p, t_hi)) - target;
    if f_lo > 0.0 || f_hi < 0.0 {
        return Err(kind.out_of_range(p, target));
    }

    let mut lo = t_lo;
    let mut hi = t_hi;
    let mut t = if f_hi > f_lo {
        t_lo - f_lo * (t_hi - t_lo) / (f_hi - f_lo)
    } else {
        0.5 * (t_lo + t_hi)
    };

    for _ in 0..FLASH_MAX_ITERS {
        let props = props_fn(p, t);
        let f = kind.value(&props) - target;
        if f > 0.0 {
            hi = t;
        } else {
            lo = t;
        }
        let slope = kind.slope(&props, t);
        let mut next = if slope.is_finite() && slope > 0.0 {
            t - f / slope
        } else {
            0.5 * (lo + hi)
        };
        if !(next > lo && next < hi) {
            next = 0.5 * (lo + hi);
        }
        if (next - t).abs() <= 1e-11 * t || hi - lo <= 1e-11 * t {
            return Ok(next);
        }
        t = next;
    }

    Err(FluidError::ConvergenceFailed {
        what: "IF97 isobaric temperature inversion",
    })
}

fn out_of_range_pt(what: &'static str, p: f64, t: f64) -> FluidError {
    FluidError::OutOfRange {
        what,
        input: StateInput::PT { p: pa(p), t: k(t) },
    }
}

fn out_of_range_ph(p: f64, h: f64) -> FluidError {
    FluidError::OutOfRange {
        what: "enthalpy outside regions 1, 2 and 4",
        input: StateInput::PH { p: pa(p), h },
    }
}

fn out_of_range_ps(p: f64, s: f64) -> FluidError {
    FluidError::OutOfRange {
        what: "entropy outside regions 1, 2 and 4",
        input: StateInput::PS { p: pa(p), s },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64, rel: f64) -> bool {
        (a - b).abs() <= rel * b.abs().max(1e-12)
    }

    // Reference values from the IAPWS-IF97 verification tables.
    #[test]
    fn region1_verification_point() {
        let props = region1(3.0e6, 300.0);
        assert!(close(props.h, 115.331273e3, 1e-8), "h = {}", props.h);
        assert!(close(props.s, 0.392294792e3, 1e-8), "s = {}", props.s);
        assert!(close(props.v, 0.100215168e-2, 1e-8), "v = {}", props.v);
        assert!(close(props.cp, 4.17301218e3, 1e-8), "cp = {}", props.cp);

        assert!(close(region1(80.0e6, 300.0).h, 184.142828e3, 1e-8));
        assert!(close(region1(3.0e6, 500.0).h, 975.542239e3, 1e-8));
    }

    #[test]
    fn region2_verification_point() {
        let props = region2(3500.0, 300.0);
        assert!(close(props.h, 2549.91145e3, 1e-8), "h = {}", props.h);
        assert!(close(props.s, 8.52238967e3, 1e-8), "s = {}", props.s);

        assert!(close(region2(3500.0, 700.0).h, 3335.68375e3, 1e-8));
        assert!(close(region2(30.0e6, 700.0).h, 2631.49474e3, 1e-8));
    }

    #[test]
    fn region4_verification_points() {
        assert!(close(psat(300.0).unwrap(), 0.353658941e-2 * 1e6, 1e-8));
        assert!(close(psat(500.0).unwrap(), 0.263889776e1 * 1e6, 1e-8));
        assert!(close(tsat(0.1e6).unwrap(), 372.755919, 1e-8));
        assert!(close(tsat(1.0e6).unwrap(), 453.035632, 1e-8));
    }

    #[test]
    fn b23_round_trip() {
        let p = p_b23(623.15);
        assert!(close(p, P_13, 1e-6));
        assert!((t_b23(p) - 623.15).abs() < 1e-6);
    }

    #[test]
    fn dh_dp_matches_finite_difference() {
        for (p, t, f) in [
            (3.0e6, 300.0, region1 as fn(f64, f64) -> Props),
            (1.0e5, 500.0, region2 as fn(f64, f64) -> Props),
        ] {
            let dp = 10.0;
            let fd = (f(p + dp, t).h - f(p - dp, t).h) / (2.0 * dp);
            let analytic = f(p, t).dh_dp_t;
            assert!((fd - analytic).abs() < 1e-6 * analytic.abs().max(1e-6));
        }
    }

    #[test]
    fn superheated_live_steam() {
        let point = flash_pt(150.0e5, 873.15).unwrap();
        assert_eq!(point.region, Region::Two);
        assert!((point.h - 3_583_307.6).abs() < 50.0, "h = {}", point.h);
    }

    #[test]
    fn two_phase_flash_reports_quality() {
        let (liquid, vapor) = saturation_points(1.0e4).unwrap();
        let h = 0.5 * (liquid.h + vapor.h);
        let point = flash_ph(1.0e4, h).unwrap();
        assert_eq!(point.region, Region::Four);
        assert!((point.quality.unwrap() - 0.5).abs() < 1e-12);
        assert!((point.t - liquid.t).abs() < 1e-12);
        assert!(point.cp.is_none());
    }

    #[test]
    fn saturated_liquid_at_condenser_pressure() {
        let (liquid, _) = saturation_points(1.0e4).unwrap();
        assert!((liquid.h - 191.81e3).abs() < 50.0, "h' = {}", liquid.h);
    }

    #[test]
    fn region3_is_rejected() {
        let err = flash_pt(25.0e6, 650.0).unwrap_err();
        assert!(matches!(err, FluidError::OutOfRange { .. }));
    }

    #[test]
    fn below_triple_point_is_rejected() {
        assert!(matches!(
            flash_ph(0.0, 1.0e5),
            Err(FluidError::OutOfRange { .. })
        ));
        assert!(matches!(tsat(100.0), Err(FluidError::OutOfRange { .. })));
    }

    #[test]
    fn ps_flash_inverts_pt() {
        let reference = flash_pt(150.0e5, 873.15).unwrap();
        let point = flash_ps(150.0e5, reference.s).unwrap();
        assert!((point.t - 873.15).abs() < 1e-6);
        assert!((point.h - reference.h).abs() < 1e-3);
    }
}
