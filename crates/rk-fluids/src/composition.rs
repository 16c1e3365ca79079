//! Fluid composition as a mass-fraction map.

use crate::error::{FluidError, FluidResult};
use rk_core::numeric::{Tolerances, nearly_equal};

/// Canonical name of the working fluid.
pub const WATER: &str = "water";

/// Fluid composition defined by normalized mass fractions.
///
/// The composition is always normalized (fractions sum to 1.0) and keyed by
/// lower-case fluid name. The property models in this crate handle pure
/// water only; other names are accepted here and rejected by
/// [`crate::FluidModel::supports_composition`].
#[derive(Debug, Clone, PartialEq)]
pub struct Composition {
    items: Vec<(String, f64)>,
}

impl Composition {
    /// Pure water.
    pub fn water() -> Self {
        Self::pure(WATER)
    }

    /// Create a pure-fluid composition.
    pub fn pure(name: &str) -> Self {
        Self {
            items: vec![(canonical_name(name), 1.0)],
        }
    }

    /// Create a composition from mass fractions.
    ///
    /// Validates that all fractions are finite, non-negative, and have a positive sum,
    /// then normalizes to sum=1. Repeated names are merged.
    pub fn new_mass_fractions<S: AsRef<str>>(fractions: Vec<(S, f64)>) -> FluidResult<Self> {
        if fractions.is_empty() {
            return Err(FluidError::InvalidArg {
                what: "empty composition",
            });
        }

        let mut merged: Vec<(String, f64)> = Vec::with_capacity(fractions.len());
        let mut sum = 0.0;
        for (name, frac) in &fractions {
            if !frac.is_finite() {
                return Err(FluidError::NonPhysical {
                    what: "non-finite mass fraction",
                });
            }
            if *frac < 0.0 {
                return Err(FluidError::NonPhysical {
                    what: "negative mass fraction",
                });
            }
            let key = canonical_name(name.as_ref());
            match merged.iter_mut().find(|(n, _)| *n == key) {
                Some((_, f)) => *f += frac,
                None => merged.push((key, *frac)),
            }
            sum += frac;
        }

        if sum <= 0.0 || !sum.is_finite() {
            return Err(FluidError::NonPhysical {
                what: "mass fractions sum to zero or non-finite",
            });
        }

        let normalized: Vec<(String, f64)> = merged
            .into_iter()
            .map(|(n, f)| (n, f / sum))
            .filter(|(_, f)| *f > 1e-15)
            .collect();

        if normalized.is_empty() {
            return Err(FluidError::NonPhysical {
                what: "all mass fractions negligible",
            });
        }

        Ok(Self { items: normalized })
    }

    /// Mass fraction of a fluid (0.0 if not present).
    pub fn mass_fraction(&self, name: &str) -> f64 {
        let key = canonical_name(name);
        self.items
            .iter()
            .find(|(n, _)| *n == key)
            .map(|(_, f)| *f)
            .unwrap_or(0.0)
    }

    /// Returns the fluid name if exactly one fluid has fraction ≈1.0.
    pub fn is_pure(&self) -> Option<&str> {
        if let [(name, frac)] = self.items.as_slice() {
            let tol = Tolerances {
                abs: 1e-10,
                rel: 1e-10,
            };
            if nearly_equal(*frac, 1.0, tol) {
                return Some(name.as_str());
            }
        }
        None
    }

    pub fn is_water(&self) -> bool {
        self.is_pure() == Some(WATER)
    }

    /// Iterate over all fluids with non-zero mass fractions.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> + '_ {
        self.items.iter().map(|(n, f)| (n.as_str(), *f))
    }
}

impl Default for Composition {
    fn default() -> Self {
        Self::water()
    }
}

fn canonical_name(name: &str) -> String {
    let lower = name.trim().to_ascii_lowercase();
    match lower.as_str() {
        "h2o" | "steam" | "if97::water" => WATER.to_string(),
        _ => lower,
    }
}
