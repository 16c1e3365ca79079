//! Component parameters that are either fixed by the user or solved for.
//!
//! Every parameter owns one closing equation. A fixed parameter enters that
//! equation as a constant; a free parameter becomes an extra unknown, so
//! freeing a parameter never changes the degrees of freedom.

use crate::error::{ComponentError, ComponentResult};

/// Static description of one parameter slot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamSpec {
    pub name: &'static str,
    /// Lower bound, exclusive when `lower_open` is set.
    pub lower: f64,
    pub lower_open: bool,
    pub upper: f64,
    /// Value used when a free parameter cannot be derived from the guess.
    pub guess: f64,
}

impl ParamSpec {
    pub const fn ratio(name: &'static str) -> Self {
        Self {
            name,
            lower: 0.0,
            lower_open: true,
            upper: f64::INFINITY,
            guess: 1.0,
        }
    }

    pub const fn efficiency(name: &'static str) -> Self {
        Self {
            name,
            lower: 0.0,
            lower_open: true,
            upper: 1.0,
            guess: crate::common::DEFAULT_ETA_GUESS,
        }
    }

    /// Heat or power in watts; either sign allowed.
    pub const fn power(name: &'static str) -> Self {
        Self {
            name,
            lower: f64::NEG_INFINITY,
            lower_open: false,
            upper: f64::INFINITY,
            guess: 0.0,
        }
    }

    pub fn contains(&self, value: f64) -> bool {
        if !value.is_finite() || value > self.upper {
            return false;
        }
        if self.lower_open {
            value > self.lower
        } else {
            value >= self.lower
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParamValue {
    Fixed(f64),
    Free,
}

/// Parameter values of one component, in the order of its specs.
#[derive(Debug, Clone, PartialEq)]
pub struct ParamSet {
    specs: &'static [ParamSpec],
    values: Vec<ParamValue>,
}

impl ParamSet {
    /// All parameters start free.
    pub fn new(specs: &'static [ParamSpec]) -> Self {
        Self {
            specs,
            values: vec![ParamValue::Free; specs.len()],
        }
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }

    pub fn specs(&self) -> &'static [ParamSpec] {
        self.specs
    }

    pub fn values(&self) -> &[ParamValue] {
        &self.values
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.specs.iter().position(|s| s.name == name)
    }

    pub fn get(&self, name: &str) -> Option<ParamValue> {
        self.index_of(name).map(|i| self.values[i])
    }

    pub fn fixed(&self, name: &str) -> Option<f64> {
        match self.get(name)? {
            ParamValue::Fixed(v) => Some(v),
            ParamValue::Free => None,
        }
    }

    /// Fix a parameter after checking its bounds.
    ///
    /// Unknown names are reported with an empty component name; the owner
    /// fills it in.
    pub fn fix(&mut self, name: &str, value: f64) -> ComponentResult<()> {
        let index = self.lookup(name)?;
        let spec = &self.specs[index];
        if !spec.contains(value) {
            return Err(ComponentError::ParameterOutOfRange {
                name: spec.name,
                value,
            });
        }
        self.values[index] = ParamValue::Fixed(value);
        Ok(())
    }

    pub fn free(&mut self, name: &str) -> ComponentResult<()> {
        let index = self.lookup(name)?;
        self.values[index] = ParamValue::Free;
        Ok(())
    }

    pub fn free_count(&self) -> usize {
        self.values
            .iter()
            .filter(|v| matches!(v, ParamValue::Free))
            .count()
    }

    /// Indices of free parameters in declaration order.
    pub fn free_indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.values
            .iter()
            .enumerate()
            .filter(|(_, v)| matches!(v, ParamValue::Free))
            .map(|(i, _)| i)
    }

    /// Full parameter vector with free slots taken from `free_values` in order.
    pub fn resolve(&self, free_values: &[f64]) -> ComponentResult<Vec<f64>> {
        let mut free = free_values.iter();
        self.values
            .iter()
            .map(|v| match v {
                ParamValue::Fixed(x) => Ok(*x),
                ParamValue::Free => free.next().copied().ok_or(ComponentError::InvalidArg {
                    what: "too few free parameter values",
                }),
            })
            .collect()
    }

    fn lookup(&self, name: &str) -> ComponentResult<usize> {
        self.index_of(name)
            .ok_or_else(|| ComponentError::UnknownParameter {
                component: String::new(),
                name: name.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SPECS: &[ParamSpec] = &[
        ParamSpec::efficiency("eta_s"),
        ParamSpec::ratio("pr"),
        ParamSpec::power("P"),
    ];

    #[test]
    fn params_start_free() {
        let set = ParamSet::new(SPECS);
        assert_eq!(set.len(), 3);
        assert_eq!(set.free_count(), 3);
        assert_eq!(set.fixed("eta_s"), None);
    }

    #[test]
    fn fix_checks_bounds() {
        let mut set = ParamSet::new(SPECS);
        assert!(set.fix("eta_s", 0.9).is_ok());
        assert!(set.fix("eta_s", 1.0).is_ok());
        assert!(set.fix("eta_s", 0.0).is_err());
        assert!(set.fix("eta_s", 1.2).is_err());
        assert!(set.fix("pr", -0.1).is_err());
        assert!(set.fix("P", -5.0e6).is_ok());
        assert!(matches!(
            set.fix("zeta", 1.0),
            Err(ComponentError::UnknownParameter { .. })
        ));
    }

    #[test]
    fn resolve_fills_free_slots_in_order() {
        let mut set = ParamSet::new(SPECS);
        set.fix("pr", 0.5).unwrap();
        let full = set.resolve(&[0.8, 1.0e6]).unwrap();
        assert_eq!(full, vec![0.8, 0.5, 1.0e6]);
        assert_eq!(set.free_indices().collect::<Vec<_>>(), vec![0, 2]);
        assert!(set.resolve(&[0.8]).is_err());
    }

    #[test]
    fn free_reverts_fixed_value() {
        let mut set = ParamSet::new(SPECS);
        set.fix("pr", 0.5).unwrap();
        set.free("pr").unwrap();
        assert_eq!(set.get("pr"), Some(ParamValue::Free));
    }
}
