//! Residual equations contributed by components and specifications.

/// Physical unit family of a residual; selects its convergence tolerance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResidualKind {
    MassFlow,
    Pressure,
    Temperature,
    Enthalpy,
    Power,
}

/// One equation value `f(x)`; zero at the solution.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Residual {
    pub kind: ResidualKind,
    pub value: f64,
}

impl Residual {
    pub fn mass(value: f64) -> Self {
        Self {
            kind: ResidualKind::MassFlow,
            value,
        }
    }

    pub fn pressure(value: f64) -> Self {
        Self {
            kind: ResidualKind::Pressure,
            value,
        }
    }

    pub fn temperature(value: f64) -> Self {
        Self {
            kind: ResidualKind::Temperature,
            value,
        }
    }

    pub fn enthalpy(value: f64) -> Self {
        Self {
            kind: ResidualKind::Enthalpy,
            value,
        }
    }

    pub fn power(value: f64) -> Self {
        Self {
            kind: ResidualKind::Power,
            value,
        }
    }
}
