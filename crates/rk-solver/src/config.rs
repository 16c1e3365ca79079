//! Solver configuration.

use rk_components::ResidualKind;

/// Absolute convergence tolerance per residual kind, in SI units.
///
/// A residual is converged when `|r| < tolerance`; the solver works on
/// residuals divided by these values so a single infinity norm below one
/// means every equation is satisfied in its own unit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResidualTolerances {
    /// kg/s
    pub mass_flow: f64,
    /// Pa
    pub pressure: f64,
    /// K
    pub temperature: f64,
    /// J/kg
    pub enthalpy: f64,
    /// W
    pub power: f64,
}

impl Default for ResidualTolerances {
    fn default() -> Self {
        Self {
            mass_flow: 1e-7,
            pressure: 1e-2,
            temperature: 1e-6,
            enthalpy: 1e-3,
            power: 1e-3,
        }
    }
}

impl ResidualTolerances {
    pub fn for_kind(&self, kind: ResidualKind) -> f64 {
        match kind {
            ResidualKind::MassFlow => self.mass_flow,
            ResidualKind::Pressure => self.pressure,
            ResidualKind::Temperature => self.temperature,
            ResidualKind::Enthalpy => self.enthalpy,
            ResidualKind::Power => self.power,
        }
    }
}

/// Where the Newton iteration starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InitializationStrategy {
    /// Build the starting point from specifications and component relations.
    #[default]
    Cold,
    /// Start from the last converged iterate when the unknown layout is
    /// unchanged, falling back to a cold start otherwise.
    Warm,
}

impl InitializationStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            InitializationStrategy::Cold => "Cold",
            InitializationStrategy::Warm => "Warm",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SolverConfig {
    pub max_iterations: usize,
    pub tolerances: ResidualTolerances,
    /// Relative finite-difference step for the Jacobian.
    pub fd_step: f64,
    /// Iterations without a new best residual before giving up.
    pub stall_window: usize,
    /// Largest allowed |Δp| as a fraction of the current pressure.
    pub max_pressure_step: f64,
    /// Largest allowed |Δh| in J/kg.
    pub max_enthalpy_step: f64,
    /// Step halvings allowed when a trial point fails a property lookup.
    pub max_backtracks: usize,
    pub initialization: InitializationStrategy,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            max_iterations: 50,
            tolerances: ResidualTolerances::default(),
            fd_step: 1e-7,
            stall_window: 8,
            max_pressure_step: 0.5,
            max_enthalpy_step: 1e6,
            max_backtracks: 10,
            initialization: InitializationStrategy::Cold,
        }
    }
}

impl SolverConfig {
    pub fn warm() -> Self {
        Self {
            initialization: InitializationStrategy::Warm,
            ..Self::default()
        }
    }
}
