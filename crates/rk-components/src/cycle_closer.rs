//! Loop-breaking pass-through component.

use crate::error::ComponentResult;
use crate::params::ParamSet;
use crate::ports::{GuessPorts, PortStates};
use crate::residual::Residual;
use crate::traits::{ComponentKind, ComponentModel, ComponentOutputs};

/// Breaks a closed loop into an open chain.
///
/// Contributes `p_out = p_in` and `h_out = h_in`. Mass equality is not an
/// equation: in a closed loop it would duplicate the mass specification.
/// It is reported instead as `mass_imbalance` (kg/s) together with
/// `energy_imbalance = m_in * h_in - m_out * h_out` (W); both must be near
/// zero in a consistent solution.
#[derive(Clone, Debug, PartialEq)]
pub struct CycleCloser {
    pub name: String,
    params: ParamSet,
}

impl CycleCloser {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            params: ParamSet::new(&[]),
        }
    }

    /// `(mass_imbalance, energy_imbalance)` at the given state.
    pub fn imbalance(&self, ports: &PortStates<'_>) -> ComponentResult<(f64, f64)> {
        let inlet = ports.inlet(0)?;
        let outlet = ports.outlet(0)?;
        Ok((
            inlet.m - outlet.m,
            inlet.m * inlet.h - outlet.m * outlet.h,
        ))
    }
}

impl ComponentModel for CycleCloser {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> ComponentKind {
        ComponentKind::CycleCloser
    }

    fn inlet_count(&self) -> usize {
        1
    }

    fn outlet_count(&self) -> usize {
        1
    }

    fn params(&self) -> &ParamSet {
        &self.params
    }

    fn params_mut(&mut self) -> &mut ParamSet {
        &mut self.params
    }

    fn structural_equation_count(&self) -> usize {
        2
    }

    fn residuals(
        &self,
        ports: &PortStates<'_>,
        _params: &[f64],
        out: &mut Vec<Residual>,
    ) -> ComponentResult<()> {
        let inlet = ports.inlet(0)?;
        let outlet = ports.outlet(0)?;
        out.push(Residual::pressure(outlet.p - inlet.p));
        out.push(Residual::enthalpy(outlet.h - inlet.h));
        Ok(())
    }

    fn implied_params(&self, _ports: &PortStates<'_>) -> ComponentResult<Vec<f64>> {
        Ok(Vec::new())
    }

    fn outputs(&self, ports: &PortStates<'_>, _params: &[f64]) -> ComponentResult<ComponentOutputs> {
        let (mass, energy) = self.imbalance(ports)?;
        Ok(ComponentOutputs {
            extras: vec![("mass_imbalance", mass), ("energy_imbalance", energy)],
            ..ComponentOutputs::default()
        })
    }

    fn propagate_guess(&self, ports: &mut GuessPorts<'_>) -> ComponentResult<bool> {
        let mut changed = ports.share_mass(0, 0);
        changed |= ports.share_pressure(0, 0, Some(1.0));
        changed |= ports.share_enthalpy(0, 0);
        Ok(changed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::PortState;
    use rk_fluids::Iapws97;

    #[test]
    fn imbalance_reported_not_solved() {
        let water = Iapws97::new();
        let closer = CycleCloser::new("cycle closer");
        let ports = PortStates {
            inlets: vec![PortState {
                m: 10.0,
                p: 1.0e7,
                h: 3.0e6,
                fluid: &water,
            }],
            outlets: vec![PortState {
                m: 9.5,
                p: 1.0e7,
                h: 3.0e6,
                fluid: &water,
            }],
        };
        let mut out = Vec::new();
        closer.residuals(&ports, &[], &mut out).unwrap();
        assert!(out.iter().all(|r| r.value == 0.0));

        let outputs = closer.outputs(&ports, &[]).unwrap();
        assert_eq!(outputs.extras[0], ("mass_imbalance", 0.5));
        assert!((outputs.extras[1].1 - 1.5e6).abs() < 1e-6);
    }
}
