// rk-core/src/units.rs

use uom::si::f64::{
    AvailableEnergy as UomAvailableEnergy, MassDensity as UomMassDensity,
    MassRate as UomMassRate, Power as UomPower, Pressure as UomPressure, Ratio as UomRatio,
    SpecificHeatCapacity as UomSpecificHeatCapacity,
    ThermodynamicTemperature as UomThermodynamicTemperature,
};

// Public canonical unit types (SI, f64)
pub type Density = UomMassDensity;
pub type MassRate = UomMassRate;
pub type Power = UomPower;
pub type Pressure = UomPressure;
pub type Ratio = UomRatio;
pub type Temperature = UomThermodynamicTemperature;
/// Specific energy [J/kg], used for specific enthalpy.
pub type SpecificEnergy = UomAvailableEnergy;
/// Specific heat capacity or specific entropy [J/(kg·K)].
pub type SpecificHeat = UomSpecificHeatCapacity;

#[inline]
pub fn pa(v: f64) -> Pressure {
    use uom::si::pressure::pascal;
    Pressure::new::<pascal>(v)
}

#[inline]
pub fn bar(v: f64) -> Pressure {
    use uom::si::pressure::bar;
    Pressure::new::<bar>(v)
}

#[inline]
pub fn k(v: f64) -> Temperature {
    use uom::si::thermodynamic_temperature::kelvin;
    Temperature::new::<kelvin>(v)
}

#[inline]
pub fn celsius(v: f64) -> Temperature {
    use uom::si::thermodynamic_temperature::degree_celsius;
    Temperature::new::<degree_celsius>(v)
}

#[inline]
pub fn kgps(v: f64) -> MassRate {
    use uom::si::mass_rate::kilogram_per_second;
    MassRate::new::<kilogram_per_second>(v)
}

#[inline]
pub fn watts(v: f64) -> Power {
    use uom::si::power::watt;
    Power::new::<watt>(v)
}

#[inline]
pub fn j_per_kg(v: f64) -> SpecificEnergy {
    use uom::si::available_energy::joule_per_kilogram;
    SpecificEnergy::new::<joule_per_kilogram>(v)
}

#[inline]
pub fn unitless(v: f64) -> Ratio {
    use uom::si::ratio::ratio;
    Ratio::new::<ratio>(v)
}

pub mod constants {
    /// Triple-point pressure of water [Pa].
    pub const P_TRIPLE_PA: f64 = 611.657;
    /// Critical pressure of water [Pa].
    pub const P_CRIT_PA: f64 = 22.064e6;
    /// Critical temperature of water [K].
    pub const T_CRIT_K: f64 = 647.096;
    /// 0 °C in kelvin.
    pub const T_ZERO_C_K: f64 = 273.15;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constructors_smoke() {
        let _p = pa(101_325.0);
        let _t = k(300.0);
        let _mdot = kgps(1.2);
        let _w = watts(5.0);
        let _h = j_per_kg(1.0e5);
        let _r = unitless(0.5);
    }

    #[test]
    fn engineering_constructors_convert_to_si() {
        assert!((bar(150.0).value - 1.5e7).abs() < 1e-6);
        assert!((celsius(600.0).value - 873.15).abs() < 1e-9);
    }
}
