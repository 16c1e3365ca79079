//! Explicit unit selection for values crossing the solver boundary.
//!
//! Everything inside the solver is SI. A [`UnitSystem`] is handed to the
//! places where raw numbers enter (connection specifications, configuration)
//! or leave (result accessors); there is no process-wide "active" unit system.

use crate::units::{Power, Pressure, SpecificEnergy, SpecificHeat, Temperature};
use uom::si::available_energy::{joule_per_kilogram, kilojoule_per_kilogram};
use uom::si::power::{kilowatt, megawatt, watt};
use uom::si::pressure::{bar, megapascal, pascal};
use uom::si::specific_heat_capacity::{joule_per_kilogram_kelvin, kilojoule_per_kilogram_kelvin};
use uom::si::thermodynamic_temperature::{degree_celsius, kelvin};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum PressureUnit {
    #[default]
    Pascal,
    Bar,
    Megapascal,
}

impl PressureUnit {
    pub fn quantity(self, v: f64) -> Pressure {
        match self {
            PressureUnit::Pascal => Pressure::new::<pascal>(v),
            PressureUnit::Bar => Pressure::new::<bar>(v),
            PressureUnit::Megapascal => Pressure::new::<megapascal>(v),
        }
    }

    pub fn value(self, q: Pressure) -> f64 {
        match self {
            PressureUnit::Pascal => q.get::<pascal>(),
            PressureUnit::Bar => q.get::<bar>(),
            PressureUnit::Megapascal => q.get::<megapascal>(),
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            PressureUnit::Pascal => "Pa",
            PressureUnit::Bar => "bar",
            PressureUnit::Megapascal => "MPa",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum TemperatureUnit {
    #[default]
    Kelvin,
    Celsius,
}

impl TemperatureUnit {
    pub fn quantity(self, v: f64) -> Temperature {
        match self {
            TemperatureUnit::Kelvin => Temperature::new::<kelvin>(v),
            TemperatureUnit::Celsius => Temperature::new::<degree_celsius>(v),
        }
    }

    pub fn value(self, q: Temperature) -> f64 {
        match self {
            TemperatureUnit::Kelvin => q.get::<kelvin>(),
            TemperatureUnit::Celsius => q.get::<degree_celsius>(),
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            TemperatureUnit::Kelvin => "K",
            TemperatureUnit::Celsius => "°C",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum EnthalpyUnit {
    #[default]
    JoulePerKilogram,
    KilojoulePerKilogram,
}

impl EnthalpyUnit {
    pub fn quantity(self, v: f64) -> SpecificEnergy {
        match self {
            EnthalpyUnit::JoulePerKilogram => SpecificEnergy::new::<joule_per_kilogram>(v),
            EnthalpyUnit::KilojoulePerKilogram => SpecificEnergy::new::<kilojoule_per_kilogram>(v),
        }
    }

    pub fn value(self, q: SpecificEnergy) -> f64 {
        match self {
            EnthalpyUnit::JoulePerKilogram => q.get::<joule_per_kilogram>(),
            EnthalpyUnit::KilojoulePerKilogram => q.get::<kilojoule_per_kilogram>(),
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            EnthalpyUnit::JoulePerKilogram => "J/kg",
            EnthalpyUnit::KilojoulePerKilogram => "kJ/kg",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum EntropyUnit {
    #[default]
    JoulePerKilogramKelvin,
    KilojoulePerKilogramKelvin,
}

impl EntropyUnit {
    pub fn quantity(self, v: f64) -> SpecificHeat {
        match self {
            EntropyUnit::JoulePerKilogramKelvin => SpecificHeat::new::<joule_per_kilogram_kelvin>(v),
            EntropyUnit::KilojoulePerKilogramKelvin => {
                SpecificHeat::new::<kilojoule_per_kilogram_kelvin>(v)
            }
        }
    }

    pub fn value(self, q: SpecificHeat) -> f64 {
        match self {
            EntropyUnit::JoulePerKilogramKelvin => q.get::<joule_per_kilogram_kelvin>(),
            EntropyUnit::KilojoulePerKilogramKelvin => q.get::<kilojoule_per_kilogram_kelvin>(),
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            EntropyUnit::JoulePerKilogramKelvin => "J/(kg·K)",
            EntropyUnit::KilojoulePerKilogramKelvin => "kJ/(kg·K)",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum PowerUnit {
    #[default]
    Watt,
    Kilowatt,
    Megawatt,
}

impl PowerUnit {
    pub fn quantity(self, v: f64) -> Power {
        match self {
            PowerUnit::Watt => Power::new::<watt>(v),
            PowerUnit::Kilowatt => Power::new::<kilowatt>(v),
            PowerUnit::Megawatt => Power::new::<megawatt>(v),
        }
    }

    pub fn value(self, q: Power) -> f64 {
        match self {
            PowerUnit::Watt => q.get::<watt>(),
            PowerUnit::Kilowatt => q.get::<kilowatt>(),
            PowerUnit::Megawatt => q.get::<megawatt>(),
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            PowerUnit::Watt => "W",
            PowerUnit::Kilowatt => "kW",
            PowerUnit::Megawatt => "MW",
        }
    }
}

/// Units used to interpret raw numbers at the API boundary.
///
/// Mass flow is always kg/s.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UnitSystem {
    pub pressure: PressureUnit,
    pub temperature: TemperatureUnit,
    pub enthalpy: EnthalpyUnit,
    pub entropy: EntropyUnit,
    pub power: PowerUnit,
}

impl UnitSystem {
    /// Pa, K, J/kg, J/(kg·K), W.
    pub fn si() -> Self {
        Self::default()
    }

    /// bar, °C, kJ/kg, kJ/(kg·K), MW.
    pub fn engineering() -> Self {
        Self {
            pressure: PressureUnit::Bar,
            temperature: TemperatureUnit::Celsius,
            enthalpy: EnthalpyUnit::KilojoulePerKilogram,
            entropy: EntropyUnit::KilojoulePerKilogramKelvin,
            power: PowerUnit::Megawatt,
        }
    }

    /// Raw pressure in this system to SI [Pa].
    pub fn pressure_to_si(&self, v: f64) -> f64 {
        self.pressure.quantity(v).get::<pascal>()
    }

    /// SI pressure [Pa] to this system.
    pub fn pressure_from_si(&self, pa_value: f64) -> f64 {
        self.pressure.value(Pressure::new::<pascal>(pa_value))
    }

    pub fn temperature_to_si(&self, v: f64) -> f64 {
        self.temperature.quantity(v).get::<kelvin>()
    }

    pub fn temperature_from_si(&self, k_value: f64) -> f64 {
        self.temperature.value(Temperature::new::<kelvin>(k_value))
    }

    pub fn enthalpy_to_si(&self, v: f64) -> f64 {
        self.enthalpy.quantity(v).get::<joule_per_kilogram>()
    }

    pub fn enthalpy_from_si(&self, j_value: f64) -> f64 {
        self.enthalpy
            .value(SpecificEnergy::new::<joule_per_kilogram>(j_value))
    }

    pub fn entropy_from_si(&self, j_value: f64) -> f64 {
        self.entropy
            .value(SpecificHeat::new::<joule_per_kilogram_kelvin>(j_value))
    }

    pub fn power_from_si(&self, w_value: f64) -> f64 {
        self.power.value(Power::new::<watt>(w_value))
    }
}
