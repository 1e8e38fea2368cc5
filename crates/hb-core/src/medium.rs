//! Medium tags carried on every port.

use core::fmt;
use core::str::FromStr;

use crate::error::UnsupportedMedium;

/// Substance flowing through a port. Selects the property model.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Medium {
    Gas,
    Steam,
    Water,
    HotWater,
    FuelGas,
}

/// Media that may share a stream without an explicit adapter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MediumFamily {
    /// Steam, boiler water, district-heating water.
    Water,
    /// Combustion air and flue gas.
    FlueGas,
    Fuel,
}

impl Medium {
    pub const ALL: [Medium; 5] = [
        Medium::Gas,
        Medium::Steam,
        Medium::Water,
        Medium::HotWater,
        Medium::FuelGas,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Medium::Gas => "gas",
            Medium::Steam => "steam",
            Medium::Water => "water",
            Medium::HotWater => "hot_water",
            Medium::FuelGas => "fuel_gas",
        }
    }

    pub fn family(self) -> MediumFamily {
        match self {
            Medium::Steam | Medium::Water | Medium::HotWater => MediumFamily::Water,
            Medium::Gas => MediumFamily::FlueGas,
            Medium::FuelGas => MediumFamily::Fuel,
        }
    }

    /// Media evaluated with the steam tables.
    pub fn is_water(self) -> bool {
        self.family() == MediumFamily::Water
    }

    pub fn compatible_with(self, other: Medium) -> bool {
        self.family() == other.family()
    }
}

impl fmt::Display for Medium {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Medium {
    type Err = UnsupportedMedium;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Medium::ALL
            .into_iter()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| UnsupportedMedium(s.to_string()))
    }
}
