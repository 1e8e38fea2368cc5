//! hb-units: process unit library for combined-cycle heat balances.
//!
//! Every unit is a pure function of its inbound port states, its validated
//! parameters and the ambient. Units are constructed through the
//! [`UnitRegistry`] from a type key and a raw parameter map:
//! - `GasTurbine`, `DuctBurner`, `HRSG` on the gas path
//! - `SteamTurbine` and its `HP` / `IP` / `LP` / `IPLP` sections
//! - `Condenser`, `FeedwaterPump` on the water side
//! - `DistrictHeater`, `ThermalStorage` on the heating network
//!
//! # Example
//!
//! ```
//! use hb_core::{Ambient, Medium};
//! use hb_fluids::PortState;
//! use hb_units::{ParamMap, PortMap, UnitRegistry};
//!
//! let registry = UnitRegistry::builtin().unwrap();
//! let st = registry.create("SteamTurbineHP", &ParamMap::new()).unwrap();
//!
//! let mut inputs = PortMap::new();
//! inputs.insert("inlet", PortState::from_tp(540.0, 15_000.0, 100.0, Medium::Steam).unwrap());
//! let out = st.evaluate(&inputs, &Ambient::default()).unwrap();
//! assert!(out.duty.power_mw > 0.0);
//! ```

pub mod common;
pub mod condenser;
pub mod district_heater;
pub mod duct_burner;
pub mod error;
pub mod feedwater_pump;
pub mod gas_turbine;
pub mod hrsg;
pub mod params;
pub mod registry;
pub mod steam_turbine;
pub mod storage;
pub mod traits;

pub use condenser::Condenser;
pub use district_heater::DistrictHeater;
pub use duct_burner::DuctBurner;
pub use error::{FieldError, UnitError, UnitResult};
pub use feedwater_pump::FeedwaterPump;
pub use gas_turbine::GasTurbine;
pub use hrsg::Hrsg;
pub use params::{ParamKind, ParamMap, ParamSpec, ParamValues, check_params, validate_params};
pub use registry::{UnitDescriptor, UnitFactory, UnitRegistry};
pub use steam_turbine::{SteamTurbine, shaft_power_mw};
pub use storage::ThermalStorage;
pub use traits::{Metrics, PortMap, PortSpec, Unit, UnitCategory, UnitDuty, UnitOutputs, input};
