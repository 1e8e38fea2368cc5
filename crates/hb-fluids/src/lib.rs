//! hb-fluids: thermodynamic properties for the heat-balance solver.
//!
//! Provides:
//! - native IAPWS-IF97 steam tables (regions 1 to 4)
//! - ideal-gas relations for flue gas and fuel gas
//! - pressure-enthalpy and pressure-entropy flashes
//! - isentropic expansion with an efficiency blend
//! - `PortState`, the flow state carried on every stream
//!
//! # Architecture
//!
//! Callers go through the `PropertyModel` trait. `StandardModel` is the
//! dependency-free default; the `coolprop` feature adds a CoolProp backend
//! (via `rfluids`) for water.
//!
//! # Example
//!
//! ```
//! use hb_core::Medium;
//! use hb_fluids::{PortState, isentropic_expansion};
//!
//! let inlet = PortState::from_tp(540.0, 15_000.0, 80.0, Medium::Steam).unwrap();
//! let exp = isentropic_expansion(&inlet, 8.0, 0.88).unwrap();
//! assert!(exp.outlet.h_kj_kg < inlet.h_kj_kg);
//! ```

#[cfg(feature = "coolprop")]
pub mod coolprop;
pub mod error;
pub mod expansion;
mod flash;
pub mod ideal_gas;
pub mod if97;
pub mod port_state;
pub mod properties;
mod solve;

#[cfg(feature = "coolprop")]
pub use coolprop::CoolPropModel;
pub use error::{FluidError, FluidResult};
pub use expansion::{Expansion, isentropic_expansion, isentropic_expansion_with};
pub use ideal_gas::IdealGas;
pub use port_state::PortState;
pub use properties::{
    FlashState, Properties, PropertyModel, Saturation, StandardModel, evaluate,
    saturation_pressure, saturation_temperature, standard,
};
