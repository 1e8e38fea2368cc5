//! Process-wide defaults table and the parameter merge.
//!
//! Layout:
//! - `ambient`: default ambient conditions
//! - `auxiliary`: plant-level auxiliary load
//! - `units`: parameter defaults keyed by category or by type key
//! - `aliases`: type key -> category
//! - `constraints`: default constraint limits
//!
//! Resolution for a unit is category defaults, then type-specific defaults,
//! then user parameters. The merge is shallow and user keys always win.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use hb_core::Ambient;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::schema::ParamMap;
use crate::{ProjectResult, read_document};

/// Environment variable naming an explicit defaults asset.
pub const DEFAULTS_PATH_ENV: &str = "HB_DEFAULTS_PATH";
/// Asset location used when the environment variable is unset.
pub const DEFAULT_ASSET: &str = "defaults/defaults.json";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Auxiliary {
    #[serde(rename = "aux_load_MW")]
    pub aux_load_mw: f64,
}

impl Default for Auxiliary {
    fn default() -> Self {
        Self { aux_load_mw: 5.0 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Defaults {
    #[serde(default)]
    pub ambient: Ambient,
    #[serde(default)]
    pub auxiliary: Auxiliary,
    #[serde(default = "builtin_units")]
    pub units: BTreeMap<String, ParamMap>,
    #[serde(default = "builtin_aliases")]
    pub aliases: BTreeMap<String, String>,
    #[serde(default = "builtin_constraints")]
    pub constraints: BTreeMap<String, f64>,
}

fn params(pairs: &[(&str, f64)]) -> ParamMap {
    pairs
        .iter()
        .map(|&(k, v)| (k.to_string(), Value::from(v)))
        .collect()
}

fn builtin_units() -> BTreeMap<String, ParamMap> {
    BTreeMap::from([
        (
            "gas_turbine".to_string(),
            params(&[("load_pct", 100.0), ("eta_LHV_pct", 38.0), ("exhaust_dp_kPa", 3.0)]),
        ),
        (
            "steam_turbine".to_string(),
            params(&[
                ("eta_isentropic", 0.88),
                ("mech_efficiency", 0.985),
                ("generator_efficiency", 0.985),
            ]),
        ),
        (
            "hrsg".to_string(),
            params(&[
                ("pinch_HP_K", 10.0),
                ("approach_HP_K", 5.0),
                ("pinch_IP_K", 12.0),
                ("pinch_LP_K", 15.0),
                ("stack_T_min_C", 90.0),
            ]),
        ),
        (
            "condenser".to_string(),
            params(&[("cw_in_C", 20.0), ("cw_out_max_C", 28.0), ("vacuum_kPa_abs", 8.0)]),
        ),
        (
            "duct_burner".to_string(),
            params(&[("excess_O2_pct", 3.0), ("target_T_C", 925.0)]),
        ),
        (
            "district_heating".to_string(),
            params(&[("supply_set_C", 120.0), ("return_target_C", 70.0), ("SOC_init", 0.5)]),
        ),
        (
            "feedwater_pump".to_string(),
            params(&[("eta_pump", 0.8), ("motor_efficiency", 0.95)]),
        ),
        ("SteamTurbineHP".to_string(), params(&[("outlet_P_kPa_abs", 3_000.0)])),
        ("SteamTurbineIP".to_string(), params(&[("outlet_P_kPa_abs", 500.0)])),
        ("SteamTurbineLP".to_string(), params(&[("outlet_P_kPa_abs", 8.0)])),
        ("SteamTurbineIPLP".to_string(), params(&[("outlet_P_kPa_abs", 8.0)])),
    ])
}

fn builtin_aliases() -> BTreeMap<String, String> {
    [
        ("GasTurbine", "gas_turbine"),
        ("DuctBurner", "duct_burner"),
        ("HRSG", "hrsg"),
        ("SteamTurbine", "steam_turbine"),
        ("SteamTurbineHP", "steam_turbine"),
        ("SteamTurbineIP", "steam_turbine"),
        ("SteamTurbineLP", "steam_turbine"),
        ("SteamTurbineIPLP", "steam_turbine"),
        ("Condenser", "condenser"),
        ("FeedwaterPump", "feedwater_pump"),
        ("DistrictHeater", "district_heating"),
        ("ThermalStorage", "district_heating"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect()
}

fn builtin_constraints() -> BTreeMap<String, f64> {
    BTreeMap::from([
        ("METAL_max_T_C".to_string(), 600.0),
        ("DHN_supply_min_C".to_string(), 110.0),
        ("DHN_return_max_C".to_string(), 80.0),
    ])
}

impl Default for Defaults {
    fn default() -> Self {
        Self::builtin()
    }
}

static GLOBAL: OnceLock<Defaults> = OnceLock::new();

impl Defaults {
    /// Hardcoded conservative table used when no asset is available.
    pub fn builtin() -> Self {
        Self {
            ambient: Ambient::default(),
            auxiliary: Auxiliary::default(),
            units: builtin_units(),
            aliases: builtin_aliases(),
            constraints: builtin_constraints(),
        }
    }

    /// Load a defaults asset (JSON or YAML by extension).
    pub fn load(path: &Path) -> ProjectResult<Self> {
        read_document(path)
    }

    /// Locate and load the asset, falling back to the builtin table.
    pub fn discover() -> Self {
        let path = std::env::var_os(DEFAULTS_PATH_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_ASSET));
        if !path.exists() {
            info!(path = %path.display(), "no defaults asset, using builtin table");
            return Self::builtin();
        }
        match Self::load(&path) {
            Ok(defaults) => {
                debug!(path = %path.display(), "loaded defaults asset");
                defaults
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "malformed defaults asset, using builtin table");
                Self::builtin()
            }
        }
    }

    /// Process-wide table, discovered on first use.
    pub fn global() -> &'static Defaults {
        GLOBAL.get_or_init(Self::discover)
    }

    /// Category a type key resolves to, if aliased.
    pub fn category(&self, type_key: &str) -> Option<&str> {
        self.aliases.get(type_key).map(String::as_str)
    }

    /// Merge defaults under `user` for a unit of `type_key`.
    pub fn resolve(&self, type_key: &str, user: &ParamMap) -> ParamMap {
        let mut merged = ParamMap::new();
        if let Some(category) = self.category(type_key)
            && let Some(table) = self.units.get(category)
        {
            merged.extend(table.iter().map(|(k, v)| (k.clone(), v.clone())));
        }
        if let Some(table) = self.units.get(type_key) {
            merged.extend(table.iter().map(|(k, v)| (k.clone(), v.clone())));
        }
        merged.extend(user.iter().map(|(k, v)| (k.clone(), v.clone())));
        merged
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_then_type_then_user() {
        let d = Defaults::builtin();
        let mut user = ParamMap::new();
        user.insert("eta_isentropic".into(), Value::from(0.9));
        user.insert("note".into(), Value::from("kept"));
        let merged = d.resolve("SteamTurbineHP", &user);
        assert_eq!(merged["eta_isentropic"], 0.9);
        assert_eq!(merged["mech_efficiency"], 0.985);
        assert_eq!(merged["outlet_P_kPa_abs"], 3_000.0);
        assert_eq!(merged["note"], "kept");
    }

    #[test]
    fn unknown_type_passes_user_params_through() {
        let d = Defaults::builtin();
        let mut user = ParamMap::new();
        user.insert("x".into(), Value::from(1));
        assert_eq!(d.resolve("Mystery", &user), user);
    }

    #[test]
    fn partial_asset_keeps_builtin_sections() {
        let d: Defaults = serde_json::from_str(r#"{"auxiliary": {"aux_load_MW": 7.5}}"#).unwrap();
        assert_eq!(d.auxiliary.aux_load_mw, 7.5);
        assert_eq!(d.constraints["METAL_max_T_C"], 600.0);
        assert_eq!(d.category("HRSG"), Some("hrsg"));
    }

    #[test]
    fn global_is_initialised_once() {
        let a = Defaults::global() as *const Defaults;
        let b = Defaults::global() as *const Defaults;
        assert_eq!(a, b);
    }
}
