//! Type-key registry of unit factories.

use std::collections::BTreeMap;
use std::sync::OnceLock;

use crate::error::{UnitError, UnitResult};
use crate::params::{ParamMap, ParamSpec};
use crate::traits::{PortSpec, Unit, UnitCategory};
use crate::{condenser, district_heater, duct_burner, feedwater_pump, gas_turbine, hrsg, steam_turbine, storage};

/// Builds a unit from merged parameters.
pub type UnitFactory = fn(&ParamMap) -> UnitResult<Box<dyn Unit>>;

/// Everything the registry knows about one unit type.
#[derive(Debug, Clone, Copy)]
pub struct UnitDescriptor {
    pub type_key: &'static str,
    pub category: UnitCategory,
    pub ports: &'static [PortSpec],
    pub params: &'static [ParamSpec],
    pub holds_inventory: bool,
    pub factory: UnitFactory,
}

/// Append-only mapping from type key to descriptor.
#[derive(Debug, Default)]
pub struct UnitRegistry {
    entries: BTreeMap<&'static str, UnitDescriptor>,
}

static GLOBAL: OnceLock<UnitResult<UnitRegistry>> = OnceLock::new();

impl UnitRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, descriptor: UnitDescriptor) -> UnitResult<()> {
        if self.entries.contains_key(descriptor.type_key) {
            return Err(UnitError::DuplicateTypeKey {
                type_key: descriptor.type_key.to_string(),
            });
        }
        self.entries.insert(descriptor.type_key, descriptor);
        Ok(())
    }

    pub fn get(&self, type_key: &str) -> UnitResult<&UnitDescriptor> {
        self.entries
            .get(type_key)
            .ok_or_else(|| UnitError::UnknownUnitType {
                type_key: type_key.to_string(),
            })
    }

    pub fn contains(&self, type_key: &str) -> bool {
        self.entries.contains_key(type_key)
    }

    /// Validate `params` and construct a unit.
    pub fn create(&self, type_key: &str, params: &ParamMap) -> UnitResult<Box<dyn Unit>> {
        (self.get(type_key)?.factory)(params)
    }

    /// Registered type keys, sorted.
    pub fn type_keys(&self) -> Vec<&'static str> {
        self.entries.keys().copied().collect()
    }

    pub fn descriptors(&self) -> impl Iterator<Item = &UnitDescriptor> {
        self.entries.values()
    }

    /// Registry populated with the built-in unit library.
    pub fn builtin() -> UnitResult<Self> {
        let mut registry = Self::new();
        for descriptor in [
            gas_turbine::DESCRIPTOR,
            duct_burner::DESCRIPTOR,
            hrsg::DESCRIPTOR,
            steam_turbine::GENERIC,
            steam_turbine::HP,
            steam_turbine::IP,
            steam_turbine::LP,
            steam_turbine::IPLP,
            condenser::DESCRIPTOR,
            feedwater_pump::DESCRIPTOR,
            district_heater::DESCRIPTOR,
            storage::DESCRIPTOR,
        ] {
            registry.register(descriptor)?;
        }
        Ok(registry)
    }

    /// Process-wide registry, populated at most once.
    pub fn global() -> UnitResult<&'static UnitRegistry> {
        GLOBAL
            .get_or_init(Self::builtin)
            .as_ref()
            .map_err(Clone::clone)
    }
}
