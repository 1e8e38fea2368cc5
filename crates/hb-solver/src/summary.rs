//! Plant-level figures from the final unit states.

use hb_core::units::constants::{KJ_PER_KWH, MMBTU_PER_MWH};
use hb_project::Pricing;
use hb_results::{DistrictHeating, Summary, UnitState};
use hb_units::UnitCategory;

/// A unit's final state together with its bookkeeping category.
#[derive(Debug, Clone, Copy)]
pub struct UnitView<'a> {
    pub id: &'a str,
    pub category: UnitCategory,
    pub state: &'a UnitState,
}

/// Aggregate power, fuel, heat and money over all units.
pub fn summarize(units: &[UnitView<'_>], base_aux_mw: f64, pricing: Option<&Pricing>) -> Summary {
    let mut summary = Summary {
        aux_load_mw: base_aux_mw,
        ..Summary::default()
    };
    for unit in units {
        let duty = &unit.state.duty;
        match unit.category {
            UnitCategory::GasTurbine => summary.gt_power_mw += duty.power_mw,
            UnitCategory::SteamTurbine => summary.st_power_mw += duty.power_mw,
            _ => {}
        }
        summary.aux_load_mw += duty.aux_mw;
        summary.fuel_lhv_mw += duty.fuel_mw;
        summary.heat_out_mwth += duty.heat_out_mw;
    }

    summary.net_power_mw = summary.gt_power_mw + summary.st_power_mw - summary.aux_load_mw;
    if summary.fuel_lhv_mw > 0.0 {
        summary.net_eff_lhv_pct = 100.0 * summary.net_power_mw / summary.fuel_lhv_mw;
    }
    if summary.net_power_mw > 0.0 && summary.fuel_lhv_mw > 0.0 {
        summary.heat_rate_kj_kwh = Some(summary.fuel_lhv_mw * KJ_PER_KWH / summary.net_power_mw);
    }
    summary.revenue_usd_h = pricing.map(|p| {
        summary.net_power_mw * p.power_usd_mwh + summary.heat_out_mwth * p.heat_usd_mwh
            - summary.fuel_lhv_mw * MMBTU_PER_MWH * p.fuel_usd_mmbtu
    });
    summary
}

/// Network state from storage, falling back to the heat exchanger.
pub fn district_heating(units: &[UnitView<'_>]) -> Option<DistrictHeating> {
    let storage = units.iter().find(|u| u.category == UnitCategory::Storage);
    let heater = units.iter().find(|u| u.category == UnitCategory::DistrictHeating);
    if storage.is_none() && heater.is_none() {
        return None;
    }
    let metric = |name: &str| {
        storage
            .and_then(|u| u.state.metrics.get(name))
            .or_else(|| heater.and_then(|u| u.state.metrics.get(name)))
            .copied()
    };
    Some(DistrictHeating {
        soc: storage.and_then(|u| u.state.metrics.get("SOC").copied()),
        supply_c: metric("supply_C"),
        return_c: metric("return_C"),
    })
}
