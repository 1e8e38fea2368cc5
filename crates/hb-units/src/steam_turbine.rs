//! Steam turbine sections.

use hb_core::units::kpa;
use hb_core::{Ambient, Medium};
use hb_fluids::{PortState, PropertyModel, isentropic_expansion, standard};

use crate::common::{check_finite, is_idle};
use crate::error::{FieldError, UnitResult};
use crate::params::{ParamMap, ParamSpec, check_params, finish};
use crate::registry::UnitDescriptor;
use crate::traits::{PortMap, PortSpec, Unit, UnitCategory, UnitDuty, UnitOutputs, input};

/// Exhaust wetness above which blade erosion is flagged.
const MIN_EXHAUST_QUALITY: f64 = 0.85;

pub const PORTS: &[PortSpec] = &[
    PortSpec::inlet("inlet", Medium::Steam),
    PortSpec::outlet("outlet", Medium::Steam),
];

const fn params(outlet_p_kpa: f64) -> [ParamSpec; 6] {
    [
        ParamSpec::number("eta_isentropic", 0.88, 0.0, 1.0, "Isentropic efficiency"),
        ParamSpec::number("mech_efficiency", 0.985, 0.0, 1.0, "Mechanical efficiency"),
        ParamSpec::number("generator_efficiency", 0.985, 0.0, 1.0, "Generator efficiency"),
        ParamSpec::number(
            "outlet_P_kPa_abs",
            outlet_p_kpa,
            1.0,
            30_000.0,
            "Exhaust pressure",
        ),
        ParamSpec::optional("min_flow_kg_s", 0.0, "Lowest continuous steam flow"),
        ParamSpec::optional("max_flow_kg_s", 0.0, "Swallowing capacity"),
    ]
}

pub const GENERIC_PARAMS: &[ParamSpec] = &params(8.0);
pub const HP_PARAMS: &[ParamSpec] = &params(3_000.0);
pub const IP_PARAMS: &[ParamSpec] = &params(500.0);
pub const LP_PARAMS: &[ParamSpec] = &params(8.0);

const fn descriptor(
    type_key: &'static str,
    params: &'static [ParamSpec],
    factory: crate::registry::UnitFactory,
) -> UnitDescriptor {
    UnitDescriptor {
        type_key,
        category: UnitCategory::SteamTurbine,
        ports: PORTS,
        params,
        holds_inventory: false,
        factory,
    }
}

pub const GENERIC: UnitDescriptor = descriptor("SteamTurbine", GENERIC_PARAMS, build_generic);
pub const HP: UnitDescriptor = descriptor("SteamTurbineHP", HP_PARAMS, build_hp);
pub const IP: UnitDescriptor = descriptor("SteamTurbineIP", IP_PARAMS, build_ip);
pub const LP: UnitDescriptor = descriptor("SteamTurbineLP", LP_PARAMS, build_lp);
pub const IPLP: UnitDescriptor = descriptor("SteamTurbineIPLP", LP_PARAMS, build_iplp);

fn build_generic(p: &ParamMap) -> UnitResult<Box<dyn Unit>> {
    Ok(Box::new(SteamTurbine::from_params(&GENERIC, p)?))
}

fn build_hp(p: &ParamMap) -> UnitResult<Box<dyn Unit>> {
    Ok(Box::new(SteamTurbine::from_params(&HP, p)?))
}

fn build_ip(p: &ParamMap) -> UnitResult<Box<dyn Unit>> {
    Ok(Box::new(SteamTurbine::from_params(&IP, p)?))
}

fn build_lp(p: &ParamMap) -> UnitResult<Box<dyn Unit>> {
    Ok(Box::new(SteamTurbine::from_params(&LP, p)?))
}

fn build_iplp(p: &ParamMap) -> UnitResult<Box<dyn Unit>> {
    Ok(Box::new(SteamTurbine::from_params(&IPLP, p)?))
}

/// Electrical output [MW] of `m_dot` kg/s across an isentropic drop
/// `dh_s` kJ/kg.
pub fn shaft_power_mw(m_dot_kg_s: f64, dh_s_kj_kg: f64, eta_is: f64, eta_mech: f64, eta_gen: f64) -> f64 {
    m_dot_kg_s * dh_s_kj_kg * eta_is * eta_mech * eta_gen / 1_000.0
}

/// Expansion section between two pressure levels.
///
/// ## Model
///
/// ```text
/// h_s   = h(P_out, s_in)
/// h_out = h_in − η_is·(h_in − h_s)
/// W     = ṁ·(h_in − h_s)·η_is·η_mech·η_gen
/// ```
///
/// An inlet at or below the exhaust pressure passes through unchanged
/// with zero output and a warning.
#[derive(Debug, Clone, PartialEq)]
pub struct SteamTurbine {
    pub type_key: &'static str,
    pub eta_isentropic: f64,
    pub mech_efficiency: f64,
    pub generator_efficiency: f64,
    pub outlet_p_kpa: f64,
    pub min_flow_kg_s: Option<f64>,
    pub max_flow_kg_s: Option<f64>,
}

impl SteamTurbine {
    pub fn from_params(descriptor: &UnitDescriptor, params: &ParamMap) -> UnitResult<Self> {
        let (values, mut errors) = check_params(descriptor.params, params);
        let min_flow = values.opt_number("min_flow_kg_s");
        let max_flow = values.opt_number("max_flow_kg_s");
        if let (Some(lo), Some(hi)) = (min_flow, max_flow)
            && hi < lo
        {
            errors.push(FieldError::new(
                "max_flow_kg_s",
                format!("{} is below min_flow_kg_s {}", hi, lo),
            ));
        }
        let values = finish(descriptor.type_key, values, errors)?;
        Ok(Self {
            type_key: descriptor.type_key,
            eta_isentropic: values.number("eta_isentropic")?,
            mech_efficiency: values.number("mech_efficiency")?,
            generator_efficiency: values.number("generator_efficiency")?,
            outlet_p_kpa: values.number("outlet_P_kPa_abs")?,
            min_flow_kg_s: min_flow,
            max_flow_kg_s: max_flow,
        })
    }

    fn check_flow_limits(&self, m_dot: f64, out: &mut UnitOutputs) {
        if let Some(lo) = self.min_flow_kg_s
            && m_dot < lo
        {
            out.warn(format!(
                "{}: steam flow {:.1} kg/s below minimum {:.1} kg/s",
                self.type_key, m_dot, lo
            ));
        }
        if let Some(hi) = self.max_flow_kg_s
            && m_dot > hi
        {
            out.warn(format!(
                "{}: steam flow {:.1} kg/s above maximum {:.1} kg/s",
                self.type_key, m_dot, hi
            ));
        }
    }
}

impl Unit for SteamTurbine {
    fn type_key(&self) -> &'static str {
        self.type_key
    }

    fn category(&self) -> UnitCategory {
        UnitCategory::SteamTurbine
    }

    fn ports(&self) -> &'static [PortSpec] {
        PORTS
    }

    fn evaluate(&self, inputs: &PortMap, _ambient: &Ambient) -> UnitResult<UnitOutputs> {
        let inlet = *input(inputs, self.type_key, "inlet")?;
        let m_dot = inlet.m_dot_kg_s;

        if inlet.p_kpa <= self.outlet_p_kpa {
            let mut out = UnitOutputs::default()
                .with_port("outlet", inlet)
                .metric("power_MW", 0.0);
            out.warn(format!(
                "{}: inlet pressure {:.1} kPa not above exhaust {:.1} kPa, no expansion",
                self.type_key, inlet.p_kpa, self.outlet_p_kpa
            ));
            return Ok(out);
        }

        if is_idle(m_dot) {
            let outlet = PortState::from_ph(self.outlet_p_kpa, inlet.h_kj_kg, 0.0, Medium::Steam)?;
            return Ok(UnitOutputs::default()
                .with_port("outlet", outlet)
                .metric("power_MW", 0.0));
        }

        let exp = isentropic_expansion(&inlet, self.outlet_p_kpa, self.eta_isentropic)?;
        let power_mw = check_finite(
            shaft_power_mw(
                m_dot,
                exp.dh_isentropic,
                self.eta_isentropic,
                self.mech_efficiency,
                self.generator_efficiency,
            ),
            "steam turbine power",
        )?;
        let outlet = PortState {
            medium: Medium::Steam,
            ..exp.outlet
        };

        let mut out = UnitOutputs {
            duty: UnitDuty {
                power_mw,
                ..UnitDuty::default()
            },
            ..UnitOutputs::default()
        }
        .with_port("outlet", outlet)
        .metric("power_MW", power_mw)
        .metric("flow_kg_s", m_dot)
        .metric("dh_isentropic_kJ_kg", exp.dh_isentropic)
        .metric("outlet_T_C", outlet.t_c);

        let quality = standard()
            .state_ph(kpa(self.outlet_p_kpa), outlet.h_kj_kg, Medium::Steam)?
            .quality;
        if let Some(x) = quality {
            out = out.metric("exhaust_quality", x);
            if x < MIN_EXHAUST_QUALITY {
                out.warn(format!(
                    "{}: exhaust quality {:.3} below {:.2}",
                    self.type_key, x, MIN_EXHAUST_QUALITY
                ));
            }
        }
        self.check_flow_limits(m_dot, &mut out);
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::UnitError;
    use serde_json::Value;

    fn main_steam(m: f64) -> PortMap {
        let mut ports = PortMap::new();
        ports.insert(
            "inlet",
            PortState::from_tp(540.0, 15_000.0, m, Medium::Steam).unwrap(),
        );
        ports
    }

    fn turbine(descriptor: &UnitDescriptor, pairs: &[(&str, f64)]) -> SteamTurbine {
        let params: ParamMap = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), Value::from(*v)))
            .collect();
        SteamTurbine::from_params(descriptor, &params).unwrap()
    }

    #[test]
    fn shaft_power_matches_hand_calculation() {
        let p = shaft_power_mw(120.0, 180.0, 0.9, 0.98, 0.97);
        assert!((p - 18.4842).abs() < 1e-4);
    }

    #[test]
    fn worked_example_through_the_unit() {
        let efficiencies = [
            ("eta_isentropic", 0.9),
            ("mech_efficiency", 0.98),
            ("generator_efficiency", 0.97),
        ];
        let evaluate_at = |p_out: f64| {
            let mut pairs = efficiencies.to_vec();
            pairs.push(("outlet_P_kPa_abs", p_out));
            turbine(&HP, &pairs)
                .evaluate(&main_steam(120.0), &Ambient::default())
                .unwrap()
        };

        // Isentropic drop falls as the exhaust pressure rises.
        let (mut lo, mut hi) = (3_000.0, 14_000.0);
        for _ in 0..60 {
            let mid = 0.5 * (lo + hi);
            if evaluate_at(mid).metrics["dh_isentropic_kJ_kg"] > 180.0 {
                lo = mid;
            } else {
                hi = mid;
            }
        }
        let out = evaluate_at(0.5 * (lo + hi));
        assert!((out.metrics["dh_isentropic_kJ_kg"] - 180.0).abs() < 1e-3);
        assert!((out.duty.power_mw - 18.48).abs() < 0.01, "{}", out.duty.power_mw);
        assert_eq!(out.ports["outlet"].m_dot_kg_s, 120.0);
    }

    #[test]
    fn efficiencies_accept_the_full_unit_interval() {
        let st = turbine(
            &HP,
            &[("eta_isentropic", 0.0), ("mech_efficiency", 0.2), ("generator_efficiency", 1.0)],
        );
        assert_eq!(st.eta_isentropic, 0.0);
        assert_eq!(st.mech_efficiency, 0.2);

        let params: ParamMap = [("eta_isentropic", 1.2)]
            .iter()
            .map(|(k, v)| (k.to_string(), Value::from(*v)))
            .collect();
        assert!(SteamTurbine::from_params(&HP, &params).is_err());
    }

    #[test]
    fn zero_efficiency_throttles_without_power() {
        let st = turbine(&HP, &[("eta_isentropic", 0.0)]);
        let inputs = main_steam(100.0);
        let out = st.evaluate(&inputs, &Ambient::default()).unwrap();
        assert_eq!(out.duty.power_mw, 0.0);
        assert!((out.ports["outlet"].h_kj_kg - inputs["inlet"].h_kj_kg).abs() < 1e-9);
        assert_eq!(out.ports["outlet"].p_kpa, 3_000.0);
        assert_eq!(out.ports["outlet"].m_dot_kg_s, 100.0);
    }

    #[test]
    fn variants_differ_only_in_exhaust_pressure() {
        assert_eq!(turbine(&HP, &[]).outlet_p_kpa, 3_000.0);
        assert_eq!(turbine(&IP, &[]).outlet_p_kpa, 500.0);
        assert_eq!(turbine(&LP, &[]).outlet_p_kpa, 8.0);
        assert_eq!(turbine(&IPLP, &[]).type_key, "SteamTurbineIPLP");
    }

    #[test]
    fn hp_section_expands_superheated() {
        let st = turbine(&HP, &[]);
        let out = st.evaluate(&main_steam(100.0), &Ambient::default()).unwrap();
        let dh_s = 3423.2 - 2965.1;
        let expected = shaft_power_mw(100.0, dh_s, 0.88, 0.985, 0.985);
        assert!((out.duty.power_mw - expected).abs() < 0.2, "{}", out.duty.power_mw);
        assert!(!out.metrics.contains_key("exhaust_quality"));
        assert!(out.warnings.is_empty());
        assert_eq!(out.ports["outlet"].p_kpa, 3_000.0);
    }

    #[test]
    fn condensing_section_reports_wet_exhaust() {
        let st = turbine(&GENERIC, &[]);
        let out = st.evaluate(&main_steam(100.0), &Ambient::default()).unwrap();
        let x = out.metrics["exhaust_quality"];
        assert!(x > 0.77 && x < 1.0, "x = {x}");
        assert!(out.duty.power_mw > 100.0);
    }

    #[test]
    fn no_pressure_drop_passes_through() {
        let st = turbine(&GENERIC, &[("outlet_P_kPa_abs", 20_000.0)]);
        let inputs = main_steam(100.0);
        let out = st.evaluate(&inputs, &Ambient::default()).unwrap();
        assert_eq!(out.duty.power_mw, 0.0);
        assert_eq!(out.ports["outlet"], inputs["inlet"]);
        assert_eq!(out.warnings.len(), 1);
    }

    #[test]
    fn flow_limits_warn() {
        let st = turbine(&HP, &[("min_flow_kg_s", 20.0), ("max_flow_kg_s", 80.0)]);
        let out = st.evaluate(&main_steam(100.0), &Ambient::default()).unwrap();
        assert_eq!(out.warnings.len(), 1);
        assert!(out.warnings[0].contains("above maximum"));
    }

    #[test]
    fn inverted_flow_limits_are_rejected() {
        let params: ParamMap = [("min_flow_kg_s", 50.0), ("max_flow_kg_s", 10.0)]
            .iter()
            .map(|(k, v)| (k.to_string(), Value::from(*v)))
            .collect();
        let err = SteamTurbine::from_params(&LP, &params).unwrap_err();
        assert!(matches!(err, UnitError::InvalidParameter { .. }));
        assert!(err.to_string().contains("max_flow_kg_s"));
    }
}
