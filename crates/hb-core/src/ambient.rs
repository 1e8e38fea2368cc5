//! Ambient conditions shared by every unit during a solve.

/// Environmental snapshot, supplied once per solve.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Ambient {
    #[cfg_attr(feature = "serde", serde(rename = "T_C", default = "default_t_c"))]
    pub t_c: f64,
    #[cfg_attr(feature = "serde", serde(rename = "RH_pct", default = "default_rh_pct"))]
    pub rh_pct: f64,
    #[cfg_attr(
        feature = "serde",
        serde(rename = "P_kPa_abs", default = "default_p_kpa")
    )]
    pub p_kpa: f64,
}

fn default_t_c() -> f64 {
    30.0
}

fn default_rh_pct() -> f64 {
    60.0
}

fn default_p_kpa() -> f64 {
    101.3
}

impl Default for Ambient {
    fn default() -> Self {
        Self {
            t_c: default_t_c(),
            rh_pct: default_rh_pct(),
            p_kpa: default_p_kpa(),
        }
    }
}

impl Ambient {
    pub fn new(t_c: f64, rh_pct: f64, p_kpa: f64) -> Self {
        Self { t_c, rh_pct, p_kpa }
    }

    pub fn t_k(&self) -> f64 {
        self.t_c + crate::units::constants::CELSIUS_OFFSET_K
    }
}
