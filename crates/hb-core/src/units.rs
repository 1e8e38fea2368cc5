// hb-core/src/units.rs

use uom::si::f64::{
    Energy as UomEnergy, MassRate as UomMassRate, Power as UomPower, Pressure as UomPressure,
    Ratio as UomRatio, ThermodynamicTemperature as UomThermodynamicTemperature,
};

// Public canonical unit types (SI, f64)
pub type Energy = UomEnergy;
pub type MassRate = UomMassRate;
pub type Power = UomPower;
pub type Pressure = UomPressure;
pub type Ratio = UomRatio;
pub type Temperature = UomThermodynamicTemperature;

#[inline]
pub fn pa(v: f64) -> Pressure {
    use uom::si::pressure::pascal;
    Pressure::new::<pascal>(v)
}

#[inline]
pub fn kpa(v: f64) -> Pressure {
    use uom::si::pressure::kilopascal;
    Pressure::new::<kilopascal>(v)
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
pub fn mw(v: f64) -> Power {
    use uom::si::power::megawatt;
    Power::new::<megawatt>(v)
}

#[inline]
pub fn unitless(v: f64) -> Ratio {
    use uom::si::ratio::ratio;
    Ratio::new::<ratio>(v)
}

#[inline]
pub fn to_kelvin(t: Temperature) -> f64 {
    use uom::si::thermodynamic_temperature::kelvin;
    t.get::<kelvin>()
}

#[inline]
pub fn to_celsius(t: Temperature) -> f64 {
    use uom::si::thermodynamic_temperature::degree_celsius;
    t.get::<degree_celsius>()
}

#[inline]
pub fn to_kpa(p: Pressure) -> f64 {
    use uom::si::pressure::kilopascal;
    p.get::<kilopascal>()
}

#[inline]
pub fn to_mw(p: Power) -> f64 {
    use uom::si::power::megawatt;
    p.get::<megawatt>()
}

pub mod constants {
    /// Offset between the Celsius and Kelvin scales.
    pub const CELSIUS_OFFSET_K: f64 = 273.15;

    /// Standard atmosphere used as the ideal-gas entropy reference [kPa].
    pub const REFERENCE_P_KPA: f64 = 101.3;

    /// Reference temperature for ideal-gas entropy [K].
    pub const REFERENCE_T_K: f64 = 288.15;

    /// ISO ambient temperature for gas turbine ratings [°C].
    pub const ISO_T_C: f64 = 15.0;

    /// Energy conversion used for fuel pricing.
    pub const MMBTU_PER_MWH: f64 = 3.412_142;

    /// Seconds in one hour, for MW <-> kJ/kWh conversions.
    pub const KJ_PER_KWH: f64 = 3_600.0;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constructors_smoke() {
        let _p = pa(101_325.0);
        let _t = k(300.0);
        let _mdot = kgps(1.2);
        let _w = mw(18.5);
        let _r = unitless(0.5);
    }

    #[test]
    fn celsius_and_kilopascal_conversions() {
        let t = celsius(540.0);
        assert!((to_kelvin(t) - 813.15).abs() < 1e-9);
        assert!((to_celsius(k(373.15)) - 100.0).abs() < 1e-9);

        let p = kpa(15_000.0);
        assert!((to_kpa(p) - 15_000.0).abs() < 1e-9);
        assert!((to_kpa(pa(101_300.0)) - 101.3).abs() < 1e-9);
        assert!((to_mw(mw(18.48)) - 18.48).abs() < 1e-12);
    }
}
