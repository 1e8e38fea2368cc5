use hb_core::Medium;
use hb_fluids::{PortState, PropertyModel, evaluate, isentropic_expansion, standard};
use hb_core::units::kpa;
use proptest::prelude::*;

proptest! {
    #[test]
    fn enthalpy_rises_with_temperature_in_superheat(t in 350.0f64..600.0, dt in 1.0f64..50.0) {
        let a = evaluate(t, 5_000.0, Medium::Steam).unwrap();
        let b = evaluate(t + dt, 5_000.0, Medium::Steam).unwrap();
        prop_assert!(b.h > a.h);
        prop_assert!(b.s > a.s);
    }

    #[test]
    fn ph_flash_recovers_temperature(t in 5.0f64..250.0, p in 500.0f64..20_000.0) {
        let props = evaluate(t, p, Medium::Water).unwrap();
        let state = standard().state_ph(kpa(p), props.h, Medium::Water).unwrap();
        prop_assert!((state.t_c() - t).abs() < 1e-4);
        prop_assert!(state.quality.is_none());
    }

    #[test]
    fn expansion_drop_scales_with_efficiency(eta in 0.0f64..=1.0) {
        let inlet = PortState::from_tp(540.0, 12_000.0, 50.0, Medium::Steam).unwrap();
        let exp = isentropic_expansion(&inlet, 10.0, eta).unwrap();
        let drop = inlet.h_kj_kg - exp.outlet.h_kj_kg;
        prop_assert!((drop - eta * exp.dh_isentropic).abs() < 1e-6);
    }
}

#[test]
fn ideal_expansion_preserves_entropy() {
    let inlet = PortState::from_tp(540.0, 15_000.0, 100.0, Medium::Steam).unwrap();
    for p_out in [8.0, 500.0, 3_000.0] {
        let exp = isentropic_expansion(&inlet, p_out, 1.0).unwrap();
        let s_out = exp.outlet.entropy().unwrap();
        assert!(
            (s_out - exp.s_inlet).abs() < 1e-3,
            "p_out={p_out}: {s_out} vs {}",
            exp.s_inlet
        );
    }
}

#[test]
fn zero_efficiency_is_a_throttle() {
    let inlet = PortState::from_tp(540.0, 15_000.0, 100.0, Medium::Steam).unwrap();
    let exp = isentropic_expansion(&inlet, 3_000.0, 0.0).unwrap();
    assert_eq!(exp.outlet.h_kj_kg, inlet.h_kj_kg);
    assert!(exp.outlet.t_c < inlet.t_c);
}

#[test]
fn near_critical_states_resolve_density() {
    // 650 K at 25.58 MPa sits in region 3
    let props = evaluate(650.0 - 273.15, 25_583.701_8, Medium::Water).unwrap();
    assert!((props.rho - 500.0).abs() < 0.05, "rho = {}", props.rho);
    assert!((props.h - 1_863.43).abs() < 0.05);
}
