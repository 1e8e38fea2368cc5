use hb_core::Ambient;
use hb_project::*;
use serde_json::Value;

fn plant() -> PlantGraph {
    let mut gt = ParamMap::new();
    gt.insert("rated_power_MW".into(), Value::from(180.0));
    PlantGraph::new(Ambient::new(15.0, 60.0, 101.325))
        .with_unit("GT1", "GasTurbine", gt)
        .with_unit("HRSG1", "HRSG", ParamMap::new())
        .with_stream("GT1.exhaust_out", "HRSG1.gas_in")
}

#[test]
fn roundtrip_yaml_plant() {
    let path = std::env::temp_dir().join("hb_project_roundtrip.yaml");
    save_yaml(&path, &plant()).unwrap();
    let loaded = load_plant(&path).unwrap();
    assert_eq!(loaded, plant());
}

#[test]
fn roundtrip_json_plant() {
    let path = std::env::temp_dir().join("hb_project_roundtrip.json");
    save_json(&path, &plant()).unwrap();
    let loaded = load_plant(&path).unwrap();
    assert_eq!(loaded, plant());
}

#[test]
fn roundtrip_run_case() {
    let mut rc = RunCase::simulate(Objective::MaxEfficiency);
    rc.constraints.insert("HRSG1.stack_T_min_C".into(), 95.0);
    let path = std::env::temp_dir().join("hb_project_run_case.yaml");
    save_run_case(&path, &rc).unwrap();
    assert_eq!(load_run_case(&path).unwrap(), rc);
}

#[test]
fn unknown_extension_is_rejected() {
    let path = std::env::temp_dir().join("hb_project_plant.toml");
    std::fs::write(&path, "units = []").unwrap();
    assert!(matches!(
        load_plant(&path),
        Err(ProjectError::UnsupportedFormat { .. })
    ));
}

#[test]
fn invalid_plant_is_not_saved() {
    let bad = plant().with_unit("GT1", "GasTurbine", ParamMap::new());
    let path = std::env::temp_dir().join("hb_project_bad.json");
    assert!(matches!(
        save_json(&path, &bad),
        Err(ProjectError::Validation(ValidationError::DuplicateId { .. }))
    ));
}

#[test]
fn defaults_asset_loads_from_yaml() {
    let path = std::env::temp_dir().join("hb_project_defaults.yaml");
    std::fs::write(&path, "auxiliary:\n  aux_load_MW: 4.0\nconstraints:\n  METAL_max_T_C: 580\n").unwrap();
    let d = Defaults::load(&path).unwrap();
    assert_eq!(d.auxiliary.aux_load_mw, 4.0);
    assert_eq!(d.constraints.len(), 1);
    assert_eq!(d.category("SteamTurbineLP"), Some("steam_turbine"));
}

#[test]
fn malformed_defaults_asset_is_an_error() {
    let path = std::env::temp_dir().join("hb_project_defaults_bad.json");
    std::fs::write(&path, "{ not json").unwrap();
    assert!(matches!(Defaults::load(&path), Err(ProjectError::Json(_))));
}
