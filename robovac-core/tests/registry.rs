use std::sync::Arc;

use robovac_core::{
    Error, HostFeatures, ModelDescriptor, Registry,
    codec::Codec,
    registry,
    vocab::{Capability, Command},
};
use serde_json::json;

fn x100() -> ModelDescriptor {
    ModelDescriptor::new("X100", "Test vacuum")
        .with_features(HostFeatures::BATTERY | HostFeatures::STATE)
        .with_capabilities([Capability::BatteryLevel, Capability::Status])
        .with_code(Capability::BatteryLevel, "104")
        .with_code(Capability::Status, "15")
}

fn assert_invalid(descriptor: ModelDescriptor, needle: &str) {
    let mut registry = Registry::new();
    match registry.register(descriptor) {
        Err(Error::InvalidDescriptor { reason, .. }) => {
            assert!(reason.contains(needle), "{reason:?} does not mention {needle:?}")
        }
        other => panic!("expected InvalidDescriptor, got {other:?}"),
    }
    assert!(registry.is_empty());
}

#[test]
fn builtin_models_register() {
    let registry = Registry::builtin().unwrap();
    let ids: Vec<_> = registry.model_ids().collect();
    assert_eq!(ids, vec!["T2080", "T2193", "T2276", "T2278", "T2320"]);
    assert_eq!(registry.lookup("T2193").unwrap().name, "RoboVac LR30 Hybrid");
}

#[test]
fn duplicate_model_is_rejected() {
    let mut registry = Registry::builtin().unwrap();
    let err = registry.register(ModelDescriptor::new("T2080", "again")).unwrap_err();
    assert_eq!(err, Error::DuplicateModel("T2080".into()));
    assert_eq!(registry.lookup("T2080").unwrap().name, "RoboVac S1 Pro");
}

#[test]
fn lookup_of_unknown_model_fails() {
    let registry = Registry::builtin().unwrap();
    assert_eq!(registry.lookup("T0000").unwrap_err(), Error::UnknownModel("T0000".into()));
}

#[test]
fn empty_model_id_is_invalid() {
    assert_invalid(ModelDescriptor::new(" ", "nameless"), "empty");
}

#[test]
fn non_numeric_code_is_invalid() {
    assert_invalid(x100().with_code(Capability::Status, "15a"), "not a DPS code");
    assert_invalid(x100().with_code(Command::Locate, ""), "not a DPS code");
}

#[test]
fn incompatible_codec_is_invalid() {
    assert_invalid(x100().with_codec(Capability::BatteryLevel, Codec::Boolean), "BATTERY_LEVEL");
    assert_invalid(x100().with_codec(Command::SetFanSpeed, Codec::Rooms), "SET_FAN_SPEED");
}

#[test]
fn colliding_capabilities_are_invalid() {
    assert_invalid(x100().with_code(Capability::Status, "104"), "104");
}

#[test]
fn commands_may_share_a_code() {
    let descriptor = x100()
        .with_commands([Command::ReturnHome, Command::Locate])
        .with_code(Command::ReturnHome, "153")
        .with_code(Command::Locate, "153");
    let mut registry = Registry::new();
    registry.register(descriptor).unwrap();
}

#[test]
fn unsupported_capability_may_reuse_a_code() {
    // FAN_SPEED is not supported, so its code does not matter
    let descriptor = x100().with_code(Capability::FanSpeed, "104");
    Registry::new().register(descriptor).unwrap();
}

#[test]
fn linked_write_to_unsupported_data_point_is_invalid() {
    let descriptor = x100()
        .with_commands([Command::CleanSpot])
        .with_linked_write(Command::CleanSpot, Command::StartPause, true);
    assert_invalid(descriptor, "START_PAUSE");
}

#[test]
fn host_feature_needs_backing_data_point() {
    assert_invalid(x100().with_features(HostFeatures::FAN_SPEED), "SetFanSpeed");
    assert_invalid(x100().with_features(HostFeatures::STOP), "STOP");

    let ok = x100().with_features(HostFeatures::STOP).with_commands([Command::ReturnHome]);
    Registry::new().register(ok).unwrap();
}

#[test]
fn descriptors_load_from_json() {
    let json = serde_json::to_string(&[x100()]).unwrap();
    let registry = Registry::with_descriptors_json(&json).unwrap();

    assert_eq!(registry.len(), 6);
    assert_eq!(registry.lookup("X100").unwrap(), &x100());
    assert_eq!(registry.resolve("X100").unwrap().code(Capability::BatteryLevel).as_str(), "104");
}

#[test]
fn json_with_unknown_data_point_is_invalid() {
    let mut entry = serde_json::to_value(x100()).unwrap();
    entry["dps_overrides"] = json!({ "TURBO_MODE": "5" });
    let json = json!([entry]).to_string();

    match Registry::with_descriptors_json(&json) {
        Err(Error::InvalidDescriptor { model, reason }) => {
            assert_eq!(model, "X100");
            assert!(reason.contains("TURBO_MODE"), "{reason}");
        }
        other => panic!("expected InvalidDescriptor, got {other:?}"),
    }
}

#[test]
fn json_must_be_an_array() {
    let err = Registry::with_descriptors_json(r#"{"model_id": "X100"}"#).unwrap_err();
    assert!(matches!(err, Error::InvalidDescriptor { .. }));
}

#[test]
fn json_duplicates_of_builtin_models_are_rejected() {
    let mut clash = x100();
    clash.model_id = "T2278".into();
    let json = serde_json::to_string(&[clash]).unwrap();
    assert_eq!(
        Registry::with_descriptors_json(&json).unwrap_err(),
        Error::DuplicateModel("T2278".into())
    );
}

#[test]
fn host_features_serialize_by_name() {
    let features = HostFeatures::BATTERY | HostFeatures::STATE;
    let json = serde_json::to_string(&features).unwrap();
    let back: HostFeatures = serde_json::from_str(&json).unwrap();
    assert_eq!(back, features);
    assert_eq!(features.bits(), 0b1_0000_0001);
}

#[test]
fn global_registry_is_built_once() {
    let first = registry::global().unwrap();
    let second = registry::global().unwrap();
    assert!(std::ptr::eq(first, second));
    assert!(first.contains("T2320"));

    let a = first.resolve("T2320").unwrap();
    let b = second.resolve("T2320").unwrap();
    assert!(Arc::ptr_eq(&a, &b));
}

#[test]
fn codec_overrides_that_hold_no_value_are_invalid() {
    let inverted = x100().with_codec(Capability::BatteryLevel, Codec::Integer { min: 100, max: 0 });
    assert_invalid(inverted, "empty range 100..=0");

    let empty_table = x100().with_codec(Capability::FanSpeed, Codec::Enum { values: Vec::new() });
    assert_invalid(empty_table, "enum table is empty");
}

#[test]
fn inverted_range_from_json_is_refused() {
    let mut entry = serde_json::to_value(x100()).unwrap();
    entry["codec_overrides"] =
        json!({ "BATTERY_LEVEL": { "kind": "integer", "min": 100, "max": 0 } });

    match Registry::with_descriptors_json(&json!([entry]).to_string()) {
        Err(Error::InvalidDescriptor { model, reason }) => {
            assert_eq!(model, "X100");
            assert!(reason.contains("BATTERY_LEVEL"), "{reason}");
        }
        other => panic!("expected InvalidDescriptor, got {other:?}"),
    }
}

#[test]
fn linked_write_may_not_overwrite_the_command() {
    // SET_WORK_MODE defaults to code 5
    let descriptor = x100()
        .with_commands([Command::SetWorkMode, Command::StartPause])
        .with_code(Command::StartPause, "5")
        .with_linked_write(Command::SetWorkMode, Command::StartPause, true);
    assert_invalid(descriptor, "to code 5");
}

#[test]
fn linked_writes_of_one_command_need_distinct_codes() {
    let descriptor = x100()
        .with_commands([Command::CleanSpot, Command::StartPause, Command::Locate])
        .with_code(Command::StartPause, "9")
        .with_code(Command::Locate, "9")
        .with_linked_write(Command::CleanSpot, Command::StartPause, true)
        .with_linked_write(Command::CleanSpot, Command::Locate, true);
    assert_invalid(descriptor, "to code 9");
}

#[test]
fn linked_write_value_must_suit_its_data_point() {
    let descriptor = x100()
        .with_commands([Command::CleanSpot, Command::StartPause])
        .with_linked_write(Command::CleanSpot, Command::StartPause, "maybe");
    assert_invalid(descriptor, "linked write of CLEAN_SPOT to START_PAUSE");
}

#[test]
fn alternate_codes_are_validated() {
    assert_invalid(
        x100().with_alternate_codes(Capability::Consumables, ["116"]),
        "unsupported CONSUMABLES",
    );
    assert_invalid(
        x100().with_alternate_codes(Capability::BatteryLevel, ["15"]),
        "both resolve to code 15",
    );
    assert_invalid(x100().with_alternate_codes(Capability::BatteryLevel, ["b4"]), "not a DPS code");

    let ok = x100().with_alternate_codes(Capability::BatteryLevel, ["163"]);
    Registry::new().register(ok).unwrap();
}
