use std::sync::Arc;

use robovac_core::{
    HostFeatures, ModelDescriptor, Registry,
    defaults::default_mapping,
    resolve::ResolvedMapping,
    vocab::{Capability, Command, DataPoint},
};

fn x100() -> ModelDescriptor {
    ModelDescriptor::new("X100", "Test vacuum")
        .with_features(HostFeatures::BATTERY | HostFeatures::STATE | HostFeatures::RETURN_HOME)
        .with_capabilities([Capability::BatteryLevel, Capability::Status])
        .with_commands([Command::ReturnHome])
        .with_code(Capability::BatteryLevel, "104")
        .with_code(Capability::Status, "15")
}

fn registry() -> Registry {
    let mut registry = Registry::builtin().expect("builtin models");
    registry.register(x100()).expect("x100");
    registry
}

#[test]
fn default_mapping_covers_the_vocabulary() {
    let defaults = default_mapping();
    assert_eq!(defaults.len(), Capability::ALL.len() + Command::ALL.len());
    assert_eq!(defaults.code(Capability::BatteryLevel.into()), &"163");
    assert_eq!(defaults.code(Command::RoomClean.into()), &"124");
    assert!(defaults.codes().values().all(|code| code.is_well_formed()));
}

#[test]
fn resolve_is_total_for_every_model() {
    let registry = registry();
    for model in registry.model_ids() {
        let mapping = registry.resolve(model).unwrap();
        for dp in DataPoint::all() {
            assert!(mapping.code(dp).is_well_formed(), "{model} {dp}");
        }
        assert_eq!(mapping.codes().count(), default_mapping().len());
    }
}

#[test]
fn resolve_is_idempotent_and_cached() {
    let registry = registry();
    for model in registry.model_ids() {
        let first = registry.resolve(model).unwrap();
        let second = registry.resolve(model).unwrap();
        assert!(Arc::ptr_eq(&first, &second));

        let descriptor = Arc::new(registry.lookup(model).unwrap().clone());
        let rebuilt = ResolvedMapping::build(descriptor).unwrap();
        assert_eq!(*first, rebuilt);
    }
}

#[test]
fn overrides_win_and_everything_else_is_default() {
    let registry = registry();
    for descriptor in registry.descriptors() {
        let mapping = registry.resolve(&descriptor.model_id).unwrap();
        for dp in DataPoint::all() {
            let expected =
                descriptor.dps_overrides.get(&dp).unwrap_or_else(|| default_mapping().code(dp));
            assert_eq!(&mapping[dp], expected, "{} {dp}", descriptor.model_id);
        }
    }
}

#[test]
fn x100_battery_override_and_default_fan_speed() {
    let registry = registry();
    let mapping = registry.resolve("X100").unwrap();

    assert_eq!(mapping.get("BATTERY_LEVEL").map(|c| c.as_str()), Some("104"));
    assert_eq!(mapping.get("FAN_SPEED"), Some(default_mapping().code(Capability::FanSpeed.into())));
    assert_eq!(mapping.get("TURBO"), None);
}

#[test]
fn reverse_index_only_knows_supported_capabilities() {
    let registry = registry();
    let mapping = registry.resolve("X100").unwrap();

    assert_eq!(mapping.capability_for("104"), Some(Capability::BatteryLevel));
    assert_eq!(mapping.capability_for("15"), Some(Capability::Status));
    // FAN_SPEED has a code but X100 does not report it
    assert_eq!(mapping.capability_for("102"), None);
    assert_eq!(mapping.capability_for("101"), None);
}

#[test]
fn choices_list_supported_enum_values() {
    let registry = registry();

    let t2320 = registry.resolve("T2320").unwrap();
    assert_eq!(t2320.choices(Command::SetFanSpeed), vec!["Standard", "Boost IQ", "Max", "Quiet"]);

    let t2080 = registry.resolve("T2080").unwrap();
    let statuses = t2080.choices(Capability::Status);
    assert_eq!(statuses.iter().filter(|s| **s == "Standby").count(), 1);

    let x100 = registry.resolve("X100").unwrap();
    assert!(x100.choices(Command::SetFanSpeed).is_empty());
}

#[test]
fn resolve_unknown_model_fails() {
    let registry = registry();
    let err = registry.resolve("T9999").unwrap_err();
    assert_eq!(err, robovac_core::Error::UnknownModel("T9999".into()));
}

#[test]
fn concurrent_first_resolution_yields_one_mapping() {
    let registry = registry();
    let mappings: Vec<_> = std::thread::scope(|s| {
        let handles: Vec<_> =
            (0..8).map(|_| s.spawn(|| registry.resolve("T2278").unwrap())).collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    let cached = registry.resolve("T2278").unwrap();
    assert!(mappings.iter().all(|m| Arc::ptr_eq(m, &cached)));
}
