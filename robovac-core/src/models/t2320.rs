//! eufy X9 Pro with auto-clean station.

use crate::{
    codec::Codec,
    model::{HostFeatures, ModelDescriptor},
    vocab::{Capability, Command},
};

fn modes() -> Codec {
    Codec::identity(["auto", "return", "pause", "small_room", "single_room"])
}

fn fan_speeds() -> Codec {
    Codec::table([
        ("Standard", "standard"),
        ("Boost IQ", "boost_iq"),
        ("Max", "max"),
        ("Quiet", "Quiet"),
    ])
}

pub(super) fn descriptor() -> ModelDescriptor {
    ModelDescriptor::new("T2320", "eufy X9 Pro")
        .with_features(
            HostFeatures::BATTERY
                | HostFeatures::FAN_SPEED
                | HostFeatures::LOCATE
                | HostFeatures::PAUSE
                | HostFeatures::RETURN_HOME
                | HostFeatures::SEND_COMMAND
                | HostFeatures::START
                | HostFeatures::STATE
                | HostFeatures::STOP,
        )
        .with_capabilities([
            Capability::BatteryLevel,
            Capability::Status,
            Capability::ErrorCode,
            Capability::WorkMode,
            Capability::FanSpeed,
            Capability::DoNotDisturb,
            Capability::BoostIq,
        ])
        .with_commands([
            Command::StartPause,
            Command::Stop,
            Command::Locate,
            Command::ReturnHome,
            Command::SetFanSpeed,
            Command::SetWorkMode,
            Command::SetDoNotDisturb,
            Command::SetBoostIq,
        ])
        .with_codec(Command::StartPause, Codec::table([("start", true), ("pause", false)]))
        .with_code(Capability::WorkMode, "152")
        .with_codec(Capability::WorkMode, modes())
        .with_code(Command::SetWorkMode, "152")
        .with_codec(Command::SetWorkMode, modes())
        .with_code(Capability::Status, "173")
        .with_code(Command::ReturnHome, "153")
        .with_code(Command::Stop, "153")
        .with_code(Command::Locate, "153")
        .with_codec(Command::Locate, Codec::trigger(true))
        .with_code(Capability::FanSpeed, "154")
        .with_codec(Capability::FanSpeed, fan_speeds())
        .with_code(Command::SetFanSpeed, "154")
        .with_codec(Command::SetFanSpeed, fan_speeds())
        .with_code(Capability::BatteryLevel, "172")
        .with_code(Capability::ErrorCode, "169")
}
