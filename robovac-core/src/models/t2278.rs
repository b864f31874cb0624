//! eufy Clean L60 Hybrid SES. Start, pause and mode changes share 152;
//! return home and locate share 153.

use crate::{
    codec::Codec,
    model::{HostFeatures, ModelDescriptor},
    vocab::{Capability, Command},
};

fn modes() -> Codec {
    Codec::table([
        ("small_room", "AA=="),
        ("pause", "AggN"),
        ("edge", "AggG"),
        ("auto", "BBoCCAE="),
        ("nosweep", "AggO"),
    ])
}

fn fan_speeds() -> Codec {
    Codec::table([("fan_speed", "AgkBCgIKAQoDCgEKBAoB")])
}

pub(super) fn descriptor() -> ModelDescriptor {
    ModelDescriptor::new("T2278", "eufy Clean L60 Hybrid SES")
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
        .with_code(Capability::WorkMode, "152")
        .with_codec(Capability::WorkMode, modes())
        .with_code(Command::SetWorkMode, "152")
        .with_codec(Command::SetWorkMode, modes())
        .with_code(Command::StartPause, "152")
        .with_codec(Command::StartPause, Codec::table([("start", "BBoCCAE="), ("pause", "AggN")]))
        .with_code(Capability::Status, "173")
        .with_code(Command::ReturnHome, "153")
        .with_codec(Command::ReturnHome, Codec::trigger("AggB"))
        .with_code(Command::Stop, "153")
        .with_codec(Command::Stop, Codec::trigger("AggB"))
        .with_code(Command::Locate, "153")
        .with_codec(Command::Locate, Codec::trigger("AggC"))
        .with_code(Capability::FanSpeed, "154")
        .with_codec(Capability::FanSpeed, fan_speeds())
        .with_code(Command::SetFanSpeed, "154")
        .with_codec(Command::SetFanSpeed, fan_speeds())
        .with_code(Capability::BatteryLevel, "172")
        .with_code(Capability::ErrorCode, "169")
}
