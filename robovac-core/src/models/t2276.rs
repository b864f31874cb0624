//! RoboVac X8 Pro SES.

use crate::{
    codec::Codec,
    model::{HostFeatures, ModelDescriptor},
    vocab::{Capability, Command},
};

fn modes() -> Codec {
    Codec::identity(["auto", "spot", "edge"])
}

fn fan_speeds() -> Codec {
    Codec::table([("max", "Max"), ("mid", "Mid"), ("min", "Min")])
}

pub(super) fn descriptor() -> ModelDescriptor {
    ModelDescriptor::new("T2276", "RoboVac X8 Pro SES")
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
        .with_code(Command::StartPause, "1")
        .with_codec(Command::StartPause, Codec::table([("start", true), ("stop", false)]))
        .with_codec(Capability::WorkMode, modes())
        .with_codec(Command::SetWorkMode, modes())
        .with_code(Command::ReturnHome, "7")
        .with_code(Command::Stop, "7")
        .with_codec(Capability::FanSpeed, fan_speeds())
        .with_codec(Command::SetFanSpeed, fan_speeds())
        .with_code(Capability::BatteryLevel, "104")
        .with_code(Capability::ErrorCode, "2")
}
