//! RoboVac LR30 Hybrid. Mostly the default layout; battery lives on 104.

use crate::{
    codec::Codec,
    model::{HostFeatures, ModelDescriptor},
    vocab::{Capability, Command},
};

fn fan_speeds() -> Codec {
    Codec::table([("quiet", "Quiet"), ("standard", "Standard"), ("turbo", "Turbo"), ("max", "Max")])
}

pub(super) fn descriptor() -> ModelDescriptor {
    ModelDescriptor::new("T2193", "RoboVac LR30 Hybrid")
        .with_features(HostFeatures::all())
        .with_capabilities([
            Capability::BatteryLevel,
            Capability::Status,
            Capability::ErrorCode,
            Capability::WorkMode,
            Capability::FanSpeed,
            Capability::CleaningTime,
            Capability::CleaningArea,
            Capability::DoNotDisturb,
            Capability::BoostIq,
            Capability::AutoReturn,
            Capability::Consumables,
        ])
        .with_commands([
            Command::StartPause,
            Command::Stop,
            Command::Locate,
            Command::ReturnHome,
            Command::SetFanSpeed,
            Command::SetWorkMode,
            Command::CleanSpot,
            Command::Direction,
            Command::SetDoNotDisturb,
            Command::SetBoostIq,
            Command::SetAutoReturn,
            Command::RoomClean,
        ])
        .with_codec(
            Command::Direction,
            Codec::table([
                ("forward", "Forward"),
                ("back", "Back"),
                ("left", "Left"),
                ("right", "Right"),
            ]),
        )
        .with_codec(Capability::FanSpeed, fan_speeds())
        .with_codec(Command::SetFanSpeed, fan_speeds())
        .with_code(Capability::BatteryLevel, "104")
        // spot mode only takes effect once the run is (re)started
        .with_linked_write(Command::CleanSpot, Command::StartPause, true)
}
