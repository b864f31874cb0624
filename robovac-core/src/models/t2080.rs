//! RoboVac S1 Pro. Mode, status and docking go through protobuf-style
//! base64 blobs on 152/153.

use crate::{
    activity::Activity,
    codec::Codec,
    model::{HostFeatures, ModelDescriptor},
    vocab::{Capability, Command},
};

const MODE: &str = "152";

fn modes() -> Codec {
    Codec::table([
        ("auto", "BBoCCAE="),
        ("pause", "AggN"),
        ("Spot", "AA=="),
        ("return", "AggG"),
        ("Nosweep", "AggO"),
    ])
}

fn statuses() -> Codec {
    Codec::table([
        ("Paused", "CAoAEAUyAggB"),
        ("Room Cleaning", "CAoCCAEQBTIA"),
        ("Room Positioning", "CAoCCAEQBVIA"),
        ("Room Positioning", "DAoCCAEQBTICEAFSAA=="),
        ("Room Paused", "CgoCCAEQBTICCAE="),
        ("Standby", "BhAHQgBSAA=="),
        ("Standby", "BgoAEAUyAA=="),
        ("Standby", "AA=="),
        ("Heading Home", "BBAHQgA="),
        ("Heading Home", "AgoA"),
        ("Charging", "BBADGgA="),
        ("Completed", "BhADGgIIAQ=="),
        ("Sleeping", "AhAB"),
        ("Adding Water", "DAoCCAEQCRoCCAEyAA=="),
        ("Drying Mop", "BhAJOgIQAg=="),
        ("Drying Mop", "CBAJGgA6AhAC"),
        ("Drying Mop", "ChAJGgIIAToCEAI="),
        ("Washing Mop", "EAoCCAEQCRoCCAEyADoCEAE="),
        ("Washing Mop", "BhAJOgIQAQ=="),
        ("Removing Dirty Water", "AhAJ"),
        ("Manual Control", "BhAGGgIIAQ=="),
        ("Auto Cleaning", "CgoAEAkaAggBMgA="),
    ])
}

pub(super) fn descriptor() -> ModelDescriptor {
    ModelDescriptor::new("T2080", "RoboVac S1 Pro")
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
        .with_code(Command::Direction, "176")
        .with_code(Capability::WorkMode, MODE)
        .with_codec(Capability::WorkMode, modes())
        .with_code(Command::SetWorkMode, MODE)
        .with_codec(Command::SetWorkMode, modes())
        .with_code(Command::CleanSpot, MODE)
        .with_codec(Command::CleanSpot, Codec::trigger("AA=="))
        .with_code(Command::ReturnHome, MODE)
        .with_codec(Command::ReturnHome, Codec::trigger("AggB"))
        .with_code(Command::Stop, MODE)
        .with_codec(Command::Stop, Codec::trigger("AggB"))
        .with_code(Capability::Status, "153")
        .with_codec(Capability::Status, statuses())
        .with_code(Capability::FanSpeed, "158")
        .with_code(Command::SetFanSpeed, "158")
        .with_codec(Capability::FanSpeed, fan_speeds())
        .with_codec(Command::SetFanSpeed, fan_speeds())
        .with_code(Capability::BoostIq, "159")
        .with_code(Command::SetBoostIq, "159")
        .with_code(Capability::CleaningTime, "6")
        .with_code(Capability::CleaningArea, "7")
        .with_activity([
            ("AUTO", Activity::Cleaning),
            ("POSITION", Activity::Cleaning),
            ("Paused", Activity::Paused),
            ("Auto Cleaning", Activity::Cleaning),
            ("Room Cleaning", Activity::Cleaning),
            ("Room Positioning", Activity::Cleaning),
            ("Room Paused", Activity::Paused),
            ("SPOT", Activity::Cleaning),
            ("SPOT_POSITION", Activity::Cleaning),
            ("SPOT_PAUSE", Activity::Paused),
            ("START_MANUAL", Activity::Cleaning),
            ("Standby", Activity::Idle),
            ("Heading Home", Activity::Returning),
            ("Charging", Activity::Docked),
            ("Completed", Activity::Docked),
            ("Sleeping", Activity::Idle),
            ("Drying Mop", Activity::Docked),
            ("Washing Mop", Activity::Docked),
            ("Removing Dirty Water", Activity::Docked),
            ("Emptying Dust", Activity::Docked),
            ("Manual Control", Activity::Cleaning),
        ])
}

fn fan_speeds() -> Codec {
    Codec::table([("quiet", "Quiet"), ("standard", "Standard"), ("turbo", "Turbo"), ("max", "Max")])
}
