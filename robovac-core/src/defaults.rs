//! The default data-point convention most models follow. Model descriptors
//! only list where they deviate from it.

use std::{collections::BTreeMap, sync::OnceLock};

use crate::{
    codec::Codec,
    consumables::ConsumableLayout,
    dps::DpsCode,
    faults,
    vocab::{Capability, Command, DataPoint},
};

/// Default code and codec for every data point of the vocabulary.
#[derive(Debug, Clone, PartialEq)]
pub struct DefaultMapping {
    codes: BTreeMap<DataPoint, DpsCode>,
    codecs: BTreeMap<DataPoint, Codec>,
}

impl DefaultMapping {
    fn build() -> Self {
        let codes = DataPoint::all().map(|dp| (dp, DpsCode::from(default_code(dp)))).collect();
        let codecs = DataPoint::all().map(|dp| (dp, default_codec(dp))).collect();
        Self { codes, codecs }
    }

    pub fn code(&self, data_point: DataPoint) -> &DpsCode {
        &self.codes[&data_point]
    }

    pub fn codec(&self, data_point: DataPoint) -> &Codec {
        &self.codecs[&data_point]
    }

    pub fn codes(&self) -> &BTreeMap<DataPoint, DpsCode> {
        &self.codes
    }

    pub fn codecs(&self) -> &BTreeMap<DataPoint, Codec> {
        &self.codecs
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }
}

/// The process-wide default mapping, built on first use and never mutated.
pub fn default_mapping() -> &'static DefaultMapping {
    static DEFAULTS: OnceLock<DefaultMapping> = OnceLock::new();
    DEFAULTS.get_or_init(DefaultMapping::build)
}

fn default_code(data_point: DataPoint) -> &'static str {
    match data_point {
        DataPoint::Capability(c) => match c {
            Capability::Status => "15",
            Capability::WorkMode => "5",
            Capability::FanSpeed => "102",
            Capability::ErrorCode => "106",
            Capability::DoNotDisturb => "107",
            Capability::CleaningTime => "109",
            Capability::CleaningArea => "110",
            Capability::BoostIq => "118",
            Capability::AutoReturn => "135",
            Capability::Consumables => "142",
            Capability::BatteryLevel => "163",
        },
        DataPoint::Command(c) => match c {
            Command::StartPause => "2",
            Command::Direction => "3",
            Command::SetWorkMode | Command::CleanSpot => "5",
            Command::ReturnHome | Command::Stop => "101",
            Command::SetFanSpeed => "102",
            Command::Locate => "103",
            Command::SetDoNotDisturb => "107",
            Command::SetBoostIq => "118",
            Command::RoomClean => "124",
            Command::SetAutoReturn => "135",
        },
    }
}

fn work_modes() -> Codec {
    Codec::table([
        ("auto", "Auto"),
        ("small_room", "SmallRoom"),
        ("spot", "Spot"),
        ("edge", "Edge"),
        ("nosweep", "Nosweep"),
    ])
}

fn fan_speeds() -> Codec {
    Codec::table([
        ("no_suction", "No_suction"),
        ("standard", "Standard"),
        ("boost_iq", "Boost_IQ"),
        ("max", "Max"),
        ("pure", "Quiet"),
    ])
}

fn default_codec(data_point: DataPoint) -> Codec {
    match data_point {
        DataPoint::Capability(c) => match c {
            Capability::BatteryLevel => Codec::Integer { min: 0, max: 100 },
            Capability::CleaningTime | Capability::CleaningArea => {
                Codec::Integer { min: 0, max: i64::from(u32::MAX) }
            }
            Capability::Status => Codec::Text,
            Capability::ErrorCode => faults::codec(),
            Capability::WorkMode => work_modes(),
            Capability::FanSpeed => fan_speeds(),
            Capability::DoNotDisturb | Capability::BoostIq | Capability::AutoReturn => {
                Codec::Boolean
            }
            Capability::Consumables => {
                Codec::Consumables { layout: ConsumableLayout::JsonDocument }
            }
        },
        DataPoint::Command(c) => match c {
            Command::StartPause | Command::Locate => Codec::Boolean,
            Command::SetDoNotDisturb | Command::SetBoostIq | Command::SetAutoReturn => {
                Codec::Boolean
            }
            Command::Stop | Command::ReturnHome => Codec::trigger(true),
            Command::CleanSpot => Codec::trigger("Spot"),
            Command::SetWorkMode => work_modes(),
            Command::SetFanSpeed => fan_speeds(),
            Command::Direction => Codec::identity(["forward", "back", "left", "right"]),
            Command::RoomClean => Codec::Rooms,
        },
    }
}
