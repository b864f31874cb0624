use std::{
    fmt::{self, Display, Formatter},
    str::FromStr,
};

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Readable device state, independent of any model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Capability {
    BatteryLevel,
    Status,
    ErrorCode,
    WorkMode,
    FanSpeed,
    CleaningTime,
    CleaningArea,
    DoNotDisturb,
    BoostIq,
    AutoReturn,
    Consumables,
}

/// Writable device action, independent of any model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Command {
    StartPause,
    Stop,
    Locate,
    ReturnHome,
    SetFanSpeed,
    SetWorkMode,
    CleanSpot,
    Direction,
    SetDoNotDisturb,
    SetBoostIq,
    SetAutoReturn,
    RoomClean,
}

/// Shape of the logical values a data point carries. Codecs declare the kind
/// they produce and descriptors may only attach compatible codecs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Integer,
    Boolean,
    Enum,
    Text,
    Trigger,
    Structured,
}

impl Capability {
    pub const ALL: [Capability; 11] = [
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
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::BatteryLevel => "BATTERY_LEVEL",
            Self::Status => "STATUS",
            Self::ErrorCode => "ERROR_CODE",
            Self::WorkMode => "WORK_MODE",
            Self::FanSpeed => "FAN_SPEED",
            Self::CleaningTime => "CLEANING_TIME",
            Self::CleaningArea => "CLEANING_AREA",
            Self::DoNotDisturb => "DO_NOT_DISTURB",
            Self::BoostIq => "BOOST_IQ",
            Self::AutoReturn => "AUTO_RETURN",
            Self::Consumables => "CONSUMABLES",
        }
    }

    fn accepts(&self, kind: ValueKind) -> bool {
        match self {
            Self::BatteryLevel | Self::CleaningTime | Self::CleaningArea => {
                kind == ValueKind::Integer
            }
            Self::Status | Self::ErrorCode | Self::WorkMode | Self::FanSpeed => {
                matches!(kind, ValueKind::Enum | ValueKind::Text)
            }
            Self::DoNotDisturb | Self::BoostIq | Self::AutoReturn => kind == ValueKind::Boolean,
            Self::Consumables => kind == ValueKind::Structured,
        }
    }
}

impl Command {
    pub const ALL: [Command; 12] = [
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
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::StartPause => "START_PAUSE",
            Self::Stop => "STOP",
            Self::Locate => "LOCATE",
            Self::ReturnHome => "RETURN_HOME",
            Self::SetFanSpeed => "SET_FAN_SPEED",
            Self::SetWorkMode => "SET_WORK_MODE",
            Self::CleanSpot => "CLEAN_SPOT",
            Self::Direction => "DIRECTION",
            Self::SetDoNotDisturb => "SET_DO_NOT_DISTURB",
            Self::SetBoostIq => "SET_BOOST_IQ",
            Self::SetAutoReturn => "SET_AUTO_RETURN",
            Self::RoomClean => "ROOM_CLEAN",
        }
    }

    fn accepts(&self, kind: ValueKind) -> bool {
        match self {
            Self::StartPause => matches!(kind, ValueKind::Boolean | ValueKind::Enum),
            Self::Stop | Self::Locate | Self::ReturnHome | Self::CleanSpot => {
                matches!(kind, ValueKind::Trigger | ValueKind::Boolean | ValueKind::Enum)
            }
            Self::SetFanSpeed | Self::Direction => kind == ValueKind::Enum,
            Self::SetWorkMode => matches!(kind, ValueKind::Enum | ValueKind::Text),
            Self::SetDoNotDisturb | Self::SetBoostIq | Self::SetAutoReturn => {
                kind == ValueKind::Boolean
            }
            Self::RoomClean => kind == ValueKind::Structured,
        }
    }
}

/// Any key of the vocabulary: the union of capabilities and commands.
///
/// Capability and command names never overlap, so a `DataPoint` round-trips
/// through its string identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DataPoint {
    Capability(Capability),
    Command(Command),
}

impl DataPoint {
    pub fn all() -> impl Iterator<Item = DataPoint> {
        Capability::ALL
            .into_iter()
            .map(DataPoint::Capability)
            .chain(Command::ALL.into_iter().map(DataPoint::Command))
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Capability(c) => c.as_str(),
            Self::Command(c) => c.as_str(),
        }
    }

    pub fn accepts(&self, kind: ValueKind) -> bool {
        match self {
            Self::Capability(c) => c.accepts(kind),
            Self::Command(c) => c.accepts(kind),
        }
    }

    pub fn as_capability(&self) -> Option<Capability> {
        match self {
            Self::Capability(c) => Some(*c),
            Self::Command(_) => None,
        }
    }
}

impl From<Capability> for DataPoint {
    fn from(value: Capability) -> Self {
        Self::Capability(value)
    }
}

impl From<Command> for DataPoint {
    fn from(value: Command) -> Self {
        Self::Command(value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown data point name {0:?}")]
pub struct UnknownName(pub String);

impl FromStr for Capability {
    type Err = UnknownName;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL.into_iter().find(|c| c.as_str() == s).ok_or_else(|| UnknownName(s.to_string()))
    }
}

impl FromStr for Command {
    type Err = UnknownName;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL.into_iter().find(|c| c.as_str() == s).ok_or_else(|| UnknownName(s.to_string()))
    }
}

impl FromStr for DataPoint {
    type Err = UnknownName;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DataPoint::all().find(|dp| dp.as_str() == s).ok_or_else(|| UnknownName(s.to_string()))
    }
}

impl Display for Capability {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Display for Command {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Display for DataPoint {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for DataPoint {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for DataPoint {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        name.parse().map_err(serde::de::Error::custom)
    }
}
