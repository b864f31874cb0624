use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{
    dps::RawValue,
    vocab::{Capability, Command},
};

/// Model-agnostic value of a capability or command argument.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum LogicalValue {
    Bool(bool),
    Int(i64),
    /// A named member of an enumeration, e.g. a fan speed or a status.
    Choice(String),
    Text(String),
    /// Remaining life of each consumable, keyed by consumable name.
    Consumables(BTreeMap<String, u32>),
    Rooms(RoomSelection),
    /// A raw value the model's enumeration does not know about.
    Unknown(RawValue),
}

impl LogicalValue {
    /// Textual label for enum-like values.
    pub fn label(&self) -> Option<String> {
        match self {
            Self::Choice(s) | Self::Text(s) => Some(s.clone()),
            Self::Unknown(RawValue::Str(s)) => Some(s.clone()),
            Self::Unknown(raw) => Some(raw.to_string()),
            _ => None,
        }
    }
}

impl From<bool> for LogicalValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for LogicalValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<&str> for LogicalValue {
    fn from(value: &str) -> Self {
        Self::Choice(value.to_string())
    }
}

impl From<RoomSelection> for LogicalValue {
    fn from(value: RoomSelection) -> Self {
        Self::Rooms(value)
    }
}

/// Rooms to clean and how many passes to make.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomSelection {
    pub room_ids: Vec<u32>,
    pub clean_times: u32,
    /// Milliseconds since the epoch stamped into the request; the encoder
    /// fills in the current time when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp_ms: Option<i64>,
}

impl RoomSelection {
    pub fn new(room_ids: Vec<u32>, clean_times: u32) -> Self {
        Self { room_ids, clean_times, timestamp_ms: None }
    }

    pub fn with_timestamp(mut self, timestamp_ms: i64) -> Self {
        self.timestamp_ms = Some(timestamp_ms);
        self
    }
}

/// Capabilities decoded from one snapshot.
///
/// The state is sparse: a capability the snapshot did not mention is absent,
/// not reset. Use [`DeviceState::merged_over`] to keep last known values.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeviceState(BTreeMap<Capability, LogicalValue>);

impl DeviceState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, capability: Capability, value: LogicalValue) {
        self.0.insert(capability, value);
    }

    pub fn get(&self, capability: Capability) -> Option<&LogicalValue> {
        self.0.get(&capability)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Capability, &LogicalValue)> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn battery_level(&self) -> Option<u8> {
        match self.get(Capability::BatteryLevel) {
            Some(LogicalValue::Int(level)) => u8::try_from(*level).ok(),
            _ => None,
        }
    }

    pub fn status(&self) -> Option<String> {
        self.get(Capability::Status).and_then(LogicalValue::label)
    }

    /// This state layered over `previous`: entries present here win, entries
    /// only present in `previous` persist.
    pub fn merged_over(&self, previous: &DeviceState) -> DeviceState {
        let mut merged = previous.0.clone();
        merged.extend(self.0.iter().map(|(k, v)| (*k, v.clone())));
        DeviceState(merged)
    }
}

impl FromIterator<(Capability, LogicalValue)> for DeviceState {
    fn from_iter<T: IntoIterator<Item = (Capability, LogicalValue)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// A command issued from the host side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandRequest {
    pub command: Command,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub args: Option<LogicalValue>,
}

impl CommandRequest {
    pub fn new(command: Command) -> Self {
        Self { command, args: None }
    }

    pub fn with_args(command: Command, args: impl Into<LogicalValue>) -> Self {
        Self { command, args: Some(args.into()) }
    }
}
