use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    activity::Activity,
    dps::Snapshot,
    model::HostFeatures,
    translate::DecodeIssue,
    value::{CommandRequest, DeviceState},
};

pub const TOPIC_DEVICE_ANNOUNCE: &str = "robovac.device.announce";
pub const TOPIC_STATE_PREFIX: &str = "robovac.state.";
pub const TOPIC_COMMAND_PREFIX: &str = "robovac.command.";
pub const TOPIC_COMMAND_RESULT_PREFIX: &str = "robovac.command_result.";

pub fn state_topic(device_id: &str) -> String {
    format!("{TOPIC_STATE_PREFIX}{device_id}")
}

pub fn command_topic(device_id: &str) -> String {
    format!("{TOPIC_COMMAND_PREFIX}{device_id}")
}

pub fn command_result_topic(device_id: &str) -> String {
    format!("{TOPIC_COMMAND_RESULT_PREFIX}{device_id}")
}

/// Published once when a component starts.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DeviceAnnounce {
    pub device_id: String,
    pub name: String,
    pub model_id: String,
    pub model_name: String,
    pub features: HostFeatures,
    /// Fan speeds the host may offer, empty when not adjustable.
    #[serde(default)]
    pub fan_speeds: Vec<String>,
    pub sw_version: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StateUpdate {
    pub device_id: String,
    pub state: DeviceState,
    pub activity: Option<Activity>,
    /// Message for the current error code, if it is catalogued.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub issues: Vec<DecodeIssue>,
    pub ts: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CommandEnvelope {
    #[serde(flatten)]
    pub request: CommandRequest,
    pub correlation_id: Option<Uuid>,
}

impl CommandEnvelope {
    pub fn new(request: CommandRequest) -> Self {
        Self { request, correlation_id: Some(Uuid::new_v4()) }
    }
}

/// Result of one command, successful or not.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CommandOutcome {
    pub correlation_id: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub writes: Option<Snapshot>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub ts: DateTime<Utc>,
}

impl CommandOutcome {
    pub fn sent(correlation_id: Option<Uuid>, writes: Snapshot) -> Self {
        Self { correlation_id, writes: Some(writes), error: None, ts: Utc::now() }
    }

    pub fn failed(correlation_id: Option<Uuid>, error: impl ToString) -> Self {
        Self { correlation_id, writes: None, error: Some(error.to_string()), ts: Utc::now() }
    }

    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}
