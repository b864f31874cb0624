use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{faults, value::DeviceState, vocab::Capability};

/// Coarse activity reported to the host, derived from the decoded status.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Activity {
    Idle,
    Cleaning,
    Paused,
    Returning,
    Docked,
    Error,
}

impl Activity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Cleaning => "cleaning",
            Self::Paused => "paused",
            Self::Returning => "returning",
            Self::Docked => "docked",
            Self::Error => "error",
        }
    }

    /// Derive the activity from a decoded state.
    ///
    /// No status means no activity. A reported fault wins over the status.
    /// Models with an activity table are looked up there and nowhere else;
    /// models without one fall back to matching well-known status names, and
    /// anything unrecognised counts as cleaning.
    pub fn derive(state: &DeviceState, table: &BTreeMap<String, Activity>) -> Option<Self> {
        let status = state.status().filter(|s| !s.is_empty() && s != "0")?;

        if state.get(Capability::ErrorCode).is_some_and(faults::is_fault) {
            tracing::debug!(%status, "error code present, reporting error activity");
            return Some(Activity::Error);
        }

        if !table.is_empty() {
            let activity = table.get(&status).copied();
            if activity.is_none() {
                tracing::debug!(%status, "no activity mapping for status");
            }
            return activity;
        }

        let activity = match status.to_ascii_lowercase().as_str() {
            "charging" | "completed" => Activity::Docked,
            "recharge" => Activity::Returning,
            "sleeping" | "standby" => Activity::Idle,
            "paused" => Activity::Paused,
            _ => Activity::Cleaning,
        };
        Some(activity)
    }
}
