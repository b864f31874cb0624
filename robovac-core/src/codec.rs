use base64::{Engine as _, engine::general_purpose::STANDARD};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::{
    consumables::ConsumableLayout,
    dps::RawValue,
    error::{DecodeError, EncodeError},
    value::{LogicalValue, RoomSelection},
    vocab::ValueKind,
};

/// How the logical value of one data point is carried on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Codec {
    /// Integers, also accepted as decimal strings. Decoded values are clamped
    /// into `min..=max`; encoding rejects values outside it.
    Integer { min: i64, max: i64 },
    /// Booleans, also accepted as `0`/`1` integers or strings.
    Boolean,
    /// Named values; several raw values may share one name, the first one is
    /// used for encoding.
    Enum { values: Vec<EnumEntry> },
    /// Free text passed through as is.
    Text,
    /// Fire-and-forget command writing a fixed raw value.
    Trigger { value: RawValue },
    Consumables { layout: ConsumableLayout },
    /// Room clean request, base64 of a `selectRoomsClean` JSON call.
    Rooms,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnumEntry {
    pub name: String,
    pub raw: RawValue,
}

impl Codec {
    pub fn table<'a, R>(entries: impl IntoIterator<Item = (&'a str, R)>) -> Self
    where
        R: Into<RawValue>,
    {
        let values = entries
            .into_iter()
            .map(|(name, raw)| EnumEntry { name: name.to_string(), raw: raw.into() })
            .collect();
        Self::Enum { values }
    }

    /// Table whose names are also the raw strings.
    pub fn identity<'a>(names: impl IntoIterator<Item = &'a str>) -> Self {
        Self::table(names.into_iter().map(|n| (n, n)))
    }

    pub fn trigger(value: impl Into<RawValue>) -> Self {
        Self::Trigger { value: value.into() }
    }

    pub fn kind(&self) -> ValueKind {
        match self {
            Self::Integer { .. } => ValueKind::Integer,
            Self::Boolean => ValueKind::Boolean,
            Self::Enum { .. } => ValueKind::Enum,
            Self::Text => ValueKind::Text,
            Self::Trigger { .. } => ValueKind::Trigger,
            Self::Consumables { .. } | Self::Rooms => ValueKind::Structured,
        }
    }

    /// Names an enum codec can encode, in declaration order, without
    /// duplicates. Empty for every other codec.
    pub fn choices(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        if let Self::Enum { values } = self {
            for entry in values {
                if !names.contains(&entry.name.as_str()) {
                    names.push(&entry.name);
                }
            }
        }
        names
    }

    /// Rejects codecs that can never hold a value.
    pub fn check(&self) -> Result<(), String> {
        match self {
            Self::Integer { min, max } if min > max => Err(format!("empty range {min}..={max}")),
            Self::Enum { values } if values.is_empty() => Err("enum table is empty".to_string()),
            _ => Ok(()),
        }
    }

    /// Argument assumed when a command arrives without one.
    pub fn implicit_argument(&self) -> Option<LogicalValue> {
        match self {
            Self::Trigger { .. } | Self::Boolean => Some(LogicalValue::Bool(true)),
            _ => None,
        }
    }

    /// A value this codec is guaranteed to encode.
    pub fn sample(&self) -> Option<LogicalValue> {
        match self {
            Self::Integer { min, .. } => Some(LogicalValue::Int(*min)),
            Self::Boolean | Self::Trigger { .. } => Some(LogicalValue::Bool(true)),
            Self::Enum { values } => values.first().map(|e| LogicalValue::Choice(e.name.clone())),
            Self::Text => Some(LogicalValue::Text("auto".into())),
            Self::Consumables { .. } => Some(LogicalValue::Consumables(Default::default())),
            Self::Rooms => Some(LogicalValue::Rooms(RoomSelection::new(vec![1], 1))),
        }
    }

    pub fn decode(&self, raw: &RawValue) -> Result<LogicalValue, DecodeError> {
        match self {
            Self::Integer { min, max } => {
                let value = match raw {
                    RawValue::Int(i) => *i,
                    RawValue::Str(s) => {
                        s.trim().parse().map_err(|_| DecodeError::unexpected("integer", raw))?
                    }
                    _ => return Err(DecodeError::unexpected("integer", raw)),
                };
                let clamped = value.max(*min).min(*max);
                if clamped != value {
                    tracing::debug!(value, min, max, "clamping out-of-range integer");
                }
                Ok(LogicalValue::Int(clamped))
            }
            Self::Boolean => match raw {
                RawValue::Bool(b) => Ok(LogicalValue::Bool(*b)),
                RawValue::Int(0) => Ok(LogicalValue::Bool(false)),
                RawValue::Int(1) => Ok(LogicalValue::Bool(true)),
                RawValue::Str(s) if s == "0" => Ok(LogicalValue::Bool(false)),
                RawValue::Str(s) if s == "1" => Ok(LogicalValue::Bool(true)),
                RawValue::Int(_) | RawValue::Str(_) => {
                    Err(DecodeError::NonCanonical { value: raw.clone() })
                }
                RawValue::Other(_) => Err(DecodeError::unexpected("boolean", raw)),
            },
            Self::Enum { values } => Ok(values
                .iter()
                .find(|e| raw_matches(&e.raw, raw))
                .map(|e| LogicalValue::Choice(e.name.clone()))
                .unwrap_or_else(|| LogicalValue::Unknown(raw.clone()))),
            Self::Text => match raw {
                RawValue::Str(s) => Ok(LogicalValue::Text(s.clone())),
                RawValue::Int(i) => Ok(LogicalValue::Text(i.to_string())),
                RawValue::Bool(b) => Ok(LogicalValue::Text(b.to_string())),
                RawValue::Other(_) => Err(DecodeError::unexpected("string", raw)),
            },
            Self::Trigger { value } => Ok(LogicalValue::Bool(raw_matches(value, raw))),
            Self::Consumables { layout } => {
                let encoded = raw.as_str().ok_or_else(|| DecodeError::unexpected("string", raw))?;
                layout.decode(encoded).map(LogicalValue::Consumables)
            }
            Self::Rooms => {
                let encoded = raw.as_str().ok_or_else(|| DecodeError::unexpected("string", raw))?;
                decode_rooms(encoded).map(LogicalValue::Rooms)
            }
        }
    }

    pub fn encode(&self, value: &LogicalValue) -> Result<RawValue, EncodeError> {
        match (self, value) {
            (Self::Integer { min, max }, LogicalValue::Int(i)) => {
                if (*min..=*max).contains(i) {
                    Ok(RawValue::Int(*i))
                } else {
                    Err(EncodeError::new(format!("{i} is outside {min}..={max}")))
                }
            }
            (Self::Boolean, LogicalValue::Bool(b)) => Ok(RawValue::Bool(*b)),
            (Self::Enum { values }, LogicalValue::Choice(name) | LogicalValue::Text(name)) => {
                values
                    .iter()
                    .find(|e| &e.name == name)
                    .or_else(|| values.iter().find(|e| normalize(&e.name) == normalize(name)))
                    .map(|e| e.raw.clone())
                    .ok_or_else(|| EncodeError::new(format!("unknown choice {name:?}")))
            }
            (Self::Text, LogicalValue::Text(s) | LogicalValue::Choice(s)) => {
                Ok(RawValue::Str(s.clone()))
            }
            (Self::Trigger { value }, LogicalValue::Bool(true)) => Ok(value.clone()),
            (Self::Consumables { layout }, LogicalValue::Consumables(counters)) => {
                layout.encode(counters).map(RawValue::Str)
            }
            (Self::Rooms, LogicalValue::Rooms(selection)) => {
                Ok(RawValue::Str(encode_rooms(selection)))
            }
            (codec, value) => Err(EncodeError::new(format!(
                "{:?} codec cannot encode {value:?}",
                codec.kind()
            ))),
        }
    }
}

/// Lower-case, spaces and dashes folded into underscores: "Boost IQ" and
/// "boost_iq" name the same choice.
fn normalize(name: &str) -> String {
    name.trim().to_lowercase().replace([' ', '-'], "_")
}

/// Devices are inconsistent about quoting numbers, so an integer table entry
/// also matches its decimal string form.
fn raw_matches(expected: &RawValue, actual: &RawValue) -> bool {
    match (expected, actual) {
        (RawValue::Int(i), RawValue::Str(s)) | (RawValue::Str(s), RawValue::Int(i)) => {
            s.trim().parse::<i64>().is_ok_and(|n| n == *i)
        }
        _ => expected == actual,
    }
}

fn encode_rooms(selection: &RoomSelection) -> String {
    let timestamp = selection.timestamp_ms.unwrap_or_else(|| chrono::Utc::now().timestamp_millis());
    let call = json!({
        "method": "selectRoomsClean",
        "data": { "roomIds": selection.room_ids, "cleanTimes": selection.clean_times },
        "timestamp": timestamp,
    });
    STANDARD.encode(call.to_string())
}

fn decode_rooms(encoded: &str) -> Result<RoomSelection, DecodeError> {
    let bytes = STANDARD
        .decode(encoded.trim())
        .map_err(|e| DecodeError::malformed(format!("invalid base64: {e}")))?;
    let call: Value = serde_json::from_slice(&bytes)
        .map_err(|e| DecodeError::malformed(format!("room clean call: {e}")))?;

    if call.get("method").and_then(Value::as_str) != Some("selectRoomsClean") {
        return Err(DecodeError::malformed("not a selectRoomsClean call"));
    }
    let data = call.get("data").ok_or_else(|| DecodeError::malformed("missing data"))?;
    let room_ids = data
        .get("roomIds")
        .and_then(Value::as_array)
        .ok_or_else(|| DecodeError::malformed("missing roomIds"))?
        .iter()
        .map(|id| id.as_u64().and_then(|id| u32::try_from(id).ok()))
        .collect::<Option<Vec<_>>>()
        .ok_or_else(|| DecodeError::malformed("room ids must be u32"))?;
    let clean_times = data
        .get("cleanTimes")
        .and_then(Value::as_u64)
        .and_then(|n| u32::try_from(n).ok())
        .ok_or_else(|| DecodeError::malformed("missing cleanTimes"))?;

    Ok(RoomSelection {
        room_ids,
        clean_times,
        timestamp_ms: call.get("timestamp").and_then(Value::as_i64),
    })
}
