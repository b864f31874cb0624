//! Packed consumable-life records.
//!
//! Models disagree on how they pack consumable counters into a single data
//! point, so every layout is named and documented here and a descriptor picks
//! one per model:
//!
//! * [`ConsumableLayout::JsonDocument`]: base64 of a JSON document (older
//!   firmware emits a single-quoted literal instead) shaped as
//!   `{"consumable": {"duration": {"<name>": <hours>, ...}}}`.
//! * [`ConsumableLayout::LengthPrefixedCounters`]: base64 of a varint length
//!   prefix followed by exactly that many bytes of varint-encoded
//!   `(field << 3 | 0, counter)` pairs. The field table names each field
//!   number.

use std::collections::BTreeMap;

use base64::{Engine as _, engine::general_purpose::STANDARD};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::error::{DecodeError, EncodeError};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "format", rename_all = "snake_case")]
pub enum ConsumableLayout {
    JsonDocument,
    LengthPrefixedCounters { fields: Vec<CounterField> },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CounterField {
    pub number: u32,
    pub name: String,
}

impl CounterField {
    pub fn new(number: u32, name: impl Into<String>) -> Self {
        Self { number, name: name.into() }
    }
}

impl ConsumableLayout {
    pub fn counters<'a>(fields: impl IntoIterator<Item = (u32, &'a str)>) -> Self {
        Self::LengthPrefixedCounters {
            fields: fields.into_iter().map(|(n, name)| CounterField::new(n, name)).collect(),
        }
    }

    pub fn decode(&self, encoded: &str) -> Result<BTreeMap<String, u32>, DecodeError> {
        let bytes = STANDARD
            .decode(encoded.trim())
            .map_err(|e| DecodeError::malformed(format!("invalid base64: {e}")))?;
        match self {
            Self::JsonDocument => decode_document(&bytes),
            Self::LengthPrefixedCounters { fields } => decode_counters(&bytes, fields),
        }
    }

    pub fn encode(&self, counters: &BTreeMap<String, u32>) -> Result<String, EncodeError> {
        let bytes = match self {
            Self::JsonDocument => {
                let doc = json!({ "consumable": { "duration": counters } });
                serde_json::to_vec(&doc).map_err(|e| EncodeError::new(e.to_string()))?
            }
            Self::LengthPrefixedCounters { fields } => encode_counters(counters, fields)?,
        };
        Ok(STANDARD.encode(bytes))
    }
}

fn decode_document(bytes: &[u8]) -> Result<BTreeMap<String, u32>, DecodeError> {
    let text = std::str::from_utf8(bytes)
        .map_err(|_| DecodeError::malformed("consumable document is not utf-8"))?;
    let doc: Value = match serde_json::from_str(text) {
        Ok(doc) => doc,
        Err(_) => serde_json::from_str(&literal_to_json(text))
            .map_err(|e| DecodeError::malformed(format!("consumable document: {e}")))?,
    };

    let duration = doc
        .get("consumable")
        .and_then(|c| c.get("duration"))
        .and_then(Value::as_object)
        .ok_or_else(|| DecodeError::malformed("missing consumable.duration"))?;

    duration
        .iter()
        .map(|(name, v)| {
            let hours = v
                .as_u64()
                .and_then(|h| u32::try_from(h).ok())
                .ok_or_else(|| DecodeError::malformed(format!("counter {name} is not a u32")))?;
            Ok((name.clone(), hours))
        })
        .collect()
}

/// Literal document (either quote style, `True`/`False`/`None`) to JSON.
/// Only string delimiters and bare words outside strings are rewritten.
fn literal_to_json(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            quote @ ('\'' | '"') => {
                out.push('"');
                while let Some(c) = chars.next() {
                    match c {
                        '\\' => match chars.next() {
                            Some('\'') => out.push('\''),
                            Some(escaped) => {
                                out.push('\\');
                                out.push(escaped);
                            }
                            None => {}
                        },
                        c if c == quote => break,
                        '"' => out.push_str("\\\""),
                        c => out.push(c),
                    }
                }
                out.push('"');
            }
            c if c.is_ascii_alphabetic() => {
                let mut word = String::from(c);
                while let Some(&next) = chars.peek() {
                    if !(next.is_ascii_alphanumeric() || next == '_') {
                        break;
                    }
                    word.push(next);
                    chars.next();
                }
                out.push_str(match word.as_str() {
                    "True" => "true",
                    "False" => "false",
                    "None" => "null",
                    other => other,
                });
            }
            c => out.push(c),
        }
    }
    out
}

fn decode_counters(
    bytes: &[u8],
    fields: &[CounterField],
) -> Result<BTreeMap<String, u32>, DecodeError> {
    let mut pos = 0;
    let declared = read_varint(bytes, &mut pos)
        .ok_or_else(|| DecodeError::malformed("missing length prefix"))?;
    let body = &bytes[pos..];
    if declared != body.len() as u64 {
        return Err(DecodeError::malformed(format!(
            "length prefix {declared} does not match {} payload bytes",
            body.len()
        )));
    }

    let mut counters = BTreeMap::new();
    let mut pos = 0;
    while pos < body.len() {
        let key = read_varint(body, &mut pos)
            .ok_or_else(|| DecodeError::malformed("truncated field key"))?;
        let (number, wire) = (key >> 3, key & 0x07);
        if wire != 0 {
            return Err(DecodeError::malformed(format!(
                "field {number} has wire type {wire}, expected varint"
            )));
        }
        let value = read_varint(body, &mut pos)
            .ok_or_else(|| DecodeError::malformed(format!("truncated value for field {number}")))?;
        let value = u32::try_from(value)
            .map_err(|_| DecodeError::malformed(format!("counter {number} overflows u32")))?;

        match fields.iter().find(|f| u64::from(f.number) == number) {
            Some(field) => {
                counters.insert(field.name.clone(), value);
            }
            None => tracing::debug!(field = number, value, "skipping unnamed consumable counter"),
        }
    }
    Ok(counters)
}

fn encode_counters(
    counters: &BTreeMap<String, u32>,
    fields: &[CounterField],
) -> Result<Vec<u8>, EncodeError> {
    let mut numbered = counters
        .iter()
        .map(|(name, value)| {
            fields
                .iter()
                .find(|f| &f.name == name)
                .map(|f| (f.number, *value))
                .ok_or_else(|| EncodeError::new(format!("no counter field named {name}")))
        })
        .collect::<Result<Vec<_>, _>>()?;
    numbered.sort_unstable_by_key(|(number, _)| *number);

    let mut body = Vec::new();
    for (number, value) in numbered {
        write_varint(&mut body, u64::from(number) << 3);
        write_varint(&mut body, u64::from(value));
    }

    let mut out = Vec::with_capacity(body.len() + 2);
    write_varint(&mut out, body.len() as u64);
    out.extend_from_slice(&body);
    Ok(out)
}

fn read_varint(bytes: &[u8], pos: &mut usize) -> Option<u64> {
    let mut value = 0u64;
    for shift in (0..64).step_by(7) {
        let byte = *bytes.get(*pos)?;
        *pos += 1;
        value |= u64::from(byte & 0x7f) << shift;
        if byte & 0x80 == 0 {
            return Some(value);
        }
    }
    None
}

fn write_varint(out: &mut Vec<u8>, mut value: u64) {
    loop {
        let byte = (value & 0x7f) as u8;
        value >>= 7;
        if value == 0 {
            out.push(byte);
            return;
        }
        out.push(byte | 0x80);
    }
}
