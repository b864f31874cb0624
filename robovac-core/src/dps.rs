use std::{
    borrow::Borrow,
    collections::BTreeMap,
    fmt::{self, Display, Formatter},
};

use serde::{Deserialize, Serialize};

/// Vendor-assigned data-point identifier. Devices put these on the wire as
/// strings holding a decimal number.
#[repr(transparent)]
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DpsCode(String);

impl DpsCode {
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// A non-empty run of ASCII digits.
    pub fn is_well_formed(&self) -> bool {
        !self.0.is_empty() && self.0.bytes().all(|b| b.is_ascii_digit())
    }
}

impl From<&str> for DpsCode {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for DpsCode {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<u32> for DpsCode {
    fn from(value: u32) -> Self {
        Self(value.to_string())
    }
}

impl Borrow<str> for DpsCode {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl PartialEq<&str> for DpsCode {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

impl Display for DpsCode {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One value as reported by, or written to, a device.
///
/// Packed records travel base64-encoded inside `Str`. Anything the protocol
/// does not normally carry (floats, nulls, nested JSON) lands in `Other` so a
/// single odd value never prevents the rest of a snapshot from parsing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    Bool(bool),
    Int(i64),
    Str(String),
    Other(serde_json::Value),
}

impl RawValue {
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Bool(_) => "boolean",
            Self::Int(_) => "integer",
            Self::Str(_) => "string",
            Self::Other(_) => "json",
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }
}

impl From<bool> for RawValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for RawValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<&str> for RawValue {
    fn from(value: &str) -> Self {
        Self::Str(value.to_string())
    }
}

impl From<String> for RawValue {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

impl Display for RawValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(i) => write!(f, "{i}"),
            Self::Str(s) => write!(f, "{s:?}"),
            Self::Other(v) => write!(f, "{v}"),
        }
    }
}

/// Data points reported by a device at one instant, or a batch of writes to
/// send to it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Snapshot(BTreeMap<DpsCode, RawValue>);

impl Snapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, code: impl Into<DpsCode>, value: impl Into<RawValue>) {
        self.0.insert(code.into(), value.into());
    }

    pub fn with(mut self, code: impl Into<DpsCode>, value: impl Into<RawValue>) -> Self {
        self.insert(code, value);
        self
    }

    pub fn get(&self, code: &str) -> Option<&RawValue> {
        self.0.get(code)
    }

    pub fn contains(&self, code: &str) -> bool {
        self.0.contains_key(code)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&DpsCode, &RawValue)> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_inner(self) -> BTreeMap<DpsCode, RawValue> {
        self.0
    }
}

impl FromIterator<(DpsCode, RawValue)> for Snapshot {
    fn from_iter<T: IntoIterator<Item = (DpsCode, RawValue)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for Snapshot {
    type Item = (DpsCode, RawValue);
    type IntoIter = std::collections::btree_map::IntoIter<DpsCode, RawValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}
