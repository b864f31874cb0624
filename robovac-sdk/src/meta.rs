use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Number of leading characters of a device model string that identify the
/// model descriptor, e.g. `T2278` for `T2278A`.
pub const MODEL_PREFIX_LEN: usize = 5;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DeviceMeta {
    pub id: String,
    pub name: String,
    /// Full model string as reported by the device.
    pub model: String,
    pub sw_version: Option<String>,
    #[serde(default)]
    pub metadata: BTreeMap<String, serde_json::Value>,
}

impl DeviceMeta {
    pub fn new(id: impl Into<String>, name: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            model: model.into(),
            sw_version: None,
            metadata: BTreeMap::new(),
        }
    }

    pub fn with_sw_version(mut self, version: impl Into<String>) -> Self {
        self.sw_version = Some(version.into());
        self
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }

    /// Model id used for descriptor lookup. Shorter model strings are used
    /// as they are.
    pub fn model_prefix(&self) -> &str {
        model_prefix(&self.model)
    }
}

pub fn model_prefix(model: &str) -> &str {
    let model = model.trim();
    match model.char_indices().nth(MODEL_PREFIX_LEN) {
        Some((end, _)) => &model[..end],
        None => model,
    }
}
