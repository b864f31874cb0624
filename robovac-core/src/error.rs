use serde::{Deserialize, Serialize};

use crate::{
    dps::RawValue,
    model::HostFeatures,
    vocab::{Command, DataPoint},
};

/// Errors raised by registration, resolution and command dispatch.
///
/// Registration errors (`DuplicateModel`, `InvalidDescriptor`) are fatal at
/// startup. Dispatch errors are always returned to the caller.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    #[error("model {0} is not supported")]
    UnknownModel(String),
    #[error("model {0} is already registered")]
    DuplicateModel(String),
    #[error("invalid descriptor for model {model}: {reason}")]
    InvalidDescriptor { model: String, reason: String },
    #[error("command {command} is not supported by model {model}")]
    UnsupportedCommand { model: String, command: Command },
    #[error("feature {feature:?} is not exposed by model {model}")]
    UnsupportedFeature { model: String, feature: HostFeatures },
    #[error("{data_point} on model {model} cannot carry this value: {source}")]
    UnsupportedValue {
        model: String,
        data_point: DataPoint,
        #[source]
        source: EncodeError,
    },
}

impl Error {
    pub(crate) fn invalid(model: &str, reason: impl Into<String>) -> Self {
        Self::InvalidDescriptor { model: model.to_string(), reason: reason.into() }
    }
}

/// Failure to decode one raw data-point value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, thiserror::Error)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DecodeError {
    #[error("expected {expected}, found {found}")]
    UnexpectedType { expected: String, found: RawValue },
    #[error("non-canonical value {value}")]
    NonCanonical { value: RawValue },
    #[error("malformed payload: {reason}")]
    MalformedPayload { reason: String },
}

impl DecodeError {
    pub(crate) fn unexpected(expected: &str, found: &RawValue) -> Self {
        Self::UnexpectedType { expected: expected.to_string(), found: found.clone() }
    }

    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedPayload { reason: reason.into() }
    }
}

/// A logical value that has no raw representation for a data point.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct EncodeError(pub String);

impl EncodeError {
    pub(crate) fn new(reason: impl Into<String>) -> Self {
        Self(reason.into())
    }
}
