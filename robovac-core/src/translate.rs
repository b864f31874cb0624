use serde::{Deserialize, Serialize};

use crate::{
    activity::Activity,
    dps::{DpsCode, Snapshot},
    error::{DecodeError, EncodeError, Error},
    registry::{self, Registry},
    value::{CommandRequest, DeviceState, LogicalValue},
    vocab::{Capability, DataPoint},
};

/// Something worth reporting about one entry of a snapshot. Issues never
/// stop the rest of the snapshot from decoding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecodeIssue {
    pub code: DpsCode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capability: Option<Capability>,
    pub kind: IssueKind,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "issue", content = "error", rename_all = "snake_case")]
pub enum IssueKind {
    /// The code maps to no supported capability of the model. Informational.
    UnknownDataPoint,
    Malformed(DecodeError),
}

impl DecodeIssue {
    pub fn is_error(&self) -> bool {
        matches!(self.kind, IssueKind::Malformed(_))
    }
}

/// Translates between raw snapshots and the logical view for the models of
/// one registry.
#[derive(Debug, Clone, Copy)]
pub struct Translator<'a> {
    registry: &'a Registry,
}

impl Translator<'static> {
    /// Translator over the process-wide registry.
    pub fn global() -> Result<Self, Error> {
        registry::global().map(Translator::new)
    }
}

impl<'a> Translator<'a> {
    pub fn new(registry: &'a Registry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &'a Registry {
        self.registry
    }

    /// Decode every entry of a snapshot independently.
    ///
    /// Entries that decode end up in the state, the others are reported as
    /// issues. Only an unknown model fails the call.
    pub fn snapshot_to_state(
        &self,
        model_id: &str,
        snapshot: &Snapshot,
    ) -> Result<(DeviceState, Vec<DecodeIssue>), Error> {
        let mapping = self.registry.resolve(model_id)?;
        let mut state = DeviceState::new();
        let mut issues = Vec::new();

        for (code, raw) in snapshot.iter() {
            let Some(capability) = mapping.capability_for(code.as_str()) else {
                tracing::debug!(model = model_id, %code, %raw, "ignoring unmapped data point");
                issues.push(DecodeIssue {
                    code: code.clone(),
                    capability: None,
                    kind: IssueKind::UnknownDataPoint,
                });
                continue;
            };
            if mapping.is_alternate(capability, code.as_str())
                && snapshot.contains(mapping.code(capability).as_str())
            {
                tracing::debug!(model = model_id, %code, %capability, "preferring resolved code");
                continue;
            }

            match mapping.codec(capability).decode(raw) {
                Ok(value) => {
                    if let LogicalValue::Unknown(raw) = &value {
                        tracing::warn!(model = model_id, %capability, %raw, "uncatalogued value");
                    }
                    state.insert(capability, value);
                }
                Err(e) => {
                    tracing::warn!(
                        model = model_id,
                        %code,
                        %capability,
                        error = %e,
                        "malformed data point"
                    );
                    issues.push(DecodeIssue {
                        code: code.clone(),
                        capability: Some(capability),
                        kind: IssueKind::Malformed(e),
                    });
                }
            }
        }

        Ok((state, issues))
    }

    /// Raw writes carrying out a command.
    ///
    /// The feature gate runs first, so a rejected command never produces a
    /// write. Commands without arguments use the codec's implicit argument.
    pub fn command_to_writes(
        &self,
        model_id: &str,
        request: &CommandRequest,
    ) -> Result<Snapshot, Error> {
        let mapping = self.registry.resolve(model_id)?;
        let descriptor = mapping.descriptor();
        descriptor.ensure_command(request.command)?;

        let data_point = DataPoint::Command(request.command);
        let codec = mapping.codec(data_point);
        let unsupported = |source: EncodeError| Error::UnsupportedValue {
            model: model_id.to_string(),
            data_point,
            source,
        };

        let value = request
            .args
            .clone()
            .or_else(|| codec.implicit_argument())
            .ok_or_else(|| unsupported(EncodeError::new("an argument is required")))?;
        if let LogicalValue::Unknown(raw) = &value {
            return Err(unsupported(EncodeError::new(format!("{raw} has no logical meaning"))));
        }
        let raw = codec.encode(&value).map_err(unsupported)?;

        let mut writes = Snapshot::new().with(mapping.code(data_point).clone(), raw);
        for link in descriptor.linked_writes_for(request.command) {
            writes.insert(mapping.code(link.also).clone(), link.value.clone());
        }

        tracing::debug!(
            model = model_id,
            command = %request.command,
            writes = writes.len(),
            "encoded command"
        );
        Ok(writes)
    }

    pub fn activity(&self, model_id: &str, state: &DeviceState) -> Result<Option<Activity>, Error> {
        Ok(self.registry.resolve(model_id)?.activity(state))
    }
}
