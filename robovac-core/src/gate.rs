//! Feature gate: the one place deciding what a model may be asked to do.
//!
//! Every command dispatch and every host-facing feature goes through here
//! before a code is looked up.

use crate::{
    error::Error,
    model::{HostFeatures, ModelDescriptor},
    vocab::{Command, DataPoint},
};

pub fn is_supported(descriptor: &ModelDescriptor, data_point: impl Into<DataPoint>) -> bool {
    descriptor.vacuum_features.contains(&data_point.into())
}

/// Whether every flag in `feature` is advertised to the host.
pub fn exposes(descriptor: &ModelDescriptor, feature: HostFeatures) -> bool {
    descriptor.home_assistant_features.contains(feature)
}

impl ModelDescriptor {
    pub fn ensure_command(&self, command: Command) -> Result<(), Error> {
        if is_supported(self, command) {
            Ok(())
        } else {
            tracing::debug!(model = %self.model_id, %command, "command rejected by feature gate");
            Err(Error::UnsupportedCommand { model: self.model_id.clone(), command })
        }
    }

    pub fn ensure_feature(&self, feature: HostFeatures) -> Result<(), Error> {
        if exposes(self, feature) {
            Ok(())
        } else {
            Err(Error::UnsupportedFeature { model: self.model_id.clone(), feature })
        }
    }
}
