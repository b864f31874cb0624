use std::{
    collections::BTreeMap,
    ops::Index,
    sync::Arc,
};

use crate::{
    activity::Activity,
    codec::Codec,
    defaults::default_mapping,
    dps::DpsCode,
    error::Error,
    model::ModelDescriptor,
    value::DeviceState,
    vocab::{Capability, DataPoint},
};

/// Effective mapping of one model: the defaults with the model's overrides
/// applied. Total over the vocabulary; only the descriptor's
/// `vacuum_features` are supported.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedMapping {
    descriptor: Arc<ModelDescriptor>,
    codes: BTreeMap<DataPoint, DpsCode>,
    codecs: BTreeMap<DataPoint, Codec>,
    by_code: BTreeMap<DpsCode, Capability>,
}

impl ResolvedMapping {
    /// Layer the descriptor over the default mapping.
    ///
    /// Fails when two supported capabilities end up on the same code, since
    /// the reverse lookup would be ambiguous.
    pub fn build(descriptor: Arc<ModelDescriptor>) -> Result<Self, Error> {
        let defaults = default_mapping();

        let mut codes = defaults.codes().clone();
        codes.extend(descriptor.dps_overrides.iter().map(|(dp, code)| (*dp, code.clone())));

        let mut codecs = defaults.codecs().clone();
        codecs.extend(descriptor.codec_overrides.iter().map(|(dp, codec)| (*dp, codec.clone())));

        let mut by_code = BTreeMap::new();
        for dp in &descriptor.vacuum_features {
            let Some(capability) = dp.as_capability() else { continue };
            let alternates = descriptor.alternate_codes.get(&capability).into_iter().flatten();
            for code in std::iter::once(&codes[dp]).chain(alternates) {
                if let Some(other) = by_code.insert(code.clone(), capability) {
                    return Err(Error::invalid(
                        &descriptor.model_id,
                        format!("{other} and {capability} both resolve to code {code}"),
                    ));
                }
            }
        }

        Ok(Self { descriptor, codes, codecs, by_code })
    }

    pub fn model_id(&self) -> &str {
        &self.descriptor.model_id
    }

    pub fn descriptor(&self) -> &ModelDescriptor {
        &self.descriptor
    }

    pub fn code(&self, data_point: impl Into<DataPoint>) -> &DpsCode {
        &self.codes[&data_point.into()]
    }

    pub fn codec(&self, data_point: impl Into<DataPoint>) -> &Codec {
        &self.codecs[&data_point.into()]
    }

    /// Code lookup by vocabulary name; `None` for names outside it.
    pub fn get(&self, name: &str) -> Option<&DpsCode> {
        name.parse::<DataPoint>().ok().map(|dp| &self.codes[&dp])
    }

    pub fn codes(&self) -> impl Iterator<Item = (DataPoint, &DpsCode)> {
        self.codes.iter().map(|(dp, code)| (*dp, code))
    }

    pub fn is_supported(&self, data_point: impl Into<DataPoint>) -> bool {
        self.descriptor.vacuum_features.contains(&data_point.into())
    }

    /// Supported capability reported on `code`, if any. Alternate codes
    /// count.
    pub fn capability_for(&self, code: &str) -> Option<Capability> {
        self.by_code.get(code).copied()
    }

    /// True when `code` is an alternate code of `capability` rather than its
    /// resolved one.
    pub fn is_alternate(&self, capability: Capability, code: &str) -> bool {
        self.code(capability).as_str() != code && self.by_code.get(code) == Some(&capability)
    }

    /// Names accepted by an enum data point, e.g. the fan speeds a host may
    /// offer. Empty for unsupported or non-enum data points.
    pub fn choices(&self, data_point: impl Into<DataPoint>) -> Vec<&str> {
        let data_point = data_point.into();
        if !self.is_supported(data_point) {
            return Vec::new();
        }
        self.codecs[&data_point].choices()
    }

    pub fn activity(&self, state: &DeviceState) -> Option<Activity> {
        Activity::derive(state, &self.descriptor.activity_mapping)
    }
}

impl Index<DataPoint> for ResolvedMapping {
    type Output = DpsCode;

    fn index(&self, data_point: DataPoint) -> &DpsCode {
        &self.codes[&data_point]
    }
}
