use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::{
    activity::Activity,
    codec::Codec,
    dps::{DpsCode, RawValue},
    vocab::{Capability, Command, DataPoint},
};

bitflags::bitflags! {
    /// Vacuum features advertised to the home-automation host.
    #[derive(serde::Serialize, serde::Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct HostFeatures: u32 {
        const BATTERY      = 0b0000_0000_0001;
        const CLEAN_SPOT   = 0b0000_0000_0010;
        const FAN_SPEED    = 0b0000_0000_0100;
        const LOCATE       = 0b0000_0000_1000;
        const PAUSE        = 0b0000_0001_0000;
        const RETURN_HOME  = 0b0000_0010_0000;
        const SEND_COMMAND = 0b0000_0100_0000;
        const START        = 0b0000_1000_0000;
        const STATE        = 0b0001_0000_0000;
        const STOP         = 0b0010_0000_0000;
        const MAP          = 0b0100_0000_0000;
    }
}

/// For each host feature, the data points of which at least one must be
/// supported. Features missing here need no data point.
const BACKING: &[(HostFeatures, &[DataPoint])] = &[
    (HostFeatures::BATTERY, &[DataPoint::Capability(Capability::BatteryLevel)]),
    (HostFeatures::CLEAN_SPOT, &[DataPoint::Command(Command::CleanSpot)]),
    (HostFeatures::FAN_SPEED, &[DataPoint::Command(Command::SetFanSpeed)]),
    (HostFeatures::LOCATE, &[DataPoint::Command(Command::Locate)]),
    (HostFeatures::PAUSE, &[DataPoint::Command(Command::StartPause)]),
    (HostFeatures::RETURN_HOME, &[DataPoint::Command(Command::ReturnHome)]),
    (
        HostFeatures::START,
        &[DataPoint::Command(Command::StartPause), DataPoint::Command(Command::SetWorkMode)],
    ),
    (HostFeatures::STATE, &[DataPoint::Capability(Capability::Status)]),
    (
        HostFeatures::STOP,
        &[DataPoint::Command(Command::Stop), DataPoint::Command(Command::ReturnHome)],
    ),
];

impl HostFeatures {
    /// Data points backing a single feature flag.
    pub fn backing(self) -> &'static [DataPoint] {
        BACKING.iter().find(|(flag, _)| *flag == self).map(|(_, dps)| *dps).unwrap_or(&[])
    }
}

/// A second write sent together with a command, e.g. a model that needs an
/// explicit start after switching into spot mode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkedWrite {
    pub command: Command,
    pub also: DataPoint,
    pub value: RawValue,
}

/// Everything that distinguishes one vacuum model from the default
/// convention. Descriptors are plain values; adding a model means adding a
/// descriptor to the table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelDescriptor {
    pub model_id: String,
    #[serde(default)]
    pub name: String,
    pub home_assistant_features: HostFeatures,
    pub vacuum_features: BTreeSet<DataPoint>,
    #[serde(default)]
    pub dps_overrides: BTreeMap<DataPoint, DpsCode>,
    #[serde(default)]
    pub codec_overrides: BTreeMap<DataPoint, Codec>,
    /// Further codes a capability may be reported on. The resolved code is
    /// preferred when a snapshot carries both.
    #[serde(default)]
    pub alternate_codes: BTreeMap<Capability, Vec<DpsCode>>,
    #[serde(default)]
    pub activity_mapping: BTreeMap<String, Activity>,
    #[serde(default)]
    pub linked_writes: Vec<LinkedWrite>,
}

impl ModelDescriptor {
    pub fn new(model_id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            model_id: model_id.into(),
            name: name.into(),
            home_assistant_features: HostFeatures::empty(),
            vacuum_features: BTreeSet::new(),
            dps_overrides: BTreeMap::new(),
            codec_overrides: BTreeMap::new(),
            alternate_codes: BTreeMap::new(),
            activity_mapping: BTreeMap::new(),
            linked_writes: Vec::new(),
        }
    }

    pub fn with_features(mut self, features: HostFeatures) -> Self {
        self.home_assistant_features = features;
        self
    }

    pub fn with_capabilities(mut self, capabilities: impl IntoIterator<Item = Capability>) -> Self {
        self.vacuum_features.extend(capabilities.into_iter().map(DataPoint::Capability));
        self
    }

    pub fn with_commands(mut self, commands: impl IntoIterator<Item = Command>) -> Self {
        self.vacuum_features.extend(commands.into_iter().map(DataPoint::Command));
        self
    }

    pub fn with_code(mut self, data_point: impl Into<DataPoint>, code: impl Into<DpsCode>) -> Self {
        self.dps_overrides.insert(data_point.into(), code.into());
        self
    }

    pub fn with_codec(mut self, data_point: impl Into<DataPoint>, codec: Codec) -> Self {
        self.codec_overrides.insert(data_point.into(), codec);
        self
    }

    pub fn with_alternate_codes<C>(
        mut self,
        capability: Capability,
        codes: impl IntoIterator<Item = C>,
    ) -> Self
    where
        C: Into<DpsCode>,
    {
        let codes = codes.into_iter().map(Into::into);
        self.alternate_codes.entry(capability).or_default().extend(codes);
        self
    }

    pub fn with_activity(
        mut self,
        entries: impl IntoIterator<Item = (&'static str, Activity)>,
    ) -> Self {
        self.activity_mapping.extend(entries.into_iter().map(|(s, a)| (s.to_string(), a)));
        self
    }

    pub fn with_linked_write(
        mut self,
        command: Command,
        also: impl Into<DataPoint>,
        value: impl Into<RawValue>,
    ) -> Self {
        self.linked_writes.push(LinkedWrite { command, also: also.into(), value: value.into() });
        self
    }

    pub fn linked_writes_for(&self, command: Command) -> impl Iterator<Item = &LinkedWrite> {
        self.linked_writes.iter().filter(move |w| w.command == command)
    }
}
