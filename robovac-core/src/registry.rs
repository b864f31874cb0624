use std::{
    collections::{BTreeMap, HashMap},
    sync::{Arc, OnceLock, PoisonError, RwLock},
};

use crate::{
    error::Error,
    model::ModelDescriptor,
    models,
    resolve::ResolvedMapping,
    vocab::DataPoint,
};

/// Model descriptors by id, plus the resolved mapping of every model that
/// has been resolved so far.
///
/// Registration takes `&mut self` and therefore happens before the registry
/// is shared. Afterwards only the mapping cache changes.
#[derive(Debug, Default)]
pub struct Registry {
    models: BTreeMap<String, Arc<ModelDescriptor>>,
    cache: RwLock<HashMap<String, Arc<ResolvedMapping>>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding every compiled-in model.
    pub fn builtin() -> Result<Self, Error> {
        let mut registry = Self::new();
        for descriptor in models::builtin() {
            registry.register(descriptor)?;
        }
        Ok(registry)
    }

    /// Compiled-in models plus the descriptors of a JSON array.
    pub fn with_descriptors_json(json: &str) -> Result<Self, Error> {
        let mut registry = Self::builtin()?;
        for descriptor in parse_descriptors(json)? {
            registry.register(descriptor)?;
        }
        Ok(registry)
    }

    pub fn register(&mut self, descriptor: ModelDescriptor) -> Result<(), Error> {
        if self.models.contains_key(&descriptor.model_id) {
            return Err(Error::DuplicateModel(descriptor.model_id));
        }
        let descriptor = Arc::new(descriptor);
        validate(&descriptor)?;

        tracing::debug!(model = %descriptor.model_id, name = %descriptor.name, "registered model");
        self.models.insert(descriptor.model_id.clone(), descriptor);
        Ok(())
    }

    pub fn lookup(&self, model_id: &str) -> Result<&ModelDescriptor, Error> {
        self.models
            .get(model_id)
            .map(Arc::as_ref)
            .ok_or_else(|| Error::UnknownModel(model_id.to_string()))
    }

    /// Resolved mapping of a model, built on first request.
    ///
    /// Concurrent first requests may both build; the first one stored wins and
    /// every caller gets that same instance.
    pub fn resolve(&self, model_id: &str) -> Result<Arc<ResolvedMapping>, Error> {
        {
            let cache = self.cache.read().unwrap_or_else(PoisonError::into_inner);
            if let Some(mapping) = cache.get(model_id) {
                return Ok(mapping.clone());
            }
        }

        let descriptor = self
            .models
            .get(model_id)
            .ok_or_else(|| Error::UnknownModel(model_id.to_string()))?;
        let built = Arc::new(ResolvedMapping::build(descriptor.clone())?);

        let mut cache = self.cache.write().unwrap_or_else(PoisonError::into_inner);
        if let Some(mapping) = cache.get(model_id) {
            return Ok(mapping.clone());
        }
        tracing::debug!(model = model_id, "caching resolved mapping");
        cache.insert(model_id.to_string(), built.clone());
        Ok(built)
    }

    pub fn contains(&self, model_id: &str) -> bool {
        self.models.contains_key(model_id)
    }

    pub fn model_ids(&self) -> impl Iterator<Item = &str> {
        self.models.keys().map(String::as_str)
    }

    pub fn descriptors(&self) -> impl Iterator<Item = &ModelDescriptor> {
        self.models.values().map(Arc::as_ref)
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }
}

/// The process-wide registry of compiled-in models, built once on first use.
pub fn global() -> Result<&'static Registry, Error> {
    static GLOBAL: OnceLock<Result<Registry, Error>> = OnceLock::new();
    GLOBAL.get_or_init(Registry::builtin).as_ref().map_err(Clone::clone)
}

fn parse_descriptors(json: &str) -> Result<Vec<ModelDescriptor>, Error> {
    let entries: Vec<serde_json::Value> = serde_json::from_str(json)
        .map_err(|e| Error::invalid("<descriptors>", format!("expected a JSON array: {e}")))?;

    entries
        .into_iter()
        .enumerate()
        .map(|(i, entry)| {
            let model = entry
                .get("model_id")
                .and_then(serde_json::Value::as_str)
                .map_or_else(|| format!("<entry {i}>"), str::to_string);
            serde_json::from_value(entry).map_err(|e| Error::invalid(&model, e.to_string()))
        })
        .collect()
}

fn validate(descriptor: &Arc<ModelDescriptor>) -> Result<(), Error> {
    let model = descriptor.model_id.as_str();
    if model.trim().is_empty() {
        return Err(Error::invalid(model, "model id is empty"));
    }

    for (dp, code) in &descriptor.dps_overrides {
        if !code.is_well_formed() {
            return Err(Error::invalid(model, format!("{dp} override {code:?} is not a DPS code")));
        }
    }

    for (dp, codec) in &descriptor.codec_overrides {
        if !dp.accepts(codec.kind()) {
            return Err(Error::invalid(
                model,
                format!("{dp} cannot carry {:?} values", codec.kind()),
            ));
        }
        codec.check().map_err(|reason| Error::invalid(model, format!("{dp} codec: {reason}")))?;
    }

    for (capability, codes) in &descriptor.alternate_codes {
        if !descriptor.vacuum_features.contains(&DataPoint::Capability(*capability)) {
            return Err(Error::invalid(
                model,
                format!("alternate codes given for unsupported {capability}"),
            ));
        }
        if let Some(code) = codes.iter().find(|code| !code.is_well_formed()) {
            return Err(Error::invalid(
                model,
                format!("{capability} alternate {code:?} is not a DPS code"),
            ));
        }
    }

    let mapping = ResolvedMapping::build(descriptor.clone())?;

    for link in &descriptor.linked_writes {
        for dp in [DataPoint::Command(link.command), link.also] {
            if !descriptor.vacuum_features.contains(&dp) {
                return Err(Error::invalid(
                    model,
                    format!("linked write references unsupported {dp}"),
                ));
            }
        }
        if let Err(e) = mapping.codec(link.also).decode(&link.value) {
            return Err(Error::invalid(
                model,
                format!("linked write of {} to {}: {e}", link.command, link.also),
            ));
        }
    }

    // every write of one command needs its own code
    for command in descriptor.linked_writes.iter().map(|link| link.command) {
        let mut codes = BTreeMap::from([(mapping.code(command), DataPoint::Command(command))]);
        for link in descriptor.linked_writes_for(command) {
            let (also, code) = (link.also, mapping.code(link.also));
            if let Some(other) = codes.insert(code, also) {
                return Err(Error::invalid(
                    model,
                    format!("{command} writes {other} and {also} to code {code}"),
                ));
            }
        }
    }

    for feature in descriptor.home_assistant_features.iter() {
        let backing = feature.backing();
        let backed = backing.iter().any(|dp| descriptor.vacuum_features.contains(dp));
        if !backing.is_empty() && !backed {
            return Err(Error::invalid(
                model,
                format!("host feature {feature:?} needs one of {backing:?}"),
            ));
        }
    }

    Ok(())
}
