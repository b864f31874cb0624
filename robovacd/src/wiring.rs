use std::sync::Arc;

use anyhow::{Context, Result};
use robovac_core::{
    Registry,
    bus::{Bus, InMemoryBus},
};
use robovac_sdk::{DeviceMeta, VacuumComponent};

use crate::{config::Config, replay::ReplayTransport, state::AppState};

/// Built-in models plus the descriptors file, if any. A bad file is fatal.
pub fn build_registry(cfg: &Config) -> Result<Registry> {
    let Some(path) = cfg.models_file.as_ref() else {
        return Ok(Registry::builtin()?);
    };
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("reading model descriptors from {}", path.display()))?;
    let registry = Registry::with_descriptors_json(&json)
        .with_context(|| format!("loading model descriptors from {}", path.display()))?;
    Ok(registry)
}

pub async fn build_state(cfg: &Config) -> Result<AppState> {
    let Some(model) = cfg.model.as_ref() else {
        anyhow::bail!("ROBOVAC_MODEL is required");
    };

    let registry = Arc::new(build_registry(cfg)?);
    tracing::info!(models = ?registry.model_ids().collect::<Vec<_>>(), "model registry ready");

    let bus: Arc<dyn Bus> = Arc::new(InMemoryBus::default());
    let transport = Arc::new(ReplayTransport::default());
    let device = DeviceMeta::new(&cfg.device_id, &cfg.device_name, model);
    let vacuum = VacuumComponent::new(bus.clone(), device, registry.clone(), transport.clone())?;

    Ok(AppState { registry, bus, vacuum, transport })
}
