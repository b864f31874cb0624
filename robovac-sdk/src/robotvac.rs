use std::{
    sync::{Arc, Mutex, PoisonError},
    time::Duration,
};

use anyhow::{Context, Result};
use chrono::Utc;
use robovac_core::{
    Registry, Translator,
    bus::{Bus, BusExt},
    bus_contract::{
        CommandEnvelope, CommandOutcome, DeviceAnnounce, StateUpdate, TOPIC_DEVICE_ANNOUNCE,
        command_result_topic, command_topic, state_topic,
    },
    dps::Snapshot,
    faults,
    value::{CommandRequest, DeviceState},
    vocab::{Capability, Command},
};
use tokio::task::JoinHandle;
use tokio_stream::StreamExt;

use crate::{meta::DeviceMeta, transport::DpsTransport};

/// One vacuum on the bus: decodes what the transport reports into state
/// updates and turns bus commands into transport writes.
#[derive(Clone)]
pub struct VacuumComponent {
    bus: Arc<dyn Bus>,
    device: DeviceMeta,
    model_id: String,
    registry: Arc<Registry>,
    transport: Arc<dyn DpsTransport>,
    last_state: Arc<Mutex<DeviceState>>,
}

impl VacuumComponent {
    /// Fails when the registry has no descriptor for the device's model
    /// prefix.
    pub fn new(
        bus: Arc<dyn Bus>,
        device: DeviceMeta,
        registry: Arc<Registry>,
        transport: Arc<dyn DpsTransport>,
    ) -> Result<Self> {
        let model_id = device.model_prefix().to_string();
        registry
            .lookup(&model_id)
            .with_context(|| format!("device {} reports model {:?}", device.id, device.model))?;

        Ok(Self {
            bus,
            device,
            model_id,
            registry,
            transport,
            last_state: Arc::new(Mutex::new(DeviceState::new())),
        })
    }

    pub fn model_id(&self) -> &str {
        &self.model_id
    }

    pub fn device(&self) -> &DeviceMeta {
        &self.device
    }

    /// Last known value of every capability seen so far.
    pub fn state(&self) -> DeviceState {
        self.last_state.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    fn translator(&self) -> Translator<'_> {
        Translator::new(&self.registry)
    }

    /// Announce the device and start answering commands.
    pub async fn spawn(self) -> Result<()> {
        self.announce_device().await?;

        let mut stream = self.bus.subscribe(&command_topic(&self.device.id)).await?;
        let this = self.clone();

        tokio::spawn(async move {
            while let Some(msg) = stream.next().await {
                let envelope = match msg.decode::<CommandEnvelope>() {
                    Ok(envelope) => envelope,
                    Err(err) => {
                        tracing::warn!(
                            device = %this.device.id,
                            "dropping undecodable command: {err:#}"
                        );
                        continue;
                    }
                };
                let outcome = match this.execute(&envelope.request).await {
                    Ok(writes) => CommandOutcome::sent(envelope.correlation_id, writes),
                    Err(err) => {
                        tracing::warn!(
                            device = %this.device.id,
                            command = %envelope.request.command,
                            "command failed: {err:#}"
                        );
                        CommandOutcome::failed(envelope.correlation_id, format!("{err:#}"))
                    }
                };
                let topic = command_result_topic(&this.device.id);
                if let Err(err) = this.bus.publish_json(&topic, &outcome).await {
                    tracing::warn!(
                        device = %this.device.id,
                        "publishing command outcome failed: {err}"
                    );
                }
            }
        });
        Ok(())
    }

    /// Poll the transport every `period` until the task is aborted. Poll
    /// errors are logged and the next tick tries again.
    pub fn spawn_polling(&self, period: Duration) -> JoinHandle<()> {
        let this = self.clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            loop {
                ticker.tick().await;
                if let Err(err) = this.poll().await {
                    tracing::warn!(device = %this.device.id, "poll failed: {err:#}");
                }
            }
        })
    }

    /// Fetch a snapshot from the transport and publish it.
    pub async fn poll(&self) -> Result<StateUpdate> {
        let snapshot = self.transport.fetch().await.context("fetching data points")?;
        self.ingest(&snapshot).await
    }

    /// Decode a snapshot pushed by the device, fold it into the last known
    /// state and publish the result.
    pub async fn ingest(&self, snapshot: &Snapshot) -> Result<StateUpdate> {
        let (decoded, issues) = self.translator().snapshot_to_state(&self.model_id, snapshot)?;

        let state = {
            let mut last = self.last_state.lock().unwrap_or_else(PoisonError::into_inner);
            *last = decoded.merged_over(&last);
            last.clone()
        };

        let error_message = state
            .get(Capability::ErrorCode)
            .filter(|code| faults::is_fault(code))
            .and_then(faults::message)
            .map(str::to_string);

        let update = StateUpdate {
            device_id: self.device.id.clone(),
            activity: self.translator().activity(&self.model_id, &state)?,
            state,
            error_message,
            issues,
            ts: Utc::now(),
        };
        self.bus
            .publish_json(&state_topic(&self.device.id), &update)
            .await
            .context("publish state update")?;
        Ok(update)
    }

    /// Translate a command and hand the writes to the transport.
    pub async fn execute(&self, request: &CommandRequest) -> Result<Snapshot> {
        let writes = self.translator().command_to_writes(&self.model_id, request)?;
        tracing::debug!(
            device = %self.device.id,
            command = %request.command,
            ?writes,
            "sending writes"
        );
        self.transport.send(writes.clone()).await.context("sending writes")?;
        Ok(writes)
    }

    async fn announce_device(&self) -> Result<()> {
        let mapping = self.registry.resolve(&self.model_id)?;
        let descriptor = mapping.descriptor();
        let message = DeviceAnnounce {
            device_id: self.device.id.clone(),
            name: self.device.name.clone(),
            model_id: self.model_id.clone(),
            model_name: descriptor.name.clone(),
            features: descriptor.home_assistant_features,
            fan_speeds: mapping
                .choices(Command::SetFanSpeed)
                .into_iter()
                .map(str::to_string)
                .collect(),
            sw_version: self.device.sw_version.clone(),
        };
        self.bus
            .publish_json(TOPIC_DEVICE_ANNOUNCE, &message)
            .await
            .context("publish device announce")
    }
}
