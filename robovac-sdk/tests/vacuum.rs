use std::sync::{Arc, Mutex};

use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use bytes::Bytes;
use robovac_core::{
    Registry,
    activity::Activity,
    bus::{Bus, BusExt, InMemoryBus},
    bus_contract::{
        CommandEnvelope, CommandOutcome, DeviceAnnounce, StateUpdate, TOPIC_DEVICE_ANNOUNCE,
        command_result_topic, command_topic, state_topic,
    },
    dps::Snapshot,
    model::HostFeatures,
    value::{CommandRequest, LogicalValue},
    vocab::{Capability, Command},
};
use robovac_sdk::{DeviceMeta, DpsTransport, VacuumComponent, meta::model_prefix};
use serde_json::json;
use tokio::time::{Duration, timeout};
use tokio_stream::StreamExt;
use uuid::Uuid;

#[derive(Default)]
struct MockTransport {
    reports: Mutex<Vec<Snapshot>>,
    sent: Mutex<Vec<Snapshot>>,
}

impl MockTransport {
    fn reporting(snapshots: impl IntoIterator<Item = serde_json::Value>) -> Self {
        let reports = snapshots.into_iter().map(|v| serde_json::from_value(v).unwrap()).collect();
        Self { reports: Mutex::new(reports), sent: Mutex::new(Vec::new()) }
    }

    fn sent(&self) -> Vec<Snapshot> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl DpsTransport for MockTransport {
    async fn fetch(&self) -> Result<Snapshot> {
        let mut reports = self.reports.lock().unwrap();
        if reports.is_empty() {
            return Err(anyhow!("device offline"));
        }
        Ok(reports.remove(0))
    }

    async fn send(&self, writes: Snapshot) -> Result<()> {
        self.sent.lock().unwrap().push(writes);
        Ok(())
    }
}

fn component(
    bus: Arc<dyn Bus>,
    model: &str,
    transport: Arc<MockTransport>,
) -> Result<VacuumComponent> {
    let registry = Arc::new(Registry::builtin()?);
    let device =
        DeviceMeta::new(Uuid::new_v4().to_string(), "Hallway", model).with_sw_version("1.2.0");
    VacuumComponent::new(bus, device, registry, transport)
}

#[test]
fn model_prefix_is_first_five_characters() {
    assert_eq!(model_prefix("T2278A"), "T2278");
    assert_eq!(model_prefix(" T2080 "), "T2080");
    assert_eq!(model_prefix("T20"), "T20");
    assert_eq!(DeviceMeta::new("d", "n", "T2320ABC").model_prefix(), "T2320");
}

#[test]
fn unknown_model_is_refused_up_front() {
    let bus: Arc<dyn Bus> = Arc::new(InMemoryBus::default());
    let err = component(bus, "X9999", Arc::new(MockTransport::default())).err().unwrap();
    assert!(format!("{err:#}").contains("X9999"));
}

#[tokio::test]
async fn announces_model_features_and_fan_speeds() -> Result<()> {
    let bus_impl = Arc::new(InMemoryBus::default());
    let bus: Arc<dyn Bus> = bus_impl.clone();
    let mut announces = bus_impl.subscribe(TOPIC_DEVICE_ANNOUNCE).await?;

    component(bus, "T2320A", Arc::new(MockTransport::default()))?.spawn().await?;

    let announce: DeviceAnnounce = timeout(Duration::from_millis(200), announces.next())
        .await
        .context("announce timed out")?
        .context("announce channel closed")?
        .decode()?;
    assert_eq!(announce.model_id, "T2320");
    assert_eq!(announce.model_name, "eufy X9 Pro");
    assert!(announce.features.contains(HostFeatures::FAN_SPEED | HostFeatures::LOCATE));
    assert!(!announce.features.contains(HostFeatures::CLEAN_SPOT));
    assert_eq!(announce.fan_speeds, vec!["Standard", "Boost IQ", "Max", "Quiet"]);
    assert_eq!(announce.sw_version.as_deref(), Some("1.2.0"));
    Ok(())
}

#[tokio::test]
async fn poll_publishes_decoded_state() -> Result<()> {
    let bus_impl = Arc::new(InMemoryBus::default());
    let bus: Arc<dyn Bus> = bus_impl.clone();
    let transport = Arc::new(MockTransport::reporting([
        json!({ "153": "BBADGgA=", "163": 98, "106": 0 }),
        json!({ "163": 97, "106": 2, "777": true }),
    ]));
    let vacuum = component(bus, "T2080A", transport)?;
    let mut states = bus_impl.subscribe(&state_topic(&vacuum.device().id)).await?;

    let first = vacuum.poll().await?;
    assert_eq!(first.activity, Some(Activity::Docked));
    assert_eq!(first.state.battery_level(), Some(98));
    assert_eq!(first.error_message, None);

    let published: StateUpdate = timeout(Duration::from_millis(200), states.next())
        .await
        .context("state update timed out")?
        .context("state channel closed")?
        .decode()?;
    assert_eq!(published, first);

    // status persists from the previous snapshot, the new fault wins
    let second = vacuum.poll().await?;
    assert_eq!(second.state.status().as_deref(), Some("Charging"));
    assert_eq!(second.state.battery_level(), Some(97));
    assert_eq!(second.activity, Some(Activity::Error));
    assert_eq!(second.error_message.as_deref(), Some("Wheel stuck"));
    assert_eq!(second.issues.len(), 1);
    assert_eq!(vacuum.state(), second.state);

    let err = vacuum.poll().await.unwrap_err();
    assert!(format!("{err:#}").contains("device offline"));
    Ok(())
}

#[tokio::test]
async fn ingest_keeps_good_entries_of_a_bad_snapshot() -> Result<()> {
    let bus: Arc<dyn Bus> = Arc::new(InMemoryBus::default());
    let vacuum = component(bus, "T2193", Arc::new(MockTransport::default()))?;

    let snapshot = serde_json::from_value(json!({ "104": 50, "15": "Running", "107": "maybe" }))?;
    let update = vacuum.ingest(&snapshot).await?;

    assert_eq!(update.state.len(), 2);
    assert_eq!(update.state.get(Capability::Status), Some(&LogicalValue::Text("Running".into())));
    assert_eq!(update.issues.len(), 1);
    assert_eq!(update.activity, Some(Activity::Cleaning));
    Ok(())
}

#[tokio::test]
async fn execute_sends_translated_writes() -> Result<()> {
    let bus: Arc<dyn Bus> = Arc::new(InMemoryBus::default());
    let transport = Arc::new(MockTransport::default());
    let vacuum = component(bus, "T2278", transport.clone())?;

    let writes = vacuum.execute(&CommandRequest::new(Command::ReturnHome)).await?;
    assert_eq!(writes, Snapshot::new().with("153", "AggB"));

    let err = vacuum.execute(&CommandRequest::new(Command::CleanSpot)).await.unwrap_err();
    assert!(matches!(
        err.downcast_ref::<robovac_core::Error>(),
        Some(robovac_core::Error::UnsupportedCommand { command: Command::CleanSpot, .. })
    ));

    assert_eq!(transport.sent(), vec![writes]);
    Ok(())
}

#[tokio::test]
async fn bus_commands_are_answered_with_outcomes() -> Result<()> {
    let bus_impl = Arc::new(InMemoryBus::default());
    let bus: Arc<dyn Bus> = bus_impl.clone();
    let transport = Arc::new(MockTransport::default());
    let vacuum = component(bus, "T2193", transport.clone())?;
    let device_id = vacuum.device().id.clone();

    let mut outcomes = bus_impl.subscribe(&command_result_topic(&device_id)).await?;
    vacuum.spawn().await?;

    let envelope = CommandEnvelope::new(CommandRequest::with_args(Command::SetFanSpeed, "turbo"));
    bus_impl.publish_json(&command_topic(&device_id), &envelope).await?;

    let outcome: CommandOutcome = timeout(Duration::from_millis(200), outcomes.next())
        .await
        .context("outcome timed out")?
        .context("outcome channel closed")?
        .decode()?;
    assert!(outcome.is_ok());
    assert_eq!(outcome.correlation_id, envelope.correlation_id);
    assert_eq!(outcome.writes, Some(Snapshot::new().with("102", "Turbo")));

    // garbage is skipped, the loop keeps running
    bus_impl.publish(&command_topic(&device_id), Bytes::from_static(b"not json")).await?;

    let rejected =
        CommandEnvelope::new(CommandRequest::with_args(Command::SetFanSpeed, "hurricane"));
    bus_impl.publish_json(&command_topic(&device_id), &rejected).await?;
    let outcome: CommandOutcome = timeout(Duration::from_millis(200), outcomes.next())
        .await
        .context("outcome timed out")?
        .context("outcome channel closed")?
        .decode()?;
    assert!(!outcome.is_ok());
    assert_eq!(outcome.correlation_id, rejected.correlation_id);

    assert_eq!(transport.sent().len(), 1);
    Ok(())
}

#[tokio::test]
async fn polling_task_publishes_until_aborted() -> Result<()> {
    let bus_impl = Arc::new(InMemoryBus::default());
    let bus: Arc<dyn Bus> = bus_impl.clone();
    let transport =
        Arc::new(MockTransport::reporting([json!({ "104": 10 }), json!({ "104": 11 })]));
    let vacuum = component(bus, "T2193", transport)?;
    let mut states = bus_impl.subscribe("robovac.state.*").await?;

    let handle = vacuum.spawn_polling(Duration::from_millis(10));
    for expected in [10, 11] {
        let update: StateUpdate = timeout(Duration::from_millis(500), states.next())
            .await
            .context("state update timed out")?
            .context("state channel closed")?
            .decode()?;
        assert_eq!(update.state.battery_level(), Some(expected));
    }
    handle.abort();
    Ok(())
}
