use robovac_core::bus_contract::{
    DeviceAnnounce, StateUpdate, TOPIC_DEVICE_ANNOUNCE, TOPIC_STATE_PREFIX,
};
use tokio_stream::StreamExt;

use crate::state::AppState;

pub fn spawn_all(app: AppState) {
    spawn_announce_log(app.clone());
    spawn_state_log(app);
}

fn spawn_announce_log(app: AppState) {
    tokio::spawn(async move {
        if let Ok(mut stream) = app.bus.subscribe(TOPIC_DEVICE_ANNOUNCE).await {
            while let Some(msg) = stream.next().await {
                match msg.decode::<DeviceAnnounce>() {
                    Ok(a) => tracing::info!(
                        device = %a.device_id,
                        model = %a.model_id,
                        name = %a.model_name,
                        features = ?a.features,
                        "device announced"
                    ),
                    Err(e) => tracing::warn!("bad announce payload: {e}"),
                }
            }
        }
    });
}

fn spawn_state_log(app: AppState) {
    tokio::spawn(async move {
        let pattern = format!("{TOPIC_STATE_PREFIX}*");
        if let Ok(mut stream) = app.bus.subscribe(&pattern).await {
            while let Some(msg) = stream.next().await {
                match msg.decode::<StateUpdate>() {
                    Ok(v) => tracing::debug!(
                        device = %v.device_id,
                        activity = ?v.activity,
                        issues = v.issues.len(),
                        "state update"
                    ),
                    Err(e) => tracing::warn!("bad state update payload: {e}"),
                }
            }
        }
    });
}
