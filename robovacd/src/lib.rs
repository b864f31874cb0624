pub mod config;
pub mod replay;
pub mod state;
pub mod subscribers;
pub mod telemetry;
pub mod wiring;

use tokio::io::BufReader;

use crate::{config::Config, replay::replay, telemetry::init_tracing, wiring::build_state};

pub async fn run(cfg: Config) -> anyhow::Result<()> {
    init_tracing(&cfg)?;
    let app_state = build_state(&cfg).await?;
    subscribers::spawn_all(app_state.clone());
    app_state.vacuum.clone().spawn().await?;

    let input = BufReader::new(tokio::io::stdin());
    tokio::select! {
        summary = replay(&app_state, input, tokio::io::stdout(), cfg.output) => {
            let summary = summary?;
            tracing::info!(
                states = summary.states,
                commands = summary.commands,
                failed = summary.failed,
                "replay finished"
            );
        }
        _ = tokio::signal::ctrl_c() => tracing::info!("interrupted"),
    }
    Ok(())
}
