use anyhow::{Context, Result};
use tracing_subscriber::{filter::EnvFilter, fmt};

use crate::config::Config;

/// Logs go to stderr, stdout carries the replay output.
pub fn init_tracing(cfg: &Config) -> Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&cfg.log)
            .with_context(|| format!("invalid log filter {:?}", cfg.log))?,
    };
    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .compact()
        .try_init()
        .map_err(|e| anyhow::anyhow!("tracing already initialised: {e}"))
}
