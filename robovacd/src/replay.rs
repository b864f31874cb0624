use std::sync::{Mutex, PoisonError};

use anyhow::{Context, Result, bail};
use async_trait::async_trait;
use robovac_core::{
    bus_contract::{CommandOutcome, StateUpdate},
    dps::Snapshot,
    value::CommandRequest,
};
use robovac_sdk::DpsTransport;
use serde::Serialize;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

use crate::{config::OutputFormat, state::AppState};

/// Stands in for a device session while replaying recorded traffic. Writes
/// are kept so they can be inspected, there is nothing to poll.
#[derive(Debug, Default)]
pub struct ReplayTransport {
    sent: Mutex<Vec<Snapshot>>,
}

impl ReplayTransport {
    pub fn sent(&self) -> Vec<Snapshot> {
        self.sent.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }
}

#[async_trait]
impl DpsTransport for ReplayTransport {
    async fn fetch(&self) -> Result<Snapshot> {
        bail!("replay has no live device to poll")
    }

    async fn send(&self, writes: Snapshot) -> Result<()> {
        self.sent.lock().unwrap_or_else(PoisonError::into_inner).push(writes);
        Ok(())
    }
}

/// One replay line: a JSON object with a `command` key is a command
/// request, any other object is a data point snapshot.
#[derive(Debug, Clone, PartialEq)]
pub enum Input {
    Snapshot(Snapshot),
    Command(CommandRequest),
}

impl Input {
    pub fn parse(line: &str) -> Result<Self> {
        let value: serde_json::Value = serde_json::from_str(line).context("line is not JSON")?;
        if value.get("command").is_some() {
            let request = serde_json::from_value(value).context("invalid command request")?;
            Ok(Input::Command(request))
        } else {
            let snapshot = serde_json::from_value(value).context("invalid snapshot")?;
            Ok(Input::Snapshot(snapshot))
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum Output {
    State(StateUpdate),
    Command(CommandOutcome),
    Rejected { line: usize, error: String },
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReplaySummary {
    pub states: usize,
    pub commands: usize,
    pub failed: usize,
}

/// Feeds a single line through the vacuum component.
pub async fn process(app: &AppState, line_no: usize, line: &str) -> Output {
    let input = match Input::parse(line) {
        Ok(input) => input,
        Err(err) => return rejected(line_no, err),
    };
    match input {
        Input::Snapshot(snapshot) => match app.vacuum.ingest(&snapshot).await {
            Ok(update) => Output::State(update),
            Err(err) => rejected(line_no, err),
        },
        Input::Command(request) => match app.vacuum.execute(&request).await {
            Ok(writes) => Output::Command(CommandOutcome::sent(None, writes)),
            Err(err) => {
                tracing::warn!(
                    line = line_no,
                    command = %request.command,
                    "command rejected: {err:#}"
                );
                Output::Command(CommandOutcome::failed(None, format!("{err:#}")))
            }
        },
    }
}

fn rejected(line: usize, err: anyhow::Error) -> Output {
    tracing::warn!(line, "skipping line: {err:#}");
    Output::Rejected { line, error: format!("{err:#}") }
}

/// Replays every line of `input` and writes one result per line to
/// `output`. Blank lines and `#` comments are skipped.
pub async fn replay<R, W>(
    app: &AppState,
    input: R,
    mut output: W,
    format: OutputFormat,
) -> Result<ReplaySummary>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut summary = ReplaySummary::default();
    let mut lines = input.lines();
    let mut line_no = 0;

    while let Some(line) = lines.next_line().await.context("reading replay input")? {
        line_no += 1;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let out = process(app, line_no, line).await;
        match &out {
            Output::State(_) => summary.states += 1,
            Output::Command(outcome) if outcome.is_ok() => summary.commands += 1,
            Output::Command(_) | Output::Rejected { .. } => summary.failed += 1,
        }

        let mut rendered = match format {
            OutputFormat::Json => serde_json::to_string(&out)?,
            OutputFormat::Pretty => serde_json::to_string_pretty(&out)?,
        };
        rendered.push('\n');
        output.write_all(rendered.as_bytes()).await.context("writing replay output")?;
    }
    output.flush().await?;
    Ok(summary)
}
