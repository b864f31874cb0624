use anyhow::Result;
use async_trait::async_trait;
use robovac_core::dps::Snapshot;

/// Session with one device. Framing, encryption, retries and keepalive all
/// live behind this trait.
#[async_trait]
pub trait DpsTransport: Send + Sync + 'static {
    /// Current data points of the device.
    async fn fetch(&self) -> Result<Snapshot>;

    /// Write data points. All entries of one call belong to one command.
    async fn send(&self, writes: Snapshot) -> Result<()>;
}
