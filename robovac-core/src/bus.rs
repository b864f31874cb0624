//! Topic-based message bus connecting vacuum components to their host.

use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;
use bytes::Bytes;
use serde::{Serialize, de::DeserializeOwned};
use tokio::sync::broadcast;
use tokio_stream::{Stream, StreamExt, wrappers::BroadcastStream};

#[derive(Debug, Clone)]
pub struct Message {
    pub topic: String,
    pub payload: Bytes,
}

impl Message {
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_slice(&self.payload)
            .with_context(|| format!("decoding payload on {}", self.topic))
    }
}

pub type MessageStream = Box<dyn Stream<Item = Message> + Unpin + Send>;

#[async_trait]
pub trait Bus: Send + Sync {
    async fn publish(&self, topic: &str, payload: Bytes) -> Result<()>;
    async fn subscribe(&self, pattern: &str) -> Result<MessageStream>;
}

#[async_trait]
pub trait BusExt: Bus {
    async fn publish_json<T>(&self, topic: &str, value: &T) -> Result<()>
    where
        T: Serialize + Sync;
}

#[async_trait]
impl<B: Bus + ?Sized> BusExt for B {
    async fn publish_json<T>(&self, topic: &str, value: &T) -> Result<()>
    where
        T: Serialize + Sync,
    {
        let payload =
            serde_json::to_vec(value).with_context(|| format!("encoding payload for {topic}"))?;
        self.publish(topic, Bytes::from(payload)).await
    }
}

/// Single-process bus over a broadcast channel. Slow subscribers skip
/// messages instead of blocking publishers.
#[derive(Clone)]
pub struct InMemoryBus {
    tx: Arc<broadcast::Sender<Message>>,
}

impl InMemoryBus {
    pub fn with_capacity(capacity: usize) -> Self {
        let (tx, _rx) = broadcast::channel(capacity);
        Self { tx: Arc::new(tx) }
    }
}

impl Default for InMemoryBus {
    fn default() -> Self {
        Self::with_capacity(1024)
    }
}

#[async_trait]
impl Bus for InMemoryBus {
    async fn publish(&self, topic: &str, payload: Bytes) -> Result<()> {
        // no subscribers is not an error
        let _ = self.tx.send(Message { topic: topic.to_string(), payload });
        Ok(())
    }

    async fn subscribe(&self, pattern: &str) -> Result<MessageStream> {
        let rx = self.tx.subscribe();
        let pattern = pattern.to_string();
        let stream = BroadcastStream::new(rx).filter_map(move |item| match item {
            Ok(msg) if topic_matches(&pattern, &msg.topic) => Some(msg),
            Ok(_) => None,
            Err(e) => {
                tracing::warn!(error = %e, pattern = %pattern, "subscriber lagging");
                None
            }
        });
        Ok(Box::new(stream))
    }
}

/// `*` matches everything, `a.*` matches `a` and everything below it, a
/// trailing `*` is a plain prefix match.
pub fn topic_matches(pattern: &str, topic: &str) -> bool {
    if pattern == "*" || pattern == topic {
        return true;
    }
    if let Some(prefix) = pattern.strip_suffix(".*") {
        return topic == prefix
            || topic.strip_prefix(prefix).is_some_and(|rest| rest.starts_with('.'));
    }
    if let Some(prefix) = pattern.strip_suffix('*') {
        return topic.starts_with(prefix);
    }
    false
}
