use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::mpsc;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChannelError {
    #[error("message broker unavailable: {0}")]
    Unavailable(String),

    #[error("subscribe to '{key}' failed: {reason}")]
    Subscribe { key: String, reason: String },
}

/// Live subscription to one completion channel.
///
/// Yields raw payloads in arrival order. Dropping it unsubscribes.
#[derive(Debug)]
pub struct Subscription {
    key: String,
    rx: mpsc::Receiver<String>,
}

impl Subscription {
    pub fn new(key: impl Into<String>, rx: mpsc::Receiver<String>) -> Self {
        Self { key: key.into(), rx }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Next payload; `None` once the publisher side is gone.
    pub async fn recv(&mut self) -> Option<String> {
        self.rx.recv().await
    }
}

/// Pub/sub channel workloads report completion on.
#[async_trait]
pub trait CompletionChannel: Send + Sync {
    async fn subscribe(&self, key: &str) -> Result<Subscription, ChannelError>;
}
