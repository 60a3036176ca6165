use std::time::Duration;

use tokio_util::sync::CancellationToken;
use torc_model::CompletionMessage;
use tracing::{debug, error, instrument};

use crate::{
    error::CoreError,
    ports::{CompletionChannel, Subscription},
};

/// Bounds on the completion wait.
///
/// The default waits indefinitely. On timeout or cancellation the submitted job keeps running
/// and is left to its TTL.
#[derive(Debug, Clone, Default)]
pub struct WaitPolicy {
    pub timeout: Option<Duration>,
    pub cancel: Option<CancellationToken>,
}

impl WaitPolicy {
    pub fn unbounded() -> Self {
        Self::default()
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_cancel(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }
}

/// Subscribe to `key` and return the first non-blank completion message.
///
/// The subscription is dropped as soon as a message is accepted. A blank key fails
/// immediately with [`CoreError::MissingIdentity`] instead of blocking.
#[instrument(level = "debug", skip(channel, policy), fields(timeout = ?policy.timeout))]
pub async fn wait_for_completion(
    channel: &dyn CompletionChannel,
    key: &str,
    policy: &WaitPolicy,
) -> Result<CompletionMessage, CoreError> {
    if key.trim().is_empty() {
        return Err(CoreError::MissingIdentity);
    }
    let mut sub = channel.subscribe(key).await?;
    debug!("subscribed to completion channel");

    let bounded = async {
        match policy.timeout {
            Some(limit) => match tokio::time::timeout(limit, first_message(&mut sub)).await {
                Ok(res) => res,
                Err(_) => Err(CoreError::WaitTimedOut {
                    key: key.to_string(),
                    timeout_ms: u64::try_from(limit.as_millis()).unwrap_or(u64::MAX),
                }),
            },
            None => first_message(&mut sub).await,
        }
    };

    match &policy.cancel {
        Some(token) => tokio::select! {
            biased;
            _ = token.cancelled() => Err(CoreError::WaitCanceled(key.to_string())),
            res = bounded => res,
        },
        None => bounded.await,
    }
}

async fn first_message(sub: &mut Subscription) -> Result<CompletionMessage, CoreError> {
    while let Some(raw) = sub.recv().await {
        if raw.trim().is_empty() {
            continue;
        }
        let msg: CompletionMessage =
            serde_json::from_str(&raw).map_err(|e| CoreError::Decode {
                key: sub.key().to_string(),
                reason: e.to_string(),
            })?;
        if msg.is_error() {
            error!(key = %sub.key(), detail = %msg.message, "phase reported an error");
        }
        return Ok(msg);
    }
    Err(CoreError::ChannelClosed(sub.key().to_string()))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::memory::MemoryChannel;

    #[tokio::test]
    async fn returns_first_message_and_unsubscribes() {
        let channel = MemoryChannel::new();
        channel.publish("t1", &CompletionMessage::ok("staged"));

        let msg = wait_for_completion(&channel, "t1", &WaitPolicy::unbounded())
            .await
            .unwrap();

        assert_eq!(msg, CompletionMessage::ok("staged"));
        assert_eq!(channel.subscriptions(), ["t1"]);
        assert_eq!(channel.live_subscribers("t1"), 0);
    }

    #[tokio::test]
    async fn blank_key_fails_without_subscribing() {
        let channel = MemoryChannel::new();

        let err = wait_for_completion(&channel, "", &WaitPolicy::unbounded())
            .await
            .unwrap_err();

        assert!(matches!(err, CoreError::MissingIdentity));
        assert!(channel.subscriptions().is_empty());
    }

    #[tokio::test]
    async fn blank_payloads_are_skipped() {
        let channel = Arc::new(MemoryChannel::new());
        let publisher = {
            let channel = channel.clone();
            tokio::spawn(async move {
                channel.wait_for_subscriber("t1").await;
                channel.publish_raw("t1", "");
                channel.publish_raw("t1", "   ");
                channel.publish("t1", &CompletionMessage::error("disk full"));
                channel.publish("t1", &CompletionMessage::ok("ignored"));
            })
        };

        let msg = wait_for_completion(channel.as_ref(), "t1", &WaitPolicy::unbounded())
            .await
            .unwrap();
        publisher.await.unwrap();

        assert_eq!(msg, CompletionMessage::error("disk full"));
    }

    #[tokio::test]
    async fn undecodable_payload_is_an_error() {
        let channel = MemoryChannel::new();
        channel.publish_raw("t1", "not json");

        let err = wait_for_completion(&channel, "t1", &WaitPolicy::unbounded())
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::Decode { ref key, .. } if key == "t1"));
    }

    #[tokio::test(start_paused = true)]
    async fn timeout_is_reported() {
        let channel = MemoryChannel::new();
        let policy = WaitPolicy::unbounded().with_timeout(Duration::from_secs(5));

        let err = wait_for_completion(&channel, "t1", &policy).await.unwrap_err();
        assert!(matches!(err, CoreError::WaitTimedOut { timeout_ms: 5000, .. }));
    }

    #[tokio::test]
    async fn cancellation_is_reported() {
        let channel = MemoryChannel::new();
        let token = CancellationToken::new();
        token.cancel();
        let policy = WaitPolicy::unbounded().with_cancel(token);

        let err = wait_for_completion(&channel, "t1", &policy).await.unwrap_err();
        assert!(matches!(err, CoreError::WaitCanceled(ref k) if k == "t1"));
    }

    #[tokio::test]
    async fn closed_channel_is_reported() {
        let channel = Arc::new(MemoryChannel::new());
        let closer = {
            let channel = channel.clone();
            tokio::spawn(async move {
                channel.wait_for_subscriber("t1").await;
                channel.close("t1");
            })
        };

        let err = wait_for_completion(channel.as_ref(), "t1", &WaitPolicy::unbounded())
            .await
            .unwrap_err();
        closer.await.unwrap();

        assert!(matches!(err, CoreError::ChannelClosed(ref k) if k == "t1"));
    }
}
