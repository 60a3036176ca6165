use std::{
    collections::{HashMap, VecDeque},
    sync::{Mutex, MutexGuard, PoisonError},
};

use async_trait::async_trait;
use tokio::sync::mpsc;
use torc_model::CompletionMessage;

use crate::ports::{ChannelError, CompletionChannel, Subscription};

const SUBSCRIPTION_BUFFER: usize = 64;

#[derive(Debug, Default)]
struct ChannelState {
    live: HashMap<String, Vec<mpsc::Sender<String>>>,
    retained: HashMap<String, VecDeque<String>>,
    subscriptions: Vec<String>,
    unavailable: Option<String>,
}

/// Broker stand-in.
///
/// Payloads published while nobody listens are retained and handed out one per
/// subscription, so a test can script the reply of each phase up front.
#[derive(Debug, Default)]
pub struct MemoryChannel {
    inner: Mutex<ChannelState>,
}

impl MemoryChannel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn publish(&self, key: &str, msg: &CompletionMessage) {
        // A two-field struct of strings always serializes.
        let payload = serde_json::to_string(msg).unwrap_or_default();
        self.publish_raw(key, payload);
    }

    pub fn publish_raw(&self, key: &str, payload: impl Into<String>) {
        let payload = payload.into();
        let mut state = self.lock();
        let mut delivered = false;
        if let Some(senders) = state.live.get_mut(key) {
            senders.retain(|tx| !tx.is_closed());
            for tx in senders.iter() {
                delivered |= tx.try_send(payload.clone()).is_ok();
            }
        }
        if !delivered {
            state
                .retained
                .entry(key.to_string())
                .or_default()
                .push_back(payload);
        }
    }

    /// Drop every live sender of `key`; subscribers see the channel close.
    pub fn close(&self, key: &str) {
        self.lock().live.remove(key);
    }

    /// Fail every following subscription.
    pub fn set_unavailable(&self, reason: impl Into<String>) {
        self.lock().unavailable = Some(reason.into());
    }

    /// Keys subscribed so far, in order.
    pub fn subscriptions(&self) -> Vec<String> {
        self.lock().subscriptions.clone()
    }

    pub fn live_subscribers(&self, key: &str) -> usize {
        self.lock()
            .live
            .get(key)
            .map(|s| s.iter().filter(|tx| !tx.is_closed()).count())
            .unwrap_or(0)
    }

    /// Resolve once somebody is subscribed to `key`.
    pub async fn wait_for_subscriber(&self, key: &str) {
        while self.live_subscribers(key) == 0 {
            tokio::task::yield_now().await;
        }
    }

    fn lock(&self) -> MutexGuard<'_, ChannelState> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl CompletionChannel for MemoryChannel {
    async fn subscribe(&self, key: &str) -> Result<Subscription, ChannelError> {
        let mut state = self.lock();
        if let Some(reason) = &state.unavailable {
            return Err(ChannelError::Unavailable(reason.clone()));
        }
        let (tx, rx) = mpsc::channel(SUBSCRIPTION_BUFFER);
        if let Some(payload) = state.retained.get_mut(key).and_then(VecDeque::pop_front) {
            let _ = tx.try_send(payload);
        }
        state.live.entry(key.to_string()).or_default().push(tx);
        state.subscriptions.push(key.to_string());
        Ok(Subscription::new(key, rx))
    }
}
