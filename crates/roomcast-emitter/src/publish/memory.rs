use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use bytes::Bytes;
use dashmap::DashMap;

use roomcast_core::{EmitterError, Result};

use super::Publisher;

/// One recorded publish.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Published {
    pub channel: String,
    pub payload: Bytes,
}

/// In-process bus: records every publish, optionally failing on demand.
#[derive(Default)]
pub struct MemoryPublisher {
    log: Mutex<Vec<Published>>,
    by_channel: DashMap<String, Vec<Bytes>>,
    failing: AtomicBool,
}

impl MemoryPublisher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make subsequent publishes fail with a transport error (or succeed again).
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::Relaxed);
    }

    /// Every successful publish, in order.
    pub fn published(&self) -> Vec<Published> {
        self.log.lock().map(|l| l.clone()).unwrap_or_default()
    }

    pub fn count(&self) -> usize {
        self.log.lock().map(|l| l.len()).unwrap_or_default()
    }

    /// Payloads published on one channel, in order.
    pub fn on_channel(&self, channel: &str) -> Vec<Bytes> {
        self.by_channel
            .get(channel)
            .map(|v| v.value().clone())
            .unwrap_or_default()
    }

    pub fn last(&self) -> Option<Published> {
        self.log.lock().ok().and_then(|l| l.last().cloned())
    }
}

#[async_trait]
impl Publisher for MemoryPublisher {
    async fn publish(&self, channel: &str, payload: Bytes) -> Result<()> {
        if self.failing.load(Ordering::Relaxed) {
            return Err(EmitterError::Transport("memory bus unavailable".into()));
        }

        // Hold the log lock across both writes so the two views never disagree.
        let mut log = self
            .log
            .lock()
            .map_err(|_| EmitterError::Transport("memory bus poisoned".into()))?;
        self.by_channel
            .entry(channel.to_string())
            .or_default()
            .push(payload.clone());
        log.push(Published {
            channel: channel.to_string(),
            payload,
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::panic)]

    use std::panic::{catch_unwind, AssertUnwindSafe};

    use super::*;

    #[tokio::test]
    async fn poisoned_log_leaves_both_views_empty() {
        let bus = MemoryPublisher::new();
        let _ = catch_unwind(AssertUnwindSafe(|| {
            let _guard = bus.log.lock().unwrap();
            panic!("poison the log");
        }));

        let err = bus.publish("ch#", Bytes::from_static(b"x")).await.unwrap_err();
        assert_eq!(err.kind().as_str(), "TRANSPORT");
        assert!(bus.on_channel("ch#").is_empty());
        assert_eq!(bus.count(), 0);
    }

    #[tokio::test]
    async fn views_agree_after_publish() {
        let bus = MemoryPublisher::new();
        bus.publish("a#", Bytes::from_static(b"1")).await.unwrap();
        bus.publish("b#", Bytes::from_static(b"2")).await.unwrap();
        bus.publish("a#", Bytes::from_static(b"3")).await.unwrap();

        assert_eq!(bus.count(), 3);
        assert_eq!(bus.on_channel("a#"), vec![Bytes::from_static(b"1"), Bytes::from_static(b"3")]);
        assert_eq!(bus.last().unwrap().channel, "a#");
    }
}
