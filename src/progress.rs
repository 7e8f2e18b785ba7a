//! Per-run progress broadcasting.
//!
//! Each pipeline run gets its own broadcast channel, registered by run id, so
//! concurrent runs never interleave messages in one stream. Publishing is
//! always non-blocking and best-effort: with no channel or no receivers the
//! message is dropped, and a slow receiver loses the oldest messages rather
//! than stalling the pipeline.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::broadcast;

const CHANNEL_CAPACITY: usize = 32;

#[derive(Default)]
pub struct ProgressHub {
    channels: DashMap<String, broadcast::Sender<String>>,
}

impl ProgressHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe to a run's messages, creating the channel on first use.
    pub fn subscribe(&self, run_id: &str) -> broadcast::Receiver<String> {
        self.channels
            .entry(run_id.to_string())
            .or_insert_with(|| broadcast::channel(CHANNEL_CAPACITY).0)
            .subscribe()
    }

    /// Publish a message to a run's subscribers, if any.
    pub fn publish(&self, run_id: &str, message: impl Into<String>) {
        if let Some(sender) = self.channels.get(run_id) {
            // A send error only means nobody is listening right now.
            let _ = sender.send(message.into());
        }
    }

    /// Drop a finished run's channel; live subscribers observe end-of-stream.
    pub fn close(&self, run_id: &str) {
        self.channels.remove(run_id);
    }
}

/// A hub handle bound to one run id, passed down into pipeline stages.
#[derive(Clone)]
pub struct ProgressPublisher {
    hub: Arc<ProgressHub>,
    run_id: String,
}

impl ProgressPublisher {
    pub fn new(hub: Arc<ProgressHub>, run_id: impl Into<String>) -> Self {
        Self {
            hub,
            run_id: run_id.into(),
        }
    }

    pub fn run_id(&self) -> &str {
        &self.run_id
    }

    pub fn publish(&self, message: impl Into<String>) {
        self.hub.publish(&self.run_id, message);
    }
}
