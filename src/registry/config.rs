//! Relay configuration

use serde::Deserialize;

/// Default number of chunks queued per subscriber before it is dropped
pub const DEFAULT_BUFFER_SIZE: usize = 64;

/// Default capacity of the publisher -> driver queue
pub const DEFAULT_PUBLISH_QUEUE_SIZE: usize = 1;

/// Process-wide relay configuration
///
/// Applied uniformly to every stream when the registry is constructed.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RelayConfig {
    /// Maximum outstanding chunks per subscriber sink
    pub buffer_size: usize,

    /// Maximum chunks waiting between the publisher and its driver task
    pub publish_queue_size: usize,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            buffer_size: DEFAULT_BUFFER_SIZE,
            publish_queue_size: DEFAULT_PUBLISH_QUEUE_SIZE,
        }
    }
}

impl RelayConfig {
    /// Set the per-subscriber sink capacity (minimum 1)
    pub fn buffer_size(mut self, size: usize) -> Self {
        self.buffer_size = size.max(1);
        self
    }

    /// Set the publisher queue capacity (minimum 1)
    pub fn publish_queue_size(mut self, size: usize) -> Self {
        self.publish_queue_size = size.max(1);
        self
    }

    // Deserialized values bypass the setters
    pub(crate) fn sink_capacity(&self) -> usize {
        self.buffer_size.max(1)
    }

    pub(crate) fn feed_capacity(&self) -> usize {
        self.publish_queue_size.max(1)
    }
}
