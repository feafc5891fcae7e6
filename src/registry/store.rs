//! Stream registry implementation
//!
//! The central registry that maps stream names to live broadcast channels
//! and drives each channel from publisher connect to publisher disconnect.

use std::collections::HashMap;
use std::sync::Arc;

use bytes::Bytes;
use tokio::sync::{mpsc, Mutex};

use crate::stats::StreamStatistics;

use super::channel::BroadcastChannel;
use super::config::RelayConfig;
use super::error::{RelayError, Result};
use super::handle::{Publisher, Subscriber, Unsubscribe};

type StreamMap = HashMap<String, Arc<BroadcastChannel>>;

/// Central registry for all live streams
///
/// A name is present if and only if its publisher feed is open. The map lock
/// is held only for the map operation itself, never while chunks move.
pub struct StreamRegistry {
    /// Map of stream name to channel
    streams: Arc<Mutex<StreamMap>>,

    /// Configuration
    config: RelayConfig,
}

impl StreamRegistry {
    /// Create a new registry with default configuration
    pub fn new() -> Self {
        Self::with_config(RelayConfig::default())
    }

    /// Create a new registry with custom configuration
    pub fn with_config(config: RelayConfig) -> Self {
        Self {
            streams: Arc::new(Mutex::new(HashMap::new())),
            config,
        }
    }

    /// Get the registry configuration
    pub fn config(&self) -> &RelayConfig {
        &self.config
    }

    /// Claim a stream name for publishing
    ///
    /// Fails with `StreamAlreadyExists` without touching the registry if the
    /// name is already live. On success the stream is immediately visible to
    /// `subscribe` and `get_statistics`, and a driver task runs until the
    /// returned publisher is closed.
    pub async fn publish(&self, name: &str) -> Result<Publisher> {
        let mut streams = self.streams.lock().await;

        if streams.contains_key(name) {
            tracing::info!(stream = %name, "Publish rejected, stream already exists");
            return Err(RelayError::StreamAlreadyExists(name.to_string()));
        }

        let channel = Arc::new(BroadcastChannel::new(name, self.config.sink_capacity()));
        streams.insert(name.to_string(), Arc::clone(&channel));
        drop(streams);

        let (tx, rx) = mpsc::channel(self.config.feed_capacity());
        tokio::spawn(drive(Arc::clone(&self.streams), channel, rx));

        tracing::info!(stream = %name, "Stream created");

        Ok(Publisher::new(name.to_string(), tx))
    }

    /// Attach to a live stream
    ///
    /// Fails with `StreamNotExisting` if no publisher is live under `name`.
    pub async fn subscribe(&self, name: &str) -> Result<(Subscriber, Unsubscribe)> {
        let streams = self.streams.lock().await;

        let channel = streams
            .get(name)
            .ok_or_else(|| RelayError::StreamNotExisting(name.to_string()))?;

        Ok(channel.sub())
    }

    /// Snapshot every live stream
    ///
    /// Order is unspecified.
    pub async fn get_statistics(&self) -> Vec<StreamStatistics> {
        let streams = self.streams.lock().await;

        streams
            .iter()
            .map(|(name, channel)| {
                let stats = channel.stats();
                StreamStatistics::new(name.clone(), stats.clients, stats.created)
            })
            .collect()
    }

    /// Check whether a publisher is live under `name`
    pub async fn exists(&self, name: &str) -> bool {
        self.streams.lock().await.contains_key(name)
    }

    /// Get total number of live streams
    pub async fn stream_count(&self) -> usize {
        self.streams.lock().await.len()
    }
}

impl Default for StreamRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Fan-out driver, one per live stream
///
/// Suspends only while waiting on the publisher feed. When the feed closes
/// the name is removed and every sink closed under the registry lock, so no
/// caller can attach to a channel that is already torn down.
async fn drive(
    streams: Arc<Mutex<StreamMap>>,
    channel: Arc<BroadcastChannel>,
    mut feed: mpsc::Receiver<Bytes>,
) {
    while let Some(chunk) = feed.recv().await {
        channel.publish(chunk);
    }

    channel.begin_close();

    let mut map = streams.lock().await;
    if map
        .get(channel.name())
        .is_some_and(|live| Arc::ptr_eq(live, &channel))
    {
        map.remove(channel.name());
    }
    let remaining = channel.close();
    drop(map);

    tracing::info!(
        stream = %channel.name(),
        subscribers = remaining,
        "Stream removed"
    );
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use tokio::time::timeout;
    use tokio_test::{assert_err, assert_ok};

    use super::*;

    const WAIT: Duration = Duration::from_secs(2);

    async fn wait_removed(registry: &StreamRegistry, name: &str) {
        timeout(WAIT, async {
            while registry.exists(name).await {
                tokio::task::yield_now().await;
            }
        })
        .await
        .expect("stream was not torn down");
    }

    #[tokio::test]
    async fn test_publish_claims_name() {
        let registry = StreamRegistry::new();

        let _publisher = assert_ok!(registry.publish("test_stream").await);
        assert!(registry.exists("test_stream").await);

        // Can't publish the same name twice
        let result = registry.publish("test_stream").await;
        assert_eq!(
            result.unwrap_err(),
            RelayError::StreamAlreadyExists("test_stream".into())
        );
        assert_eq!(registry.stream_count().await, 1);
    }

    #[tokio::test]
    async fn test_subscribe_unknown_stream() {
        let registry = StreamRegistry::new();

        let result = registry.subscribe("missing").await;
        assert!(matches!(result, Err(RelayError::StreamNotExisting(ref n)) if n == "missing"));
    }

    #[tokio::test]
    async fn test_publish_subscribe_receive() {
        let registry = StreamRegistry::new();
        let publisher = registry.publish("test_stream").await.unwrap();
        let (mut sub, _unsub) = registry.subscribe("test_stream").await.unwrap();

        publisher.send(Bytes::from_static(b"chunk")).await.unwrap();

        let received = timeout(WAIT, sub.recv()).await.unwrap();
        assert_eq!(received, Some(Bytes::from_static(b"chunk")));
    }

    #[tokio::test]
    async fn test_close_tears_down_stream() {
        let registry = StreamRegistry::new();
        let publisher = registry.publish("test_stream").await.unwrap();
        let (mut sub, _unsub) = registry.subscribe("test_stream").await.unwrap();

        publisher.close();

        assert_eq!(timeout(WAIT, sub.recv()).await.unwrap(), None);
        wait_removed(&registry, "test_stream").await;
        assert_err!(registry.subscribe("test_stream").await);

        // The name is free again
        assert_ok!(registry.publish("test_stream").await);
    }

    #[tokio::test]
    async fn test_dropping_publisher_tears_down_stream() {
        let registry = StreamRegistry::new();
        let publisher = registry.publish("test_stream").await.unwrap();

        drop(publisher);

        wait_removed(&registry, "test_stream").await;
        assert!(registry.get_statistics().await.is_empty());
    }

    #[tokio::test]
    async fn test_statistics_track_clients() {
        let registry = StreamRegistry::new();
        let _a = registry.publish("a").await.unwrap();
        let _b = registry.publish("b").await.unwrap();

        let (_s1, unsub1) = registry.subscribe("a").await.unwrap();
        let (_s2, _unsub2) = registry.subscribe("a").await.unwrap();

        let mut stats = registry.get_statistics().await;
        stats.sort_by(|x, y| x.name.cmp(&y.name));
        assert_eq!(stats.len(), 2);
        assert_eq!(stats[0].name, "a");
        assert_eq!(stats[0].clients, 2);
        assert_eq!(stats[1].name, "b");
        assert_eq!(stats[1].clients, 0);

        unsub1.unsubscribe();
        unsub1.unsubscribe();

        let stats = registry.get_statistics().await;
        let a = stats.iter().find(|s| s.name == "a").unwrap();
        assert_eq!(a.clients, 1);
    }

    #[tokio::test]
    async fn test_zero_buffer_config_still_delivers() {
        let registry = StreamRegistry::with_config(RelayConfig {
            buffer_size: 0,
            publish_queue_size: 0,
        });
        let publisher = registry.publish("test_stream").await.unwrap();
        let (mut sub, _unsub) = registry.subscribe("test_stream").await.unwrap();

        publisher.send(Bytes::from_static(b"x")).await.unwrap();

        let received = timeout(WAIT, sub.recv()).await.unwrap();
        assert_eq!(received, Some(Bytes::from_static(b"x")));
    }
}
