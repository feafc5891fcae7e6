//! Publisher and subscriber handles
//!
//! These are what the registry hands back to callers. A `Publisher` feeds one
//! stream until it is closed or dropped; a `Subscriber` reads the live chunks
//! of one stream until end-of-stream.

use std::sync::Weak;

use bytes::Bytes;
use tokio::sync::mpsc::{self, error::TryRecvError};

use super::channel::BroadcastChannel;
use super::error::{RelayError, Result};

/// Write side of a live stream
///
/// Closing (or dropping) the publisher ends the stream: every subscriber
/// observes end-of-stream and the name becomes available again.
#[derive(Debug)]
pub struct Publisher {
    name: String,
    feed: mpsc::Sender<Bytes>,
}

impl Publisher {
    pub(super) fn new(name: String, feed: mpsc::Sender<Bytes>) -> Self {
        Self { name, feed }
    }

    /// Stream name this publisher owns
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Submit the next chunk
    ///
    /// Waits only for the stream's driver to take the chunk, never for
    /// subscribers to consume it.
    pub async fn send(&self, chunk: Bytes) -> Result<()> {
        self.feed
            .send(chunk)
            .await
            .map_err(|_| RelayError::StreamClosed(self.name.clone()))
    }

    /// End the stream
    pub fn close(self) {
        tracing::debug!(stream = %self.name, "Publisher closing");
    }
}

/// Detaches one subscriber from its stream
///
/// Cheap to clone. Calling it more than once, or after the stream has ended,
/// does nothing.
#[derive(Debug, Clone)]
pub struct Unsubscribe {
    channel: Weak<BroadcastChannel>,
    id: u64,
}

impl Unsubscribe {
    pub(super) fn new(channel: Weak<BroadcastChannel>, id: u64) -> Self {
        Self { channel, id }
    }

    /// Remove the subscriber and release its sink
    pub fn unsubscribe(&self) {
        if let Some(channel) = self.channel.upgrade() {
            channel.unsub(self.id);
        }
    }
}

/// Read side of a live stream
///
/// Dropping the subscriber detaches it.
#[derive(Debug)]
pub struct Subscriber {
    id: u64,
    sink: mpsc::Receiver<Bytes>,
    unsubscribe: Unsubscribe,
}

impl Subscriber {
    pub(super) fn new(id: u64, sink: mpsc::Receiver<Bytes>, unsubscribe: Unsubscribe) -> Self {
        Self {
            id,
            sink,
            unsubscribe,
        }
    }

    /// Subscription identifier, unique within the stream
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Receive the next chunk
    ///
    /// Returns `None` at end-of-stream: the publisher closed, this subscriber
    /// fell too far behind and was dropped, or it was unsubscribed.
    pub async fn recv(&mut self) -> Option<Bytes> {
        self.sink.recv().await
    }

    /// Receive a chunk if one is already queued
    pub fn try_recv(&mut self) -> std::result::Result<Bytes, TryRecvError> {
        self.sink.try_recv()
    }

    /// Chunks currently waiting in this subscriber's sink
    pub fn queued(&self) -> usize {
        self.sink.len()
    }
}

impl Drop for Subscriber {
    fn drop(&mut self) {
        self.unsubscribe.unsubscribe();
    }
}
