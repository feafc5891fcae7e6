//! Per-stream broadcast channel
//!
//! A `BroadcastChannel` owns one stream's subscriber set. Every subscriber
//! gets its own bounded sink; the stream's driver task pushes each chunk into
//! every sink without ever waiting on one. A sink that is full when a chunk
//! arrives gets its subscriber dropped, so a slow viewer can neither stall
//! the publisher nor hold back the other viewers.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use bytes::Bytes;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use tokio::sync::mpsc::{self, error::TrySendError};

use super::handle::{Subscriber, Unsubscribe};

/// Lifecycle of a broadcast channel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelState {
    /// Accepting chunks and subscribers
    Open,
    /// Publisher feed closed, teardown in progress
    Closing,
    /// All sinks closed, removed from the registry
    Closed,
}

/// Point-in-time snapshot of a channel
#[derive(Debug, Clone, Copy)]
pub struct ChannelStats {
    /// Currently attached subscribers
    pub clients: usize,
    /// When the channel was created
    pub created: DateTime<Utc>,
}

struct ChannelInner {
    state: ChannelState,
    subscribers: HashMap<u64, mpsc::Sender<Bytes>>,
}

/// Fan-out point for a single live stream
pub struct BroadcastChannel {
    name: String,
    capacity: usize,
    created_at: DateTime<Utc>,
    next_subscriber_id: AtomicU64,
    inner: Mutex<ChannelInner>,
}

impl BroadcastChannel {
    /// Create an open channel whose subscriber sinks hold `capacity` chunks
    pub fn new(name: impl Into<String>, capacity: usize) -> Self {
        Self {
            name: name.into(),
            capacity: capacity.max(1),
            created_at: Utc::now(),
            next_subscriber_id: AtomicU64::new(1),
            inner: Mutex::new(ChannelInner {
                state: ChannelState::Open,
                subscribers: HashMap::new(),
            }),
        }
    }

    /// Stream name this channel serves
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Per-subscriber sink capacity
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Current lifecycle state
    pub fn state(&self) -> ChannelState {
        self.inner.lock().state
    }

    /// Attach a new subscriber
    ///
    /// Only chunks published after this call returns are delivered. Attaching
    /// to a channel that is no longer open yields a subscriber that observes
    /// end-of-stream immediately.
    pub fn sub(self: &Arc<Self>) -> (Subscriber, Unsubscribe) {
        let id = self.next_subscriber_id.fetch_add(1, Ordering::Relaxed);
        let (tx, rx) = mpsc::channel(self.capacity);

        let mut inner = self.inner.lock();
        if inner.state == ChannelState::Open {
            inner.subscribers.insert(id, tx);
            tracing::debug!(
                stream = %self.name,
                subscriber = id,
                subscribers = inner.subscribers.len(),
                "Subscriber attached"
            );
        }
        drop(inner);

        let unsubscribe = Unsubscribe::new(Arc::downgrade(self), id);
        (Subscriber::new(id, rx, unsubscribe.clone()), unsubscribe)
    }

    /// Detach a subscriber and release its sink
    ///
    /// Returns false if the subscriber was already gone.
    pub fn unsub(&self, id: u64) -> bool {
        let mut inner = self.inner.lock();
        let removed = inner.subscribers.remove(&id).is_some();

        if removed {
            tracing::debug!(
                stream = %self.name,
                subscriber = id,
                subscribers = inner.subscribers.len(),
                "Subscriber detached"
            );
        }

        removed
    }

    /// Deliver a chunk to every attached subscriber
    ///
    /// Never waits. Subscribers whose sink is full are dropped, as are those
    /// whose read side has gone away. Returns how many sinks accepted the chunk.
    pub fn publish(&self, chunk: Bytes) -> usize {
        let mut inner = self.inner.lock();
        if inner.state != ChannelState::Open {
            return 0;
        }

        let name = &self.name;
        let mut delivered = 0;

        inner
            .subscribers
            .retain(|&id, sink| match sink.try_send(chunk.clone()) {
                Ok(()) => {
                    delivered += 1;
                    true
                }
                Err(TrySendError::Full(_)) => {
                    tracing::warn!(stream = %name, subscriber = id, "Subscriber too slow, dropping");
                    false
                }
                Err(TrySendError::Closed(_)) => {
                    tracing::debug!(stream = %name, subscriber = id, "Subscriber went away");
                    false
                }
            });

        delivered
    }

    /// Mark the publisher feed as closed
    pub(crate) fn begin_close(&self) {
        let mut inner = self.inner.lock();
        if inner.state == ChannelState::Open {
            inner.state = ChannelState::Closing;
        }
    }

    /// Close every remaining sink
    ///
    /// Readers still receive whatever was already queued in their sink, then
    /// end-of-stream. Returns the number of subscribers that were attached.
    pub fn close(&self) -> usize {
        let mut inner = self.inner.lock();
        inner.state = ChannelState::Closed;
        let remaining = inner.subscribers.len();
        inner.subscribers.clear();
        remaining
    }

    /// Subscriber count and creation time
    pub fn stats(&self) -> ChannelStats {
        ChannelStats {
            clients: self.inner.lock().subscribers.len(),
            created: self.created_at,
        }
    }
}

impl std::fmt::Debug for BroadcastChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.lock();
        f.debug_struct("BroadcastChannel")
            .field("name", &self.name)
            .field("capacity", &self.capacity)
            .field("state", &inner.state)
            .field("subscribers", &inner.subscribers.len())
            .field("created_at", &self.created_at)
            .finish()
    }
}
