//! Stream registry for pub/sub routing
//!
//! The registry owns the mapping from stream name to broadcast channel and
//! enforces at most one publisher per name. Each live stream has a driver
//! task that moves chunks from the publisher into one bounded sink per
//! subscriber.
//!
//! # Architecture
//!
//! ```text
//!                           StreamRegistry
//!                     ┌─────────────────────────┐
//!                     │ streams: Mutex<HashMap< │
//!                     │   name,                 │
//!                     │   BroadcastChannel {    │
//!                     │     subscribers: id ->  │
//!                     │       mpsc::Sender,     │
//!                     │   }                     │
//!                     │ >>                      │
//!                     └───────────┬─────────────┘
//!                                 │
//!   [Publisher] ── mpsc ──► [driver task] ──try_send──┬──► [Subscriber]
//!   send(chunk)                                       ├──► [Subscriber]
//!                                                     └──► [Subscriber]
//! ```
//!
//! # Backpressure
//!
//! Delivery into a subscriber sink never waits. A subscriber whose sink is
//! already holding `buffer_size` chunks is dropped: its sink is closed, it
//! reads what was queued and then sees end-of-stream, and it has to
//! subscribe again to resume. The publisher and the other subscribers are
//! unaffected.
//!
//! # Zero-Copy Design
//!
//! Chunks are `bytes::Bytes`, so every subscriber shares the publisher's
//! allocation; fan-out only bumps a reference count.

pub mod channel;
pub mod config;
pub mod error;
pub mod handle;
pub mod store;

pub use channel::{BroadcastChannel, ChannelState, ChannelStats};
pub use config::RelayConfig;
pub use error::{RelayError, Result};
pub use handle::{Publisher, Subscriber, Unsubscribe};
pub use store::StreamRegistry;
