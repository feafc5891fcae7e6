//! Live stream relay core
//!
//! One publisher pushes opaque chunks under a stream name; any number of
//! subscribers attach to that name and receive the same chunks as they
//! arrive. Nothing is stored: a subscriber only sees what is published after
//! it attaches, and a subscriber that cannot keep up is dropped rather than
//! buffered for.
//!
//! ```no_run
//! use bytes::Bytes;
//! use stream_relay::{RelayConfig, StreamRegistry};
//!
//! # async fn run() -> stream_relay::Result<()> {
//! let registry = StreamRegistry::with_config(RelayConfig::default().buffer_size(32));
//!
//! let publisher = registry.publish("live").await?;
//! let (mut subscriber, unsubscribe) = registry.subscribe("live").await?;
//!
//! publisher.send(Bytes::from_static(b"chunk")).await?;
//! assert_eq!(subscriber.recv().await, Some(Bytes::from_static(b"chunk")));
//!
//! unsubscribe.unsubscribe();
//! publisher.close();
//! # Ok(())
//! # }
//! ```

pub mod auth;
pub mod registry;
pub mod stats;

pub use auth::{Authenticator, HttpAuth, HttpAuthConfig, StaticAuth, StreamId, StreamMode};
pub use registry::{
    Publisher, RelayConfig, RelayError, Result, StreamRegistry, Subscriber, Unsubscribe,
};
pub use stats::{RelaySummary, StreamStatistics};
