//! Publish and play authorization
//!
//! The relay core never authenticates anything itself. The transport layer
//! parses a [`StreamId`] from the connecting client, asks an
//! [`Authenticator`], and only calls into the registry when access is granted.
//!
//! Implementations must not block indefinitely and must treat any failure to
//! reach their backend as a denial.

pub mod http;
pub mod stream_id;

use std::future::Future;

pub use http::{AuthError, HttpAuth, HttpAuthConfig};
pub use stream_id::{StreamId, StreamIdError, StreamMode};

/// Decides whether a publish or play request may proceed
pub trait Authenticator: Send + Sync {
    /// Returns true to permit, false to deny
    fn authenticate(&self, stream_id: &StreamId) -> impl Future<Output = bool> + Send;
}

/// Authenticator with a fixed answer
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StaticAuth {
    #[default]
    AllowAll,
    DenyAll,
}

impl Authenticator for StaticAuth {
    async fn authenticate(&self, stream_id: &StreamId) -> bool {
        let allowed = *self == StaticAuth::AllowAll;
        if !allowed {
            tracing::debug!(stream = %stream_id.name(), mode = %stream_id.mode(), "Denied by static auth");
        }
        allowed
    }
}
