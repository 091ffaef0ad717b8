//! Real-time client contract
//!
//! The coordinator consumes, but never implements, a signaling/SFU client:
//! - `publish` / `unpublish` for local capture
//! - `subscribe` for remote streams
//! - a broadcast of `stream-add` / `stream-remove` notifications

pub mod event;
#[cfg(test)]
pub(crate) mod mock;
pub mod options;

use async_trait::async_trait;
use tokio::sync::broadcast;

use crate::error::ClientError;
use crate::media::{Mid, StreamHandle};

pub use event::ClientEvent;
pub use options::{PublishOptions, VideoCodec};

/// Capability handle for the external real-time client
///
/// Injected into the coordinator at construction.
#[async_trait]
pub trait RtcClient: Send + Sync + 'static {
    /// Local identity, used to namespace locally rendered view ids
    fn uid(&self) -> &str;

    /// Register a listener for remote stream events.
    ///
    /// Dropping the receiver unregisters it. The channel must be sized for
    /// the largest burst of stream-add / stream-remove a session can see: a
    /// lagging receiver loses events, and a lost stream-remove leaves a
    /// stream registered that the client no longer offers.
    fn events(&self) -> broadcast::Receiver<ClientEvent>;

    /// Capture and publish local media
    async fn publish(&self, options: PublishOptions) -> Result<StreamHandle, ClientError>;

    /// Stop publishing the stream with the given mid
    async fn unpublish(&self, mid: &Mid) -> Result<(), ClientError>;

    /// Subscribe to a remote stream
    async fn subscribe(&self, rid: &str, mid: &Mid) -> Result<StreamHandle, ClientError>;
}
