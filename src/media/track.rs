//! Media track capability
//!
//! Tracks are created and owned by the real-time client. The coordinator
//! only toggles them, stops them, and listens for external termination.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Kind of a media track
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrackKind {
    /// Microphone or system audio
    Audio,
    /// Camera or screen capture
    Video,
}

impl TrackKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TrackKind::Audio => "audio",
            TrackKind::Video => "video",
        }
    }
}

impl std::fmt::Display for TrackKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single audio or video track inside a media stream
#[async_trait]
pub trait MediaTrack: Send + Sync {
    /// Track identifier assigned by the client
    fn id(&self) -> &str;

    /// Track kind
    fn kind(&self) -> TrackKind;

    /// Whether the track currently produces media
    fn is_enabled(&self) -> bool;

    /// Enable or disable (mute) the track without releasing the device
    fn set_enabled(&self, enabled: bool);

    /// Stop the track and release its capture device
    fn stop(&self);

    /// Resolves once the track has ended, whoever ended it.
    ///
    /// For a screen capture this fires when the user revokes sharing through
    /// the OS or browser chrome. Must resolve immediately if the track has
    /// already ended.
    async fn ended(&self);
}
