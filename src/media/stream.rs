//! Stream handles
//!
//! A [`StreamHandle`] represents one active media stream, local or remote,
//! identified by its `mid`.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::track::{MediaTrack, TrackKind};

/// Media/subscription identifier, unique among active streams of a session
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Mid(String);

impl Mid {
    /// Create a new mid
    pub fn new(mid: impl Into<String>) -> Self {
        Self(mid.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Mid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Mid {
    fn from(mid: &str) -> Self {
        Self::new(mid)
    }
}

impl From<String> for Mid {
    fn from(mid: String) -> Self {
        Self(mid)
    }
}

/// Opaque metadata attached to a remote stream at subscribe time
/// (e.g. participant identity). Carried unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StreamInfo(serde_json::Value);

impl StreamInfo {
    pub fn new(value: serde_json::Value) -> Self {
        Self(value)
    }

    /// Look up a top-level field
    pub fn get(&self, key: &str) -> Option<&serde_json::Value> {
        self.0.get(key)
    }

    /// Participant display name, if the publisher sent one
    pub fn name(&self) -> Option<&str> {
        self.get("name").and_then(|v| v.as_str())
    }

    pub fn as_value(&self) -> &serde_json::Value {
        &self.0
    }
}

impl From<serde_json::Value> for StreamInfo {
    fn from(value: serde_json::Value) -> Self {
        Self(value)
    }
}

/// The client's set of tracks for one published or subscribed stream
pub trait MediaStream: Send + Sync {
    /// Stream identifier assigned by the client
    fn id(&self) -> &str;

    /// All tracks in the stream
    fn tracks(&self) -> Vec<Arc<dyn MediaTrack>>;

    /// First track of the given kind
    fn track(&self, kind: TrackKind) -> Option<Arc<dyn MediaTrack>> {
        self.tracks().into_iter().find(|t| t.kind() == kind)
    }

    /// All video tracks, in stream order
    fn video_tracks(&self) -> Vec<Arc<dyn MediaTrack>> {
        self.tracks()
            .into_iter()
            .filter(|t| t.kind() == TrackKind::Video)
            .collect()
    }
}

/// One active media stream
#[derive(Clone)]
pub struct StreamHandle {
    /// Stable identifier of the stream
    pub mid: Mid,

    /// Underlying tracks, owned by the client
    pub stream: Arc<dyn MediaStream>,

    /// Metadata attached at subscribe time (remote streams only)
    pub info: Option<StreamInfo>,
}

impl StreamHandle {
    /// Create a handle without metadata
    pub fn new(mid: impl Into<Mid>, stream: Arc<dyn MediaStream>) -> Self {
        Self {
            mid: mid.into(),
            stream,
            info: None,
        }
    }

    /// Attach subscribe-time metadata
    pub fn with_info(mut self, info: StreamInfo) -> Self {
        self.info = Some(info);
        self
    }

    /// Stop every track of this stream.
    ///
    /// Only called for locally captured streams; remote tracks stay with the client.
    pub(crate) fn stop_tracks(&self) {
        for track in self.stream.tracks() {
            track.stop();
        }
    }
}

impl std::fmt::Debug for StreamHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StreamHandle")
            .field("mid", &self.mid)
            .field("stream", &self.stream.id())
            .field("info", &self.info)
            .finish()
    }
}
