//! Observable conference state
//!
//! An immutable snapshot of everything a renderer needs, published after
//! every committed mutation.

use crate::media::{Mid, StreamHandle};

/// Snapshot of the conference state
#[derive(Debug, Clone, Default)]
pub struct ConferenceState {
    /// Subscribed remote streams in presentation order
    pub remote_streams: Vec<StreamHandle>,

    /// Published camera/microphone stream
    pub local_stream: Option<StreamHandle>,

    /// Published screen share
    pub local_screen: Option<StreamHandle>,

    /// Local audio track disabled
    pub audio_muted: bool,

    /// Local video track disabled
    pub video_muted: bool,
}

impl ConferenceState {
    /// Stream shown in the main view
    pub fn main(&self) -> Option<&StreamHandle> {
        self.remote_streams.first()
    }

    /// Streams shown as thumbnails, in order
    pub fn thumbnails(&self) -> &[StreamHandle] {
        self.remote_streams.get(1..).unwrap_or(&[])
    }

    /// No remote participant is being received yet
    pub fn is_waiting(&self) -> bool {
        self.remote_streams.is_empty()
    }

    pub fn stream_count(&self) -> usize {
        self.remote_streams.len()
    }

    /// Remote mids in presentation order
    pub fn remote_mids(&self) -> Vec<&Mid> {
        self.remote_streams.iter().map(|h| &h.mid).collect()
    }
}
