//! Local media state
//!
//! Tracks the locally published camera/microphone stream, the screen share,
//! and the mute flags of the local stream.

use crate::error::{Error, Result};
use crate::media::{StreamHandle, TrackKind};

use super::watcher::EndedWatch;

/// Which local capture a view or intent refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LocalSource {
    /// Camera + microphone
    Camera,
    /// Screen capture
    Screen,
}

impl LocalSource {
    /// Suffix of the locally rendered view id
    pub fn view_suffix(&self) -> &'static str {
        match self {
            LocalSource::Camera => "video",
            LocalSource::Screen => "screen",
        }
    }
}

/// Local publish state
///
/// At most one camera stream and one screen share exist at a time, each
/// backed by exactly one publish session.
#[derive(Debug, Default)]
pub struct LocalMedia {
    stream: Option<StreamHandle>,
    screen: Option<StreamHandle>,
    screen_watch: Option<EndedWatch>,
    audio_muted: bool,
    video_muted: bool,
}

impl LocalMedia {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stream(&self) -> Option<&StreamHandle> {
        self.stream.as_ref()
    }

    pub fn screen(&self) -> Option<&StreamHandle> {
        self.screen.as_ref()
    }

    pub fn audio_muted(&self) -> bool {
        self.audio_muted
    }

    pub fn video_muted(&self) -> bool {
        self.video_muted
    }

    /// Store a freshly published camera stream; its tracks start unmuted
    pub(crate) fn set_stream(&mut self, handle: StreamHandle) {
        self.stream = Some(handle);
        self.reset_mutes();
    }

    pub(crate) fn take_stream(&mut self) -> Option<StreamHandle> {
        let handle = self.stream.take();
        if handle.is_some() {
            self.reset_mutes();
        }
        handle
    }

    pub(crate) fn set_screen(&mut self, handle: StreamHandle, watch: Option<EndedWatch>) {
        self.screen = Some(handle);
        self.screen_watch = watch;
    }

    /// Take the screen share, cancelling its ended watch
    pub(crate) fn take_screen(&mut self) -> Option<StreamHandle> {
        if let Some(watch) = self.screen_watch.take() {
            watch.cancel();
        }
        self.screen.take()
    }

    /// Enable or disable the first local track of `kind`
    ///
    /// The mute flag follows the request even when the stream carries no
    /// track of that kind. Returns whether a track was toggled.
    pub fn set_track_enabled(&mut self, kind: TrackKind, enabled: bool) -> Result<bool> {
        let stream = self.stream.as_ref().ok_or(Error::NoLocalStream)?;

        let toggled = match stream.stream.track(kind) {
            Some(track) => {
                track.set_enabled(enabled);
                true
            }
            None => {
                tracing::debug!(mid = %stream.mid, kind = %kind, "No local track of this kind");
                false
            }
        };

        match kind {
            TrackKind::Audio => self.audio_muted = !enabled,
            TrackKind::Video => self.video_muted = !enabled,
        }

        Ok(toggled)
    }

    fn reset_mutes(&mut self) {
        self.audio_muted = false;
        self.video_muted = false;
    }
}
