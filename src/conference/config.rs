//! Conference configuration

use crate::client::{PublishOptions, VideoCodec};

/// Conference configuration options
#[derive(Debug, Clone)]
pub struct ConferenceConfig {
    /// Codec preference sent with every publish
    pub codec: VideoCodec,

    /// Request audio alongside screen capture
    pub screen_audio: bool,

    /// Capture resolution preset
    pub resolution: String,

    /// Target publish bandwidth in kbps
    pub bandwidth: u32,
}

impl Default for ConferenceConfig {
    fn default() -> Self {
        Self {
            codec: VideoCodec::Vp8,
            screen_audio: true,
            resolution: "hd".into(),
            bandwidth: 1024,
        }
    }
}

impl ConferenceConfig {
    /// Set the codec preference
    pub fn codec(mut self, codec: VideoCodec) -> Self {
        self.codec = codec;
        self
    }

    /// Publish screen shares without audio
    pub fn disable_screen_audio(mut self) -> Self {
        self.screen_audio = false;
        self
    }

    /// Set the capture resolution preset
    pub fn resolution(mut self, resolution: impl Into<String>) -> Self {
        self.resolution = resolution.into();
        self
    }

    /// Set the target bandwidth
    pub fn bandwidth(mut self, kbps: u32) -> Self {
        self.bandwidth = kbps;
        self
    }

    /// Publish options for the camera/microphone stream
    pub fn camera_options(&self) -> PublishOptions {
        PublishOptions::camera(self.codec)
            .resolution(self.resolution.clone())
            .bandwidth(self.bandwidth)
    }

    /// Publish options for a screen share
    pub fn screen_options(&self) -> PublishOptions {
        PublishOptions::screen(self.codec, self.screen_audio)
            .resolution(self.resolution.clone())
            .bandwidth(self.bandwidth)
    }
}
