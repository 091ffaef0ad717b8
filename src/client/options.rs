//! Publish options

use serde::{Deserialize, Serialize};

/// Video codec preference sent with a publish request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VideoCodec {
    Vp8,
    Vp9,
    H264,
}

impl VideoCodec {
    pub fn as_str(&self) -> &'static str {
        match self {
            VideoCodec::Vp8 => "vp8",
            VideoCodec::Vp9 => "vp9",
            VideoCodec::H264 => "h264",
        }
    }
}

impl std::fmt::Display for VideoCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Options for an outbound publish
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishOptions {
    /// Preferred video codec
    pub codec: VideoCodec,
    /// Capture resolution preset (e.g. "hd")
    pub resolution: String,
    /// Target bandwidth in kbps
    pub bandwidth: u32,
    /// Capture audio
    pub audio: bool,
    /// Capture camera video
    pub video: bool,
    /// Capture the screen
    pub screen: bool,
}

impl PublishOptions {
    /// Camera + microphone publish
    pub fn camera(codec: VideoCodec) -> Self {
        Self {
            codec,
            resolution: "hd".into(),
            bandwidth: 1024,
            audio: true,
            video: true,
            screen: false,
        }
    }

    /// Screen capture publish
    pub fn screen(codec: VideoCodec, with_audio: bool) -> Self {
        Self {
            codec,
            resolution: "hd".into(),
            bandwidth: 1024,
            audio: with_audio,
            video: false,
            screen: true,
        }
    }

    /// Set the resolution preset
    pub fn resolution(mut self, resolution: impl Into<String>) -> Self {
        self.resolution = resolution.into();
        self
    }

    /// Set the target bandwidth
    pub fn bandwidth(mut self, kbps: u32) -> Self {
        self.bandwidth = kbps;
        self
    }
}
