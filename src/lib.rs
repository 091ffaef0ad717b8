//! Session-state coordinator for multi-party real-time media calls
//!
//! `conference-rs` tracks which media streams of a call are active, mediates
//! publish / unpublish / subscribe against an external real-time client, and
//! keeps the presentation order of remote streams (one main view, the rest
//! thumbnails).
//!
//! ```text
//!   client events ──► Conference ──► RemoteRegistry ──► ConferenceState ──► UI
//!   (stream-add/remove)    ▲          (arena + order)     (watch channel)
//!                          │
//!   user intents ──────────┘──► RtcClient::publish / unpublish
//!   (mute, share, promote)
//! ```
//!
//! The client is injected as an [`RtcClient`] trait object; nothing here
//! performs signaling, media transport or rendering.

pub mod client;
pub mod conference;
pub mod error;
pub mod media;
pub mod registry;
pub mod session;

pub use client::{ClientEvent, PublishOptions, RtcClient, VideoCodec};
pub use conference::{Conference, ConferenceConfig};
pub use error::{ClientError, Error, Result};
pub use media::{MediaStream, MediaTrack, Mid, StreamHandle, StreamInfo, TrackKind};
pub use registry::{CommitOutcome, RemoteRegistry};
pub use session::{ConferenceState, LocalSource};
