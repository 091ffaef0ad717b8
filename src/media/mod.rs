//! Media stream and track abstractions
//!
//! This module provides:
//! - `Mid` and `StreamInfo` identifiers and metadata
//! - `StreamHandle`, the coordinator's view of one active stream
//! - `MediaStream` / `MediaTrack`, the capabilities the client hands out

pub mod stream;
pub mod track;

pub use stream::{MediaStream, Mid, StreamHandle, StreamInfo};
pub use track::{MediaTrack, TrackKind};
