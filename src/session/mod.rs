//! Local session state and the observable snapshot

pub mod local;
pub mod state;
pub mod watcher;

pub use local::{LocalMedia, LocalSource};
pub use state::ConferenceState;
pub use watcher::EndedWatch;
