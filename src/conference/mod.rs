//! Conference coordinator and its configuration

pub mod config;
pub mod coordinator;

pub use config::ConferenceConfig;
pub use coordinator::Conference;
