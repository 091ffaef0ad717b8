//! Events emitted by the real-time client

use crate::media::{Mid, StreamInfo};

/// Remote stream notification from the client
#[derive(Debug, Clone, PartialEq)]
pub enum ClientEvent {
    /// A remote publish became available (`stream-add`)
    StreamAdd {
        /// Remote peer id, needed to subscribe
        rid: String,
        mid: Mid,
        info: StreamInfo,
    },

    /// A remote publish ended (`stream-remove`)
    StreamRemove { rid: String, mid: Mid },
}

impl ClientEvent {
    /// The stream this event refers to
    pub fn mid(&self) -> &Mid {
        match self {
            ClientEvent::StreamAdd { mid, .. } | ClientEvent::StreamRemove { mid, .. } => mid,
        }
    }
}
