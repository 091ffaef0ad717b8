//! Remote stream entry
//!
//! Per-stream state stored in the remote registry.

use std::time::Instant;

use crate::media::{Mid, StreamHandle};

/// Entry for a single subscribed remote stream
#[derive(Debug, Clone)]
pub struct RemoteEntry {
    /// Subscribed handle, tagged with its stream-add metadata
    pub handle: StreamHandle,

    /// Remote peer the stream was subscribed from
    pub rid: String,

    /// When the subscribe was committed
    pub subscribed_at: Instant,
}

impl RemoteEntry {
    pub(super) fn new(rid: String, handle: StreamHandle) -> Self {
        Self {
            handle,
            rid,
            subscribed_at: Instant::now(),
        }
    }
}

/// Proof that a subscribe was started for a mid
///
/// Invalidated when the stream is removed or re-added while the subscribe
/// is still in flight.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubscribeTicket {
    pub(super) mid: Mid,
    pub(super) generation: u64,
}

impl SubscribeTicket {
    pub fn mid(&self) -> &Mid {
        &self.mid
    }
}

/// Result of committing a resolved subscribe
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitOutcome {
    /// New stream joined at the end of the order
    Appended,
    /// Duplicate mid, the existing entry was replaced in place
    Replaced,
    /// Ticket was invalidated, the result was discarded
    Stale,
}
