//! Presentation order
//!
//! Position 0 of the registry order is the main view; every later position
//! is a thumbnail, rendered in order. Removal compacts the order, so the
//! next stream becomes main without a separate promotion.

use crate::media::{Mid, StreamHandle};

use super::store::RemoteRegistry;

impl RemoteRegistry {
    /// Move `mid` to the main view
    ///
    /// Swaps positions 0 and `i`: the outgoing main stream lands exactly
    /// where the promoted one was, every other position is untouched.
    /// Returns `false` when nothing moved (already main, or unknown mid).
    pub fn promote(&mut self, mid: &Mid) -> bool {
        match self.position(mid) {
            Some(0) => false,
            Some(index) => {
                self.order.swap(0, index);
                tracing::debug!(mid = %mid, from = index, "Promoted to main view");
                true
            }
            None => {
                tracing::debug!(mid = %mid, "Promote for unknown remote stream");
                false
            }
        }
    }

    /// Stream shown in the main view
    pub fn main(&self) -> Option<&StreamHandle> {
        self.order
            .first()
            .and_then(|mid| self.entries.get(mid))
            .map(|entry| &entry.handle)
    }

    /// Streams shown as thumbnails, in order
    pub fn thumbnails(&self) -> Vec<&StreamHandle> {
        self.order
            .iter()
            .skip(1)
            .filter_map(|mid| self.entries.get(mid))
            .map(|entry| &entry.handle)
            .collect()
    }
}
