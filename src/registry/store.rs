//! Remote stream registry
//!
//! Holds every subscribed remote stream in an arena keyed by mid, plus the
//! explicit presentation order over those mids. Index 0 of the order is
//! the main view.

use std::collections::HashMap;

use crate::media::{Mid, StreamHandle};

use super::entry::{CommitOutcome, RemoteEntry, SubscribeTicket};

/// Registry of subscribed remote streams
///
/// The set of mids in `order` always equals the key set of `entries`.
#[derive(Debug, Default)]
pub struct RemoteRegistry {
    /// Arena of subscribed streams
    pub(super) entries: HashMap<Mid, RemoteEntry>,

    /// Presentation order over `entries`
    pub(super) order: Vec<Mid>,

    /// In-flight subscribes and the generation that may commit them
    pending: HashMap<Mid, u64>,

    next_generation: u64,
}

impl RemoteRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that a subscribe for `mid` is in flight
    ///
    /// A later call for the same mid supersedes the earlier ticket.
    pub fn begin_subscribe(&mut self, mid: &Mid) -> SubscribeTicket {
        self.next_generation += 1;
        let generation = self.next_generation;
        if self.pending.insert(mid.clone(), generation).is_some() {
            tracing::debug!(mid = %mid, "Superseding in-flight subscribe");
        }

        SubscribeTicket {
            mid: mid.clone(),
            generation,
        }
    }

    /// Commit a resolved subscribe
    ///
    /// New streams are appended at the end; they are never promoted to main.
    pub fn commit_subscribe(
        &mut self,
        ticket: &SubscribeTicket,
        rid: impl Into<String>,
        handle: StreamHandle,
    ) -> CommitOutcome {
        if !self.take_pending(ticket) {
            tracing::debug!(mid = %ticket.mid, "Discarding stale subscribe result");
            return CommitOutcome::Stale;
        }

        let mid = ticket.mid.clone();
        let entry = RemoteEntry::new(rid.into(), handle);

        if let Some(existing) = self.entries.get_mut(&mid) {
            tracing::warn!(
                mid = %mid,
                "Duplicate remote stream committed, replacing existing entry"
            );
            *existing = entry;
            return CommitOutcome::Replaced;
        }

        self.entries.insert(mid.clone(), entry);
        self.order.push(mid.clone());

        tracing::info!(
            mid = %mid,
            streams = self.order.len(),
            "Remote stream added"
        );

        CommitOutcome::Appended
    }

    /// Forget a subscribe that failed
    pub fn abandon_subscribe(&mut self, ticket: &SubscribeTicket) {
        self.take_pending(ticket);
    }

    /// Whether a subscribe for `mid` is still in flight
    pub fn is_pending(&self, mid: &Mid) -> bool {
        self.pending.contains_key(mid)
    }

    /// Remove a stream
    ///
    /// Also invalidates an in-flight subscribe for the same mid. Removing an
    /// unknown mid is a no-op. The remote tracks are left to the client.
    pub fn remove(&mut self, mid: &Mid) -> Option<StreamHandle> {
        let was_pending = self.pending.remove(mid).is_some();

        let Some(entry) = self.entries.remove(mid) else {
            tracing::debug!(mid = %mid, was_pending, "Remove for unknown remote stream");
            return None;
        };
        self.order.retain(|m| m != mid);

        tracing::info!(
            mid = %mid,
            streams = self.order.len(),
            "Remote stream removed"
        );

        Some(entry.handle)
    }

    /// Drop every stream and in-flight subscribe
    pub fn clear(&mut self) {
        self.entries.clear();
        self.order.clear();
        self.pending.clear();
    }

    /// Get a stream entry
    pub fn get(&self, mid: &Mid) -> Option<&RemoteEntry> {
        self.entries.get(mid)
    }

    /// Check if a stream is subscribed
    pub fn contains(&self, mid: &Mid) -> bool {
        self.entries.contains_key(mid)
    }

    /// Current presentation index of a mid
    pub fn position(&self, mid: &Mid) -> Option<usize> {
        self.order.iter().position(|m| m == mid)
    }

    /// Mids in presentation order
    pub fn mids(&self) -> &[Mid] {
        &self.order
    }

    /// Handles in presentation order
    pub fn handles(&self) -> Vec<StreamHandle> {
        self.order
            .iter()
            .filter_map(|mid| self.entries.get(mid))
            .map(|entry| entry.handle.clone())
            .collect()
    }

    /// Number of subscribed streams
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Check if no stream is subscribed
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    fn take_pending(&mut self, ticket: &SubscribeTicket) -> bool {
        match self.pending.get(&ticket.mid) {
            Some(generation) if *generation == ticket.generation => {
                self.pending.remove(&ticket.mid);
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use crate::client::mock::MockStream;
    use crate::media::{StreamInfo, TrackKind};

    use super::*;

    fn handle(mid: &str) -> StreamHandle {
        StreamHandle::new(mid, MockStream::new(mid, &[TrackKind::Video]))
    }

    fn add(registry: &mut RemoteRegistry, mid: &str) -> CommitOutcome {
        let ticket = registry.begin_subscribe(&Mid::from(mid));
        registry.commit_subscribe(&ticket, "rid", handle(mid))
    }

    fn assert_consistent(registry: &RemoteRegistry) {
        let ordered: HashSet<&Mid> = registry.order.iter().collect();
        let stored: HashSet<&Mid> = registry.entries.keys().collect();
        assert_eq!(ordered.len(), registry.order.len(), "duplicate mid in order");
        assert_eq!(ordered, stored);
    }

    #[test]
    fn test_add_appends() {
        let mut registry = RemoteRegistry::new();
        let ticket = registry.begin_subscribe(&Mid::from("m1"));
        let info = StreamInfo::from(serde_json::json!({ "name": "Alice" }));
        let outcome = registry.commit_subscribe(&ticket, "r1", handle("m1").with_info(info));

        assert_eq!(outcome, CommitOutcome::Appended);
        assert_eq!(add(&mut registry, "m2"), CommitOutcome::Appended);
        assert_eq!(registry.mids(), &[Mid::from("m1"), Mid::from("m2")]);

        let entry = registry.get(&Mid::from("m1")).unwrap();
        assert_eq!(entry.rid, "r1");
        assert_eq!(entry.handle.info.as_ref().and_then(|i| i.name()), Some("Alice"));
        assert_consistent(&registry);
    }

    #[test]
    fn test_commit_in_resolve_order() {
        let mut registry = RemoteRegistry::new();
        let first = registry.begin_subscribe(&Mid::from("m1"));
        let second = registry.begin_subscribe(&Mid::from("m2"));

        registry.commit_subscribe(&second, "r", handle("m2"));
        registry.commit_subscribe(&first, "r", handle("m1"));

        assert_eq!(registry.mids(), &[Mid::from("m2"), Mid::from("m1")]);
    }

    #[test]
    fn test_remove_is_idempotent() {
        let mut registry = RemoteRegistry::new();
        add(&mut registry, "m1");
        add(&mut registry, "m2");

        assert!(registry.remove(&Mid::from("m1")).is_some());
        assert!(registry.remove(&Mid::from("m1")).is_none());
        assert!(registry.remove(&Mid::from("never")).is_none());
        assert_eq!(registry.mids(), &[Mid::from("m2")]);
        assert_consistent(&registry);
    }

    #[test]
    fn test_remove_invalidates_pending_subscribe() {
        let mut registry = RemoteRegistry::new();
        let ticket = registry.begin_subscribe(&Mid::from("m1"));
        assert!(registry.is_pending(&Mid::from("m1")));

        registry.remove(&Mid::from("m1"));
        let outcome = registry.commit_subscribe(&ticket, "r", handle("m1"));

        assert_eq!(outcome, CommitOutcome::Stale);
        assert!(registry.is_empty());
        assert!(!registry.is_pending(&Mid::from("m1")));
    }

    #[test]
    fn test_newer_subscribe_supersedes() {
        let mut registry = RemoteRegistry::new();
        let old = registry.begin_subscribe(&Mid::from("m1"));
        let new = registry.begin_subscribe(&Mid::from("m1"));

        assert_eq!(registry.commit_subscribe(&old, "r", handle("m1")), CommitOutcome::Stale);
        assert_eq!(registry.commit_subscribe(&new, "r", handle("m1")), CommitOutcome::Appended);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_duplicate_commit_replaces_in_place() {
        let mut registry = RemoteRegistry::new();
        add(&mut registry, "m1");
        add(&mut registry, "m2");

        assert_eq!(add(&mut registry, "m1"), CommitOutcome::Replaced);
        assert_eq!(registry.mids(), &[Mid::from("m1"), Mid::from("m2")]);
        assert_consistent(&registry);
    }

    #[test]
    fn test_abandon_subscribe() {
        let mut registry = RemoteRegistry::new();
        let ticket = registry.begin_subscribe(&Mid::from("m1"));
        registry.abandon_subscribe(&ticket);

        assert!(!registry.is_pending(&Mid::from("m1")));
        assert_eq!(registry.commit_subscribe(&ticket, "r", handle("m1")), CommitOutcome::Stale);
    }

    #[test]
    fn test_random_sequences_stay_consistent() {
        let mut registry = RemoteRegistry::new();
        let mids = ["a", "b", "c", "d"];
        // xorshift; deterministic sequence of add/remove/promote
        let mut seed: u32 = 0x9E37_79B9;
        for _ in 0..500 {
            seed ^= seed << 13;
            seed ^= seed >> 17;
            seed ^= seed << 5;
            let mid = mids[(seed % 4) as usize];
            match (seed >> 8) % 3 {
                0 => {
                    add(&mut registry, mid);
                }
                1 => {
                    registry.remove(&Mid::from(mid));
                }
                _ => {
                    registry.promote(&Mid::from(mid));
                }
            }
            assert_consistent(&registry);
        }
    }

    #[test]
    fn test_clear() {
        let mut registry = RemoteRegistry::new();
        add(&mut registry, "m1");
        registry.begin_subscribe(&Mid::from("m2"));

        registry.clear();

        assert!(registry.is_empty());
        assert!(!registry.is_pending(&Mid::from("m2")));
        assert!(registry.handles().is_empty());
    }
}
