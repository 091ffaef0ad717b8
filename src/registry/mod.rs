//! Remote stream registry and presentation order
//!
//! The registry owns every subscribed remote stream and the order they are
//! presented in:
//!
//! ```text
//!   entries: HashMap<Mid, RemoteEntry>      order: Vec<Mid>
//!   ┌──────┬──────────────┐                 ┌────┬────┬────┐
//!   │ "m1" │ handle, rid  │◄────────────────│ m2 │ m1 │ m3 │
//!   │ "m2" │ handle, rid  │                 └────┴────┴────┘
//!   │ "m3" │ handle, rid  │                   main  thumbnails
//!   └──────┴──────────────┘
//! ```
//!
//! Promotion swaps mids inside `order`; handles never move or get copied.
//! In-flight subscribes hold a `SubscribeTicket` that a later removal of
//! the same mid invalidates, so a late result cannot resurrect it.

pub mod entry;
pub mod presentation;
pub mod store;

pub use entry::{CommitOutcome, RemoteEntry, SubscribeTicket};
pub use store::RemoteRegistry;
