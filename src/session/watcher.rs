//! Track-ended watcher
//!
//! A one-shot, cancellable subscription to a track's ended signal. Used for
//! screen shares, which the user can stop from the OS or browser chrome
//! without going through the coordinator.

use std::future::Future;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::media::{MediaTrack, Mid};

/// Registration of an ended listener on one track
///
/// Dropping the watch cancels it; a cancelled watch never invokes its
/// callback.
#[derive(Debug)]
pub struct EndedWatch {
    mid: Mid,
    token: CancellationToken,
}

impl EndedWatch {
    /// Spawn a task that runs `on_ended` once `track` ends.
    ///
    /// The callback receives the watch token so it can re-check, under its
    /// own serialization, that the watch was not cancelled meanwhile.
    /// Must be called from within a tokio runtime.
    pub fn spawn<F, Fut>(mid: Mid, track: Arc<dyn MediaTrack>, on_ended: F) -> Self
    where
        F: FnOnce(CancellationToken) -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let token = CancellationToken::new();
        let watch_token = token.clone();
        let watched = mid.clone();

        tokio::spawn(async move {
            tokio::select! {
                biased;
                _ = watch_token.cancelled() => {}
                _ = track.ended() => {
                    tracing::info!(mid = %watched, track = track.id(), "Track ended externally");
                    on_ended(watch_token.clone()).await;
                }
            }
        });

        Self { mid, token }
    }

    pub fn mid(&self) -> &Mid {
        &self.mid
    }

    /// Cancel the watch
    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }
}

impl Drop for EndedWatch {
    fn drop(&mut self) {
        self.token.cancel();
    }
}
