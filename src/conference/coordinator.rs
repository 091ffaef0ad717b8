//! Conference coordinator
//!
//! Owns the local media state and the remote registry for one call session,
//! applies client events and user intents to them, and publishes a snapshot
//! after every committed change.
//!
//! All state lives behind one short-lived lock that is never held across an
//! await. Every client call is awaited with the lock released, and its result
//! is re-validated against the current state before it is committed.

use std::sync::{Arc, Weak};

use parking_lot::Mutex;
use tokio::sync::broadcast::error::RecvError;
use tokio::sync::{watch, Mutex as OpLock};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::client::{ClientEvent, RtcClient};
use crate::error::{Error, Result};
use crate::media::{Mid, StreamHandle, StreamInfo, TrackKind};
use crate::registry::{CommitOutcome, RemoteRegistry, SubscribeTicket};
use crate::session::{ConferenceState, EndedWatch, LocalMedia, LocalSource};

use super::config::ConferenceConfig;

struct Core {
    local: LocalMedia,
    remote: RemoteRegistry,
    closed: bool,
}

impl Core {
    fn snapshot(&self) -> ConferenceState {
        ConferenceState {
            remote_streams: self.remote.handles(),
            local_stream: self.local.stream().cloned(),
            local_screen: self.local.screen().cloned(),
            audio_muted: self.local.audio_muted(),
            video_muted: self.local.video_muted(),
        }
    }

    fn local(&self, source: LocalSource) -> Option<&StreamHandle> {
        match source {
            LocalSource::Camera => self.local.stream(),
            LocalSource::Screen => self.local.screen(),
        }
    }
}

struct Inner {
    client: Arc<dyn RtcClient>,
    config: ConferenceConfig,
    core: Mutex<Core>,
    state_tx: watch::Sender<ConferenceState>,
    /// Serializes camera intents across their publish/unpublish awaits
    camera_op: OpLock<()>,
    /// Serializes screen intents, including the ended watcher
    screen_op: OpLock<()>,
    pump: Mutex<Option<JoinHandle<()>>>,
}

impl Inner {
    fn commit(&self, core: &Core) {
        self.state_tx.send_replace(core.snapshot());
    }

    fn op_lock(&self, source: LocalSource) -> &OpLock<()> {
        match source {
            LocalSource::Camera => &self.camera_op,
            LocalSource::Screen => &self.screen_op,
        }
    }

    fn attach(self: &Arc<Self>) -> bool {
        let mut pump = self.pump.lock();
        if pump.is_some() {
            tracing::debug!("Already attached to client events");
            return true;
        }
        if self.core.lock().closed {
            tracing::debug!("Attach on closed conference ignored");
            return false;
        }
        let runtime = match tokio::runtime::Handle::try_current() {
            Ok(runtime) => runtime,
            Err(_) => {
                tracing::warn!("Attach called outside a runtime, client events not handled");
                return false;
            }
        };

        let mut events = self.client.events();
        let weak: Weak<Self> = Arc::downgrade(self);

        *pump = Some(runtime.spawn(async move {
            loop {
                let event = match events.recv().await {
                    Ok(event) => event,
                    Err(RecvError::Lagged(skipped)) => {
                        // Lost events cannot be replayed; the registry may
                        // now hold streams the client already removed.
                        tracing::error!(skipped = skipped, "Client event receiver lagged");
                        continue;
                    }
                    Err(RecvError::Closed) => {
                        tracing::info!("Client event stream closed");
                        break;
                    }
                };

                let Some(inner) = weak.upgrade() else {
                    break;
                };
                inner.dispatch(event);
            }
        }));

        tracing::info!(uid = self.client.uid(), "Attached to client events");
        true
    }

    async fn detach(&self) {
        let pump = self.pump.lock().take();
        if let Some(pump) = pump {
            pump.abort();
            let _ = pump.await;
            tracing::info!(uid = self.client.uid(), "Detached from client events");
        }
    }

    fn dispatch(self: &Arc<Self>, event: ClientEvent) {
        match event {
            ClientEvent::StreamAdd { rid, mid, info } => {
                // The ticket is taken before spawning so a stream-remove
                // queued right behind this event invalidates it.
                let ticket = match self.begin_subscribe(&mid) {
                    Ok(ticket) => ticket,
                    Err(_) => return,
                };

                let inner = Arc::clone(self);
                tokio::spawn(async move {
                    if let Err(e) = inner.finish_subscribe(ticket, rid, info).await {
                        tracing::debug!(mid = %mid, error = %e, "Remote stream not added");
                    }
                });
            }
            ClientEvent::StreamRemove { rid, mid } => {
                tracing::debug!(mid = %mid, rid = %rid, "Stream remove notification");
                self.on_stream_removed(&mid);
            }
        }
    }

    fn begin_subscribe(&self, mid: &Mid) -> Result<SubscribeTicket> {
        let mut core = self.core.lock();
        if core.closed {
            return Err(Error::Closed);
        }
        Ok(core.remote.begin_subscribe(mid))
    }

    async fn finish_subscribe(
        &self,
        ticket: SubscribeTicket,
        rid: String,
        info: StreamInfo,
    ) -> Result<CommitOutcome> {
        let result = self.client.subscribe(&rid, ticket.mid()).await;

        let mut core = self.core.lock();
        let mut handle = match result {
            Ok(handle) => handle,
            Err(e) => {
                core.remote.abandon_subscribe(&ticket);
                tracing::warn!(mid = %ticket.mid(), rid = %rid, error = %e, "Subscribe failed");
                return Err(e.into());
            }
        };

        if core.closed {
            tracing::debug!(mid = %ticket.mid(), "Subscribe resolved after close, discarding");
            return Err(Error::Closed);
        }

        handle.mid = ticket.mid().clone();
        let outcome = core.remote.commit_subscribe(&ticket, rid, handle.with_info(info));
        if outcome != CommitOutcome::Stale {
            self.commit(&core);
        }

        Ok(outcome)
    }

    fn on_stream_removed(&self, mid: &Mid) -> bool {
        let mut core = self.core.lock();
        let removed = core.remote.remove(mid).is_some();
        if removed {
            self.commit(&core);
        }
        removed
    }

    fn promote(&self, mid: &Mid) -> bool {
        let mut core = self.core.lock();
        if core.closed {
            return false;
        }
        let moved = core.remote.promote(mid);
        if moved {
            self.commit(&core);
        }
        moved
    }

    fn current_local(&self, source: LocalSource) -> Result<Option<StreamHandle>> {
        let core = self.core.lock();
        if core.closed {
            return Err(Error::Closed);
        }
        Ok(core.local(source).cloned())
    }

    async fn publish_local(self: &Arc<Self>, source: LocalSource) -> Result<StreamHandle> {
        let _op = self.op_lock(source).lock().await;

        if let Some(existing) = self.current_local(source)? {
            tracing::debug!(mid = %existing.mid, source = ?source, "Already publishing");
            return Ok(existing);
        }

        let options = match source {
            LocalSource::Camera => self.config.camera_options(),
            LocalSource::Screen => self.config.screen_options(),
        };

        let handle = match self.client.publish(options).await {
            Ok(handle) => handle,
            Err(e) => {
                tracing::warn!(source = ?source, error = %e, "Publish failed");
                return Err(e.into());
            }
        };

        let watch = match source {
            LocalSource::Camera => None,
            LocalSource::Screen => self.watch_screen(&handle),
        };

        let rejected = {
            let mut core = self.core.lock();
            if core.closed {
                Some(watch)
            } else {
                match source {
                    LocalSource::Camera => core.local.set_stream(handle.clone()),
                    LocalSource::Screen => core.local.set_screen(handle.clone(), watch),
                }
                self.commit(&core);
                None
            }
        };

        if let Some(watch) = rejected {
            drop(watch);
            tracing::debug!(mid = %handle.mid, "Publish resolved after close, releasing");
            self.release(&handle).await;
            return Err(Error::Closed);
        }

        tracing::info!(mid = %handle.mid, source = ?source, "Local stream published");
        Ok(handle)
    }

    fn watch_screen(self: &Arc<Self>, handle: &StreamHandle) -> Option<EndedWatch> {
        let track = handle.stream.video_tracks().into_iter().next()?;
        let weak = Arc::downgrade(self);

        Some(EndedWatch::spawn(handle.mid.clone(), track, move |token| async move {
            if let Some(inner) = weak.upgrade() {
                inner.unpublish_local(LocalSource::Screen, Some(token)).await;
            }
        }))
    }

    /// Stop a local capture.
    ///
    /// `expected` carries the ended-watch token when the stop comes from an
    /// external track end; a cancelled token means the share it watched is
    /// already gone.
    async fn unpublish_local(&self, source: LocalSource, expected: Option<CancellationToken>) {
        let _op = self.op_lock(source).lock().await;

        if expected.as_ref().is_some_and(|token| token.is_cancelled()) {
            tracing::debug!(source = ?source, "Ignoring ended event for a stopped share");
            return;
        }

        let handle = {
            let mut core = self.core.lock();
            let handle = match source {
                LocalSource::Camera => core.local.take_stream(),
                LocalSource::Screen => core.local.take_screen(),
            };
            if handle.is_some() {
                self.commit(&core);
            }
            handle
        };

        match handle {
            Some(handle) => self.release(&handle).await,
            None => {
                tracing::debug!(source = ?source, "Not publishing, nothing to stop");
            }
        }
    }

    /// Stop local tracks, then unpublish best-effort
    async fn release(&self, handle: &StreamHandle) {
        handle.stop_tracks();
        self.unpublish(&handle.mid).await;
    }

    async fn unpublish(&self, mid: &Mid) {
        match self.client.unpublish(mid).await {
            Ok(()) => {
                tracing::info!(mid = %mid, "Local stream unpublished");
            }
            Err(e) => {
                tracing::warn!(
                    mid = %mid,
                    error = %e,
                    "Unpublish failed, local state already released"
                );
            }
        }
    }

    fn set_track_enabled(&self, kind: TrackKind, enabled: bool) -> Result<()> {
        let mut core = self.core.lock();
        if core.closed {
            return Err(Error::Closed);
        }
        core.local.set_track_enabled(kind, enabled)?;
        self.commit(&core);

        tracing::debug!(kind = %kind, enabled = enabled, "Local track toggled");
        Ok(())
    }

    /// Synchronous part of teardown
    ///
    /// Marks the conference closed, stops every local track and clears all
    /// state. Returns the local handles that still need an unpublish.
    fn shutdown(&self) -> Vec<StreamHandle> {
        let handles: Vec<StreamHandle> = {
            let mut core = self.core.lock();
            if core.closed {
                return Vec::new();
            }
            core.closed = true;

            let handles: Vec<StreamHandle> = [core.local.take_stream(), core.local.take_screen()]
                .into_iter()
                .flatten()
                .collect();
            core.remote.clear();
            self.commit(&core);
            handles
        };

        for handle in &handles {
            handle.stop_tracks();
        }

        handles
    }
}

/// Session-state coordinator for one call
///
/// # Example
/// ```no_run
/// use std::sync::Arc;
/// use conference_rs::{Conference, RtcClient};
///
/// # async fn example(client: Arc<dyn RtcClient>) -> conference_rs::Result<()> {
/// let conference = Conference::new(client);
/// conference.attach();
///
/// conference.start_local_media().await?;
///
/// let mut state = conference.watch();
/// while state.changed().await.is_ok() {
///     if let Some(main) = state.borrow().main() {
///         println!("main view: {}", main.mid);
///     }
/// }
///
/// conference.close().await;
/// # Ok(())
/// # }
/// ```
pub struct Conference {
    inner: Arc<Inner>,
}

impl Conference {
    /// Create a coordinator with default configuration
    pub fn new(client: Arc<dyn RtcClient>) -> Self {
        Self::with_config(client, ConferenceConfig::default())
    }

    /// Create a coordinator with custom configuration
    pub fn with_config(client: Arc<dyn RtcClient>, config: ConferenceConfig) -> Self {
        let core = Core {
            local: LocalMedia::new(),
            remote: RemoteRegistry::new(),
            closed: false,
        };
        let (state_tx, _) = watch::channel(core.snapshot());

        Self {
            inner: Arc::new(Inner {
                client,
                config,
                core: Mutex::new(core),
                state_tx,
                camera_op: OpLock::new(()),
                screen_op: OpLock::new(()),
                pump: Mutex::new(None),
            }),
        }
    }

    /// Get the configuration
    pub fn config(&self) -> &ConferenceConfig {
        &self.inner.config
    }

    /// Local identity reported by the client
    pub fn uid(&self) -> &str {
        self.inner.client.uid()
    }

    /// Id of the locally rendered view for a capture, namespaced by uid
    pub fn local_view_id(&self, source: LocalSource) -> String {
        format!("{}-{}", self.uid(), source.view_suffix())
    }

    /// Current state snapshot
    pub fn state(&self) -> ConferenceState {
        self.inner.state_tx.borrow().clone()
    }

    /// Receiver notified after every committed change
    pub fn watch(&self) -> watch::Receiver<ConferenceState> {
        self.inner.state_tx.subscribe()
    }

    /// Check if the conference has been closed
    pub fn is_closed(&self) -> bool {
        self.inner.core.lock().closed
    }

    /// Start handling the client's stream-add / stream-remove events.
    ///
    /// Returns whether the conference is attached afterwards. No-op if
    /// already attached; refused when closed or outside a tokio runtime.
    pub fn attach(&self) -> bool {
        self.inner.attach()
    }

    /// Stop handling client events
    ///
    /// Unregisters the one listener `attach` registered. Subscribes already
    /// in flight still commit.
    pub async fn detach(&self) {
        self.inner.detach().await;
    }

    /// Check if client events are being handled
    pub fn is_attached(&self) -> bool {
        self.inner.pump.lock().is_some()
    }

    /// Subscribe to a newly available remote stream and append it
    ///
    /// Resolves once the subscribe has settled. A result whose stream was
    /// removed meanwhile is discarded (`CommitOutcome::Stale`).
    pub async fn on_stream_added(
        &self,
        rid: impl Into<String>,
        mid: impl Into<Mid>,
        info: StreamInfo,
    ) -> Result<CommitOutcome> {
        let mid: Mid = mid.into();
        let ticket = self.inner.begin_subscribe(&mid)?;
        self.inner.finish_subscribe(ticket, rid.into(), info).await
    }

    /// Remove a remote stream; unknown mids are ignored
    pub fn on_stream_removed(&self, mid: &Mid) -> bool {
        self.inner.on_stream_removed(mid)
    }

    /// Swap `mid` into the main view
    pub fn promote(&self, mid: &Mid) -> bool {
        self.inner.promote(mid)
    }

    /// Stream in the main view
    pub fn main(&self) -> Option<StreamHandle> {
        self.inner.core.lock().remote.main().cloned()
    }

    /// Thumbnail streams, in order
    pub fn thumbnails(&self) -> Vec<StreamHandle> {
        self.inner
            .core
            .lock()
            .remote
            .thumbnails()
            .into_iter()
            .cloned()
            .collect()
    }

    /// Publish camera + microphone
    ///
    /// Returns the existing handle if already publishing.
    pub async fn start_local_media(&self) -> Result<StreamHandle> {
        self.inner.publish_local(LocalSource::Camera).await
    }

    /// Stop and unpublish camera + microphone; no-op when not publishing
    pub async fn stop_local_media(&self) {
        self.inner.unpublish_local(LocalSource::Camera, None).await;
    }

    /// Publish a screen capture
    ///
    /// If the capture is ended outside the coordinator, the share is stopped
    /// exactly as `stop_screen_share` would.
    pub async fn start_screen_share(&self) -> Result<StreamHandle> {
        self.inner.publish_local(LocalSource::Screen).await
    }

    /// Stop and unpublish the screen capture; no-op when not sharing
    pub async fn stop_screen_share(&self) {
        self.inner.unpublish_local(LocalSource::Screen, None).await;
    }

    /// Enable or disable the local track of `kind`
    pub fn set_track_enabled(&self, kind: TrackKind, enabled: bool) -> Result<()> {
        self.inner.set_track_enabled(kind, enabled)
    }

    /// Tear the session down
    ///
    /// Detaches, stops every local track, clears all state, then unpublishes
    /// the local streams. Late publish/subscribe results are discarded.
    pub async fn close(&self) {
        self.inner.detach().await;
        let handles = self.inner.shutdown();
        for handle in &handles {
            self.inner.unpublish(&handle.mid).await;
        }
        tracing::info!(uid = self.uid(), "Conference closed");
    }
}

impl Drop for Conference {
    fn drop(&mut self) {
        let pump = self.inner.pump.lock().take();
        if let Some(pump) = pump {
            pump.abort();
        }

        let handles = self.inner.shutdown();
        if handles.is_empty() {
            return;
        }

        match tokio::runtime::Handle::try_current() {
            Ok(runtime) => {
                let inner = Arc::clone(&self.inner);
                runtime.spawn(async move {
                    for handle in &handles {
                        inner.unpublish(&handle.mid).await;
                    }
                });
            }
            Err(_) => {
                tracing::warn!(
                    streams = handles.len(),
                    "Conference dropped outside a runtime, local streams not unpublished"
                );
            }
        }
    }
}
