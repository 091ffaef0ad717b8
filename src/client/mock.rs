//! In-memory client for tests

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::sync::{broadcast, oneshot, watch};

use crate::error::ClientError;
use crate::media::{MediaStream, MediaTrack, Mid, StreamHandle, StreamInfo, TrackKind};

use super::{ClientEvent, PublishOptions, RtcClient};

pub(crate) struct MockTrack {
    id: String,
    kind: TrackKind,
    enabled: AtomicBool,
    stopped: AtomicBool,
    ended: watch::Sender<bool>,
}

impl MockTrack {
    pub(crate) fn new(id: impl Into<String>, kind: TrackKind) -> Arc<Self> {
        let (ended, _) = watch::channel(false);
        Arc::new(Self {
            id: id.into(),
            kind,
            enabled: AtomicBool::new(true),
            stopped: AtomicBool::new(false),
            ended,
        })
    }

    pub(crate) fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::SeqCst)
    }

    /// Simulate the capture being ended outside the coordinator
    pub(crate) fn fire_ended(&self) {
        self.ended.send_replace(true);
    }
}

#[async_trait]
impl MediaTrack for MockTrack {
    fn id(&self) -> &str {
        &self.id
    }

    fn kind(&self) -> TrackKind {
        self.kind
    }

    fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::SeqCst)
    }

    fn set_enabled(&self, enabled: bool) {
        self.enabled.store(enabled, Ordering::SeqCst);
    }

    fn stop(&self) {
        self.stopped.store(true, Ordering::SeqCst);
    }

    async fn ended(&self) {
        let mut rx = self.ended.subscribe();
        let _ = rx.wait_for(|ended| *ended).await;
    }
}

pub(crate) struct MockStream {
    id: String,
    tracks: Vec<Arc<MockTrack>>,
}

impl MockStream {
    pub(crate) fn new(id: impl Into<String>, kinds: &[TrackKind]) -> Arc<Self> {
        let id = id.into();
        let tracks = kinds
            .iter()
            .map(|kind| MockTrack::new(format!("{}-{}", id, kind), *kind))
            .collect();
        Arc::new(Self { id, tracks })
    }

    pub(crate) fn mock_track(&self, kind: TrackKind) -> Option<Arc<MockTrack>> {
        self.tracks.iter().find(|t| t.kind == kind).cloned()
    }

    pub(crate) fn all_stopped(&self) -> bool {
        self.tracks.iter().all(|t| t.is_stopped())
    }
}

impl MediaStream for MockStream {
    fn id(&self) -> &str {
        &self.id
    }

    fn tracks(&self) -> Vec<Arc<dyn MediaTrack>> {
        self.tracks
            .iter()
            .map(|t| Arc::clone(t) as Arc<dyn MediaTrack>)
            .collect()
    }
}

#[derive(Default)]
struct MockState {
    next_local: u32,
    publishes: Vec<PublishOptions>,
    published: Vec<Arc<MockStream>>,
    unpublished: Vec<Mid>,
    subscribed: Vec<Mid>,
    subscribe_streams: HashMap<Mid, Arc<MockStream>>,
    fail_publish: Option<ClientError>,
    fail_unpublish: Option<ClientError>,
    fail_subscribe: HashMap<Mid, ClientError>,
    publish_gates: VecDeque<oneshot::Receiver<()>>,
    subscribe_gates: HashMap<Mid, oneshot::Receiver<()>>,
}

/// Scriptable stand-in for the real-time client
pub(crate) struct MockClient {
    uid: String,
    events_tx: broadcast::Sender<ClientEvent>,
    state: Mutex<MockState>,
}

impl MockClient {
    pub(crate) fn new() -> Arc<Self> {
        Self::with_capacity(64)
    }

    pub(crate) fn with_capacity(capacity: usize) -> Arc<Self> {
        let (events_tx, _) = broadcast::channel(capacity);
        Arc::new(Self {
            uid: "local-user".into(),
            events_tx,
            state: Mutex::new(MockState::default()),
        })
    }

    pub(crate) fn emit(&self, event: ClientEvent) {
        let _ = self.events_tx.send(event);
    }

    pub(crate) fn emit_add(&self, mid: &str, name: &str) {
        self.emit(ClientEvent::StreamAdd {
            rid: "room".into(),
            mid: Mid::from(mid),
            info: StreamInfo::from(serde_json::json!({ "name": name })),
        });
    }

    pub(crate) fn emit_remove(&self, mid: &str) {
        self.emit(ClientEvent::StreamRemove {
            rid: "room".into(),
            mid: Mid::from(mid),
        });
    }

    /// Number of registered event listeners
    pub(crate) fn listener_count(&self) -> usize {
        self.events_tx.receiver_count()
    }

    pub(crate) fn fail_next_publish(&self, err: ClientError) {
        self.state.lock().fail_publish = Some(err);
    }

    pub(crate) fn fail_unpublish(&self, err: ClientError) {
        self.state.lock().fail_unpublish = Some(err);
    }

    pub(crate) fn fail_subscribe(&self, mid: &str, err: ClientError) {
        self.state.lock().fail_subscribe.insert(Mid::from(mid), err);
    }

    /// Hold the next publish until the returned sender fires
    pub(crate) fn gate_publish(&self) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.state.lock().publish_gates.push_back(rx);
        tx
    }

    /// Hold the subscribe for `mid` until the returned sender fires
    pub(crate) fn gate_subscribe(&self, mid: &str) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.state.lock().subscribe_gates.insert(Mid::from(mid), rx);
        tx
    }

    pub(crate) fn publish_calls(&self) -> Vec<PublishOptions> {
        self.state.lock().publishes.clone()
    }

    pub(crate) fn published(&self, index: usize) -> Option<Arc<MockStream>> {
        self.state.lock().published.get(index).cloned()
    }

    pub(crate) fn unpublished(&self) -> Vec<Mid> {
        self.state.lock().unpublished.clone()
    }

    pub(crate) fn subscribed(&self) -> Vec<Mid> {
        self.state.lock().subscribed.clone()
    }

    pub(crate) fn subscribed_stream(&self, mid: &str) -> Option<Arc<MockStream>> {
        self.state.lock().subscribe_streams.get(&Mid::from(mid)).cloned()
    }
}

#[async_trait]
impl RtcClient for MockClient {
    fn uid(&self) -> &str {
        &self.uid
    }

    fn events(&self) -> broadcast::Receiver<ClientEvent> {
        self.events_tx.subscribe()
    }

    async fn publish(&self, options: PublishOptions) -> Result<StreamHandle, ClientError> {
        let gate = self.state.lock().publish_gates.pop_front();
        if let Some(gate) = gate {
            let _ = gate.await;
        }

        let mut state = self.state.lock();
        state.publishes.push(options.clone());
        if let Some(err) = state.fail_publish.take() {
            return Err(err);
        }

        state.next_local += 1;
        let mid = format!("local-{}", state.next_local);
        let mut kinds = Vec::new();
        if options.audio {
            kinds.push(TrackKind::Audio);
        }
        if options.video || options.screen {
            kinds.push(TrackKind::Video);
        }
        let stream = MockStream::new(mid.clone(), &kinds);
        state.published.push(Arc::clone(&stream));

        Ok(StreamHandle::new(mid, stream))
    }

    async fn unpublish(&self, mid: &Mid) -> Result<(), ClientError> {
        let mut state = self.state.lock();
        state.unpublished.push(mid.clone());
        match state.fail_unpublish.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    async fn subscribe(&self, _rid: &str, mid: &Mid) -> Result<StreamHandle, ClientError> {
        let gate = self.state.lock().subscribe_gates.remove(mid);
        if let Some(gate) = gate {
            let _ = gate.await;
        }

        let mut state = self.state.lock();
        state.subscribed.push(mid.clone());
        if let Some(err) = state.fail_subscribe.remove(mid) {
            return Err(err);
        }

        let stream = MockStream::new(format!("remote-{}", mid), &[TrackKind::Audio, TrackKind::Video]);
        state.subscribe_streams.insert(mid.clone(), Arc::clone(&stream));

        Ok(StreamHandle::new(mid.clone(), stream))
    }
}
