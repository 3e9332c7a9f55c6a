use std::path::PathBuf;
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::broadcast;

use pose_coach_types::{FullResult, OverlayResult, SimpleResult};

use crate::gateway::{AnalysisRequest, PoseApi, PoseGateway, Variant};

const STATE_CHANNEL_CAPACITY: usize = 16;

/// What the display layer sees. Exactly one shape at a time: `Idle` exists
/// only before the first intent, and a terminal shape persists until the
/// next intent overwrites it.
#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisState {
    Idle,
    Loading,
    Simple(SimpleResult),
    Full(FullResult),
    Overlay(OverlayResult),
    Failed(String),
}

impl AnalysisState {
    pub fn is_loading(&self) -> bool {
        matches!(self, AnalysisState::Loading)
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, AnalysisState::Idle | AnalysisState::Loading)
    }
}

/// Single writer slot plus the stream of transitions. The slot write and the
/// channel send happen under one lock so slot order and channel order agree.
struct StateSlot {
    current: Mutex<AnalysisState>,
    tx: broadcast::Sender<AnalysisState>,
}

impl StateSlot {
    fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self {
            current: Mutex::new(AnalysisState::Idle),
            tx,
        }
    }

    /// Claims the in-flight slot. Fails without publishing anything when a
    /// request is already running.
    fn try_begin(&self) -> bool {
        let mut current = self.current.lock();
        if current.is_loading() {
            return false;
        }
        *current = AnalysisState::Loading;
        if self.tx.send(AnalysisState::Loading).is_err() {
            tracing::debug!("state change had no subscribers");
        }
        true
    }

    fn finish(&self, terminal: AnalysisState) {
        let mut current = self.current.lock();
        *current = terminal.clone();
        if self.tx.send(terminal).is_err() {
            tracing::debug!("state change had no subscribers");
        }
    }
}

/// The request orchestrator: accepts intents, keeps at most one request in
/// flight, and publishes every state transition in order. Entry points must
/// be called from inside a tokio runtime; the gateway call is spawned onto
/// it while the caller returns immediately.
pub struct PoseSession {
    api: Arc<dyn PoseApi + Send + Sync>,
    slot: Arc<StateSlot>,
}

impl PoseSession {
    /// Session backed by a live gateway.
    pub fn new(gateway: PoseGateway) -> Self {
        Self::with_api(Arc::new(gateway))
    }

    /// Session over any `PoseApi`, real or mock.
    pub fn with_api(api: Arc<dyn PoseApi + Send + Sync>) -> Self {
        Self {
            api,
            slot: Arc::new(StateSlot::new(STATE_CHANNEL_CAPACITY)),
        }
    }

    /// Latest published state. A terminal value persists here until the next
    /// intent overwrites it.
    pub fn current(&self) -> AnalysisState {
        self.slot.current.lock().clone()
    }

    /// Every transition, in publish order: `Loading` always arrives before
    /// the terminal state of the same request. A new receiver only sees
    /// transitions published after it subscribed.
    pub fn subscribe(&self) -> broadcast::Receiver<AnalysisState> {
        self.slot.tx.subscribe()
    }

    pub fn start_simple(&self, image_path: impl Into<PathBuf>, mode: Option<&str>) {
        self.start(
            Variant::Simple,
            AnalysisRequest::new(image_path, mode.map(str::to_string)),
        );
    }

    pub fn start_full(&self, image_path: impl Into<PathBuf>, mode: Option<&str>) {
        self.start(
            Variant::Full,
            AnalysisRequest::new(image_path, mode.map(str::to_string)),
        );
    }

    pub fn start_overlay(&self, image_path: impl Into<PathBuf>, mode: Option<&str>) {
        self.start(
            Variant::Overlay,
            AnalysisRequest::new(image_path, mode.map(str::to_string)),
        );
    }

    fn start(&self, variant: Variant, request: AnalysisRequest) {
        if !self.slot.try_begin() {
            tracing::warn!(?variant, "analysis already in flight, intent dropped");
            return;
        }

        let api = Arc::clone(&self.api);
        // The task only keeps a weak handle: a result that lands after the
        // session was dropped is discarded, not published.
        let slot = Arc::downgrade(&self.slot);
        tokio::spawn(async move {
            let outcome = match variant {
                Variant::Simple => api.analyze_simple(request).await.map(AnalysisState::Simple),
                Variant::Full => api.analyze_full(request).await.map(AnalysisState::Full),
                Variant::Overlay => api
                    .analyze_overlay(request)
                    .await
                    .map(AnalysisState::Overlay),
            };
            let terminal = outcome.unwrap_or_else(|err| AnalysisState::Failed(err.to_string()));
            match slot.upgrade() {
                Some(slot) => slot.finish(terminal),
                None => tracing::debug!(?variant, "session dropped before result arrived"),
            }
        });
    }
}
