//! Fake capability implementations for tests.
//!
//! These stand in for the injected browser capabilities: media devices,
//! streams and tracks, a streaming recorder, the audio graph, and the frame
//! scheduler. They record enough bookkeeping for tests to assert resource
//! release and call ordering.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;

use crate::models::config::{AudioConstraints, SessionConfig};
use crate::models::error::{CaptureError, MediaAccessError};
use crate::models::events::{
    PermissionDeniedEvent, RecordingErrorEvent, RecordingStartedEvent, RecordingStoppedEvent,
};
use crate::session::audio_session::{new_shared_session, SharedSession};
use crate::session::controller::RecordingController;
use crate::session::machine::StateMachine;
use crate::session::reaper::ResourceReaper;
use crate::session::visualizer::Visualizer;
use crate::traits::audio_graph::{AnalyserNode, AudioContext, AudioGraph, ContextState};
use crate::traits::frame_scheduler::{FrameRequestId, FrameScheduler};
use crate::traits::media::{MediaDevices, MediaStream, MediaTrack, TrackState};
use crate::traits::platform_adapter::{Platform, PlatformAdapter};
use crate::traits::recorder::{
    ChunkCallback, FinalizeCallback, MimeSupport, RecorderFactory, StreamingRecorder,
};
use crate::traits::session_observer::SessionObserver;

// --- Media devices ---

pub struct FakeTrack {
    state: Mutex<TrackState>,
}

impl FakeTrack {
    pub fn live() -> Self {
        Self {
            state: Mutex::new(TrackState::Live),
        }
    }
}

impl MediaTrack for FakeTrack {
    fn stop(&self) {
        *self.state.lock() = TrackState::Ended;
    }

    fn ready_state(&self) -> TrackState {
        *self.state.lock()
    }
}

pub struct FakeStream {
    tracks: Vec<Arc<FakeTrack>>,
}

impl FakeStream {
    pub fn is_live(&self) -> bool {
        self.tracks
            .iter()
            .any(|t| t.ready_state() == TrackState::Live)
    }
}

impl MediaStream for FakeStream {
    fn audio_tracks(&self) -> Vec<Arc<dyn MediaTrack>> {
        self.tracks
            .iter()
            .map(|t| Arc::clone(t) as Arc<dyn MediaTrack>)
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionMode {
    Grant,
    Deny,
    NoDevice,
    Unsupported,
}

pub struct FakeMediaDevices {
    mode: Mutex<PermissionMode>,
    streams: Mutex<Vec<Arc<FakeStream>>>,
    /// Live-stream count observed at the moment of each grant, so tests can
    /// assert the old session was released before a new stream was acquired.
    live_at_grant: Mutex<Vec<usize>>,
}

impl FakeMediaDevices {
    pub fn new(mode: PermissionMode) -> Self {
        Self {
            mode: Mutex::new(mode),
            streams: Mutex::new(Vec::new()),
            live_at_grant: Mutex::new(Vec::new()),
        }
    }

    pub fn set_mode(&self, mode: PermissionMode) {
        *self.mode.lock() = mode;
    }

    pub fn live_stream_count(&self) -> usize {
        self.streams.lock().iter().filter(|s| s.is_live()).count()
    }

    pub fn live_at_each_grant(&self) -> Vec<usize> {
        self.live_at_grant.lock().clone()
    }

    pub fn new_live_stream(&self) -> Arc<dyn MediaStream> {
        self.live_at_grant.lock().push(self.live_stream_count());
        let stream = Arc::new(FakeStream {
            tracks: vec![Arc::new(FakeTrack::live())],
        });
        self.streams.lock().push(Arc::clone(&stream));
        stream
    }
}

impl MediaDevices for FakeMediaDevices {
    fn get_user_media(
        &self,
        _constraints: &AudioConstraints,
    ) -> Result<Arc<dyn MediaStream>, MediaAccessError> {
        match *self.mode.lock() {
            PermissionMode::Grant => Ok(self.new_live_stream()),
            PermissionMode::Deny => Err(MediaAccessError::NotAllowed),
            PermissionMode::NoDevice => Err(MediaAccessError::NotFound),
            PermissionMode::Unsupported => Err(MediaAccessError::NotSupported),
        }
    }
}

// --- Streaming recorder ---

#[derive(Debug, Clone, Copy, Default)]
pub struct RecorderBehavior {
    pub fail_create: bool,
    pub fail_start: bool,
    pub fail_stop: bool,
    /// Never fire the finalize callback, forcing the bounded-wait path.
    pub hang_finalize: bool,
}

pub struct FakeRecorder {
    mime: String,
    behavior: RecorderBehavior,
    active: AtomicBool,
    on_chunk: Mutex<Option<ChunkCallback>>,
    started_with: Mutex<Option<Duration>>,
}

impl FakeRecorder {
    /// Push a synthetic encoded chunk through the registered callback.
    pub fn deliver_chunk(&self, bytes: &[u8]) {
        let callback = self.on_chunk.lock().clone();
        if let Some(callback) = callback {
            callback(bytes);
        }
    }

    pub fn started_interval(&self) -> Option<Duration> {
        *self.started_with.lock()
    }
}

impl StreamingRecorder for FakeRecorder {
    fn start(&self, chunk_interval: Duration, on_chunk: ChunkCallback) -> Result<(), CaptureError> {
        if self.behavior.fail_start {
            return Err(CaptureError::RecorderSetup("start refused".into()));
        }
        *self.started_with.lock() = Some(chunk_interval);
        *self.on_chunk.lock() = Some(on_chunk);
        self.active.store(true, Ordering::SeqCst);
        Ok(())
    }

    fn request_stop(&self, on_finalize: FinalizeCallback) -> Result<(), CaptureError> {
        self.active.store(false, Ordering::SeqCst);
        if self.behavior.fail_stop {
            return Err(CaptureError::Stop("stop refused".into()));
        }
        if !self.behavior.hang_finalize {
            on_finalize();
        }
        Ok(())
    }

    fn mime_type(&self) -> String {
        self.mime.clone()
    }

    fn is_active(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }
}

pub struct FakeRecorderFactory {
    supported: Mutex<Vec<String>>,
    /// Container the recorder picks when asked to choose (empty request).
    default_mime: Mutex<String>,
    behavior: Mutex<RecorderBehavior>,
    created: Mutex<Vec<Arc<FakeRecorder>>>,
}

impl FakeRecorderFactory {
    pub fn new() -> Self {
        Self {
            supported: Mutex::new(vec!["audio/webm".to_string()]),
            default_mime: Mutex::new("audio/webm".to_string()),
            behavior: Mutex::new(RecorderBehavior::default()),
            created: Mutex::new(Vec::new()),
        }
    }

    pub fn set_supported(&self, types: &[&str]) {
        *self.supported.lock() = types.iter().map(|s| s.to_string()).collect();
    }

    pub fn set_default_mime(&self, mime: &str) {
        *self.default_mime.lock() = mime.to_string();
    }

    pub fn set_behavior(&self, behavior: RecorderBehavior) {
        *self.behavior.lock() = behavior;
    }

    pub fn last_recorder(&self) -> Option<Arc<FakeRecorder>> {
        self.created.lock().last().cloned()
    }
}

impl Default for FakeRecorderFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl MimeSupport for FakeRecorderFactory {
    fn is_type_supported(&self, mime_type: &str) -> bool {
        self.supported.lock().iter().any(|t| t == mime_type)
    }
}

impl RecorderFactory for FakeRecorderFactory {
    fn create(
        &self,
        _stream: &Arc<dyn MediaStream>,
        mime_type: &str,
    ) -> Result<Arc<dyn StreamingRecorder>, CaptureError> {
        let behavior = *self.behavior.lock();
        if behavior.fail_create {
            return Err(CaptureError::RecorderSetup("construction refused".into()));
        }
        let mime = if mime_type.is_empty() {
            self.default_mime.lock().clone()
        } else {
            mime_type.to_string()
        };
        let recorder = Arc::new(FakeRecorder {
            mime,
            behavior,
            active: AtomicBool::new(false),
            on_chunk: Mutex::new(None),
            started_with: Mutex::new(None),
        });
        self.created.lock().push(Arc::clone(&recorder));
        Ok(recorder)
    }
}

// --- Audio graph ---

pub struct FakeAnalyser {
    bins: usize,
    level: f32,
    disconnected: AtomicBool,
}

impl FakeAnalyser {
    pub fn new(bins: usize, level: f32) -> Self {
        Self {
            bins,
            level,
            disconnected: AtomicBool::new(false),
        }
    }

    pub fn is_disconnected(&self) -> bool {
        self.disconnected.load(Ordering::SeqCst)
    }
}

impl AnalyserNode for FakeAnalyser {
    fn bin_count(&self) -> usize {
        self.bins
    }

    fn read_amplitudes(&self, out: &mut [f32]) {
        for sample in out.iter_mut() {
            *sample = self.level;
        }
    }

    fn disconnect(&self) {
        self.disconnected.store(true, Ordering::SeqCst);
    }
}

pub struct FakeContext {
    state: Mutex<ContextState>,
    calls: Mutex<Vec<&'static str>>,
    close_count: AtomicUsize,
    fail_close: AtomicBool,
    analysers: Mutex<Vec<Arc<FakeAnalyser>>>,
}

impl FakeContext {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(ContextState::Running),
            calls: Mutex::new(Vec::new()),
            close_count: AtomicUsize::new(0),
            fail_close: AtomicBool::new(false),
            analysers: Mutex::new(Vec::new()),
        }
    }

    pub fn call_sequence(&self) -> Vec<&'static str> {
        self.calls.lock().clone()
    }

    pub fn close_count(&self) -> usize {
        self.close_count.load(Ordering::SeqCst)
    }

    pub fn fail_close(&self) {
        self.fail_close.store(true, Ordering::SeqCst);
    }

    pub fn last_analyser(&self) -> Option<Arc<FakeAnalyser>> {
        self.analysers.lock().last().cloned()
    }
}

impl Default for FakeContext {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioContext for FakeContext {
    fn create_analyser(
        &self,
        _stream: &Arc<dyn MediaStream>,
        bins: usize,
    ) -> Result<Arc<dyn AnalyserNode>, CaptureError> {
        let analyser = Arc::new(FakeAnalyser::new(bins, 0.25));
        self.analysers.lock().push(Arc::clone(&analyser));
        Ok(analyser)
    }

    fn suspend(&self) -> Result<(), CaptureError> {
        self.calls.lock().push("suspend");
        *self.state.lock() = ContextState::Suspended;
        Ok(())
    }

    fn close(&self) -> Result<(), CaptureError> {
        self.calls.lock().push("close");
        self.close_count.fetch_add(1, Ordering::SeqCst);
        if self.fail_close.load(Ordering::SeqCst) {
            return Err(CaptureError::AudioGraph("close refused".into()));
        }
        *self.state.lock() = ContextState::Closed;
        Ok(())
    }

    fn state(&self) -> ContextState {
        *self.state.lock()
    }
}

pub struct FakeGraph {
    contexts: Mutex<Vec<Arc<FakeContext>>>,
}

impl FakeGraph {
    pub fn new() -> Self {
        Self {
            contexts: Mutex::new(Vec::new()),
        }
    }

    pub fn last_context(&self) -> Option<Arc<FakeContext>> {
        self.contexts.lock().last().cloned()
    }

    pub fn last_analyser(&self) -> Option<Arc<FakeAnalyser>> {
        self.last_context().and_then(|c| c.last_analyser())
    }

    pub fn context_count(&self) -> usize {
        self.contexts.lock().len()
    }
}

impl Default for FakeGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioGraph for FakeGraph {
    fn create_context(&self) -> Result<Arc<dyn AudioContext>, CaptureError> {
        let context = Arc::new(FakeContext::new());
        self.contexts.lock().push(Arc::clone(&context));
        Ok(context)
    }
}

// --- Frame scheduler ---

type FrameEntry = (u64, Box<dyn FnOnce() + Send + 'static>);

/// Deterministic scheduler: tests pump frames explicitly.
pub struct ManualScheduler {
    queue: Mutex<VecDeque<FrameEntry>>,
    cancelled: Mutex<Vec<u64>>,
    next_id: AtomicU64,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self {
            queue: Mutex::new(VecDeque::new()),
            cancelled: Mutex::new(Vec::new()),
            next_id: AtomicU64::new(0),
        }
    }

    /// Queued requests, cancelled ones included.
    pub fn pending_count(&self) -> usize {
        self.queue.lock().len()
    }

    /// Queued requests that have not been cancelled.
    pub fn live_pending_count(&self) -> usize {
        let cancelled = self.cancelled.lock();
        self.queue
            .lock()
            .iter()
            .filter(|(id, _)| !cancelled.contains(id))
            .count()
    }

    /// Run the next non-cancelled frame callback, if any.
    pub fn run_next(&self) -> bool {
        loop {
            let entry = self.queue.lock().pop_front();
            let Some((id, callback)) = entry else {
                return false;
            };
            if self.cancelled.lock().contains(&id) {
                continue;
            }
            callback();
            return true;
        }
    }

    /// Run every frame queued at the time of the call (not ones they
    /// enqueue), skipping cancelled entries.
    pub fn run_all(&self) {
        let batch = self.queue.lock().len();
        for _ in 0..batch {
            let entry = self.queue.lock().pop_front();
            let Some((id, callback)) = entry else {
                return;
            };
            if self.cancelled.lock().contains(&id) {
                continue;
            }
            callback();
        }
    }
}

impl Default for ManualScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameScheduler for ManualScheduler {
    fn request_frame(&self, callback: Box<dyn FnOnce() + Send + 'static>) -> FrameRequestId {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        self.queue.lock().push_back((id, callback));
        FrameRequestId(id)
    }

    fn cancel_frame(&self, id: FrameRequestId) {
        self.cancelled.lock().push(id.0);
    }
}

// --- Platform adapter ---

/// Standard-platform adapter over the fake capabilities: negotiates from a
/// fixed candidate list and closes the context directly on teardown.
pub struct FakePlatform {
    pub devices: Arc<FakeMediaDevices>,
    pub graph: Arc<FakeGraph>,
}

impl PlatformAdapter for FakePlatform {
    fn platform(&self) -> Platform {
        Platform::Standard
    }

    fn request_permission(
        &self,
        constraints: &AudioConstraints,
    ) -> Result<Arc<dyn MediaStream>, CaptureError> {
        self.devices
            .get_user_media(constraints)
            .map_err(CaptureError::from)
    }

    fn select_mime_type(&self, support: &dyn MimeSupport) -> String {
        for candidate in ["audio/webm;codecs=opus", "audio/webm"] {
            if support.is_type_supported(candidate) {
                return candidate.to_string();
            }
        }
        String::new()
    }

    fn create_audio_context(&self) -> Result<Arc<dyn AudioContext>, CaptureError> {
        self.graph.create_context()
    }

    fn teardown_context(&self, context: &dyn AudioContext) -> Result<(), CaptureError> {
        context.close()
    }
}

// --- Observer ---

#[derive(Default)]
pub struct RecordingObserver {
    pub started: Mutex<Vec<RecordingStartedEvent>>,
    pub stopped: Mutex<Vec<RecordingStoppedEvent>>,
    pub errors: Mutex<Vec<RecordingErrorEvent>>,
    pub denied: Mutex<Vec<PermissionDeniedEvent>>,
}

impl SessionObserver for RecordingObserver {
    fn on_recording_started(&self, event: &RecordingStartedEvent) {
        self.started.lock().push(event.clone());
    }

    fn on_recording_stopped(&self, event: &RecordingStoppedEvent) {
        self.stopped.lock().push(event.clone());
    }

    fn on_recording_error(&self, event: &RecordingErrorEvent) {
        self.errors.lock().push(event.clone());
    }

    fn on_permission_denied(&self, event: &PermissionDeniedEvent) {
        self.denied.lock().push(event.clone());
    }
}

// --- Assembled rig ---

/// A controller plus direct handles to its internals and fakes.
pub struct TestRig {
    pub controller: RecordingController,
    pub devices: Arc<FakeMediaDevices>,
    pub graph: Arc<FakeGraph>,
    pub recorders: Arc<FakeRecorderFactory>,
    pub scheduler: Arc<ManualScheduler>,
    pub machine: Arc<StateMachine>,
    pub session: SharedSession,
    pub visualizer: Arc<Visualizer>,
    pub reaper: Arc<ResourceReaper>,
    pub observer: Arc<RecordingObserver>,
}

impl TestRig {
    pub fn start_recording(&self) -> Result<(), CaptureError> {
        self.controller.start_session()
    }
}

/// Short timeouts keep the bounded-wait tests fast.
pub fn test_config() -> SessionConfig {
    SessionConfig {
        chunk_interval: Duration::from_millis(10),
        finalize_timeout: Duration::from_millis(50),
        track_stop_timeout: Duration::from_millis(50),
        track_poll_interval: Duration::from_millis(1),
        ios_suspend_close_delay: Duration::from_millis(5),
        ..SessionConfig::default()
    }
}

pub fn test_rig() -> TestRig {
    test_rig_with_mode(PermissionMode::Grant)
}

pub fn test_rig_with_mode(mode: PermissionMode) -> TestRig {
    let config = test_config();
    let devices = Arc::new(FakeMediaDevices::new(mode));
    let graph = Arc::new(FakeGraph::new());
    let recorders = Arc::new(FakeRecorderFactory::new());
    let scheduler = Arc::new(ManualScheduler::new());
    let platform = Arc::new(FakePlatform {
        devices: Arc::clone(&devices),
        graph: Arc::clone(&graph),
    });

    let machine = Arc::new(StateMachine::new());
    let session = new_shared_session();
    let visualizer = Arc::new(Visualizer::new(
        Arc::clone(&scheduler) as Arc<dyn FrameScheduler>
    ));
    let reaper = Arc::new(ResourceReaper::new(
        Arc::clone(&platform) as Arc<dyn PlatformAdapter>,
        Arc::clone(&machine),
        Arc::clone(&session),
        Arc::clone(&visualizer),
        config.clone(),
    ));

    let controller = RecordingController::with_parts(
        config,
        Arc::clone(&platform) as Arc<dyn PlatformAdapter>,
        Arc::clone(&recorders) as Arc<dyn RecorderFactory>,
        Arc::clone(&machine),
        Arc::clone(&session),
        Arc::clone(&visualizer),
        Arc::clone(&reaper),
    );

    let observer = Arc::new(RecordingObserver::default());
    controller.add_observer(Arc::clone(&observer) as Arc<dyn SessionObserver>);

    TestRig {
        controller,
        devices,
        graph,
        recorders,
        scheduler,
        machine,
        session,
        visualizer,
        reaper,
        observer,
    }
}
