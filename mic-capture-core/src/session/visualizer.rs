use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;

use crate::models::artifact::WaveformFrame;
use crate::traits::audio_graph::AnalyserNode;
use crate::traits::frame_scheduler::{FrameRequestId, FrameScheduler};

/// Listener called with the latest frame on every tick.
pub type WaveformListener = Arc<dyn Fn(&WaveformFrame) + Send + Sync + 'static>;

/// Handle returned by `add_listener`, used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaveformListenerId(u64);

struct VisualizerShared {
    scheduler: Arc<dyn FrameScheduler>,
    running: AtomicBool,
    pending: Mutex<Option<FrameRequestId>>,
    analyser: Mutex<Option<Arc<dyn AnalyserNode>>>,
    bins: AtomicUsize,
    latest: Mutex<WaveformFrame>,
    listeners: Mutex<Vec<(u64, WaveformListener)>>,
    next_listener_id: AtomicU64,
}

/// Pulls amplitude data from the audio graph on a cooperative per-frame
/// loop and republishes it as the current waveform frame.
///
/// The loop is modeled as an explicitly cancellable task: started only
/// after a successful `Recording` transition, and canceled as the first
/// step of cleanup through the single `cancel` ownership point. An orphaned
/// loop referencing a closed audio graph is a resource leak, not a
/// cosmetic issue.
///
/// There is no frame queue: consumers only ever care about the most recent
/// amplitude snapshot.
pub struct Visualizer {
    shared: Arc<VisualizerShared>,
}

impl Visualizer {
    pub fn new(scheduler: Arc<dyn FrameScheduler>) -> Self {
        Self {
            shared: Arc::new(VisualizerShared {
                scheduler,
                running: AtomicBool::new(false),
                pending: Mutex::new(None),
                analyser: Mutex::new(None),
                bins: AtomicUsize::new(0),
                latest: Mutex::new(WaveformFrame::silent(0)),
                listeners: Mutex::new(Vec::new()),
                next_listener_id: AtomicU64::new(0),
            }),
        }
    }

    /// Attach the analyser and start the frame loop.
    pub fn start(&self, analyser: Arc<dyn AnalyserNode>, bins: usize) {
        let shared = &self.shared;
        *shared.analyser.lock() = Some(analyser);
        shared.bins.store(bins, Ordering::SeqCst);
        *shared.latest.lock() = WaveformFrame::silent(bins);
        shared.running.store(true, Ordering::SeqCst);
        VisualizerShared::schedule(shared);
    }

    /// Stop the loop, cancel any pending frame and drop the analyser
    /// reference. Safe to call repeatedly.
    pub fn cancel(&self) {
        let shared = &self.shared;
        shared.running.store(false, Ordering::SeqCst);
        if let Some(id) = shared.pending.lock().take() {
            shared.scheduler.cancel_frame(id);
        }
        shared.analyser.lock().take();
    }

    pub fn is_running(&self) -> bool {
        self.shared.running.load(Ordering::SeqCst)
    }

    /// Snapshot of the newest frame.
    pub fn latest_frame(&self) -> WaveformFrame {
        self.shared.latest.lock().clone()
    }

    pub fn add_listener(&self, listener: WaveformListener) -> WaveformListenerId {
        let id = self.shared.next_listener_id.fetch_add(1, Ordering::SeqCst);
        self.shared.listeners.lock().push((id, listener));
        WaveformListenerId(id)
    }

    pub fn remove_listener(&self, id: WaveformListenerId) {
        self.shared
            .listeners
            .lock()
            .retain(|(lid, _)| *lid != id.0);
    }
}

impl VisualizerShared {
    fn schedule(shared: &Arc<VisualizerShared>) {
        let task = Arc::clone(shared);
        let id = shared
            .scheduler
            .request_frame(Box::new(move || VisualizerShared::tick(&task)));
        *shared.pending.lock() = Some(id);
    }

    fn tick(shared: &Arc<VisualizerShared>) {
        if !shared.running.load(Ordering::SeqCst) {
            return;
        }
        shared.pending.lock().take();

        let analyser = shared.analyser.lock().clone();
        let Some(analyser) = analyser else {
            return;
        };

        let bins = shared.bins.load(Ordering::SeqCst);
        let mut frame = WaveformFrame::silent(bins);
        analyser.read_amplitudes(&mut frame.samples);

        *shared.latest.lock() = frame.clone();

        let listeners: Vec<WaveformListener> = shared
            .listeners
            .lock()
            .iter()
            .map(|(_, l)| l.clone())
            .collect();
        for listener in listeners {
            listener(&frame);
        }

        if shared.running.load(Ordering::SeqCst) {
            VisualizerShared::schedule(shared);
        }
    }
}
