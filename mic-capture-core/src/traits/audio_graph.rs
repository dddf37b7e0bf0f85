use std::sync::Arc;

use crate::models::error::CaptureError;
use crate::traits::media::MediaStream;

/// Lifecycle status of an audio context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextState {
    Running,
    Suspended,
    Closed,
}

/// Audio analysis graph factory.
pub trait AudioGraph: Send + Sync {
    fn create_context(&self) -> Result<Arc<dyn AudioContext>, CaptureError>;
}

/// One audio context. Shared between the visualizer (reads) and the reaper
/// (teardown) for the session's duration.
pub trait AudioContext: Send + Sync {
    /// Attach an analyser to the stream's audio graph. `bins` is the number
    /// of amplitude samples per read (fft_size / 2).
    fn create_analyser(
        &self,
        stream: &Arc<dyn MediaStream>,
        bins: usize,
    ) -> Result<Arc<dyn AnalyserNode>, CaptureError>;

    fn suspend(&self) -> Result<(), CaptureError>;

    fn close(&self) -> Result<(), CaptureError>;

    fn state(&self) -> ContextState;
}

/// Analysis node exposing "read current amplitude data into a buffer".
pub trait AnalyserNode: Send + Sync {
    fn bin_count(&self) -> usize;

    /// Fill `out` with the latest amplitude samples, normalized to
    /// `[-1.0, 1.0]`.
    fn read_amplitudes(&self, out: &mut [f32]);

    fn disconnect(&self);
}
