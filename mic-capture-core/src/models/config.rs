use std::time::Duration;

/// Configuration for a capture session manager.
///
/// The timing constants are empirical browser/platform workarounds and are
/// tuned per target platform; the defaults are starting points, not a
/// contract.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Interval at which the streaming recorder flushes encoded chunks.
    /// Periodic flushing (rather than end-of-session-only) keeps partial
    /// audio recoverable.
    pub chunk_interval: Duration,

    /// How long to wait for the recorder's finalize callback before
    /// proceeding with whatever chunks arrived.
    pub finalize_timeout: Duration,

    /// How long to wait for each media track to acknowledge "ended" after
    /// being stopped.
    pub track_stop_timeout: Duration,

    /// Poll interval while waiting for a track to end.
    pub track_poll_interval: Duration,

    /// iOS requires suspending the audio context and waiting briefly before
    /// closing it; closing immediately silently fails and leaves the
    /// microphone indicator lit.
    pub ios_suspend_close_delay: Duration,

    /// Number of amplitude samples per waveform frame. Must be a power of
    /// two (analyser bin counts are fft_size / 2).
    pub waveform_bins: usize,

    /// Constraints passed to the media-device permission request.
    pub constraints: AudioConstraints,
}

impl SessionConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.chunk_interval.is_zero() {
            return Err("chunk interval must be non-zero".into());
        }
        if self.waveform_bins == 0 || !self.waveform_bins.is_power_of_two() {
            return Err(format!(
                "waveform bin count must be a power of two, got {}",
                self.waveform_bins
            ));
        }
        if self.waveform_bins > 16384 {
            return Err(format!(
                "waveform bin count too large: {}",
                self.waveform_bins
            ));
        }
        Ok(())
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            chunk_interval: Duration::from_millis(500),
            finalize_timeout: Duration::from_secs(2),
            track_stop_timeout: Duration::from_secs(1),
            track_poll_interval: Duration::from_millis(20),
            ios_suspend_close_delay: Duration::from_millis(400),
            waveform_bins: 128,
            constraints: AudioConstraints::default(),
        }
    }
}

/// Audio constraints for the microphone permission request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AudioConstraints {
    pub echo_cancellation: bool,
    pub noise_suppression: bool,
    pub auto_gain_control: bool,
}

impl Default for AudioConstraints {
    fn default() -> Self {
        Self {
            echo_cancellation: true,
            noise_suppression: true,
            auto_gain_control: true,
        }
    }
}
