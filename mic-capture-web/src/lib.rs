//! # mic-capture-web
//!
//! Browser platform adapters for mic-capture-kit.
//!
//! Provides:
//! - `detect` — iOS-vs-standard platform detection from environment hints
//! - `mime` — per-platform container candidate lists and negotiation
//! - `IosPlatform` — MP4/AAC codecs, suspend-before-close context teardown
//! - `StandardPlatform` — opus/webm codecs, direct context close
//!
//! ## Usage
//! ```ignore
//! use mic_capture_core::{RecordingController, SessionConfig};
//! use mic_capture_web::{adapter_for, PlatformHints};
//!
//! let hints = PlatformHints { user_agent, max_touch_points };
//! let platform = adapter_for(&hints, devices, graph, &config);
//! let controller = RecordingController::new(config, platform, recorders, scheduler)?;
//! ```

use std::sync::Arc;

use mic_capture_core::{AudioGraph, MediaDevices, Platform, PlatformAdapter, SessionConfig};

pub mod detect;
pub mod ios;
pub mod mime;
pub mod standard;


pub use detect::{detect_platform, PlatformHints};
pub use ios::IosPlatform;
pub use standard::StandardPlatform;

/// Build the adapter matching the detected platform.
pub fn adapter_for(
    hints: &PlatformHints,
    devices: Arc<dyn MediaDevices>,
    graph: Arc<dyn AudioGraph>,
    config: &SessionConfig,
) -> Arc<dyn PlatformAdapter> {
    match detect_platform(hints) {
        Platform::Ios => {
            log::info!("ios platform detected; using mp4 codecs and delayed context close");
            Arc::new(IosPlatform::new(
                devices,
                graph,
                config.ios_suspend_close_delay,
            ))
        }
        Platform::Standard => Arc::new(StandardPlatform::new(devices, graph)),
    }
}
