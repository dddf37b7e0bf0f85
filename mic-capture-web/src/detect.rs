use mic_capture_core::Platform;

/// Environment facts used for platform detection.
///
/// Gathered once at startup from the hosting environment (user agent string
/// and touch capability) and treated as immutable afterwards.
#[derive(Debug, Clone)]
pub struct PlatformHints {
    pub user_agent: String,
    /// Maximum simultaneous touch points the device reports.
    pub max_touch_points: u32,
}

/// Classify the environment as iOS or standard.
///
/// Modern iPadOS reports a desktop-class "Macintosh" user agent, so the
/// substring check alone misses it; a Macintosh agent combined with
/// multi-touch support is an iPad.
pub fn detect_platform(hints: &PlatformHints) -> Platform {
    let ua = &hints.user_agent;
    if ua.contains("iPhone") || ua.contains("iPad") || ua.contains("iPod") {
        return Platform::Ios;
    }
    if ua.contains("Macintosh") && hints.max_touch_points > 1 {
        return Platform::Ios;
    }
    Platform::Standard
}
