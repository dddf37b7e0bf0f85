use mic_capture_core::MimeSupport;

/// Container candidates for iOS, most preferred first.
///
/// Safari's recorder cannot produce webm; MP4/AAC variants are the reliable
/// set, with WAV as the uncompressed last resort.
pub const IOS_MIME_CANDIDATES: &[&str] = &[
    "audio/mp4",
    "audio/mp4;codecs=mp4a.40.2",
    "audio/aac",
    "audio/wav",
];

/// Container candidates for everything else, most preferred first.
pub const STANDARD_MIME_CANDIDATES: &[&str] = &[
    "audio/webm;codecs=opus",
    "audio/webm",
    "audio/ogg;codecs=opus",
    "audio/mp4",
];

/// First supported candidate, or `""` to let the recorder pick its own
/// container.
pub fn negotiate(candidates: &[&str], support: &dyn MimeSupport) -> String {
    for candidate in candidates {
        if support.is_type_supported(candidate) {
            return (*candidate).to_string();
        }
    }
    String::new()
}
