//! Classifying FFmpeg failures into platform error names.
//!
//! FFmpeg does not report structured errors, so the stderr of a capture
//! process that exited early is matched against known messages from the
//! AVFoundation and v4l2 input devices.

use super::error::kind;

/// Message fragments for each error name, checked in order.
const PATTERNS: &[(&str, &[&str])] = &[
    (
        kind::NOT_ALLOWED,
        &[
            "not authorized",
            "permission denied",
            "operation not permitted",
            "failed to get access",
        ],
    ),
    (
        kind::NOT_READABLE,
        &["device or resource busy", "could not lock", "in use by another"],
    ),
    (
        kind::OVERCONSTRAINED,
        &[
            "is not supported by the device",
            "selected framerate",
            "selected video size",
            "supported modes",
            "invalid argument",
        ],
    ),
    (
        kind::NOT_FOUND,
        &[
            "no such file or directory",
            "video device not found",
            "could not find video device",
            "invalid device index",
            "no such device",
        ],
    ),
];

/// Map an FFmpeg stderr dump to an error name, if it is recognizable.
pub fn classify_ffmpeg_stderr(stderr: &str) -> Option<&'static str> {
    let lower = stderr.to_lowercase();
    PATTERNS
        .iter()
        .find(|(_, needles)| needles.iter().any(|n| lower.contains(n)))
        .map(|(name, _)| *name)
}
