//! Errors surfaced by the camera directory and camera handles.

use crate::media::PlatformError;

/// A platform failure translated into a stable, named error.
#[derive(Debug, thiserror::Error)]
#[error("Cannot access video stream ({kind}{}).", cause_suffix(.cause))]
pub struct MediaError {
    kind: String,
    #[source]
    cause: Option<PlatformError>,
}

fn cause_suffix(cause: &Option<PlatformError>) -> String {
    match cause.as_ref().map(PlatformError::message) {
        Some(message) if !message.is_empty() => format!(": {}", message),
        _ => String::new(),
    }
}

impl MediaError {
    pub fn new(kind: impl Into<String>, cause: Option<PlatformError>) -> Self {
        Self {
            kind: kind.into(),
            cause,
        }
    }

    /// The platform error name, e.g. `NotAllowedError`.
    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn cause(&self) -> Option<&PlatformError> {
        self.cause.as_ref()
    }
}

/// Errors returned by [`CameraDirectory`](super::CameraDirectory) and
/// [`Camera`](super::Camera).
#[derive(Debug, thiserror::Error)]
pub enum CameraError {
    /// Access failed with a named platform error (wrapping enabled)
    #[error(transparent)]
    Media(#[from] MediaError),

    /// The platform error, unmodified
    #[error(transparent)]
    Platform(#[from] PlatformError),
}

impl CameraError {
    /// The platform error name, whether wrapped or passed through.
    pub fn kind(&self) -> Option<&str> {
        match self {
            CameraError::Media(e) => Some(e.kind()),
            CameraError::Platform(e) => e.name(),
        }
    }
}

/// Translate a failed access request.
///
/// Named failures become [`MediaError`] when `wrap` is set; everything else
/// is returned as the original platform error.
pub(crate) fn translate_access_error(err: PlatformError, wrap: bool) -> CameraError {
    match err.name().map(str::to_owned) {
        Some(kind) if wrap => MediaError::new(kind, Some(err)).into(),
        _ => CameraError::Platform(err),
    }
}
