//! Failures reported by a media platform.

/// Well-known error names a platform attaches to failed access requests.
pub mod kind {
    /// The user or the OS refused camera access
    pub const NOT_ALLOWED: &str = "NotAllowedError";
    /// No device matches the request
    pub const NOT_FOUND: &str = "NotFoundError";
    /// The device exists but could not be opened (busy, unplugged mid-open)
    pub const NOT_READABLE: &str = "NotReadableError";
    /// A hard constraint could not be satisfied
    pub const OVERCONSTRAINED: &str = "OverconstrainedError";
    /// The request was aborted for an unspecified reason
    pub const ABORT: &str = "AbortError";
}

/// An error raised by a [`MediaDevices`](super::MediaDevices) implementation.
///
/// Some failures carry a classification name (`NotAllowedError`, ...);
/// others are opaque. Callers branch on [`PlatformError::name`].
#[derive(Debug, thiserror::Error)]
pub enum PlatformError {
    /// A classified failure with a platform error name
    #[error("{name}: {message}")]
    Named { name: String, message: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// An unclassified failure
    #[error("{0}")]
    Other(String),
}

impl PlatformError {
    pub fn named(name: impl Into<String>, message: impl Into<String>) -> Self {
        PlatformError::Named {
            name: name.into(),
            message: message.into(),
        }
    }

    /// The classification name, if the failure carries one.
    pub fn name(&self) -> Option<&str> {
        match self {
            PlatformError::Named { name, .. } if !name.is_empty() => Some(name),
            _ => None,
        }
    }

    /// The message without the classification name.
    pub fn message(&self) -> String {
        match self {
            PlatformError::Named { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }
}
