//! The media platform seam.
//!
//! A platform grants access to capture devices and enumerates them:
//! - [`MemoryMediaDevices`]: scripted in-process platform for tests
//! - [`FfmpegMediaDevices`]: native capture through an FFmpeg process

mod diagnostics;
mod error;
mod ffmpeg;
mod memory;
mod select;
mod stream;

use async_trait::async_trait;
use serde::Serialize;
use std::fmt;

use crate::camera::MediaStreamConstraints;

pub use diagnostics::classify_ffmpeg_stderr;
pub use error::{kind, PlatformError};
pub use ffmpeg::{FfmpegMediaDevices, FfmpegOptions, InputFormat};
pub use memory::MemoryMediaDevices;
pub use select::select_video_device;
pub use stream::{MediaStream, MediaStreamTrack, TrackSource, TrackState};

/// Kind of a media device or track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaDeviceKind {
    AudioInput,
    AudioOutput,
    VideoInput,
}

impl MediaDeviceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaDeviceKind::AudioInput => "audioinput",
            MediaDeviceKind::AudioOutput => "audiooutput",
            MediaDeviceKind::VideoInput => "videoinput",
        }
    }
}

impl fmt::Display for MediaDeviceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A device as reported by enumeration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaDeviceInfo {
    /// Opaque identifier used to request this device
    pub device_id: String,
    pub kind: MediaDeviceKind,
    /// Raw label; empty until access has been granted at least once
    pub label: String,
    pub group_id: String,
}

impl MediaDeviceInfo {
    pub fn new(device_id: impl Into<String>, kind: MediaDeviceKind, label: impl Into<String>) -> Self {
        Self {
            device_id: device_id.into(),
            kind,
            label: label.into(),
            group_id: String::new(),
        }
    }

    pub fn with_group(mut self, group_id: impl Into<String>) -> Self {
        self.group_id = group_id.into();
        self
    }
}

/// A host platform's media capture API.
#[async_trait]
pub trait MediaDevices: Send + Sync {
    /// Request an access grant matching `constraints`.
    async fn get_user_media(
        &self,
        constraints: &MediaStreamConstraints,
    ) -> Result<MediaStream, PlatformError>;

    /// List every connected media device.
    async fn enumerate_devices(&self) -> Result<Vec<MediaDeviceInfo>, PlatformError>;
}
