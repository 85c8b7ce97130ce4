//! Per-device camera handle.

use std::fmt;
use std::sync::Arc;

use super::constraints::{FacingMode, MediaStreamConstraints};
use super::error::{translate_access_error, CameraError};
use super::types::CameraOptions;
use crate::media::{MediaDevices, MediaStream};

/// A named capture device that can be started and stopped.
///
/// Holds at most one stream. Dropping the handle stops it.
pub struct Camera {
    id: String,
    name: Option<String>,
    devices: Arc<dyn MediaDevices>,
    options: CameraOptions,
    stream: Option<MediaStream>,
}

impl fmt::Debug for Camera {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Camera")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("stream", &self.stream.as_ref().map(MediaStream::id))
            .finish()
    }
}

impl fmt::Display for Camera {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.name {
            Some(name) => write!(f, "[{}] {}", self.id, name),
            None => write!(f, "[{}] (unnamed)", self.id),
        }
    }
}

impl Camera {
    pub fn new(
        id: impl Into<String>,
        name: Option<String>,
        devices: Arc<dyn MediaDevices>,
        options: CameraOptions,
    ) -> Self {
        Self {
            id: id.into(),
            name,
            devices,
            options,
            stream: None,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn is_started(&self) -> bool {
        self.stream.is_some()
    }

    pub fn stream(&self) -> Option<&MediaStream> {
        self.stream.as_ref()
    }

    /// The constraint object `start` sends for this device.
    pub fn constraints(&self, facing_mode: Option<FacingMode>) -> MediaStreamConstraints {
        if self.options.legacy_constraints {
            MediaStreamConstraints::legacy_source(self.id.clone(), self.options.legacy)
        } else {
            MediaStreamConstraints::exact_device(self.id.clone(), facing_mode)
        }
    }

    /// Open this device and keep its stream.
    ///
    /// A stream that is already running is stopped first, so the device is
    /// never held twice by the same handle.
    pub async fn start(&mut self, facing_mode: Option<FacingMode>) -> Result<&MediaStream, CameraError> {
        if self.stream.is_some() {
            log::debug!("Camera {} already started; restarting", self.id);
            self.stop();
        }

        let constraints = self.constraints(facing_mode);
        log::debug!("Starting camera {} with {}", self.id, constraints);

        let stream = self
            .devices
            .get_user_media(&constraints)
            .await
            .map_err(|e| translate_access_error(e, self.options.wrap_errors))?;

        log::info!("Camera {} started", self);
        Ok(&*self.stream.insert(stream))
    }

    /// Stop every video track and forget the stream. Does nothing when stopped.
    pub fn stop(&mut self) {
        let Some(stream) = self.stream.as_mut() else {
            return;
        };
        let stopped = stream.stop_video_tracks();
        self.stream = None;
        log::info!("Camera {} stopped ({} track(s) released)", self, stopped);
    }
}

impl Drop for Camera {
    fn drop(&mut self) {
        self.stop();
    }
}
