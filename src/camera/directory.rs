//! Camera enumeration.

use std::cmp::Ordering;
use std::sync::Arc;

use super::constraints::MediaStreamConstraints;
use super::error::{translate_access_error, CameraError};
use super::handle::Camera;
use super::name::camera_name;
use super::types::{AccessStrategy, CameraOptions};
use crate::media::{MediaDeviceKind, MediaDevices, MediaStream};

/// Lists the cameras a media platform exposes and hands out [`Camera`]s.
#[derive(Clone)]
pub struct CameraDirectory {
    devices: Arc<dyn MediaDevices>,
    options: CameraOptions,
}

impl std::fmt::Debug for CameraDirectory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CameraDirectory")
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl CameraDirectory {
    pub fn new(devices: Arc<dyn MediaDevices>, options: CameraOptions) -> Self {
        Self { devices, options }
    }

    /// A handle for a known device id, sharing this directory's platform.
    pub fn camera(&self, id: impl Into<String>, name: Option<String>) -> Camera {
        Camera::new(id, name, self.devices.clone(), self.options.clone())
    }

    /// List every video input as a [`Camera`].
    ///
    /// `constraints` replaces the default grant request
    /// (`{ video: { facingMode: <configured> } }`) when holding access.
    pub async fn list_cameras(
        &self,
        constraints: Option<MediaStreamConstraints>,
    ) -> Result<Vec<Camera>, CameraError> {
        let grant = match self.options.access {
            AccessStrategy::Hold => {
                let constraints = constraints
                    .unwrap_or_else(|| MediaStreamConstraints::facing(self.options.facing_mode));
                Some(self.request_access(&constraints).await?)
            }
            AccessStrategy::Probe => {
                self.ensure_access().await?;
                None
            }
        };

        // An enumeration failure drops the grant, which stops its tracks
        let devices = self.devices.enumerate_devices().await?;

        let mut cameras: Vec<Camera> = devices
            .into_iter()
            .filter(|d| d.kind == MediaDeviceKind::VideoInput)
            .map(|d| self.camera(d.device_id, camera_name(&d.label)))
            .collect();

        if let Some(mut grant) = grant {
            grant.stop_video_tracks();
        }

        if self.options.sort_by_name {
            cameras.sort_by(|a, b| compare_names(a.name(), b.name()));
        }

        log::debug!("Found {} camera(s)", cameras.len());
        Ok(cameras)
    }

    /// Request minimal camera access and release it right away.
    ///
    /// Surfaces the permission prompt and makes device labels available.
    pub async fn ensure_access(&self) -> Result<(), CameraError> {
        let mut access = self.request_access(&MediaStreamConstraints::any_video()).await?;
        access.stop_video_tracks();
        Ok(())
    }

    /// Request a grant, translating failures per the configured error policy.
    pub async fn request_access(
        &self,
        constraints: &MediaStreamConstraints,
    ) -> Result<MediaStream, CameraError> {
        log::debug!("Requesting access with {}", constraints);
        self.devices
            .get_user_media(constraints)
            .await
            .map_err(|e| translate_access_error(e, self.options.wrap_errors))
    }
}

/// Byte-wise name order; unnamed cameras go last.
fn compare_names(a: Option<&str>, b: Option<&str>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
