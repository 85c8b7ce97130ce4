//! Constraint objects handed to the platform when requesting access.
//!
//! The types serialize to the same shape a browser-style `getUserMedia`
//! call takes, which keeps debug logs readable:
//!
//! ```json
//! { "audio": false, "video": { "deviceId": { "exact": "abc" }, "facingMode": "environment" } }
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

/// Which way a camera faces relative to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum FacingMode {
    /// Front camera, pointing at the user
    User,
    /// Back camera, pointing away from the user
    #[default]
    Environment,
    Left,
    Right,
}

impl FacingMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            FacingMode::User => "user",
            FacingMode::Environment => "environment",
            FacingMode::Left => "left",
            FacingMode::Right => "right",
        }
    }
}

impl fmt::Display for FacingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A constrainable value: either a preference or a hard requirement.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Constrain<T> {
    /// The platform may pick something else if this cannot be satisfied
    Ideal(T),
    /// The request fails with `OverconstrainedError` if this cannot be satisfied
    Exact { exact: T },
}

impl<T> Constrain<T> {
    pub fn exact(value: T) -> Self {
        Constrain::Exact { exact: value }
    }

    pub fn value(&self) -> &T {
        match self {
            Constrain::Ideal(v) => v,
            Constrain::Exact { exact } => exact,
        }
    }

    pub fn is_exact(&self) -> bool {
        matches!(self, Constrain::Exact { .. })
    }
}

/// Modern per-track video constraints.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoConstraints {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device_id: Option<Constrain<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub facing_mode: Option<Constrain<FacingMode>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frame_rate: Option<u32>,
}

/// Width/aspect limits used by the legacy constraint form.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacyLimits {
    pub min_width: u32,
    pub max_width: u32,
    pub min_aspect_ratio: f64,
}

impl Default for LegacyLimits {
    fn default() -> Self {
        Self {
            min_width: 600,
            max_width: 800,
            min_aspect_ratio: 1.6,
        }
    }
}

/// The `mandatory` block of the legacy constraint form.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Mandatory {
    pub source_id: String,
    #[serde(flatten)]
    pub limits: LegacyLimits,
}

/// Legacy constraint form understood by older platform APIs.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LegacyVideoConstraints {
    pub mandatory: Mandatory,
    pub optional: Vec<serde_json::Value>,
}

/// The `video` member of a constraint object.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum VideoRequest {
    /// `video: true` / `video: false`
    Enabled(bool),
    Constrained(VideoConstraints),
    Legacy(LegacyVideoConstraints),
}

impl VideoRequest {
    pub fn is_requested(&self) -> bool {
        !matches!(self, VideoRequest::Enabled(false))
    }
}

/// A full access request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MediaStreamConstraints {
    pub audio: bool,
    pub video: VideoRequest,
}

impl MediaStreamConstraints {
    /// `{ video: true }`: any camera, used to surface the permission prompt.
    pub fn any_video() -> Self {
        Self {
            audio: false,
            video: VideoRequest::Enabled(true),
        }
    }

    /// Prefer a camera facing the given direction.
    pub fn facing(mode: FacingMode) -> Self {
        Self {
            audio: false,
            video: VideoRequest::Constrained(VideoConstraints {
                facing_mode: Some(Constrain::Ideal(mode)),
                ..Default::default()
            }),
        }
    }

    /// Require a specific device, optionally hinting a facing mode.
    pub fn exact_device(id: impl Into<String>, facing_mode: Option<FacingMode>) -> Self {
        Self {
            audio: false,
            video: VideoRequest::Constrained(VideoConstraints {
                device_id: Some(Constrain::exact(id.into())),
                facing_mode: facing_mode.map(Constrain::Ideal),
                ..Default::default()
            }),
        }
    }

    /// Legacy `mandatory` form keyed on `sourceId`.
    pub fn legacy_source(id: impl Into<String>, limits: LegacyLimits) -> Self {
        Self {
            audio: false,
            video: VideoRequest::Legacy(LegacyVideoConstraints {
                mandatory: Mandatory {
                    source_id: id.into(),
                    limits,
                },
                optional: Vec::new(),
            }),
        }
    }
}

impl fmt::Display for MediaStreamConstraints {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match serde_json::to_string(self) {
            Ok(json) => f.write_str(&json),
            Err(_) => write!(f, "{:?}", self),
        }
    }
}
