//! Resolving a constraint object to one video input.

use super::error::{kind, PlatformError};
use super::{MediaDeviceInfo, MediaDeviceKind};
use crate::camera::{FacingMode, MediaStreamConstraints, VideoRequest};

/// Pick the video input that satisfies `constraints`.
///
/// An exact device id (or legacy `sourceId`) must match, otherwise the
/// request is overconstrained. Ideal values only steer the choice among
/// available devices; the first video input is the fallback.
pub fn select_video_device<'a>(
    constraints: &MediaStreamConstraints,
    devices: &'a [MediaDeviceInfo],
) -> Result<&'a MediaDeviceInfo, PlatformError> {
    let videos: Vec<&MediaDeviceInfo> = devices
        .iter()
        .filter(|d| d.kind == MediaDeviceKind::VideoInput)
        .collect();

    let Some(first) = videos.first().copied() else {
        return Err(PlatformError::named(
            kind::NOT_FOUND,
            "Requested device not found",
        ));
    };

    match &constraints.video {
        VideoRequest::Enabled(false) => Err(PlatformError::Other(
            "At least one of audio and video must be requested".to_string(),
        )),
        VideoRequest::Enabled(true) => Ok(first),
        VideoRequest::Legacy(legacy) => {
            find_by_id(&videos, &legacy.mandatory.source_id).ok_or_else(|| overconstrained("sourceId"))
        }
        VideoRequest::Constrained(video) => {
            if let Some(device_id) = &video.device_id {
                if let Some(device) = find_by_id(&videos, device_id.value()) {
                    return Ok(device);
                }
                if device_id.is_exact() {
                    return Err(overconstrained("deviceId"));
                }
            }

            if let Some(facing) = &video.facing_mode {
                if let Some(device) = videos.iter().copied().find(|d| faces(d, *facing.value())) {
                    return Ok(device);
                }
                if facing.is_exact() {
                    return Err(overconstrained("facingMode"));
                }
            }

            Ok(first)
        }
    }
}

fn find_by_id<'a>(videos: &[&'a MediaDeviceInfo], id: &str) -> Option<&'a MediaDeviceInfo> {
    videos.iter().copied().find(|d| d.device_id == id)
}

fn overconstrained(constraint: &str) -> PlatformError {
    PlatformError::named(
        kind::OVERCONSTRAINED,
        format!("Constraint '{}' cannot be satisfied", constraint),
    )
}

/// Guess a device's facing direction from words in its label.
fn faces(device: &MediaDeviceInfo, mode: FacingMode) -> bool {
    let label = device.label.to_lowercase();
    let hints: &[&str] = match mode {
        FacingMode::Environment => &["back", "rear", "environment"],
        FacingMode::User => &["front", "facetime", "user"],
        FacingMode::Left => &["left"],
        FacingMode::Right => &["right"],
    };
    hints.iter().any(|h| label.contains(h))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::{Constrain, LegacyLimits, VideoConstraints};

    fn devices() -> Vec<MediaDeviceInfo> {
        vec![
            MediaDeviceInfo::new("mic", MediaDeviceKind::AudioInput, "Microphone"),
            MediaDeviceInfo::new("front", MediaDeviceKind::VideoInput, "Front Camera"),
            MediaDeviceInfo::new("back", MediaDeviceKind::VideoInput, "Back Camera (05ac:1234)"),
        ]
    }

    #[test]
    fn test_any_video_picks_first_video_input() {
        let list = devices();
        let d = select_video_device(&MediaStreamConstraints::any_video(), &list).unwrap();
        assert_eq!(d.device_id, "front");
    }

    #[test]
    fn test_exact_device_id() {
        let list = devices();
        let c = MediaStreamConstraints::exact_device("back", None);
        assert_eq!(select_video_device(&c, &list).unwrap().device_id, "back");
    }

    #[test]
    fn test_exact_device_id_missing_is_overconstrained() {
        let list = devices();
        let c = MediaStreamConstraints::exact_device("nope", None);
        let err = select_video_device(&c, &list).unwrap_err();
        assert_eq!(err.name(), Some(kind::OVERCONSTRAINED));
    }

    #[test]
    fn test_exact_id_of_audio_device_is_overconstrained() {
        let list = devices();
        let c = MediaStreamConstraints::exact_device("mic", None);
        assert!(select_video_device(&c, &list).is_err());
    }

    #[test]
    fn test_facing_mode_prefers_matching_label() {
        let list = devices();
        let c = MediaStreamConstraints::facing(FacingMode::Environment);
        assert_eq!(select_video_device(&c, &list).unwrap().device_id, "back");
        let c = MediaStreamConstraints::facing(FacingMode::User);
        assert_eq!(select_video_device(&c, &list).unwrap().device_id, "front");
    }

    #[test]
    fn test_ideal_facing_falls_back_to_first() {
        let list = devices();
        let c = MediaStreamConstraints::facing(FacingMode::Left);
        assert_eq!(select_video_device(&c, &list).unwrap().device_id, "front");
    }

    #[test]
    fn test_exact_facing_without_match_fails() {
        let list = devices();
        let c = MediaStreamConstraints {
            audio: false,
            video: VideoRequest::Constrained(VideoConstraints {
                facing_mode: Some(Constrain::exact(FacingMode::Left)),
                ..Default::default()
            }),
        };
        let err = select_video_device(&c, &list).unwrap_err();
        assert_eq!(err.name(), Some(kind::OVERCONSTRAINED));
    }

    #[test]
    fn test_legacy_source_id() {
        let list = devices();
        let c = MediaStreamConstraints::legacy_source("back", LegacyLimits::default());
        assert_eq!(select_video_device(&c, &list).unwrap().device_id, "back");
        let c = MediaStreamConstraints::legacy_source("gone", LegacyLimits::default());
        assert!(select_video_device(&c, &list).is_err());
    }

    #[test]
    fn test_no_video_inputs_is_not_found() {
        let list = vec![MediaDeviceInfo::new("mic", MediaDeviceKind::AudioInput, "Mic")];
        let err = select_video_device(&MediaStreamConstraints::any_video(), &list).unwrap_err();
        assert_eq!(err.name(), Some(kind::NOT_FOUND));
    }
}
