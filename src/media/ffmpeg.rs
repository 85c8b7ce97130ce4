//! Native media platform backed by FFmpeg capture processes.
//!
//! An access grant is a running `ffmpeg` process that holds the camera open.
//! The grant has exactly one video track; stopping it kills the process.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::process::Stdio;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncReadExt, BufReader};
use tokio::process::{Child, Command};

use super::diagnostics::classify_ffmpeg_stderr;
use super::error::PlatformError;
use super::select::select_video_device;
use super::stream::{MediaStream, MediaStreamTrack, TrackSource};
use super::{MediaDeviceInfo, MediaDeviceKind, MediaDevices};
use crate::camera::{MediaStreamConstraints, VideoRequest};
use crate::devices;

/// FFmpeg input device family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputFormat {
    /// macOS
    AvFoundation,
    /// Linux
    V4l2,
}

impl InputFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            InputFormat::AvFoundation => "avfoundation",
            InputFormat::V4l2 => "v4l2",
        }
    }
}

impl Default for InputFormat {
    fn default() -> Self {
        if cfg!(target_os = "macos") {
            InputFormat::AvFoundation
        } else {
            InputFormat::V4l2
        }
    }
}

impl fmt::Display for InputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Settings for [`FfmpegMediaDevices`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FfmpegOptions {
    /// FFmpeg executable name or path
    pub program: String,
    pub input: InputFormat,
    /// Capture framerate; AVFoundation rejects the FFmpeg default on most cameras
    pub framerate: Option<u32>,
    /// How long a freshly spawned capture must survive to count as granted
    pub settle_ms: u64,
}

impl Default for FfmpegOptions {
    fn default() -> Self {
        Self {
            program: "ffmpeg".to_string(),
            input: InputFormat::default(),
            framerate: Some(30),
            settle_ms: 750,
        }
    }
}

/// Media platform that opens cameras with FFmpeg.
#[derive(Debug, Clone, Default)]
pub struct FfmpegMediaDevices {
    options: FfmpegOptions,
}

impl FfmpegMediaDevices {
    pub fn new(options: FfmpegOptions) -> Self {
        Self { options }
    }

    /// Build the FFmpeg arguments that open `device` under `constraints`.
    pub fn capture_args(&self, device: &MediaDeviceInfo, constraints: &MediaStreamConstraints) -> Vec<String> {
        let mut args: Vec<String> = vec![
            "-hide_banner".into(),
            "-loglevel".into(),
            "error".into(),
            "-f".into(),
            self.options.input.as_str().into(),
        ];

        let (mut framerate, mut size) = (self.options.framerate, None);
        match &constraints.video {
            VideoRequest::Constrained(video) => {
                framerate = video.frame_rate.or(framerate);
                if let (Some(w), Some(h)) = (video.width, video.height) {
                    size = Some(format!("{}x{}", w, h));
                }
            }
            VideoRequest::Legacy(legacy) => {
                // FFmpeg takes a single size, not a range; let the device pick
                log::debug!(
                    "Ignoring legacy width range {}-{} for {}",
                    legacy.mandatory.limits.min_width,
                    legacy.mandatory.limits.max_width,
                    device.device_id
                );
            }
            VideoRequest::Enabled(_) => {}
        }

        if let Some(fps) = framerate {
            args.push("-framerate".into());
            args.push(fps.to_string());
        }
        if let Some(size) = size {
            args.push("-video_size".into());
            args.push(size);
        }

        let input = match self.options.input {
            InputFormat::AvFoundation => format!("{}:none", device.device_id),
            InputFormat::V4l2 => device.device_id.clone(),
        };
        args.extend(["-i".into(), input, "-c".into(), "copy".into(), "-f".into(), "null".into(), "-".into()]);
        args
    }

    /// Wait out the settle window. `Ok(child)` means the capture is running.
    async fn settle(&self, mut child: Child) -> Result<Child, PlatformError> {
        let window = Duration::from_millis(self.options.settle_ms);
        let waited = tokio::time::timeout(window, child.wait()).await;
        let status = match waited {
            Err(_elapsed) => return Ok(child),
            Ok(status) => status?,
        };

        let mut stderr = String::new();
        if let Some(mut pipe) = child.stderr.take() {
            pipe.read_to_string(&mut stderr).await?;
        }
        let stderr = stderr.trim();

        Err(match classify_ffmpeg_stderr(stderr) {
            Some(name) => PlatformError::named(name, last_line(stderr)),
            None => PlatformError::Other(format!("ffmpeg exited with {}: {}", status, stderr)),
        })
    }
}

fn last_line(stderr: &str) -> String {
    stderr.lines().last().unwrap_or_default().trim().to_string()
}

#[async_trait]
impl MediaDevices for FfmpegMediaDevices {
    async fn get_user_media(
        &self,
        constraints: &MediaStreamConstraints,
    ) -> Result<MediaStream, PlatformError> {
        if constraints.audio {
            log::warn!("Audio capture is not supported by the FFmpeg platform; ignoring");
        }

        let devices = self.enumerate_devices().await?;
        let device = select_video_device(constraints, &devices)?;
        let args = self.capture_args(device, constraints);
        log::debug!("Requesting {} with: {} {}", device.device_id, self.options.program, args.join(" "));

        let child = Command::new(&self.options.program)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()?;

        let mut child = self.settle(child).await?;
        if let Some(stderr) = child.stderr.take() {
            let device_id = device.device_id.clone();
            tokio::spawn(async move {
                let mut lines = BufReader::new(stderr).lines();
                while let Ok(Some(line)) = lines.next_line().await {
                    log::debug!("ffmpeg [{}]: {}", device_id, line);
                }
            });
        }

        let track = MediaStreamTrack::new(
            MediaDeviceKind::VideoInput,
            device.label.as_str(),
            Box::new(FfmpegTrack { child }),
        );
        Ok(MediaStream::new(vec![track]))
    }

    async fn enumerate_devices(&self) -> Result<Vec<MediaDeviceInfo>, PlatformError> {
        let devices = match self.options.input {
            InputFormat::AvFoundation => devices::list_avfoundation_devices(&self.options.program).await?,
            InputFormat::V4l2 => devices::list_v4l2_devices().await?,
        };
        log::debug!("Enumerated {} {} device(s)", devices.len(), self.options.input);
        Ok(devices)
    }
}

/// A running capture process.
#[derive(Debug)]
struct FfmpegTrack {
    child: Child,
}

impl TrackSource for FfmpegTrack {
    fn stop(&mut self) {
        // tokio reaps the killed process in the background once the Child drops
        if let Err(e) = self.child.start_kill() {
            log::warn!("Failed to stop ffmpeg capture: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::{LegacyLimits, VideoConstraints};

    fn camera(id: &str) -> MediaDeviceInfo {
        MediaDeviceInfo::new(id, MediaDeviceKind::VideoInput, "Cam")
    }

    #[test]
    fn test_avfoundation_args() {
        let platform = FfmpegMediaDevices::new(FfmpegOptions {
            input: InputFormat::AvFoundation,
            ..Default::default()
        });
        let args = platform.capture_args(&camera("1"), &MediaStreamConstraints::exact_device("1", None));
        assert_eq!(
            args,
            vec![
                "-hide_banner", "-loglevel", "error", "-f", "avfoundation", "-framerate", "30",
                "-i", "1:none", "-c", "copy", "-f", "null", "-"
            ]
        );
    }

    #[test]
    fn test_v4l2_args_with_size() {
        let platform = FfmpegMediaDevices::new(FfmpegOptions {
            input: InputFormat::V4l2,
            framerate: None,
            ..Default::default()
        });
        let constraints = MediaStreamConstraints {
            audio: false,
            video: VideoRequest::Constrained(VideoConstraints {
                width: Some(1280),
                height: Some(720),
                frame_rate: Some(15),
                ..Default::default()
            }),
        };
        let args = platform.capture_args(&camera("/dev/video0"), &constraints);
        let joined = args.join(" ");
        assert!(joined.contains("-f v4l2"));
        assert!(joined.contains("-framerate 15"));
        assert!(joined.contains("-video_size 1280x720"));
        assert!(joined.contains("-i /dev/video0"));
    }

    #[test]
    fn test_legacy_constraints_skip_size() {
        let platform = FfmpegMediaDevices::default();
        let args = platform.capture_args(
            &camera("0"),
            &MediaStreamConstraints::legacy_source("0", LegacyLimits::default()),
        );
        assert!(!args.iter().any(|a| a == "-video_size"));
    }

    #[test]
    fn test_default_options() {
        let options = FfmpegOptions::default();
        assert_eq!(options.program, "ffmpeg");
        assert_eq!(options.framerate, Some(30));
        assert_eq!(options.settle_ms, 750);
    }

    #[test]
    fn test_last_line() {
        assert_eq!(last_line("first\nsecond \n"), "second");
        assert_eq!(last_line(""), "");
    }

    #[tokio::test]
    async fn test_missing_program_is_unnamed_io_error() {
        let platform = FfmpegMediaDevices::new(FfmpegOptions {
            program: "definitely-not-ffmpeg-binary".to_string(),
            input: InputFormat::AvFoundation,
            ..Default::default()
        });
        let err = platform.enumerate_devices().await.unwrap_err();
        assert!(matches!(err, PlatformError::Io(_)));
        assert_eq!(err.name(), None);
    }

    /// Device listing every fake ffmpeg prints for `-list_devices`.
    #[cfg(unix)]
    const LISTING: &str = r#"case "$*" in
  *-list_devices*)
    echo "[AVFoundation indev @ 0x1] AVFoundation video devices:" >&2
    echo "[AVFoundation indev @ 0x1] [0] FaceTime HD Camera" >&2
    echo "[AVFoundation indev @ 0x1] [1] Capture screen 0" >&2
    exit 1 ;;
esac
"#;

    /// Write an executable stand-in for ffmpeg whose capture step runs `capture`.
    #[cfg(unix)]
    fn fake_ffmpeg(dir: &tempfile::TempDir, capture: &str) -> FfmpegMediaDevices {
        use std::os::unix::fs::PermissionsExt;

        let path = dir.path().join("ffmpeg");
        std::fs::write(&path, format!("#!/bin/sh\n{}{}\n", LISTING, capture)).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();

        FfmpegMediaDevices::new(FfmpegOptions {
            program: path.to_string_lossy().into_owned(),
            input: InputFormat::AvFoundation,
            framerate: None,
            settle_ms: 2000,
        })
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_enumerate_through_program() {
        let dir = tempfile::TempDir::new().unwrap();
        let platform = fake_ffmpeg(&dir, "exit 0");

        let devices = platform.enumerate_devices().await.unwrap();
        assert_eq!(devices.len(), 1);
        assert_eq!(devices[0].device_id, "0");
        assert_eq!(devices[0].label, "FaceTime HD Camera");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_early_exit_denied_is_not_allowed() {
        let dir = tempfile::TempDir::new().unwrap();
        let platform = fake_ffmpeg(
            &dir,
            "echo '[avfoundation @ 0x1] Failed to get access to camera, not authorized' >&2\nexit 1",
        );

        let err = platform
            .get_user_media(&MediaStreamConstraints::exact_device("0", None))
            .await
            .unwrap_err();
        assert_eq!(err.name(), Some("NotAllowedError"));
        assert_eq!(
            err.message(),
            "[avfoundation @ 0x1] Failed to get access to camera, not authorized"
        );
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_early_exit_unrecognized_is_unnamed() {
        let dir = tempfile::TempDir::new().unwrap();
        let platform = fake_ffmpeg(&dir, "echo 'Conversion failed!' >&2\nexit 1");

        let err = platform
            .get_user_media(&MediaStreamConstraints::any_video())
            .await
            .unwrap_err();
        match err {
            PlatformError::Other(msg) => assert!(msg.contains("Conversion failed!")),
            other => panic!("expected an unnamed error, got {:?}", other),
        }
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_running_capture_is_granted_until_stopped() {
        let dir = tempfile::TempDir::new().unwrap();
        let pid_file = dir.path().join("capture.pid");
        let mut platform = fake_ffmpeg(
            &dir,
            &format!("echo $$ > '{}'\nexec sleep 30", pid_file.display()),
        );
        platform.options.settle_ms = 200;

        let mut stream = platform
            .get_user_media(&MediaStreamConstraints::exact_device("0", None))
            .await
            .unwrap();
        assert!(stream.is_active());
        assert_eq!(stream.tracks()[0].label(), "FaceTime HD Camera");

        let pid = std::fs::read_to_string(&pid_file).unwrap();
        let proc_stat = format!("/proc/{}/stat", pid.trim());

        assert_eq!(stream.stop_video_tracks(), 1);
        assert!(!stream.is_active());
        drop(stream);

        if cfg!(target_os = "linux") {
            // Killed means gone, or a zombie awaiting the background reaper
            let mut ended = false;
            for _ in 0..50 {
                match std::fs::read_to_string(&proc_stat) {
                    Err(_) => ended = true,
                    Ok(stat) => ended = stat.rsplit(')').next().is_some_and(|s| s.trim_start().starts_with('Z')),
                }
                if ended {
                    break;
                }
                tokio::time::sleep(Duration::from_millis(20)).await;
            }
            assert!(ended, "capture process still running after stop");
        }
    }
}
