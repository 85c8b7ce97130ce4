//! Capture device discovery through platform tools.
//!
//! - macOS: FFmpeg's AVFoundation device listing (printed to stderr)
//! - Linux: `v4l2-ctl --list-devices`

use std::process::Stdio;
use tokio::process::Command;

use crate::media::{MediaDeviceInfo, MediaDeviceKind, PlatformError};

/// Prefix for AVFoundation audio device ids, which share index space with video.
pub const AUDIO_ID_PREFIX: &str = "audio:";

/// Run ffmpeg to list available AVFoundation devices.
///
/// # Errors
/// Returns an I/O error if FFmpeg cannot be started.
pub async fn list_avfoundation_devices(program: &str) -> Result<Vec<MediaDeviceInfo>, PlatformError> {
    let output = Command::new(program)
        .args(["-hide_banner", "-f", "avfoundation", "-list_devices", "true", "-i", ""])
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .output()
        .await?;

    // FFmpeg prints the device list to stderr and exits non-zero
    let stderr = String::from_utf8_lossy(&output.stderr);
    Ok(parse_avfoundation_list(&stderr))
}

/// Parse FFmpeg's AVFoundation device listing.
///
/// Screen capture entries (`Capture screen N`) are not cameras and are skipped.
pub fn parse_avfoundation_list(stderr: &str) -> Vec<MediaDeviceInfo> {
    let mut devices = Vec::new();
    let mut section = None;

    for line in stderr.lines() {
        if line.contains("AVFoundation video devices:") {
            section = Some(MediaDeviceKind::VideoInput);
            continue;
        }
        if line.contains("AVFoundation audio devices:") {
            section = Some(MediaDeviceKind::AudioInput);
            continue;
        }

        let (Some(kind), Some((index, name))) = (section, parse_device_line(line)) else {
            continue;
        };

        match kind {
            MediaDeviceKind::VideoInput if name.starts_with("Capture screen") => {
                log::debug!("Skipping screen capture device [{}] {}", index, name);
            }
            MediaDeviceKind::VideoInput => {
                devices.push(MediaDeviceInfo::new(index.to_string(), kind, name));
            }
            _ => {
                devices.push(MediaDeviceInfo::new(
                    format!("{}{}", AUDIO_ID_PREFIX, index),
                    kind,
                    name,
                ));
            }
        }
    }

    devices
}

/// Parse a single device line from FFmpeg output.
///
/// The line format is `[AVFoundation indev @ 0x...] [index] device name`.
pub fn parse_device_line(line: &str) -> Option<(usize, String)> {
    let bracket_idx = line.find("] [")?;
    let after_bracket = &line[bracket_idx + 3..];

    let close_bracket = after_bracket.find(']')?;
    let index: usize = after_bracket[..close_bracket].parse().ok()?;

    let name = after_bracket.get(close_bracket + 1..)?.trim().to_string();
    if name.is_empty() {
        return None;
    }

    Some((index, name))
}

/// Run `v4l2-ctl --list-devices`.
pub async fn list_v4l2_devices() -> Result<Vec<MediaDeviceInfo>, PlatformError> {
    let output = Command::new("v4l2-ctl")
        .arg("--list-devices")
        .stderr(Stdio::piped())
        .output()
        .await?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        // v4l2-ctl exits non-zero when no devices exist at all
        if stderr.contains("Cannot open device") {
            return Ok(Vec::new());
        }
        return Err(PlatformError::Other(format!(
            "v4l2-ctl exited with {}: {}",
            output.status,
            stderr.trim()
        )));
    }

    Ok(parse_v4l2_list(&String::from_utf8_lossy(&output.stdout)))
}

/// Parse `v4l2-ctl --list-devices` output.
///
/// Each camera is a header line followed by indented device nodes. Only the
/// first `/dev/video*` node of a group is the capture node; the rest are
/// metadata nodes and are skipped.
pub fn parse_v4l2_list(stdout: &str) -> Vec<MediaDeviceInfo> {
    let mut devices = Vec::new();
    let mut header: Option<String> = None;
    let mut taken = false;

    for raw in stdout.lines() {
        let line = raw.trim_end();
        if line.is_empty() {
            header = None;
            continue;
        }

        if raw.starts_with(' ') || raw.starts_with('\t') {
            let node = line.trim();
            if let Some(name) = &header {
                if !taken && node.starts_with("/dev/video") {
                    devices.push(
                        MediaDeviceInfo::new(node, MediaDeviceKind::VideoInput, name.as_str())
                            .with_group(name.as_str()),
                    );
                    taken = true;
                }
            }
        } else {
            header = Some(line.trim_end_matches(':').to_string());
            taken = false;
        }
    }

    devices
}
