//! Subcommand handlers.

use serde::Serialize;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Notify;

use super::args::ConfigAction;
use crate::camera::{Camera, CameraDirectory, CameraError, FacingMode};
use crate::config::{Config, ConfigError};

#[derive(Serialize)]
struct CameraEntry<'a> {
    id: &'a str,
    name: Option<&'a str>,
}

/// Render cameras the way `camdir list` prints them.
pub fn format_camera_list(cameras: &[Camera], json: bool) -> String {
    if json {
        let entries: Vec<CameraEntry<'_>> = cameras
            .iter()
            .map(|c| CameraEntry {
                id: c.id(),
                name: c.name(),
            })
            .collect();
        return serde_json::to_string_pretty(&entries).unwrap_or_else(|_| "[]".to_string());
    }

    if cameras.is_empty() {
        return "No cameras found.\n\n\
                Make sure your camera is connected and permissions are granted."
            .to_string();
    }

    let mut out = String::from("Available cameras:\n");
    for camera in cameras {
        out.push_str(&format!("  {}\n", camera));
    }
    out.push_str("\nUse `camdir open <id>` to open a camera.");
    out
}

/// List available cameras and print them to stdout.
pub async fn list_cameras(directory: &CameraDirectory, json: bool) -> Result<(), CameraError> {
    let cameras = directory.list_cameras(None).await?;
    println!("{}", format_camera_list(&cameras, json));
    Ok(())
}

/// Request access once so the permission prompt shows up.
pub async fn ensure_access(directory: &CameraDirectory) -> Result<(), CameraError> {
    directory.ensure_access().await?;
    println!("Camera access granted.");
    Ok(())
}

/// Open a camera and hold it until Ctrl-C or the timeout.
pub async fn open_camera(
    directory: &CameraDirectory,
    id: &str,
    facing: Option<FacingMode>,
    seconds: Option<u64>,
) -> Result<(), CameraError> {
    let mut camera = directory.camera(id, None);
    let stream = camera.start(facing).await?;
    println!(
        "Camera {} is open ({} video track(s)). Press Ctrl-C to release it.",
        id,
        stream.video_tracks().count()
    );

    let release = Arc::new(Notify::new());
    let handler = release.clone();
    if let Err(e) = ctrlc::set_handler(move || handler.notify_one()) {
        log::warn!("Failed to install Ctrl-C handler: {}", e);
    }

    match seconds {
        Some(secs) => {
            let _ = tokio::time::timeout(Duration::from_secs(secs), release.notified()).await;
        }
        None => release.notified().await,
    }

    camera.stop();
    println!("Camera released.");
    Ok(())
}

/// Handle config subcommand actions.
pub fn handle_config_action(action: ConfigAction, config: &Config, path: &Path) -> Result<(), ConfigError> {
    match action {
        ConfigAction::Show => {
            let rendered = config
                .to_toml()
                .map_err(|e| ConfigError::SerializeError(e.to_string()))?;
            println!("Current configuration:\n");
            println!("{}", rendered);
            if path.exists() {
                println!("Config file: {} (exists)", path.display());
            } else {
                println!("Config file: {} (not found)", path.display());
            }
        }
        ConfigAction::Init => {
            Config::init(path)?;
            println!("Created config file: {}", path.display());
        }
    }
    Ok(())
}
