use clap::Parser;
use std::sync::Arc;

use camdir::camera::CameraDirectory;
use camdir::cli::{self, Args, Command};
use camdir::config::{self, Config};
use camdir::media::FfmpegMediaDevices;

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let config_path = args.config.clone().unwrap_or_else(config::default_path);

    let mut config = match Config::load(Some(&config_path)) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };
    args.apply(&mut config);

    let platform = Arc::new(FfmpegMediaDevices::new(config.ffmpeg.clone()));
    let directory = CameraDirectory::new(platform, config.camera.clone());

    let result = match args.command {
        Command::List { json, .. } => cli::list_cameras(&directory, json).await.map_err(|e| e.to_string()),
        Command::Access => cli::ensure_access(&directory).await.map_err(|e| e.to_string()),
        Command::Open { id, facing, seconds } => {
            cli::open_camera(&directory, &id, facing.map(Into::into), seconds)
                .await
                .map_err(|e| e.to_string())
        }
        Command::Config { action } => {
            cli::handle_config_action(action, &config, &config_path).map_err(|e| e.to_string())
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
