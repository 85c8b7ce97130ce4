//! CLI argument parsing with clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use super::enums::{Facing, Input};
use crate::config::Config;

/// List, open and release cameras
#[derive(Parser, Debug)]
#[command(name = "camdir")]
#[command(version, about = "List, open and release cameras", long_about = None)]
#[command(after_help = "EXAMPLES:
    camdir list                     # Cameras sorted by name
    camdir list --json --unsorted   # Raw enumeration order as JSON
    camdir open 0 --seconds 5       # Hold camera 0 for five seconds
    camdir --raw-errors access      # Show FFmpeg's own error on failure")]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Config file path
    #[arg(long, short, global = true)]
    pub config: Option<PathBuf>,

    /// Report platform errors as-is instead of wrapping them
    #[arg(long, global = true)]
    pub raw_errors: bool,

    /// FFmpeg input device family (default: avfoundation on macOS, v4l2 elsewhere)
    #[arg(long, global = true)]
    pub input: Option<Input>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List available cameras
    List {
        /// Prefer this camera while holding access during enumeration
        #[arg(long)]
        facing: Option<Facing>,
        /// Keep enumeration order
        #[arg(long)]
        unsorted: bool,
        /// Probe access briefly instead of holding it while enumerating
        #[arg(long)]
        probe: bool,
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Request camera access once and release it
    Access,
    /// Open a camera and hold it until Ctrl-C
    Open {
        /// Device id (from `camdir list`)
        id: String,
        /// Facing mode hint
        #[arg(long)]
        facing: Option<Facing>,
        /// Release after this many seconds
        #[arg(long)]
        seconds: Option<u64>,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug, Clone)]
pub enum ConfigAction {
    /// Show current configuration
    Show,
    /// Create default config file
    Init,
}

impl Args {
    /// Fold command-line overrides into the loaded configuration.
    pub fn apply(&self, config: &mut Config) {
        if self.raw_errors {
            config.camera.wrap_errors = false;
        }
        if let Some(input) = self.input {
            config.ffmpeg.input = input.into();
        }
        if let Command::List {
            facing,
            unsorted,
            probe,
            ..
        } = &self.command
        {
            if let Some(facing) = facing {
                config.camera.facing_mode = (*facing).into();
            }
            if *unsorted {
                config.camera.sort_by_name = false;
            }
            if *probe {
                config.camera.access = crate::camera::AccessStrategy::Probe;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::{AccessStrategy, FacingMode};
    use crate::media::InputFormat;

    #[test]
    fn test_parse_list_flags() {
        let args = Args::parse_from(["camdir", "list", "--facing", "user", "--unsorted", "--json"]);
        match args.command {
            Command::List {
                facing,
                unsorted,
                probe,
                json,
            } => {
                assert_eq!(facing, Some(Facing::User));
                assert!(unsorted);
                assert!(!probe);
                assert!(json);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_open() {
        let args = Args::parse_from(["camdir", "open", "1", "--seconds", "3"]);
        match args.command {
            Command::Open { id, seconds, facing } => {
                assert_eq!(id, "1");
                assert_eq!(seconds, Some(3));
                assert_eq!(facing, None);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let args = Args::parse_from(["camdir", "access", "--raw-errors", "--input", "v4l2"]);
        assert!(args.raw_errors);
        assert_eq!(args.input, Some(Input::V4l2));
    }

    #[test]
    fn test_apply_overrides() {
        let args = Args::parse_from([
            "camdir",
            "--raw-errors",
            "--input",
            "avfoundation",
            "list",
            "--facing",
            "user",
            "--unsorted",
            "--probe",
        ]);
        let mut config = Config::default();
        args.apply(&mut config);
        assert!(!config.camera.wrap_errors);
        assert!(!config.camera.sort_by_name);
        assert_eq!(config.camera.access, AccessStrategy::Probe);
        assert_eq!(config.camera.facing_mode, FacingMode::User);
        assert_eq!(config.ffmpeg.input, InputFormat::AvFoundation);
    }

    #[test]
    fn test_apply_keeps_config_without_flags() {
        let args = Args::parse_from(["camdir", "access"]);
        let mut config = Config::default();
        args.apply(&mut config);
        assert!(config.camera.wrap_errors);
        assert!(config.camera.sort_by_name);
    }

    #[test]
    fn test_missing_subcommand_is_error() {
        assert!(Args::try_parse_from(["camdir"]).is_err());
    }
}
