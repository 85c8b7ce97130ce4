//! Command-line interface definitions and helpers.
//!
//! This module contains all CLI argument parsing, enums, and subcommand handlers.

mod args;
mod commands;
mod enums;

pub use args::{Args, Command, ConfigAction};
pub use commands::{ensure_access, format_camera_list, handle_config_action, list_cameras, open_camera};
pub use enums::{Facing, Input};
