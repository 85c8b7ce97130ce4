//! CLI enum types for facing mode and input device options.

use clap::ValueEnum;

use crate::camera::FacingMode;
use crate::media::InputFormat;

/// Camera facing direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Facing {
    User,
    Environment,
    Left,
    Right,
}

impl From<Facing> for FacingMode {
    fn from(f: Facing) -> Self {
        match f {
            Facing::User => FacingMode::User,
            Facing::Environment => FacingMode::Environment,
            Facing::Left => FacingMode::Left,
            Facing::Right => FacingMode::Right,
        }
    }
}

/// FFmpeg input device family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Input {
    #[value(name = "avfoundation")]
    Avfoundation,
    #[value(name = "v4l2")]
    V4l2,
}

impl From<Input> for InputFormat {
    fn from(i: Input) -> Self {
        match i {
            Input::Avfoundation => InputFormat::AvFoundation,
            Input::V4l2 => InputFormat::V4l2,
        }
    }
}
