//! Camera listing and access.
//!
//! - Enumeration via [`CameraDirectory::list_cameras`]
//! - Per-device start/stop via [`Camera`]
//! - Label cleanup via [`camera_name`]

mod constraints;
mod directory;
mod error;
mod handle;
mod name;
mod types;

pub use constraints::{
    Constrain, FacingMode, LegacyLimits, LegacyVideoConstraints, Mandatory, MediaStreamConstraints,
    VideoConstraints, VideoRequest,
};
pub use directory::CameraDirectory;
pub use error::{CameraError, MediaError};
pub use handle::Camera;
pub use name::camera_name;
pub use types::{AccessStrategy, CameraOptions};
