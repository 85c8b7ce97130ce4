//! Camera options shared by the directory and its handles.

use serde::{Deserialize, Serialize};

use super::constraints::{FacingMode, LegacyLimits};

/// How `list_cameras` makes device labels available before enumerating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccessStrategy {
    /// Hold a grant on the preferred camera while enumerating, then release it
    #[default]
    Hold,
    /// Request and immediately release a minimal grant, then enumerate
    Probe,
}

/// Behavior switches for [`CameraDirectory`](super::CameraDirectory) and
/// [`Camera`](super::Camera).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraOptions {
    /// Turn named platform errors into `MediaError`. Off during development
    /// to see the platform's own errors.
    pub wrap_errors: bool,
    /// Sort listed cameras by name
    pub sort_by_name: bool,
    pub access: AccessStrategy,
    /// Facing mode requested by the default `list_cameras` grant
    pub facing_mode: FacingMode,
    /// Request cameras with the legacy `mandatory` constraint form
    pub legacy_constraints: bool,
    pub legacy: LegacyLimits,
}

impl Default for CameraOptions {
    fn default() -> Self {
        Self {
            wrap_errors: true,
            sort_by_name: true,
            access: AccessStrategy::default(),
            facing_mode: FacingMode::default(),
            legacy_constraints: false,
            legacy: LegacyLimits::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_camera_options_default() {
        let options = CameraOptions::default();
        assert!(options.wrap_errors);
        assert!(options.sort_by_name);
        assert_eq!(options.access, AccessStrategy::Hold);
        assert_eq!(options.facing_mode, FacingMode::Environment);
        assert!(!options.legacy_constraints);
        assert_eq!(options.legacy.min_width, 600);
        assert_eq!(options.legacy.max_width, 800);
    }

    #[test]
    fn test_camera_options_partial_toml() {
        let options: CameraOptions = toml::from_str(
            r#"
wrap_errors = false
access = "probe"
facing_mode = "user"
"#,
        )
        .unwrap();
        assert!(!options.wrap_errors);
        assert!(options.sort_by_name);
        assert_eq!(options.access, AccessStrategy::Probe);
        assert_eq!(options.facing_mode, FacingMode::User);
    }
}
