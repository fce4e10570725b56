// SPDX-License-Identifier: MPL-2.0
//! Config directory resolution.
//!
//! # Resolution Order
//!
//! 1. **Explicit override** - parameter to [`config_dir_with_override`] (tests, `--config`)
//! 2. **Environment variable** - `TESTIMONIAL_EDITOR_CONFIG_DIR`
//! 3. **Platform default** - via `dirs` crate, with the application name appended

use std::path::PathBuf;

/// Application name used for directory naming.
const APP_NAME: &str = "TestimonialEditor";

/// Environment variable to override the config directory.
pub const ENV_CONFIG_DIR: &str = "TESTIMONIAL_EDITOR_CONFIG_DIR";

/// Returns the config directory path.
///
/// - Linux: `~/.config/TestimonialEditor/`
/// - macOS: `~/Library/Application Support/TestimonialEditor/`
/// - Windows: `C:\Users\<User>\AppData\Roaming\TestimonialEditor\`
///
/// Returns `None` if the platform config directory cannot be determined.
#[must_use]
pub fn config_dir() -> Option<PathBuf> {
    config_dir_with_override(None)
}

/// Returns the config directory path, honoring an explicit override first.
#[must_use]
pub fn config_dir_with_override(override_path: Option<PathBuf>) -> Option<PathBuf> {
    if let Some(path) = override_path {
        return Some(path);
    }

    if let Some(path) = env_override() {
        return Some(path);
    }

    dirs::config_dir().map(|mut path| {
        path.push(APP_NAME);
        path
    })
}

fn env_override() -> Option<PathBuf> {
    std::env::var_os(ENV_CONFIG_DIR)
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn explicit_override_wins() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        let resolved = config_dir_with_override(Some(temp_dir.path().to_path_buf()));
        assert_eq!(resolved.as_deref(), Some(temp_dir.path()));
    }

    #[test]
    fn default_path_ends_with_app_name() {
        // Only meaningful when no env override leaks in from the test runner.
        if std::env::var_os(ENV_CONFIG_DIR).is_some() {
            return;
        }
        if let Some(path) = config_dir() {
            assert!(path.ends_with(APP_NAME));
        }
    }
}
