//! OS-specific directory resolution.

use std::path::{Path, PathBuf};

const APP_NAME: &str = "strata";

/// Directories used by the generator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppDirs {
    /// Holds `config.ron`.
    pub config_dir: PathBuf,
    /// Holds `strata.log` in debug builds.
    pub log_dir: PathBuf,
}

impl AppDirs {
    /// Resolve platform directories without creating them.
    ///
    /// Falls back to the working directory when the OS exposes no config
    /// directory.
    pub fn resolve() -> Self {
        let base = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        Self::resolve_with_root(&base)
    }

    /// Resolve directories under a custom base path.
    pub fn resolve_with_root(root: &Path) -> Self {
        let app_dir = root.join(APP_NAME);
        Self {
            config_dir: app_dir.join("config"),
            log_dir: app_dir.join("logs"),
        }
    }

    /// Use an explicit config directory, keeping logs beside it.
    pub fn with_config_dir(config_dir: PathBuf) -> Self {
        let log_dir = config_dir.join("logs");
        Self {
            config_dir,
            log_dir,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_with_root() {
        let dirs = AppDirs::resolve_with_root(Path::new("/tmp/root"));
        assert_eq!(dirs.config_dir, PathBuf::from("/tmp/root/strata/config"));
        assert_eq!(dirs.log_dir, PathBuf::from("/tmp/root/strata/logs"));
    }

    #[test]
    fn test_explicit_config_dir() {
        let dirs = AppDirs::with_config_dir(PathBuf::from("cfg"));
        assert_eq!(dirs.config_dir, PathBuf::from("cfg"));
        assert_eq!(dirs.log_dir, PathBuf::from("cfg/logs"));
    }

    #[test]
    fn test_resolve_ends_in_app_dir() {
        let dirs = AppDirs::resolve();
        assert!(dirs.config_dir.ends_with("strata/config"));
    }
}
