use directories::ProjectDirs;
use std::path::PathBuf;

/// Centralized application directory resolution
pub struct AppDirs;

impl AppDirs {
    pub fn config_path() -> PathBuf {
        ProjectDirs::from("", "", "mathdrill")
            .map(|proj_dirs| proj_dirs.config_dir().join("config.json"))
            .unwrap_or_else(|| PathBuf::from("mathdrill_config.json"))
    }

    /// Exports land next to where the drill was started.
    pub fn default_export_dir() -> PathBuf {
        PathBuf::from(".")
    }
}
