use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::app_dirs::AppDirs;
use crate::error::{DrillError, Result};

pub const DEFAULT_ROUNDS: usize = 10;
pub const DEFAULT_TOLERANCE: f64 = 0.01;
pub const DEFAULT_WEAK_THRESHOLD: f64 = 50.0;
pub const DEFAULT_EXTRA_EXERCISES: usize = 5;
pub const DEFAULT_REFRESH_INTERVAL_SECS: f64 = 5.0;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DrillConfig {
    /// Questions per operation in one evaluation round
    pub rounds: usize,
    pub tolerance: f64,
    /// Accuracy percentage below which an operation gets extra practice
    pub weak_threshold: f64,
    pub extra_exercises: usize,
    pub refresh_interval_secs: f64,
    pub export_dir: PathBuf,
}

impl Default for DrillConfig {
    fn default() -> Self {
        Self {
            rounds: DEFAULT_ROUNDS,
            tolerance: DEFAULT_TOLERANCE,
            weak_threshold: DEFAULT_WEAK_THRESHOLD,
            extra_exercises: DEFAULT_EXTRA_EXERCISES,
            refresh_interval_secs: DEFAULT_REFRESH_INTERVAL_SECS,
            export_dir: AppDirs::default_export_dir(),
        }
    }
}

impl DrillConfig {
    pub fn validate(&self) -> Result<()> {
        if self.rounds == 0 {
            return Err(DrillError::InvalidConfig("rounds must be at least 1".into()));
        }
        if !(self.tolerance.is_finite() && self.tolerance > 0.0) {
            return Err(DrillError::InvalidConfig(format!(
                "tolerance must be positive, got {}",
                self.tolerance
            )));
        }
        match Duration::try_from_secs_f64(self.refresh_interval_secs) {
            Ok(interval) if !interval.is_zero() => {}
            _ => {
                return Err(DrillError::InvalidConfig(format!(
                    "refresh interval must be a positive number of seconds, got {}",
                    self.refresh_interval_secs
                )))
            }
        }
        Ok(())
    }

    /// Falls back to the default interval for values `validate` rejects.
    pub fn refresh_interval(&self) -> Duration {
        Duration::try_from_secs_f64(self.refresh_interval_secs)
            .ok()
            .filter(|interval| !interval.is_zero())
            .unwrap_or_else(|| Duration::from_secs_f64(DEFAULT_REFRESH_INTERVAL_SECS))
    }
}

pub trait ConfigStore {
    fn load(&self) -> DrillConfig;
    fn save(&self, cfg: &DrillConfig) -> Result<()>;
}

#[derive(Debug, Clone)]
pub struct FileConfigStore {
    path: PathBuf,
}

impl FileConfigStore {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        Self {
            path: AppDirs::config_path(),
        }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for FileConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigStore for FileConfigStore {
    /// Missing or unreadable files fall back to the built-in defaults.
    fn load(&self) -> DrillConfig {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(_) => return DrillConfig::default(),
        };
        match serde_json::from_slice::<DrillConfig>(&bytes) {
            Ok(cfg) => cfg,
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "ignoring invalid config file");
                DrillConfig::default()
            }
        }
    }

    fn save(&self, cfg: &DrillConfig) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(cfg)?;
        fs::write(&self.path, data)?;
        Ok(())
    }
}
