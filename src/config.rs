use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::app_dirs::AppDirs;

/// Pixel dimensions of one chart
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChartSize {
    pub width: u32,
    pub height: u32,
}

impl ChartSize {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl From<ChartSize> for (u32, u32) {
    fn from(size: ChartSize) -> Self {
        (size.width, size.height)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ChartConfig {
    pub histogram_bins: usize,
    pub daily_size: ChartSize,
    pub histogram_size: ChartSize,
    pub scatter_size: ChartSize,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            histogram_bins: 10,
            daily_size: ChartSize::new(1200, 600),
            histogram_size: ChartSize::new(1000, 600),
            scatter_size: ChartSize::new(1000, 600),
        }
    }
}

pub trait ConfigStore {
    fn load(&self) -> ChartConfig;
    fn save(&self, cfg: &ChartConfig) -> std::io::Result<()>;
}

#[derive(Debug, Clone)]
pub struct FileConfigStore {
    path: PathBuf,
}

impl FileConfigStore {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        let path = AppDirs::config_path().unwrap_or_else(|| PathBuf::from("typetrend_config.json"));
        Self { path }
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
    /// Missing or unreadable config falls back to defaults
    fn load(&self) -> ChartConfig {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(_) => {
                debug!(path = %self.path.display(), "no config file, using defaults");
                return ChartConfig::default();
            }
        };

        match serde_json::from_slice::<ChartConfig>(&bytes) {
            Ok(cfg) => cfg,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "ignoring invalid config file");
                ChartConfig::default()
            }
        }
    }

    fn save(&self, cfg: &ChartConfig) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(cfg)?;
        fs::write(&self.path, data)
    }
}
