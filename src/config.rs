//! Matcher settings.
//!
//! Stored as pretty-printed JSON in the user config directory. Missing fields
//! take their defaults; files written by a newer format version are refused
//! rather than half-read.

use std::io::ErrorKind;
use std::path::Path;

use log::LevelFilter;
use serde::{Deserialize, Serialize};

/// Current settings format version.
/// Bump when a field changes meaning.
pub const CONFIG_VERSION: u32 = 1;

/// Matches returned per pick unless the caller asks for another count.
pub const DEFAULT_TOP_K: usize = 5;

/// Catalog size above which picks are ranked on the background worker.
pub const DEFAULT_OFFLOAD_THRESHOLD: usize = 2_000;

const CONFIG_DIR: &str = "paintmatch";
const CONFIG_FILENAME: &str = "matcher.json";

/// Errors reading or writing matcher settings.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File is not valid settings JSON
    #[error("Malformed matcher settings: {0}")]
    Parse(#[from] serde_json::Error),

    /// File was written by a newer format version
    #[error("Matcher settings format {found} is newer than supported format {supported}")]
    UnsupportedVersion { found: u32, supported: u32 },

    /// File could not be read or written
    #[error("Cannot access matcher settings: {0}")]
    Io(#[from] std::io::Error),
}

/// Settings consumed by [`PaintMatcher`](crate::matcher::PaintMatcher).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatcherConfig {
    /// Settings format version
    pub version: u32,

    /// Matches returned per pick
    pub default_top_k: usize,

    /// Maximum level the engine logs at; stored as `"info"`, `"debug"`, ...
    pub log_level: LevelFilter,

    /// Catalogs longer than this are ranked off the caller's thread
    pub offload_threshold: usize,
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            default_top_k: DEFAULT_TOP_K,
            log_level: LevelFilter::Info,
            offload_threshold: DEFAULT_OFFLOAD_THRESHOLD,
        }
    }
}

impl MatcherConfig {
    /// Top-K for a pick. A stored zero would make every pick fail, so it
    /// reads as one.
    pub fn effective_top_k(&self) -> usize {
        self.default_top_k.max(1)
    }

    /// Whether a catalog of `catalog_len` entries is ranked on the worker.
    pub fn should_offload(&self, catalog_len: usize) -> bool {
        catalog_len > self.offload_threshold
    }

    /// Cap the global `log` level at the configured one.
    pub fn apply_log_level(&self) {
        log::set_max_level(self.log_level);
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        if config.version > CONFIG_VERSION {
            return Err(ConfigError::UnsupportedVersion {
                found: config.version,
                supported: CONFIG_VERSION,
            });
        }
        Ok(config)
    }

    /// `<config dir>/paintmatch/matcher.json`, if the platform has a config dir.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn user_path() -> Option<std::path::PathBuf> {
        dirs::config_dir().map(|dir| dir.join(CONFIG_DIR).join(CONFIG_FILENAME))
    }

    /// Read settings from `path`. A missing file yields the defaults.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(json) => {
                let config = Self::from_json(&json)?;
                log::debug!("Matcher settings read from {}", path.display());
                Ok(config)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                log::debug!("No matcher settings at {}, using defaults", path.display());
                Ok(Self::default())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Settings from [`user_path`](Self::user_path). Unreadable or invalid
    /// files are logged and replaced by the defaults.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_user() -> Self {
        let Some(path) = Self::user_path() else {
            return Self::default();
        };
        Self::load_or_default(&path).unwrap_or_else(|e| {
            log::warn!("Ignoring matcher settings at {}: {}", path.display(), e);
            Self::default()
        })
    }

    /// Write settings to `path`, creating missing parent directories.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, self.to_json()?)?;
        log::info!("Matcher settings written to {}", path.display());
        Ok(())
    }
}
