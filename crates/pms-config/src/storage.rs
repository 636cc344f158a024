//! Local store configuration.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

fn default_db_path() -> String {
    ".pms/pms.db".to_string()
}

fn default_trail_dir() -> String {
    ".pms/trail".to_string()
}

const fn default_trail_enabled() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageConfig {
    /// libSQL database file. `:memory:` keeps everything in memory.
    #[serde(default = "default_db_path")]
    pub db_path: String,

    /// Directory for per-vessel JSONL trail files.
    #[serde(default = "default_trail_dir")]
    pub trail_dir: String,

    #[serde(default = "default_trail_enabled")]
    pub trail_enabled: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
            trail_dir: default_trail_dir(),
            trail_enabled: default_trail_enabled(),
        }
    }
}

impl StorageConfig {
    /// Trail directory, or `None` when the trail is switched off.
    #[must_use]
    pub fn trail_dir(&self) -> Option<PathBuf> {
        self.trail_enabled.then(|| PathBuf::from(&self.trail_dir))
    }

    #[must_use]
    pub fn is_in_memory(&self) -> bool {
        self.db_path == ":memory:"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_into_dot_pms() {
        let config = StorageConfig::default();
        assert_eq!(config.db_path, ".pms/pms.db");
        assert_eq!(config.trail_dir(), Some(PathBuf::from(".pms/trail")));
        assert!(!config.is_in_memory());
    }

    #[test]
    fn disabled_trail_has_no_dir() {
        let config = StorageConfig {
            trail_enabled: false,
            ..StorageConfig::default()
        };
        assert!(config.trail_dir().is_none());
    }
}
