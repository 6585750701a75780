//! Configuration for the catalog.
//!
//! SHELF_ROOT resolution order:
//! 1. Explicit path passed to Config::with_root() / Config::load_from()
//! 2. SHELF_ROOT environment variable
//! 3. Default: platform data directory (~/.local/share/shelf on Linux)

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Environment variable overriding the catalog root.
pub const SHELF_ROOT_VAR: &str = "SHELF_ROOT";

/// Catalog configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Root directory holding the catalog file and this config.
    #[serde(default)]
    pub root: PathBuf,

    /// Default tracing filter when SHELF_LOG is unset.
    #[serde(default = "default_log_filter")]
    pub log_filter: String,

    /// Number of documents `top` returns when no count is given.
    #[serde(default = "default_top_k")]
    pub top_k: usize,

    /// Pretty-print JSON output.
    #[serde(default = "default_pretty")]
    pub pretty: bool,
}

fn default_log_filter() -> String {
    "warn".to_string()
}

fn default_top_k() -> usize {
    10
}

fn default_pretty() -> bool {
    true
}

impl Config {
    /// Create a new config with the given root.
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            log_filter: default_log_filter(),
            top_k: default_top_k(),
            pretty: default_pretty(),
        }
    }

    /// Load config from SHELF_ROOT/config.toml, or create default.
    pub fn load() -> Result<Self> {
        let root = resolve_root()?;
        Self::load_from(&root)
    }

    /// Load config from a specific root.
    pub fn load_from(root: &Path) -> Result<Self> {
        let config_path = root.join("config.toml");

        if config_path.exists() {
            let contents = std::fs::read_to_string(&config_path)?;
            let mut config: Config = toml::from_str(&contents)
                .map_err(|e| Error::Config(format!("Failed to parse config: {}", e)))?;
            // Ensure root matches the actual location
            config.root = root.to_path_buf();
            Ok(config)
        } else {
            Ok(Self::with_root(root))
        }
    }

    /// Save config to SHELF_ROOT/config.toml.
    pub fn save(&self) -> Result<()> {
        std::fs::create_dir_all(&self.root)?;
        let contents = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(self.config_path(), contents)?;
        Ok(())
    }

    pub fn config_path(&self) -> PathBuf {
        self.root.join("config.toml")
    }

    /// Path to the JSON file holding both collections.
    pub fn catalog_path(&self) -> PathBuf {
        self.root.join("catalog.json")
    }
}

fn resolve_root() -> Result<PathBuf> {
    if let Ok(path) = std::env::var(SHELF_ROOT_VAR) {
        return Ok(PathBuf::from(path));
    }

    if let Some(proj_dirs) = ProjectDirs::from("", "", "shelf") {
        return Ok(proj_dirs.data_dir().to_path_buf());
    }

    let home = std::env::var("HOME")
        .map_err(|_| Error::Config("Could not determine home directory".to_string()))?;
    Ok(PathBuf::from(home).join(".local/share/shelf"))
}
