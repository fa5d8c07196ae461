//! Configuration file loading.
//!
//! Reads `config/default.toml` (or the file named by `--config`).  A missing
//! file or a missing section falls back to defaults; a file that exists but
//! does not parse is an error.

use std::fmt;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use nutribot_agent::AgentConfig;
use serde::Deserialize;
use tracing::debug;

/// The whole configuration file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    pub agent: AgentConfig,
    pub catalog: CatalogConfig,
    pub logging: LoggingConfig,
}

/// The `[catalog]` section.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// Directory of catalog JSON files.  Empty means the built-in catalog.
    pub data_dir: String,
}

impl CatalogConfig {
    pub fn data_dir(&self) -> Option<PathBuf> {
        let dir = self.data_dir.trim();
        (!dir.is_empty()).then(|| PathBuf::from(dir))
    }
}

/// The `[logging]` section.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

/// Where the effective configuration came from.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigSource {
    File(PathBuf),
    Defaults,
}

impl fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File(path) => write!(f, "{}", path.display()),
            Self::Defaults => f.write_str("built-in defaults"),
        }
    }
}

impl CliConfig {
    /// Load `path`, or defaults when it does not exist.
    pub fn load(path: &Path) -> Result<(Self, ConfigSource)> {
        if !path.exists() {
            debug!(path = %path.display(), "config file not found, using defaults");
            return Ok((Self::default(), ConfigSource::Defaults));
        }

        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let config: Self =
            toml::from_str(&text).with_context(|| format!("failed to parse {}", path.display()))?;
        config
            .agent
            .validate()
            .with_context(|| format!("invalid [agent] section in {}", path.display()))?;
        Ok((config, ConfigSource::File(path.to_path_buf())))
    }
}
