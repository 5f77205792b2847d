//! Configuration for the chord explorer binaries.
//!
//! TOML files are discovered in load order (system, user, local), merged
//! field-by-field, then overlaid with `FACGCE_*` environment variables.
//! The upstream API key deliberately has no config field: it is read from
//! `ANTHROPIC_API_KEY` only, so it never lands in a file on disk.

mod loader;

use std::path::PathBuf;

use serde::Deserialize;
use thiserror::Error;

pub use loader::{apply_env_overrides, discover_config_files, load, load_from_file, merge};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file {path}: {message}")]
    Parse { path: PathBuf, message: String },
}

/// Where config values came from, for startup logging.
#[derive(Debug, Clone, Default)]
pub struct ConfigSources {
    /// Config files that were loaded, in order.
    pub files: Vec<PathBuf>,
    /// Environment variables that overrode config values.
    pub env_overrides: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct FacgceConfig {
    /// tracing filter directive used when RUST_LOG is unset.
    pub log_level: String,
    pub chat: ChatSection,
}

impl Default for FacgceConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            chat: ChatSection::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ChatSection {
    pub port: u16,
    pub upstream_url: String,
    pub model: String,
    pub max_tokens: u32,
    pub rate_window_secs: u64,
    pub rate_max_requests: usize,
}

impl Default for ChatSection {
    fn default() -> Self {
        Self {
            port: 8080,
            upstream_url: "https://api.anthropic.com".to_string(),
            model: "claude-haiku-4-5-20251001".to_string(),
            max_tokens: 600,
            rate_window_secs: 60,
            rate_max_requests: 20,
        }
    }
}
