//! Config file discovery, loading, and environment variable overlay.

use std::env;
use std::path::{Path, PathBuf};

use crate::{ChatSection, ConfigError, ConfigSources, FacgceConfig};

/// Discover config files in standard locations.
///
/// Returns paths in load order (system, user, local). Only returns files
/// that exist. A CLI override path replaces the local file.
pub fn discover_config_files(cli_path: Option<&Path>) -> Vec<PathBuf> {
    let mut files = Vec::new();

    let system = PathBuf::from("/etc/facgce/config.toml");
    if system.exists() {
        files.push(system);
    }

    if let Some(config_dir) = directories::BaseDirs::new().map(|d| d.config_dir().to_path_buf()) {
        let user = config_dir.join("facgce/config.toml");
        if user.exists() {
            files.push(user);
        }
    }

    if let Some(path) = cli_path {
        if path.exists() {
            files.push(path.to_path_buf());
            return files;
        }
    }

    let local = PathBuf::from("facgce.toml");
    if local.exists() {
        files.push(local);
    }

    files
}

/// Load a single TOML config file.
pub fn load_from_file(path: &Path) -> Result<FacgceConfig, ConfigError> {
    let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
        path: path.to_path_buf(),
        source: e,
    })?;

    toml::from_str(&contents).map_err(|e| ConfigError::Parse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Merge two configs; non-default fields of `overlay` win.
pub fn merge(base: FacgceConfig, overlay: FacgceConfig) -> FacgceConfig {
    let defaults = FacgceConfig::default();
    let chat_defaults = ChatSection::default();

    fn pick<T: PartialEq>(base: T, overlay: T, default: &T) -> T {
        if overlay != *default {
            overlay
        } else {
            base
        }
    }

    FacgceConfig {
        log_level: pick(base.log_level, overlay.log_level, &defaults.log_level),
        chat: ChatSection {
            port: pick(base.chat.port, overlay.chat.port, &chat_defaults.port),
            upstream_url: pick(
                base.chat.upstream_url,
                overlay.chat.upstream_url,
                &chat_defaults.upstream_url,
            ),
            model: pick(base.chat.model, overlay.chat.model, &chat_defaults.model),
            max_tokens: pick(
                base.chat.max_tokens,
                overlay.chat.max_tokens,
                &chat_defaults.max_tokens,
            ),
            rate_window_secs: pick(
                base.chat.rate_window_secs,
                overlay.chat.rate_window_secs,
                &chat_defaults.rate_window_secs,
            ),
            rate_max_requests: pick(
                base.chat.rate_max_requests,
                overlay.chat.rate_max_requests,
                &chat_defaults.rate_max_requests,
            ),
        },
    }
}

/// Apply environment variable overrides.
pub fn apply_env_overrides(config: &mut FacgceConfig, sources: &mut ConfigSources) {
    if let Ok(v) = env::var("FACGCE_HTTP_PORT") {
        if let Ok(port) = v.parse() {
            config.chat.port = port;
            sources.env_overrides.push("FACGCE_HTTP_PORT".to_string());
        }
    }
    if let Ok(v) = env::var("FACGCE_UPSTREAM_URL") {
        config.chat.upstream_url = v;
        sources.env_overrides.push("FACGCE_UPSTREAM_URL".to_string());
    }
    if let Ok(v) = env::var("FACGCE_MODEL") {
        config.chat.model = v;
        sources.env_overrides.push("FACGCE_MODEL".to_string());
    }
    if let Ok(v) = env::var("FACGCE_LOG_LEVEL") {
        config.log_level = v;
        sources.env_overrides.push("FACGCE_LOG_LEVEL".to_string());
    }
    // RUST_LOG wins over everything, as usual
    if let Ok(v) = env::var("RUST_LOG") {
        config.log_level = v;
        sources.env_overrides.push("RUST_LOG".to_string());
    }
}

/// Discover, load, merge, and overlay in one call.
pub fn load(cli_path: Option<&Path>) -> Result<(FacgceConfig, ConfigSources), ConfigError> {
    let mut sources = ConfigSources::default();
    let mut config = FacgceConfig::default();

    for path in discover_config_files(cli_path) {
        let loaded = load_from_file(&path)?;
        config = merge(config, loaded);
        sources.files.push(path);
    }

    apply_env_overrides(&mut config, &mut sources);
    Ok((config, sources))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(dir: &tempfile::TempDir, name: &str, contents: &str) -> PathBuf {
        let path = dir.path().join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[test]
    fn empty_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(&dir, "empty.toml", "");
        let config = load_from_file(&path).unwrap();
        assert_eq!(config, FacgceConfig::default());
        assert_eq!(config.chat.port, 8080);
        assert_eq!(config.chat.rate_max_requests, 20);
    }

    #[test]
    fn partial_file_overrides_only_named_fields() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(
            &dir,
            "partial.toml",
            r#"
log_level = "debug"

[chat]
port = 9000
"#,
        );
        let config = load_from_file(&path).unwrap();
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.chat.port, 9000);
        assert_eq!(config.chat.max_tokens, 600);
    }

    #[test]
    fn unparseable_file_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(&dir, "broken.toml", "chat = \"not a table\"");
        match load_from_file(&path) {
            Err(ConfigError::Parse { .. }) => {}
            other => panic!("expected parse error, got {:?}", other),
        }
    }

    #[test]
    fn missing_file_is_a_read_error() {
        match load_from_file(Path::new("/nonexistent/facgce.toml")) {
            Err(ConfigError::FileRead { .. }) => {}
            other => panic!("expected read error, got {:?}", other),
        }
    }

    #[test]
    fn merge_prefers_overlay_changes_keeps_base_otherwise() {
        let mut base = FacgceConfig::default();
        base.chat.port = 9000;
        base.log_level = "debug".to_string();

        let mut overlay = FacgceConfig::default();
        overlay.chat.model = "claude-sonnet-4-5".to_string();

        let merged = merge(base, overlay);
        assert_eq!(merged.chat.port, 9000);
        assert_eq!(merged.log_level, "debug");
        assert_eq!(merged.chat.model, "claude-sonnet-4-5");
    }

    #[test]
    fn cli_override_replaces_local_discovery() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(&dir, "override.toml", "[chat]\nport = 7777\n");
        let files = discover_config_files(Some(&path));
        assert!(files.contains(&path));
    }
}
