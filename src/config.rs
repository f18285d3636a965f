//! Dashboard Configuration
//!
//! Loads and saves the updater's configuration from
//! `~/.liberty-dashboard/dashboard.json`.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::types::LogLevel;

/// Config file name within the dashboard directory.
const CONFIG_FILENAME: &str = "dashboard.json";

/// Returns the dashboard's config directory: `~/.liberty-dashboard`.
pub fn get_dashboard_dir() -> PathBuf {
    let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("/root"));
    home.join(".liberty-dashboard")
}

/// Returns the full path to the config file: `~/.liberty-dashboard/dashboard.json`.
pub fn get_config_path() -> PathBuf {
    get_dashboard_dir().join(CONFIG_FILENAME)
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DashboardConfig {
    /// Base URL the status document is fetched from.
    #[serde(default)]
    pub status_base_url: String,
    /// Seconds between refresh cycles.
    #[serde(default)]
    pub refresh_interval_secs: u64,
    /// Where the rendered page is written each cycle.
    #[serde(default)]
    pub output_path: String,
    /// Path of the local key-value store holding the auth flag.
    #[serde(default)]
    pub store_path: String,
    #[serde(default = "default_log_level")]
    pub log_level: LogLevel,
}

fn default_log_level() -> LogLevel {
    LogLevel::Info
}

/// Returns the default `DashboardConfig`. Paths are tilde-relative and
/// resolved with `resolve_path` at use time.
pub fn default_config() -> DashboardConfig {
    DashboardConfig {
        status_base_url: "http://127.0.0.1:8080".to_string(),
        refresh_interval_secs: 30,
        output_path: "~/.liberty-dashboard/dashboard.html".to_string(),
        store_path: "~/.liberty-dashboard/storage.json".to_string(),
        log_level: LogLevel::Info,
    }
}

/// Load the config from the default location.
///
/// Returns `None` if the file does not exist or cannot be parsed.
pub fn load_config() -> Option<DashboardConfig> {
    load_config_from(&get_config_path())
}

/// Load the config from an explicit path, merging defaults for unset
/// fields.
pub fn load_config_from(path: &Path) -> Option<DashboardConfig> {
    if !path.exists() {
        return None;
    }

    let contents = fs::read_to_string(path).ok()?;
    let mut config: DashboardConfig = serde_json::from_str(&contents).ok()?;

    // Merge defaults for unset fields
    let defaults = default_config();

    if config.status_base_url.is_empty() {
        config.status_base_url = defaults.status_base_url;
    }
    if config.refresh_interval_secs == 0 {
        config.refresh_interval_secs = defaults.refresh_interval_secs;
    }
    if config.output_path.is_empty() {
        config.output_path = defaults.output_path;
    }
    if config.store_path.is_empty() {
        config.store_path = defaults.store_path;
    }

    Some(config)
}

/// Save the config to `~/.liberty-dashboard/dashboard.json`, creating
/// the directory when missing.
pub fn save_config(config: &DashboardConfig) -> Result<()> {
    let dir = get_dashboard_dir();
    if !dir.exists() {
        fs::create_dir_all(&dir).context("Failed to create dashboard directory")?;
    }

    let json = serde_json::to_string_pretty(config).context("Failed to serialize config")?;
    fs::write(get_config_path(), json).context("Failed to write config file")?;

    Ok(())
}

/// Resolve a path that may start with `~` to an absolute path.
pub fn resolve_path(p: &str) -> String {
    if let Some(rest) = p.strip_prefix('~') {
        let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("/root"));
        let rest = rest.strip_prefix('/').unwrap_or(rest);
        home.join(rest).to_string_lossy().to_string()
    } else {
        p.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_path_with_tilde() {
        let resolved = resolve_path("~/some/path");
        assert!(!resolved.starts_with('~'));
        assert!(resolved.ends_with("some/path"));
    }

    #[test]
    fn test_resolve_path_without_tilde() {
        let path = "/absolute/path/to/file";
        assert_eq!(resolve_path(path), path);
    }

    #[test]
    fn test_default_config_values() {
        let config = default_config();
        assert_eq!(config.refresh_interval_secs, 30);
        assert_eq!(config.log_level, LogLevel::Info);
        assert!(config.output_path.ends_with("dashboard.html"));
    }

    #[test]
    fn test_load_merges_defaults_for_unset_fields() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dashboard.json");
        fs::write(&path, r#"{"status_base_url": "https://example.org"}"#).unwrap();

        let config = load_config_from(&path).unwrap();
        assert_eq!(config.status_base_url, "https://example.org");
        assert_eq!(config.refresh_interval_secs, 30);
        assert!(config.store_path.ends_with("storage.json"));
    }

    #[test]
    fn test_load_missing_file_returns_none() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_config_from(&dir.path().join("nope.json")).is_none());
    }
}
