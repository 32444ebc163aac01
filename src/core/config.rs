//! Logger configuration
//!
//! Loaded once at startup and never mutated afterwards. The JSON layout uses
//! camelCase keys:
//!
//! ```json
//! {
//!   "logFile": "logs/app.log",
//!   "debugOnly": true,
//!   "deleteLogs": true,
//!   "fileLog": true,
//!   "consoleLog": false,
//!   "infoOnly": false,
//!   "panicHook": true
//! }
//! ```

use super::error::{LoggerError, Result};
use super::retry::RetryPolicy;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// File name searched for by [`LoggerConfig::discover`]
pub const CONFIG_FILE_NAME: &str = "log.config.json";

/// Keys a candidate config file must mention to be accepted by discovery
pub const REQUIRED_KEYS: [&str; 3] = ["logFile", "debugOnly", "deleteLogs"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LoggerConfig {
    pub log_file: PathBuf,
    /// Only record while running a debug build
    pub debug_only: bool,
    /// Delete `log_file` once when the logger starts
    pub delete_logs: bool,
    pub file_log: bool,
    pub console_log: bool,
    /// Console only shows `INFO` lines
    pub info_only: bool,
    pub flush_interval_ms: u64,
    pub retry: RetryPolicy,
    /// Drain buffered records when a panic ends the process
    pub panic_hook: bool,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            log_file: PathBuf::from("log.txt"),
            debug_only: true,
            delete_logs: true,
            file_log: true,
            console_log: false,
            info_only: false,
            flush_interval_ms: 10,
            retry: RetryPolicy::default(),
            panic_hook: true,
        }
    }
}

impl LoggerConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| {
            LoggerError::io_operation(
                "reading logger config",
                format!("cannot read '{}'", path.display()),
                e,
            )
        })?;
        Self::from_json_str(&text)
    }

    /// Search `root` recursively for a usable config file, else use defaults
    pub fn discover(root: impl AsRef<Path>) -> Self {
        let mut candidates = Vec::new();
        collect_candidates(root.as_ref(), &mut candidates);
        candidates.sort();

        candidates
            .iter()
            .filter(|path| mentions_required_keys(path))
            .find_map(|path| Self::load(path).ok())
            .unwrap_or_default()
    }

    /// Whether marker calls take effect in this build
    pub fn execute_on_debug_settings(&self) -> bool {
        !self.debug_only || cfg!(debug_assertions)
    }

    pub fn flush_interval(&self) -> Duration {
        Duration::from_millis(self.flush_interval_ms)
    }

    pub fn validate(&self) -> Result<()> {
        if self.file_log && self.log_file.as_os_str().is_empty() {
            return Err(LoggerError::config(
                "LoggerConfig",
                "logFile must be set when fileLog is enabled",
            ));
        }
        if self.flush_interval_ms == 0 {
            return Err(LoggerError::config(
                "LoggerConfig",
                "flushIntervalMs must be greater than zero",
            ));
        }
        Ok(())
    }
}

fn collect_candidates(dir: &Path, out: &mut Vec<PathBuf>) {
    let Ok(entries) = fs::read_dir(dir) else {
        return;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        match entry.file_type() {
            Ok(ft) if ft.is_dir() => collect_candidates(&path, out),
            Ok(ft) if ft.is_file() && entry.file_name() == CONFIG_FILE_NAME => out.push(path),
            _ => {}
        }
    }
}

fn mentions_required_keys(path: &Path) -> bool {
    fs::read_to_string(path)
        .map(|text| REQUIRED_KEYS.iter().all(|key| text.contains(key)))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = LoggerConfig::default();
        assert_eq!(config.log_file, PathBuf::from("log.txt"));
        assert!(config.debug_only);
        assert!(config.delete_logs);
        assert!(config.file_log);
        assert!(!config.console_log);
        assert!(config.panic_hook);
        assert_eq!(config.flush_interval(), Duration::from_millis(10));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config =
            LoggerConfig::from_json_str(r#"{"logFile": "app.log", "consoleLog": true}"#).unwrap();
        assert_eq!(config.log_file, PathBuf::from("app.log"));
        assert!(config.console_log);
        assert!(config.delete_logs);
        assert_eq!(config.retry, RetryPolicy::default());
    }

    #[test]
    fn test_panic_hook_key() {
        let config = LoggerConfig::from_json_str(r#"{"panicHook": false}"#).unwrap();
        assert!(!config.panic_hook);
    }

    #[test]
    fn test_invalid_json() {
        let err = LoggerConfig::from_json_str("{ not json").unwrap_err();
        assert!(matches!(err, LoggerError::JsonError(_)));
    }

    #[test]
    fn test_validation() {
        let err = LoggerConfig::from_json_str(r#"{"logFile": ""}"#).unwrap_err();
        assert!(matches!(err, LoggerError::InvalidConfiguration { .. }));

        let err = LoggerConfig::from_json_str(r#"{"flushIntervalMs": 0}"#).unwrap_err();
        assert!(matches!(err, LoggerError::InvalidConfiguration { .. }));

        assert!(LoggerConfig::from_json_str(r#"{"logFile": "", "fileLog": false}"#).is_ok());
    }

    #[test]
    fn test_execute_on_debug_settings() {
        let config = LoggerConfig {
            debug_only: false,
            ..LoggerConfig::default()
        };
        assert!(config.execute_on_debug_settings());

        let config = LoggerConfig::default();
        assert_eq!(config.execute_on_debug_settings(), cfg!(debug_assertions));
    }

    #[test]
    fn test_load_missing_file() {
        let err = LoggerConfig::load("/definitely/not/here/log.config.json").unwrap_err();
        assert!(err.to_string().contains("reading logger config"));
    }

    #[test]
    fn test_discover_finds_nested_config() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let nested = temp_dir.path().join("app").join("settings");
        fs::create_dir_all(&nested).unwrap();

        // Missing required keys, skipped
        fs::write(temp_dir.path().join(CONFIG_FILE_NAME), r#"{"consoleLog": true}"#).unwrap();
        fs::write(
            nested.join(CONFIG_FILE_NAME),
            r#"{"logFile": "found.log", "debugOnly": false, "deleteLogs": false}"#,
        )
        .unwrap();

        let config = LoggerConfig::discover(temp_dir.path());
        assert_eq!(config.log_file, PathBuf::from("found.log"));
        assert!(!config.debug_only);
        assert!(!config.delete_logs);
    }

    #[test]
    fn test_discover_falls_back_to_defaults() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        assert_eq!(LoggerConfig::discover(temp_dir.path()), LoggerConfig::default());
    }
}
