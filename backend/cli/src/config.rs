use std::path::PathBuf;

use mittiscan_config::defaults::{DEFAULT_DB_PATH, DEFAULT_LOG_DIR, DEFAULT_LOG_LEVEL};
use mittiscan_config::MittiConfig;
use serde::Serialize;

/// MittiScan runtime settings for one CLI invocation.
#[derive(Debug, Clone, Serialize)]
pub struct Config {
    /// SQLite history database path
    pub db_path: String,
    /// Log level, overridden by `RUST_LOG`
    pub log_level: String,
    /// Directory for the rolling JSON log files
    pub log_dir: String,
    /// Where `mittiscan.yaml` lives
    pub config_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            db_path: DEFAULT_DB_PATH.to_string(),
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            log_dir: DEFAULT_LOG_DIR.to_string(),
            config_dir: mittiscan_config::config_dir(),
        }
    }
}

impl Config {
    /// Environment first, then the config file, then built-in defaults.
    pub fn resolve(file: &MittiConfig) -> Self {
        Self::resolve_with(file, |key| std::env::var(key).ok())
    }

    pub fn resolve_with(file: &MittiConfig, env: impl Fn(&str) -> Option<String>) -> Self {
        let logging = file.logging.clone().unwrap_or_default();
        let storage = file.storage.clone().unwrap_or_default();
        let defaults = Self::default();

        Self {
            db_path: env("MITTISCAN_DB")
                .or(storage.db_path)
                .unwrap_or(defaults.db_path),
            log_level: env("RUST_LOG")
                .or(logging.level)
                .unwrap_or(defaults.log_level),
            log_dir: env("MITTISCAN_LOG_DIR")
                .or(logging.dir)
                .unwrap_or(defaults.log_dir),
            config_dir: env("MITTISCAN_CONFIG_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.config_dir),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mittiscan_config::{LoggingConfig, StorageConfig};
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn defaults_without_env_or_file() {
        let config = Config::resolve_with(&MittiConfig::default(), lookup(&[]));
        assert_eq!(config.db_path, "mittiscan.db");
        assert_eq!(config.log_level, "info");
        assert_eq!(config.log_dir, "logs");
    }

    #[test]
    fn file_values_beat_defaults() {
        let file = MittiConfig {
            logging: Some(LoggingConfig {
                level: Some("debug".into()),
                dir: None,
            }),
            storage: Some(StorageConfig {
                db_path: Some("/var/lib/mittiscan/scans.db".into()),
            }),
            ..Default::default()
        };
        let config = Config::resolve_with(&file, lookup(&[]));
        assert_eq!(config.db_path, "/var/lib/mittiscan/scans.db");
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.log_dir, "logs");
    }

    #[test]
    fn env_beats_file() {
        let file = MittiConfig {
            storage: Some(StorageConfig {
                db_path: Some("file.db".into()),
            }),
            ..Default::default()
        };
        let config = Config::resolve_with(
            &file,
            lookup(&[
                ("MITTISCAN_DB", "env.db"),
                ("RUST_LOG", "warn"),
                ("MITTISCAN_CONFIG_DIR", "/etc/mittiscan"),
            ]),
        );
        assert_eq!(config.db_path, "env.db");
        assert_eq!(config.log_level, "warn");
        assert_eq!(config.config_dir, PathBuf::from("/etc/mittiscan"));
    }
}
