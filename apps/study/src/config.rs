//! Configuration loaded from the environment.

use std::path::PathBuf;

use thiserror::Error;

pub const DEFAULT_ALGORITHM: &str = "ladder";
pub const DEFAULT_LOG_FILTER: &str = "info";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value}")]
    Invalid { key: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub database_path: PathBuf,
    pub daily_reset_hour: u32,
    pub algorithm: String,
    pub log_filter: String,
}

impl Config {
    /// Read configuration from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_path = lookup("FLASHDECK_DB")
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(default_db_path);

        let daily_reset_hour = match lookup("FLASHDECK_DAILY_RESET_HOUR") {
            Some(value) => value
                .trim()
                .parse::<u32>()
                .ok()
                .filter(|hour| *hour < 24)
                .ok_or(ConfigError::Invalid {
                    key: "FLASHDECK_DAILY_RESET_HOUR",
                    value,
                })?,
            None => 0,
        };

        let algorithm = lookup("FLASHDECK_ALGORITHM").unwrap_or_else(|| DEFAULT_ALGORITHM.into());
        let log_filter = lookup("RUST_LOG").unwrap_or_else(|| DEFAULT_LOG_FILTER.into());

        Ok(Self {
            database_path,
            daily_reset_hour,
            algorithm,
            log_filter,
        })
    }
}

fn default_db_path() -> PathBuf {
    // Use app data directory, fallback to current dir
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("flashdeck")
        .join("flashdeck.db")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config(&[]).unwrap();
        assert_eq!(config.daily_reset_hour, 0);
        assert_eq!(config.algorithm, "ladder");
        assert_eq!(config.log_filter, "info");
        assert!(config.database_path.ends_with("flashdeck/flashdeck.db"));
    }

    #[test]
    fn test_overrides() {
        let config = config(&[
            ("FLASHDECK_DB", "/tmp/cards.db"),
            ("FLASHDECK_DAILY_RESET_HOUR", "4"),
            ("RUST_LOG", "flashdeck_study=debug"),
        ])
        .unwrap();
        assert_eq!(config.database_path, PathBuf::from("/tmp/cards.db"));
        assert_eq!(config.daily_reset_hour, 4);
        assert_eq!(config.log_filter, "flashdeck_study=debug");
    }

    #[test]
    fn test_reset_hour_out_of_range() {
        let err = config(&[("FLASHDECK_DAILY_RESET_HOUR", "24")]).unwrap_err();
        assert_eq!(
            err,
            ConfigError::Invalid {
                key: "FLASHDECK_DAILY_RESET_HOUR",
                value: "24".to_string(),
            }
        );
        assert!(config(&[("FLASHDECK_DAILY_RESET_HOUR", "late")]).is_err());
    }
}
