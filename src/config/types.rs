//! Core configuration types and loading.

use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Bot configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Bot identity and command behavior.
    pub bot: BotConfig,
    /// Database configuration.
    pub database: DatabaseConfig,
    /// Periodic guild statistics reporting.
    #[serde(default)]
    pub stats: StatsConfig,
    /// Activity log retention.
    #[serde(default)]
    pub activity: ActivityConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }
}

/// Bot identity configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct BotConfig {
    /// Command prefix for guilds without their own override (default: "!").
    #[serde(default = "default_prefix")]
    pub default_prefix: String,
    /// Locale for guilds without their own override (default: "en").
    #[serde(default = "default_locale")]
    pub default_locale: String,
    /// Platform user id of the bot owner. Owner-only commands are refused
    /// for everyone else, and disabled entirely when unset.
    #[serde(default)]
    pub owner_id: Option<u64>,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            default_prefix: default_prefix(),
            default_locale: default_locale(),
            owner_id: None,
        }
    }
}

fn default_prefix() -> String {
    "!".to_string()
}

fn default_locale() -> String {
    "en".to_string()
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Path to SQLite database file.
    pub path: String,
}

/// Guild statistics push configuration.
///
/// When `endpoint` is unset the recurring push task is never scheduled.
#[derive(Debug, Clone, Deserialize)]
pub struct StatsConfig {
    /// HTTP endpoint receiving periodic guild/user counts.
    pub endpoint: Option<String>,
    /// Bearer token sent with each push.
    pub token: Option<String>,
    /// Seconds between pushes (default: 1800).
    #[serde(default = "default_stats_interval")]
    pub interval_secs: u64,
}

impl Default for StatsConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            token: None,
            interval_secs: default_stats_interval(),
        }
    }
}

fn default_stats_interval() -> u64 {
    1800
}

/// Activity log retention configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ActivityConfig {
    /// Days of per-channel word counts to keep (default: 90).
    #[serde(default = "default_retention_days")]
    pub retention_days: u32,
}

impl Default for ActivityConfig {
    fn default() -> Self {
        Self {
            retention_days: default_retention_days(),
        }
    }
}

fn default_retention_days() -> u32 {
    90
}

#[cfg(test)]
mod tests {
    use super::*;

    // ========================================================================
    // BotConfig tests
    // ========================================================================

    #[test]
    fn bot_config_default_values() {
        let config = BotConfig::default();
        assert_eq!(config.default_prefix, "!");
        assert_eq!(config.default_locale, "en");
        assert!(config.owner_id.is_none());
    }

    #[test]
    fn default_prefix_is_bang() {
        assert_eq!(default_prefix(), "!");
    }

    #[test]
    fn default_stats_interval_is_1800() {
        assert_eq!(default_stats_interval(), 1800);
    }

    #[test]
    fn default_retention_days_is_90() {
        assert_eq!(default_retention_days(), 90);
    }

    // ========================================================================
    // Parsing tests
    // ========================================================================

    #[test]
    fn parses_minimal_config() {
        let config: Config = toml::from_str(
            r#"
            [bot]

            [database]
            path = "herald.db"
            "#,
        )
        .unwrap();
        assert_eq!(config.bot.default_prefix, "!");
        assert_eq!(config.database.path, "herald.db");
        assert!(config.stats.endpoint.is_none());
        assert_eq!(config.activity.retention_days, 90);
    }

    #[test]
    fn parses_full_config() {
        let config: Config = toml::from_str(
            r#"
            [bot]
            default_prefix = "?"
            default_locale = "de"
            owner_id = 1234

            [database]
            path = "/var/lib/herald/herald.db"

            [stats]
            endpoint = "https://lists.example/api/stats"
            token = "secret"
            interval_secs = 600

            [activity]
            retention_days = 30
            "#,
        )
        .unwrap();
        assert_eq!(config.bot.default_prefix, "?");
        assert_eq!(config.bot.default_locale, "de");
        assert_eq!(config.bot.owner_id, Some(1234));
        assert_eq!(config.stats.interval_secs, 600);
        assert_eq!(config.activity.retention_days, 30);
    }

    #[test]
    fn missing_database_section_is_an_error() {
        let result: Result<Config, _> = toml::from_str("[bot]\n");
        assert!(result.is_err());
    }
}
