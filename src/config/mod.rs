//! Configuration loading and management.
//!
//! This module is split into logical submodules:
//! - [`types`]: Core config struct definitions (Config, BotConfig, DatabaseConfig)

mod types;

pub use types::{ActivityConfig, BotConfig, Config, ConfigError, DatabaseConfig, StatsConfig};
