//! # Rental Configuration
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     RENTAL_MIN_DAYS=1  RENTAL_MAX_DAYS=30                              │
//! │     RENTAL_DB_PATH=./car_rental.db  RENTAL_DB_MAX_CONNECTIONS=5        │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/car-rental/rental.toml (Linux)                           │
//! │     ~/Library/Application Support/com.rental.car-rental/rental.toml    │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     1–30 days, car_rental.db, 5 connections                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! [booking]
//! min_days = 1
//! max_days = 30
//! max_pickup_place_len = 200
//!
//! [database]
//! path = "car_rental.db"
//! max_connections = 5
//! connect_timeout_secs = 30
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, warn};

use rental_core::validation::DayBounds;
use rental_core::{DEFAULT_MAX_RENTAL_DAYS, DEFAULT_MIN_RENTAL_DAYS, MAX_PICKUP_PLACE_LEN};
use rental_db::DbConfig;

use crate::engine::EngineSettings;

// =============================================================================
// Errors
// =============================================================================

pub type ConfigResult<T> = Result<T, ConfigError>;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Failed to write config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("No config path available on this platform")]
    NoConfigPath,
}

// =============================================================================
// Sections
// =============================================================================

/// `[booking]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingSettings {
    #[serde(default = "default_min_days")]
    pub min_days: u32,

    #[serde(default = "default_max_days")]
    pub max_days: u32,

    #[serde(default = "default_max_pickup_place_len")]
    pub max_pickup_place_len: usize,
}

fn default_min_days() -> u32 {
    DEFAULT_MIN_RENTAL_DAYS
}
fn default_max_days() -> u32 {
    DEFAULT_MAX_RENTAL_DAYS
}
fn default_max_pickup_place_len() -> usize {
    MAX_PICKUP_PLACE_LEN
}

impl Default for BookingSettings {
    fn default() -> Self {
        BookingSettings {
            min_days: default_min_days(),
            max_days: default_max_days(),
            max_pickup_place_len: default_max_pickup_place_len(),
        }
    }
}

/// `[database]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseSettings {
    #[serde(default = "default_db_path")]
    pub path: PathBuf,

    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
}

fn default_db_path() -> PathBuf {
    PathBuf::from("car_rental.db")
}
fn default_max_connections() -> u32 {
    5
}
fn default_connect_timeout() -> u64 {
    30
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        DatabaseSettings {
            path: default_db_path(),
            max_connections: default_max_connections(),
            connect_timeout_secs: default_connect_timeout(),
        }
    }
}

// =============================================================================
// RentalConfig
// =============================================================================

/// Complete configuration for a rental deployment.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RentalConfig {
    #[serde(default)]
    pub booking: BookingSettings,

    #[serde(default)]
    pub database: DatabaseSettings,
}

impl RentalConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (`config_path`, or the platform default)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> ConfigResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading rental config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Loads config or returns the defaults if loading fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load rental config: {}. Using defaults.", e);
            Self::default()
        })
    }

    pub fn save(&self, config_path: Option<PathBuf>) -> ConfigResult<()> {
        let path = config_path
            .or_else(Self::default_config_path)
            .ok_or(ConfigError::NoConfigPath)?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&path, contents)?;

        info!(?path, "Rental config saved");
        Ok(())
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.booking.min_days == 0 {
            return Err(ConfigError::Invalid("min_days must be at least 1".into()));
        }

        if self.booking.min_days > self.booking.max_days {
            return Err(ConfigError::Invalid(format!(
                "min_days ({}) exceeds max_days ({})",
                self.booking.min_days, self.booking.max_days
            )));
        }

        if self.booking.max_pickup_place_len == 0 {
            return Err(ConfigError::Invalid(
                "max_pickup_place_len must be greater than 0".into(),
            ));
        }

        if self.database.path.as_os_str().is_empty() {
            return Err(ConfigError::Invalid("database path is empty".into()));
        }

        if self.database.max_connections == 0 {
            return Err(ConfigError::Invalid(
                "max_connections must be greater than 0".into(),
            ));
        }

        Ok(())
    }

    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Applies `RENTAL_*` overrides read through `lookup`.
    ///
    /// Unparseable numbers are logged and ignored.
    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(value) = lookup("RENTAL_MIN_DAYS") {
            match value.parse::<u32>() {
                Ok(days) => {
                    debug!(min_days = days, "Overriding min_days from environment");
                    self.booking.min_days = days;
                }
                Err(_) => warn!(value = %value, "Ignoring non-numeric RENTAL_MIN_DAYS"),
            }
        }

        if let Some(value) = lookup("RENTAL_MAX_DAYS") {
            match value.parse::<u32>() {
                Ok(days) => {
                    debug!(max_days = days, "Overriding max_days from environment");
                    self.booking.max_days = days;
                }
                Err(_) => warn!(value = %value, "Ignoring non-numeric RENTAL_MAX_DAYS"),
            }
        }

        if let Some(path) = lookup("RENTAL_DB_PATH") {
            debug!(path = %path, "Overriding database path from environment");
            self.database.path = PathBuf::from(path);
        }

        if let Some(value) = lookup("RENTAL_DB_MAX_CONNECTIONS") {
            match value.parse::<u32>() {
                Ok(max) => self.database.max_connections = max,
                Err(_) => warn!(value = %value, "Ignoring non-numeric RENTAL_DB_MAX_CONNECTIONS"),
            }
        }
    }

    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "rental", "car-rental")
            .map(|dirs| dirs.config_dir().join("rental.toml"))
    }

    // =========================================================================
    // Convenience Methods
    // =========================================================================

    pub fn day_bounds(&self) -> DayBounds {
        DayBounds::new(self.booking.min_days, self.booking.max_days)
    }

    pub fn engine_settings(&self) -> EngineSettings {
        EngineSettings {
            day_bounds: self.day_bounds(),
            max_pickup_place_len: self.booking.max_pickup_place_len,
        }
    }

    pub fn db_config(&self) -> DbConfig {
        DbConfig::new(&self.database.path)
            .max_connections(self.database.max_connections)
            .connect_timeout(Duration::from_secs(self.database.connect_timeout_secs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rental_db::pool::DbLocation;
    use std::collections::HashMap;

    #[test]
    fn test_default_config() {
        let config = RentalConfig::default();
        assert_eq!(config.booking.min_days, 1);
        assert_eq!(config.booking.max_days, 30);
        assert_eq!(config.booking.max_pickup_place_len, 200);
        assert_eq!(config.database.path, PathBuf::from("car_rental.db"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        let mut config = RentalConfig::default();

        config.booking.min_days = 0;
        assert!(config.validate().is_err());

        config.booking.min_days = 10;
        config.booking.max_days = 5;
        assert!(config.validate().is_err());

        config.booking.max_days = 10;
        assert!(config.validate().is_ok());

        config.database.max_connections = 0;
        assert!(config.validate().is_err());

        config.database.max_connections = 1;
        config.database.path = PathBuf::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: RentalConfig = toml::from_str(
            r#"
            [booking]
            max_days = 14
            "#,
        )
        .unwrap();

        assert_eq!(config.booking.min_days, 1);
        assert_eq!(config.booking.max_days, 14);
        assert_eq!(config.database.max_connections, 5);
        assert_eq!(config.day_bounds(), DayBounds::new(1, 14));
    }

    #[test]
    fn test_overrides() {
        let env: HashMap<&str, &str> = [
            ("RENTAL_MAX_DAYS", "7"),
            ("RENTAL_DB_PATH", "/tmp/rental-test.db"),
            ("RENTAL_DB_MAX_CONNECTIONS", "many"),
        ]
        .into_iter()
        .collect();

        let mut config = RentalConfig::default();
        config.apply_overrides(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.booking.max_days, 7);
        assert_eq!(config.database.path, PathBuf::from("/tmp/rental-test.db"));
        // Unparseable value keeps the default
        assert_eq!(config.database.max_connections, 5);
    }

    #[test]
    fn test_load_from_file_and_save() {
        let dir = std::env::temp_dir().join(format!("rental-config-{}", std::process::id()));
        let path = dir.join("rental.toml");

        let mut config = RentalConfig::default();
        config.booking.max_days = 21;
        config.save(Some(path.clone())).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("[booking]"));
        assert!(text.contains("[database]"));

        let loaded: RentalConfig = toml::from_str(&text).unwrap();
        assert_eq!(loaded.booking.max_days, 21);

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_db_config_from_settings() {
        let mut config = RentalConfig::default();
        config.database.max_connections = 2;
        config.database.connect_timeout_secs = 3;

        let db = config.db_config();
        assert_eq!(db.max_connections, 2);
        assert_eq!(db.connect_timeout, Duration::from_secs(3));
        assert_eq!(db.location, DbLocation::File(PathBuf::from("car_rental.db")));

        config.database.path = PathBuf::from(":memory:");
        assert_eq!(config.db_config().location, DbLocation::Memory);
    }
}
