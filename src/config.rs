//! # Mapper Configuration
//!
//! Layered configuration: built-in defaults, an optional file in any format
//! the `config` crate understands, then `GRAPH_ODM_*` environment variables.
//!
//! The mismatch policy is deliberately absent: it is an argument of every
//! `hydrate` call, not ambient state.
//!
//! ```rust,no_run
//! use graph_odm::config::MapperConfig;
//! use std::path::Path;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = MapperConfig::load(Some(Path::new("config/graph_odm.toml")))?;
//! println!("discriminator key: {}", config.class_key);
//! # Ok(())
//! # }
//! ```

use crate::constants::{env, DEFAULT_CAST_CACHE_MAX_ENTRIES, DEFAULT_CLASS_KEY};
use crate::error::{HydrationError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapperConfig {
    /// Record key naming the store class
    pub class_key: String,
    pub cast_cache_enabled: bool,
    /// Upper bound on memoized cast results
    pub cast_cache_max_entries: usize,
    pub log_level: String,
}

impl Default for MapperConfig {
    fn default() -> Self {
        Self {
            class_key: DEFAULT_CLASS_KEY.to_string(),
            cast_cache_enabled: true,
            cast_cache_max_entries: DEFAULT_CAST_CACHE_MAX_ENTRIES,
            log_level: "info".to_string(),
        }
    }
}

impl MapperConfig {
    /// Defaults overridden by `GRAPH_ODM_*` environment variables only.
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(class_key) = std::env::var(env::CLASS_KEY) {
            config.class_key = class_key;
        }

        if let Ok(enabled) = std::env::var(env::CAST_CACHE_ENABLED) {
            config.cast_cache_enabled = enabled.parse().map_err(|e| {
                HydrationError::ConfigurationError(format!("Invalid cast_cache_enabled: {e}"))
            })?;
        }

        if let Ok(max_entries) = std::env::var(env::CAST_CACHE_MAX_ENTRIES) {
            config.cast_cache_max_entries = max_entries.parse().map_err(|e| {
                HydrationError::ConfigurationError(format!("Invalid cast_cache_max_entries: {e}"))
            })?;
        }

        if let Ok(level) = std::env::var(env::LOG_LEVEL) {
            config.log_level = level;
        }

        config.validate()?;
        Ok(config)
    }

    /// Defaults, then `file` if given, then `GRAPH_ODM_*` variables.
    pub fn load(file: Option<&Path>) -> Result<Self> {
        Self::load_with_prefix(file, env::PREFIX)
    }

    /// Like [`MapperConfig::load`] with a custom environment prefix.
    pub fn load_with_prefix(file: Option<&Path>, env_prefix: &str) -> Result<Self> {
        let defaults = Self::default();
        let mut builder = ::config::Config::builder()
            .set_default("class_key", defaults.class_key)?
            .set_default("cast_cache_enabled", defaults.cast_cache_enabled)?
            .set_default(
                "cast_cache_max_entries",
                i64::try_from(defaults.cast_cache_max_entries).unwrap_or(i64::MAX),
            )?
            .set_default("log_level", defaults.log_level)?;

        if let Some(path) = file {
            debug!(path = %path.display(), "Loading mapper configuration file");
            builder = builder.add_source(::config::File::from(path).required(true));
        }

        let config: Self = builder
            .add_source(::config::Environment::with_prefix(env_prefix).try_parsing(true))
            .build()?
            .try_deserialize()?;

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.class_key.trim().is_empty() {
            return Err(HydrationError::ConfigurationError(
                "class_key must not be empty".to_string(),
            ));
        }
        if self.cast_cache_enabled && self.cast_cache_max_entries == 0 {
            return Err(HydrationError::ConfigurationError(
                "cast_cache_max_entries must be positive when the cast cache is enabled"
                    .to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_are_valid() {
        let config = MapperConfig::default();
        assert_eq!(config.class_key, "@class");
        assert!(config.cast_cache_enabled);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        let empty_key = MapperConfig {
            class_key: " ".to_string(),
            ..MapperConfig::default()
        };
        assert!(empty_key.validate().is_err());

        let zero_cache = MapperConfig {
            cast_cache_max_entries: 0,
            ..MapperConfig::default()
        };
        assert!(zero_cache.validate().is_err());

        let disabled = MapperConfig {
            cast_cache_enabled: false,
            cast_cache_max_entries: 0,
            ..MapperConfig::default()
        };
        assert!(disabled.validate().is_ok());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "class_key = \"@type\"\ncast_cache_max_entries = 50").unwrap();

        let config =
            MapperConfig::load_with_prefix(Some(file.path()), "GRAPH_ODM_FILE_TEST").unwrap();
        assert_eq!(config.class_key, "@type");
        assert_eq!(config.cast_cache_max_entries, 50);
        assert!(config.cast_cache_enabled);
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn test_environment_overrides_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "class_key = \"@type\"").unwrap();

        std::env::set_var("GRAPH_ODM_LAYER_TEST_CLASS_KEY", "kind");
        let config = MapperConfig::load_with_prefix(Some(file.path()), "GRAPH_ODM_LAYER_TEST");
        std::env::remove_var("GRAPH_ODM_LAYER_TEST_CLASS_KEY");

        assert_eq!(config.unwrap().class_key, "kind");
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let result = MapperConfig::load_with_prefix(
            Some(Path::new("/definitely/not/here.toml")),
            "GRAPH_ODM_MISSING_TEST",
        );
        assert!(matches!(result, Err(HydrationError::ConfigurationError(_))));
    }

    #[test]
    fn test_from_env() {
        std::env::set_var(env::CAST_CACHE_MAX_ENTRIES, "25");
        let config = MapperConfig::from_env();
        std::env::set_var(env::CAST_CACHE_MAX_ENTRIES, "lots");
        let invalid = MapperConfig::from_env();
        std::env::remove_var(env::CAST_CACHE_MAX_ENTRIES);

        assert_eq!(config.unwrap().cast_cache_max_entries, 25);
        assert!(matches!(invalid, Err(HydrationError::ConfigurationError(_))));
    }
}
