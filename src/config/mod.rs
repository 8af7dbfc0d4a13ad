//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! key=value file (app.cfg or $APP_CONFIG)
//!     → loader.rs (line parsing)
//!     → Configuration (immutable map)
//!     → get(key): environment variable first, then file value
//!     → value.rs (typed coercion, default on failure)
//!     → schema.rs (RouterSettings for hosts)
//! ```
//!
//! # Design Decisions
//! - Environment always overrides the file, read at lookup time
//! - Missing or malformed values fall back to defaults instead of failing
//! - Only explicit file loading can error

pub mod loader;
pub mod schema;
pub mod value;

use std::collections::HashMap;
use std::env;
use std::path::Path;

pub use loader::{load_config_file, ConfigError};
pub use schema::RouterSettings;
pub use value::ConfigValue;

/// Environment variable naming the configuration file.
pub const CONFIG_PATH_ENV: &str = "APP_CONFIG";

/// File read from the working directory when `APP_CONFIG` is unset.
pub const DEFAULT_CONFIG_FILE: &str = "app.cfg";

/// Key/value configuration with environment override.
///
/// ```
/// use std::collections::HashMap;
/// use pipeline_router::config::Configuration;
///
/// let config = Configuration::from_values(HashMap::from([
///     ("PIPELINE_DOC_PORT".to_string(), "8080".to_string()),
/// ]));
///
/// assert_eq!(config.get_typed::<u16>("PIPELINE_DOC_PORT"), 8080);
/// assert_eq!(config.get_typed_or("PIPELINE_DOC_MISSING", 3u32), 3);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Configuration {
    values: HashMap<String, String>,
}

impl Configuration {
    /// Empty configuration; lookups only see the environment.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_values(values: HashMap<String, String>) -> Self {
        Self { values }
    }

    /// Load `path`. Fails if the file cannot be read.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let values = load_config_file(path.as_ref())?;
        tracing::debug!(path = %path.as_ref().display(), entries = values.len(), "Configuration loaded");
        Ok(Self { values })
    }

    /// Load the file named by `APP_CONFIG`, else `app.cfg` if it exists,
    /// else start empty.
    pub fn from_default_locations() -> Result<Self, ConfigError> {
        if let Ok(path) = env::var(CONFIG_PATH_ENV) {
            return Self::load(path);
        }

        if Path::new(DEFAULT_CONFIG_FILE).is_file() {
            return Self::load(DEFAULT_CONFIG_FILE);
        }

        tracing::debug!("No configuration file found, using environment only");
        Ok(Self::new())
    }

    /// Raw value for `key`. The environment variable of the same name wins.
    pub fn get(&self, key: &str) -> Option<String> {
        env::var(key).ok().or_else(|| self.values.get(key).cloned())
    }

    pub fn get_or(&self, key: &str, default: impl Into<String>) -> String {
        self.get(key).unwrap_or_else(|| default.into())
    }

    /// Typed value, or `None` if absent or not parseable as `T`.
    pub fn get_parsed<T: ConfigValue>(&self, key: &str) -> Option<T> {
        let raw = self.get(key)?;
        let parsed = T::parse_config(&raw);
        if parsed.is_none() {
            tracing::debug!(key, value = %raw, "Configuration value has the wrong type, using default");
        }
        parsed
    }

    pub fn get_typed_or<T: ConfigValue>(&self, key: &str, default: T) -> T {
        self.get_parsed(key).unwrap_or(default)
    }

    /// Typed value, or `T::default()` (zero, `false`, first variant).
    pub fn get_typed<T: ConfigValue + Default>(&self, key: &str) -> T {
        self.get_parsed(key).unwrap_or_default()
    }

    /// Values read from the file, without environment overrides.
    pub fn file_values(&self) -> &HashMap<String, String> {
        &self.values
    }
}
