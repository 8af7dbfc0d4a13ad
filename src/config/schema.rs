//! Settings read by hosts that embed a router.

use serde::{Deserialize, Serialize};

use crate::config::Configuration;
use crate::observability::logging::{LogFormat, DEFAULT_FILTER};
use crate::routing::{MatchingStrategy, RouterBuilder};

pub const ROUTER_MATCHING: &str = "ROUTER_MATCHING";
pub const LOG_FILTER: &str = "LOG_FILTER";
pub const LOG_FORMAT: &str = "LOG_FORMAT";

/// Router and logging settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouterSettings {
    /// `ROUTER_MATCHING`: `Simple` or `Parametrized` (default).
    #[serde(with = "strategy_name")]
    pub matching: MatchingStrategy,

    /// `LOG_FILTER`: an `EnvFilter` directive.
    pub log_filter: String,

    /// `LOG_FORMAT`: `Pretty` (default) or `Json`.
    #[serde(with = "format_name")]
    pub log_format: LogFormat,
}

impl Default for RouterSettings {
    fn default() -> Self {
        Self {
            matching: MatchingStrategy::default(),
            log_filter: DEFAULT_FILTER.to_string(),
            log_format: LogFormat::default(),
        }
    }
}

impl RouterSettings {
    /// Read settings, falling back to defaults for missing or invalid keys.
    pub fn from_config(config: &Configuration) -> Self {
        let defaults = Self::default();
        Self {
            matching: config.get_typed_or(ROUTER_MATCHING, defaults.matching),
            log_filter: config.get_or(LOG_FILTER, defaults.log_filter),
            log_format: config.get_typed_or(LOG_FORMAT, defaults.log_format),
        }
    }

    /// Apply the matching strategy to a builder.
    pub fn apply(&self, builder: RouterBuilder) -> RouterBuilder {
        builder.use_route_matching(self.matching)
    }
}

mod strategy_name {
    use serde::{de, Deserialize, Deserializer, Serializer};

    use crate::config::ConfigValue;
    use crate::routing::MatchingStrategy;

    pub fn serialize<S: Serializer>(value: &MatchingStrategy, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(match value {
            MatchingStrategy::Simple => "Simple",
            MatchingStrategy::Parametrized => "Parametrized",
        })
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<MatchingStrategy, D::Error> {
        let raw = String::deserialize(deserializer)?;
        MatchingStrategy::parse_config(&raw)
            .ok_or_else(|| de::Error::custom(format!("unknown matching strategy: {raw}")))
    }
}

mod format_name {
    use serde::{de, Deserialize, Deserializer, Serializer};

    use crate::config::ConfigValue;
    use crate::observability::LogFormat;

    pub fn serialize<S: Serializer>(value: &LogFormat, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(match value {
            LogFormat::Pretty => "Pretty",
            LogFormat::Json => "Json",
        })
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<LogFormat, D::Error> {
        let raw = String::deserialize(deserializer)?;
        LogFormat::parse_config(&raw).ok_or_else(|| de::Error::custom(format!("unknown log format: {raw}")))
    }
}
