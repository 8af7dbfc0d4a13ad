//! Structured logging.
//!
//! # Responsibilities
//! - Initialize the global `tracing` subscriber for a host process
//! - Pick pretty or JSON output
//!
//! # Design Decisions
//! - `RUST_LOG` wins over the configured filter
//! - JSON format for production, pretty format for development
//! - Calling `init` twice is not an error; the second call is ignored

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Default filter when neither `RUST_LOG` nor configuration sets one.
pub const DEFAULT_FILTER: &str = "pipeline_router=info";

/// Output format of the fmt layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

crate::config_enum!(LogFormat { Pretty, Json });

/// Build the filter: `RUST_LOG` if set and valid, else `filter`, else
/// [`DEFAULT_FILTER`].
pub fn env_filter(filter: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(filter))
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Install the global subscriber. Returns `false` if one was already set.
pub fn init(filter: &str, format: LogFormat) -> bool {
    let registry = tracing_subscriber::registry().with(env_filter(filter));

    let result = match format {
        LogFormat::Pretty => registry.with(tracing_subscriber::fmt::layer()).try_init(),
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json().with_current_span(true))
            .try_init(),
    };

    result.is_ok()
}
