//! Middleware failure type.

use thiserror::Error;

/// Boxed error source carried by a [`MiddlewareError`].
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// A middleware failed; the chain stopped at that point.
///
/// Carries the underlying error and the status the host should answer with.
/// No response is written on the middleware's behalf.
#[derive(Debug, Error)]
#[error("middleware failed with status {status}: {source}")]
pub struct MiddlewareError {
    status: u16,
    #[source]
    source: BoxError,
}

impl MiddlewareError {
    pub const DEFAULT_STATUS: u16 = 500;

    /// Wrap an error with the default status (500).
    pub fn new(source: impl Into<BoxError>) -> Self {
        Self {
            status: Self::DEFAULT_STATUS,
            source: source.into(),
        }
    }

    /// Wrap an error with an explicit status.
    pub fn with_status(status: u16, source: impl Into<BoxError>) -> Self {
        Self {
            status,
            source: source.into(),
        }
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    pub fn source_error(&self) -> &(dyn std::error::Error + Send + Sync + 'static) {
        self.source.as_ref()
    }

    pub fn into_source(self) -> BoxError {
        self.source
    }
}
