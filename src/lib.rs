//! Middleware pipeline router library.

pub mod config;
pub mod http;
pub mod observability;
pub mod routing;

pub use config::{Configuration, RouterSettings};
pub use http::{ApiResult, PagedResult, Request, Response};
pub use routing::{from_fn, Middleware, MiddlewareError, Next, Outcome, Properties, Router, RouterBuilder};
