//! HTTP facade and request parsing subsystem.
//!
//! # Data Flow
//! ```text
//! host request (method, target, headers, body)
//!     → request.rs (parse target into path + query)
//!     → [routing decides the middleware chain]
//!     → middlewares read Request, write Response
//!     → envelope.rs / json.rs (serialize handler results)
//!     → response.rs (status, headers, body, sent flag)
//!     → host writes the response
//! ```

pub mod envelope;
pub mod json;
pub mod parse;
pub mod request;
pub mod response;

pub use envelope::{ApiResult, ErrorValue, PagedResult};
pub use parse::{detect_content_type, parse_form_data, parse_query_string, parse_url, ParsedUrl, QueryMap};
pub use request::{Request, X_REQUEST_ID};
pub use response::Response;
