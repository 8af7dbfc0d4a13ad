//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! dispatch(method, path, req, res)
//!     → fresh Properties (+ request id)
//!     → router.rs (resolve chain)
//!         global middlewares
//!         + first route whose method and pattern match (matcher.rs)
//!           or first mount whose prefix matches (sub-router, prefix stripped)
//!     → pipeline.rs (run steps in order through Next)
//!     → Outcome::Handled(status) | Outcome::Unhandled (777)
//! ```
//!
//! # Design Decisions
//! - Routers are built once and immutable at runtime
//! - No regex in hot path (segment comparison only)
//! - Deterministic: same input always resolves the same chain
//! - First match wins, in registration order

pub mod error;
pub mod matcher;
pub mod pipeline;
pub mod properties;
pub mod router;

pub use error::{BoxError, MiddlewareError};
pub use matcher::{match_path, MatchingStrategy, Params};
pub use pipeline::{
    boxed, from_fn, BoxedMiddleware, FnMiddleware, Middleware, MiddlewareResult, Next, Outcome, RESPONSE_NOT_SENT,
};
pub use properties::{Properties, REQUEST_ID};
pub use router::{Mount, Route, Router, RouterBuilder};
