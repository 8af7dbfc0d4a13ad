//! Middleware pipeline.
//!
//! # Responsibilities
//! - Define the middleware contract
//! - Walk a resolved chain with an explicit cursor
//! - Hand control to a mounted sub-router at the end of a chain
//!
//! # Design Decisions
//! - `next` is a cursor over a step slice, not a nested closure
//! - Not calling `next.run` ends the chain (short-circuit)
//! - Steps run strictly in order; a middleware awaiting I/O never lets a
//!   later sibling start
//! - Futures are boxed so sub-router recursion has a finite type

use std::sync::Arc;

use futures_util::future::BoxFuture;

use crate::http::{Request, Response};
use crate::routing::error::MiddlewareError;
use crate::routing::properties::Properties;
use crate::routing::router::Router;

/// Status reported when no middleware sent a response.
pub const RESPONSE_NOT_SENT: u16 = 777;

pub type MiddlewareResult = Result<(), MiddlewareError>;

/// Shared, type-erased middleware as stored in routes and routers.
pub type BoxedMiddleware = Arc<dyn Middleware>;

/// A unit of request handling that may act and then continue or stop the
/// chain.
///
/// ```
/// use futures_util::future::BoxFuture;
/// use pipeline_router::http::{Request, Response};
/// use pipeline_router::routing::{Middleware, MiddlewareResult, Next, Properties};
///
/// struct PoweredBy;
///
/// impl Middleware for PoweredBy {
///     fn handle<'a>(
///         &'a self,
///         req: &'a mut Request,
///         res: &'a mut Response,
///         props: &'a mut Properties,
///         next: Next<'a>,
///     ) -> BoxFuture<'a, MiddlewareResult> {
///         Box::pin(async move {
///             res.set_header("x-powered-by", "pipeline-router");
///             next.run(req, res, props).await
///         })
///     }
/// }
/// ```
pub trait Middleware: Send + Sync {
    fn handle<'a>(
        &'a self,
        req: &'a mut Request,
        res: &'a mut Response,
        props: &'a mut Properties,
        next: Next<'a>,
    ) -> BoxFuture<'a, MiddlewareResult>;
}

/// One entry of a resolved chain.
pub(crate) enum Step<'a> {
    Middleware(&'a dyn Middleware),
    /// Delegate to a sub-router with the mount prefix stripped.
    Mount { router: &'a Router, path: String },
}

/// Continuation handed to each middleware: the rest of the chain.
pub struct Next<'a> {
    method: &'a str,
    steps: &'a [Step<'a>],
    cursor: usize,
}

impl<'a> Next<'a> {
    pub(crate) fn new(method: &'a str, steps: &'a [Step<'a>]) -> Self {
        Self {
            method,
            steps,
            cursor: 0,
        }
    }

    /// Number of steps left after this point.
    pub fn remaining(&self) -> usize {
        self.steps.len().saturating_sub(self.cursor)
    }

    /// Run the rest of the chain.
    pub fn run<'b>(
        self,
        req: &'b mut Request,
        res: &'b mut Response,
        props: &'b mut Properties,
    ) -> BoxFuture<'b, MiddlewareResult>
    where
        'a: 'b,
    {
        match self.steps.get(self.cursor) {
            None => Box::pin(async { Ok(()) }),
            Some(Step::Middleware(middleware)) => {
                let next = Next {
                    method: self.method,
                    steps: self.steps,
                    cursor: self.cursor + 1,
                };
                middleware.handle(req, res, props, next)
            }
            Some(Step::Mount { router, path }) => router.execute(self.method, path, req, res, props),
        }
    }
}

/// What a dispatch produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// A middleware sent a response with this status.
    Handled(u16),
    /// Nothing sent a response; the host applies its default (usually 404).
    Unhandled,
}

impl Outcome {
    /// Numeric form: the response status, or [`RESPONSE_NOT_SENT`].
    pub fn code(&self) -> u16 {
        match self {
            Outcome::Handled(status) => *status,
            Outcome::Unhandled => RESPONSE_NOT_SENT,
        }
    }

    pub fn is_handled(&self) -> bool {
        matches!(self, Outcome::Handled(_))
    }
}

/// Middleware built from a closure, see [`from_fn`].
pub struct FnMiddleware<F> {
    f: F,
}

impl<F> Middleware for FnMiddleware<F>
where
    F: for<'a> Fn(
            &'a mut Request,
            &'a mut Response,
            &'a mut Properties,
            Next<'a>,
        ) -> BoxFuture<'a, MiddlewareResult>
        + Send
        + Sync,
{
    fn handle<'a>(
        &'a self,
        req: &'a mut Request,
        res: &'a mut Response,
        props: &'a mut Properties,
        next: Next<'a>,
    ) -> BoxFuture<'a, MiddlewareResult> {
        (self.f)(req, res, props, next)
    }
}

/// Build a middleware from a closure.
///
/// ```
/// use pipeline_router::routing::from_fn;
///
/// let hello = from_fn(|_req, res, _props, _next| {
///     Box::pin(async move {
///         res.send(200, "hello");
///         Ok(())
///     })
/// });
/// ```
pub fn from_fn<F>(f: F) -> BoxedMiddleware
where
    F: for<'a> Fn(
            &'a mut Request,
            &'a mut Response,
            &'a mut Properties,
            Next<'a>,
        ) -> BoxFuture<'a, MiddlewareResult>
        + Send
        + Sync
        + 'static,
{
    Arc::new(FnMiddleware { f })
}

/// Share a middleware value so it can be registered on routes.
pub fn boxed<M: Middleware + 'static>(middleware: M) -> BoxedMiddleware {
    Arc::new(middleware)
}
