//! Route table, registration and dispatch.
//!
//! # Responsibilities
//! - Collect routes, global middlewares and mounts through a builder
//! - Freeze them into an immutable [`Router`]
//! - Resolve the chain for a request and run it
//!
//! # Design Decisions
//! - Immutable after `build()` (thread-safe without locks)
//! - First match wins, in registration order; no specificity ranking, so
//!   a broad pattern registered first shadows a narrower one
//! - Local routes are tried before mounts
//! - Method comparison is exact and case-sensitive
//! - Unhandled requests are an explicit outcome, not an error
//!
//! # Usage Constraints
//! - Mount depth is unbounded. A router cannot mount itself through the
//!   builder, but hosts must not build mount cycles by other means.

use std::sync::Arc;
use std::time::Instant;

use futures_util::future::BoxFuture;
use tracing::Instrument;
use uuid::Uuid;

use crate::http::{Request, Response, X_REQUEST_ID};
use crate::observability::metrics;
use crate::routing::error::MiddlewareError;
use crate::routing::matcher::{match_path, normalize_prefix, strip_mount_prefix, MatchingStrategy, Params};
use crate::routing::pipeline::{BoxedMiddleware, MiddlewareResult, Next, Outcome, Step};
use crate::routing::properties::{Properties, REQUEST_ID};

/// A registered (method, pattern, chain) entry.
pub struct Route {
    method: String,
    pattern: String,
    chain: Vec<BoxedMiddleware>,
}

impl Route {
    pub fn method(&self) -> &str {
        &self.method
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Number of middlewares in the route's chain.
    pub fn chain_len(&self) -> usize {
        self.chain.len()
    }
}

impl std::fmt::Debug for Route {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Route")
            .field("method", &self.method)
            .field("pattern", &self.pattern)
            .field("chain_len", &self.chain.len())
            .finish()
    }
}

/// A sub-router reachable under a path prefix.
#[derive(Debug)]
pub struct Mount {
    prefix: String,
    router: Arc<Router>,
}

impl Mount {
    /// Normalized prefix (no trailing slash; empty for `/`).
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn router(&self) -> &Arc<Router> {
        &self.router
    }
}

/// Immutable request router.
///
/// ```
/// use pipeline_router::http::{Request, Response};
/// use pipeline_router::routing::{from_fn, Outcome, Router};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let router = Router::builder()
///     .map_get("/movies/:id", [from_fn(|_req, res, props, _next| {
///         Box::pin(async move {
///             let id = props.get_str("id").unwrap_or_default().to_string();
///             res.send(200, id);
///             Ok(())
///         })
///     })])
///     .build();
///
/// let mut req = Request::new("GET", "/movies/42");
/// let mut res = Response::new();
/// let outcome = router.handle(&mut req, &mut res).await.unwrap();
///
/// assert_eq!(outcome, Outcome::Handled(200));
/// assert_eq!(res.body_text(), "42");
/// # }
/// ```
pub struct Router {
    middlewares: Vec<BoxedMiddleware>,
    routes: Vec<Route>,
    mounts: Vec<Mount>,
    strategy: MatchingStrategy,
}

impl std::fmt::Debug for Router {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Router")
            .field("middlewares", &self.middlewares.len())
            .field("routes", &self.routes)
            .field("mounts", &self.mounts)
            .field("strategy", &self.strategy)
            .finish()
    }
}

impl Default for Router {
    fn default() -> Self {
        RouterBuilder::new().build()
    }
}

impl Router {
    pub fn builder() -> RouterBuilder {
        RouterBuilder::new()
    }

    pub fn strategy(&self) -> MatchingStrategy {
        self.strategy
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    pub fn mounts(&self) -> &[Mount] {
        &self.mounts
    }

    /// Router-wide middlewares, in registration order.
    pub fn middlewares(&self) -> &[BoxedMiddleware] {
        &self.middlewares
    }

    /// Dispatch using the request's own method and path.
    pub async fn handle(&self, req: &mut Request, res: &mut Response) -> Result<Outcome, MiddlewareError> {
        let method = req.method().to_string();
        let path = req.path().to_string();
        self.dispatch(&method, &path, req, res).await
    }

    /// Run the chain resolved for `method` and `path`.
    ///
    /// Returns [`Outcome::Unhandled`] (code 777) when nothing sent a
    /// response. A middleware error stops the chain and is returned as-is.
    pub async fn dispatch(
        &self,
        method: &str,
        path: &str,
        req: &mut Request,
        res: &mut Response,
    ) -> Result<Outcome, MiddlewareError> {
        let started = Instant::now();

        let request_id = req
            .header(X_REQUEST_ID)
            .map(str::to_string)
            .unwrap_or_else(|| Uuid::new_v4().to_string());

        let mut props = Properties::new();
        props.insert(REQUEST_ID, request_id.clone());

        let span = tracing::debug_span!("dispatch", request_id = %request_id, method = %method, path = %path);
        let result = self
            .execute(method, path, req, res, &mut props)
            .instrument(span)
            .await;

        match result {
            Ok(()) => {
                let outcome = if res.is_sent() {
                    Outcome::Handled(res.status())
                } else {
                    Outcome::Unhandled
                };

                tracing::debug!(
                    request_id = %request_id,
                    code = outcome.code(),
                    elapsed_us = started.elapsed().as_micros() as u64,
                    "Dispatch complete"
                );
                metrics::record_dispatch(method, outcome, started);
                Ok(outcome)
            }
            Err(err) => {
                tracing::warn!(
                    request_id = %request_id,
                    method = %method,
                    path = %path,
                    status = err.status(),
                    error = %err,
                    "Middleware failed"
                );
                metrics::record_failure(method, err.status(), started);
                Err(err)
            }
        }
    }

    /// Resolve and run this router's chain with an existing property bag.
    pub(crate) fn execute<'b>(
        &'b self,
        method: &'b str,
        path: &'b str,
        req: &'b mut Request,
        res: &'b mut Response,
        props: &'b mut Properties,
    ) -> BoxFuture<'b, MiddlewareResult> {
        Box::pin(async move {
            let steps = self.resolve(method, path, props);
            Next::new(method, &steps).run(req, res, props).await
        })
    }

    fn resolve<'r>(&'r self, method: &str, path: &str, props: &mut Properties) -> Vec<Step<'r>> {
        let mut steps: Vec<Step<'r>> = self
            .middlewares
            .iter()
            .map(|m| Step::Middleware(m.as_ref()))
            .collect();

        if let Some((route, params)) = self.find_route(method, path) {
            tracing::trace!(pattern = %route.pattern, params = params.len(), "Route matched");
            props.merge_params(params);
            steps.extend(route.chain.iter().map(|m| Step::Middleware(m.as_ref())));
        } else if let Some((mount, rest)) = self.find_mount(path) {
            tracing::trace!(prefix = %mount.prefix, path = %rest, "Delegating to sub-router");
            steps.push(Step::Mount {
                router: mount.router.as_ref(),
                path: rest,
            });
        } else {
            tracing::trace!(path = %path, "No route or mount matched");
        }

        steps
    }

    fn find_route(&self, method: &str, path: &str) -> Option<(&Route, Params)> {
        self.routes
            .iter()
            .filter(|route| route.method == method)
            .find_map(|route| match_path(path, &route.pattern, self.strategy).map(|params| (route, params)))
    }

    fn find_mount(&self, path: &str) -> Option<(&Mount, String)> {
        self.mounts
            .iter()
            .find_map(|mount| strip_mount_prefix(path, &mount.prefix).map(|rest| (mount, rest)))
    }
}

/// Fluent registration API producing a [`Router`].
pub struct RouterBuilder {
    middlewares: Vec<BoxedMiddleware>,
    routes: Vec<Route>,
    mounts: Vec<Mount>,
    strategy: MatchingStrategy,
}

impl Default for RouterBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl RouterBuilder {
    pub fn new() -> Self {
        Self {
            middlewares: Vec::new(),
            routes: Vec::new(),
            mounts: Vec::new(),
            strategy: MatchingStrategy::default(),
        }
    }

    /// Add a router-wide middleware, run before any route or mount.
    pub fn use_middleware(mut self, middleware: BoxedMiddleware) -> Self {
        self.middlewares.push(middleware);
        self
    }

    pub fn use_middlewares(mut self, middlewares: impl IntoIterator<Item = BoxedMiddleware>) -> Self {
        self.middlewares.extend(middlewares);
        self
    }

    /// Register a route. `chain` runs in order when it matches.
    pub fn map(
        mut self,
        method: impl Into<String>,
        pattern: impl Into<String>,
        chain: impl IntoIterator<Item = BoxedMiddleware>,
    ) -> Self {
        self.routes.push(Route {
            method: method.into(),
            pattern: pattern.into(),
            chain: chain.into_iter().collect(),
        });
        self
    }

    pub fn map_get(self, pattern: impl Into<String>, chain: impl IntoIterator<Item = BoxedMiddleware>) -> Self {
        self.map("GET", pattern, chain)
    }

    pub fn map_post(self, pattern: impl Into<String>, chain: impl IntoIterator<Item = BoxedMiddleware>) -> Self {
        self.map("POST", pattern, chain)
    }

    pub fn map_put(self, pattern: impl Into<String>, chain: impl IntoIterator<Item = BoxedMiddleware>) -> Self {
        self.map("PUT", pattern, chain)
    }

    pub fn map_delete(self, pattern: impl Into<String>, chain: impl IntoIterator<Item = BoxedMiddleware>) -> Self {
        self.map("DELETE", pattern, chain)
    }

    /// Mount `router` under `prefix`. Requests whose path starts with the
    /// prefix (on a segment boundary) are forwarded with it stripped.
    pub fn use_router(mut self, prefix: impl AsRef<str>, router: Arc<Router>) -> Self {
        self.mounts.push(Mount {
            prefix: normalize_prefix(prefix.as_ref()),
            router,
        });
        self
    }

    pub fn use_simple_route_matching(mut self) -> Self {
        self.strategy = MatchingStrategy::Simple;
        self
    }

    pub fn use_parametrized_route_matching(mut self) -> Self {
        self.strategy = MatchingStrategy::Parametrized;
        self
    }

    pub fn use_route_matching(mut self, strategy: MatchingStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn build(self) -> Router {
        tracing::debug!(
            routes = self.routes.len(),
            mounts = self.mounts.len(),
            middlewares = self.middlewares.len(),
            strategy = ?self.strategy,
            "Router built"
        );

        Router {
            middlewares: self.middlewares,
            routes: self.routes,
            mounts: self.mounts,
            strategy: self.strategy,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::pipeline::from_fn;

    fn ok(body: &'static str) -> BoxedMiddleware {
        from_fn(move |_req, res, _props, _next| {
            Box::pin(async move {
                res.send(200, body);
                Ok(())
            })
        })
    }

    fn pass() -> BoxedMiddleware {
        from_fn(|req, res, props, next| Box::pin(async move { next.run(req, res, props).await }))
    }

    #[test]
    fn test_builder_preserves_registration_order() {
        let router = Router::builder()
            .map_get("/a", [ok("a")])
            .map_post("/b", [ok("b")])
            .map_put("/c", [ok("c")])
            .map_delete("/d", [ok("d")])
            .map("PATCH", "/e", [pass(), ok("e")])
            .build();

        let routes: Vec<_> = router
            .routes()
            .iter()
            .map(|r| (r.method(), r.pattern(), r.chain_len()))
            .collect();
        assert_eq!(
            routes,
            vec![
                ("GET", "/a", 1),
                ("POST", "/b", 1),
                ("PUT", "/c", 1),
                ("DELETE", "/d", 1),
                ("PATCH", "/e", 2),
            ]
        );
    }

    #[test]
    fn test_default_strategy_is_parametrized() {
        assert_eq!(Router::default().strategy(), MatchingStrategy::Parametrized);
    }

    #[test]
    fn test_strategy_selectors() {
        let simple = Router::builder().use_simple_route_matching().build();
        assert_eq!(simple.strategy(), MatchingStrategy::Simple);

        let param = Router::builder()
            .use_simple_route_matching()
            .use_parametrized_route_matching()
            .build();
        assert_eq!(param.strategy(), MatchingStrategy::Parametrized);
    }

    #[test]
    fn test_mount_prefix_is_normalized() {
        let sub = Arc::new(Router::default());
        let router = Router::builder()
            .use_router("/api/", sub.clone())
            .use_router("/", sub)
            .build();

        let prefixes: Vec<_> = router.mounts().iter().map(Mount::prefix).collect();
        assert_eq!(prefixes, vec!["/api", ""]);
    }

    #[test]
    fn test_use_middlewares_counts() {
        let router = Router::builder()
            .use_middleware(pass())
            .use_middlewares([pass(), pass()])
            .build();
        assert_eq!(router.middlewares().len(), 3);
    }

    #[tokio::test]
    async fn test_method_is_case_sensitive() {
        let router = Router::builder().map_get("/a", [ok("a")]).build();

        let mut req = Request::new("get", "/a");
        let mut res = Response::new();
        let outcome = router.handle(&mut req, &mut res).await.unwrap();
        assert_eq!(outcome, Outcome::Unhandled);
    }

    #[tokio::test]
    async fn test_local_route_wins_over_mount() {
        let sub = Arc::new(Router::builder().map_get("/movies", [ok("sub")]).build());
        let router = Router::builder()
            .use_router("/api", sub)
            .map_get("/api/movies", [ok("local")])
            .build();

        let mut req = Request::new("GET", "/api/movies");
        let mut res = Response::new();
        router.handle(&mut req, &mut res).await.unwrap();
        assert_eq!(res.body_text(), "local");
    }

    #[tokio::test]
    async fn test_request_id_header_is_reused() {
        let router = Router::builder()
            .map_get("/id", [from_fn(|_req, res, props, _next| {
                Box::pin(async move {
                    let id = props.request_id().unwrap_or_default().to_string();
                    res.send(200, id);
                    Ok(())
                })
            })])
            .build();

        let mut req = Request::new("GET", "/id").with_header(X_REQUEST_ID, "req-abc");
        let mut res = Response::new();
        router.handle(&mut req, &mut res).await.unwrap();
        assert_eq!(res.body_text(), "req-abc");

        let mut req = Request::new("GET", "/id");
        let mut res = Response::new();
        router.handle(&mut req, &mut res).await.unwrap();
        assert!(Uuid::parse_str(&res.body_text()).is_ok());
    }
}
