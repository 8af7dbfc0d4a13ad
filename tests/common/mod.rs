//! Shared utilities for integration tests.

use std::sync::{Arc, Mutex};

use pipeline_router::http::{Request, Response};
use pipeline_router::routing::{from_fn, BoxedMiddleware, MiddlewareError, Outcome, Router};

/// Ordered log of middleware names, shared across a chain.
pub type CallLog = Arc<Mutex<Vec<String>>>;

pub fn call_log() -> CallLog {
    Arc::new(Mutex::new(Vec::new()))
}

pub fn calls(log: &CallLog) -> Vec<String> {
    log.lock().unwrap().clone()
}

/// Logs its name and continues the chain.
pub fn pass(name: &'static str, log: &CallLog) -> BoxedMiddleware {
    let log = log.clone();
    from_fn(move |req, res, props, next| {
        let log = log.clone();
        Box::pin(async move {
            log.lock().unwrap().push(name.to_string());
            next.run(req, res, props).await
        })
    })
}

/// Logs its name and sends `body` with status 200, ending the chain.
pub fn respond(name: &'static str, body: &'static str, log: &CallLog) -> BoxedMiddleware {
    let log = log.clone();
    from_fn(move |_req, res, _props, _next| {
        let log = log.clone();
        Box::pin(async move {
            log.lock().unwrap().push(name.to_string());
            res.send(200, body);
            Ok(())
        })
    })
}

/// Logs its name and does nothing else: no response, no `next`.
#[allow(dead_code)]
pub fn stop(name: &'static str, log: &CallLog) -> BoxedMiddleware {
    let log = log.clone();
    from_fn(move |_req, _res, _props, _next| {
        let log = log.clone();
        Box::pin(async move {
            log.lock().unwrap().push(name.to_string());
            Ok(())
        })
    })
}

/// Fails with `status`.
#[allow(dead_code)]
pub fn fail(status: u16, message: &'static str) -> BoxedMiddleware {
    from_fn(move |_req, _res, _props, _next| {
        Box::pin(async move { Err(MiddlewareError::with_status(status, message)) })
    })
}

/// Dispatch `method url` and return the outcome with the response.
pub async fn send(router: &Router, method: &str, url: &str) -> (Result<Outcome, MiddlewareError>, Response) {
    let mut req = Request::new(method, url);
    let mut res = Response::new();
    let outcome = router.handle(&mut req, &mut res).await;
    (outcome, res)
}
