//! Inbound request facade.
//!
//! # Responsibilities
//! - Hold the method, target, headers and body handed over by the host
//! - Expose the parsed path and query map used for routing
//! - Decode form and JSON bodies on demand
//!
//! # Design Decisions
//! - Target parsed once at construction; routing reads `path()` only
//! - Header names compared case-insensitively (stored lowercased)
//! - Body kept as raw bytes; decoding happens when a handler asks for it

use std::collections::HashMap;

use serde::de::DeserializeOwned;

use crate::http::json;
use crate::http::parse::{parse_form_data, parse_query_string, parse_url, QueryMap};

/// Header carrying a host-assigned request id.
pub const X_REQUEST_ID: &str = "x-request-id";

/// A request as seen by middlewares.
#[derive(Debug, Clone, Default)]
pub struct Request {
    method: String,
    url: String,
    path: String,
    query: QueryMap,
    headers: HashMap<String, String>,
    body: Vec<u8>,
}

impl Request {
    /// Create a request from a method and a raw target such as
    /// `/api/movies?page=1`.
    pub fn new(method: impl Into<String>, url: impl Into<String>) -> Self {
        let url = url.into();
        let parsed = parse_url(&url);

        Self {
            method: method.into(),
            query: parse_query_string(&parsed.query),
            path: parsed.path,
            url,
            headers: HashMap::new(),
            body: Vec::new(),
        }
    }

    pub fn with_header(mut self, name: impl AsRef<str>, value: impl Into<String>) -> Self {
        self.headers
            .insert(name.as_ref().to_ascii_lowercase(), value.into());
        self
    }

    pub fn with_body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = body.into();
        self
    }

    pub fn method(&self) -> &str {
        &self.method
    }

    /// The raw target, query included.
    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn query(&self) -> &QueryMap {
        &self.query
    }

    pub fn query_param(&self, name: &str) -> Option<&str> {
        self.query.get(name).map(String::as_str)
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    pub fn headers(&self) -> &HashMap<String, String> {
        &self.headers
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Body as text, lossily decoded.
    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Parse the body as an URL-encoded form.
    pub fn form(&self) -> QueryMap {
        parse_form_data(&self.body_text())
    }

    /// Parse the body as JSON with the crate's JSON defaults.
    pub fn json<T: DeserializeOwned>(&self) -> serde_json::Result<T> {
        json::from_json(&self.body_text())
    }
}
