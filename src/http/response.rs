//! Outbound response facade.
//!
//! # Responsibilities
//! - Collect status, headers and body written by middlewares
//! - Record whether any middleware sent a response
//! - Serialize JSON bodies and [`ApiResult`] envelopes
//!
//! # Design Decisions
//! - "Sent" is an explicit flag; the router reads it to tell handled
//!   requests from unhandled ones
//! - Content-Type sniffed from the body when the handler did not set one,
//!   and sniffed again when a later send overwrites the body
//! - Sending twice is allowed (last write wins) but logged

use std::collections::HashMap;

use serde::Serialize;

use crate::http::envelope::ApiResult;
use crate::http::json;
use crate::http::parse::detect_content_type;

pub const CONTENT_TYPE: &str = "content-type";

/// A response being built by the middleware chain.
#[derive(Debug, Clone)]
pub struct Response {
    status: u16,
    headers: HashMap<String, String>,
    body: Vec<u8>,
    sent: bool,
    // Content-Type came from sniffing, not from a handler.
    sniffed_type: bool,
}

impl Default for Response {
    fn default() -> Self {
        Self::new()
    }
}

impl Response {
    /// Empty, unsent response with status 200.
    pub fn new() -> Self {
        Self {
            status: 200,
            headers: HashMap::new(),
            body: Vec::new(),
            sent: false,
            sniffed_type: false,
        }
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    pub fn headers(&self) -> &HashMap<String, String> {
        &self.headers
    }

    pub fn set_header(&mut self, name: impl AsRef<str>, value: impl Into<String>) -> &mut Self {
        let name = name.as_ref().to_ascii_lowercase();
        if name == CONTENT_TYPE {
            self.sniffed_type = false;
        }
        self.headers.insert(name, value.into());
        self
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Whether a middleware has sent this response.
    pub fn is_sent(&self) -> bool {
        self.sent
    }

    /// Write the status and body and mark the response as sent.
    pub fn send(&mut self, status: u16, body: impl Into<String>) {
        let body = body.into();

        if self.sent {
            tracing::warn!(
                previous_status = self.status,
                status,
                "Response sent more than once, overwriting"
            );
        }

        if self.sniffed_type || !self.headers.contains_key(CONTENT_TYPE) {
            self.headers
                .insert(CONTENT_TYPE.to_string(), detect_content_type(&body).to_string());
            self.sniffed_type = true;
        }

        self.status = status;
        self.body = body.into_bytes();
        self.sent = true;
    }

    /// Serialize `value` as JSON and send it.
    pub fn json<T: Serialize + ?Sized>(&mut self, status: u16, value: &T) -> serde_json::Result<()> {
        let body = json::to_json(value)?;
        self.set_header(CONTENT_TYPE, "application/json");
        self.send(status, body);
        Ok(())
    }

    /// Send an envelope using its own status code.
    pub fn send_result<T: Serialize>(&mut self, result: &ApiResult<T>) -> serde_json::Result<()> {
        self.json(result.status_code(), result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::envelope::PagedResult;

    #[test]
    fn test_new_response_is_unsent() {
        let res = Response::new();
        assert!(!res.is_sent());
        assert_eq!(res.status(), 200);
        assert!(res.body().is_empty());
    }

    #[test]
    fn test_send_sniffs_content_type() {
        let mut res = Response::new();
        res.send(201, "<html></html>");

        assert!(res.is_sent());
        assert_eq!(res.status(), 201);
        assert_eq!(res.header("Content-Type"), Some("text/html"));
        assert_eq!(res.body_text(), "<html></html>");
    }

    #[test]
    fn test_explicit_content_type_is_kept() {
        let mut res = Response::new();
        res.set_header("Content-Type", "text/csv");
        res.send(200, "a,b,c");
        assert_eq!(res.header(CONTENT_TYPE), Some("text/csv"));
    }

    #[test]
    fn test_second_send_overwrites() {
        let mut res = Response::new();
        res.send(200, "first");
        res.send(404, "second");
        assert_eq!(res.status(), 404);
        assert_eq!(res.body_text(), "second");
    }

    #[test]
    fn test_second_send_resniffs_content_type() {
        let mut res = Response::new();
        res.send(200, "{}");
        assert_eq!(res.header(CONTENT_TYPE), Some("application/json"));

        res.send(500, "<html>oops</html>");
        assert_eq!(res.header(CONTENT_TYPE), Some("text/html"));
    }

    #[test]
    fn test_explicit_content_type_survives_second_send() {
        let mut res = Response::new();
        res.json(200, &[1, 2]).unwrap();
        res.send(500, "plain failure");
        assert_eq!(res.header(CONTENT_TYPE), Some("application/json"));

        let mut res = Response::new();
        res.send(200, "first");
        res.set_header("Content-Type", "text/csv");
        res.send(200, "<b>");
        assert_eq!(res.header(CONTENT_TYPE), Some("text/csv"));
    }

    #[test]
    fn test_send_result_uses_envelope_status() {
        let mut res = Response::new();
        let result = ApiResult::ok_with_status(PagedResult::new(10, vec![1, 2]), 201);
        res.send_result(&result).unwrap();

        assert_eq!(res.status(), 201);
        assert_eq!(res.header(CONTENT_TYPE), Some("application/json"));
        let body: serde_json::Value = serde_json::from_slice(res.body()).unwrap();
        assert_eq!(body["payload"]["totalCount"], 10);
    }
}
