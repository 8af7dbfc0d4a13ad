//! Request parsing utilities.
//!
//! # Responsibilities
//! - Split a raw request target into path and query
//! - Parse query strings and URL-encoded form bodies
//! - Sniff a content type from the leading characters of a body
//!
//! # Design Decisions
//! - Stateless free functions, shared by the request facade and handlers
//! - Permissive: malformed pairs are skipped, never raised as errors
//! - Repeated keys accumulate as a comma-joined value (no last-write)
//! - Sniffing is syntactic only; content is never validated

use std::collections::HashMap;

use percent_encoding::percent_decode_str;

/// Parsed query string or form body: key → decoded value.
///
/// Keys that appear more than once hold their values joined with `,`
/// in arrival order.
pub type QueryMap = HashMap<String, String>;

/// A request target split on its first `?`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedUrl {
    /// Everything before the first `?`, or the whole input.
    pub path: String,
    /// Everything after the first `?`, without the `?`. Empty when absent.
    pub query: String,
}

/// Split a raw request target into path and query.
///
/// ```
/// use pipeline_router::http::parse::parse_url;
///
/// let url = parse_url("/api/movies?page=1&size=10");
/// assert_eq!(url.path, "/api/movies");
/// assert_eq!(url.query, "page=1&size=10");
/// ```
pub fn parse_url(raw: &str) -> ParsedUrl {
    match raw.split_once('?') {
        Some((path, query)) => ParsedUrl {
            path: path.to_string(),
            query: query.to_string(),
        },
        None => ParsedUrl {
            path: raw.to_string(),
            query: String::new(),
        },
    }
}

/// Parse a query string. A single leading `?` is optional.
///
/// ```
/// use pipeline_router::http::parse::parse_query_string;
///
/// let query = parse_query_string("?search=hello%20world&filter=type%3Dmovie");
/// assert_eq!(query["search"], "hello world");
/// assert_eq!(query["filter"], "type=movie");
/// ```
pub fn parse_query_string(raw: &str) -> QueryMap {
    parse_pairs(raw.strip_prefix('?').unwrap_or(raw))
}

/// Parse an `application/x-www-form-urlencoded` body.
pub fn parse_form_data(raw: &str) -> QueryMap {
    parse_pairs(raw)
}

fn parse_pairs(raw: &str) -> QueryMap {
    let mut map = QueryMap::new();

    for pair in raw.split('&') {
        // Pairs without a separator carry no value and are dropped.
        let Some((key, value)) = pair.split_once('=') else {
            continue;
        };

        let key = decode_component(key);
        let value = decode_component(value);

        map.entry(key)
            .and_modify(|existing: &mut String| {
                existing.push(',');
                existing.push_str(&value);
            })
            .or_insert(value);
    }

    map
}

/// Decode a URL component with form semantics: `+` becomes a space, then
/// `%XX` escapes are decoded.
///
/// Invalid escapes are kept as-is and invalid UTF-8 is replaced lossily.
pub fn decode_component(raw: &str) -> String {
    if !raw.contains(['+', '%']) {
        return raw.to_string();
    }

    let spaced = raw.replace('+', " ");
    percent_decode_str(&spaced).decode_utf8_lossy().into_owned()
}

/// Infer a content type from the leading characters of `content`.
///
/// ```
/// use pipeline_router::http::parse::detect_content_type;
///
/// assert_eq!(detect_content_type("  {\"id\": 1}"), "application/json");
/// assert_eq!(detect_content_type("<?xml version=\"1.0\"?><a/>"), "application/xml");
/// assert_eq!(detect_content_type("<html></html>"), "text/html");
/// assert_eq!(detect_content_type(""), "text/plain");
/// ```
pub fn detect_content_type(content: &str) -> &'static str {
    let trimmed = content.trim_start();

    if trimmed.starts_with('{') || trimmed.starts_with('[') {
        "application/json"
    } else if trimmed.starts_with("<?xml") {
        "application/xml"
    } else if trimmed.starts_with('<') {
        "text/html"
    } else {
        "text/plain"
    }
}
