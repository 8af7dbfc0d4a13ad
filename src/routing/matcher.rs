//! Route matching logic.
//!
//! # Responsibilities
//! - Match a request path against a registered pattern
//! - Bind `:name` segments to decoded path values
//! - Match and strip sub-router mount prefixes
//!
//! # Design Decisions
//! - Two strategies: exact string (Simple) and segment-wise (Parametrized)
//! - Segment counts must be equal; a pattern is never a prefix match
//! - Empty segments from leading/trailing slashes are significant
//! - No regex, no backtracking: O(segments) per attempted route

use std::collections::HashMap;

use crate::http::parse::decode_component;

/// How a router compares request paths with route patterns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MatchingStrategy {
    /// Literal, character-for-character comparison.
    Simple,
    /// Segment-wise comparison with `:name` parameters.
    #[default]
    Parametrized,
}

crate::config_enum!(MatchingStrategy { Simple, Parametrized });

/// Parameters bound by a successful match.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params {
    inner: HashMap<String, String>,
}

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the value bound to `name`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.inner.get(name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.inner.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    // A repeated name keeps the last binding.
    fn insert(&mut self, name: &str, value: String) {
        self.inner.insert(name.to_string(), value);
    }
}

impl IntoIterator for Params {
    type Item = (String, String);
    type IntoIter = std::collections::hash_map::IntoIter<String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.inner.into_iter()
    }
}

/// Match `path` against `pattern`. `None` means no match.
///
/// ```
/// use pipeline_router::routing::{match_path, MatchingStrategy};
///
/// let params = match_path(
///     "/api/users/123/posts/456",
///     "/api/users/:userId/posts/:postId",
///     MatchingStrategy::Parametrized,
/// )
/// .unwrap();
/// assert_eq!(params.get("userId"), Some("123"));
/// assert_eq!(params.get("postId"), Some("456"));
///
/// assert!(match_path("/api/movies/42", "/api/movies", MatchingStrategy::Parametrized).is_none());
/// ```
pub fn match_path(path: &str, pattern: &str, strategy: MatchingStrategy) -> Option<Params> {
    match strategy {
        MatchingStrategy::Simple => (path == pattern).then(Params::new),
        MatchingStrategy::Parametrized => match_segments(path, pattern),
    }
}

fn match_segments(path: &str, pattern: &str) -> Option<Params> {
    // Cheap reject before walking segments.
    if path.matches('/').count() != pattern.matches('/').count() {
        return None;
    }

    let mut params = Params::new();

    for (actual, expected) in path.split('/').zip(pattern.split('/')) {
        match expected.strip_prefix(':') {
            Some(name) => params.insert(name, decode_component(actual)),
            None if actual == expected => {}
            None => return None,
        }
    }

    Some(params)
}

/// Normalize a mount prefix: trailing slashes are dropped, so `/api/`
/// becomes `/api` and `/` becomes the empty prefix.
pub fn normalize_prefix(prefix: &str) -> String {
    prefix.trim_end_matches('/').to_string()
}

/// Strip a normalized mount `prefix` from `path` if it is a leading
/// segment-prefix of it. The remainder always starts with `/`.
///
/// ```
/// use pipeline_router::routing::matcher::strip_mount_prefix;
///
/// assert_eq!(strip_mount_prefix("/api/movies", "/api").as_deref(), Some("/movies"));
/// assert_eq!(strip_mount_prefix("/api", "/api").as_deref(), Some("/"));
/// assert_eq!(strip_mount_prefix("/apiary", "/api"), None);
/// ```
pub fn strip_mount_prefix(path: &str, prefix: &str) -> Option<String> {
    if prefix.is_empty() {
        return Some(if path.is_empty() { "/".to_string() } else { path.to_string() });
    }

    let rest = path.strip_prefix(prefix)?;
    if rest.is_empty() {
        Some("/".to_string())
    } else if rest.starts_with('/') {
        Some(rest.to_string())
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const P: MatchingStrategy = MatchingStrategy::Parametrized;
    const S: MatchingStrategy = MatchingStrategy::Simple;

    #[test]
    fn test_simple_match_is_literal() {
        let params = match_path("/api/movies", "/api/movies", S).unwrap();
        assert!(params.is_empty());

        assert!(match_path("/api/movies/", "/api/movies", S).is_none());
        assert!(match_path("/api/movies/42", "/api/movies/:id", S).is_none());
        assert!(match_path("/API/movies", "/api/movies", S).is_none());
    }

    #[test]
    fn test_simple_match_accepts_literal_colon_pattern() {
        assert!(match_path("/api/movies/:id", "/api/movies/:id", S).is_some());
    }

    #[test]
    fn test_parametrized_literal_path() {
        let params = match_path("/api/movies", "/api/movies", P).unwrap();
        assert!(params.is_empty());
    }

    #[test]
    fn test_root_path() {
        assert!(match_path("/", "/", P).unwrap().is_empty());
        assert!(match_path("/", "/", S).unwrap().is_empty());
    }

    #[test]
    fn test_single_parameter() {
        let params = match_path("/api/movies/42", "/api/movies/:id", P).unwrap();
        assert_eq!(params.len(), 1);
        assert_eq!(params.get("id"), Some("42"));
    }

    #[test]
    fn test_multiple_parameters() {
        let params = match_path(
            "/api/users/123/posts/456",
            "/api/users/:userId/posts/:postId",
            P,
        )
        .unwrap();
        assert_eq!(params.get("userId"), Some("123"));
        assert_eq!(params.get("postId"), Some("456"));
    }

    #[test]
    fn test_segment_count_mismatch() {
        assert!(match_path("/api/movies/42", "/api/movies", P).is_none());
        assert!(match_path("/api/movies", "/api/movies/:id", P).is_none());
        assert!(match_path("/api/movies/42/", "/api/movies/:id", P).is_none());
    }

    #[test]
    fn test_literal_segment_mismatch() {
        assert!(match_path("/api/movies/42", "/api/users/:id", P).is_none());
    }

    #[test]
    fn test_parameter_is_percent_decoded() {
        let params = match_path("/api/search/hello%20world", "/api/search/:query", P).unwrap();
        assert_eq!(params.get("query"), Some("hello world"));

        let params = match_path("/api/search/hello+world", "/api/search/:query", P).unwrap();
        assert_eq!(params.get("query"), Some("hello world"));
    }

    #[test]
    fn test_trailing_slash_pattern() {
        let params = match_path("/api/movies/42/", "/api/movies/:id/", P).unwrap();
        assert_eq!(params.get("id"), Some("42"));
    }

    #[test]
    fn test_empty_segment_binds_empty_value() {
        let params = match_path("/api/movies/", "/api/movies/:id", P).unwrap();
        assert_eq!(params.get("id"), Some(""));
    }

    #[test]
    fn test_repeated_name_keeps_last_binding() {
        let params = match_path("/a/1/b/2", "/a/:id/b/:id", P).unwrap();
        assert_eq!(params.len(), 1);
        assert_eq!(params.get("id"), Some("2"));
    }

    #[test]
    fn test_strip_mount_prefix() {
        assert_eq!(strip_mount_prefix("/api/movies", "/api").as_deref(), Some("/movies"));
        assert_eq!(strip_mount_prefix("/api/", "/api").as_deref(), Some("/"));
        assert_eq!(strip_mount_prefix("/api", "/api").as_deref(), Some("/"));
        assert_eq!(strip_mount_prefix("/apiary", "/api"), None);
        assert_eq!(strip_mount_prefix("/other", "/api"), None);
        assert_eq!(strip_mount_prefix("/v1/api/x", "/v1/api").as_deref(), Some("/x"));
    }

    #[test]
    fn test_root_mount_forwards_path_unchanged() {
        assert_eq!(strip_mount_prefix("/movies", &normalize_prefix("/")).as_deref(), Some("/movies"));
    }

    #[test]
    fn test_normalize_prefix() {
        assert_eq!(normalize_prefix("/api/"), "/api");
        assert_eq!(normalize_prefix("/api"), "/api");
        assert_eq!(normalize_prefix("/"), "");
    }

    #[test]
    fn test_strategy_from_config_value() {
        use crate::config::ConfigValue;
        assert_eq!(MatchingStrategy::parse_config("simple"), Some(MatchingStrategy::Simple));
        assert_eq!(MatchingStrategy::parse_config("PARAMETRIZED"), Some(MatchingStrategy::Parametrized));
        assert_eq!(MatchingStrategy::parse_config("regex"), None);
    }
}
