//! Response envelopes built by handlers and serialized by the host.
//!
//! The router never inspects these; they exist so handlers across a
//! service report success, failure and paging the same way.

use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};
use std::error::Error as StdError;
use std::fmt;

/// Error payload carried by a failed [`ApiResult`].
pub type ErrorValue = Box<dyn StdError + Send + Sync>;

/// Success-or-error envelope with an HTTP status.
#[derive(Debug)]
pub enum ApiResult<T> {
    Success { payload: T, status_code: u16 },
    Error { error: ErrorValue, status_code: u16 },
}

impl<T> ApiResult<T> {
    pub const DEFAULT_SUCCESS_STATUS: u16 = 200;
    pub const DEFAULT_ERROR_STATUS: u16 = 500;

    /// Successful result with status 200.
    pub fn ok(payload: T) -> Self {
        Self::ok_with_status(payload, Self::DEFAULT_SUCCESS_STATUS)
    }

    pub fn ok_with_status(payload: T, status_code: u16) -> Self {
        Self::Success { payload, status_code }
    }

    /// Failed result with status 500.
    pub fn error(error: impl Into<ErrorValue>) -> Self {
        Self::error_with_status(error, Self::DEFAULT_ERROR_STATUS)
    }

    pub fn error_with_status(error: impl Into<ErrorValue>, status_code: u16) -> Self {
        Self::Error {
            error: error.into(),
            status_code,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error { .. })
    }

    pub fn payload(&self) -> Option<&T> {
        match self {
            Self::Success { payload, .. } => Some(payload),
            Self::Error { .. } => None,
        }
    }

    pub fn error_value(&self) -> Option<&(dyn StdError + Send + Sync + 'static)> {
        match self {
            Self::Success { .. } => None,
            Self::Error { error, .. } => Some(error.as_ref()),
        }
    }

    pub fn status_code(&self) -> u16 {
        match self {
            Self::Success { status_code, .. } | Self::Error { status_code, .. } => *status_code,
        }
    }

    pub fn into_payload(self) -> Option<T> {
        match self {
            Self::Success { payload, .. } => Some(payload),
            Self::Error { .. } => None,
        }
    }
}

impl<T: Serialize> Serialize for ApiResult<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("ApiResult", 4)?;
        state.serialize_field("isError", &self.is_error())?;
        state.serialize_field("statusCode", &self.status_code())?;
        state.serialize_field("payload", &self.payload())?;
        state.serialize_field("error", &self.error_value().map(|e| e.to_string()))?;
        state.end()
    }
}

impl<T> fmt::Display for ApiResult<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Success { status_code, .. } => write!(f, "success ({})", status_code),
            Self::Error { error, status_code } => write!(f, "error ({}): {}", status_code, error),
        }
    }
}

/// One page of values plus the total number available.
///
/// `total_count` may exceed `values.len()`; nothing ties them together.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PagedResult<T> {
    pub total_count: u64,
    pub values: Vec<T>,
}

impl<T> PagedResult<T> {
    pub fn new(total_count: u64, values: Vec<T>) -> Self {
        Self { total_count, values }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_ok_defaults_to_200() {
        let result = ApiResult::ok("test data");
        assert!(!result.is_error());
        assert!(result.error_value().is_none());
        assert_eq!(result.payload(), Some(&"test data"));
        assert_eq!(result.status_code(), 200);
    }

    #[test]
    fn test_ok_with_custom_status() {
        for status in [200, 201, 400, 401, 403, 404, 500, 503] {
            assert_eq!(ApiResult::ok_with_status("data", status).status_code(), status);
        }
    }

    #[test]
    fn test_error_defaults_to_500() {
        let result: ApiResult<String> = ApiResult::error("Test error");
        assert!(result.is_error());
        assert!(result.payload().is_none());
        assert_eq!(result.status_code(), 500);
        assert_eq!(result.error_value().unwrap().to_string(), "Test error");
    }

    #[test]
    fn test_error_preserves_source_details() {
        let source = io::Error::new(io::ErrorKind::InvalidInput, "Detailed error message");
        let result: ApiResult<()> = ApiResult::error_with_status(source, 400);

        assert_eq!(result.status_code(), 400);
        let error = result.error_value().unwrap();
        assert_eq!(error.to_string(), "Detailed error message");
        assert!(error.downcast_ref::<io::Error>().is_some());
    }

    #[test]
    fn test_optional_payload() {
        let result: ApiResult<Option<i32>> = ApiResult::ok_with_status(None, 204);
        assert!(!result.is_error());
        assert_eq!(result.status_code(), 204);
        assert_eq!(result.into_payload(), Some(None));
    }

    #[test]
    fn test_result_serialization() {
        let ok = serde_json::to_value(ApiResult::ok(vec!["a", "b"])).unwrap();
        assert_eq!(
            ok,
            serde_json::json!({"isError": false, "statusCode": 200, "payload": ["a", "b"], "error": null})
        );

        let err: ApiResult<u8> = ApiResult::error_with_status("Not found", 404);
        let err = serde_json::to_value(err).unwrap();
        assert_eq!(
            err,
            serde_json::json!({"isError": true, "statusCode": 404, "payload": null, "error": "Not found"})
        );
    }

    #[test]
    fn test_paged_result_allows_total_above_page() {
        let page = PagedResult::new(100, vec!["item1", "item2", "item3"]);
        assert_eq!(page.total_count, 100);
        assert_eq!(page.values.len(), 3);
    }

    #[test]
    fn test_paged_result_empty() {
        let page: PagedResult<i32> = PagedResult::new(0, Vec::new());
        assert_eq!(page.total_count, 0);
        assert!(page.values.is_empty());
    }

    #[test]
    fn test_paged_result_serialization() {
        let page = PagedResult::new(u64::from(u32::MAX), vec![Some(1), None]);
        let json = serde_json::to_string(&page).unwrap();
        assert_eq!(json, r#"{"totalCount":4294967295,"values":[1,null]}"#);

        let back: PagedResult<Option<i32>> = crate::http::json::from_json(r#"{"TotalCount": 2, "Values": [1, null]}"#).unwrap();
        assert_eq!(back.total_count, 2);
        assert_eq!(back.values, vec![Some(1), None]);
    }
}
