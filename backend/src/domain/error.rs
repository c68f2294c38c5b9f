//! Transport-agnostic error payload returned by driving ports.
//!
//! Inbound adapters translate [`ErrorCode`] into their own status codes; the
//! HTTP mapping lives in `inbound::http::error`.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

use super::TraceId;

/// Stable, machine-readable error category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[non_exhaustive]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// The request was rejected before storage was touched.
    InvalidRequest,
    /// The addressed pet does not exist.
    NotFound,
    /// Storage could not be reached in time; retrying may succeed.
    ServiceUnavailable,
    /// Anything else. Messages are redacted at the edge.
    InternalError,
}

/// Error payload shared by every inbound adapter.
///
/// # Examples
/// ```
/// use pet_backend::domain::{Error, ErrorCode};
///
/// let err = Error::not_found("Pet not found");
/// assert_eq!(err.code(), ErrorCode::NotFound);
/// assert_eq!(err.message(), "Pet not found");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Error {
    #[schema(example = "not_found")]
    code: ErrorCode,
    #[schema(example = "Pet not found")]
    message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    trace_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    details: Option<Value>,
}

impl Error {
    /// Build an error, capturing the trace identifier in scope.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            trace_id: TraceId::current().map(|id| id.to_string()),
            details: None,
        }
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidRequest, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::NotFound, message)
    }

    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ServiceUnavailable, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }

    #[must_use]
    pub fn with_trace_id(mut self, id: impl Into<String>) -> Self {
        self.trace_id = Some(id.into());
        self
    }

    #[must_use]
    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }

    #[must_use]
    pub fn code(&self) -> ErrorCode {
        self.code
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    #[must_use]
    pub fn trace_id(&self) -> Option<&str> {
        self.trace_id.as_deref()
    }

    #[must_use]
    pub fn details(&self) -> Option<&Value> {
        self.details.as_ref()
    }

    /// Copy of this error with message and details replaced by a generic
    /// placeholder, for internal failures leaving the process.
    #[must_use]
    pub fn redacted(&self) -> Self {
        Self {
            code: self.code,
            message: "Internal server error".to_owned(),
            trace_id: self.trace_id.clone(),
            details: None,
        }
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for Error {}

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use serde_json::json;

    use super::*;

    #[rstest]
    #[case(Error::invalid_request("bad"), ErrorCode::InvalidRequest)]
    #[case(Error::not_found("missing"), ErrorCode::NotFound)]
    #[case(Error::service_unavailable("down"), ErrorCode::ServiceUnavailable)]
    #[case(Error::internal("boom"), ErrorCode::InternalError)]
    fn constructors_set_code(#[case] error: Error, #[case] expected: ErrorCode) {
        assert_eq!(error.code(), expected);
    }

    #[tokio::test]
    async fn new_captures_trace_id_in_scope() {
        let trace_id: TraceId = "00000000-0000-0000-0000-000000000000"
            .parse()
            .expect("valid UUID");
        let error = TraceId::scope(trace_id, async { Error::internal("boom") }).await;
        assert_eq!(error.trace_id(), Some("00000000-0000-0000-0000-000000000000"));
    }

    #[test]
    fn new_without_scope_has_no_trace_id() {
        assert!(Error::not_found("Pet not found").trace_id().is_none());
    }

    #[test]
    fn redaction_keeps_code_and_trace_id_only() {
        let error = Error::internal("db exploded")
            .with_trace_id("abc")
            .with_details(json!({"sql": "SELECT"}));
        let redacted = error.redacted();
        assert_eq!(redacted.code(), ErrorCode::InternalError);
        assert_eq!(redacted.message(), "Internal server error");
        assert_eq!(redacted.trace_id(), Some("abc"));
        assert!(redacted.details().is_none());
    }

    #[test]
    fn serialises_in_camel_case_without_empty_fields() {
        let error = Error::invalid_request("Food not found")
            .with_details(json!({"code": "food_not_found"}));
        let value = serde_json::to_value(&error).expect("serialise error");
        assert_eq!(
            value,
            json!({
                "code": "invalid_request",
                "message": "Food not found",
                "details": {"code": "food_not_found"}
            })
        );
    }
}
