//! Shared validation helpers for inbound HTTP adapters.
//!
//! Every helper returns an `invalid_request` domain error whose details
//! name the offending field and a stable code.

use serde_json::json;

use crate::domain::{Error, IdValidationError, PetId};

/// Upper bound for `?limit=` on history endpoints.
pub(crate) const MAX_HISTORY_LIMIT: usize = 100;

/// Validation error codes for HTTP request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ValidationCode {
    MissingField,
    InvalidId,
    InvalidLimit,
}

impl ValidationCode {
    fn as_str(self) -> &'static str {
        match self {
            Self::MissingField => "missing_field",
            Self::InvalidId => "invalid_id",
            Self::InvalidLimit => "invalid_limit",
        }
    }
}

fn validation_error(field: &str, code: ValidationCode, message: impl Into<String>) -> Error {
    Error::invalid_request(message).with_details(json!({
        "field": field,
        "code": code.as_str(),
    }))
}

pub(crate) fn missing_field_error(field: &str) -> Error {
    validation_error(
        field,
        ValidationCode::MissingField,
        format!("{field} is required"),
    )
}

/// Require an optional body field, reporting it by its wire name.
pub(crate) fn require<T>(value: Option<T>, field: &str) -> Result<T, Error> {
    value.ok_or_else(|| missing_field_error(field))
}

/// Parse a raw identifier with one of the `ids` constructors.
pub(crate) fn parse_id<T>(
    raw: i64,
    field: &str,
    parse: impl FnOnce(i64) -> Result<T, IdValidationError>,
) -> Result<T, Error> {
    parse(raw).map_err(|err| {
        validation_error(field, ValidationCode::InvalidId, format!("{field}: {err}"))
    })
}

/// Resolve `?limit=`: absent uses `default`, otherwise `1..=MAX_HISTORY_LIMIT`.
pub(crate) fn parse_limit(raw: Option<&str>, default: usize) -> Result<usize, Error> {
    let Some(raw) = raw else {
        return Ok(default);
    };
    match raw.trim().parse::<usize>() {
        Ok(limit) if (1..=MAX_HISTORY_LIMIT).contains(&limit) => Ok(limit),
        _ => Err(validation_error(
            "limit",
            ValidationCode::InvalidLimit,
            format!("limit must be an integer between 1 and {MAX_HISTORY_LIMIT}"),
        )),
    }
}

/// Parse a `{petId}` path segment.
///
/// No pet can carry a non-positive id, so those answer the same
/// `not_found` a missing pet does.
pub(crate) fn parse_pet_path_id(raw: i64) -> Result<PetId, Error> {
    PetId::new(raw).map_err(|_| Error::not_found("Pet not found"))
}
