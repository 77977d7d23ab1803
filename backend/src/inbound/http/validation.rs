//! Shared request decoding and validation helpers for inbound HTTP adapters.
//!
//! Every rejection is an `invalid_request` error whose `details.code` tells
//! clients which stage failed: `empty_body`, `malformed_json`, `invalid_id`
//! or `validation_failed`.

use serde::de::DeserializeOwned;
use serde_json::json;

use crate::domain::{Error, StudentId, StudentValidationError};

/// Detail codes for HTTP request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    EmptyBody,
    MalformedJson,
    InvalidId,
    ValidationFailed,
}

impl ErrorCode {
    pub(crate) fn as_str(self) -> &'static str {
        match self {
            ErrorCode::EmptyBody => "empty_body",
            ErrorCode::MalformedJson => "malformed_json",
            ErrorCode::InvalidId => "invalid_id",
            ErrorCode::ValidationFailed => "validation_failed",
        }
    }
}

/// Decode a JSON request body.
///
/// A body that is empty or only whitespace is reported separately from one
/// that fails to parse.
pub(crate) fn decode_json_body<T: DeserializeOwned>(body: &[u8]) -> Result<T, Error> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Err(Error::invalid_request("empty request body")
            .with_details(json!({ "code": ErrorCode::EmptyBody.as_str() })));
    }

    serde_json::from_slice(body).map_err(|err| {
        Error::invalid_request(format!("malformed JSON body: {err}")).with_details(json!({
            "code": ErrorCode::MalformedJson.as_str(),
            "line": err.line(),
            "column": err.column(),
        }))
    })
}

/// Parse the `{id}` path segment.
pub(crate) fn parse_student_id(raw: &str) -> Result<StudentId, Error> {
    raw.parse::<StudentId>().map_err(|_| {
        Error::invalid_request("id must be an integer").with_details(json!({
            "code": ErrorCode::InvalidId.as_str(),
            "field": "id",
            "value": raw,
        }))
    })
}

/// Map a domain validation failure to a 400 listing every offending field.
pub(crate) fn validation_error(err: &StudentValidationError) -> Error {
    let fields: Vec<_> = err
        .violations()
        .iter()
        .map(|violation| {
            json!({
                "field": violation.field.as_str(),
                "code": violation.rule.as_str(),
                "message": violation.message(),
            })
        })
        .collect();

    Error::invalid_request(format!("invalid student: {err}")).with_details(json!({
        "code": ErrorCode::ValidationFailed.as_str(),
        "fields": fields,
    }))
}
