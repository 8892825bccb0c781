//! Serialization of requests and solutions, and the structured parse error
//! reported when a payload does not match the expected shape.

use serde::Serialize;
use serde_json::{json, Value};
use std::fmt;

pub mod problem;
pub mod solution;

/// A failure to read a field of the request payload.
///
/// Carries the dotted path of the offending field (array indices included,
/// e.g. `withTimeWindows.timeWindows[2][0].end`) and optionally the shapes
/// that would have been accepted. Parsing stops at the first failure.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ParseError {
    /// Fixed error code, always `PARSE_ERROR`.
    pub code: String,
    /// Dotted path of the offending field.
    pub key: String,
    /// Expectation strings, when the field exists but has the wrong shape.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub values: Option<Vec<String>>,
}

impl ParseError {
    /// Creates a parse error without expectations.
    pub fn new(key: &str) -> Self {
        Self { code: "PARSE_ERROR".to_string(), key: key.to_string(), values: None }
    }

    /// Creates a parse error listing what was expected at `key`.
    pub fn with_values(key: &str, values: &[&str]) -> Self {
        Self {
            code: "PARSE_ERROR".to_string(),
            key: key.to_string(),
            values: Some(values.iter().map(|value| value.to_string()).collect()),
        }
    }

    /// Renders the error in the wire shape of the service.
    pub fn to_response(&self) -> Value {
        match &self.values {
            None => json!({ "code": self.code, "errors": self.key }),
            Some(values) => json!({
                "code": self.code,
                "errors": "invalid payload",
                "data": { "key": self.key, "values": values },
            }),
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.values {
            None => write!(f, "{}: {}", self.code, self.key),
            Some(values) => write!(f, "{}: {}, expected: {}", self.code, self.key, values.join(", ")),
        }
    }
}

impl std::error::Error for ParseError {}
