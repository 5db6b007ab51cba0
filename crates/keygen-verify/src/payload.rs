//! Verified response payload.
//!
//! A [`VerifiedPayload`] can only be produced by [`crate::ResponseVerifier`],
//! after the signature over its bytes has been checked.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{VerifyError, VerifyResult};

/// Parsed JSON document whose signature has been verified.
#[derive(Debug, Clone, PartialEq)]
pub struct VerifiedPayload {
    document: Map<String, Value>,
}

/// The `meta` block of a validation response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationMeta {
    pub valid: bool,
    pub detail: Option<String>,
    /// Validation code, e.g. `VALID`, `EXPIRED`, `NOT_FOUND`.
    pub code: Option<String>,
}

/// One entry of an API `errors` list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApiErrorObject {
    #[serde(default)]
    pub title: Option<String>,

    #[serde(default)]
    pub detail: Option<String>,

    #[serde(default)]
    pub code: Option<String>,

    #[serde(default)]
    pub source: Option<Value>,
}

impl fmt::Display for ApiErrorObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.title, &self.detail) {
            (Some(t), Some(d)) => write!(f, "{}: {}", t, d)?,
            (Some(t), None) => write!(f, "{}", t)?,
            (None, Some(d)) => write!(f, "{}", d)?,
            (None, None) => write!(f, "unknown error")?,
        }
        if let Some(code) = &self.code {
            write!(f, " ({})", code)?;
        }
        Ok(())
    }
}

impl VerifiedPayload {
    /// Parse verified body bytes. The document must be a JSON object.
    pub(crate) fn from_slice(body: &[u8]) -> VerifyResult<Self> {
        let value: Value =
            serde_json::from_slice(body).map_err(|e| VerifyError::InvalidResponse {
                message: format!("failed to parse response body: {}", e),
            })?;

        match value {
            Value::Object(document) => Ok(Self { document }),
            other => Err(VerifyError::InvalidResponse {
                message: format!("expected a JSON object, got {}", kind(&other)),
            }),
        }
    }

    /// Validation metadata, if present and well-formed.
    ///
    /// The code is read from `code`, falling back to `constant`.
    pub fn meta(&self) -> Option<ValidationMeta> {
        let meta = self.document.get("meta")?.as_object()?;
        let valid = meta.get("valid")?.as_bool()?;
        let text = |k: &str| meta.get(k).and_then(Value::as_str).map(String::from);

        Some(ValidationMeta {
            valid,
            detail: text("detail"),
            code: text("code").or_else(|| text("constant")),
        })
    }

    /// Entries of the top-level `errors` list.
    ///
    /// A missing or `null` list yields no errors. Entries that are not error
    /// objects are kept with their JSON text as the detail.
    pub fn errors(&self) -> Vec<ApiErrorObject> {
        let entries = match self.document.get("errors") {
            None | Some(Value::Null) => return Vec::new(),
            Some(Value::Array(items)) => items.clone(),
            Some(other) => vec![other.clone()],
        };

        entries
            .into_iter()
            .map(|entry| {
                serde_json::from_value::<ApiErrorObject>(entry.clone()).unwrap_or_else(|_| {
                    ApiErrorObject {
                        detail: Some(entry.to_string()),
                        ..Default::default()
                    }
                })
            })
            .collect()
    }

    pub fn has_errors(&self) -> bool {
        !self.errors().is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.document.get(key)
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.document
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.document)
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(json: &str) -> VerifiedPayload {
        VerifiedPayload::from_slice(json.as_bytes()).unwrap()
    }

    #[test]
    fn test_meta_with_constant() {
        let p = payload(r#"{"meta":{"valid":true,"detail":"is valid","constant":"VALID"}}"#);
        assert_eq!(
            p.meta(),
            Some(ValidationMeta {
                valid: true,
                detail: Some("is valid".to_string()),
                code: Some("VALID".to_string()),
            })
        );
    }

    #[test]
    fn test_meta_prefers_code() {
        let p = payload(r#"{"meta":{"valid":false,"code":"EXPIRED","constant":"OTHER"}}"#);
        let meta = p.meta().unwrap();
        assert!(!meta.valid);
        assert_eq!(meta.code.as_deref(), Some("EXPIRED"));
        assert!(meta.detail.is_none());
    }

    #[test]
    fn test_meta_missing_or_malformed() {
        assert!(payload(r#"{"data":null}"#).meta().is_none());
        assert!(payload(r#"{"meta":"nope"}"#).meta().is_none());
        assert!(payload(r#"{"meta":{"valid":"yes"}}"#).meta().is_none());
    }

    #[test]
    fn test_errors_absent_or_null() {
        assert!(!payload(r#"{"meta":{}}"#).has_errors());
        assert!(!payload(r#"{"errors":null}"#).has_errors());
        assert!(!payload(r#"{"errors":[]}"#).has_errors());
    }

    #[test]
    fn test_errors_parsed() {
        let p = payload(
            r#"{"errors":[{"title":"Bad request","detail":"is missing","code":"KEY_MISSING","source":{"pointer":"/meta/key"}}]}"#,
        );
        let errors = p.errors();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].title.as_deref(), Some("Bad request"));
        assert_eq!(errors[0].code.as_deref(), Some("KEY_MISSING"));
        assert!(errors[0].source.is_some());
        assert_eq!(errors[0].to_string(), "Bad request: is missing (KEY_MISSING)");
    }

    #[test]
    fn test_errors_unstructured_entries_kept() {
        let p = payload(r#"{"errors":["boom", 42]}"#);
        let errors = p.errors();
        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0].detail.as_deref(), Some("\"boom\""));
        assert_eq!(errors[1].detail.as_deref(), Some("42"));
    }

    #[test]
    fn test_non_object_rejected() {
        for body in ["[]", "42", "\"text\"", "null", "not json"] {
            assert!(
                matches!(
                    VerifiedPayload::from_slice(body.as_bytes()),
                    Err(VerifyError::InvalidResponse { .. })
                ),
                "{} should be rejected",
                body
            );
        }
    }

    #[test]
    fn test_into_value_roundtrip() {
        let json = r#"{"meta":{"valid":true}}"#;
        let value: Value = serde_json::from_str(json).unwrap();
        assert_eq!(payload(json).into_value(), value);
    }
}
