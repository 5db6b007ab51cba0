//! Error types for license validation.

use crate::payload::ApiErrorObject;

/// Validation errors.
///
/// Every variant is fail-closed: none of them carries a payload that could be
/// handed to a caller.
#[derive(Debug, thiserror::Error)]
pub enum VerifyError {
    /// Response signature did not verify against the trust anchor.
    #[error("signature verification failed: {reason}")]
    SignatureInvalid { reason: String },

    /// `Digest` header disagrees with the digest of the body bytes.
    #[error("digest mismatch: header claims {expected}, body hashes to {actual}")]
    DigestMismatch { expected: String, actual: String },

    /// A cached record failed re-verification on read.
    #[error("cache record {key} failed verification, it has likely been tampered with: {reason}")]
    CacheTampered { key: String, reason: String },

    /// Authentically signed response carrying an error list.
    #[error("API error (status {status}): {}", format_api_errors(.errors))]
    Api {
        status: u16,
        errors: Vec<ApiErrorObject>,
    },

    /// A header required for verification is absent.
    #[error("missing response header: {name}")]
    MissingHeader { name: String },

    /// Response could not be interpreted.
    #[error("invalid response: {message}")]
    InvalidResponse { message: String },

    /// Network error.
    #[error("network error: {message}")]
    Network { message: String },

    /// Cache IO error.
    #[error("cache error: {message}")]
    Cache { message: String },

    /// Configuration error.
    #[error("configuration error: {message}")]
    Config { message: String },
}

impl VerifyError {
    /// Exit code for CLI.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Config { .. } => 1,

            // Application-level rejection from the issuer
            Self::Api { .. } => 3,

            // Trust violations
            Self::SignatureInvalid { .. } => 4,
            Self::DigestMismatch { .. } => 4,
            Self::CacheTampered { .. } => 4,
            Self::MissingHeader { .. } => 4,

            Self::Network { .. } => 5,

            Self::Cache { .. } => 6,
            Self::InvalidResponse { .. } => 6,
        }
    }

    /// Whether the error means data failed the trust check.
    pub fn is_integrity_failure(&self) -> bool {
        matches!(
            self,
            Self::SignatureInvalid { .. }
                | Self::DigestMismatch { .. }
                | Self::CacheTampered { .. }
                | Self::MissingHeader { .. }
        )
    }
}

fn format_api_errors(errors: &[ApiErrorObject]) -> String {
    if errors.is_empty() {
        return "no error details".to_string();
    }
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

impl From<reqwest::Error> for VerifyError {
    fn from(err: reqwest::Error) -> Self {
        Self::Network {
            message: err.to_string(),
        }
    }
}

/// Result type for validation operations.
pub type VerifyResult<T> = Result<T, VerifyError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integrity_failures_share_exit_code() {
        let errors = [
            VerifyError::SignatureInvalid {
                reason: "bad".to_string(),
            },
            VerifyError::DigestMismatch {
                expected: "a".to_string(),
                actual: "b".to_string(),
            },
            VerifyError::CacheTampered {
                key: "validate".to_string(),
                reason: "bad".to_string(),
            },
        ];
        for err in &errors {
            assert!(err.is_integrity_failure());
            assert_eq!(err.exit_code(), 4);
        }
    }

    #[test]
    fn test_exit_codes_are_nonzero() {
        let errors = [
            VerifyError::Config {
                message: "x".to_string(),
            },
            VerifyError::Network {
                message: "x".to_string(),
            },
            VerifyError::Cache {
                message: "x".to_string(),
            },
            VerifyError::Api {
                status: 422,
                errors: vec![],
            },
        ];
        for err in &errors {
            assert_ne!(err.exit_code(), 0);
            assert!(!err.is_integrity_failure());
        }
    }

    #[test]
    fn test_api_error_display_lists_errors() {
        let err = VerifyError::Api {
            status: 400,
            errors: vec![ApiErrorObject {
                title: Some("Bad request".to_string()),
                detail: Some("is missing".to_string()),
                code: Some("KEY_MISSING".to_string()),
                source: None,
            }],
        };
        let msg = err.to_string();
        assert!(msg.contains("status 400"));
        assert!(msg.contains("Bad request"));
        assert!(msg.contains("KEY_MISSING"));
    }
}
