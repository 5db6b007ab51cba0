//! Signing string construction.
//!
//! The issuer signs this exact byte sequence:
//!
//! ```text
//! (request-target): {method} {path}
//! host: {host}
//! date: {date}
//! digest: {digest}
//! ```
//!
//! Lines are joined with `\n` and there is no trailing newline. Any deviation,
//! however cosmetic, fails verification.

use crate::digest::ContentDigest;

/// Components that fully determine the signing string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SigningComponents {
    request_target: String,
    host: String,
    date: String,
    digest: String,
}

impl SigningComponents {
    /// Build components for a request. `path` includes the query string, if any.
    pub fn new(
        method: &str,
        path: impl Into<String>,
        host: impl Into<String>,
        date: impl Into<String>,
        digest: &ContentDigest,
    ) -> Self {
        Self {
            request_target: format!("{} {}", method.to_ascii_lowercase(), path.into()),
            host: host.into(),
            date: date.into(),
            digest: digest.to_string(),
        }
    }

    /// Build components from a persisted `"{method} {path}"` target.
    ///
    /// The target is used verbatim; it was produced by [`Self::request_target`]
    /// when the record was written, and any edit to it must break verification.
    pub fn from_target(
        target: impl Into<String>,
        host: impl Into<String>,
        date: impl Into<String>,
        digest: &ContentDigest,
    ) -> Self {
        Self {
            request_target: target.into(),
            host: host.into(),
            date: date.into(),
            digest: digest.to_string(),
        }
    }

    pub fn method(&self) -> &str {
        self.request_target
            .split_once(' ')
            .map_or(self.request_target.as_str(), |(method, _)| method)
    }

    pub fn path(&self) -> &str {
        self.request_target
            .split_once(' ')
            .map_or("", |(_, path)| path)
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn date(&self) -> &str {
        &self.date
    }

    pub fn digest(&self) -> &str {
        &self.digest
    }

    /// `"{method} {path}"`.
    pub fn request_target(&self) -> &str {
        &self.request_target
    }

    /// The exact string covered by the signature.
    pub fn canonical_string(&self) -> String {
        format!(
            "(request-target): {}\nhost: {}\ndate: {}\ndigest: {}",
            self.request_target,
            self.host,
            self.date,
            self.digest
        )
    }
}
