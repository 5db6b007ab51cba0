//! `Keygen-Signature` header parsing.
//!
//! Header format: comma-separated `name="value"` pairs, e.g.
//!
//! ```text
//! keyid="1fddcec8-...", algorithm="ed25519", signature="<base64>", headers="(request-target) host date digest"
//! ```

use std::collections::BTreeMap;

use crate::error::{VerifyError, VerifyResult};

/// Name of the response header carrying the signature.
pub const SIGNATURE_HEADER: &str = "keygen-signature";

/// Parsed signature header.
///
/// Only `signature` is used for verification; the remaining parameters are
/// kept for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureEnvelope {
    params: BTreeMap<String, String>,
}

impl SignatureEnvelope {
    /// Parse a signature header value.
    ///
    /// Fails on a parameter without `=` or when no `signature` parameter is
    /// present.
    pub fn parse(header: &str) -> VerifyResult<Self> {
        let mut params = BTreeMap::new();

        for part in header.split(',') {
            let (name, value) =
                part.split_once('=')
                    .ok_or_else(|| VerifyError::SignatureInvalid {
                        reason: format!("malformed signature parameter: {:?}", part.trim()),
                    })?;
            let name = name.trim_start_matches(' ');
            let value = value.trim().trim_matches('"');
            params.insert(name.to_string(), value.to_string());
        }

        if !params.contains_key("signature") {
            return Err(VerifyError::SignatureInvalid {
                reason: "signature header has no signature parameter".to_string(),
            });
        }

        Ok(Self { params })
    }

    /// Wrap a bare base64 signature (as persisted in the cache).
    pub fn from_signature(signature_b64: impl Into<String>) -> Self {
        let mut params = BTreeMap::new();
        params.insert("signature".to_string(), signature_b64.into());
        Self { params }
    }

    /// Base64-encoded signature.
    pub fn signature(&self) -> &str {
        self.params
            .get("signature")
            .map(String::as_str)
            .unwrap_or_default()
    }

    pub fn key_id(&self) -> Option<&str> {
        self.params.get("keyid").map(String::as_str)
    }

    pub fn algorithm(&self) -> Option<&str> {
        self.params.get("algorithm").map(String::as_str)
    }

    /// Signed header list, if the issuer sent one.
    pub fn headers(&self) -> Option<&str> {
        self.params.get("headers").map(String::as_str)
    }

    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }
}
