//! Content digest of response bodies (`Digest: sha-256=<base64>`).

use std::fmt;

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use sha2::{Digest, Sha256};

/// Algorithm label used in the `Digest` header.
pub const SHA256_LABEL: &str = "sha-256";

/// SHA-256 digest over exact body bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentDigest {
    value_base64: String,
}

impl ContentDigest {
    /// Hash the given bytes.
    ///
    /// Callers must pass the bytes as received on the wire. Re-encoding the body
    /// before hashing produces a digest the issuer never signed.
    pub fn of(bytes: &[u8]) -> Self {
        let hash = Sha256::digest(bytes);
        Self {
            value_base64: BASE64.encode(hash.as_slice()),
        }
    }

    /// Parse a `Digest` header value of the form `sha-256=<base64>`.
    ///
    /// Returns `None` for other algorithms or a malformed value.
    pub fn parse(header: &str) -> Option<Self> {
        let (label, value) = header.trim().split_once('=')?;
        if !label.eq_ignore_ascii_case(SHA256_LABEL) {
            return None;
        }
        let decoded = BASE64.decode(value).ok()?;
        if decoded.len() != 32 {
            return None;
        }
        Some(Self {
            value_base64: value.to_string(),
        })
    }

    pub fn algorithm(&self) -> &'static str {
        SHA256_LABEL
    }

    pub fn value_base64(&self) -> &str {
        &self.value_base64
    }
}

impl fmt::Display for ContentDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", SHA256_LABEL, self.value_base64)
    }
}
