//! Response signature verification (Ed25519 over the signing string).
//!
//! Live responses and cached records go through the same pipeline:
//!
//! 1. Hash the exact body bytes (`sha-256=<base64>`)
//! 2. Build the signing string from target, host, date and digest
//! 3. Verify the Ed25519 signature against the pinned public key
//! 4. Only then parse the body into a [`VerifiedPayload`]

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use ed25519_dalek::{Signature, Verifier, VerifyingKey};
use tracing::debug;

use crate::cache::CacheRecord;
use crate::canonical::SigningComponents;
use crate::digest::ContentDigest;
use crate::error::{VerifyError, VerifyResult};
use crate::payload::VerifiedPayload;
use crate::response::SignedResponse;

/// Verifier bound to a single trust anchor.
///
/// The key and host are fixed at construction; there is no rotation path.
#[derive(Debug, Clone)]
pub struct ResponseVerifier {
    key: VerifyingKey,
    host: String,
}

impl ResponseVerifier {
    pub fn new(key: VerifyingKey, host: impl Into<String>) -> Self {
        Self {
            key,
            host: host.into(),
        }
    }

    /// Create a verifier from a hex-encoded 32-byte Ed25519 public key.
    pub fn from_hex(public_key_hex: &str, host: impl Into<String>) -> VerifyResult<Self> {
        let bytes = hex::decode(public_key_hex.trim()).map_err(|e| VerifyError::Config {
            message: format!("invalid public key hex: {}", e),
        })?;
        let bytes: [u8; 32] = bytes.try_into().map_err(|b: Vec<u8>| VerifyError::Config {
            message: format!("public key must be 32 bytes, got {}", b.len()),
        })?;
        let key = VerifyingKey::from_bytes(&bytes).map_err(|e| VerifyError::Config {
            message: format!("invalid Ed25519 public key: {}", e),
        })?;
        Ok(Self::new(key, host))
    }

    /// Host component of the signing string.
    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn verifying_key(&self) -> &VerifyingKey {
        &self.key
    }

    /// Verify a base64 signature over the signing string.
    ///
    /// Malformed base64 or signature bytes count as an invalid signature.
    pub fn verify(&self, components: &SigningComponents, signature_b64: &str) -> bool {
        let Ok(bytes) = BASE64.decode(signature_b64) else {
            debug!("signature is not valid base64");
            return false;
        };
        let Ok(signature) = Signature::from_slice(&bytes) else {
            debug!(len = bytes.len(), "signature has wrong length");
            return false;
        };
        self.key
            .verify(components.canonical_string().as_bytes(), &signature)
            .is_ok()
    }

    /// Verify a live response and parse its payload.
    pub fn verify_response(&self, response: &SignedResponse) -> VerifyResult<VerifiedPayload> {
        let computed = response.digest();

        if let Some(claimed) = response.digest_header() {
            let matches = ContentDigest::parse(claimed).is_some_and(|d| d == computed);
            if !matches {
                return Err(VerifyError::DigestMismatch {
                    expected: claimed.to_string(),
                    actual: computed.to_string(),
                });
            }
        }

        let components = response.signing_components(&self.host);
        self.check(&components, response.signature().signature())?;
        VerifiedPayload::from_slice(response.body())
    }

    /// Re-verify a persisted record and parse its payload.
    ///
    /// The digest is recomputed from the stored body; nothing in the record is
    /// trusted on its own.
    pub fn verify_record(&self, record: &CacheRecord) -> VerifyResult<VerifiedPayload> {
        let components = record.signing_components(&self.host);
        self.check(&components, &record.signature)?;
        VerifiedPayload::from_slice(record.body.as_bytes())
    }

    fn check(&self, components: &SigningComponents, signature_b64: &str) -> VerifyResult<()> {
        if self.verify(components, signature_b64) {
            Ok(())
        } else {
            Err(VerifyError::SignatureInvalid {
                reason: format!(
                    "ed25519 verification failed for {}",
                    components.request_target()
                ),
            })
        }
    }
}
