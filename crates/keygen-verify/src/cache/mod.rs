//! Local response cache with verification on read.
//!
//! Records are written only after the originating response passed
//! verification, and are re-verified against the same trust anchor on every
//! read. Existence on disk grants no trust.
//!
//! # Cache Structure
//!
//! ```text
//! ~/.cache/keygen-verify/
//!   validate.json    # {"date": ..., "target": ..., "signature": ..., "body": ...}
//! ```
//!
//! There is no locking; the cache assumes a single process.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::canonical::SigningComponents;
use crate::digest::ContentDigest;
use crate::error::VerifyResult;
use crate::payload::VerifiedPayload;
use crate::verify::ResponseVerifier;

mod evict;
mod io;
mod keys;
mod put;
mod read;

/// Persisted form of a verified response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheRecord {
    /// `Date` header of the original response.
    pub date: String,

    /// `"{method} {path}"` of the original request.
    pub target: String,

    /// Base64 Ed25519 signature from the original response.
    pub signature: String,

    /// Response body text.
    pub body: String,
}

impl CacheRecord {
    /// Signing components recomputed from the stored fields.
    pub fn signing_components(&self, host: &str) -> SigningComponents {
        SigningComponents::from_target(
            &self.target,
            host,
            self.date.as_str(),
            &ContentDigest::of(self.body.as_bytes()),
        )
    }
}

/// Response cache keyed by operation name.
#[derive(Debug, Clone)]
pub struct ResponseCache {
    cache_dir: PathBuf,
}

impl ResponseCache {
    /// Create a cache in the default location.
    pub fn new() -> VerifyResult<Self> {
        let cache_dir = io::default_cache_dir()?;
        Ok(Self { cache_dir })
    }

    pub fn with_dir(cache_dir: impl Into<PathBuf>) -> Self {
        Self {
            cache_dir: cache_dir.into(),
        }
    }

    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    /// Path of the record file for `key`.
    pub fn record_path(&self, key: &str) -> VerifyResult<PathBuf> {
        keys::record_path(&self.cache_dir, key)
    }

    /// Get a cached payload, verifying integrity on read.
    ///
    /// Returns `None` if the record is missing or unparseable.
    /// Returns `Err(CacheTampered)` if the record fails verification.
    pub async fn get(
        &self,
        key: &str,
        verifier: &ResponseVerifier,
    ) -> VerifyResult<Option<VerifiedPayload>> {
        read::get(self, key, verifier).await
    }

    /// Overwrite the record for `key`. Performs no verification.
    pub async fn put(&self, key: &str, record: &CacheRecord) -> VerifyResult<()> {
        put::put(self, key, record).await
    }

    /// Remove the record for `key`, if any.
    pub async fn evict(&self, key: &str) -> VerifyResult<()> {
        evict::evict(self, key).await
    }

    /// Remove every record.
    pub async fn clear(&self) -> VerifyResult<()> {
        evict::clear(self).await
    }

    /// Keys with a record on disk, sorted.
    pub async fn list(&self) -> VerifyResult<Vec<String>> {
        read::list(self).await
    }
}
