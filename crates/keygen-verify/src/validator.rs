//! License validation: cache lookup, network fallback, verification.
//!
//! Every failure is returned as a [`VerifyError`]; nothing unverified is ever
//! handed back to the caller. Deciding whether to exit the process is left to
//! the embedding binary.

use tracing::{debug, info, warn};

use crate::cache::ResponseCache;
use crate::client::LicenseClient;
use crate::error::{VerifyError, VerifyResult};
use crate::payload::VerifiedPayload;
use crate::types::{TamperPolicy, ValidatorConfig};
use crate::verify::ResponseVerifier;

/// Cache key for key validation results.
pub const VALIDATE_CACHE_KEY: &str = "validate";

/// Where a verified payload came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationSource {
    Cache,
    Network,
}

/// A verified validation result.
#[derive(Debug, Clone)]
pub struct Validation {
    pub payload: VerifiedPayload,
    pub source: ValidationSource,
}

/// License validator.
#[derive(Debug, Clone)]
pub struct LicenseValidator {
    client: LicenseClient,
    cache: ResponseCache,
    verifier: ResponseVerifier,
    no_cache: bool,
    tamper_policy: TamperPolicy,
}

impl LicenseValidator {
    /// Build a validator from configuration.
    ///
    /// Fails if the public key or API URL is malformed.
    pub fn new(config: ValidatorConfig) -> VerifyResult<Self> {
        let verifier = ResponseVerifier::from_hex(&config.public_key_hex, &config.signing_host)?;
        let client = LicenseClient::new(&config)?;
        let cache = match &config.cache_dir {
            Some(dir) => ResponseCache::with_dir(dir),
            None => ResponseCache::new()?,
        };
        Ok(Self::with_parts(client, cache, verifier, &config))
    }

    /// Build a validator from pre-constructed parts.
    pub fn with_parts(
        client: LicenseClient,
        cache: ResponseCache,
        verifier: ResponseVerifier,
        config: &ValidatorConfig,
    ) -> Self {
        Self {
            client,
            cache,
            verifier,
            no_cache: config.no_cache,
            tamper_policy: config.tamper_policy,
        }
    }

    pub fn cache(&self) -> &ResponseCache {
        &self.cache
    }

    pub fn verifier(&self) -> &ResponseVerifier {
        &self.verifier
    }

    /// Validate a license key.
    ///
    /// # Steps
    ///
    /// 1. Look up a cached result (re-verified on read)
    /// 2. On miss, request validation from the API
    /// 3. Verify the response signature
    /// 4. Reject responses carrying an `errors` list
    /// 5. Write the verified response through to the cache
    pub async fn validate(&self, license_key: &str) -> VerifyResult<Validation> {
        if !self.no_cache {
            if let Some(payload) = self.check_cache().await? {
                info!("using cached validation");
                return Ok(Validation {
                    payload,
                    source: ValidationSource::Cache,
                });
            }
        }

        let response = self.client.validate_key(license_key).await?;

        let payload = self.verifier.verify_response(&response).map_err(|e| {
            warn!(status = response.status(), error = %e, "invalid response signature");
            e
        })?;

        let errors = payload.errors();
        if !errors.is_empty() {
            warn!(status = response.status(), count = errors.len(), "API error");
            return Err(VerifyError::Api {
                status: response.status(),
                errors,
            });
        }

        if !self.no_cache {
            // Best effort: a failed write only costs a future network round trip.
            let written = match response.to_cache_record() {
                Ok(record) => self.cache.put(VALIDATE_CACHE_KEY, &record).await,
                Err(e) => Err(e),
            };
            if let Err(e) = written {
                warn!(error = %e, "failed to cache validation");
            }
        }

        Ok(Validation {
            payload,
            source: ValidationSource::Network,
        })
    }

    /// Look up and re-verify the cached validation without touching the network.
    ///
    /// Under [`TamperPolicy::Evict`], a tampered record is removed and reported
    /// as a miss.
    pub async fn check_cache(&self) -> VerifyResult<Option<VerifiedPayload>> {
        match self.cache.get(VALIDATE_CACHE_KEY, &self.verifier).await {
            Ok(found) => Ok(found),
            Err(e @ VerifyError::CacheTampered { .. }) => match self.tamper_policy {
                TamperPolicy::Fail => Err(e),
                TamperPolicy::Evict => {
                    warn!(error = %e, "evicting tampered cache record");
                    self.cache.evict(VALIDATE_CACHE_KEY).await?;
                    debug!("falling back to network");
                    Ok(None)
                }
            },
            Err(e) => Err(e),
        }
    }
}
