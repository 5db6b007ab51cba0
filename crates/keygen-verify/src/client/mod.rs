//! Licensing API client.
//!
//! The client only moves bytes: it never interprets the status code or the
//! body, and never decides whether a response is trustworthy.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use serde::Serialize;
use tracing::debug;
use url::Url;

use crate::error::{VerifyError, VerifyResult};
use crate::response::SignedResponse;
use crate::types::ValidatorConfig;

mod http;

use http::HttpBackend;

/// Media type for request and response bodies.
pub const JSON_API_MEDIA_TYPE: &str = "application/vnd.api+json";

const USER_AGENT_VALUE: &str = concat!("keygen-verify/", env!("CARGO_PKG_VERSION"));

#[derive(Serialize)]
struct ValidateKeyRequest<'a> {
    meta: ValidateKeyMeta<'a>,
}

#[derive(Serialize)]
struct ValidateKeyMeta<'a> {
    key: &'a str,
}

/// Client for the licensing API.
#[derive(Debug, Clone)]
pub struct LicenseClient {
    http: HttpBackend,
    validate_url: Url,
}

impl LicenseClient {
    pub fn new(config: &ValidatorConfig) -> VerifyResult<Self> {
        let mut default_headers = HeaderMap::new();
        default_headers.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_VALUE));

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .default_headers(default_headers)
            .build()
            .map_err(|e| VerifyError::Network {
                message: format!("failed to create HTTP client: {}", e),
            })?;

        let base = Url::parse(&config.api_url).map_err(|e| VerifyError::Config {
            message: format!("invalid API URL {:?}: {}", config.api_url, e),
        })?;
        let validate_url = base
            .join(&config.validate_key_path())
            .map_err(|e| VerifyError::Config {
                message: format!("invalid account ID {:?}: {}", config.account_id, e),
            })?;

        Ok(Self {
            http: HttpBackend { client },
            validate_url,
        })
    }

    pub fn from_env() -> VerifyResult<Self> {
        Self::new(&ValidatorConfig::from_env())
    }

    /// Request validation of a license key.
    ///
    /// The returned response has not been verified.
    pub async fn validate_key(&self, license_key: &str) -> VerifyResult<SignedResponse> {
        let body = serde_json::to_vec(&ValidateKeyRequest {
            meta: ValidateKeyMeta { key: license_key },
        })
        .map_err(|e| VerifyError::InvalidResponse {
            message: format!("failed to encode request: {}", e),
        })?;

        debug!(url = %self.validate_url, "validating license key");

        self.http
            .send(reqwest::Method::POST, &self.validate_url, body)
            .await
    }

    /// URL used for key validation.
    pub fn validate_url(&self) -> &Url {
        &self.validate_url
    }
}
