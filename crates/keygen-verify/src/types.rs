//! Validator configuration.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::warn;

/// Ed25519 public key of the issuer (hex, 32 bytes).
pub const DEFAULT_PUBLIC_KEY_HEX: &str =
    "e8601e48b69383ba520245fd07971e983d06d22c4257cfd82304601479cee788";

/// Account the license keys belong to.
pub const DEFAULT_ACCOUNT_ID: &str = "1fddcec8-8dd3-4d8d-9b16-215cac0f9b52";

/// Host component of the signing string.
pub const DEFAULT_SIGNING_HOST: &str = "api.keygen.sh";

const DEFAULT_API_URL: &str = "https://api.keygen.sh";

/// What to do when a cached record fails verification.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TamperPolicy {
    /// Abort validation with `CacheTampered`.
    #[default]
    Fail,

    /// Evict the record and validate over the network.
    Evict,
}

impl FromStr for TamperPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fail" => Ok(Self::Fail),
            "evict" => Ok(Self::Evict),
            other => Err(format!(
                "unknown tamper policy {:?} (expected \"fail\" or \"evict\")",
                other
            )),
        }
    }
}

impl fmt::Display for TamperPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fail => f.write_str("fail"),
            Self::Evict => f.write_str("evict"),
        }
    }
}

/// Validator configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidatorConfig {
    /// Base URL of the licensing API.
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Account ID used in the request path.
    #[serde(default = "default_account_id")]
    pub account_id: String,

    /// Hex-encoded Ed25519 public key responses must be signed with.
    #[serde(default = "default_public_key_hex")]
    pub public_key_hex: String,

    /// Host component of the signing string.
    #[serde(default = "default_signing_host")]
    pub signing_host: String,

    /// Cache directory (platform default when unset).
    #[serde(default)]
    pub cache_dir: Option<PathBuf>,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Skip cache lookup and write-through.
    #[serde(default)]
    pub no_cache: bool,

    /// Handling of cached records that fail verification.
    #[serde(default)]
    pub tamper_policy: TamperPolicy,
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_account_id() -> String {
    DEFAULT_ACCOUNT_ID.to_string()
}

fn default_public_key_hex() -> String {
    DEFAULT_PUBLIC_KEY_HEX.to_string()
}

fn default_signing_host() -> String {
    DEFAULT_SIGNING_HOST.to_string()
}

fn default_timeout() -> u64 {
    30
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            account_id: default_account_id(),
            public_key_hex: default_public_key_hex(),
            signing_host: default_signing_host(),
            cache_dir: None,
            timeout_secs: default_timeout(),
            no_cache: false,
            tamper_policy: TamperPolicy::default(),
        }
    }
}

/// Parse an environment value, logging and ignoring one that does not parse.
fn parse_env<T: FromStr>(name: &str, value: Option<String>) -> Option<T> {
    let value = value?;
    match value.parse() {
        Ok(parsed) => Some(parsed),
        Err(_) => {
            warn!(
                variable = name,
                value = %value,
                "ignoring unparseable environment value, using default"
            );
            None
        }
    }
}

/// Normalise the accepted spellings of a boolean flag to `true`/`false`.
fn parse_flag(value: String) -> String {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" => "true".to_string(),
        "0" | "false" | "no" => "false".to_string(),
        _ => value,
    }
}

impl ValidatorConfig {
    /// Create config from environment variables.
    ///
    /// | Variable | Description |
    /// |----------|-------------|
    /// | `KEYGEN_API_URL` | API base URL |
    /// | `KEYGEN_ACCOUNT_ID` | Account ID |
    /// | `KEYGEN_PUBLIC_KEY` | Hex Ed25519 public key |
    /// | `KEYGEN_HOST` | Signing host |
    /// | `KEYGEN_CACHE_DIR` | Cache directory |
    /// | `KEYGEN_TIMEOUT` | Request timeout in seconds |
    /// | `KEYGEN_NO_CACHE` | Disable the cache (`1`/`true`) |
    /// | `KEYGEN_TAMPER_POLICY` | `fail` or `evict` |
    pub fn from_env() -> Self {
        let var = |name: &str| std::env::var(name).ok().filter(|v| !v.is_empty());

        Self {
            api_url: var("KEYGEN_API_URL").unwrap_or_else(default_api_url),
            account_id: var("KEYGEN_ACCOUNT_ID").unwrap_or_else(default_account_id),
            public_key_hex: var("KEYGEN_PUBLIC_KEY").unwrap_or_else(default_public_key_hex),
            signing_host: var("KEYGEN_HOST").unwrap_or_else(default_signing_host),
            cache_dir: var("KEYGEN_CACHE_DIR").map(PathBuf::from),
            timeout_secs: parse_env("KEYGEN_TIMEOUT", var("KEYGEN_TIMEOUT"))
                .unwrap_or_else(default_timeout),
            no_cache: parse_env("KEYGEN_NO_CACHE", var("KEYGEN_NO_CACHE").map(parse_flag))
                .unwrap_or(false),
            tamper_policy: parse_env("KEYGEN_TAMPER_POLICY", var("KEYGEN_TAMPER_POLICY"))
                .unwrap_or_default(),
        }
    }

    pub fn with_api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = url.into();
        self
    }

    pub fn with_account_id(mut self, account_id: impl Into<String>) -> Self {
        self.account_id = account_id.into();
        self
    }

    pub fn with_public_key_hex(mut self, key: impl Into<String>) -> Self {
        self.public_key_hex = key.into();
        self
    }

    pub fn with_signing_host(mut self, host: impl Into<String>) -> Self {
        self.signing_host = host.into();
        self
    }

    pub fn with_cache_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cache_dir = Some(dir.into());
        self
    }

    pub fn with_no_cache(mut self, no_cache: bool) -> Self {
        self.no_cache = no_cache;
        self
    }

    pub fn with_tamper_policy(mut self, policy: TamperPolicy) -> Self {
        self.tamper_policy = policy;
        self
    }

    /// Request path for key validation.
    pub fn validate_key_path(&self) -> String {
        format!(
            "/v1/accounts/{}/licenses/actions/validate-key",
            self.account_id
        )
    }
}
