//! Signed license validation with a tamper-evident local cache.
//!
//! Every response from the licensing API is signed by the issuer with Ed25519
//! over a signing string built from the request target, host, `Date` header
//! and a SHA-256 digest of the body. This crate provides:
//!
//! - Body digests and signing string construction
//! - Signature verification against a pinned public key
//! - A local cache whose records are re-verified on every read
//! - A validator that ties cache, network and verification together
//!
//! # Quick Start
//!
//! ```no_run
//! use keygen_verify::{LicenseValidator, ValidatorConfig};
//!
//! # async fn example() -> Result<(), keygen_verify::VerifyError> {
//! let validator = LicenseValidator::new(ValidatorConfig::from_env())?;
//! let validation = validator.validate("C1B6DE-39A6E3-DE1529-8559A0-4AF593-V3").await?;
//! if let Some(meta) = validation.payload.meta() {
//!     println!("valid: {}", meta.valid);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration
//!
//! | Environment Variable | Description |
//! |---------------------|-------------|
//! | `KEYGEN_API_URL` | API base URL (default: `https://api.keygen.sh`) |
//! | `KEYGEN_ACCOUNT_ID` | Account ID used in request paths |
//! | `KEYGEN_PUBLIC_KEY` | Hex Ed25519 public key of the issuer |
//! | `KEYGEN_HOST` | Host component of the signing string (default: `api.keygen.sh`) |
//! | `KEYGEN_CACHE_DIR` | Cache directory |
//! | `KEYGEN_TIMEOUT` | Request timeout in seconds (default: 30) |
//! | `KEYGEN_NO_CACHE` | Disable the cache |
//! | `KEYGEN_TAMPER_POLICY` | `fail` (default) or `evict` |

pub mod cache;
pub mod canonical;
pub mod client;
pub mod digest;
pub mod error;
pub mod payload;
pub mod response;
pub mod signature;
pub mod types;
pub mod validator;
pub mod verify;

pub use cache::{CacheRecord, ResponseCache};
pub use canonical::SigningComponents;
pub use client::LicenseClient;
pub use digest::ContentDigest;
pub use error::{VerifyError, VerifyResult};
pub use payload::{ApiErrorObject, ValidationMeta, VerifiedPayload};
pub use response::SignedResponse;
pub use signature::SignatureEnvelope;
pub use types::{TamperPolicy, ValidatorConfig};
pub use validator::{LicenseValidator, Validation, ValidationSource, VALIDATE_CACHE_KEY};
pub use verify::ResponseVerifier;
