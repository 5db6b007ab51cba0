//! CLI command: keygen-verify validate
//!
//! Usage:
//!   keygen-verify validate --key <LICENSE-KEY> [--no-cache] [--json]
//!
//! Exits 0 whenever a verified answer was obtained, whether or not the
//! license is valid. Any verification failure exits non-zero.

use keygen_verify::{LicenseValidator, ValidationSource};
use tracing::info;

use super::print_payload;
use crate::cli::args::ValidateArgs;
use crate::exit_codes::EXIT_SUCCESS;

pub async fn run(args: ValidateArgs) -> anyhow::Result<i32> {
    let mut config = args.config.to_config();
    if args.no_cache {
        config = config.with_no_cache(true);
    }
    let validator = LicenseValidator::new(config)?;

    let validation = validator.validate(&args.key).await?;
    let source = match validation.source {
        ValidationSource::Cache => "cache",
        ValidationSource::Network => "network",
    };
    info!(source, "license validation verified");

    print_payload(&validation.payload, args.json)?;
    Ok(EXIT_SUCCESS)
}
