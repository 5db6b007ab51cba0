use clap::{Args, Parser, Subcommand};
use keygen_verify::{TamperPolicy, ValidatorConfig};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "keygen-verify",
    version,
    about = "Validate license keys against a signed licensing API, with a tamper-evident local cache"
)]
pub struct Cli {
    #[command(subcommand)]
    pub cmd: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Validate a license key (cached result first, then the API)
    Validate(ValidateArgs),
    /// Inspect or manage the local response cache
    Cache(CacheArgs),
}

/// Overrides applied on top of `KEYGEN_*` environment configuration.
#[derive(Args, Debug, Clone, Default)]
pub struct ConfigArgs {
    /// Cache directory
    #[arg(long)]
    pub cache_dir: Option<PathBuf>,

    /// API base URL
    #[arg(long)]
    pub api_url: Option<String>,

    /// Account ID
    #[arg(long)]
    pub account: Option<String>,

    /// Hex-encoded Ed25519 public key of the issuer
    #[arg(long)]
    pub public_key: Option<String>,

    /// Host component of the signing string
    #[arg(long)]
    pub signing_host: Option<String>,

    /// What to do with a cached record that fails verification: fail or evict
    #[arg(long)]
    pub tamper_policy: Option<TamperPolicy>,
}

impl ConfigArgs {
    pub fn to_config(&self) -> ValidatorConfig {
        let mut config = ValidatorConfig::from_env();
        if let Some(dir) = &self.cache_dir {
            config = config.with_cache_dir(dir);
        }
        if let Some(url) = &self.api_url {
            config = config.with_api_url(url);
        }
        if let Some(account) = &self.account {
            config = config.with_account_id(account);
        }
        if let Some(key) = &self.public_key {
            config = config.with_public_key_hex(key);
        }
        if let Some(host) = &self.signing_host {
            config = config.with_signing_host(host);
        }
        if let Some(policy) = self.tamper_policy {
            config = config.with_tamper_policy(policy);
        }
        config
    }
}

#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// License key to validate
    #[arg(long, env = "KEYGEN_LICENSE_KEY", hide_env_values = true)]
    pub key: String,

    /// Skip the cache entirely (no lookup, no write)
    #[arg(long)]
    pub no_cache: bool,

    /// Print the verified payload as JSON
    #[arg(long)]
    pub json: bool,

    #[command(flatten)]
    pub config: ConfigArgs,
}

#[derive(Args, Debug)]
pub struct CacheArgs {
    #[command(subcommand)]
    pub cmd: CacheSub,
}

#[derive(Subcommand, Debug)]
pub enum CacheSub {
    /// Re-verify the cached validation without contacting the API
    Check(CacheCheckArgs),
    /// List cached keys
    List(ConfigOnlyArgs),
    /// Remove one cached record
    Evict(CacheEvictArgs),
    /// Remove every cached record
    Clear(ConfigOnlyArgs),
}

#[derive(Args, Debug)]
pub struct CacheCheckArgs {
    /// Print the verified payload as JSON
    #[arg(long)]
    pub json: bool,

    #[command(flatten)]
    pub config: ConfigArgs,
}

#[derive(Args, Debug)]
pub struct CacheEvictArgs {
    /// Cache key, e.g. "validate"
    pub key: String,

    #[command(flatten)]
    pub config: ConfigArgs,
}

#[derive(Args, Debug)]
pub struct ConfigOnlyArgs {
    #[command(flatten)]
    pub config: ConfigArgs,
}
