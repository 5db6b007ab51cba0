//! CLI command: keygen-verify cache
//!
//! Offline operations on the local response cache. `check` re-verifies the
//! cached validation exactly as `validate` would, without contacting the API.

use keygen_verify::{LicenseValidator, ResponseCache, VALIDATE_CACHE_KEY};

use super::print_payload;
use crate::cli::args::{CacheCheckArgs, CacheEvictArgs, ConfigArgs, ConfigOnlyArgs};
use crate::exit_codes::EXIT_SUCCESS;

pub async fn cmd_check(args: CacheCheckArgs) -> anyhow::Result<i32> {
    let validator = LicenseValidator::new(args.config.to_config())?;

    match validator.check_cache().await? {
        Some(payload) => {
            println!("Cache verified: key={}", VALIDATE_CACHE_KEY);
            print_payload(&payload, args.json)?;
        }
        None => println!("Cache miss: key={}", VALIDATE_CACHE_KEY),
    }
    Ok(EXIT_SUCCESS)
}

pub async fn cmd_list(args: ConfigOnlyArgs) -> anyhow::Result<i32> {
    let cache = open_cache(&args.config)?;
    for key in cache.list().await? {
        println!("{}", key);
    }
    Ok(EXIT_SUCCESS)
}

pub async fn cmd_evict(args: CacheEvictArgs) -> anyhow::Result<i32> {
    let cache = open_cache(&args.config)?;
    cache.evict(&args.key).await?;
    println!("Evicted: key={}", args.key);
    Ok(EXIT_SUCCESS)
}

pub async fn cmd_clear(args: ConfigOnlyArgs) -> anyhow::Result<i32> {
    let cache = open_cache(&args.config)?;
    cache.clear().await?;
    println!("Cleared {}", cache.cache_dir().display());
    Ok(EXIT_SUCCESS)
}

fn open_cache(args: &ConfigArgs) -> anyhow::Result<ResponseCache> {
    let config = args.to_config();
    let cache = match config.cache_dir {
        Some(dir) => ResponseCache::with_dir(dir),
        None => ResponseCache::new()?,
    };
    Ok(cache)
}
