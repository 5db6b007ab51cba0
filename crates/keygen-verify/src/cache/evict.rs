//! Cache eviction.

use std::io::ErrorKind;

use tokio::fs;
use tracing::debug;

use crate::error::{VerifyError, VerifyResult};

use super::ResponseCache;

pub(crate) async fn evict(cache: &ResponseCache, key: &str) -> VerifyResult<()> {
    let path = cache.record_path(key)?;

    match fs::remove_file(&path).await {
        Ok(()) => {
            debug!(key, "evicted from cache");
            Ok(())
        }
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) => Err(VerifyError::Cache {
            message: format!("failed to evict cache entry: {}", e),
        }),
    }
}

pub(crate) async fn clear(cache: &ResponseCache) -> VerifyResult<()> {
    if cache.cache_dir.exists() {
        fs::remove_dir_all(&cache.cache_dir)
            .await
            .map_err(|e| VerifyError::Cache {
                message: format!("failed to clear cache: {}", e),
            })?;
        debug!("cleared response cache");
    }
    Ok(())
}
