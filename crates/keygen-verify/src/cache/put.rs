//! Cache write path.

use tokio::fs;
use tracing::info;

use crate::error::{VerifyError, VerifyResult};

use super::{io, CacheRecord, ResponseCache};

pub(crate) async fn put(cache: &ResponseCache, key: &str, record: &CacheRecord) -> VerifyResult<()> {
    let path = cache.record_path(key)?;

    fs::create_dir_all(&cache.cache_dir)
        .await
        .map_err(|e| VerifyError::Cache {
            message: format!("failed to create cache directory: {}", e),
        })?;

    let json = serde_json::to_string(record).map_err(|e| VerifyError::Cache {
        message: format!("failed to serialize cache record: {}", e),
    })?;
    io::write_atomic(&path, &json).await?;

    info!(key, "cache write");
    Ok(())
}
