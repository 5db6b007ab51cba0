//! Cache read path.

use std::io::ErrorKind;

use tokio::fs;
use tracing::{info, warn};

use crate::error::{VerifyError, VerifyResult};
use crate::payload::VerifiedPayload;
use crate::verify::ResponseVerifier;

use super::{keys, CacheRecord, ResponseCache};

pub(crate) async fn get(
    cache: &ResponseCache,
    key: &str,
    verifier: &ResponseVerifier,
) -> VerifyResult<Option<VerifiedPayload>> {
    let path = cache.record_path(key)?;

    let text = match fs::read_to_string(&path).await {
        Ok(text) => text,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            info!(key, "cache miss");
            return Ok(None);
        }
        Err(e) => {
            warn!(key, error = %e, "cache invalid: unreadable record");
            return Ok(None);
        }
    };

    let record: CacheRecord = match serde_json::from_str(&text) {
        Ok(record) => record,
        Err(e) => {
            warn!(key, error = %e, "cache invalid: unparseable record");
            return Ok(None);
        }
    };

    info!(key, "cache hit");

    match verifier.verify_record(&record) {
        Ok(payload) => Ok(Some(payload)),
        Err(e) => {
            warn!(key, error = %e, "cache integrity check failed");
            Err(VerifyError::CacheTampered {
                key: key.to_string(),
                reason: e.to_string(),
            })
        }
    }
}

pub(crate) async fn list(cache: &ResponseCache) -> VerifyResult<Vec<String>> {
    let mut result = Vec::new();

    if !cache.cache_dir.exists() {
        return Ok(result);
    }

    let mut entries = fs::read_dir(&cache.cache_dir)
        .await
        .map_err(|e| VerifyError::Cache {
            message: format!("failed to read cache directory: {}", e),
        })?;

    while let Some(entry) = entries.next_entry().await.map_err(|e| VerifyError::Cache {
        message: format!("failed to read directory entry: {}", e),
    })? {
        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) != Some("json") {
            continue;
        }
        let Some(key) = path.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };
        if keys::validate_key(key).is_ok() {
            result.push(key.to_string());
        }
    }

    result.sort();
    Ok(result)
}
