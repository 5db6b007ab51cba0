//! Cache key to path mapping.

use std::path::{Path, PathBuf};

use crate::error::{VerifyError, VerifyResult};

/// Keys become file names, so only `[A-Za-z0-9_-]` is accepted.
pub(crate) fn validate_key(key: &str) -> VerifyResult<()> {
    let ok = !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if ok {
        Ok(())
    } else {
        Err(VerifyError::Cache {
            message: format!("invalid cache key: {:?}", key),
        })
    }
}

pub(crate) fn record_path(cache_dir: &Path, key: &str) -> VerifyResult<PathBuf> {
    validate_key(key)?;
    Ok(cache_dir.join(format!("{}.json", key)))
}
