//! Filesystem helpers for the cache.

use std::path::{Path, PathBuf};

use tokio::fs;

use crate::error::{VerifyError, VerifyResult};

pub(crate) fn default_cache_dir() -> VerifyResult<PathBuf> {
    let base = dirs::cache_dir()
        .or_else(dirs::home_dir)
        .ok_or_else(|| VerifyError::Cache {
            message: "could not determine cache directory".to_string(),
        })?;

    Ok(base.join("keygen-verify"))
}

pub(crate) async fn write_atomic(path: &Path, content: &str) -> VerifyResult<()> {
    let temp_path = path.with_extension("tmp");

    fs::write(&temp_path, content)
        .await
        .map_err(|e| VerifyError::Cache {
            message: format!("failed to write temp file: {}", e),
        })?;

    fs::rename(&temp_path, path)
        .await
        .map_err(|e| VerifyError::Cache {
            message: format!("failed to rename temp file: {}", e),
        })?;

    Ok(())
}
