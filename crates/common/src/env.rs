//! Environment/runtime helpers
//!
//! Sanity checks to ensure the storage location is usable at startup.

use std::path::Path;

use tracing::{debug, info};

/// Returns the file path a `sqlite://` URL points at, or `None` for other
/// backends and for in-memory databases.
pub fn sqlite_file_path(url: &str) -> Option<&str> {
    let rest = url
        .strip_prefix("sqlite://")
        .or_else(|| url.strip_prefix("sqlite:"))?;
    let path = rest.split('?').next().unwrap_or(rest);
    if path.is_empty() || path == ":memory:" {
        return None;
    }
    Some(path)
}

/// Ensure the parent directory of a file-backed sqlite database exists.
pub async fn ensure_storage_dir(url: &str) -> anyhow::Result<()> {
    let Some(path) = sqlite_file_path(url) else {
        debug!("storage is not file-backed sqlite; nothing to prepare");
        return Ok(());
    };
    let Some(parent) = Path::new(path).parent().filter(|p| !p.as_os_str().is_empty()) else {
        return Ok(());
    };
    tokio::fs::create_dir_all(parent)
        .await
        .map_err(|e| anyhow::anyhow!("cannot create {}: {e}", parent.display()))?;
    info!(dir = %parent.display(), "storage directory ready");
    Ok(())
}
