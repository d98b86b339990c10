//! Environment/runtime helpers
//!
//! Sanity checks to ensure expected directories exist at startup.

use tracing::warn;

/// Ensure expected directories exist; warn on missing optional ones.
///
/// The static site directory is optional (the API works without it); the
/// data directory is created when missing.
pub async fn ensure_env(frontend_dir: &str, data_dir: &str) -> anyhow::Result<()> {
    if tokio::fs::metadata(frontend_dir).await.is_err() {
        warn!(%frontend_dir, "site assets directory not found; static pages will 404");
    }
    tokio::fs::create_dir_all(data_dir)
        .await
        .map_err(|e| anyhow::anyhow!("cannot create {data_dir}: {e}"))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn creates_missing_data_dir() -> anyhow::Result<()> {
        let base = std::env::temp_dir().join(format!("studio_env_{}", std::process::id()));
        let data = base.join("data");
        let _ = tokio::fs::remove_dir_all(&base).await;

        ensure_env("/definitely/not/here", data.to_str().unwrap()).await?;
        assert!(tokio::fs::metadata(&data).await?.is_dir());

        let _ = tokio::fs::remove_dir_all(&base).await;
        Ok(())
    }
}
