//! Startup checks for the directories the site configuration points at.

use configs::SiteConfig;
use tracing::info;

/// Static assets directory may be absent; the data directory is created.
pub async fn prepare_site_dirs(site: &SiteConfig) -> anyhow::Result<()> {
    common::env::ensure_env(&site.frontend_dir, &site.data_dir).await?;
    info!(frontend_dir = %site.frontend_dir, data_dir = %site.data_dir, "site directories ready");
    Ok(())
}
