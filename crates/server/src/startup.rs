use std::net::SocketAddr;

use axum::Router;
use configs::AppConfig;
use migration::MigratorTrait;
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::errors::StartupError;
use crate::routes::{self, auth};
use service::{runtime, AppServices, Integrations, Repositories};

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

fn bind_addr(cfg: &AppConfig) -> Result<SocketAddr, StartupError> {
    format!("{}:{}", cfg.server.host, cfg.server.port)
        .parse()
        .map_err(|e| StartupError::InvalidConfig(format!("server address: {e}")))
}

/// Application router on top of the given repositories and integrations.
/// Tests call this with in-memory repositories and mock providers.
pub fn build_app(cfg: &AppConfig, repos: Repositories, integrations: Integrations) -> Router {
    let services = AppServices::build(repos, integrations, cfg);
    let state = auth::ServerState {
        services,
        auth: auth::ServerAuthConfig { jwt_secret: cfg.auth.jwt_secret.clone() },
    };
    routes::build_router(state, build_cors(), &cfg.site.frontend_dir)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
    }
    info!(service = "studio", event = "shutdown", "shutdown signal received");
}

/// Public entry: connect, migrate, build the app and serve until ctrl-c.
/// Logging must already be initialised by the caller.
pub async fn run(cfg: AppConfig) -> anyhow::Result<()> {
    runtime::prepare_site_dirs(&cfg.site)
        .await
        .map_err(|e| StartupError::Runtime(e.to_string()))?;

    let db = models::db::connect_with_config(&cfg.database).await?;
    if cfg.database.auto_migrate {
        migration::Migrator::up(&db, None).await?;
        info!(service = "studio", event = "migrated", "database migrations applied");
    }

    let integrations = Integrations::from_config(&cfg)?;
    let app = build_app(&cfg, Repositories::seaorm(&db), integrations);

    let addr = bind_addr(&cfg)?;
    info!(%addr, service = "studio", event = "listening", "starting server");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>())
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}
