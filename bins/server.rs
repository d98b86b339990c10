use dotenvy::dotenv;
use tracing::{error, info};
use uuid::Uuid;

fn main() -> std::process::ExitCode {
    // .env first so RUST_LOG, DATABASE_URL and secrets are visible to the config loader
    dotenv().ok();

    let cfg = match configs::AppConfig::load_and_validate() {
        Ok(cfg) => cfg,
        Err(e) => {
            common::utils::logging::init_logging_default();
            error!(service = "studio", event = "config_invalid", error = %e, "failed to load configuration");
            return std::process::ExitCode::FAILURE;
        }
    };
    common::utils::logging::init_logging(&cfg.log.format);
    info!(service = "studio", event = "logger_init", format = %cfg.log.format, "tracing subscriber initialized");

    let service_id = Uuid::new_v4();
    let pid = std::process::id();
    let version = env!("CARGO_PKG_VERSION");

    std::panic::set_hook(Box::new({
        let service_id = service_id;
        move |info| {
            error!(
                service = "studio",
                event = "panic",
                %service_id,
                pid,
                message = %info,
                "unhandled panic occurred"
            );
        }
    }));

    let worker_threads = cfg.server.worker_threads;
    let mut builder = tokio::runtime::Builder::new_multi_thread();
    builder.enable_all();
    if let Some(w) = worker_threads {
        builder.worker_threads(w);
    }

    let rt = match builder.build() {
        Ok(rt) => rt,
        Err(e) => {
            error!(service = "studio", event = "runtime_build_failed", error = %e, "failed to build tokio runtime");
            return std::process::ExitCode::FAILURE;
        }
    };

    info!(
        service = "studio",
        event = "start",
        %service_id,
        pid,
        version,
        threads = worker_threads.unwrap_or_default(),
        "studio server starting"
    );

    // run() returns once the ctrl-c graceful shutdown has drained connections
    rt.block_on(async move {
        match server::run(cfg).await {
            Ok(()) => {
                info!(service = "studio", event = "stop", %service_id, pid, "server stopped normally");
                std::process::ExitCode::SUCCESS
            }
            Err(e) => {
                error!(service = "studio", event = "run_failed", error = %e, "server::run returned error");
                std::process::ExitCode::FAILURE
            }
        }
    })
}
