use std::io;
use tracing_subscriber::{fmt, EnvFilter};

/// Initialize tracing subscriber with sensible defaults and stdout writer.
/// - Respects `RUST_LOG` if set
/// - Falls back to `info,tower_http=info,axum=info`
/// - Writes to stdout to improve visibility in environments that hide stderr
pub fn init_logging_default() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,tower_http=info,axum=info"));
    let _ = fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .with_writer(io::stdout)
        .try_init();
}

/// Initialize tracing subscriber with JSON structured output.
/// - Respects `RUST_LOG` if set, defaults to `info,sea_orm=warn`
/// - Emits structured JSON logs for log shippers
pub fn init_logging_json() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,sea_orm=warn"));
    let _ = fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .json()
        .with_writer(io::stdout)
        .try_init();
}

/// Pick the subscriber by name (`json` or anything else for compact).
pub fn init_logging(format: &str) {
    if format.eq_ignore_ascii_case("json") {
        init_logging_json();
    } else {
        init_logging_default();
    }
}
