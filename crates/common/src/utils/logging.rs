use std::io;
use tracing_subscriber::{fmt, EnvFilter};

fn env_filter_or(default_filter: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter))
}

/// Initialize tracing subscriber with compact, human readable output.
/// - Respects `RUST_LOG` if set
/// - Falls back to `default_filter` (e.g. `debug` for local runs)
/// - Writes to stdout to improve visibility in environments that hide stderr
pub fn init_logging_compact(default_filter: &str) {
    let _ = fmt()
        .with_env_filter(env_filter_or(default_filter))
        .with_target(false)
        .compact()
        .with_writer(io::stdout)
        .try_init();
}

/// Initialize tracing subscriber with JSON structured output.
/// - Respects `RUST_LOG` if set, otherwise uses `default_filter`
/// - Emits structured JSON logs for better machine parsing
/// - Writes to stdout for consistent container logging behavior
pub fn init_logging_json(default_filter: &str) {
    let _ = fmt()
        .with_env_filter(env_filter_or(default_filter))
        .with_target(false)
        .json()
        .with_current_span(true)
        .with_writer(io::stdout)
        .try_init();
}

/// Compact output at `info`, with request tracing from tower-http kept visible.
pub fn init_logging_default() {
    init_logging_compact("info,tower_http=info,axum=info");
}
