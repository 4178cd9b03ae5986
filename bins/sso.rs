use std::process::ExitCode;

use clap::Parser;
use configs::AppConfig;
use dotenvy::dotenv;
use tracing::{error, info};
use uuid::Uuid;

/// SSO identity server: login, registration and admin checks over HTTP.
#[derive(Debug, Parser)]
#[command(name = "sso", version, about)]
struct Cli {
    /// Path to the TOML config file (falls back to env CONFIG, then config.toml)
    #[arg(long, env = "CONFIG_PATH")]
    config: Option<String>,
}

const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// Flag or `CONFIG_PATH` first, then the older `CONFIG` variable, then the default.
fn resolve_config_path(explicit: Option<String>, legacy: Option<String>) -> String {
    let set = |p: &String| !p.trim().is_empty();
    explicit
        .filter(set)
        .or(legacy.filter(set))
        .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string())
}

fn init_logging(cfg: &AppConfig) {
    let filter = cfg.env.default_log_filter();
    if cfg.env.json_logs() {
        common::utils::logging::init_logging_json(filter);
    } else {
        common::utils::logging::init_logging_compact(filter);
    }
    info!(service = "sso", event = "logger_init", env = ?cfg.env, "tracing subscriber initialized");
}

fn main() -> ExitCode {
    // load .env before clap reads CONFIG_PATH
    dotenv().ok();
    let cli = Cli::parse();
    let config_path = resolve_config_path(cli.config, std::env::var("CONFIG").ok());

    let cfg = match AppConfig::load_and_validate(&config_path) {
        Ok(cfg) => cfg,
        Err(e) => {
            common::utils::logging::init_logging_default();
            error!(service = "sso", event = "config_invalid", path = %config_path, error = %e, "failed to load config");
            return ExitCode::FAILURE;
        }
    };
    init_logging(&cfg);

    let service_id = Uuid::new_v4();
    let pid = std::process::id();
    let version = env!("CARGO_PKG_VERSION");

    std::panic::set_hook(Box::new(move |info| {
        error!(
            service = "sso",
            event = "panic",
            %service_id,
            pid,
            message = %info,
            "unhandled panic occurred"
        );
    }));

    let mut builder = tokio::runtime::Builder::new_multi_thread();
    builder.enable_all();
    if let Some(w) = cfg.server.worker_threads {
        builder.worker_threads(w);
    }
    let rt = match builder.build() {
        Ok(rt) => rt,
        Err(e) => {
            error!(service = "sso", event = "runtime_build_failed", error = %e, "failed to build tokio runtime");
            return ExitCode::FAILURE;
        }
    };

    info!(
        service = "sso",
        event = "start",
        %service_id,
        pid,
        version,
        threads = cfg.server.worker_threads.unwrap_or_default(),
        port = cfg.server.port,
        "sso service starting"
    );

    // server::run returns after a shutdown signal once in-flight requests drain
    match rt.block_on(server::run(cfg)) {
        Ok(()) => {
            info!(service = "sso", event = "stop", %service_id, pid, "sso stopped normally");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(service = "sso", event = "run_failed", error = ?e, "server::run returned error");
            ExitCode::FAILURE
        }
    }
}
