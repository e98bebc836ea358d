use tracing::{error, info};

/// Worker-thread count: config.toml first, then TOKIO_WORKER_THREADS.
fn worker_threads() -> Option<usize> {
    configs::AppConfig::load_and_validate()
        .ok()
        .and_then(|cfg| cfg.server.worker_threads)
        .or_else(|| std::env::var("TOKIO_WORKER_THREADS").ok().and_then(|v| v.parse().ok()))
}

fn main() -> std::process::ExitCode {
    // Load .env early so RUST_LOG and friends take effect.
    dotenvy::dotenv().ok();
    common::utils::logging::init_logging_default();

    // Panic hook so crashes end up in the structured log.
    std::panic::set_hook(Box::new(|info| {
        error!(message = %info, "unhandled panic occurred");
    }));

    let mut builder = tokio::runtime::Builder::new_multi_thread();
    builder.enable_all();
    if let Some(threads) = worker_threads() {
        builder.worker_threads(threads);
    }
    let rt = match builder.build() {
        Ok(rt) => rt,
        Err(e) => {
            error!(error = %e, "failed to build tokio runtime");
            return std::process::ExitCode::FAILURE;
        }
    };

    info!(version = env!("CARGO_PKG_VERSION"), "coffeestores server starting");

    rt.block_on(async {
        tokio::select! {
            res = server::run() => match res {
                Ok(()) => {
                    info!("server stopped normally");
                    std::process::ExitCode::SUCCESS
                }
                Err(e) => {
                    error!(error = %e, "server exited with error");
                    std::process::ExitCode::FAILURE
                }
            },
            _ = tokio::signal::ctrl_c() => {
                info!("received Ctrl+C, shutting down");
                std::process::ExitCode::SUCCESS
            }
        }
    })
}
