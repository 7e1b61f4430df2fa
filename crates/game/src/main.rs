mod app;

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

fn main() {
    init_tracing();
    info!("=== Islet Startup ===");

    let config = match app::resolve_run_config() {
        Ok(config) => config,
        Err(message) => {
            error!(error = %message, "startup_failed");
            std::process::exit(1);
        }
    };

    if let Err(message) = app::run(config) {
        error!(error = %message, "run_failed");
        std::process::exit(1);
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_names(true)
        .compact()
        .init();
}
