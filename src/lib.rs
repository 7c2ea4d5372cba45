pub mod classifier;
pub mod config;
pub mod fixtures;
pub mod goal_outlook;
pub mod http_client;
pub mod leagues;
pub mod picks;
pub mod picks_export;
pub mod predictions;

use tracing_subscriber::{EnvFilter, fmt};

/// Loads `.env.local` then `.env`, then installs the stderr log subscriber
/// (`RUST_LOG`, default `info`).
pub fn init_runtime() {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");

    let _ = fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .try_init();
}
