pub mod config;
pub mod pipeline;
pub mod resources;
pub mod text_util;

use tracing_subscriber::EnvFilter;

/// Initialize tracing for binaries embedding the pipeline.
///
/// Respects `RUST_LOG`; falls back to `config::default_log_filter()`.
/// Safe to call more than once (later calls are no-ops).
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .try_init();
}
