pub mod build_info;

use std::sync::Once;

use crate::config::DEFAULT_LOG_FILTER;

static TRACING_INIT: Once = Once::new();

/// Initializes the global tracing subscriber once. `RUST_LOG` wins over
/// `directives`; output goes to stderr so script-mode stdout stays clean.
/// Later calls are no-ops, whatever their directives.
pub fn init_tracing_with(directives: &str) {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, EnvFilter};

        let filter = EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(directives))
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

        let _ = fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init();
        tracing::info!("Converter Core tracing initialized.");
    });
}
