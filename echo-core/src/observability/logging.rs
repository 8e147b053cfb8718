use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, fmt};
use std::sync::OnceLock;

use crate::config::{LogFormat, LoggingConfig};

static LOG_INIT: OnceLock<()> = OnceLock::new();

/// Install the global subscriber once. Later calls are no-ops, and an
/// already-installed subscriber (e.g. from a host application) is left alone.
pub fn setup_logging(config: &LoggingConfig) {
    LOG_INIT.get_or_init(|| {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(&config.level));

        let registry = tracing_subscriber::registry().with(filter);

        let installed = match config.format {
            LogFormat::Json => registry
                .with(
                    fmt::layer()
                        .json()
                        .with_target(true)
                        .with_file(true)
                        .with_line_number(true),
                )
                .try_init(),
            LogFormat::Pretty => registry
                .with(
                    fmt::layer()
                        .with_target(true)
                        .with_file(true)
                        .with_line_number(true),
                )
                .try_init(),
        };

        if installed.is_err() {
            tracing::debug!("Global subscriber already installed; keeping it");
        }
    });
}

#[macro_export]
macro_rules! log_scan {
    ($level:ident, $tool:expr, $($arg:tt)*) => {
        tracing::$level!(
            target: "scan",
            tool = %$tool,
            $($arg)*
        );
    };
}
