use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, fmt};

use super::TracingConfig;

/// Installs the global subscriber. `RUST_LOG`, when set, replaces the
/// configured directives.
pub fn init_tracing(config: &TracingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.default_directives()));

    let output = fmt::layer()
        .with_target(true)
        .with_file(true)
        .with_line_number(true);
    let output = if config.json_format {
        output.json().boxed()
    } else {
        output.boxed()
    };

    tracing_subscriber::registry().with(filter).with(output).init();

    tracing::info!(
        environment = %config.environment,
        json = config.json_format,
        directives = %config.default_directives(),
        "Logging configured"
    );
}
