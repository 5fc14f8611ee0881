use tracing_subscriber::{EnvFilter, fmt};

/// Initialize structured JSON logging on stderr.
///
/// Filtering comes from `RUST_LOG` and defaults to `info`. Stdout stays free
/// for command output such as `render` and `--json` reports.
pub fn init_normal_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .json()
        .flatten_event(true)
        .init();
}

pub fn init_logging() {
    // If tokio-console is enabled, DO NOT install the normal subscriber
    if std::env::var("TOKIO_CONSOLE").is_ok() {
        init_console_logging();
    } else {
        init_normal_logging();
    }
}

fn init_console_logging() {
    console_subscriber::init();
}
