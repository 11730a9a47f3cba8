use std::fs;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initializes the logging system with both console and file output.
pub fn init_logging() {
    init_logging_in("logs");
}

/// Same as [`init_logging`], writing the rotated JSON log into `dir`.
pub fn init_logging_in(dir: &str) {
    let _ = fs::create_dir_all(dir);

    // Non-blocking file appender with daily rotation
    let file_appender = tracing_appender::rolling::daily(dir, "conf_site.log");
    let (non_blocking_writer, guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = fmt::layer().json().with_writer(non_blocking_writer);

    let console_layer = fmt::layer()
        .with_target(true)
        .with_line_number(true)
        .with_writer(std::io::stdout);

    // Respect RUST_LOG if set; otherwise verbose for our crate
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("conf_site=debug,info"));

    // try_init so a second call (tests, bins sharing the lib) is a no-op
    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .with(console_layer)
        .try_init();

    // Keep the guard alive for the whole process so logs are flushed
    std::mem::forget(guard);
}
