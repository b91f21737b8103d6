use tracing_subscriber::EnvFilter;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Env var naming a log file; logs go to stderr when unset.
pub const LOG_FILE_ENV: &str = "INSTANCE_WEBSERVER_LOG";

/// Initialize tracing.
///
/// The filter comes from `RUST_LOG`, defaulting to `info`. When
/// `INSTANCE_WEBSERVER_LOG` is set, output goes to `{path}.{timestamp}.{pid}`
/// instead of stderr so several managers can share a directory.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let file = std::env::var(LOG_FILE_ENV).ok().and_then(|log_path| {
        let pid = std::process::id();
        let timestamp = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);
        let unique_path = format!("{}.{}.{}", log_path, timestamp, pid);
        match std::fs::File::create(&unique_path) {
            Ok(file) => Some(file),
            Err(e) => {
                eprintln!("Warning: Failed to create log file {}: {}", unique_path, e);
                None
            }
        }
    });

    let timer = fmt::time::UtcTime::rfc_3339();
    match file {
        Some(file) => {
            let file_layer = fmt::layer()
                .with_writer(file)
                .with_ansi(false)
                .with_target(true)
                .with_level(true)
                .with_timer(timer);
            tracing_subscriber::registry()
                .with(filter)
                .with(file_layer)
                .init();
        }
        None => {
            let stderr_layer = fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_level(true)
                .with_timer(timer);
            tracing_subscriber::registry()
                .with(filter)
                .with(stderr_layer)
                .init();
        }
    }
}
