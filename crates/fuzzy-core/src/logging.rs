use std::path::Path;

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::Result;

/// Keeps the non-blocking file writer alive; dropping it flushes and stops
/// the background thread. Hold it in `main` for the process lifetime.
pub struct LogGuard {
    _file: tracing_appender::non_blocking::WorkerGuard,
}

/// Initialize logging for the client: an ANSI console sink plus a
/// daily-rotating plain file under `log_dir`.
///
/// Default: debug for the fuzzy crates, warn for everything else. Can be
/// overridden with `RUST_LOG`.
pub fn init(service_name: &str, log_dir: &Path) -> Result<LogGuard> {
    std::fs::create_dir_all(log_dir)?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "warn,{service_name}=debug,fuzzy_core=debug,fuzzy_store=debug,fuzzy_telegram=debug"
        ))
    });

    let file_appender = tracing_appender::rolling::daily(log_dir, format!("{service_name}.log"));
    let (file_writer, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).with_ansi(true))
        .with(
            fmt::layer()
                .with_ansi(false)
                .with_writer(file_writer),
        )
        .init();

    Ok(LogGuard { _file: guard })
}
