//! File-backed tracing setup. The terminal UI owns stdout and stderr, so
//! every event goes to `<log_dir>/notebox.log`.

use std::fs;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::{config::AppConfig, constants::PATH_SETTINGS};

/// Installs the global subscriber. Keep the guard alive until exit so the
/// background writer flushes.
pub fn init(config: &AppConfig) -> Option<WorkerGuard> {
    if let Err(e) = fs::create_dir_all(&config.log_dir) {
        eprintln!("Warning: Could not create log directory: {}", e);
        return None;
    }

    let appender = tracing_appender::rolling::never(&config.log_dir, PATH_SETTINGS.log_file);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let filter = EnvFilter::try_from_env(PATH_SETTINGS.log_filter_env)
        .unwrap_or_else(|_| EnvFilter::new(PATH_SETTINGS.default_log_filter));

    let file_layer = fmt::layer()
        .with_writer(writer)
        .with_ansi(false)
        .with_target(true)
        .with_level(true);

    if tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .try_init()
        .is_err()
    {
        return None;
    }

    tracing::info!(
        data_dir = %config.data_dir.display(),
        log_dir = %config.log_dir.display(),
        "logging initialized"
    );

    Some(guard)
}
