use crate::modules::logger::LocalTimer;
use crate::modules::settings::cli::SETTINGS;
use std::sync::OnceLock;
use tracing::level_filters::LevelFilter;
use tracing::Level;
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::fmt;
use tracing_subscriber::layer::SubscriberExt;

pub static LOG_WORKER_GUARD: OnceLock<WorkerGuard> = OnceLock::new();

pub fn setup_file_logger(level: Level) -> Result<(), tracing::dispatcher::SetGlobalDefaultError> {
    let (server_nonb, server_guard) = server_log_writer();
    // Dropping the guard would stop the background writer.
    let _ = LOG_WORKER_GUARD.set(server_guard);

    let server_layer = fmt::layer()
        .with_timer(LocalTimer)
        .with_ansi(false)
        .with_level(true)
        .with_writer(server_nonb)
        .with_target(true);

    let subscriber = tracing_subscriber::registry()
        .with(LevelFilter::from_level(level))
        .with(server_layer);

    tracing::subscriber::set_global_default(subscriber)
}

fn server_log_writer() -> (NonBlocking, WorkerGuard) {
    match RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix("jmapgate")
        .filename_suffix("log")
        .max_log_files(SETTINGS.jmapgate_max_server_log_files)
        .build(&SETTINGS.jmapgate_log_dir)
    {
        Ok(rolling) => tracing_appender::non_blocking(rolling),
        Err(e) => {
            eprintln!(
                "Failed to open log directory {:?} ({:#?}), falling back to stdout",
                SETTINGS.jmapgate_log_dir, e
            );
            tracing_appender::non_blocking(std::io::stdout())
        }
    }
}
