//! Structured logging for draft-ctl using tracing.
//!
//! Logs to `<data dir>/draft-ctl.{date}.log` with daily rotation, keeping 7
//! days. Log level can be controlled via `RUST_LOG`.
//!
//! Falls back to stderr logging if the file appender cannot be created.
//!
//! Buffered file lines are written by a background worker. The caller must
//! hold the returned guard until exit; dropping it flushes the buffer.

use fs_err as fs;
use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const DEFAULT_FILTER: &str = "draft_ctl=info,draft_core=warn";

#[must_use = "dropping the guard early loses buffered log lines"]
pub fn init(log_dir: &Path) -> Option<WorkerGuard> {
    let _ = fs::create_dir_all(log_dir);

    match file_subscriber(log_dir, env_filter()) {
        Ok((subscriber, guard)) => {
            subscriber.init();
            Some(guard)
        }
        Err(_) => {
            tracing_subscriber::registry()
                .with(env_filter())
                .with(
                    fmt::layer()
                        .with_writer(std::io::stderr)
                        .with_timer(fmt::time::UtcTime::rfc_3339())
                        .with_ansi(true),
                )
                .init();
            None
        }
    }
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Subscriber writing to the rotated log file through a background worker.
fn file_subscriber(
    log_dir: &Path,
    env_filter: EnvFilter,
) -> Result<
    (impl tracing::Subscriber + Send + Sync + 'static, WorkerGuard),
    tracing_appender::rolling::InitError,
> {
    let (non_blocking, guard) = tracing_appender::non_blocking(create_file_appender(log_dir)?);

    let subscriber = tracing_subscriber::registry().with(env_filter).with(
        fmt::layer()
            .with_writer(non_blocking)
            .with_timer(fmt::time::UtcTime::rfc_3339())
            .with_ansi(false),
    );
    Ok((subscriber, guard))
}

fn create_file_appender(
    log_dir: &Path,
) -> Result<RollingFileAppender, tracing_appender::rolling::InitError> {
    RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix("draft-ctl")
        .filename_suffix("log")
        .max_log_files(7)
        .build(log_dir)
}
