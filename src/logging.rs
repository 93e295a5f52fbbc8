//! Daily rolling log files under the data directory.
//!
//! Files older than [`RETENTION_DAYS`] are removed whenever logging starts.

use std::path::Path;
use std::time::{Duration, SystemTime};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use crate::Result;

pub const RETENTION_DAYS: u64 = 7;
pub const LOG_FILE_PREFIX: &str = "morama.log";

/// Install the global subscriber writing to `log_dir`.
///
/// The returned guard flushes buffered lines when dropped and must be held
/// until the process exits. `RUST_LOG` takes precedence over `debug`.
pub fn init(log_dir: &Path, debug: bool) -> Result<WorkerGuard> {
    std::fs::create_dir_all(log_dir)?;
    let removed = cleanup_old_logs(log_dir, Duration::from_secs(RETENTION_DAYS * 24 * 60 * 60))?;

    let file_appender = tracing_appender::rolling::daily(log_dir, LOG_FILE_PREFIX);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let default_level = if debug { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_target(true)
                .with_line_number(true),
        )
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .init();

    if removed > 0 {
        tracing::debug!(removed, "removed expired log files");
    }
    Ok(guard)
}

/// Delete files in `dir` last modified more than `max_age` ago.
///
/// Returns how many files were removed. Entries that cannot be inspected or
/// removed are skipped.
pub fn cleanup_old_logs(dir: &Path, max_age: Duration) -> Result<usize> {
    let cutoff = SystemTime::now()
        .checked_sub(max_age)
        .unwrap_or(SystemTime::UNIX_EPOCH);

    let mut removed = 0;
    for entry in std::fs::read_dir(dir)? {
        let Ok(entry) = entry else { continue };
        let Ok(metadata) = entry.metadata() else { continue };
        if !metadata.is_file() {
            continue;
        }
        let Ok(modified) = metadata.modified() else { continue };
        if modified < cutoff && std::fs::remove_file(entry.path()).is_ok() {
            removed += 1;
        }
    }
    Ok(removed)
}
