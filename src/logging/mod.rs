//! Tracing subscriber initialization.
//!
//! The engine logs layout passes, scroll steps and index rebuilds through
//! `tracing`. Embedders that want those diagnostics on disk (the engine runs
//! inside a UI thread; stdout is rarely usable there) call [`init`] once at
//! startup and monitor the file with `tail -f`.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Error type for logging initialization failures.
#[derive(Debug, Error)]
pub enum LoggingError {
    /// Failed to create log directory
    #[error("Failed to create log directory at {path:?}: {source}")]
    DirectoryCreation {
        /// The directory path that failed to be created
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Invalid log file path (no filename component)
    #[error("Invalid log file path: {0:?}")]
    InvalidPath(PathBuf),

    /// Log path has no parent directory
    #[error("Log path has no parent directory: {0:?}")]
    NoParentDirectory(PathBuf),

    /// Tracing subscriber already initialized
    #[error("Tracing subscriber already initialized")]
    SubscriberAlreadySet,
}

/// Initialize the tracing subscriber with file-based logging.
///
/// Respects the `RUST_LOG` environment variable, defaults to "info" level.
/// Creates the log directory if it doesn't exist.
///
/// # Errors
/// Returns [`LoggingError`] if the subscriber was already initialized, the
/// path has no usable filename/parent, or directory creation failed.
pub fn init(log_path: &Path) -> Result<(), LoggingError> {
    use tracing_subscriber::EnvFilter;

    // Create log directory if it doesn't exist
    if let Some(parent) = log_path.parent() {
        std::fs::create_dir_all(parent).map_err(|source| LoggingError::DirectoryCreation {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    let file_name = log_path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| LoggingError::InvalidPath(log_path.to_path_buf()))?;

    let directory = log_path
        .parent()
        .ok_or_else(|| LoggingError::NoParentDirectory(log_path.to_path_buf()))?;

    let file_appender = tracing_appender::rolling::never(directory, file_name);

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(file_appender)
        .with_ansi(false) // No ANSI colors in log files
        .try_init()
        .map_err(|_| LoggingError::SubscriberAlreadySet)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::fs;

    #[test]
    #[serial(tracing_init)]
    fn init_creates_log_directory_if_missing() {
        let temp_dir = std::env::temp_dir();
        let test_dir = temp_dir.join("stickylist_test_logs_create");
        let log_file = test_dir.join("test.log");

        let _ = fs::remove_dir_all(&test_dir);
        assert!(!test_dir.exists());

        // First init in the process wins; later calls report
        // SubscriberAlreadySet. Either way the directory must exist.
        let result = init(&log_file);
        assert!(test_dir.exists(), "log directory should be created");
        match result {
            Ok(()) | Err(LoggingError::SubscriberAlreadySet) => {}
            Err(other) => panic!("unexpected init failure: {other}"),
        }

        let _ = fs::remove_dir_all(&test_dir);
    }

    #[test]
    #[serial(tracing_init)]
    fn init_rejects_path_without_filename() {
        let result = init(Path::new("/"));
        assert!(matches!(
            result,
            Err(LoggingError::InvalidPath(_)) | Err(LoggingError::NoParentDirectory(_))
        ));
    }
}
