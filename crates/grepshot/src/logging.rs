//! Console and per-run log file output.
//!
//! Library code logs through the `log` facade and `tracing`; the binary calls
//! [`init_logging`] once, which bridges `log` records into a `tracing`
//! subscriber writing both to stdout and to a timestamped file. The returned
//! [`LogSession`] owns the file: dropping it flushes and closes the file,
//! after which output goes to the console only.

use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, Local};
use thiserror::Error;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::EnvFilter;

#[derive(Error, Debug)]
pub enum LoggingError {
    #[error("Failed to create log directory '{path}': {source}")]
    CreateDirectory {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to create log file '{path}': {source}")]
    CreateFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to install logger: {0}")]
    Init(String),
}

/// Cloneable handle to the run's log file, usable as a `tracing` writer.
#[derive(Clone)]
pub struct LogFileHandle {
    file: Arc<Mutex<Option<File>>>,
}

impl LogFileHandle {
    pub fn new(file: File) -> Self {
        Self {
            file: Arc::new(Mutex::new(Some(file))),
        }
    }

    /// Flushes and closes the file. Later writes are discarded.
    pub fn close(&self) {
        if let Some(mut file) = self.lock().take() {
            let _ = file.flush();
            let _ = file.sync_all();
        }
    }

    pub fn is_open(&self) -> bool {
        self.lock().is_some()
    }

    fn lock(&self) -> MutexGuard<'_, Option<File>> {
        self.file.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Write for LogFileHandle {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self.lock().as_mut() {
            Some(file) => file.write(buf),
            None => Ok(buf.len()),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self.lock().as_mut() {
            Some(file) => file.flush(),
            None => Ok(()),
        }
    }
}

impl<'a> MakeWriter<'a> for LogFileHandle {
    type Writer = LogFileHandle;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

/// Keeps the run's log file open until dropped.
pub struct LogSession {
    path: PathBuf,
    handle: LogFileHandle,
}

impl LogSession {
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for LogSession {
    fn drop(&mut self) {
        log::debug!("Closing log file {}", self.path.display());
        self.handle.close();
    }
}

/// `grepshot_2024-03-01_14-05-09.log`
pub fn log_file_name(now: DateTime<Local>) -> String {
    format!("grepshot_{}.log", now.format("%Y-%m-%d_%H-%M-%S"))
}

/// Creates the log file and opens it.
pub fn open_log_file(log_directory: &Path) -> Result<(PathBuf, File), LoggingError> {
    std::fs::create_dir_all(log_directory).map_err(|e| LoggingError::CreateDirectory {
        path: log_directory.to_path_buf(),
        source: e,
    })?;

    let path = log_directory.join(log_file_name(Local::now()));
    let file = File::create(&path).map_err(|e| LoggingError::CreateFile {
        path: path.clone(),
        source: e,
    })?;

    Ok((path, file))
}

/// Installs the global subscriber. `RUST_LOG` overrides the default filter.
pub fn init_logging(log_directory: &Path, verbose: bool) -> Result<LogSession, LoggingError> {
    let (path, file) = open_log_file(log_directory)?;
    let handle = LogFileHandle::new(file);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("grepshot=debug,info")
        } else {
            EnvFilter::new("info")
        }
    });

    let subscriber = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_thread_names(true)
                .with_writer(handle.clone()),
        );

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| LoggingError::Init(e.to_string()))?;
    tracing_log::LogTracer::init().map_err(|e| LoggingError::Init(e.to_string()))?;

    tracing::info!("Log file created at: {}", path.display());

    Ok(LogSession { path, handle })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tempfile::TempDir;

    #[test]
    fn test_log_file_name_format() {
        let now = Local.with_ymd_and_hms(2024, 3, 1, 14, 5, 9).unwrap();
        assert_eq!(log_file_name(now), "grepshot_2024-03-01_14-05-09.log");
    }

    #[test]
    fn test_open_log_file_creates_directory() {
        let temp_dir = TempDir::new().unwrap();
        let log_dir = temp_dir.path().join("logs");

        let (path, _file) = open_log_file(&log_dir).unwrap();

        assert!(path.starts_with(&log_dir));
        assert!(path.is_file());
        let name = path.file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with("grepshot_") && name.ends_with(".log"));
    }

    #[test]
    fn test_handle_discards_writes_after_close() {
        let temp_dir = TempDir::new().unwrap();
        let (path, file) = open_log_file(temp_dir.path()).unwrap();

        let mut handle = LogFileHandle::new(file);
        writeln!(handle, "first line").unwrap();
        assert!(handle.is_open());

        handle.close();
        assert!(!handle.is_open());
        writeln!(handle, "after close").unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, "first line\n");
    }

    #[test]
    fn test_make_writer_shares_file() {
        let temp_dir = TempDir::new().unwrap();
        let (path, file) = open_log_file(temp_dir.path()).unwrap();
        let handle = LogFileHandle::new(file);

        let mut writer = handle.make_writer();
        writer.write_all(b"via writer\n").unwrap();
        handle.close();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "via writer\n");
    }
}
