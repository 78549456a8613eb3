use std::collections::HashMap;
use std::io::Write;
use std::path::{Path, PathBuf};

use log::debug;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tempfile::NamedTempFile;

use crate::error::PersistenceError;
use crate::pipeline::aggregator::ResultSnapshot;
use crate::worker::job::FailedFile;

/// Writes `{ path: text }` to `path` with two-space indentation, replacing
/// any previous file atomically.
pub fn write_results(path: &Path, snapshot: &ResultSnapshot) -> Result<(), PersistenceError> {
    write_json_atomic(path, snapshot)
}

/// Reads back a file produced by [`write_results`].
pub fn read_results(path: &Path) -> Result<ResultSnapshot, PersistenceError> {
    read_json(path)
}

/// Writes `{ path: error }` for every failed file.
pub fn write_failures(path: &Path, failures: &[FailedFile]) -> Result<(), PersistenceError> {
    let report: HashMap<String, &str> = failures
        .iter()
        .map(|f| (f.path.to_string_lossy().to_string(), f.error.as_str()))
        .collect();
    write_json_atomic(path, &report)
}

/// Encodes `value` fully in memory, writes it to a temporary file next to
/// `path`, then renames it into place. Readers see either the old file or
/// the complete new one.
pub fn write_json_atomic<T: Serialize + ?Sized>(
    path: &Path,
    value: &T,
) -> Result<(), PersistenceError> {
    let mut content = serde_json::to_vec_pretty(value).map_err(PersistenceError::Encode)?;
    content.push(b'\n');

    let write_error = |source: std::io::Error| PersistenceError::Write {
        path: path.to_path_buf(),
        source,
    };

    let directory = parent_directory(path);
    ensure_directory(&directory)?;

    let mut temp = NamedTempFile::new_in(&directory).map_err(write_error)?;
    temp.write_all(&content).map_err(write_error)?;
    temp.as_file().sync_all().map_err(write_error)?;
    copy_permissions(path, &temp).map_err(write_error)?;

    temp.persist(path).map_err(|e| write_error(e.error))?;

    debug!("Wrote {} bytes to {}", content.len(), path.display());
    Ok(())
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, PersistenceError> {
    let content = std::fs::read(path).map_err(|e| PersistenceError::Read {
        path: path.to_path_buf(),
        source: e,
    })?;

    serde_json::from_slice(&content).map_err(|e| PersistenceError::Decode {
        path: path.to_path_buf(),
        source: e,
    })
}

fn parent_directory(path: &Path) -> PathBuf {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

fn ensure_directory(path: &Path) -> Result<(), PersistenceError> {
    if !path.exists() {
        std::fs::create_dir_all(path).map_err(|e| PersistenceError::CreateDirectory {
            path: path.to_path_buf(),
            source: e,
        })?;
    }
    Ok(())
}

/// Temp files are created `0600`; keep the destination's mode if it exists,
/// otherwise use the usual `0644`.
#[cfg(unix)]
fn copy_permissions(path: &Path, temp: &NamedTempFile) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let permissions = match std::fs::metadata(path) {
        Ok(metadata) if metadata.is_file() => metadata.permissions(),
        _ => std::fs::Permissions::from_mode(0o644),
    };
    temp.as_file().set_permissions(permissions)
}

#[cfg(not(unix))]
fn copy_permissions(_path: &Path, _temp: &NamedTempFile) -> std::io::Result<()> {
    Ok(())
}
