use std::collections::HashSet;
use std::path::{Path, PathBuf};

use log::{debug, info, warn};
use walkdir::WalkDir;

use crate::config::DEFAULT_EXTENSIONS;
use crate::error::DiscoveryError;
use crate::worker::job::CandidatePath;

/// Recursively collects image files below a root directory.
pub struct DirectoryScanner {
    input_directory: PathBuf,
    extensions: HashSet<String>,
}

impl DirectoryScanner {
    pub fn new<P: AsRef<Path>>(input_directory: P) -> Self {
        Self::with_extensions(input_directory, DEFAULT_EXTENSIONS)
    }

    /// Extensions are matched case-insensitively and without the leading dot.
    pub fn with_extensions<P, I, S>(input_directory: P, extensions: I) -> Self
    where
        P: AsRef<Path>,
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            input_directory: input_directory.as_ref().to_path_buf(),
            extensions: extensions
                .into_iter()
                .map(|e| e.as_ref().trim_start_matches('.').to_ascii_lowercase())
                .collect(),
        }
    }

    pub fn input_directory(&self) -> &Path {
        &self.input_directory
    }

    pub fn accepts(&self, candidate: &CandidatePath) -> bool {
        self.extensions.contains(candidate.extension())
    }

    /// Walks the whole tree before returning. Unreadable subtrees are logged
    /// and skipped; only a missing or non-directory root is an error.
    pub fn scan(&self) -> Result<Vec<CandidatePath>, DiscoveryError> {
        self.check_root()?;

        let mut candidates = Vec::new();

        for entry in WalkDir::new(&self.input_directory).follow_links(false) {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    let path = e
                        .path()
                        .map(|p| p.display().to_string())
                        .unwrap_or_else(|| "<unknown>".to_string());
                    warn!("Skipping {}: {}", path, e);
                    continue;
                }
            };

            if !entry.file_type().is_file() {
                continue;
            }

            if let Some(candidate) = CandidatePath::new(entry.into_path()) {
                if self.accepts(&candidate) {
                    debug!("Found image: {}", candidate.path().display());
                    candidates.push(candidate);
                }
            }
        }

        info!(
            "Found {} image files in {}",
            candidates.len(),
            self.input_directory.display()
        );
        Ok(candidates)
    }

    fn check_root(&self) -> Result<(), DiscoveryError> {
        let metadata = std::fs::metadata(&self.input_directory).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                DiscoveryError::NotFound(self.input_directory.clone())
            } else {
                DiscoveryError::Access {
                    path: self.input_directory.clone(),
                    source: e,
                }
            }
        })?;

        if !metadata.is_dir() {
            return Err(DiscoveryError::NotADirectory(self.input_directory.clone()));
        }

        Ok(())
    }
}
