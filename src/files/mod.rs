use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::extractors::VideoId;
use crate::TranscriptError;

#[cfg(test)]
pub(crate) mod memory;

/// Minimal filesystem capability used by the pipeline
pub trait FileStore: Send + Sync {
    fn create_dir_all(&self, path: &Path) -> io::Result<()>;

    fn write(&self, path: &Path, contents: &str) -> io::Result<()>;

    fn read_to_string(&self, path: &Path) -> io::Result<String>;

    fn remove_file(&self, path: &Path) -> io::Result<()>;

    fn exists(&self, path: &Path) -> bool;

    /// List the direct entries of a directory
    fn list_dir(&self, path: &Path) -> io::Result<Vec<PathBuf>>;
}

/// `FileStore` over the real filesystem
#[derive(Debug, Default, Clone)]
pub struct LocalFileStore;

impl FileStore for LocalFileStore {
    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        fs_err::create_dir_all(path)
    }

    fn write(&self, path: &Path, contents: &str) -> io::Result<()> {
        fs_err::write(path, contents)
    }

    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        fs_err::read_to_string(path)
    }

    fn remove_file(&self, path: &Path) -> io::Result<()> {
        fs_err::remove_file(path)
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn list_dir(&self, path: &Path) -> io::Result<Vec<PathBuf>> {
        fs_err::read_dir(path)?
            .map(|entry| entry.map(|e| e.path()))
            .collect()
    }
}

/// Artifact lifecycle operations for the download directory
#[derive(Clone)]
pub struct FileManager {
    store: Arc<dyn FileStore>,
}

impl FileManager {
    pub fn new(store: Arc<dyn FileStore>) -> Self {
        Self { store }
    }

    /// Create the directory and its parents; succeeds if it already exists
    pub fn ensure_dir(&self, path: &Path) -> Result<(), TranscriptError> {
        self.store
            .create_dir_all(path)
            .map_err(|e| TranscriptError::file_system(path, e))
    }

    /// Write the final transcript text
    pub fn persist(&self, path: &Path, text: &str) -> Result<(), TranscriptError> {
        tracing::debug!("Writing transcript to {}", path.display());
        self.store
            .write(path, text)
            .map_err(|e| TranscriptError::file_system(path, e))
    }

    pub fn read(&self, path: &Path) -> io::Result<String> {
        self.store.read_to_string(path)
    }

    pub fn exists(&self, path: &Path) -> bool {
        self.store.exists(path)
    }

    /// Delete `path` if present. Failures are logged, never returned.
    pub fn remove_if_exists(&self, path: &Path) {
        if !self.store.exists(path) {
            return;
        }

        if let Err(e) = self.store.remove_file(path) {
            tracing::warn!(path = %path.display(), error = %e, "failed to remove artifact");
        }
    }

    /// Delete every `<id>.*.vtt` caption file in `dir`
    pub fn remove_raw_markup(&self, dir: &Path, video_id: &VideoId) {
        let entries = match self.store.list_dir(dir) {
            Ok(entries) => entries,
            Err(e) => {
                tracing::warn!(dir = %dir.display(), error = %e, "failed to list download directory");
                return;
            }
        };

        for path in entries
            .iter()
            .filter(|path| video_id.owns_raw_markup(path))
        {
            tracing::debug!("Removing caption file {}", path.display());
            self.remove_if_exists(path);
        }
    }
}
