//! Content artifact storage.
//!
//! Section, summary and chunk bodies are plain UTF-8 files under the
//! output directory. Records refer to them by handles relative to that
//! directory, so an output directory can be moved as a whole.
//!
//! Writes overwrite the whole file. A crash mid-write can leave a
//! truncated artifact; [`LibraryValidator`](super::LibraryValidator)
//! detects missing files, not truncated ones.

use crate::core::error::Result;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Whole-file storage for text artifacts
pub trait ArtifactStore {
    /// Write `contents` under `handle`, replacing any existing file
    fn write(&self, handle: &str, contents: &str) -> Result<()>;

    /// Read the artifact, or `None` if it does not exist
    fn read(&self, handle: &str) -> Result<Option<String>>;

    /// Remove the artifact. Returns `false` if it did not exist.
    fn remove(&self, handle: &str) -> Result<bool>;

    /// Check whether the artifact exists
    fn exists(&self, handle: &str) -> bool;
}

/// Artifact store on the local filesystem
#[derive(Debug, Clone)]
pub struct FsArtifactStore {
    root: PathBuf,
}

impl FsArtifactStore {
    /// Create a store rooted at `root` (created lazily on first write)
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Root directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve a handle to its path on disk
    pub fn resolve(&self, handle: &str) -> PathBuf {
        self.root.join(handle)
    }
}

impl ArtifactStore for FsArtifactStore {
    fn write(&self, handle: &str, contents: &str) -> Result<()> {
        let path = self.resolve(handle);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, contents)?;
        Ok(())
    }

    fn read(&self, handle: &str) -> Result<Option<String>> {
        match fs::read_to_string(self.resolve(handle)) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn remove(&self, handle: &str) -> Result<bool> {
        match fs::remove_file(self.resolve(handle)) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    fn exists(&self, handle: &str) -> bool {
        self.resolve(handle).is_file()
    }
}
