//! Object storage boundary for document attachments.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{OpsdeckError, Result};

/// Blob storage: a named path in, a retrievable URL out.
pub trait ObjectStore {
    fn upload(&self, path: &str, bytes: &[u8]) -> Result<String>;
    fn download(&self, path: &str) -> Result<Vec<u8>>;
}

/// Filesystem-backed object store rooted under the workspace directory.
pub struct FsObjectStore {
    root: PathBuf,
}

impl FsObjectStore {
    pub fn new(ops_dir: &Path) -> Self {
        Self {
            root: ops_dir.join("files"),
        }
    }

    fn resolve(&self, path: &str) -> Result<PathBuf> {
        // Reject anything that could climb out of the files directory.
        if path.is_empty()
            || path.starts_with('/')
            || path.split('/').any(|part| part == "..")
        {
            return Err(OpsdeckError::ObjectStorage(format!(
                "invalid object path: {}",
                path
            )));
        }
        Ok(self.root.join(path))
    }
}

impl ObjectStore for FsObjectStore {
    fn upload(&self, path: &str, bytes: &[u8]) -> Result<String> {
        let full = self.resolve(path)?;
        if let Some(parent) = full.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&full, bytes)?;
        Ok(format!("file://{}", full.display()))
    }

    fn download(&self, path: &str) -> Result<Vec<u8>> {
        let full = self.resolve(path)?;
        Ok(fs::read(&full)?)
    }
}
