//! # Local Filesystem Driver

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::debug;

use super::backend::Driver;
use super::errors::{DriverError, DriverResult};

/// Local filesystem driver
///
/// Each path maps to one file beneath `root`; path segments become
/// directories.
#[derive(Debug)]
pub struct LocalDriver {
    root: PathBuf,
}

impl LocalDriver {
    /// Create a new local driver rooted at `root`
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Root directory of this driver
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn full_path(&self, path: &str) -> PathBuf {
        self.root.join(path)
    }
}

fn io_error(path: &str, e: std::io::Error) -> DriverError {
    if e.kind() == ErrorKind::NotFound {
        DriverError::NotFound(path.to_string())
    } else {
        DriverError::Io(format!("{}: {}", path, e))
    }
}

impl Driver for LocalDriver {
    fn read(&self, path: &str) -> DriverResult<String> {
        debug!(path, "local read");
        let bytes = fs::read(self.full_path(path)).map_err(|e| io_error(path, e))?;
        String::from_utf8(bytes).map_err(|_| DriverError::Encoding(path.to_string()))
    }

    fn write(&self, path: &str, content: &str) -> DriverResult<()> {
        debug!(path, bytes = content.len(), "local write");
        let full_path = self.full_path(path);

        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent).map_err(|e| io_error(path, e))?;
        }

        fs::write(&full_path, content).map_err(|e| io_error(path, e))
    }

    fn delete(&self, path: &str) -> DriverResult<()> {
        debug!(path, "local delete");
        fs::remove_file(self.full_path(path)).map_err(|e| io_error(path, e))
    }

    fn exists(&self, path: &str) -> DriverResult<bool> {
        // A namespace directory sitting at a record path is not a record.
        Ok(self.full_path(path).is_file())
    }

    fn list(&self, path: &str) -> DriverResult<Vec<String>> {
        debug!(path, "local list");
        let full_path = self.full_path(path);
        let mut names = Vec::new();

        if !full_path.is_dir() {
            return Ok(names);
        }

        for entry in fs::read_dir(&full_path).map_err(|e| io_error(path, e))? {
            let entry = entry.map_err(|e| io_error(path, e))?;
            if let Some(name) = entry.file_name().to_str() {
                names.push(name.to_string());
            }
        }

        names.sort();
        Ok(names)
    }
}
