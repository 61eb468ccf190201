//! # In-Memory Driver

use std::collections::BTreeMap;
use std::sync::RwLock;

use super::backend::{child_names, Driver};
use super::errors::{DriverError, DriverResult};

/// Process-local driver keeping every path in an ordered map.
///
/// Contents vanish with the process.
#[derive(Debug, Default)]
pub struct MemoryDriver {
    entries: RwLock<BTreeMap<String, String>>,
}

impl MemoryDriver {
    /// Create an empty driver
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored paths
    pub fn len(&self) -> usize {
        self.entries.read().map(|e| e.len()).unwrap_or(0)
    }

    /// Whether nothing is stored
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn poisoned<T>(_: T) -> DriverError {
    DriverError::Internal("Lock poisoned".into())
}

impl Driver for MemoryDriver {
    fn read(&self, path: &str) -> DriverResult<String> {
        let entries = self.entries.read().map_err(poisoned)?;
        entries
            .get(path)
            .cloned()
            .ok_or_else(|| DriverError::NotFound(path.to_string()))
    }

    fn write(&self, path: &str, content: &str) -> DriverResult<()> {
        let mut entries = self.entries.write().map_err(poisoned)?;
        entries.insert(path.to_string(), content.to_string());
        Ok(())
    }

    fn delete(&self, path: &str) -> DriverResult<()> {
        let mut entries = self.entries.write().map_err(poisoned)?;
        entries
            .remove(path)
            .map(|_| ())
            .ok_or_else(|| DriverError::NotFound(path.to_string()))
    }

    fn exists(&self, path: &str) -> DriverResult<bool> {
        let entries = self.entries.read().map_err(poisoned)?;
        Ok(entries.contains_key(path))
    }

    fn list(&self, path: &str) -> DriverResult<Vec<String>> {
        let entries = self.entries.read().map_err(poisoned)?;
        Ok(child_names(path, entries.keys().cloned()))
    }
}
