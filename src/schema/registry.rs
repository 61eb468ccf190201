//! In-memory schema registry
//!
//! Bindings are process-local and never persisted; they are registered again
//! on every start, usually from the store configuration.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::info;

use super::types::Schema;
use super::validator::Validator;
use crate::store::{StoreError, StoreResult, TypeName};

/// Mapping from record type name to its validator.
///
/// At most one validator is bound per type. Registration performs the
/// uniqueness check and the insert under a single write lock, so concurrent
/// `add` calls for the same type cannot both succeed.
#[derive(Default)]
pub struct SchemaRegistry {
    bindings: RwLock<HashMap<String, Arc<dyn Validator>>>,
}

impl SchemaRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    // Every critical section is a single insert or remove, so the map behind
    // a poisoned lock is still consistent.
    fn read(&self) -> RwLockReadGuard<'_, HashMap<String, Arc<dyn Validator>>> {
        self.bindings.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<String, Arc<dyn Validator>>> {
        self.bindings.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Bind a built-in schema to `type_name`.
    ///
    /// The schema definition is checked first; a malformed schema is an
    /// invalid argument.
    pub fn add(&self, type_name: &str, schema: Schema) -> StoreResult<()> {
        schema
            .check()
            .map_err(|e| StoreError::InvalidArgument(format!("schema: {}", e)))?;
        self.add_validator(type_name, Arc::new(schema))
    }

    /// Bind an arbitrary validator to `type_name`.
    pub fn add_validator(&self, type_name: &str, validator: Arc<dyn Validator>) -> StoreResult<()> {
        let type_name = TypeName::parse(type_name)?;

        let mut bindings = self.write();
        if bindings.contains_key(type_name.as_str()) {
            return Err(StoreError::DuplicateSchema(type_name.into_string()));
        }
        bindings.insert(type_name.as_str().to_string(), validator);
        drop(bindings);

        info!(type_name = %type_name, "schema registered");
        Ok(())
    }

    /// Remove the binding for `type_name`.
    ///
    /// Stored records of that type are left untouched.
    pub fn remove(&self, type_name: &str) -> StoreResult<()> {
        let type_name = TypeName::parse(type_name)?;

        if self.write().remove(type_name.as_str()).is_none() {
            return Err(StoreError::SchemaNotFound(type_name.into_string()));
        }

        info!(type_name = %type_name, "schema removed");
        Ok(())
    }

    /// Validator bound to `type_name`, if any.
    pub fn lookup(&self, type_name: &str) -> Option<Arc<dyn Validator>> {
        self.read().get(type_name).cloned()
    }

    /// Whether `type_name` has a binding
    pub fn contains(&self, type_name: &str) -> bool {
        self.read().contains_key(type_name)
    }

    /// Registered type names, sorted
    pub fn types(&self) -> Vec<String> {
        let mut types: Vec<String> = self.read().keys().cloned().collect();
        types.sort();
        types
    }

    /// Number of bindings
    pub fn len(&self) -> usize {
        self.read().len()
    }

    /// Whether no type is registered
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Debug for SchemaRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SchemaRegistry")
            .field("types", &self.types())
            .finish()
    }
}
