//! Storage façade
//!
//! Existence is always asked of the driver, immediately before each mutating
//! or required read, never cached: the medium may be shared with other
//! processes. The check and the following action are not atomic. Two
//! concurrent `create` calls for the same new record can both pass the check,
//! in which case the last write wins. Callers that need stronger guarantees
//! must serialize at a higher layer.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::Value;
use tracing::{debug, info, warn};

use super::errors::{CorruptionCause, StoreError, StoreResult};
use super::naming::{RecordKey, TypeName};
use crate::config::StoreConfig;
use crate::driver::{Driver, DriverError};
use crate::schema::{Schema, SchemaRegistry, Validator};

/// Typed, schema-validated record store over one driver
pub struct Storage {
    driver: Box<dyn Driver>,
    schemas: SchemaRegistry,
}

impl std::fmt::Debug for Storage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Storage")
            .field("driver", &self.driver)
            .field("schemas", &self.schemas)
            .finish()
    }
}

impl Storage {
    /// Create a store with an empty schema registry
    pub fn new(driver: Box<dyn Driver>) -> Self {
        Self {
            driver,
            schemas: SchemaRegistry::new(),
        }
    }

    /// Create a store and register `bindings` in order.
    ///
    /// A repeated type fails exactly as a later [`SchemaRegistry::add`] would.
    pub fn with_schemas<K, I>(driver: Box<dyn Driver>, bindings: I) -> StoreResult<Self>
    where
        K: AsRef<str>,
        I: IntoIterator<Item = (K, Schema)>,
    {
        let storage = Self::new(driver);
        for (type_name, schema) in bindings {
            storage.schemas.add(type_name.as_ref(), schema)?;
        }
        Ok(storage)
    }

    /// Build the driver and schema bindings described by `config`.
    pub fn open(config: &StoreConfig) -> StoreResult<Self> {
        config
            .validate()
            .map_err(|e| StoreError::InvalidArgument(e.to_string()))?;

        let driver = config.driver.open()?;
        info!(driver = config.driver.kind(), schemas = config.schemas.len(), "opening store");

        Self::with_schemas(
            driver,
            config
                .schemas
                .iter()
                .map(|binding| (binding.type_name.as_str(), binding.schema.clone())),
        )
    }

    /// Schema registry, for `add` / `remove`
    pub fn schema(&self) -> &SchemaRegistry {
        &self.schemas
    }

    /// Underlying driver
    pub fn driver(&self) -> &dyn Driver {
        self.driver.as_ref()
    }

    /// Convenience for `schema().add(...)`
    pub fn add_schema(&self, type_name: &str, schema: Schema) -> StoreResult<()> {
        self.schemas.add(type_name, schema)
    }

    /// Convenience for `schema().add_validator(...)`
    pub fn add_validator(&self, type_name: &str, validator: Arc<dyn Validator>) -> StoreResult<()> {
        self.schemas.add_validator(type_name, validator)
    }

    /// Convenience for `schema().remove(...)`
    pub fn remove_schema(&self, type_name: &str) -> StoreResult<()> {
        self.schemas.remove(type_name)
    }

    fn validator_for(&self, type_name: &TypeName) -> StoreResult<Arc<dyn Validator>> {
        self.schemas
            .lookup(type_name.as_str())
            .ok_or_else(|| StoreError::SchemaNotFound(type_name.to_string()))
    }

    /// Argument check, then schema resolution.
    fn resolve(&self, type_name: &str, name: &str) -> StoreResult<(RecordKey, Arc<dyn Validator>)> {
        let key = RecordKey::parse(type_name, name)?;
        let validator = self.validator_for(&key.type_name)?;
        Ok((key, validator))
    }

    /// Create a new record.
    ///
    /// Returns the normalized payload that was stored.
    pub fn create(&self, type_name: &str, name: &str, payload: &Value) -> StoreResult<Value> {
        let (key, validator) = self.resolve(type_name, name)?;
        let path = key.path();

        if self.driver.exists(&path).map_err(|e| write_failed(&key, e))? {
            return Err(StoreError::AlreadyExists(key.to_string()));
        }

        let value = self.write_record(&key, &path, validator.as_ref(), payload)?;
        info!(record = %key, "record created");
        Ok(value)
    }

    /// Replace an existing record.
    ///
    /// Returns the normalized payload that was stored. The prior record is
    /// left unchanged if validation fails.
    pub fn update(&self, type_name: &str, name: &str, payload: &Value) -> StoreResult<Value> {
        let (key, validator) = self.resolve(type_name, name)?;
        let path = key.path();

        if !self.driver.exists(&path).map_err(|e| write_failed(&key, e))? {
            return Err(StoreError::NotFound(key.to_string()));
        }

        let value = self.write_record(&key, &path, validator.as_ref(), payload)?;
        info!(record = %key, "record updated");
        Ok(value)
    }

    /// Delete an existing record.
    pub fn delete(&self, type_name: &str, name: &str) -> StoreResult<()> {
        let (key, _) = self.resolve(type_name, name)?;
        let path = key.path();

        if !self.driver.exists(&path)? {
            return Err(StoreError::NotFound(key.to_string()));
        }

        self.driver.delete(&path)?;
        info!(record = %key, "record deleted");
        Ok(())
    }

    /// Whether a record is stored.
    pub fn exists(&self, type_name: &str, name: &str) -> StoreResult<bool> {
        let (key, _) = self.resolve(type_name, name)?;
        Ok(self.driver.exists(&key.path())?)
    }

    /// Read an existing record, validated against the type's schema.
    pub fn get(&self, type_name: &str, name: &str) -> StoreResult<Value> {
        let (key, validator) = self.resolve(type_name, name)?;
        let path = key.path();

        if !self.driver.exists(&path).map_err(|e| read_failed(&key, e))? {
            return Err(StoreError::NotFound(key.to_string()));
        }

        self.read_record(&key, &path, validator.as_ref())?
            .ok_or_else(|| StoreError::NotFound(key.to_string()))
    }

    /// Read a record if it is stored.
    ///
    /// Absence is `Ok(None)`; a stored record that fails validation is still
    /// an error.
    pub fn lookup(&self, type_name: &str, name: &str) -> StoreResult<Option<Value>> {
        let (key, validator) = self.resolve(type_name, name)?;
        let path = key.path();

        if !self.driver.exists(&path).map_err(|e| read_failed(&key, e))? {
            return Ok(None);
        }

        self.read_record(&key, &path, validator.as_ref())
    }

    /// Names of all records of a type, sorted.
    pub fn list(&self, type_name: &str) -> StoreResult<Vec<String>> {
        let type_name = TypeName::parse(type_name)?;
        self.validator_for(&type_name)?;

        let mut names = self.driver.list(type_name.as_str())?;
        names.sort();
        names.dedup();
        debug!(type_name = %type_name, count = names.len(), "records listed");
        Ok(names)
    }

    /// [`Storage::create`] for a serde-typed record
    pub fn create_as<T>(&self, type_name: &str, name: &str, record: &T) -> StoreResult<T>
    where
        T: Serialize + DeserializeOwned,
    {
        let payload = to_payload(type_name, name, record)?;
        let value = self.create(type_name, name, &payload)?;
        from_payload(type_name, name, value)
    }

    /// [`Storage::update`] for a serde-typed record
    pub fn update_as<T>(&self, type_name: &str, name: &str, record: &T) -> StoreResult<T>
    where
        T: Serialize + DeserializeOwned,
    {
        let payload = to_payload(type_name, name, record)?;
        let value = self.update(type_name, name, &payload)?;
        from_payload(type_name, name, value)
    }

    /// [`Storage::get`] for a serde-typed record
    pub fn get_as<T: DeserializeOwned>(&self, type_name: &str, name: &str) -> StoreResult<T> {
        let value = self.get(type_name, name)?;
        from_payload(type_name, name, value)
    }

    /// [`Storage::lookup`] for a serde-typed record
    pub fn lookup_as<T: DeserializeOwned>(
        &self,
        type_name: &str,
        name: &str,
    ) -> StoreResult<Option<T>> {
        self.lookup(type_name, name)?
            .map(|value| from_payload(type_name, name, value))
            .transpose()
    }

    /// Validate, encode and write. Nothing is written unless validation passes.
    fn write_record(
        &self,
        key: &RecordKey,
        path: &str,
        validator: &dyn Validator,
        payload: &Value,
    ) -> StoreResult<Value> {
        let value = validator
            .validate(payload)
            .map_err(|source| StoreError::ValidationFailed {
                record: key.to_string(),
                source,
            })?;

        let content = encode(key, &value)?;
        self.driver
            .write(path, &content)
            .map_err(|e| write_failed(key, e))?;
        Ok(value)
    }

    /// Read, decode and validate. `None` when the record vanished between
    /// the existence check and the read.
    fn read_record(
        &self,
        key: &RecordKey,
        path: &str,
        validator: &dyn Validator,
    ) -> StoreResult<Option<Value>> {
        let content = match self.driver.read(path) {
            Ok(content) => content,
            Err(DriverError::NotFound(_)) => return Ok(None),
            Err(e) => return Err(read_failed(key, e)),
        };

        let decoded: Value = serde_json::from_str(&content).map_err(|e| corrupt(key, e.into()))?;
        let value = validator
            .validate(&decoded)
            .map_err(|e| corrupt(key, e.into()))?;

        debug!(record = %key, "record read");
        Ok(Some(value))
    }
}

/// Pretty-printed JSON with four-space indentation.
fn encode(key: &RecordKey, value: &Value) -> StoreResult<String> {
    let mut buf = Vec::new();
    let mut serializer =
        serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"    "));
    value
        .serialize(&mut serializer)
        .map_err(|source| StoreError::Serialization {
            record: key.to_string(),
            source,
        })?;
    String::from_utf8(buf).map_err(|_| write_failed(key, DriverError::Encoding(key.path())))
}

fn corrupt(key: &RecordKey, source: CorruptionCause) -> StoreError {
    warn!(record = %key, cause = %source, "stored record rejected");
    StoreError::CorruptRecord {
        record: key.to_string(),
        source,
    }
}

fn write_failed(key: &RecordKey, source: DriverError) -> StoreError {
    StoreError::WriteFailed {
        record: key.to_string(),
        source,
    }
}

fn read_failed(key: &RecordKey, source: DriverError) -> StoreError {
    StoreError::ReadFailed {
        record: key.to_string(),
        source,
    }
}

fn to_payload<T: Serialize>(type_name: &str, name: &str, record: &T) -> StoreResult<Value> {
    serde_json::to_value(record).map_err(|source| StoreError::Serialization {
        record: format!("{}/{}", type_name, name),
        source,
    })
}

fn from_payload<T: DeserializeOwned>(type_name: &str, name: &str, value: Value) -> StoreResult<T> {
    serde_json::from_value(value).map_err(|source| StoreError::Serialization {
        record: format!("{}/{}", type_name, name),
        source,
    })
}
