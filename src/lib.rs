//! typedstore - typed, schema-validated record storage
//!
//! Records are JSON documents addressed by `(type, name)`. Every type is
//! bound to a schema, and every record is validated against it on write and
//! again on read. Bytes live behind a [`Driver`]: a local directory tree, a
//! remote key/value server, or process memory.

pub mod cli;
pub mod config;
pub mod driver;
pub mod schema;
pub mod store;

pub use config::{ConfigError, SchemaBinding, StoreConfig};
pub use driver::{Driver, DriverConfig, DriverError, LocalDriver, MemoryDriver, RemoteDriver};
pub use schema::{FieldDef, FieldType, Schema, SchemaRegistry, ValidationError, Validator, Violation};
pub use store::{RecordKey, Storage, StoreError, StoreResult};
