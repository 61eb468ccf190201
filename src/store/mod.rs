//! Record store
//!
//! The [`Storage`] façade composes one [`crate::driver::Driver`] with one
//! [`crate::schema::SchemaRegistry`] and enforces the record protocol:
//!
//! 1. Call arguments are validated before anything else
//! 2. The record type must have a registered schema
//! 3. Existence is checked against the driver immediately before acting
//! 4. Payloads are validated before every write and after every read

mod errors;
mod naming;
mod storage;

pub use errors::{CorruptionCause, StoreError, StoreResult};
pub use naming::{RecordKey, RecordName, TypeName};
pub use storage::Storage;
