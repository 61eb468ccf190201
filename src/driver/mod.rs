//! # Storage Drivers
//!
//! Raw path-keyed I/O beneath the record store. A driver knows nothing about
//! types, names or schemas: it reads and writes UTF-8 content at opaque
//! forward-slash paths.
//!
//! Available drivers:
//! - [`LocalDriver`] - one file per path under a root directory
//! - [`RemoteDriver`] - one key per path on a redis server
//! - [`MemoryDriver`] - process-local map, for tests and embedding

mod backend;
mod config;
mod errors;
mod local;
mod memory;
mod remote;

pub use backend::Driver;
pub use config::DriverConfig;
pub use errors::{DriverError, DriverResult};
pub use local::LocalDriver;
pub use memory::MemoryDriver;
pub use remote::RemoteDriver;
