//! # Driver Selection
//!
//! Exactly one driver is configured per store, chosen by the `kind` tag:
//!
//! ```json
//! { "kind": "local", "path": "./data" }
//! { "kind": "remote", "host": "localhost", "port": 6379, "database": "0" }
//! { "kind": "memory" }
//! ```

use serde::{Deserialize, Serialize};

use super::backend::Driver;
use super::errors::{DriverError, DriverResult};
use super::local::LocalDriver;
use super::memory::MemoryDriver;
use super::remote::RemoteDriver;

/// Driver configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum DriverConfig {
    /// Files under a root directory
    Local {
        /// Root directory
        path: String,
    },
    /// Keys on a redis server
    Remote {
        host: String,
        port: u16,
        #[serde(default)]
        username: String,
        #[serde(default)]
        password: String,
        /// Database index, as a string; empty selects database 0
        #[serde(default)]
        database: String,
    },
    /// Process-local map
    Memory,
}

impl DriverConfig {
    /// Local driver rooted at `path`
    pub fn local(path: impl Into<String>) -> Self {
        DriverConfig::Local { path: path.into() }
    }

    /// Remote driver without credentials on database 0
    pub fn remote(host: impl Into<String>, port: u16) -> Self {
        DriverConfig::Remote {
            host: host.into(),
            port,
            username: String::new(),
            password: String::new(),
            database: String::new(),
        }
    }

    /// Short name of the selected driver
    pub fn kind(&self) -> &'static str {
        match self {
            DriverConfig::Local { .. } => "local",
            DriverConfig::Remote { .. } => "remote",
            DriverConfig::Memory => "memory",
        }
    }

    /// Validates the configuration without touching the medium.
    pub fn validate(&self) -> DriverResult<()> {
        match self {
            DriverConfig::Local { path } => {
                if path.trim().is_empty() {
                    return Err(invalid("local driver requires a non-empty 'path'"));
                }
            }
            DriverConfig::Remote {
                host,
                port,
                database,
                ..
            } => {
                if host.trim().is_empty() {
                    return Err(invalid("remote driver requires a non-empty 'host'"));
                }
                if *port == 0 {
                    return Err(invalid("remote driver 'port' must be between 1 and 65535"));
                }
                database_index(database)?;
            }
            DriverConfig::Memory => {}
        }
        Ok(())
    }

    /// Construct the selected driver.
    ///
    /// A remote database that is not a numeric index fails with
    /// `InvalidConfig`; nothing is connected until first use.
    pub fn open(&self) -> DriverResult<Box<dyn Driver>> {
        let driver: Box<dyn Driver> = match self {
            DriverConfig::Local { path } => Box::new(LocalDriver::new(path)),
            DriverConfig::Remote {
                host,
                port,
                username,
                password,
                database,
            } => Box::new(RemoteDriver::new(
                host,
                *port,
                username,
                password,
                database_index(database)?,
            )?),
            DriverConfig::Memory => Box::new(MemoryDriver::new()),
        };
        Ok(driver)
    }
}

fn invalid(msg: impl Into<String>) -> DriverError {
    DriverError::InvalidConfig(msg.into())
}

fn database_index(database: &str) -> DriverResult<u32> {
    let database = database.trim();
    if database.is_empty() {
        return Ok(0);
    }
    database.parse::<u32>().map_err(|_| {
        invalid(format!(
            "remote driver 'database' must be a numeric index, got '{}'",
            database
        ))
    })
}
