//! Store configuration
//!
//! A store is described by one JSON document naming its driver and the
//! schemas to register at startup:
//!
//! ```json
//! {
//!   "driver": { "kind": "local", "path": "./data" },
//!   "schemas": [
//!     { "type": "user", "schema": { "type": "object", "fields": { "name": { "type": "string" } } } }
//!   ]
//! }
//! ```
//!
//! Bindings are applied in order; a repeated type fails registration.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::driver::DriverConfig;
use crate::schema::Schema;
use crate::store::TypeName;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config '{path}': {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    #[error("Invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Result type for configuration loading
pub type ConfigResult<T> = Result<T, ConfigError>;

/// One type-to-schema binding
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaBinding {
    /// Record type name
    #[serde(rename = "type")]
    pub type_name: String,
    /// Schema bound to the type
    pub schema: Schema,
}

impl SchemaBinding {
    pub fn new(type_name: impl Into<String>, schema: Schema) -> Self {
        Self {
            type_name: type_name.into(),
            schema,
        }
    }
}

/// Configuration file structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Storage driver (required)
    pub driver: DriverConfig,

    /// Schemas registered at startup (optional)
    #[serde(default)]
    pub schemas: Vec<SchemaBinding>,
}

impl StoreConfig {
    /// Configuration with a driver and no schemas
    pub fn new(driver: DriverConfig) -> Self {
        Self {
            driver,
            schemas: Vec::new(),
        }
    }

    /// Add a schema binding
    pub fn with_schema(mut self, type_name: impl Into<String>, schema: Schema) -> Self {
        self.schemas.push(SchemaBinding::new(type_name, schema));
        self
    }

    /// Load configuration from file
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;

        let config = Self::from_json(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from a JSON string without validating it
    pub fn from_json(content: &str) -> ConfigResult<Self> {
        Ok(serde_json::from_str(content)?)
    }

    /// Validate driver settings and every schema binding.
    ///
    /// A type bound twice is left for registration to reject, so it fails
    /// as `DuplicateSchema` exactly like a runtime `add`.
    pub fn validate(&self) -> ConfigResult<()> {
        self.driver
            .validate()
            .map_err(|e| ConfigError::Invalid(format!("driver: {}", e)))?;

        for binding in &self.schemas {
            TypeName::parse(&binding.type_name)
                .map_err(|e| ConfigError::Invalid(format!("schemas: {}", e)))?;

            binding.schema.check().map_err(|e| {
                ConfigError::Invalid(format!("schemas: '{}': {}", binding.type_name, e))
            })?;
        }

        Ok(())
    }
}
