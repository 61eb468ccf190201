//! # Remote Key/Value Driver
//!
//! Stores each path as one string key on a redis server. The connection is
//! opened on first use and reused by later calls; a connection that fails
//! with an I/O error is dropped so the next call dials again.

use std::sync::Mutex;

use redis::{Client, Commands, Connection, RedisResult};
use tracing::{debug, warn};
use url::Url;

use super::backend::{child_names, Driver};
use super::errors::{DriverError, DriverResult};

/// Remote redis-backed driver
pub struct RemoteDriver {
    client: Client,
    endpoint: String,
    connection: Mutex<Option<Connection>>,
}

impl std::fmt::Debug for RemoteDriver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemoteDriver")
            .field("endpoint", &self.endpoint)
            .finish_non_exhaustive()
    }
}

impl RemoteDriver {
    /// Create a driver for the given server. No connection is made until
    /// the first operation.
    pub fn new(
        host: &str,
        port: u16,
        username: &str,
        password: &str,
        database: u32,
    ) -> DriverResult<Self> {
        let url = connection_url(host, port, username, password, database)?;
        let client = Client::open(url.as_str())
            .map_err(|e| DriverError::Connection(e.to_string()))?;

        Ok(Self {
            client,
            endpoint: format!("{}:{}/{}", host, port, database),
            connection: Mutex::new(None),
        })
    }

    /// Run `op` on the cached connection, dialing first if needed.
    fn with_connection<T>(
        &self,
        op: impl FnOnce(&mut Connection) -> RedisResult<T>,
    ) -> DriverResult<T> {
        let mut slot = self
            .connection
            .lock()
            .map_err(|_| DriverError::Internal("Lock poisoned".into()))?;

        let mut connection = match slot.take() {
            Some(connection) => connection,
            None => {
                debug!(endpoint = %self.endpoint, "opening remote connection");
                self.client.get_connection()?
            }
        };

        let result = op(&mut connection);
        match &result {
            Err(e) if e.is_io_error() || e.is_connection_dropped() => {
                warn!(endpoint = %self.endpoint, error = %e, "dropping remote connection");
            }
            _ => *slot = Some(connection),
        }

        result.map_err(DriverError::from)
    }
}

/// Build the `redis://` URL for a server, escaping credentials.
fn connection_url(
    host: &str,
    port: u16,
    username: &str,
    password: &str,
    database: u32,
) -> DriverResult<Url> {
    let invalid = |what: &str| DriverError::Connection(format!("invalid {}: {}", what, host));

    let mut url = Url::parse("redis://localhost").map_err(|_| invalid("url"))?;
    url.set_host(Some(host)).map_err(|_| invalid("host"))?;
    url.set_port(Some(port)).map_err(|_| invalid("port"))?;
    url.set_username(username).map_err(|_| invalid("username"))?;
    if !password.is_empty() {
        url.set_password(Some(password))
            .map_err(|_| invalid("password"))?;
    }
    url.set_path(&format!("/{}", database));

    Ok(url)
}

/// Escape glob metacharacters so a path matches only itself in `SCAN MATCH`.
fn escape_glob(path: &str) -> String {
    let mut escaped = String::with_capacity(path.len());
    for c in path.chars() {
        if matches!(c, '*' | '?' | '[' | ']' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

impl Driver for RemoteDriver {
    fn read(&self, path: &str) -> DriverResult<String> {
        debug!(path, "remote read");
        self.with_connection(|c| c.get::<_, Option<String>>(path))?
            .ok_or_else(|| DriverError::NotFound(path.to_string()))
    }

    fn write(&self, path: &str, content: &str) -> DriverResult<()> {
        debug!(path, bytes = content.len(), "remote write");
        self.with_connection(|c| c.set::<_, _, ()>(path, content))
    }

    fn delete(&self, path: &str) -> DriverResult<()> {
        debug!(path, "remote delete");
        match self.with_connection(|c| c.del::<_, i64>(path))? {
            0 => Err(DriverError::NotFound(path.to_string())),
            _ => Ok(()),
        }
    }

    fn exists(&self, path: &str) -> DriverResult<bool> {
        self.with_connection(|c| c.exists::<_, bool>(path))
    }

    fn list(&self, path: &str) -> DriverResult<Vec<String>> {
        debug!(path, "remote list");
        let pattern = format!("{}/*", escape_glob(path.trim_end_matches('/')));
        let keys = self.with_connection(|c| {
            let keys: Vec<String> = c.scan_match::<_, String>(&pattern)?.collect();
            Ok(keys)
        })?;

        Ok(child_names(path, keys))
    }
}
