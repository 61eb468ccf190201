//! # Driver Trait

use std::fmt::Debug;

use super::errors::DriverResult;

/// Capability every storage medium provides to the record store.
///
/// Paths are forward-slash joined strings such as `user/alice`. Calls are
/// blocking and carry no timeout or retry policy of their own.
pub trait Driver: Send + Sync + Debug {
    /// Read the content stored at `path`.
    ///
    /// Fails with [`super::DriverError::NotFound`] if nothing is stored there.
    fn read(&self, path: &str) -> DriverResult<String>;

    /// Store `content` at `path`, replacing any previous content and
    /// creating whatever intermediate structure the medium needs.
    fn write(&self, path: &str, content: &str) -> DriverResult<()>;

    /// Remove the content at `path`.
    ///
    /// Fails with [`super::DriverError::NotFound`] if nothing is stored there.
    fn delete(&self, path: &str) -> DriverResult<()>;

    /// Check whether content is stored at `path`.
    fn exists(&self, path: &str) -> DriverResult<bool>;

    /// List the child names directly under `path`.
    ///
    /// An absent namespace yields an empty list, not an error.
    fn list(&self, path: &str) -> DriverResult<Vec<String>>;
}

/// Collect the distinct first segments of `keys` lying under `prefix/`.
///
/// Key/value media have no directories, so a listing is derived from the
/// flat key space the same way a directory read would present it.
pub(super) fn child_names<I>(prefix: &str, keys: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let namespace = format!("{}/", prefix.trim_end_matches('/'));
    let mut names: Vec<String> = keys
        .into_iter()
        .filter_map(|key| {
            let rest = key.strip_prefix(&namespace)?;
            let child = rest.split('/').next()?;
            (!child.is_empty()).then(|| child.to_string())
        })
        .collect();

    names.sort();
    names.dedup();
    names
}
