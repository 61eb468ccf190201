//! Type and record names
//!
//! - Type names: `^[a-z]+-?[0-9]*(/[a-z0-9-]+)?$`, e.g. `user`, `note-2`,
//!   `user/admin`. A `/` component nests the namespace.
//! - Record names: `^[a-zA-Z0-9._\-@]+$`, e.g. `alice`, `bob@example.com`.
//!   `.` and `..` are refused so a record path cannot leave its namespace.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;

use super::errors::{StoreError, StoreResult};

const TYPE_PATTERN: &str = r"^[a-z]+-?[0-9]*(/[a-z0-9-]+)?$";
const NAME_PATTERN: &str = r"^[a-zA-Z0-9._\-@]+$";

static TYPE_REGEX: OnceLock<Option<Regex>> = OnceLock::new();
static NAME_REGEX: OnceLock<Option<Regex>> = OnceLock::new();

fn matches(cell: &'static OnceLock<Option<Regex>>, pattern: &str, value: &str) -> bool {
    cell.get_or_init(|| Regex::new(pattern).ok())
        .as_ref()
        .is_some_and(|re| re.is_match(value))
}

/// A validated record type name
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeName(String);

impl TypeName {
    /// Validate `value` as a type name
    pub fn parse(value: &str) -> StoreResult<Self> {
        if value.is_empty() {
            return Err(StoreError::InvalidArgument(
                "type: missing required field".into(),
            ));
        }
        if !matches(&TYPE_REGEX, TYPE_PATTERN, value) {
            return Err(StoreError::InvalidArgument(format!(
                "type '{}' does not match {}",
                value, TYPE_PATTERN
            )));
        }
        Ok(Self(value.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for TypeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A validated record name
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RecordName(String);

impl RecordName {
    /// Validate `value` as a record name
    pub fn parse(value: &str) -> StoreResult<Self> {
        if value.is_empty() {
            return Err(StoreError::InvalidArgument(
                "name: missing required field".into(),
            ));
        }
        if !matches(&NAME_REGEX, NAME_PATTERN, value) {
            return Err(StoreError::InvalidArgument(format!(
                "name '{}' does not match {}",
                value, NAME_PATTERN
            )));
        }
        if value == "." || value == ".." {
            return Err(StoreError::InvalidArgument(format!(
                "name '{}' is reserved",
                value
            )));
        }
        Ok(Self(value.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecordName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Address of one record: its type and its name
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RecordKey {
    pub type_name: TypeName,
    pub name: RecordName,
}

impl RecordKey {
    /// Validate both halves of a record address, type first
    pub fn parse(type_name: &str, name: &str) -> StoreResult<Self> {
        Ok(Self {
            type_name: TypeName::parse(type_name)?,
            name: RecordName::parse(name)?,
        })
    }

    /// Driver path for this record
    pub fn path(&self) -> String {
        format!("{}/{}", self.type_name, self.name)
    }
}

impl fmt::Display for RecordKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.type_name, self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn invalid(result: StoreResult<impl fmt::Debug>) -> String {
        match result {
            Err(StoreError::InvalidArgument(msg)) => msg,
            other => panic!("expected InvalidArgument, got {:?}", other),
        }
    }

    #[test]
    fn test_valid_type_names() {
        for name in ["user", "note-2", "note2", "user/admin", "user/team-1", "v-1/x9"] {
            assert!(TypeName::parse(name).is_ok(), "{}", name);
        }
    }

    #[test]
    fn test_invalid_type_names() {
        for name in ["User", "bad type", "1user", "user/", "user/a/b", "user_x", "/user"] {
            assert!(TypeName::parse(name).is_err(), "{}", name);
        }
    }

    #[test]
    fn test_empty_type_is_missing() {
        assert!(invalid(TypeName::parse("")).contains("missing required field"));
    }

    #[test]
    fn test_valid_record_names() {
        for name in ["alice", "Bob", "bob@example.com", "v1.2.3", "a_b-c", ".hidden"] {
            assert!(RecordName::parse(name).is_ok(), "{}", name);
        }
    }

    #[test]
    fn test_invalid_record_names() {
        for name in ["a b", "a/b", "a*", "ünï", ""] {
            assert!(RecordName::parse(name).is_err(), "{}", name);
        }
    }

    #[test]
    fn test_dot_names_reserved() {
        assert!(invalid(RecordName::parse("..")).contains("reserved"));
        assert!(invalid(RecordName::parse(".")).contains("reserved"));
    }

    #[test]
    fn test_record_path() {
        let key = RecordKey::parse("user/admin", "alice").unwrap();
        assert_eq!(key.path(), "user/admin/alice");
        assert_eq!(key.to_string(), "user/admin/alice");
    }

    #[test]
    fn test_type_checked_before_name() {
        let msg = invalid(RecordKey::parse("Bad", "a b"));
        assert!(msg.starts_with("type"));
    }
}
