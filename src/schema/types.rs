//! Schema type definitions
//!
//! Schemas are plain serde data, so they can be written inline in a store
//! configuration file:
//!
//! ```json
//! {
//!   "type": "object",
//!   "fields": {
//!     "name": { "type": "string" },
//!     "age": { "type": "int", "min": 0 },
//!     "tags": { "type": "array", "items": { "type": "string" }, "required": false, "default": [] }
//!   }
//! }
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::validator::{make_path, validate_value};

/// Regular expression a whole string value must match.
///
/// The anchored form is compiled on first use and kept.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Pattern {
    source: String,
    #[serde(skip)]
    compiled: OnceLock<Regex>,
}

impl Pattern {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            compiled: OnceLock::new(),
        }
    }

    /// Pattern as written in the schema
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Anchored regex matching only whole strings
    pub fn regex(&self) -> Result<&Regex, regex::Error> {
        if let Some(re) = self.compiled.get() {
            return Ok(re);
        }
        let re = Regex::new(&format!("^(?:{})$", self.source))?;
        Ok(self.compiled.get_or_init(|| re))
    }
}

impl PartialEq for Pattern {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

impl From<&str> for Pattern {
    fn from(source: &str) -> Self {
        Self::new(source)
    }
}

impl From<String> for Pattern {
    fn from(source: String) -> Self {
        Self::new(source)
    }
}

/// Supported value types
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum FieldType {
    /// UTF-8 string
    String {
        /// Regular expression the whole value must match
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pattern: Option<Pattern>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        min_length: Option<usize>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        max_length: Option<usize>,
        /// Closed set of permitted values (empty = any)
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        one_of: Vec<String>,
    },
    /// 64-bit signed integer
    Int {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        min: Option<i64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        max: Option<i64>,
    },
    /// Any JSON number, integral or not
    Number {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        min: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        max: Option<f64>,
    },
    /// Boolean
    Bool,
    /// Nested object with its own field schema
    Object {
        #[serde(default)]
        fields: BTreeMap<String, FieldDef>,
        /// Keep undeclared fields instead of rejecting them
        #[serde(default, skip_serializing_if = "is_false")]
        allow_extra: bool,
    },
    /// Homogeneous array
    Array {
        items: Box<FieldType>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        min_items: Option<usize>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        max_items: Option<usize>,
    },
    /// Any value, including null
    Any,
}

fn is_false(b: &bool) -> bool {
    !*b
}

impl FieldType {
    /// Unconstrained string
    pub fn string() -> Self {
        FieldType::String {
            pattern: None,
            min_length: None,
            max_length: None,
            one_of: Vec::new(),
        }
    }

    /// String that must fully match `pattern`
    pub fn string_matching(pattern: impl Into<String>) -> Self {
        FieldType::String {
            pattern: Some(Pattern::new(pattern)),
            min_length: None,
            max_length: None,
            one_of: Vec::new(),
        }
    }

    /// Unbounded integer
    pub fn int() -> Self {
        FieldType::Int { min: None, max: None }
    }

    /// Unbounded number
    pub fn number() -> Self {
        FieldType::Number { min: None, max: None }
    }

    /// Strict object with the given fields
    pub fn object<K: Into<String>>(fields: impl IntoIterator<Item = (K, FieldDef)>) -> Self {
        FieldType::Object {
            fields: fields.into_iter().map(|(k, v)| (k.into(), v)).collect(),
            allow_extra: false,
        }
    }

    /// Unbounded array of `items`
    pub fn array(items: FieldType) -> Self {
        FieldType::Array {
            items: Box::new(items),
            min_items: None,
            max_items: None,
        }
    }

    /// Returns the type name for error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            FieldType::String { .. } => "string",
            FieldType::Int { .. } => "int",
            FieldType::Number { .. } => "number",
            FieldType::Bool => "bool",
            FieldType::Object { .. } => "object",
            FieldType::Array { .. } => "array",
            FieldType::Any => "any",
        }
    }

    /// Checks the type definition itself, reporting the first defect found.
    fn check(&self, path: &str) -> Result<(), String> {
        match self {
            FieldType::String {
                pattern,
                min_length,
                max_length,
                ..
            } => {
                if let Some(pattern) = pattern {
                    pattern
                        .regex()
                        .map_err(|e| format!("{}: invalid pattern '{}': {}", path, pattern, e))?;
                }
                check_bounds(path, "length", *min_length, *max_length)
            }
            FieldType::Int { min, max } => check_bounds(path, "value", *min, *max),
            FieldType::Number { min, max } => check_bounds(path, "value", *min, *max),
            FieldType::Bool | FieldType::Any => Ok(()),
            FieldType::Object { fields, .. } => {
                for (name, def) in fields {
                    def.check(&make_path(path, name))?;
                }
                Ok(())
            }
            FieldType::Array {
                items,
                min_items,
                max_items,
            } => {
                check_bounds(path, "item count", *min_items, *max_items)?;
                items.check(&format!("{}[]", path))
            }
        }
    }
}

fn check_bounds<T: PartialOrd + std::fmt::Display>(
    path: &str,
    what: &str,
    min: Option<T>,
    max: Option<T>,
) -> Result<(), String> {
    match (min, max) {
        (Some(min), Some(max)) if min > max => Err(format!(
            "{}: minimum {} {} exceeds maximum {}",
            path, what, min, max
        )),
        _ => Ok(()),
    }
}

fn default_required() -> bool {
    true
}

/// Field definition inside an object schema
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDef {
    /// Field data type
    #[serde(flatten)]
    pub field_type: FieldType,
    /// Whether field must be present
    #[serde(default = "default_required")]
    pub required: bool,
    /// Value filled in when an optional field is absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
}

impl FieldDef {
    /// Create a required field of any type
    pub fn required(field_type: FieldType) -> Self {
        Self {
            field_type,
            required: true,
            default: None,
        }
    }

    /// Create an optional field of any type
    pub fn optional(field_type: FieldType) -> Self {
        Self {
            field_type,
            required: false,
            default: None,
        }
    }

    /// Create a required string field
    pub fn required_string() -> Self {
        Self::required(FieldType::string())
    }

    /// Create an optional string field
    pub fn optional_string() -> Self {
        Self::optional(FieldType::string())
    }

    /// Create a required int field
    pub fn required_int() -> Self {
        Self::required(FieldType::int())
    }

    /// Create an optional int field
    pub fn optional_int() -> Self {
        Self::optional(FieldType::int())
    }

    /// Create a required number field
    pub fn required_number() -> Self {
        Self::required(FieldType::number())
    }

    /// Create a required bool field
    pub fn required_bool() -> Self {
        Self::required(FieldType::Bool)
    }

    /// Create a required array field
    pub fn required_array(items: FieldType) -> Self {
        Self::required(FieldType::array(items))
    }

    /// Make the field optional, filling in `value` when it is absent
    pub fn with_default(mut self, value: Value) -> Self {
        self.required = false;
        self.default = Some(value);
        self
    }

    fn check(&self, path: &str) -> Result<(), String> {
        self.field_type.check(path)?;

        if let Some(default) = &self.default {
            if self.required {
                return Err(format!("{}: a required field cannot declare a default", path));
            }
            let mut violations = Vec::new();
            validate_value(&self.field_type, default, path, &mut violations);
            if let Some(first) = violations.first() {
                return Err(format!("{}: default does not conform: {}", path, first));
            }
        }

        Ok(())
    }
}

/// A complete schema: the type the whole payload must satisfy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Schema {
    root: FieldType,
}

impl Schema {
    /// Create a schema from its root type
    pub fn new(root: FieldType) -> Self {
        Self { root }
    }

    /// Schema for a strict object with the given fields
    pub fn object<K: Into<String>>(fields: impl IntoIterator<Item = (K, FieldDef)>) -> Self {
        Self::new(FieldType::object(fields))
    }

    /// Schema accepting any value
    pub fn any() -> Self {
        Self::new(FieldType::Any)
    }

    /// Root type
    pub fn root(&self) -> &FieldType {
        &self.root
    }

    /// Validates the schema structure itself (not a document)
    pub fn check(&self) -> Result<(), String> {
        self.root.check("$root")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn user_schema() -> Schema {
        Schema::object([
            ("name", FieldDef::required_string()),
            ("age", FieldDef::required_number()),
        ])
    }

    #[test]
    fn test_schema_structure_valid() {
        assert!(user_schema().check().is_ok());
    }

    #[test]
    fn test_parse_from_json() {
        let schema: Schema = serde_json::from_value(json!({
            "type": "object",
            "fields": {
                "name": { "type": "string" },
                "age": { "type": "number" }
            }
        }))
        .unwrap();
        assert_eq!(schema, user_schema());
    }

    #[test]
    fn test_parse_optional_with_default() {
        let schema: Schema = serde_json::from_value(json!({
            "type": "object",
            "fields": {
                "tags": {
                    "type": "array",
                    "items": { "type": "string" },
                    "required": false,
                    "default": []
                }
            }
        }))
        .unwrap();

        let expected = Schema::object([(
            "tags",
            FieldDef::required_array(FieldType::string()).with_default(json!([])),
        )]);
        assert_eq!(schema, expected);
        assert!(schema.check().is_ok());
    }

    #[test]
    fn test_serialize_round_trips_through_config_shape() {
        let value = serde_json::to_value(user_schema()).unwrap();
        assert_eq!(value["type"], "object");
        assert_eq!(value["fields"]["name"]["type"], "string");
        assert_eq!(value["fields"]["name"]["required"], true);
    }

    #[test]
    fn test_invalid_pattern_rejected() {
        let schema = Schema::object([(
            "code",
            FieldDef::required(FieldType::string_matching("([a-z")),
        )]);
        let err = schema.check().unwrap_err();
        assert!(err.contains("code"));
        assert!(err.contains("invalid pattern"));
    }

    #[test]
    fn test_pattern_checked_in_anchored_form() {
        // The trailing comment would swallow the closing anchor.
        let schema = Schema::object([(
            "code",
            FieldDef::required(FieldType::string_matching("(?x)abc # three letters")),
        )]);
        assert!(schema.check().unwrap_err().contains("invalid pattern"));

        let terminated = Schema::object([(
            "code",
            FieldDef::required(FieldType::string_matching("(?x)abc # three letters\n")),
        )]);
        assert!(terminated.check().is_ok());
    }

    #[test]
    fn test_pattern_compiled_once() {
        let pattern = Pattern::new("[a-z]+");
        let first = pattern.regex().unwrap() as *const Regex;
        let second = pattern.regex().unwrap() as *const Regex;
        assert_eq!(first, second);
        assert!(pattern.regex().unwrap().is_match("abc"));
        assert!(!pattern.regex().unwrap().is_match("abc1"));
    }

    #[test]
    fn test_pattern_parses_from_string() {
        let field: FieldType =
            serde_json::from_value(json!({ "type": "string", "pattern": "[0-9]+" })).unwrap();
        assert_eq!(field, FieldType::string_matching("[0-9]+"));
    }

    #[test]
    fn test_inverted_bounds_rejected() {
        let schema = Schema::object([(
            "age",
            FieldDef::required(FieldType::Int {
                min: Some(10),
                max: Some(1),
            }),
        )]);
        assert!(schema.check().unwrap_err().contains("exceeds"));
    }

    #[test]
    fn test_nonconforming_default_rejected() {
        let schema = Schema::object([(
            "age",
            FieldDef::required_int().with_default(json!("old")),
        )]);
        assert!(schema.check().unwrap_err().contains("default"));
    }

    #[test]
    fn test_nested_check_reports_path() {
        let schema = Schema::object([(
            "address",
            FieldDef::required(FieldType::object([(
                "zip",
                FieldDef::required(FieldType::string_matching("[0-9")),
            )])),
        )]);
        assert!(schema.check().unwrap_err().starts_with("address.zip"));
    }

    #[test]
    fn test_field_type_names() {
        assert_eq!(FieldType::string().type_name(), "string");
        assert_eq!(FieldType::int().type_name(), "int");
        assert_eq!(FieldType::number().type_name(), "number");
        assert_eq!(FieldType::Bool.type_name(), "bool");
        assert_eq!(FieldType::object::<String>([]).type_name(), "object");
        assert_eq!(FieldType::array(FieldType::Any).type_name(), "array");
        assert_eq!(FieldType::Any.type_name(), "any");
    }
}
