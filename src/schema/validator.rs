//! Payload validation
//!
//! Validation never mutates its input. It produces a normalized copy in which
//! absent optional fields carrying a default have been filled in, or an error
//! listing every violation found.

use serde_json::{Map, Value};

use super::errors::{ValidationError, Violation};
use super::types::{FieldDef, FieldType, Schema};

/// Validation capability bound to a record type.
///
/// [`Schema`] is the built-in implementation. Any
/// `Fn(&Value) -> Result<Value, ValidationError>` closure also qualifies, so
/// an external schema engine can be plugged in without wrapping.
pub trait Validator: Send + Sync {
    /// Validates `value`, returning its normalized form.
    fn validate(&self, value: &Value) -> Result<Value, ValidationError>;
}

impl Validator for Schema {
    fn validate(&self, value: &Value) -> Result<Value, ValidationError> {
        let mut violations = Vec::new();
        let normalized = validate_value(self.root(), value, "$root", &mut violations);

        if violations.is_empty() {
            Ok(normalized)
        } else {
            Err(ValidationError::new(violations))
        }
    }
}

impl<F> Validator for F
where
    F: Fn(&Value) -> Result<Value, ValidationError> + Send + Sync,
{
    fn validate(&self, value: &Value) -> Result<Value, ValidationError> {
        self(value)
    }
}

/// Validates `value` against `expected`, appending violations to `out`.
///
/// Returns the normalized value; it is only meaningful when no violations
/// were appended.
pub(super) fn validate_value(
    expected: &FieldType,
    value: &Value,
    path: &str,
    out: &mut Vec<Violation>,
) -> Value {
    if value.is_null() && !matches!(expected, FieldType::Any) {
        out.push(Violation::null_value(path));
        return Value::Null;
    }

    match expected {
        FieldType::String {
            pattern,
            min_length,
            max_length,
            one_of,
        } => {
            let Some(s) = value.as_str() else {
                out.push(type_error(path, "string", value));
                return value.clone();
            };

            let len = s.chars().count();
            if let Some(min) = min_length {
                if len < *min {
                    out.push(Violation::constraint(
                        path,
                        format!("at least {} characters", min),
                        format!("{} characters", len),
                    ));
                }
            }
            if let Some(max) = max_length {
                if len > *max {
                    out.push(Violation::constraint(
                        path,
                        format!("at most {} characters", max),
                        format!("{} characters", len),
                    ));
                }
            }
            if let Some(pattern) = pattern {
                let actual = match pattern.regex() {
                    Ok(re) if re.is_match(s) => None,
                    Ok(_) => Some(format!("'{}'", s)),
                    Err(_) => Some("a pattern that does not compile".to_string()),
                };
                if let Some(actual) = actual {
                    out.push(Violation::constraint(
                        path,
                        format!("string matching /{}/", pattern),
                        actual,
                    ));
                }
            }
            if !one_of.is_empty() && !one_of.iter().any(|allowed| allowed == s) {
                out.push(Violation::constraint(
                    path,
                    format!("one of [{}]", one_of.join(", ")),
                    format!("'{}'", s),
                ));
            }
        }
        FieldType::Int { min, max } => match value.as_i64() {
            Some(n) => {
                check_range(path, n, *min, *max, out);
            }
            // Integral but above i64::MAX
            None if value.is_u64() => out.push(Violation::constraint(
                path,
                format!("<= {}", max.unwrap_or(i64::MAX)),
                value.to_string(),
            )),
            None => out.push(type_error(path, "int", value)),
        },
        FieldType::Number { min, max } => match value.as_f64() {
            Some(n) => {
                check_range(path, n, *min, *max, out);
            }
            None => out.push(type_error(path, "number", value)),
        },
        FieldType::Bool => {
            if !value.is_boolean() {
                out.push(type_error(path, "bool", value));
            }
        }
        FieldType::Object {
            fields,
            allow_extra,
        } => {
            let Some(obj) = value.as_object() else {
                out.push(type_error(path, "object", value));
                return value.clone();
            };
            return Value::Object(validate_object(obj, fields, *allow_extra, path, out));
        }
        FieldType::Array {
            items,
            min_items,
            max_items,
        } => {
            let Some(arr) = value.as_array() else {
                out.push(type_error(path, "array", value));
                return value.clone();
            };

            if let Some(min) = min_items {
                if arr.len() < *min {
                    out.push(Violation::constraint(
                        path,
                        format!("at least {} items", min),
                        format!("{} items", arr.len()),
                    ));
                }
            }
            if let Some(max) = max_items {
                if arr.len() > *max {
                    out.push(Violation::constraint(
                        path,
                        format!("at most {} items", max),
                        format!("{} items", arr.len()),
                    ));
                }
            }

            let normalized = arr
                .iter()
                .enumerate()
                .map(|(i, elem)| validate_value(items, elem, &format!("{}[{}]", path, i), out))
                .collect();
            return Value::Array(normalized);
        }
        FieldType::Any => {}
    }

    value.clone()
}

fn validate_object(
    obj: &Map<String, Value>,
    fields: &std::collections::BTreeMap<String, FieldDef>,
    allow_extra: bool,
    path: &str,
    out: &mut Vec<Violation>,
) -> Map<String, Value> {
    let mut normalized = Map::new();

    for (key, value) in obj {
        if !fields.contains_key(key) {
            if allow_extra {
                normalized.insert(key.clone(), value.clone());
            } else {
                out.push(Violation::extra_field(make_path(path, key)));
            }
        }
    }

    for (name, def) in fields {
        let field_path = make_path(path, name);
        match obj.get(name) {
            Some(value) => {
                let value = validate_value(&def.field_type, value, &field_path, out);
                normalized.insert(name.clone(), value);
            }
            None if def.required => out.push(Violation::missing_field(field_path)),
            None => {
                if let Some(default) = &def.default {
                    normalized.insert(name.clone(), default.clone());
                }
            }
        }
    }

    normalized
}

fn check_range<T: PartialOrd + std::fmt::Display + Copy>(
    path: &str,
    n: T,
    min: Option<T>,
    max: Option<T>,
    out: &mut Vec<Violation>,
) {
    if let Some(min) = min {
        if n < min {
            out.push(Violation::constraint(path, format!(">= {}", min), n.to_string()));
        }
    }
    if let Some(max) = max {
        if n > max {
            out.push(Violation::constraint(path, format!("<= {}", max), n.to_string()));
        }
    }
}

/// Returns the JSON type name for error messages.
fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(n) => {
            if n.is_i64() || n.is_u64() {
                "int"
            } else {
                "number"
            }
        }
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Creates a field path from prefix and field name.
pub(super) fn make_path(prefix: &str, field: &str) -> String {
    if prefix == "$root" {
        field.to_string()
    } else {
        format!("{}.{}", prefix, field)
    }
}

fn type_error(path: &str, expected: &str, actual: &Value) -> Violation {
    Violation::type_mismatch(path, expected, json_type_name(actual))
}
