//! Schema subsystem
//!
//! Every record type is bound to exactly one validator. Payloads are checked
//! against it before they are written and again after they are read back.
//!
//! # Rules of the built-in schema language
//!
//! - Required fields must be present
//! - Undeclared fields are rejected unless the object allows extras
//! - Types match exactly, with no coercion (an int is a number, never the reverse)
//! - Nulls are rejected everywhere except under `any`
//! - Missing optional fields with a declared default are filled in
//!
//! Any other validation engine can be plugged in through [`Validator`].

mod errors;
mod registry;
mod types;
mod validator;

pub use errors::{ValidationError, Violation};
pub use registry::SchemaRegistry;
pub use types::{FieldDef, FieldType, Pattern, Schema};
pub use validator::Validator;
