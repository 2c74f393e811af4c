//! Schema validation helpers.
//!
//! Validates a `serde_json::Value` against a [`Schema`] and reports every
//! problem as a [`Diagnostic`] instead of stopping at the first one.
//!
//! # Example
//!
//! ```
//! use addy_provider::schema::{Attribute, Schema};
//! use addy_provider::validation::validate;
//! use serde_json::json;
//!
//! let schema = Schema::v0().with_attribute("api_key", Attribute::optional_string());
//!
//! assert!(validate(&schema, &json!({"api_key": "secret"})).is_empty());
//!
//! let diagnostics = validate(&schema, &json!({"api_key": 42}));
//! assert_eq!(diagnostics.len(), 1);
//! assert_eq!(diagnostics[0].attribute, Some("api_key".to_string()));
//! ```

use crate::schema::{Attribute, AttributeType, Diagnostic, Schema};
use serde_json::Value;

/// Validate a JSON value against a schema.
///
/// - A `null` root is treated as an empty object
/// - Required attributes must be present and non-null
/// - Computed-only attributes are skipped
/// - Attribute types must match the schema
/// - Attributes the schema does not declare are rejected
pub fn validate(schema: &Schema, value: &Value) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();

    let empty = serde_json::Map::new();
    let obj = match value {
        Value::Object(map) => map,
        Value::Null => &empty,
        other => {
            diagnostics.push(
                Diagnostic::error("Expected object").with_detail(format!(
                    "Got {}",
                    value_type_name(other)
                )),
            );
            return diagnostics;
        },
    };

    let mut names: Vec<_> = schema.attributes.keys().collect();
    names.sort();
    for name in names {
        validate_attribute(&schema.attributes[name], obj.get(name), name, &mut diagnostics);
    }

    for key in obj.keys() {
        if !schema.attributes.contains_key(key) {
            diagnostics.push(
                Diagnostic::error(format!("Unsupported argument '{}'", key))
                    .with_detail("An argument with this name is not expected here")
                    .with_attribute(key.clone()),
            );
        }
    }

    diagnostics
}

/// Check if a JSON value is valid against a schema.
pub fn is_valid(schema: &Schema, value: &Value) -> bool {
    validate(schema, value).is_empty()
}

fn validate_attribute(
    attr: &Attribute,
    value: Option<&Value>,
    path: &str,
    diagnostics: &mut Vec<Diagnostic>,
) {
    if attr.flags.is_computed_only() {
        return;
    }

    match value {
        None | Some(Value::Null) => {
            if attr.flags.required {
                diagnostics.push(
                    Diagnostic::error(format!("Missing required attribute '{}'", path))
                        .with_detail("This attribute is required and must be provided")
                        .with_attribute(path),
                );
            }
        },
        Some(v) => validate_attribute_type(&attr.attr_type, v, path, diagnostics),
    }
}

fn validate_attribute_type(
    attr_type: &AttributeType,
    value: &Value,
    path: &str,
    diagnostics: &mut Vec<Diagnostic>,
) {
    match attr_type {
        AttributeType::String => {
            if !value.is_string() {
                diagnostics.push(type_error(path, "string", value));
            }
        },
        AttributeType::Int64 => {
            if value.as_i64().is_none() {
                diagnostics.push(type_error(path, "int64", value));
            }
        },
        AttributeType::List(element_type) => match value.as_array() {
            Some(items) => {
                for (i, item) in items.iter().enumerate() {
                    let item_path = format!("{}.{}", path, i);
                    validate_attribute_type(element_type, item, &item_path, diagnostics);
                }
            },
            None => diagnostics.push(type_error(path, "list", value)),
        },
    }
}

fn value_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn type_error(path: &str, expected: &str, got: &Value) -> Diagnostic {
    Diagnostic::error(format!("Invalid type for '{}'", path))
        .with_detail(format!("Expected {}, got {}", expected, value_type_name(got)))
        .with_attribute(path)
}
