//! Declared shapes for flow inputs and outputs, and the validator that checks
//! raw JSON against them.
//!
//! Shapes are `const` tables so each flow can declare its contract next to its
//! template. Validation is structural only: field presence and JSON type.
//! Extra fields are ignored and dropped later by typed deserialization.

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

/// JSON type a declared field must carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    String,
    Number,
    /// An object whose values are all strings (e.g. form field id → value).
    StringMap,
}

impl FieldKind {
    pub fn type_name(self) -> &'static str {
        match self {
            FieldKind::String => "string",
            FieldKind::Number => "number",
            FieldKind::StringMap => "record<string, string>",
        }
    }

    fn accepts(self, value: &Value) -> bool {
        match self {
            FieldKind::String => value.is_string(),
            FieldKind::Number => value.is_number(),
            FieldKind::StringMap => value
                .as_object()
                .is_some_and(|map| map.values().all(Value::is_string)),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: FieldKind,
    pub required: bool,
    pub description: &'static str,
}

impl FieldSpec {
    pub const fn required(name: &'static str, kind: FieldKind, description: &'static str) -> Self {
        Self {
            name,
            kind,
            required: true,
            description,
        }
    }

    pub const fn optional(name: &'static str, kind: FieldKind, description: &'static str) -> Self {
        Self {
            name,
            kind,
            required: false,
            description,
        }
    }
}

/// An ordered set of named fields.
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(transparent)]
pub struct Shape {
    pub fields: &'static [FieldSpec],
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    #[error("expected a JSON object, found {found}")]
    NotAnObject { found: &'static str },

    #[error("missing required field '{field}'")]
    MissingField { field: &'static str },

    #[error("field '{field}' must be {expected}, found {found}")]
    WrongType {
        field: &'static str,
        expected: &'static str,
        found: &'static str,
    },
}

impl Shape {
    pub const fn new(fields: &'static [FieldSpec]) -> Self {
        Self { fields }
    }

    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Checks `value` against this shape, reporting the first violation in
    /// declaration order.
    ///
    /// Optional fields may be absent or `null`. Required fields must be
    /// present with the declared type.
    pub fn validate(&self, value: &Value) -> Result<(), SchemaError> {
        let object = value.as_object().ok_or(SchemaError::NotAnObject {
            found: json_type_name(value),
        })?;

        for spec in self.fields {
            match object.get(spec.name) {
                None => {
                    if spec.required {
                        return Err(SchemaError::MissingField { field: spec.name });
                    }
                }
                Some(Value::Null) if !spec.required => {}
                Some(v) if spec.kind.accepts(v) => {}
                Some(v) => {
                    return Err(SchemaError::WrongType {
                        field: spec.name,
                        expected: spec.kind.type_name(),
                        found: found_type_name(spec.kind, v),
                    })
                }
            }
        }

        Ok(())
    }

    /// One line per field, used to tell the model what to return.
    pub fn describe(&self) -> String {
        self.fields
            .iter()
            .map(|f| {
                format!(
                    "- \"{}\" ({}, {}): {}",
                    f.name,
                    f.kind.type_name(),
                    if f.required { "required" } else { "optional" },
                    f.description
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn found_type_name(kind: FieldKind, value: &Value) -> &'static str {
    match (kind, value) {
        (FieldKind::StringMap, Value::Object(_)) => "object with non-string values",
        _ => json_type_name(value),
    }
}
