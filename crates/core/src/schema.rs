//! Tool input schemas.
//!
//! A schema maps field names to `{type, required, description}`. It is shown
//! to the model (as JSON Schema) and used to check parsed arguments before a
//! tool ever runs. Validation is strict: missing required fields, wrong types
//! and unknown extra fields are all rejected.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::SchemaError;

/// The value type a field accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    String,
    Integer,
    StringList,
}

impl FieldKind {
    /// Human-readable expectation used in error messages.
    pub fn expected(&self) -> &'static str {
        match self {
            FieldKind::String => "a string",
            FieldKind::Integer => "an integer",
            FieldKind::StringList => "a list of strings",
        }
    }

    fn accepts(&self, value: &Value) -> bool {
        match self {
            FieldKind::String => value.is_string(),
            FieldKind::Integer => value.is_i64() || value.is_u64(),
            FieldKind::StringList => value
                .as_array()
                .is_some_and(|items| items.iter().all(Value::is_string)),
        }
    }

    fn json_schema(&self) -> Value {
        match self {
            FieldKind::String => serde_json::json!({ "type": "string" }),
            FieldKind::Integer => serde_json::json!({ "type": "integer" }),
            FieldKind::StringList => {
                serde_json::json!({ "type": "array", "items": { "type": "string" } })
            }
        }
    }
}

/// One field of a tool's input.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldSpec {
    pub name: String,
    pub kind: FieldKind,
    pub required: bool,
    pub description: String,
}

impl FieldSpec {
    pub fn required(name: &str, kind: FieldKind, description: &str) -> Self {
        Self {
            name: name.to_string(),
            kind,
            required: true,
            description: description.to_string(),
        }
    }

    pub fn optional(name: &str, kind: FieldKind, description: &str) -> Self {
        Self {
            required: false,
            ..Self::required(name, kind, description)
        }
    }
}

/// An ordered set of fields describing a tool's arguments.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InputSchema {
    fields: Vec<FieldSpec>,
}

impl InputSchema {
    pub fn new(fields: Vec<FieldSpec>) -> Self {
        Self { fields }
    }

    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Check `arguments` against the schema and return the argument map.
    pub fn validate(&self, arguments: &Value) -> Result<Map<String, Value>, SchemaError> {
        let object = arguments.as_object().ok_or(SchemaError::NotAnObject {
            found: json_type_name(arguments),
        })?;

        for spec in &self.fields {
            match object.get(&spec.name) {
                None | Some(Value::Null) if spec.required => {
                    return Err(SchemaError::MissingField {
                        field: spec.name.clone(),
                    });
                }
                None | Some(Value::Null) => {}
                Some(value) if !spec.kind.accepts(value) => {
                    return Err(SchemaError::WrongType {
                        field: spec.name.clone(),
                        expected: spec.kind.expected(),
                        found: json_type_name(value),
                    });
                }
                Some(_) => {}
            }
        }

        if let Some(extra) = object.keys().find(|key| self.field(key).is_none()) {
            return Err(SchemaError::UnknownField {
                field: extra.clone(),
            });
        }

        Ok(object.clone())
    }

    /// Render as a JSON Schema object.
    pub fn to_json_schema(&self) -> Value {
        let mut properties = Map::new();
        for spec in &self.fields {
            let mut prop = spec.kind.json_schema();
            prop["description"] = Value::String(spec.description.clone());
            properties.insert(spec.name.clone(), prop);
        }
        let required: Vec<&str> = self
            .fields
            .iter()
            .filter(|f| f.required)
            .map(|f| f.name.as_str())
            .collect();

        serde_json::json!({
            "type": "object",
            "properties": properties,
            "required": required,
            "additionalProperties": false,
        })
    }
}

/// The JSON type name of a value, for error messages.
pub fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(n) if n.is_f64() => "a decimal number",
        Value::Number(_) => "an integer",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}
