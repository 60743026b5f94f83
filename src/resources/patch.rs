//! Sparse update payloads.
//!
//! An update body is reduced to the fields the client actually sent. A field
//! that was omitted never appears in the forwarded body, while a field sent
//! with a default-looking value (`0`, `""`, `null`) is kept as set.

use serde::Serialize;
use serde_json::{Map, Value};

/// JSON type accepted for a patchable field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Integer,
}

impl FieldKind {
    fn accepts(self, value: &Value) -> bool {
        match self {
            FieldKind::Text => value.is_string(),
            FieldKind::Integer => value.is_i64() || value.is_u64(),
        }
    }

    fn describe(self) -> &'static str {
        match self {
            FieldKind::Text => "a string",
            FieldKind::Integer => "an integer",
        }
    }
}

/// The fields a resource allows in an update.
#[derive(Debug, Clone, Copy)]
pub struct PatchSchema {
    fields: &'static [(&'static str, FieldKind)],
}

impl PatchSchema {
    pub const fn new(fields: &'static [(&'static str, FieldKind)]) -> Self {
        Self { fields }
    }

    /// Validate `body` and keep only the known fields that are present.
    /// Unknown fields are ignored; known fields must have the declared type
    /// or be `null`.
    pub fn parse(&self, body: Value) -> Result<Patch, String> {
        let Value::Object(mut object) = body else {
            return Err("update body must be a JSON object".to_string());
        };

        let mut fields = Map::new();
        let mut problems = Vec::new();
        for (name, kind) in self.fields {
            let Some(value) = object.remove(*name) else {
                continue;
            };
            if value.is_null() || kind.accepts(&value) {
                fields.insert((*name).to_string(), value);
            } else {
                problems.push(format!("field '{}' must be {}", name, kind.describe()));
            }
        }

        if problems.is_empty() {
            Ok(Patch { fields })
        } else {
            Err(problems.join("; "))
        }
    }
}

/// Field name → explicitly provided value.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Patch {
    fields: Map<String, Value>,
}

impl Patch {
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.fields)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const SCHEMA: PatchSchema = PatchSchema::new(&[
        ("name", FieldKind::Text),
        ("age", FieldKind::Integer),
        ("email", FieldKind::Text),
    ]);

    #[test]
    fn test_only_present_fields_survive() {
        let patch = SCHEMA.parse(json!({"age": 21})).unwrap();
        assert_eq!(patch.len(), 1);
        assert!(!patch.contains("name"));
        assert_eq!(patch.into_value(), json!({"age": 21}));
    }

    #[test]
    fn test_default_values_are_kept() {
        let patch = SCHEMA.parse(json!({"age": 0, "name": "", "email": null})).unwrap();
        assert_eq!(patch.get("age"), Some(&json!(0)));
        assert_eq!(patch.get("name"), Some(&json!("")));
        assert_eq!(patch.get("email"), Some(&Value::Null));
    }

    #[test]
    fn test_unknown_fields_dropped() {
        let patch = SCHEMA.parse(json!({"age": 30, "role": "admin"})).unwrap();
        assert_eq!(patch.into_value(), json!({"age": 30}));
    }

    #[test]
    fn test_type_mismatch() {
        let err = SCHEMA.parse(json!({"age": "twenty", "name": 7})).unwrap_err();
        assert!(err.contains("field 'name' must be a string"));
        assert!(err.contains("field 'age' must be an integer"));

        assert!(SCHEMA.parse(json!({"age": 20.5})).is_err());
    }

    #[test]
    fn test_non_object_body() {
        assert!(SCHEMA.parse(json!([1, 2])).is_err());
        assert!(SCHEMA.parse(Value::Null).is_err());
    }

    #[test]
    fn test_empty_patch() {
        let patch = SCHEMA.parse(json!({})).unwrap();
        assert!(patch.is_empty());
        assert_eq!(serde_json::to_string(&patch).unwrap(), "{}");
    }
}
