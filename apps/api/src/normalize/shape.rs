//! Shape contracts and structural validation of parsed model output.

use serde::Serialize;
use serde_json::{Map, Value};

/// Expected top-level kind of a normalized value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ShapeKind {
    Object,
    ArrayOfObjects,
}

impl std::fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ShapeKind::Object => write!(f, "object"),
            ShapeKind::ArrayOfObjects => write!(f, "array of objects"),
        }
    }
}

/// What a caller requires of the model's output: a top-level kind and the
/// keys every object (or every array element) must carry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShapeContract {
    pub kind: ShapeKind,
    pub required_keys: Vec<&'static str>,
}

impl ShapeContract {
    pub fn object(required_keys: &[&'static str]) -> Self {
        Self {
            kind: ShapeKind::Object,
            required_keys: required_keys.to_vec(),
        }
    }

    pub fn array_of_objects(required_keys: &[&'static str]) -> Self {
        Self {
            kind: ShapeKind::ArrayOfObjects,
            required_keys: required_keys.to_vec(),
        }
    }
}

/// Why a parsed value does not satisfy its contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShapeViolation {
    /// `index` is set when an array element, rather than the top-level value, has the wrong kind.
    WrongKind {
        index: Option<usize>,
        expected: ShapeKind,
        found: &'static str,
    },
    /// `index` is set for array contracts and names the first offending element.
    MissingKeys {
        index: Option<usize>,
        keys: Vec<String>,
    },
}

/// Checks `value` against `contract`. Null-valued keys count as present.
pub fn validate(value: &Value, contract: &ShapeContract) -> Result<(), ShapeViolation> {
    match contract.kind {
        ShapeKind::Object => {
            let object = value.as_object().ok_or(ShapeViolation::WrongKind {
                index: None,
                expected: ShapeKind::Object,
                found: json_type_name(value),
            })?;
            let keys = missing_keys(object, &contract.required_keys);
            if keys.is_empty() {
                Ok(())
            } else {
                Err(ShapeViolation::MissingKeys { index: None, keys })
            }
        }
        ShapeKind::ArrayOfObjects => {
            let elements = value.as_array().ok_or(ShapeViolation::WrongKind {
                index: None,
                expected: ShapeKind::ArrayOfObjects,
                found: json_type_name(value),
            })?;
            for (index, element) in elements.iter().enumerate() {
                let object = element.as_object().ok_or(ShapeViolation::WrongKind {
                    index: Some(index),
                    expected: ShapeKind::Object,
                    found: json_type_name(element),
                })?;
                let keys = missing_keys(object, &contract.required_keys);
                if !keys.is_empty() {
                    return Err(ShapeViolation::MissingKeys {
                        index: Some(index),
                        keys,
                    });
                }
            }
            Ok(())
        }
    }
}

fn missing_keys(object: &Map<String, Value>, required: &[&'static str]) -> Vec<String> {
    required
        .iter()
        .filter(|key| !object.contains_key(**key))
        .map(|key| key.to_string())
        .collect()
}

pub(crate) fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
