//! Validation of tool arguments against a JSON-schema-shaped declaration.
//!
//! Only the structural subset tools actually declare is understood: `type`
//! (a single name or a list of names), `properties`, `required`, `items` and
//! `enum`. Unknown keywords are ignored, and an empty schema accepts anything.

use parley_core::{ParleyError, ParleyResult};
use serde_json::Value;

/// Check `value` against `schema`.
///
/// On mismatch returns [`ParleyError::Validation`] naming the JSON path of the
/// first offending value, e.g. `$.a: expected number, got string`.
pub fn validate(schema: &Value, value: &Value) -> ParleyResult<()> {
    validate_at(schema, value, "$")
}

fn validate_at(schema: &Value, value: &Value, path: &str) -> ParleyResult<()> {
    let Some(schema) = schema.as_object() else {
        return Ok(());
    };

    if let Some(expected) = schema.get("type") {
        check_type(expected, value, path)?;
    }

    if let Some(allowed) = schema.get("enum").and_then(Value::as_array) {
        if !allowed.contains(value) {
            return Err(ParleyError::Validation(format!(
                "{path}: value {value} is not one of the allowed values"
            )));
        }
    }

    if let Some(object) = value.as_object() {
        if let Some(required) = schema.get("required").and_then(Value::as_array) {
            for key in required.iter().filter_map(Value::as_str) {
                if !object.contains_key(key) {
                    return Err(ParleyError::Validation(format!(
                        "{path}: missing required property '{key}'"
                    )));
                }
            }
        }

        if let Some(properties) = schema.get("properties").and_then(Value::as_object) {
            for (key, sub_schema) in properties {
                if let Some(field) = object.get(key) {
                    validate_at(sub_schema, field, &format!("{path}.{key}"))?;
                }
            }
        }
    }

    if let (Some(items), Some(array)) = (schema.get("items"), value.as_array()) {
        for (i, item) in array.iter().enumerate() {
            validate_at(items, item, &format!("{path}[{i}]"))?;
        }
    }

    Ok(())
}

fn check_type(expected: &Value, value: &Value, path: &str) -> ParleyResult<()> {
    let names: Vec<&str> = match expected {
        Value::String(name) => vec![name.as_str()],
        Value::Array(names) => names.iter().filter_map(Value::as_str).collect(),
        _ => return Ok(()),
    };

    if names.iter().any(|name| matches_type(name, value)) {
        return Ok(());
    }

    Err(ParleyError::Validation(format!(
        "{path}: expected {}, got {}",
        names.join(" or "),
        type_name(value)
    )))
}

fn matches_type(name: &str, value: &Value) -> bool {
    match name {
        "object" => value.is_object(),
        "array" => value.is_array(),
        "string" => value.is_string(),
        "boolean" => value.is_boolean(),
        "null" => value.is_null(),
        "number" => value.is_number(),
        "integer" => {
            value.is_i64()
                || value.is_u64()
                || value.as_f64().is_some_and(|f| f.is_finite() && f.fract() == 0.0)
        }
        // Unknown type names are not ours to enforce.
        _ => true,
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
