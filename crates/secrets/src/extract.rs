//! Projection of a raw secret payload into a [`ResultMap`]

use crate::{ResultMap, SecretError, SecretMode, SecretRequest, SecureSecret};
use serde_json::{Map, Value};

/// Turn a raw payload into the field map described by `request`.
///
/// - Plaintext: `{output_key: payload}`
/// - JSON with a field: `{field: value}`, the value must be a JSON string
/// - JSON without a field: every top-level string entry; other types are skipped
///
/// # Errors
/// [`SecretError::EmptySecret`] for an empty payload in any mode, and
/// [`SecretError::Parse`], [`SecretError::FieldNotFound`] or
/// [`SecretError::TypeMismatch`] in JSON mode.
pub fn extract(request: &SecretRequest, raw: &SecureSecret) -> Result<ResultMap, SecretError> {
    if raw.is_empty() {
        return Err(SecretError::EmptySecret {
            identifier: request.identifier.clone(),
        });
    }

    match request.mode {
        SecretMode::Plaintext => Ok(ResultMap::from([(
            request.output_key().to_string(),
            raw.expose().to_string(),
        )])),
        SecretMode::Json => {
            let object = parse_object(&request.identifier, raw)?;
            match request.field() {
                Some(field) => extract_field(&request.identifier, object, field),
                None => Ok(string_entries(object)),
            }
        }
    }
}

fn parse_object(identifier: &str, raw: &SecureSecret) -> Result<Map<String, Value>, SecretError> {
    serde_json::from_str(raw.expose()).map_err(|source| SecretError::Parse {
        identifier: identifier.to_string(),
        source,
    })
}

fn extract_field(
    identifier: &str,
    mut object: Map<String, Value>,
    field: &str,
) -> Result<ResultMap, SecretError> {
    let value = object
        .remove(field)
        .ok_or_else(|| SecretError::FieldNotFound {
            identifier: identifier.to_string(),
            field: field.to_string(),
        })?;

    match value {
        Value::String(s) => Ok(ResultMap::from([(field.to_string(), s)])),
        other => Err(SecretError::TypeMismatch {
            identifier: identifier.to_string(),
            field: field.to_string(),
            found: json_type_name(&other),
        }),
    }
}

fn string_entries(object: Map<String, Value>) -> ResultMap {
    object
        .into_iter()
        .filter_map(|(key, value)| match value {
            Value::String(s) => Some((key, s)),
            _ => None,
        })
        .collect()
}

const fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
