//! Conversions of a secret payload into the shapes callers ask for.

use crate::{error::VaultResult, logical::SecretData};
use serde_json::Value;
use std::collections::HashMap;

/// Encode the payload as JSON bytes.
///
/// # Errors
///
/// Returns [`VaultError::Serialization`](crate::VaultError::Serialization)
/// if encoding fails.
pub fn to_json(data: &SecretData) -> VaultResult<Vec<u8>> {
    Ok(serde_json::to_vec(data)?)
}

/// Render every value in its default text form and store the bytes.
///
/// This is lossy: `5432` and `"5432"` both become `b"5432"`. Keys are kept
/// exactly.
#[must_use]
pub fn to_byte_map(data: &SecretData) -> HashMap<String, Vec<u8>> {
    data.iter()
        .map(|(key, value)| (key.clone(), display_value(value).into_bytes()))
        .collect()
}

/// Default text form of a payload value.
///
/// Strings are written verbatim, `null` as `<nil>`, arrays as `[a b]` and
/// objects as `map[k:v]` with keys in sorted order.
#[must_use]
pub fn display_value(value: &Value) -> String {
    let mut out = String::new();
    write_value(&mut out, value);
    out
}

fn write_value(out: &mut String, value: &Value) {
    match value {
        Value::Null => out.push_str("<nil>"),
        Value::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
        Value::Number(n) => out.push_str(&n.to_string()),
        Value::String(s) => out.push_str(s),
        Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(' ');
                }
                write_value(out, item);
            }
            out.push(']');
        }
        Value::Object(map) => {
            let mut entries: Vec<_> = map.iter().collect();
            entries.sort_by(|a, b| a.0.cmp(b.0));

            out.push_str("map[");
            for (i, (key, item)) in entries.into_iter().enumerate() {
                if i > 0 {
                    out.push(' ');
                }
                out.push_str(key);
                out.push(':');
                write_value(out, item);
            }
            out.push(']');
        }
    }
}
