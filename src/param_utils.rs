//! Parameter normalization utilities for dioxus-api-hooks
//!
//! Cache entries and poll dependency lists are compared structurally: two
//! parameter values are the same when their serialized forms are the same.
//! [`ParamKey`] produces that serialized form deterministically, independent of
//! the iteration order of maps inside the value.

use serde::Serialize;
use serde_json::Value;

/// Deterministic structural key for a parameter value.
///
/// Object keys are emitted in sorted order, so `{"b":1,"a":2}` and
/// `{"a":2,"b":1}` produce the same key even when built from a `HashMap`.
///
/// ```rust
/// use dioxus_api_hooks::param_utils::ParamKey;
/// use std::collections::HashMap;
///
/// let mut first = HashMap::new();
/// first.insert("id", 1);
/// first.insert("page", 2);
/// let mut second = HashMap::new();
/// second.insert("page", 2);
/// second.insert("id", 1);
///
/// assert_eq!(ParamKey::of(&first).unwrap(), ParamKey::of(&second).unwrap());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ParamKey(String);

impl ParamKey {
    /// Build the key for any serializable value.
    pub fn of<P: Serialize + ?Sized>(params: &P) -> Result<Self, serde_json::Error> {
        let value = serde_json::to_value(params)?;
        let mut out = String::new();
        write_canonical(&value, &mut out);
        Ok(Self(out))
    }

    /// The canonical serialized form.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ParamKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

fn write_canonical(value: &Value, out: &mut String) {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<_> = map.iter().collect();
            entries.sort_by(|(a, _), (b, _)| a.cmp(b));
            out.push('{');
            for (index, (key, value)) in entries.into_iter().enumerate() {
                if index > 0 {
                    out.push(',');
                }
                out.push_str(&Value::String(key.clone()).to_string());
                out.push(':');
                write_canonical(value, out);
            }
            out.push('}');
        }
        Value::Array(items) => {
            out.push('[');
            for (index, item) in items.iter().enumerate() {
                if index > 0 {
                    out.push(',');
                }
                write_canonical(item, out);
            }
            out.push(']');
        }
        scalar => out.push_str(&scalar.to_string()),
    }
}
