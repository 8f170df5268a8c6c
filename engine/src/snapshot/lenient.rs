//! Field-level deserializers that never fail.
//!
//! Collectors are loosely typed: numbers arrive as strings, optional fields
//! arrive as `null`, lists arrive as objects. These helpers accept any JSON
//! value and fall back to the field default instead of rejecting the whole
//! document.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Finite number from a JSON number or a numeric string.
pub fn as_number(v: &Value) -> Option<f64> {
    let n = match v {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    n.filter(|x| x.is_finite())
}

pub fn as_string(v: &Value) -> Option<String> {
    match v {
        Value::String(s) => Some(s.clone()),
        _ => None,
    }
}

pub fn number<'de, D>(d: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(as_number(&Value::deserialize(d)?))
}

pub fn string<'de, D>(d: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(d)? {
        Value::String(s) => Ok(Some(s)),
        _ => Ok(None),
    }
}

pub fn list<'de, D>(d: D) -> Result<Vec<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(d)? {
        Value::Array(items) => Ok(items),
        _ => Ok(Vec::new()),
    }
}
