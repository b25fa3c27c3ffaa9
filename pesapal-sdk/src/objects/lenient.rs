//! Deserializers for vendor fields whose JSON type is not stable.
//!
//! Pesapal reports status codes as strings in some payloads and as numbers
//! in others; these helpers accept both.

use serde::{Deserialize, Deserializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum StringOrNumber {
    String(String),
    Integer(i64),
    Float(f64),
}

/// `Option<String>` from a string, a number, or null.
pub fn optional_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<StringOrNumber>::deserialize(deserializer)?;
    Ok(value.map(|v| match v {
        StringOrNumber::String(s) => s,
        StringOrNumber::Integer(i) => i.to_string(),
        StringOrNumber::Float(f) => f.to_string(),
    }))
}

/// `Option<i64>` from a number, a numeric string, or null.
///
/// Empty or non-numeric strings become `None`.
pub fn optional_code<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<StringOrNumber>::deserialize(deserializer)?;
    Ok(value.and_then(|v| match v {
        StringOrNumber::String(s) => s.trim().parse().ok(),
        StringOrNumber::Integer(i) => Some(i),
        StringOrNumber::Float(f) if f.fract() == 0.0 => Some(f as i64),
        StringOrNumber::Float(_) => None,
    }))
}
