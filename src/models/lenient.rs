//! Forgiving deserializers for assessment and catalog payloads.
//!
//! Questionnaire answers arrive from forms and older catalog exports, so a
//! numeric field may be a number, a numeric string, or junk. Junk becomes
//! `None` instead of failing the whole payload.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Non-negative finite number, from a JSON number or numeric string
pub fn number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
  D: Deserializer<'de>,
{
  let value = Value::deserialize(deserializer)?;
  let parsed = match value {
    Value::Number(n) => n.as_f64(),
    Value::String(s) => s.trim().parse::<f64>().ok(),
    _ => None,
  };
  Ok(parsed.filter(|v| v.is_finite() && *v >= 0.0))
}

/// Signed integer, from a JSON number or numeric string. Fractions truncate.
pub fn integer<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
  D: Deserializer<'de>,
{
  let value = Value::deserialize(deserializer)?;
  let parsed = match value {
    Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f.trunc() as i64)),
    Value::String(s) => {
      let s = s.trim();
      s.parse::<i64>()
        .ok()
        .or_else(|| s.parse::<f64>().ok().filter(|f| f.is_finite()).map(|f| f.trunc() as i64))
    }
    _ => None,
  };
  Ok(parsed)
}

/// Non-empty trimmed string; anything else is absent
pub fn text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
  D: Deserializer<'de>,
{
  let value = Value::deserialize(deserializer)?;
  Ok(match value {
    Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
    _ => None,
  })
}

/// Boolean flag: true/false, "yes"/"no", "true"/"false", 1/0
pub fn flag<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
  D: Deserializer<'de>,
{
  let value = Value::deserialize(deserializer)?;
  Ok(match value {
    Value::Bool(b) => Some(b),
    Value::Number(n) => n.as_f64().map(|f| f != 0.0),
    Value::String(s) => match s.trim().to_lowercase().as_str() {
      "yes" | "y" | "true" | "1" => Some(true),
      "no" | "n" | "false" | "0" => Some(false),
      _ => None,
    },
    _ => None,
  })
}

/// List of strings: a JSON array (non-strings dropped) or a comma-separated string
pub fn string_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
  D: Deserializer<'de>,
{
  let value = Value::deserialize(deserializer)?;
  let items: Vec<String> = match value {
    Value::Array(items) => items
      .into_iter()
      .filter_map(|item| match item {
        Value::String(s) => Some(s),
        _ => None,
      })
      .collect(),
    Value::String(s) => s.split(',').map(str::to_string).collect(),
    _ => Vec::new(),
  };
  Ok(
    items
      .into_iter()
      .map(|s| s.trim().to_string())
      .filter(|s| !s.is_empty())
      .collect(),
  )
}
