//! Loose value coercion for checkbox-style inputs and output labels.

use serde_json::Value;

/// String forms that count as `true`, compared after trimming and lowercasing.
const TRUTHY: &[&str] = &["1", "true", "t", "yes", "y", "on"];

/// Interpret a loosely-typed value as a boolean.
///
/// Booleans are taken as-is. Numbers and strings are rendered to text and
/// matched against [`TRUTHY`]. Everything else, including `null`, is `false`.
pub fn is_truthy(value: &Value) -> bool {
  match value {
    Value::Bool(b) => *b,
    Value::Number(n) => TRUTHY.contains(&n.to_string().as_str()),
    Value::String(s) => TRUTHY.contains(&s.trim().to_lowercase().as_str()),
    _ => false,
  }
}

/// Replace every character outside `[A-Za-z0-9_-]` with `_`.
pub fn sanitize_label(label: &str) -> String {
  label
    .chars()
    .map(|c| {
      if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
        c
      } else {
        '_'
      }
    })
    .collect()
}
