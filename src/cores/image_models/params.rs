use serde_json::{Map, Value};

/// Per-request parameters: model defaults overlaid with caller overrides.
pub type EffectiveParameters = Map<String, Value>;

// Request fields that select the model and carry the prompt are not overrides.
const RESERVED_FIELDS: [&str; 2] = ["model", "prompt"];

/// Overlays `overrides` onto `defaults`, last write wins per key.
///
/// Keys only in `defaults` keep their position, new keys are appended.
/// No coercion is applied; a bad value only shows up as a remote failure.
pub fn merge(defaults: &Map<String, Value>, overrides: &Map<String, Value>) -> EffectiveParameters {
    let mut effective = defaults.clone();
    for (key, value) in overrides {
        effective.insert(key.clone(), value.clone());
    }
    effective
}

/// The caller-supplied overrides carried by a generation request.
pub fn overrides_from_request(fields: &Map<String, Value>) -> Map<String, Value> {
    fields
        .iter()
        .filter(|(key, _)| !RESERVED_FIELDS.contains(&key.as_str()))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
}

// Mirrors the loose truthiness remote spaces were first wired against:
// null, false, 0 and "" all count as "not provided".
pub fn is_truthy(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().map(|f| f != 0.0 && !f.is_nan()).unwrap_or(true),
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Array(_)) | Some(Value::Object(_)) => true,
    }
}
