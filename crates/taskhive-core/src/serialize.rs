use crate::error::CoreError;
use crate::state::AppState;
use std::collections::BTreeMap;

/// Encode the whole state as JSON with object keys sorted at every level,
/// so equal states always produce identical text.
pub fn encode_snapshot(state: &AppState, pretty: bool) -> Result<String, CoreError> {
    let value = sort_value(serde_json::to_value(state)?);
    let text = if pretty {
        serde_json::to_string_pretty(&value)?
    } else {
        serde_json::to_string(&value)?
    };
    Ok(text)
}

/// Decode a snapshot. Fields missing from older snapshots take defaults.
pub fn decode_snapshot(text: &str) -> Result<AppState, CoreError> {
    Ok(serde_json::from_str(text)?)
}

fn sort_value(v: serde_json::Value) -> serde_json::Value {
    match v {
        serde_json::Value::Object(map) => map
            .into_iter()
            .map(|(k, v)| (k, sort_value(v)))
            .collect::<BTreeMap<_, _>>()
            .into_iter()
            .collect::<serde_json::Map<_, _>>()
            .into(),
        serde_json::Value::Array(arr) => arr.into_iter().map(sort_value).collect(),
        other => other,
    }
}
