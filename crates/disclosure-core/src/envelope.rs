/// Provenance envelopes around disclosable leaf values.
///
/// Every restrictable leaf of a subject record is stored as
/// `{ "value": T, "metadata": { "source": ..., "verified": ..., ... } }`.
/// Masking replaces `value` with [`REDACTED`] and keeps `metadata` intact, so a
/// viewer can tell that a field exists and where it came from without seeing
/// it. A bare (non-enveloped) value cannot be masked; a rule that addresses one
/// removes it instead.
use serde_json::Value;

use crate::payload::JsonObject;

/// Sentinel that replaces the `value` of a masked envelope.
pub const REDACTED: &str = "REDACTED";

/// Key holding the wrapped value.
pub const VALUE_KEY: &str = "value";

/// Key holding the provenance metadata object.
pub const METADATA_KEY: &str = "metadata";

/// `metadata.source` value for values written by the engine itself.
pub const SYSTEM_SOURCE: &str = "system";

/// Returns `true` if `value` is an object carrying a `value` key and a
/// `metadata` object.
pub fn is_envelope(value: &Value) -> bool {
    match value.as_object() {
        Some(map) => {
            map.contains_key(VALUE_KEY)
                && map.get(METADATA_KEY).and_then(Value::as_object).is_some()
        }
        None => false,
    }
}

/// Returns a copy of `envelope` with its `value` replaced by [`REDACTED`].
///
/// Every other key (metadata included) is preserved. Callers must check
/// [`is_envelope`] first; a non-object input is returned unchanged.
pub fn mask_envelope(envelope: &Value) -> Value {
    match envelope.as_object() {
        Some(map) => {
            let mut masked = map.clone();
            masked.insert(VALUE_KEY.to_owned(), Value::from(REDACTED));
            Value::Object(masked)
        }
        None => envelope.clone(),
    }
}

/// Returns `true` if the envelope is masked already.
pub fn is_masked(envelope: &Value) -> bool {
    envelope.get(VALUE_KEY).and_then(Value::as_str) == Some(REDACTED)
}

/// Returns `true` if the envelope's metadata marks it as written by the engine.
pub fn is_system_sourced(envelope: &Value) -> bool {
    envelope
        .get(METADATA_KEY)
        .and_then(|m| m.get("source"))
        .and_then(Value::as_str)
        == Some(SYSTEM_SOURCE)
}

/// Wraps `value` in an envelope tagged as system-sourced and verified.
pub fn system_envelope(value: impl Into<String>) -> Value {
    let mut metadata = JsonObject::new();
    metadata.insert("source".to_owned(), Value::from(SYSTEM_SOURCE));
    metadata.insert("verified".to_owned(), Value::from(true));

    let mut map = JsonObject::new();
    map.insert(VALUE_KEY.to_owned(), Value::String(value.into()));
    map.insert(METADATA_KEY.to_owned(), Value::Object(metadata));
    Value::Object(map)
}
