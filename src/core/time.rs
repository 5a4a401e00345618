//! Timestamp and id helpers for dispatch tracing and console envelopes.

use serde_json::Value as JsonValue;
use ulid::Ulid;

/// Returns unix-epoch seconds with `Z` suffix (e.g. `1771220592Z`).
pub fn now_epoch_z() -> String {
    use std::time::{SystemTime, UNIX_EPOCH};
    let secs = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs();
    format!("{}Z", secs)
}

/// Correlation id for one dispatch.
pub fn new_event_id() -> String {
    Ulid::new().to_string()
}

/// JSON line describing one feedback message delivered to an actor.
pub fn feedback_envelope(actor: &str, severity: &str, text: &str) -> JsonValue {
    serde_json::json!({
        "envelope_version": "1.0.0",
        "ts": now_epoch_z(),
        "event_id": new_event_id(),
        "actor": actor,
        "severity": severity,
        "text": text,
    })
}
