// PoolWatch - core/normalize.rs
//
// Maps the loosely typed dashboard document onto strongly shaped snapshots.
// Core layer: pure logic, no I/O or UI dependencies.
//
// Default substitution is falsy-coalescing: a field that is absent, null,
// 0, false, or "" takes its default. A genuine 0 or false from the backend
// is therefore indistinguishable from "absent". The backend and the
// existing web dashboard both rely on this, so it is kept as a business
// rule and isolated in `is_truthy` / `truthy_field`.

use crate::core::model::{ConfigSnapshot, DashboardDocument, KeyStat, LogEntry, MetricsSnapshot};
use serde_json::Value;

/// The parts of a dashboard document that the state applies.
///
/// `key_stats` and `logs` are `None` when the document did not carry the
/// collection, which means "leave the current list alone".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DashboardUpdate {
    pub metrics: MetricsSnapshot,
    pub config: ConfigSnapshot,
    pub key_stats: Option<Vec<KeyStat>>,
    pub logs: Option<Vec<LogEntry>>,
}

/// Truthiness test used for default substitution.
///
/// Rejects null, false, numeric zero (and NaN), and the empty string.
/// Arrays and objects are truthy even when empty.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// The field's value, or `None` when it is missing or falsy.
fn truthy_field<'a>(doc: &'a DashboardDocument, key: &str) -> Option<&'a Value> {
    doc.get(key).filter(|v| is_truthy(v))
}

/// Non-negative integer field, default 0.
fn read_count(doc: &DashboardDocument, key: &str) -> u64 {
    let Some(value) = truthy_field(doc, key) else {
        return 0;
    };
    if let Some(n) = value.as_u64() {
        return n;
    }
    match value.as_f64() {
        Some(f) if f.is_finite() && f > 0.0 => f.trunc() as u64,
        _ => {
            tracing::debug!(field = key, value = %value, "Expected a non-negative integer; using default");
            0
        }
    }
}

/// Numeric field, default 0.0.
fn read_number(doc: &DashboardDocument, key: &str) -> f64 {
    match truthy_field(doc, key).and_then(Value::as_f64) {
        Some(f) => f,
        None => {
            if let Some(value) = truthy_field(doc, key) {
                tracing::debug!(field = key, value = %value, "Expected a number; using default");
            }
            0.0
        }
    }
}

/// Boolean field, default false. Any truthy value reads as true.
fn read_flag(doc: &DashboardDocument, key: &str) -> bool {
    truthy_field(doc, key).is_some()
}

/// String field, default "". Scalars are rendered as text.
fn read_text(doc: &DashboardDocument, key: &str) -> String {
    match truthy_field(doc, key) {
        Some(Value::String(s)) => s.clone(),
        Some(v @ (Value::Number(_) | Value::Bool(_))) => v.to_string(),
        Some(v) => {
            tracing::debug!(field = key, value = %v, "Expected a string; using default");
            String::new()
        }
        None => String::new(),
    }
}

/// A collection field: `Some` only when present as an array.
///
/// A present-but-malformed collection is ignored (treated as absent) so a
/// bad sub-field never rejects the rest of the document.
fn read_collection<'a>(doc: &'a DashboardDocument, key: &str) -> Option<&'a Vec<Value>> {
    match truthy_field(doc, key)? {
        Value::Array(items) => Some(items),
        other => {
            tracing::warn!(
                field = key,
                found = json_type_name(other),
                "Expected an array; leaving current list unchanged"
            );
            None
        }
    }
}

/// Build the metrics snapshot from the document.
pub fn metrics_from(doc: &DashboardDocument) -> MetricsSnapshot {
    MetricsSnapshot {
        key_count: read_count(doc, "key_count"),
        model_count: read_count(doc, "model_count"),
        retry_count: read_count(doc, "retry_count"),
        last_24h_calls: read_count(doc, "last_24h_calls"),
        hourly_calls: read_count(doc, "hourly_calls"),
        minute_calls: read_count(doc, "minute_calls"),
    }
}

/// Build the configuration snapshot from the document.
pub fn config_from(doc: &DashboardDocument) -> ConfigSnapshot {
    ConfigSnapshot {
        max_requests_per_minute: read_count(doc, "max_requests_per_minute"),
        max_requests_per_day_per_ip: read_count(doc, "max_requests_per_day_per_ip"),
        current_time: read_text(doc, "current_time"),
        fake_streaming: read_flag(doc, "fake_streaming"),
        fake_streaming_interval: read_number(doc, "fake_streaming_interval"),
        random_string: read_flag(doc, "random_string"),
        local_version: read_text(doc, "local_version"),
        remote_version: read_text(doc, "remote_version"),
        has_update: read_flag(doc, "has_update"),
    }
}

/// Normalise a whole document. Never fails: malformed optional fields fall
/// back to their defaults.
pub fn normalize_document(doc: &DashboardDocument) -> DashboardUpdate {
    let key_stats = read_collection(doc, "api_key_stats")
        .map(|items| items.iter().cloned().map(KeyStat::new).collect());
    let logs = read_collection(doc, "logs")
        .map(|items| items.iter().cloned().map(LogEntry::new).collect());

    DashboardUpdate {
        metrics: metrics_from(doc),
        config: config_from(doc),
        key_stats,
        logs,
    }
}

/// Human-readable JSON type name for diagnostics.
pub fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(value: Value) -> DashboardDocument {
        match value {
            Value::Object(map) => map,
            other => panic!("test document must be an object, got {other}"),
        }
    }

    #[test]
    fn test_truthiness() {
        assert!(!is_truthy(&json!(null)));
        assert!(!is_truthy(&json!(false)));
        assert!(!is_truthy(&json!(0)));
        assert!(!is_truthy(&json!(0.0)));
        assert!(!is_truthy(&json!("")));
        assert!(is_truthy(&json!(true)));
        assert!(is_truthy(&json!(-1)));
        assert!(is_truthy(&json!("0")));
        assert!(is_truthy(&json!([])));
        assert!(is_truthy(&json!({})));
    }

    #[test]
    fn test_empty_document_yields_defaults() {
        let update = normalize_document(&DashboardDocument::new());
        assert_eq!(update.metrics, MetricsSnapshot::default());
        assert_eq!(update.config, ConfigSnapshot::default());
        assert!(update.key_stats.is_none());
        assert!(update.logs.is_none());
    }

    #[test]
    fn test_falsy_values_yield_defaults() {
        // Explicit zeros, falses, empty strings and nulls are all treated as absent.
        let update = normalize_document(&doc(json!({
            "key_count": 0,
            "model_count": null,
            "retry_count": false,
            "last_24h_calls": "",
            "hourly_calls": 0,
            "minute_calls": null,
            "max_requests_per_minute": 0,
            "max_requests_per_day_per_ip": null,
            "current_time": "",
            "fake_streaming": false,
            "fake_streaming_interval": 0,
            "random_string": null,
            "local_version": "",
            "remote_version": null,
            "has_update": 0
        })));
        assert_eq!(update.metrics, MetricsSnapshot::default());
        assert_eq!(update.config, ConfigSnapshot::default());
    }

    #[test]
    fn test_present_values_are_read() {
        let update = normalize_document(&doc(json!({
            "key_count": 12,
            "model_count": 4,
            "retry_count": 3,
            "last_24h_calls": 1500,
            "hourly_calls": 80,
            "minute_calls": 2,
            "max_requests_per_minute": 30,
            "max_requests_per_day_per_ip": 600,
            "current_time": "2026-10-18 09:30:00",
            "fake_streaming": true,
            "fake_streaming_interval": 5.5,
            "random_string": true,
            "local_version": "0.2.1",
            "remote_version": "0.3.0",
            "has_update": true
        })));
        assert_eq!(
            update.metrics,
            MetricsSnapshot {
                key_count: 12,
                model_count: 4,
                retry_count: 3,
                last_24h_calls: 1500,
                hourly_calls: 80,
                minute_calls: 2,
            }
        );
        assert_eq!(update.config.max_requests_per_minute, 30);
        assert_eq!(update.config.max_requests_per_day_per_ip, 600);
        assert_eq!(update.config.current_time, "2026-10-18 09:30:00");
        assert!(update.config.fake_streaming);
        assert_eq!(update.config.fake_streaming_interval, 5.5);
        assert!(update.config.random_string);
        assert_eq!(update.config.local_version, "0.2.1");
        assert_eq!(update.config.remote_version, "0.3.0");
        assert!(update.config.has_update);
    }

    #[test]
    fn test_wrong_types_fall_back_without_error() {
        let update = normalize_document(&doc(json!({
            "key_count": -5,
            "model_count": "many",
            "hourly_calls": 7.9,
            "fake_streaming_interval": "fast",
            "fake_streaming": "yes",
            "local_version": 2,
            "remote_version": { "tag": "v1" }
        })));
        assert_eq!(update.metrics.key_count, 0);
        assert_eq!(update.metrics.model_count, 0);
        assert_eq!(update.metrics.hourly_calls, 7);
        assert_eq!(update.config.fake_streaming_interval, 0.0);
        assert!(update.config.fake_streaming);
        assert_eq!(update.config.local_version, "2");
        assert_eq!(update.config.remote_version, "");
    }

    #[test]
    fn test_collections_present_even_when_empty() {
        let update = normalize_document(&doc(json!({ "api_key_stats": [], "logs": [] })));
        assert_eq!(update.key_stats, Some(Vec::new()));
        assert_eq!(update.logs, Some(Vec::new()));
    }

    #[test]
    fn test_null_or_malformed_collections_are_absent() {
        let update = normalize_document(&doc(json!({ "api_key_stats": null, "logs": "oops" })));
        assert!(update.key_stats.is_none());
        assert!(update.logs.is_none());
    }

    #[test]
    fn test_logs_keep_order() {
        let update = normalize_document(&doc(json!({
            "logs": [{ "message": "first" }, { "message": "second" }, { "message": "third" }]
        })));
        let messages: Vec<_> = update
            .logs
            .unwrap()
            .iter()
            .map(|l| l.message().unwrap().to_string())
            .collect();
        assert_eq!(messages, ["first", "second", "third"]);
    }
}
