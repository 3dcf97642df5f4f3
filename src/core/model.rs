// PoolWatch - core/model.rs
//
// Core data model types. Pure data definitions with no I/O, no UI,
// no platform dependencies.
//
// These types are the shared vocabulary across all layers.

use crate::util::error::FetchError;
use serde::Serialize;
use serde_json::{Map, Value};
use std::time::Duration;

/// The raw dashboard document as returned by the endpoint.
///
/// Loosely typed at the boundary: every field is optional and may carry
/// any JSON type. Only `core::normalize` reads it.
pub type DashboardDocument = Map<String, Value>;

// =============================================================================
// Metrics and configuration snapshots
// =============================================================================

/// Aggregated usage counters reported by the proxy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub key_count: u64,
    pub model_count: u64,
    pub retry_count: u64,
    pub last_24h_calls: u64,
    pub hourly_calls: u64,
    pub minute_calls: u64,
}

/// Runtime configuration of the proxy as reported by the backend.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ConfigSnapshot {
    pub max_requests_per_minute: u64,
    pub max_requests_per_day_per_ip: u64,
    /// Server-formatted timestamp; opaque to this crate.
    pub current_time: String,
    pub fake_streaming: bool,
    pub fake_streaming_interval: f64,
    pub random_string: bool,
    pub local_version: String,
    pub remote_version: String,
    pub has_update: bool,
}

// =============================================================================
// Key statistics
// =============================================================================

/// Statistics for one pooled API key.
///
/// Opaque: the record is kept exactly as received. Only `model_stats` is
/// interpreted, as the source of model filter names.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct KeyStat(Value);

impl KeyStat {
    pub fn new(raw: Value) -> Self {
        Self(raw)
    }

    /// Look up a top-level field of the record.
    pub fn field(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Display label for the key, if the backend supplied one.
    pub fn api_key(&self) -> Option<&str> {
        self.field("api_key").and_then(Value::as_str)
    }

    /// Per-model counters, when present and shaped as a mapping.
    pub fn model_stats(&self) -> Option<&Map<String, Value>> {
        self.field("model_stats").and_then(Value::as_object)
    }

    /// Names of the models this key has statistics for.
    pub fn model_names(&self) -> impl Iterator<Item = &str> {
        self.model_stats()
            .into_iter()
            .flat_map(|stats| stats.keys().map(String::as_str))
    }

    /// Whether this key has statistics for `model`.
    pub fn has_model(&self, model: &str) -> bool {
        self.model_stats()
            .is_some_and(|stats| stats.contains_key(model))
    }
}

// =============================================================================
// Log entries
// =============================================================================

/// One proxy log record, kept exactly as received.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct LogEntry(Value);

impl LogEntry {
    pub fn new(raw: Value) -> Self {
        Self(raw)
    }

    pub fn field(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// The `message` field, when the backend sent a string.
    pub fn message(&self) -> Option<&str> {
        self.field("message").and_then(Value::as_str)
    }
}

// =============================================================================
// Refresh messages (background thread -> owning thread)
// =============================================================================

/// Result of one background refresh, sent over the refresh channel.
#[derive(Debug)]
pub enum RefreshOutcome {
    /// The document arrived and parsed as a JSON object.
    Completed {
        document: DashboardDocument,
        elapsed: Duration,
    },

    /// The refresh failed; state must be left untouched.
    Failed { error: FetchError },
}
