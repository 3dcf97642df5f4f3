// PoolWatch - app/state.rs
//
// Dashboard state: the metrics and configuration snapshots, key statistics,
// log entries, and UI selection state. Owned by `DashboardStore`; mutated
// only on the owning thread.

use crate::core::export::SnapshotView;
use crate::core::filter;
use crate::core::model::{ConfigSnapshot, KeyStat, LogEntry, MetricsSnapshot};
use crate::core::normalize::DashboardUpdate;
use crate::util::constants::ALL_MODELS;
use chrono::{DateTime, Utc};

/// Every dashboard state group.
#[derive(Debug, Clone)]
pub struct DashboardState {
    /// Usage counters from the last successful refresh.
    pub status: MetricsSnapshot,

    /// Proxy configuration from the last successful refresh.
    pub config: ConfigSnapshot,

    /// Per-key statistics, replaced wholesale.
    pub api_key_stats: Vec<KeyStat>,

    /// Log entries in backend order, replaced wholesale.
    pub logs: Vec<LogEntry>,

    /// Selectable model filters; always contains `"all"`.
    pub available_models: Vec<String>,

    /// Active model filter.
    pub selected_model: String,

    /// Dark-mode preference.
    pub is_dark_mode: bool,

    /// True exactly while a refresh is in flight.
    pub is_refreshing: bool,

    /// When the last successful refresh was applied.
    pub last_refreshed: Option<DateTime<Utc>>,

    /// Message of the most recent refresh failure, cleared on success.
    pub last_error: Option<String>,
}

impl DashboardState {
    /// Initial state: zero snapshots, empty lists, only `"all"` available
    /// and selected.
    pub fn new(is_dark_mode: bool) -> Self {
        Self {
            status: MetricsSnapshot::default(),
            config: ConfigSnapshot::default(),
            api_key_stats: Vec::new(),
            logs: Vec::new(),
            available_models: vec![ALL_MODELS.to_string()],
            selected_model: ALL_MODELS.to_string(),
            is_dark_mode,
            is_refreshing: false,
            last_refreshed: None,
            last_error: None,
        }
    }

    /// Apply a normalised document.
    ///
    /// Snapshots are always replaced. Key statistics (with the derived model
    /// list and selection check) and logs are replaced only when the document
    /// carried them.
    pub fn apply_update(&mut self, update: DashboardUpdate) {
        self.status = update.metrics;
        self.config = update.config;

        if let Some(stats) = update.key_stats {
            self.available_models = filter::available_models(&stats);
            self.api_key_stats = stats;

            if let Some(reset) =
                filter::revalidate_selection(&self.selected_model, &self.available_models)
            {
                tracing::info!(
                    previous = %self.selected_model,
                    "Selected model no longer available; resetting filter"
                );
                self.selected_model = reset;
            }
        }

        if let Some(logs) = update.logs {
            self.logs = logs;
        }

        self.last_refreshed = Some(Utc::now());
        self.last_error = None;
    }

    /// Set the model filter. No membership check: a selection may be made
    /// before the data that contains it arrives.
    pub fn set_selected_model(&mut self, name: impl Into<String>) {
        self.selected_model = name.into();
    }

    /// Key statistics matching the active model filter.
    pub fn selected_key_stats(&self) -> Vec<&KeyStat> {
        filter::stats_for_model(&self.api_key_stats, &self.selected_model)
    }

    /// Borrowed view of the state for rendering or export.
    pub fn snapshot(&self) -> SnapshotView<'_> {
        SnapshotView {
            status: &self.status,
            config: &self.config,
            api_key_stats: &self.api_key_stats,
            logs: &self.logs,
            available_models: &self.available_models,
            selected_model: &self.selected_model,
            is_dark_mode: self.is_dark_mode,
            is_refreshing: self.is_refreshing,
            last_refreshed: self.last_refreshed,
        }
    }
}

impl Default for DashboardState {
    fn default() -> Self {
        Self::new(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::normalize::normalize_document;
    use serde_json::{json, Value};

    fn update(value: Value) -> DashboardUpdate {
        match value {
            Value::Object(map) => normalize_document(&map),
            other => panic!("expected object, got {other}"),
        }
    }

    fn stats_doc(models: &[&[&str]]) -> Value {
        let stats: Vec<Value> = models
            .iter()
            .map(|names| {
                let map: serde_json::Map<String, Value> =
                    names.iter().map(|n| (n.to_string(), json!({}))).collect();
                json!({ "model_stats": map })
            })
            .collect();
        json!({ "key_count": stats.len(), "api_key_stats": stats })
    }

    #[test]
    fn test_initial_state() {
        let state = DashboardState::new(true);
        assert_eq!(state.status, MetricsSnapshot::default());
        assert_eq!(state.config, ConfigSnapshot::default());
        assert!(state.api_key_stats.is_empty());
        assert!(state.logs.is_empty());
        assert_eq!(state.available_models, vec!["all".to_string()]);
        assert_eq!(state.selected_model, "all");
        assert!(state.is_dark_mode);
        assert!(!state.is_refreshing);
        assert!(state.last_refreshed.is_none());
    }

    #[test]
    fn test_selection_reset_when_model_disappears() {
        let mut state = DashboardState::default();
        state.apply_update(update(stats_doc(&[&["gpt-4"], &["claude"]])));
        state.set_selected_model("gpt-4");

        state.apply_update(update(stats_doc(&[&["claude"]])));
        assert_eq!(state.selected_model, "all");
    }

    #[test]
    fn test_selection_kept_when_model_still_present() {
        let mut state = DashboardState::default();
        state.set_selected_model("gpt-4");

        state.apply_update(update(stats_doc(&[&["gpt-4", "claude"], &["gemini"]])));
        assert_eq!(state.selected_model, "gpt-4");
        assert_eq!(state.available_models.len(), 4);
    }

    #[test]
    fn test_missing_key_stats_preserves_stats_models_and_selection() {
        let mut state = DashboardState::default();
        state.apply_update(update(stats_doc(&[&["gpt-4"]])));
        state.set_selected_model("gpt-4");
        let stats_before = state.api_key_stats.clone();
        let models_before = state.available_models.clone();

        state.apply_update(update(json!({ "key_count": 9 })));

        assert_eq!(state.status.key_count, 9);
        assert_eq!(state.api_key_stats, stats_before);
        assert_eq!(state.available_models, models_before);
        assert_eq!(state.selected_model, "gpt-4");
    }

    #[test]
    fn test_snapshots_replaced_wholesale() {
        let mut state = DashboardState::default();
        state.apply_update(update(json!({ "key_count": 5, "hourly_calls": 40, "has_update": true })));
        // A later document without those fields resets them to defaults.
        state.apply_update(update(json!({ "minute_calls": 1 })));

        assert_eq!(state.status.key_count, 0);
        assert_eq!(state.status.hourly_calls, 0);
        assert_eq!(state.status.minute_calls, 1);
        assert!(!state.config.has_update);
    }

    #[test]
    fn test_logs_replaced_only_when_present() {
        let mut state = DashboardState::default();
        state.apply_update(update(json!({ "logs": [{ "message": "a" }, { "message": "b" }] })));
        assert_eq!(state.logs.len(), 2);

        state.apply_update(update(json!({})));
        assert_eq!(state.logs.len(), 2, "absent logs must not clear the list");

        state.apply_update(update(json!({ "logs": [] })));
        assert!(state.logs.is_empty(), "an empty logs array replaces the list");
    }

    #[test]
    fn test_empty_key_stats_leaves_only_sentinel() {
        let mut state = DashboardState::default();
        state.apply_update(update(stats_doc(&[&["gpt-4"]])));
        state.set_selected_model("gpt-4");

        state.apply_update(update(json!({ "api_key_stats": [] })));
        assert!(state.api_key_stats.is_empty());
        assert_eq!(state.available_models, vec!["all".to_string()]);
        assert_eq!(state.selected_model, "all");
    }

    #[test]
    fn test_set_selected_model_does_not_validate() {
        // Selection is only checked on refresh, so an unknown model is accepted here.
        let mut state = DashboardState::default();
        state.apply_update(update(stats_doc(&[&["claude"]])));
        state.set_selected_model("not-a-model");
        assert_eq!(state.selected_model, "not-a-model");
        assert!(state.selected_key_stats().is_empty());
    }

    #[test]
    fn test_successful_apply_records_time_and_clears_error() {
        let mut state = DashboardState::default();
        state.last_error = Some("HTTP error! status: 500".to_string());
        state.apply_update(update(json!({})));
        assert!(state.last_refreshed.is_some());
        assert!(state.last_error.is_none());
    }
}
