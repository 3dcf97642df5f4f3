// PoolWatch - app/store.rs
//
// The dashboard store: one per UI session, owned by the host and passed by
// reference to consuming views. Binds the state to its collaborators (the
// dashboard source, the preference store, the theme applier) and exposes
// the only mutation entry points: refresh, select model, toggle dark mode.
//
// The host drives it cooperatively: `refresh_dashboard_data` starts a
// background fetch and returns at once; `poll_refresh` (each UI frame) or
// `refresh_blocking` (CLI) applies the outcome on the owning thread.

use crate::app::prefs::PreferenceStore;
use crate::app::refresh::{DashboardSource, RefreshManager};
use crate::app::state::DashboardState;
use crate::core::model::{ConfigSnapshot, KeyStat, LogEntry, MetricsSnapshot, RefreshOutcome};
use crate::core::normalize::normalize_document;
use crate::ui::theme::ThemeApplier;
use crate::util::constants::{DARK_MODE_KEY, REFRESH_WAIT_TICK_MS};
use std::sync::Arc;
use std::time::Duration;

/// The dashboard state store.
pub struct DashboardStore {
    state: DashboardState,
    refresh: RefreshManager,
    prefs: Box<dyn PreferenceStore>,
    theme: Box<dyn ThemeApplier>,
}

impl DashboardStore {
    /// Build the store.
    ///
    /// Reads the dark-mode preference once (exactly `"true"` means dark) and
    /// applies it to the theme. `refresh_deadline` bounds how long a refresh
    /// may stay in flight before it is abandoned.
    pub fn new(
        source: Arc<dyn DashboardSource>,
        prefs: Box<dyn PreferenceStore>,
        mut theme: Box<dyn ThemeApplier>,
        refresh_deadline: Duration,
    ) -> Self {
        let is_dark_mode = prefs.get(DARK_MODE_KEY).as_deref() == Some("true");
        theme.apply(is_dark_mode);

        tracing::debug!(dark_mode = is_dark_mode, "Dashboard store created");

        Self {
            state: DashboardState::new(is_dark_mode),
            refresh: RefreshManager::new(source, refresh_deadline),
            prefs,
            theme,
        }
    }

    // -------------------------------------------------------------------------
    // Read access
    // -------------------------------------------------------------------------

    pub fn state(&self) -> &DashboardState {
        &self.state
    }

    pub fn status(&self) -> &MetricsSnapshot {
        &self.state.status
    }

    pub fn config(&self) -> &ConfigSnapshot {
        &self.state.config
    }

    pub fn api_key_stats(&self) -> &[KeyStat] {
        &self.state.api_key_stats
    }

    pub fn logs(&self) -> &[LogEntry] {
        &self.state.logs
    }

    pub fn available_models(&self) -> &[String] {
        &self.state.available_models
    }

    pub fn selected_model(&self) -> &str {
        &self.state.selected_model
    }

    pub fn is_dark_mode(&self) -> bool {
        self.state.is_dark_mode
    }

    pub fn is_refreshing(&self) -> bool {
        self.state.is_refreshing
    }

    // -------------------------------------------------------------------------
    // Operations
    // -------------------------------------------------------------------------

    /// Start a refresh from the dashboard endpoint.
    ///
    /// A no-op while another refresh is in flight: the collaborator is not
    /// contacted and nothing is queued.
    pub fn refresh_dashboard_data(&mut self) {
        if self.state.is_refreshing {
            tracing::debug!("Refresh already in flight; request ignored");
            return;
        }
        self.state.is_refreshing = true;
        self.refresh.start();
    }

    /// Apply the outcome of the in-flight refresh, if it has settled.
    ///
    /// Returns true when a refresh settled during this call.
    pub fn poll_refresh(&mut self) -> bool {
        match self.refresh.poll() {
            Some(outcome) => {
                self.settle(outcome);
                true
            }
            None => false,
        }
    }

    /// Start a refresh (unless one is running) and block until it settles.
    pub fn refresh_blocking(&mut self) {
        self.refresh_dashboard_data();
        let tick = Duration::from_millis(REFRESH_WAIT_TICK_MS);
        while self.state.is_refreshing {
            if !self.refresh.is_running() {
                self.state.is_refreshing = false;
                break;
            }
            if let Some(outcome) = self.refresh.wait(tick) {
                self.settle(outcome);
            }
        }
    }

    /// Select the model filter. Not validated against the available models.
    pub fn set_selected_model(&mut self, name: impl Into<String>) {
        self.state.set_selected_model(name);
    }

    /// Flip dark mode, persist it, and apply it to the theme.
    pub fn toggle_dark_mode(&mut self) {
        let dark = !self.state.is_dark_mode;
        self.state.is_dark_mode = dark;

        let value = if dark { "true" } else { "false" };
        if let Err(e) = self.prefs.set(DARK_MODE_KEY, value) {
            tracing::warn!(error = %e, "Failed to persist dark-mode preference");
        }
        self.theme.apply(dark);

        tracing::info!(dark_mode = dark, "Dark mode toggled");
    }

    /// Apply a settled refresh. The busy flag is cleared on every path.
    fn settle(&mut self, outcome: RefreshOutcome) {
        match outcome {
            RefreshOutcome::Completed { document, elapsed } => {
                let update = normalize_document(&document);
                self.state.apply_update(update);
                tracing::info!(
                    keys = self.state.api_key_stats.len(),
                    models = self.state.available_models.len(),
                    logs = self.state.logs.len(),
                    elapsed_ms = elapsed.as_millis() as u64,
                    "Dashboard data refreshed"
                );
            }
            RefreshOutcome::Failed { error } => {
                tracing::error!(
                    error = %error,
                    status = ?error.status(),
                    "Failed to fetch dashboard data"
                );
                self.state.last_error = Some(error.to_string());
            }
        }
        self.state.is_refreshing = false;
    }
}

// =============================================================================
// Unit tests
// =============================================================================
