// PoolWatch - util/constants.rs
//
// Single source of truth for all named constants, limits, and defaults.

// =============================================================================
// Application metadata
// =============================================================================

/// Application display name.
pub const APP_NAME: &str = "PoolWatch";

/// Application identifier used for config/data directories.
pub const APP_ID: &str = "PoolWatch";

/// Current application version (updated by release script).
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// User agent sent with every dashboard request.
pub const USER_AGENT: &str = concat!("poolwatch/", env!("CARGO_PKG_VERSION"));

// =============================================================================
// Dashboard endpoint
// =============================================================================

/// Fixed resource path of the aggregated dashboard document.
pub const DASHBOARD_DATA_PATH: &str = "/api/dashboard-data";

/// Base URL used when neither config.toml nor the CLI supplies one.
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:7860";

// =============================================================================
// Refresh bounds
// =============================================================================

/// Default polling interval for `watch` (seconds).
pub const DEFAULT_REFRESH_INTERVAL_SECS: u64 = 5;

/// Minimum configurable polling interval (seconds).
pub const MIN_REFRESH_INTERVAL_SECS: u64 = 1;

/// Maximum configurable polling interval (seconds).
pub const MAX_REFRESH_INTERVAL_SECS: u64 = 3_600;

/// Default per-request timeout for the dashboard endpoint (seconds).
///
/// Also bounds how long a refresh may stay in flight before the store
/// abandons it and clears the busy flag.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Minimum configurable request timeout (seconds).
pub const MIN_REQUEST_TIMEOUT_SECS: u64 = 1;

/// Maximum configurable request timeout (seconds).
pub const MAX_REQUEST_TIMEOUT_SECS: u64 = 600;

/// Extra grace given to the background worker beyond the HTTP timeout
/// before an outstanding refresh is declared lost (milliseconds).
pub const REFRESH_DEADLINE_GRACE_MS: u64 = 2_000;

/// How often `refresh_blocking` wakes to check the in-flight deadline (ms).
pub const REFRESH_WAIT_TICK_MS: u64 = 100;

// =============================================================================
// Model filter
// =============================================================================

/// Sentinel model name meaning "no model filter".
pub const ALL_MODELS: &str = "all";

// =============================================================================
// Preferences
// =============================================================================

/// Preference key holding the dark-mode flag.
pub const DARK_MODE_KEY: &str = "darkMode";

/// Preference file name (stored in the platform data directory).
pub const PREFERENCES_FILE_NAME: &str = "preferences.json";

// =============================================================================
// Logging
// =============================================================================

/// Default log level.
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Maximum number of response-body characters included in debug output.
pub const DEBUG_MAX_BODY_PREVIEW: usize = 200;

// =============================================================================
// Configuration
// =============================================================================

/// Configuration file name.
pub const CONFIG_FILE_NAME: &str = "config.toml";
