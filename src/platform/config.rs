// PoolWatch - platform/config.rs
//
// Platform-specific configuration, data directory resolution, and
// config.toml loading with startup validation.
//
// Uses the `directories` crate for XDG (Linux), AppData (Windows),
// Library (macOS) compliance.

use crate::util::constants;
use crate::util::error::ConfigError;
use directories::ProjectDirs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Resolved platform paths for PoolWatch data and configuration.
#[derive(Debug, Clone)]
pub struct PlatformPaths {
    /// Configuration directory (e.g. ~/.config/poolwatch/ or %APPDATA%\PoolWatch\config\)
    pub config_dir: PathBuf,

    /// Data directory for preferences.
    pub data_dir: PathBuf,
}

impl PlatformPaths {
    /// Resolve platform-appropriate paths.
    ///
    /// Falls back to current directory if platform dirs cannot be determined.
    pub fn resolve() -> Self {
        if let Some(proj_dirs) = ProjectDirs::from("", "", constants::APP_ID) {
            let config_dir = proj_dirs.config_dir().to_path_buf();
            let data_dir = proj_dirs.data_dir().to_path_buf();

            tracing::debug!(
                config = %config_dir.display(),
                data = %data_dir.display(),
                "Platform paths resolved"
            );

            Self {
                config_dir,
                data_dir,
            }
        } else {
            tracing::warn!("Could not determine platform directories, using current directory");
            let fallback = PathBuf::from(".");
            Self {
                config_dir: fallback.clone(),
                data_dir: fallback,
            }
        }
    }
}

// =============================================================================
// config.toml loading and validation
// =============================================================================

/// Raw deserialisable shape of config.toml.
///
/// Unknown keys are silently ignored, so a newer
/// config file can be used with an older binary without crashing.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct RawConfig {
    /// `[server]` section.
    pub server: ServerSection,
    /// `[refresh]` section.
    pub refresh: RefreshSection,
    /// `[logging]` section.
    pub logging: LoggingSection,
}

/// `[server]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct ServerSection {
    /// Base URL of the proxy serving `/api/dashboard-data`.
    pub base_url: Option<String>,
}

/// `[refresh]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct RefreshSection {
    /// Polling interval for `watch`, in seconds.
    pub interval_secs: Option<u64>,
    /// Per-request timeout, in seconds.
    pub timeout_secs: Option<u64>,
}

/// `[logging]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Log level: "error", "warn", "info", "debug", "trace".
    pub level: Option<String>,
}

/// Validated application configuration derived from `config.toml`.
///
/// All values are validated against named constants at load time.
/// Invalid values produce actionable warnings and fall back to defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// Base URL of the proxy.
    pub base_url: String,
    /// Polling interval for `watch`.
    pub refresh_interval: Duration,
    /// Per-request timeout.
    pub request_timeout: Duration,
    /// Logging level string (for init before tracing is available).
    pub log_level: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            base_url: constants::DEFAULT_BASE_URL.to_string(),
            refresh_interval: Duration::from_secs(constants::DEFAULT_REFRESH_INTERVAL_SECS),
            request_timeout: Duration::from_secs(constants::DEFAULT_REQUEST_TIMEOUT_SECS),
            log_level: None,
        }
    }
}

impl AppConfig {
    /// How long a refresh may stay in flight before the store abandons it.
    pub fn refresh_deadline(&self) -> Duration {
        self.request_timeout + Duration::from_millis(constants::REFRESH_DEADLINE_GRACE_MS)
    }

    /// Replace the base URL with a command-line value, validating it first.
    /// The current URL is kept when validation fails.
    pub fn override_base_url(&mut self, url: &str) -> Result<(), ConfigError> {
        validate_base_url(url)?;
        self.base_url = url.trim().to_string();
        Ok(())
    }
}

/// Check that a base URL uses a supported scheme.
pub fn validate_base_url(url: &str) -> Result<(), ConfigError> {
    let trimmed = url.trim();
    if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        Ok(())
    } else {
        Err(ConfigError::ValueOutOfRange {
            field: "server.base_url".to_string(),
            value: url.to_string(),
            expected: "a URL starting with http:// or https://".to_string(),
        })
    }
}

/// Load and validate `config.toml` from the given config directory.
///
/// Returns `AppConfig` with validated values and a list of non-fatal warnings.
/// If the file does not exist, returns defaults with no warnings (first run).
/// If the file is unparseable, returns defaults with an error warning
/// and the application still starts.
pub fn load_config(config_dir: &Path) -> (AppConfig, Vec<String>) {
    let config_path = config_dir.join(constants::CONFIG_FILE_NAME);
    let mut warnings: Vec<String> = Vec::new();

    if !config_path.exists() {
        tracing::debug!(path = %config_path.display(), "No config.toml found; using defaults");
        return (AppConfig::default(), warnings);
    }

    let content = match std::fs::read_to_string(&config_path) {
        Ok(c) => c,
        Err(source) => {
            let e = ConfigError::Io {
                path: config_path.clone(),
                source,
            };
            warnings.push(format!("{e}. Using defaults."));
            return (AppConfig::default(), warnings);
        }
    };

    let raw: RawConfig = match toml::from_str(&content) {
        Ok(r) => r,
        Err(source) => {
            let e = ConfigError::TomlParse {
                path: config_path.clone(),
                source,
            };
            warnings.push(format!("{e}. Using defaults."));
            return (AppConfig::default(), warnings);
        }
    };

    tracing::info!(path = %config_path.display(), "Loaded config.toml");

    let config = validate(raw, &mut warnings);

    if !warnings.is_empty() {
        tracing::warn!(
            count = warnings.len(),
            "Config validation produced warnings"
        );
    }

    (config, warnings)
}

/// Validate each field against named constants, accumulating all problems.
fn validate(raw: RawConfig, warnings: &mut Vec<String>) -> AppConfig {
    let mut config = AppConfig::default();

    // -- Server: base_url --
    if let Some(url) = raw.server.base_url {
        match validate_base_url(&url) {
            Ok(()) => config.base_url = url.trim().to_string(),
            Err(e) => warnings.push(format!(
                "[server] {e}. Using default ({}).",
                constants::DEFAULT_BASE_URL
            )),
        }
    }

    // -- Refresh: interval_secs --
    if let Some(secs) = raw.refresh.interval_secs {
        if (constants::MIN_REFRESH_INTERVAL_SECS..=constants::MAX_REFRESH_INTERVAL_SECS)
            .contains(&secs)
        {
            config.refresh_interval = Duration::from_secs(secs);
        } else {
            warnings.push(format!(
                "[refresh] interval_secs = {secs} is out of range ({}-{}). Using default ({}).",
                constants::MIN_REFRESH_INTERVAL_SECS,
                constants::MAX_REFRESH_INTERVAL_SECS,
                constants::DEFAULT_REFRESH_INTERVAL_SECS,
            ));
        }
    }

    // -- Refresh: timeout_secs --
    if let Some(secs) = raw.refresh.timeout_secs {
        if (constants::MIN_REQUEST_TIMEOUT_SECS..=constants::MAX_REQUEST_TIMEOUT_SECS)
            .contains(&secs)
        {
            config.request_timeout = Duration::from_secs(secs);
        } else {
            warnings.push(format!(
                "[refresh] timeout_secs = {secs} is out of range ({}-{}). Using default ({}).",
                constants::MIN_REQUEST_TIMEOUT_SECS,
                constants::MAX_REQUEST_TIMEOUT_SECS,
                constants::DEFAULT_REQUEST_TIMEOUT_SECS,
            ));
        }
    }

    // -- Logging: level --
    if let Some(level) = raw.logging.level {
        let valid = ["error", "warn", "info", "debug", "trace"];
        if valid.contains(&level.to_lowercase().as_str()) {
            config.log_level = Some(level);
        } else {
            warnings.push(format!(
                "[logging] level = \"{level}\" is not recognised. \
                 Valid values: error, warn, info, debug, trace. Using default (info).",
            ));
        }
    }

    config
}
