// PoolWatch - util/error.rs
//
// Typed error hierarchy with context-preserving error chains.
// All errors preserve the causal chain for diagnostic logging.

use std::fmt;
use std::io;
use std::path::PathBuf;
use std::time::Duration;

/// Top-level error type for all PoolWatch operations.
/// Errors are categorised by the subsystem that produced them.
#[derive(Debug)]
pub enum PoolWatchError {
    /// Fetching the dashboard document failed.
    Fetch(FetchError),

    /// Configuration loading or validation failed.
    Config(ConfigError),

    /// I/O error with path context.
    Io {
        path: PathBuf,
        operation: &'static str,
        source: io::Error,
    },
}

impl fmt::Display for PoolWatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fetch(e) => write!(f, "Fetch error: {e}"),
            Self::Config(e) => write!(f, "Configuration error: {e}"),
            Self::Io {
                path,
                operation,
                source,
            } => write!(
                f,
                "I/O error during {operation} on '{}': {source}",
                path.display()
            ),
        }
    }
}

impl std::error::Error for PoolWatchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Fetch(e) => Some(e),
            Self::Config(e) => Some(e),
            Self::Io { source, .. } => Some(source),
        }
    }
}

// ---------------------------------------------------------------------------
// Fetch errors
// ---------------------------------------------------------------------------

/// Errors raised while pulling the dashboard document.
///
/// Every variant falls into one of two kinds: transport (the document never
/// arrived intact) or parse (it arrived but is not usable structured data).
#[derive(Debug)]
pub enum FetchError {
    /// The endpoint answered with a non-2xx status.
    HttpStatus { url: String, status: u16 },

    /// Network-level failure: connect, TLS, read, or client timeout.
    Transport { url: String, source: reqwest::Error },

    /// The response body is not valid JSON.
    Parse {
        url: String,
        source: serde_json::Error,
    },

    /// The body is valid JSON but not an object.
    NotAnObject { url: String, found: &'static str },

    /// The refresh stayed in flight past its deadline and was abandoned.
    TimedOut { elapsed: Duration },

    /// The background refresh worker exited without reporting a result.
    WorkerLost,
}

impl FetchError {
    /// Status code carried by the error, when the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::HttpStatus { status, .. } => Some(*status),
            Self::Transport { source, .. } => source.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// True for failures where no usable response arrived.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            Self::HttpStatus { .. } | Self::Transport { .. } | Self::TimedOut { .. } | Self::WorkerLost
        )
    }

    /// True for failures where a response arrived but could not be used.
    pub fn is_parse(&self) -> bool {
        matches!(self, Self::Parse { .. } | Self::NotAnObject { .. })
    }
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::HttpStatus { url, status } => {
                write!(f, "HTTP error! status: {status} ({url})")
            }
            Self::Transport { url, source } => {
                write!(f, "Request to '{url}' failed: {source}")
            }
            Self::Parse { url, source } => {
                write!(f, "Response from '{url}' is not valid JSON: {source}")
            }
            Self::NotAnObject { url, found } => write!(
                f,
                "Response from '{url}' is a JSON {found}, expected an object"
            ),
            Self::TimedOut { elapsed } => write!(
                f,
                "Refresh abandoned after {:.1}s without a response",
                elapsed.as_secs_f64()
            ),
            Self::WorkerLost => {
                write!(f, "Refresh worker exited without reporting a result")
            }
        }
    }
}

impl std::error::Error for FetchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Transport { source, .. } => Some(source),
            Self::Parse { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<FetchError> for PoolWatchError {
    fn from(e: FetchError) -> Self {
        Self::Fetch(e)
    }
}

// ---------------------------------------------------------------------------
// Preference errors
// ---------------------------------------------------------------------------

/// Errors related to the durable preference store.
#[derive(Debug)]
pub enum PreferenceError {
    /// I/O error reading or writing the preference file.
    Io { path: PathBuf, source: io::Error },

    /// The preference map could not be serialised.
    Serialize { source: serde_json::Error },
}

impl fmt::Display for PreferenceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "Preference I/O error '{}': {source}", path.display())
            }
            Self::Serialize { source } => {
                write!(f, "Failed to serialise preferences: {source}")
            }
        }
    }
}

impl std::error::Error for PreferenceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Serialize { source } => Some(source),
        }
    }
}

// ---------------------------------------------------------------------------
// Config errors
// ---------------------------------------------------------------------------

/// Errors related to configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    /// TOML parsing failed.
    TomlParse {
        path: PathBuf,
        source: toml::de::Error,
    },

    /// A config value is out of the allowed range.
    ValueOutOfRange {
        field: String,
        value: String,
        expected: String,
    },

    /// I/O error reading config file.
    Io { path: PathBuf, source: io::Error },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TomlParse { path, source } => {
                write!(f, "Config parse error '{}': {source}", path.display())
            }
            Self::ValueOutOfRange {
                field,
                value,
                expected,
            } => write!(
                f,
                "Config '{field}' = '{value}' is out of range. Expected: {expected}"
            ),
            Self::Io { path, source } => {
                write!(f, "Config I/O error '{}': {source}", path.display())
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::TomlParse { source, .. } => Some(source),
            Self::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<ConfigError> for PoolWatchError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

/// Convenience type alias for PoolWatch results.
pub type Result<T> = std::result::Result<T, PoolWatchError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_status_is_transport_and_carries_code() {
        let e = FetchError::HttpStatus {
            url: "http://x/api/dashboard-data".to_string(),
            status: 503,
        };
        assert!(e.is_transport());
        assert!(!e.is_parse());
        assert_eq!(e.status(), Some(503));
        assert!(e.to_string().contains("status: 503"));
    }

    #[test]
    fn test_parse_error_chains_source() {
        let source = serde_json::from_str::<serde_json::Value>("{oops").unwrap_err();
        let e = FetchError::Parse {
            url: "http://x".to_string(),
            source,
        };
        assert!(e.is_parse());
        assert_eq!(e.status(), None);
        assert!(std::error::Error::source(&e).is_some());

        let top: PoolWatchError = e.into();
        assert!(top.to_string().starts_with("Fetch error:"));
    }

    #[test]
    fn test_config_error_converts_and_chains() {
        let e = ConfigError::ValueOutOfRange {
            field: "server.base_url".to_string(),
            value: "pool.example".to_string(),
            expected: "a URL starting with http:// or https://".to_string(),
        };
        let top = PoolWatchError::from(e);
        assert!(matches!(top, PoolWatchError::Config(_)));
        assert!(top.to_string().starts_with("Configuration error:"));
        assert!(top.to_string().contains("server.base_url"));
        assert!(std::error::Error::source(&top).is_some());
    }

    #[test]
    fn test_timeout_display_mentions_seconds() {
        let e = FetchError::TimedOut {
            elapsed: Duration::from_millis(2_500),
        };
        assert!(e.is_transport());
        assert!(e.to_string().contains("2.5s"));
    }
}
