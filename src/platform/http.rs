// PoolWatch - platform/http.rs
//
// HTTP implementation of the dashboard source: a blocking GET of the fixed
// dashboard resource. Runs on the refresh worker thread, never on the UI
// thread.

use crate::app::refresh::DashboardSource;
use crate::core::model::DashboardDocument;
use crate::core::normalize::json_type_name;
use crate::util::constants::{DASHBOARD_DATA_PATH, DEBUG_MAX_BODY_PREVIEW, USER_AGENT};
use crate::util::error::FetchError;
use serde_json::Value;
use std::time::Duration;

/// Fetches the dashboard document from `<base_url>/api/dashboard-data`.
pub struct HttpDashboardSource {
    client: reqwest::blocking::Client,
    url: String,
}

impl HttpDashboardSource {
    /// Build a source for `base_url` with a per-request `timeout`.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, FetchError> {
        let url = dashboard_url(base_url);
        let client = reqwest::blocking::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|source| FetchError::Transport {
                url: url.clone(),
                source,
            })?;
        Ok(Self { client, url })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl DashboardSource for HttpDashboardSource {
    fn fetch(&self) -> Result<DashboardDocument, FetchError> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .map_err(|source| FetchError::Transport {
                url: self.url.clone(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::HttpStatus {
                url: self.url.clone(),
                status: status.as_u16(),
            });
        }

        let body = response.text().map_err(|source| FetchError::Transport {
            url: self.url.clone(),
            source,
        })?;
        tracing::trace!(
            url = %self.url,
            bytes = body.len(),
            preview = %preview(&body),
            "Dashboard response received"
        );

        parse_document(&self.url, &body)
    }
}

/// Join the base URL and the fixed dashboard path.
pub fn dashboard_url(base_url: &str) -> String {
    format!("{}{DASHBOARD_DATA_PATH}", base_url.trim_end_matches('/'))
}

/// Parse a response body into a dashboard document.
///
/// The body must be a JSON object; any other JSON value is unusable.
pub fn parse_document(url: &str, body: &str) -> Result<DashboardDocument, FetchError> {
    let value: Value = serde_json::from_str(body).map_err(|source| FetchError::Parse {
        url: url.to_string(),
        source,
    })?;
    match value {
        Value::Object(map) => Ok(map),
        other => Err(FetchError::NotAnObject {
            url: url.to_string(),
            found: json_type_name(&other),
        }),
    }
}

fn preview(body: &str) -> &str {
    match body.char_indices().nth(DEBUG_MAX_BODY_PREVIEW) {
        Some((idx, _)) => &body[..idx],
        None => body,
    }
}
