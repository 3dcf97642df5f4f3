// PoolWatch - core/export.rs
//
// JSON and plain-text rendering of a dashboard snapshot for the CLI.
// Core layer: writes to any Write trait object.

use crate::core::model::{ConfigSnapshot, KeyStat, LogEntry, MetricsSnapshot};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::io::{self, Write};

/// Borrowed, read-only view of every dashboard state group.
#[derive(Debug, Serialize)]
pub struct SnapshotView<'a> {
    pub status: &'a MetricsSnapshot,
    pub config: &'a ConfigSnapshot,
    pub api_key_stats: &'a [KeyStat],
    pub logs: &'a [LogEntry],
    pub available_models: &'a [String],
    pub selected_model: &'a str,
    pub is_dark_mode: bool,
    pub is_refreshing: bool,
    pub last_refreshed: Option<DateTime<Utc>>,
}

/// Write the snapshot as pretty-printed JSON followed by a newline.
pub fn write_json<W: Write>(view: &SnapshotView<'_>, mut writer: W) -> io::Result<()> {
    serde_json::to_writer_pretty(&mut writer, view)?;
    writeln!(writer)?;
    Ok(())
}

/// Write a short human-readable summary.
///
/// `key_stats` is the selection-filtered key list, so the summary reflects
/// the active model filter.
pub fn write_summary<W: Write>(
    view: &SnapshotView<'_>,
    key_stats: &[&KeyStat],
    mut writer: W,
) -> io::Result<()> {
    let s = view.status;
    let c = view.config;

    writeln!(
        writer,
        "keys {}  models {}  retries {}  calls 24h {}  1h {}  1m {}",
        s.key_count, s.model_count, s.retry_count, s.last_24h_calls, s.hourly_calls, s.minute_calls
    )?;
    writeln!(
        writer,
        "limits {}/min  {}/day/ip  fake-streaming {} ({}s)  random-string {}",
        c.max_requests_per_minute,
        c.max_requests_per_day_per_ip,
        on_off(c.fake_streaming),
        c.fake_streaming_interval,
        on_off(c.random_string)
    )?;

    let version = if c.has_update {
        format!("{} (update available: {})", c.local_version, c.remote_version)
    } else {
        c.local_version.clone()
    };
    writeln!(writer, "version {version}  server time {}", c.current_time)?;

    writeln!(
        writer,
        "model filter '{}' ({} available)  keys shown {}",
        view.selected_model,
        view.available_models.len(),
        key_stats.len()
    )?;
    for stat in key_stats {
        let label = stat.api_key().unwrap_or("<unnamed>");
        let models: Vec<&str> = stat.model_names().collect();
        writeln!(writer, "  {label}: {}", models.join(", "))?;
    }

    writeln!(writer, "logs {}", view.logs.len())?;
    Ok(())
}

fn on_off(flag: bool) -> &'static str {
    if flag {
        "on"
    } else {
        "off"
    }
}
