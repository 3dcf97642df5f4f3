// PoolWatch - main.rs
//
// Command-line host for the dashboard store. Handles:
// 1. CLI argument parsing
// 2. config.toml loading and logging initialisation
// 3. Store construction (HTTP source, file preferences, headless theme)
// 4. Running the selected command

use clap::{Parser, Subcommand};
use poolwatch::app::prefs::{preferences_path, FilePreferenceStore};
use poolwatch::app::store::DashboardStore;
use poolwatch::core::export;
use poolwatch::platform::config::{self, AppConfig, PlatformPaths};
use poolwatch::platform::http::HttpDashboardSource;
use poolwatch::ui::theme::HeadlessTheme;
use poolwatch::util;
use poolwatch::util::error::{PoolWatchError, Result};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

/// PoolWatch - dashboard monitor for API-key-pool proxies.
///
/// Pulls aggregated usage and configuration data from the proxy's
/// dashboard endpoint and prints it.
#[derive(Parser, Debug)]
#[command(name = "poolwatch", version, about)]
struct Cli {
    /// Base URL of the proxy (overrides [server] base_url).
    #[arg(short = 'u', long = "base-url")]
    base_url: Option<String>,

    /// Directory containing config.toml.
    #[arg(long = "config-dir")]
    config_dir: Option<PathBuf>,

    /// Directory holding persisted preferences.
    #[arg(long = "data-dir")]
    data_dir: Option<PathBuf>,

    /// Enable debug logging (equivalent to RUST_LOG=debug).
    #[arg(short = 'd', long = "debug")]
    debug: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Refresh once and print the dashboard.
    Show {
        /// Print the full state as JSON instead of a summary.
        #[arg(long)]
        json: bool,

        /// Model filter to apply (reset to "all" if the data lacks it).
        #[arg(short = 'm', long)]
        model: Option<String>,
    },

    /// Refresh on an interval, printing one line per refresh.
    Watch {
        /// Seconds between refreshes (overrides [refresh] interval_secs).
        #[arg(short = 'i', long)]
        interval: Option<u64>,

        /// Stop after this many refreshes.
        #[arg(short = 'n', long)]
        count: Option<u64>,
    },

    /// Refresh once and list the available model filters.
    Models,

    /// Flip the persisted dark-mode preference.
    ToggleDarkMode,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Resolve platform paths; CLI overrides win.
    let platform_paths = PlatformPaths::resolve();
    let config_dir = cli
        .config_dir
        .clone()
        .unwrap_or_else(|| platform_paths.config_dir.clone());
    let data_dir = cli
        .data_dir
        .clone()
        .unwrap_or_else(|| platform_paths.data_dir.clone());

    // Config first so its log level can feed the subscriber.
    let (mut app_config, config_warnings) = config::load_config(&config_dir);
    util::logging::init(cli.debug, app_config.log_level.as_deref());

    for warning in &config_warnings {
        tracing::warn!(warning = %warning, "Configuration warning");
    }

    tracing::info!(
        version = util::constants::APP_VERSION,
        debug = cli.debug,
        "PoolWatch starting"
    );

    if let Some(url) = cli.base_url.as_deref() {
        if let Err(e) = app_config.override_base_url(url) {
            return fail(PoolWatchError::from(e));
        }
    }

    match run(cli.command, &app_config, &data_dir) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => fail(e),
    }
}

fn fail(e: PoolWatchError) -> ExitCode {
    tracing::error!(error = %e, "Command failed");
    eprintln!("Error: {e}");
    ExitCode::FAILURE
}

fn build_store(app_config: &AppConfig, data_dir: &Path) -> Result<DashboardStore> {
    let source = HttpDashboardSource::new(&app_config.base_url, app_config.request_timeout)?;
    tracing::debug!(url = source.url(), "Dashboard source ready");

    let prefs = FilePreferenceStore::open(preferences_path(data_dir));

    Ok(DashboardStore::new(
        Arc::new(source),
        Box::new(prefs),
        Box::new(HeadlessTheme),
        app_config.refresh_deadline(),
    ))
}

fn run(command: Command, app_config: &AppConfig, data_dir: &Path) -> Result<()> {
    let mut store = build_store(app_config, data_dir)?;
    let stdout = io::stdout();
    let mut out = stdout.lock();

    match command {
        Command::Show { json, model } => {
            if let Some(model) = model {
                store.set_selected_model(model);
            }
            store.refresh_blocking();
            if !report_no_data(&store) {
                let state = store.state();
                if json {
                    export::write_json(&state.snapshot(), &mut out).map_err(stdout_error)?;
                } else {
                    let shown = state.selected_key_stats();
                    export::write_summary(&state.snapshot(), &shown, &mut out)
                        .map_err(stdout_error)?;
                }
            }
        }
        Command::Watch { interval, count } => {
            let interval = interval
                .map(|secs| {
                    Duration::from_secs(secs.clamp(
                        util::constants::MIN_REFRESH_INTERVAL_SECS,
                        util::constants::MAX_REFRESH_INTERVAL_SECS,
                    ))
                })
                .unwrap_or(app_config.refresh_interval);
            watch(&mut store, interval, count, &mut out)?;
        }
        Command::Models => {
            store.refresh_blocking();
            if !report_no_data(&store) {
                for model in store.available_models() {
                    let marker = if model == store.selected_model() { "*" } else { " " };
                    writeln!(out, "{marker} {model}").map_err(stdout_error)?;
                }
            }
        }
        Command::ToggleDarkMode => {
            store.toggle_dark_mode();
            let state = if store.is_dark_mode() { "on" } else { "off" };
            writeln!(out, "dark mode {state}").map_err(stdout_error)?;
        }
    }

    out.flush().map_err(stdout_error)?;
    Ok(())
}

/// Poll the dashboard until `count` refreshes have run (forever if `None`).
fn watch<W: Write>(
    store: &mut DashboardStore,
    interval: Duration,
    count: Option<u64>,
    out: &mut W,
) -> Result<()> {
    tracing::info!(interval_secs = interval.as_secs(), "Watching dashboard");
    let mut runs: u64 = 0;

    loop {
        let previous = store.state().last_refreshed;
        store.refresh_blocking();
        runs += 1;

        let state = store.state();
        if state.last_refreshed != previous {
            let s = &state.status;
            writeln!(
                out,
                "{} keys {} calls 24h {} 1h {} 1m {} retries {} logs {}",
                state.config.current_time,
                s.key_count,
                s.last_24h_calls,
                s.hourly_calls,
                s.minute_calls,
                s.retry_count,
                state.logs.len()
            )
            .map_err(stdout_error)?;
            out.flush().map_err(stdout_error)?;
        }

        if count.is_some_and(|n| runs >= n) {
            return Ok(());
        }
        std::thread::sleep(interval);
    }
}

/// Tell the user when the refresh produced nothing to show.
fn report_no_data(store: &DashboardStore) -> bool {
    let state = store.state();
    if state.last_refreshed.is_some() {
        return false;
    }
    let reason = state.last_error.as_deref().unwrap_or("no response");
    eprintln!("No dashboard data: {reason}");
    true
}

fn stdout_error(source: io::Error) -> PoolWatchError {
    PoolWatchError::Io {
        path: PathBuf::from("<stdout>"),
        operation: "write",
        source,
    }
}
