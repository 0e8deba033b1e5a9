//! `netpulse` — terminal dashboard for a remote system-monitoring backend.
//!
//! Polls the backend every few seconds for CPU/memory/disk metrics and
//! renders them alongside on-demand network scans, advisor output, and
//! recent logs. All data flows through `netpulse_core`'s
//! [`Monitor`](netpulse_core::Monitor); a background data bridge task
//! streams store updates into the TUI action loop.
//!
//! Logs are written to a file (default `/tmp/netpulse.log`) to avoid
//! corrupting the terminal UI.
//!
//! Entry point: CLI argument parsing, tracing setup, panic hooks, and app launch.

mod action;
mod app;
mod dashboard;
mod data_bridge;
mod event;
mod theme;
mod tui;

use std::path::PathBuf;

use clap::Parser;
use color_eyre::eyre::{Result, WrapErr};
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use netpulse_core::Monitor;

use crate::app::App;

/// Terminal dashboard for system metrics, network scans, and advice.
#[derive(Parser, Debug)]
#[command(name = "netpulse", version, about)]
struct Cli {
    /// Backend base URL (e.g., http://192.168.1.10:5000)
    #[arg(short = 'b', long, env = "NETPULSE_BACKEND")]
    backend: Option<String>,

    /// Seconds between metric polls
    #[arg(short = 'p', long, env = "NETPULSE_POLL_INTERVAL_SECS")]
    poll_interval_secs: Option<u64>,

    /// Log file path (defaults to /tmp/netpulse.log)
    #[arg(long, default_value = "/tmp/netpulse.log")]
    log_file: PathBuf,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// Set up file-based tracing. We MUST NOT log to stdout/stderr — that would
/// corrupt the TUI output. Returns a guard that must be held for the
/// lifetime of the application to ensure logs are flushed.
fn setup_tracing(log_file: &std::path::Path, verbose: u8) -> WorkerGuard {
    let log_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "netpulse={log_level},netpulse_core={log_level},netpulse_api={log_level}"
        ))
    });

    let log_dir = log_file.parent().unwrap_or(std::path::Path::new("/tmp"));
    let log_filename = log_file
        .file_name()
        .unwrap_or(std::ffi::OsStr::new("netpulse.log"));

    let file_appender = tracing_appender::rolling::never(log_dir, log_filename);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_target(true),
        )
        .init();

    guard
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Install panic/error hooks BEFORE entering the terminal
    tui::install_hooks()?;

    // Tracing to file — hold the guard so logs flush on exit
    let _log_guard = setup_tracing(&cli.log_file, cli.verbose);

    // Config file + env, then CLI flags on top
    let mut config = netpulse_config::load_config().wrap_err("failed to load configuration")?;
    if let Some(backend) = cli.backend {
        config.backend = backend;
    }
    if let Some(secs) = cli.poll_interval_secs {
        config.poll_interval_secs = secs;
    }

    let monitor_config = config
        .to_monitor_config()
        .wrap_err("invalid configuration")?;

    info!(
        backend = %monitor_config.base_url,
        poll_interval = ?monitor_config.poll_interval,
        "starting netpulse"
    );

    let monitor = Monitor::new(monitor_config).wrap_err("failed to build the monitor")?;
    let mut app = App::new(monitor);
    app.run().await?;

    Ok(())
}
