//! `netwatch`: terminal security dashboard for an intrusion detection backend.
//!
//! Built on [ratatui](https://ratatui.rs). A background task runs the
//! `netwatch-core` dashboard controller, which polls the backend on a
//! fixed cadence and pushes every region update into the TUI action loop.
//! Focus reporting pauses the cadence while the terminal is in the
//! background.
//!
//! Logs are written to a file (default `/tmp/netwatch.log`) to avoid
//! corrupting the terminal UI.

mod action;
mod app;
mod bridge;
mod component;
mod event;
mod screens;
mod theme;
mod tui;
mod widgets;

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use color_eyre::eyre::{Result, WrapErr};
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use netwatch_core::DashboardConfig;

use crate::app::App;

/// Terminal dashboard for monitoring an intrusion detection backend.
#[derive(Parser, Debug)]
#[command(name = "netwatch", version, about)]
struct Cli {
    /// Backend URL (e.g., http://127.0.0.1:5000)
    #[arg(short = 'u', long, env = "NETWATCH_API_URL")]
    api_url: Option<String>,

    /// Config profile to use
    #[arg(short = 'p', long, env = "NETWATCH_PROFILE")]
    profile: Option<String>,

    /// Config file path (defaults to the platform config directory)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Background refresh interval (e.g., 30s, 2m; 0s disables)
    #[arg(long)]
    refresh: Option<String>,

    /// Request timeout in seconds
    #[arg(long)]
    timeout: Option<u64>,

    /// Accept self-signed TLS certificates
    #[arg(long)]
    insecure: bool,

    /// Log file path (defaults to /tmp/netwatch.log)
    #[arg(long, default_value = "/tmp/netwatch.log")]
    log_file: PathBuf,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// File-based tracing. Nothing may log to stdout/stderr while the TUI owns
/// the terminal. The guard must live as long as the application.
fn setup_tracing(cli: &Cli) -> WorkerGuard {
    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "netwatch={log_level},netwatch_core={log_level},netwatch_api={log_level}"
        ))
    });

    let log_dir = cli
        .log_file
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(std::path::Path::new("."));
    let log_filename = cli
        .log_file
        .file_name()
        .unwrap_or(std::ffi::OsStr::new("netwatch.log"));

    let file_appender = tracing_appender::rolling::never(log_dir, log_filename);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_target(true)
                .with_thread_ids(true),
        )
        .init();

    guard
}

/// Config file profile, then CLI flags on top.
fn resolve_config(cli: &Cli) -> Result<DashboardConfig> {
    let path = cli.config.clone().unwrap_or_else(netwatch_config::config_path);
    let file = netwatch_config::load_config_from(&path)
        .wrap_err_with(|| format!("failed to load config from {}", path.display()))?;

    let mut config = file.dashboard_config(cli.profile.as_deref())?;

    if let Some(raw) = &cli.api_url {
        config.api_url = raw
            .parse()
            .wrap_err_with(|| format!("invalid --api-url '{raw}'"))?;
    }
    if let Some(raw) = &cli.refresh {
        config.refresh_interval = netwatch_config::parse_interval("--refresh", raw)?;
    }
    if let Some(secs) = cli.timeout {
        config.timeout = Duration::from_secs(secs);
    }
    if cli.insecure {
        config.accept_invalid_certs = true;
    }

    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Hooks go in before the terminal is touched
    tui::install_hooks()?;

    let _log_guard = setup_tracing(&cli);

    // Resolve everything that can fail before entering the alternate screen
    let config = resolve_config(&cli)?;

    info!(
        api_url = %config.api_url,
        refresh = %humantime::format_duration(config.refresh_interval),
        profile = cli.profile.as_deref().unwrap_or("(default)"),
        "starting netwatch"
    );

    let mut app = App::new(config);
    app.run().await?;

    Ok(())
}
