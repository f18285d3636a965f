//! Liberty Dashboard Runtime
//!
//! The entry point for the dashboard updater. Handles CLI args,
//! tracing setup, and orchestrating the polling daemon.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use tokio::signal;
use tracing::{error, info, Level};
use tracing_subscriber::{fmt, EnvFilter};

use dashboard::client::StatusClient;
use dashboard::config::{self, DashboardConfig};
use dashboard::session::{LocalStore, LogoutAction};
use dashboard::types::LogLevel;
use dashboard::updater::{create_dashboard_updater, DashboardUpdater, DashboardUpdaterOptions};
use dashboard::view::Document;

const VERSION: &str = "0.1.0";

/// Liberty Dashboard -- Status Dashboard Updater
#[derive(Parser, Debug)]
#[command(
    name = "liberty-dashboard",
    version = VERSION,
    about = "Liberty Dashboard -- Status Dashboard Updater",
    long_about = "Polls status.json on a fixed interval and renders it into the dashboard page."
)]
struct Cli {
    /// Run the updater until interrupted
    #[arg(long)]
    run: bool,

    /// Run a single refresh cycle and exit
    #[arg(long)]
    once: bool,

    /// Clear the stored auth flag and print the navigation target
    #[arg(long)]
    logout: bool,

    /// Show the effective configuration
    #[arg(long)]
    status: bool,

    /// Path to the config file
    #[arg(long)]
    config: Option<String>,
}

fn init_tracing(log_level: &LogLevel) {
    let level = match log_level {
        LogLevel::Debug => Level::DEBUG,
        LogLevel::Info => Level::INFO,
        LogLevel::Warn => Level::WARN,
        LogLevel::Error => Level::ERROR,
    };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.to_string()));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .init();
}

/// Load the config, preferring a CLI-supplied path, falling back to
/// defaults when no file exists.
fn effective_config(cli: &Cli) -> DashboardConfig {
    let loaded = match &cli.config {
        Some(path) => config::load_config_from(Path::new(path)),
        None => config::load_config(),
    };

    loaded.unwrap_or_else(config::default_config)
}

// ---- Status Command ---------------------------------------------------------

/// Display the effective configuration.
fn show_status(config: &DashboardConfig) {
    println!(
        r#"
=== LIBERTY DASHBOARD ===
Status URL:  {}/status.json
Interval:    {}s
Output:      {}
Store:       {}
Version:     {}
=========================
"#,
        config.status_base_url.trim_end_matches('/'),
        config.refresh_interval_secs,
        config::resolve_path(&config.output_path),
        config::resolve_path(&config.store_path),
        VERSION,
    );
}

// ---- Main Run ---------------------------------------------------------------

/// Build the updater: the page model, the HTTP source, and the slot
/// bindings (a page missing a required slot fails here, before polling).
fn build_updater(config: &DashboardConfig, document: Document) -> Result<DashboardUpdater> {
    let client = StatusClient::new(config.status_base_url.clone());
    let options = DashboardUpdaterOptions {
        refresh_interval_secs: config.refresh_interval_secs,
        output_path: Some(PathBuf::from(config::resolve_path(&config.output_path))),
    };

    create_dashboard_updater(Box::new(client), document, options)
        .context("Page does not match the dashboard slot contract")
}

/// The main run loop: start the updater, wait for a shutdown signal,
/// stop the updater.
async fn run(config: DashboardConfig) -> Result<()> {
    info!("Liberty Dashboard v{} starting", VERSION);

    let document = Document::with_page_slots();

    // Bind the logout action if the page carries the link; a page
    // without it simply has no logout.
    let store = LocalStore::open(config::resolve_path(&config.store_path));
    let logout_action = LogoutAction::bind(&document, store);
    if logout_action.is_some() {
        info!("Logout action bound");
    } else {
        info!("Page has no logout link; logout not bound");
    }

    let mut updater = build_updater(&config, document)?;
    updater.start();

    // Handle graceful shutdown
    let shutdown = async {
        let ctrl_c = signal::ctrl_c();
        #[cfg(unix)]
        {
            let mut sigterm = signal::unix::signal(signal::unix::SignalKind::terminate())
                .expect("Failed to register SIGTERM handler");

            tokio::select! {
                _ = ctrl_c => {
                    info!("Received SIGINT, shutting down");
                }
                _ = sigterm.recv() => {
                    info!("Received SIGTERM, shutting down");
                }
            }
        }
        #[cfg(not(unix))]
        {
            ctrl_c.await.expect("Failed to register Ctrl+C handler");
            info!("Received shutdown signal");
        }
    };

    shutdown.await;
    updater.stop();

    Ok(())
}

// ---- Entry Point -----------------------------------------------------------

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let config = effective_config(&cli);

    init_tracing(&config.log_level);

    if cli.status {
        show_status(&config);
        return;
    }

    if cli.logout {
        let store = LocalStore::open(config::resolve_path(&config.store_path));
        let document = Document::with_page_slots();
        let action = LogoutAction::bind(&document, store)
            .expect("standard page always carries the logout link");
        match action.invoke() {
            Ok(target) => println!("Logged out. Continue at: {}", target),
            Err(e) => {
                eprintln!("Logout failed: {}", e);
                std::process::exit(1);
            }
        }
        return;
    }

    if cli.once {
        let document = Document::with_page_slots();
        let updater = match build_updater(&config, document) {
            Ok(u) => u,
            Err(e) => {
                eprintln!("Fatal: {}", e);
                std::process::exit(1);
            }
        };

        if let Err(e) = updater.refresh_now().await {
            error!(error = %e, "Refresh failed");
            std::process::exit(1);
        }
        info!(
            output = %config::resolve_path(&config.output_path),
            "Dashboard rendered"
        );
        return;
    }

    if cli.run {
        if let Err(e) = run(config).await {
            eprintln!("Fatal: {}", e);
            std::process::exit(1);
        }
        return;
    }

    // Default: show help
    println!("Run \"liberty-dashboard --help\" for usage information.");
    println!("Run \"liberty-dashboard --run\" to start the updater.");
}
