//! washboard: shift-handoff reporting server for warehouse teams
//!
//! Teams log daily performance metrics, safety incidents, and shift notes,
//! plus weekly action items with owners and due dates. Mutations are shared
//! in real time across connected viewers and optionally summarized to a
//! messaging webhook when an entry or a week is locked.

mod api;
mod config;
mod models;
mod notify;
mod rollover;
mod service;
mod store;
mod teams;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tokio::sync::RwLock;
use tracing::info;

use api::{create_router, AppState};
use config::Config;
use notify::Notifier;
use store::Store;

#[derive(Parser)]
#[command(name = "washboard")]
#[command(about = "Shift-handoff reporting server for warehouse teams")]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "washboard.toml")]
    config: String,

    /// Data directory (overrides config file)
    #[arg(short, long, env = "WASHBOARD_DATA_DIR")]
    data_dir: Option<String>,

    /// HTTP port (overrides config file)
    #[arg(long, env = "WASHBOARD_HTTP_PORT")]
    http_port: Option<u16>,

    /// Messaging webhook URL (overrides config file)
    #[arg(long, env = "WASHBOARD_WEBHOOK_URL")]
    webhook_url: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("washboard=info".parse()?),
        )
        .init();

    let cli = Cli::parse();

    info!("Starting washboard");
    info!("Config file: {}", cli.config);

    // Load or create default config
    let mut config: Config = if std::path::Path::new(&cli.config).exists() {
        let content = std::fs::read_to_string(&cli.config)?;
        toml::from_str(&content)?
    } else {
        info!("Config file not found, using defaults");
        Config::default()
    };

    // Apply CLI overrides
    if let Some(data_dir) = cli.data_dir {
        config.store.data_dir = PathBuf::from(data_dir);
    }
    if let Some(http_port) = cli.http_port {
        config.server.http_port = http_port;
    }
    if let Some(webhook_url) = cli.webhook_url {
        config.notify.webhook_url = Some(webhook_url);
    }

    info!("Data dir: {}", config.store.data_dir.display());
    if config.notify.webhook_url.is_none() {
        info!("Webhook not configured, notifications will be skipped");
    }

    let store = Store::load(config.store.snapshot_path());
    let state = Arc::new(AppState {
        store: RwLock::new(store),
        hub: api::ws::FanoutHub::new(),
        notifier: Notifier::new(&config.notify),
    });

    let app = create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.http_port));
    info!("washboard listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
