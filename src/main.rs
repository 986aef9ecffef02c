//! Song Picker entry point.
//!
//! Initializes tracing, loads configuration from a TOML file, builds the song
//! catalog and the libsql-backed picker, sets up the Axum router and starts the
//! HTTP server.

use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use songpicker::config::{AppConfig, DEFAULT_CONFIG_PATH, DEFAULT_LOG_FILTER};
use songpicker::http::start_server;
use songpicker::routes::create_router;
use songpicker::state::AppState;
use songpicker::templates::init_templates;
use songpicker::{LibsqlStore, SongPicker};

/// Song Picker: pick a random song with one click
#[derive(Parser, Debug)]
#[command(name = "songpicker", version, about)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
    config: String,

    /// Log level filter (e.g., "songpicker=debug,tower_http=info")
    #[arg(short, long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // Configuration first: the log format lives in it
    let config = AppConfig::load(&args.config)?;

    // Initialize tracing with priority: CLI > env > default
    let log_filter = args
        .log_level
        .or_else(|| std::env::var("RUST_LOG").ok())
        .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string());

    let registry =
        tracing_subscriber::registry().with(tracing_subscriber::EnvFilter::new(&log_filter));
    if config.logging.is_json() {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }

    tracing::info!(path = %args.config, "Loaded configuration");

    let catalog = config.song_catalog()?;
    tracing::info!(
        songs = catalog.len(),
        custom = config.catalog.is_some(),
        "Song catalog ready"
    );

    let tera = init_templates(&config.ui)?;
    tracing::info!(dir = %config.ui.templates_dir, "Initialized templates");

    let store = LibsqlStore::new(&config.database);
    tracing::info!(
        url = %store.url(),
        probe_timeout_ms = config.database.probe_timeout_ms,
        "Backing store configured"
    );

    let picker = SongPicker::new(catalog, Arc::new(store));

    // Startup probe is informational; picks probe on their own
    match picker.check_liveness().await {
        Ok(()) => tracing::info!("Backing store reachable"),
        Err(e) => tracing::warn!(error = %e, "Backing store not reachable at startup"),
    }

    let state = AppState::new(config.clone(), tera, picker);
    let app = create_router(state);

    start_server(app, &config).await?;

    tracing::info!("Server stopped");
    Ok(())
}
