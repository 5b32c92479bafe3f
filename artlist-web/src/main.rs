//! artlist-web - Artist curation web service
//!
//! Serves the to-do list, the add form and the gallery. Lists live in two
//! flat files under the data directory; thumbnails under the images
//! directory.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use artlist_common::config::{self, AppConfig, Overrides};
use artlist_common::{ArtistStore, HttpImageSource, StorePaths, ThumbnailGenerator};
use artlist_web::{build_router, AppState};
use clap::Parser;
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Command-line arguments for artlist-web
#[derive(Parser, Debug)]
#[command(name = "artlist-web")]
#[command(about = "Self-hosted artist curation list")]
#[command(version)]
struct Args {
    /// TOML config file (default: <config dir>/artlist/config.toml, optional)
    #[arg(short, long, env = "ARTLIST_CONFIG")]
    config: Option<PathBuf>,

    /// Directory holding artists_master.txt and artists_to_add.txt
    #[arg(long, env = "ARTLIST_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Directory holding generated thumbnails
    #[arg(long, env = "ARTLIST_IMAGES_DIR")]
    images_dir: Option<PathBuf>,

    /// Directory served under /static
    #[arg(long, env = "ARTLIST_STATIC_DIR")]
    static_dir: Option<PathBuf>,

    /// Listen address, e.g. 127.0.0.1:8080
    #[arg(short, long, env = "ARTLIST_BIND")]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let toml = config::load_toml_config(args.config.as_deref())
        .context("Failed to load config file")?;
    let test_mode = config::test_mode_from_env();
    let overrides = Overrides {
        data_dir: args.data_dir,
        images_dir: args.images_dir,
        static_dir: args.static_dir,
        bind: args.bind,
    };
    let config = AppConfig::resolve(overrides, toml, test_mode).context("Invalid configuration")?;

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!(
                    "artlist_web={level},artlist_common={level},tower_http={level}",
                    level = config.log_level
                )
                .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting artlist-web v{}", env!("CARGO_PKG_VERSION"));
    if config.test_mode {
        info!("TEST_MODE active");
    }
    info!(
        "Using data dir: {}, images dir: {}",
        config.data_dir.display(),
        config.images_dir.display()
    );

    config
        .ensure_directories()
        .context("Failed to create data directories")?;

    let source = HttpImageSource::new(config.fetch_timeout)
        .context("Failed to build HTTP client")?;
    let thumbnails =
        ThumbnailGenerator::new(&config.images_dir, config.thumbnail_width, Arc::new(source));
    let store = Arc::new(
        ArtistStore::open(StorePaths::in_dir(&config.data_dir), thumbnails)
            .context("Failed to load artist lists")?,
    );

    let state = AppState::new(store.clone(), config.static_dir.clone());
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(config.bind)
        .await
        .context("Failed to bind to address")?;
    info!("Listening on http://{}", config.bind);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    match Arc::try_unwrap(store) {
        Ok(store) => store.close().await,
        Err(shared) => {
            warn!("Artist store still shared at shutdown, flushing without closing");
            shared.save().await
        }
    }
    .context("Failed to flush artist lists")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        },
    }
}
