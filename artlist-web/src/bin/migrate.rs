//! artlist-migrate - convert a legacy artist file into the master list format
//!
//! Ids are assigned in file order and each legacy thumbnail `<h>.jpg` is
//! copied to `<id>.jpg` in the images directory.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use artlist_common::config::{self, AppConfig, Overrides};
use artlist_common::legacy;
use artlist_common::store::{self, StorePaths};
use clap::Parser;
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(name = "artlist-migrate")]
#[command(about = "Convert a legacy artist file into the artlist master list")]
#[command(version)]
struct Args {
    /// Legacy artist file (blocks tagged n:/d:/i:/h:)
    #[arg(long)]
    source: PathBuf,

    /// Directory holding the legacy `<h>.jpg` thumbnails
    #[arg(long, default_value = "old_images")]
    old_images: PathBuf,

    /// Target data directory (default follows the server's resolution)
    #[arg(long, env = "ARTLIST_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Target images directory (default follows the server's resolution)
    #[arg(long, env = "ARTLIST_IMAGES_DIR")]
    images_dir: Option<PathBuf>,

    /// TOML config file
    #[arg(short, long, env = "ARTLIST_CONFIG")]
    config: Option<PathBuf>,

    /// Overwrite a non-empty master list
    #[arg(long)]
    force: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let args = Args::parse();

    let toml = config::load_toml_config(args.config.as_deref())
        .context("Failed to load config file")?;
    let overrides = Overrides {
        data_dir: args.data_dir,
        images_dir: args.images_dir,
        ..Overrides::default()
    };
    let config = AppConfig::resolve(overrides, toml, config::test_mode_from_env())
        .context("Invalid configuration")?;
    config.ensure_directories()?;

    let paths = StorePaths::in_dir(&config.data_dir);
    legacy::check_target(&paths.master, args.force)?;

    let content = fs::read_to_string(&args.source)
        .with_context(|| format!("Failed to read {}", args.source.display()))?;
    let artists = legacy::parse_legacy(&content);
    info!("Converting {} artists...", artists.len());

    let report = legacy::migrate(&artists, &args.old_images, &config.images_dir)
        .context("Failed to copy thumbnails")?;

    store::write_master_list(&paths.master, &report.records)
        .with_context(|| format!("Failed to write {}", paths.master.display()))?;

    info!(
        "Done: {} artists -> {}, {} thumbnails -> {}",
        report.records.len(),
        paths.master.display(),
        report.copied,
        config.images_dir.display()
    );
    if !report.missing.is_empty() {
        warn!("{} thumbnails were missing", report.missing.len());
    }

    Ok(())
}
