//! Configuration loading and directory resolution
//!
//! Every setting resolves in the same priority order:
//! 1. Command-line argument / environment variable (handled by the binary's
//!    argument parser, passed in as [`Overrides`])
//! 2. TOML config file
//! 3. Built-in default, which depends on `TEST_MODE`

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use tracing::{info, warn};

use crate::thumbnail::DEFAULT_THUMBNAIL_WIDTH;
use crate::{Error, Result};

/// Environment variable switching the default directories to test ones
pub const TEST_MODE_VAR: &str = "TEST_MODE";

const DEFAULT_BIND: &str = "127.0.0.1:8080";
const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 30;

/// Contents of the optional TOML config file
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub data_dir: Option<PathBuf>,

    #[serde(default)]
    pub images_dir: Option<PathBuf>,

    #[serde(default)]
    pub static_dir: Option<PathBuf>,

    /// Listen address, e.g. "127.0.0.1:8080"
    #[serde(default)]
    pub bind: Option<String>,

    #[serde(default)]
    pub thumbnail_width: Option<u32>,

    #[serde(default)]
    pub fetch_timeout_secs: Option<u64>,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Values given on the command line or through environment variables
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub data_dir: Option<PathBuf>,
    pub images_dir: Option<PathBuf>,
    pub static_dir: Option<PathBuf>,
    pub bind: Option<String>,
}

/// Fully resolved settings
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub data_dir: PathBuf,
    pub images_dir: PathBuf,
    pub static_dir: PathBuf,
    pub bind: SocketAddr,
    pub thumbnail_width: u32,
    pub fetch_timeout: Duration,
    pub log_level: String,
    pub test_mode: bool,
}

/// Built-in defaults, before any override
#[derive(Debug, Clone)]
pub struct CompiledDefaults {
    pub data_dir: PathBuf,
    pub images_dir: PathBuf,
    pub static_dir: PathBuf,
}

impl CompiledDefaults {
    pub fn new(test_mode: bool) -> Self {
        let (data, images) = if test_mode {
            ("test_data", "test_images")
        } else {
            ("data", "images")
        };
        Self {
            data_dir: PathBuf::from(data),
            images_dir: PathBuf::from(images),
            static_dir: PathBuf::from("static"),
        }
    }
}

/// `TEST_MODE` is on only for the values "true" and "1"
pub fn is_test_mode(value: Option<&str>) -> bool {
    matches!(value.map(str::trim), Some("true") | Some("1"))
}

/// Read `TEST_MODE` from the process environment
pub fn test_mode_from_env() -> bool {
    is_test_mode(std::env::var(TEST_MODE_VAR).ok().as_deref())
}

/// Default config file location: `<config dir>/artlist/config.toml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("artlist").join("config.toml"))
}

/// Load the TOML config file
///
/// An explicitly requested file must exist. The default location is optional:
/// when absent, defaults are used. A file that exists but does not parse is
/// always an error.
pub fn load_toml_config(explicit: Option<&Path>) -> Result<TomlConfig> {
    let path = match explicit {
        Some(path) => {
            if !path.exists() {
                return Err(Error::Config(format!(
                    "Config file not found: {}",
                    path.display()
                )));
            }
            path.to_path_buf()
        }
        None => match default_config_path() {
            Some(path) if path.exists() => path,
            _ => {
                info!("No config file found, using defaults");
                return Ok(TomlConfig::default());
            }
        },
    };

    let content = std::fs::read_to_string(&path)
        .map_err(|e| Error::Config(format!("Read {} failed: {}", path.display(), e)))?;
    let config = parse_toml_config(&content)
        .map_err(|e| Error::Config(format!("Parse {} failed: {}", path.display(), e)))?;

    info!("Loaded config file {}", path.display());
    Ok(config)
}

pub fn parse_toml_config(content: &str) -> std::result::Result<TomlConfig, toml::de::Error> {
    toml::from_str(content)
}

impl AppConfig {
    /// Merge overrides, TOML values and defaults
    pub fn resolve(overrides: Overrides, toml: TomlConfig, test_mode: bool) -> Result<Self> {
        let defaults = CompiledDefaults::new(test_mode);

        let bind_str = overrides
            .bind
            .or(toml.bind)
            .unwrap_or_else(|| DEFAULT_BIND.to_string());
        let bind = bind_str
            .parse::<SocketAddr>()
            .map_err(|e| Error::Config(format!("Invalid bind address {:?}: {}", bind_str, e)))?;

        let thumbnail_width = match toml.thumbnail_width {
            Some(0) => {
                warn!("thumbnail_width = 0 is invalid, using {}", DEFAULT_THUMBNAIL_WIDTH);
                DEFAULT_THUMBNAIL_WIDTH
            }
            Some(width) => width,
            None => DEFAULT_THUMBNAIL_WIDTH,
        };

        Ok(Self {
            data_dir: overrides
                .data_dir
                .or(toml.data_dir)
                .unwrap_or(defaults.data_dir),
            images_dir: overrides
                .images_dir
                .or(toml.images_dir)
                .unwrap_or(defaults.images_dir),
            static_dir: overrides
                .static_dir
                .or(toml.static_dir)
                .unwrap_or(defaults.static_dir),
            bind,
            thumbnail_width,
            fetch_timeout: Duration::from_secs(
                toml.fetch_timeout_secs
                    .unwrap_or(DEFAULT_FETCH_TIMEOUT_SECS),
            ),
            log_level: toml.logging.level,
            test_mode,
        })
    }

    /// Create the data and images directories if missing
    pub fn ensure_directories(&self) -> Result<()> {
        for dir in [&self.data_dir, &self.images_dir] {
            if !dir.exists() {
                std::fs::create_dir_all(dir)?;
                info!("Created directory {}", dir.display());
            }
        }
        Ok(())
    }
}
