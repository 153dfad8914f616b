//! Desk configuration, read from `desk.toml`.
//!
//! ```toml
//! state_file = "/home/me/.local/share/studio-desk/geometry.json"
//!
//! [listing]
//! url = "https://studio.example/api/audio-browser"
//! start_path = ""
//! timeout_ms = 10000
//! cache_ttl_secs = 0
//!
//! [windows]
//! min_width = 24
//! min_height = 8
//! default_width = 48
//! default_height = 16
//! margin = 2
//! placement = "bottom-left"
//!
//! [log]
//! level = "info"
//! max_lines = 2000
//!
//! [profile]
//! name = "alex"
//! role = "engineer"
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::browser::{BrowserOptions, TreePath};
use crate::components::Profile;
use crate::constants::{
    CELL_DEFAULT_HEIGHT, CELL_DEFAULT_WIDTH, CELL_MARGIN, CELL_MIN_HEIGHT, CELL_MIN_WIDTH,
    DEFAULT_LISTING_TIMEOUT, DEFAULT_LOG_LINES,
};
use crate::geometry::{GeometryDefaults, Placement, Size, SizeLimits};

const APP_NAME: &str = "studio-desk";
const CONFIG_FILE: &str = "desk.toml";
const STATE_FILE: &str = "geometry.json";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("invalid configuration: {0}")]
    Validation(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListingConfig {
    /// HTTP listing endpoint. Without one the built-in demo library is used.
    pub url: Option<String>,
    pub start_path: String,
    pub timeout_ms: u64,
    /// Zero disables the per-folder cache.
    pub cache_ttl_secs: u64,
}

impl Default for ListingConfig {
    fn default() -> Self {
        Self {
            url: None,
            start_path: String::new(),
            timeout_ms: DEFAULT_LISTING_TIMEOUT.as_millis() as u64,
            cache_ttl_secs: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowsConfig {
    pub min_width: i32,
    pub min_height: i32,
    pub default_width: i32,
    pub default_height: i32,
    pub margin: i32,
    pub placement: Placement,
}

impl Default for WindowsConfig {
    fn default() -> Self {
        Self {
            min_width: CELL_MIN_WIDTH,
            min_height: CELL_MIN_HEIGHT,
            default_width: CELL_DEFAULT_WIDTH,
            default_height: CELL_DEFAULT_HEIGHT,
            margin: CELL_MARGIN,
            placement: Placement::BottomLeft,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    pub level: String,
    pub max_lines: usize,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            max_lines: DEFAULT_LOG_LINES,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeskConfig {
    pub state_file: Option<PathBuf>,
    pub listing: ListingConfig,
    pub windows: WindowsConfig,
    pub log: LogConfig,
    pub profile: Profile,
}

impl DeskConfig {
    /// `<config_dir>/studio-desk/desk.toml`, when the platform has one.
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", APP_NAME).map(|dirs| dirs.config_dir().join(CONFIG_FILE))
    }

    /// Loads `path`, or the default location when `None`. A missing file
    /// yields the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path.map(Path::to_path_buf).or_else(Self::default_path) {
            Some(path) => Self::load_from(&path),
            None => Ok(Self::default()),
        }
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content).map_err(|err| match err {
            ConfigError::Parse { source, .. } => ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            },
            other => other,
        })
    }

    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content).map_err(|source| ConfigError::Parse {
            path: PathBuf::new(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let w = &self.windows;
        if w.min_width < 1 || w.min_height < 1 {
            return Err(ConfigError::Validation(
                "windows.min_width and windows.min_height must be at least 1".into(),
            ));
        }
        if self.listing.timeout_ms == 0 {
            return Err(ConfigError::Validation(
                "listing.timeout_ms must be greater than zero".into(),
            ));
        }
        if let Some(url) = &self.listing.url
            && !(url.starts_with("http://") || url.starts_with("https://"))
        {
            return Err(ConfigError::Validation(format!(
                "listing.url must be an http(s) URL, got {url:?}"
            )));
        }
        Ok(())
    }

    /// Geometry key-value file: the configured one, else
    /// `<data_dir>/studio-desk/geometry.json`.
    pub fn state_file_path(&self) -> Option<PathBuf> {
        self.state_file.clone().or_else(|| {
            ProjectDirs::from("", "", APP_NAME).map(|dirs| dirs.data_dir().join(STATE_FILE))
        })
    }

    pub fn size_limits(&self) -> SizeLimits {
        SizeLimits::new(self.windows.min_width, self.windows.min_height)
    }

    pub fn geometry_defaults(&self) -> GeometryDefaults {
        GeometryDefaults {
            size: Size::new(self.windows.default_width, self.windows.default_height),
            margin: self.windows.margin,
            placement: self.windows.placement,
        }
    }

    pub fn listing_timeout(&self) -> Duration {
        Duration::from_millis(self.listing.timeout_ms)
    }

    pub fn browser_options(&self) -> BrowserOptions {
        BrowserOptions {
            start_path: TreePath::parse(&self.listing.start_path),
            timeout: self.listing_timeout(),
            cache_ttl: Duration::from_secs(self.listing.cache_ttl_secs),
        }
    }
}
