//! Configuration loading and root folder resolution
//!
//! Root folder priority order:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable (`CALLSTATS_ROOT_FOLDER`)
//! 3. TOML config file (`root_folder` key)
//! 4. OS-dependent compiled default (fallback)
//!
//! A missing or broken TOML file never stops startup; it is logged and the
//! compiled defaults are used instead.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Environment variable overriding the root folder
pub const ROOT_FOLDER_ENV: &str = "CALLSTATS_ROOT_FOLDER";

/// Default HTTP bind address for the ingest service
pub const DEFAULT_BIND_ADDRESS: &str = "127.0.0.1:5740";

/// Database filename inside the root folder
pub const DATABASE_FILENAME: &str = "callstats.db";

/// Logging section of the TOML config
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Filter directive for tracing-subscriber (e.g. "info", "callstats_ingest=debug")
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

/// Contents of `callstats.toml`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TomlConfig {
    /// Folder holding the database and the inbox/archive/error directories
    pub root_folder: Option<PathBuf>,

    /// Address the HTTP service listens on
    pub bind_address: Option<String>,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl TomlConfig {
    /// Parse a TOML config file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load the config file, falling back to defaults on any problem
    ///
    /// An explicit path that fails to load is logged at warn; a missing
    /// default-location file is silent.
    pub fn load_or_default(explicit: Option<&Path>) -> Self {
        let path = match explicit {
            Some(path) => path.to_path_buf(),
            None => match default_config_path() {
                Some(path) if path.exists() => path,
                _ => return Self::default(),
            },
        };

        match Self::from_file(&path) {
            Ok(config) => {
                info!("Loaded config: {}", path.display());
                config
            }
            Err(e) => {
                warn!("Ignoring config {}: {}. Using defaults.", path.display(), e);
                Self::default()
            }
        }
    }

    /// Bind address, falling back to the compiled default
    pub fn bind_address(&self) -> &str {
        self.bind_address.as_deref().unwrap_or(DEFAULT_BIND_ADDRESS)
    }
}

/// Resolve the root folder following the priority order in the module docs
pub fn resolve_root_folder(cli_arg: Option<&Path>, toml_config: &TomlConfig) -> PathBuf {
    if let Some(path) = cli_arg {
        return path.to_path_buf();
    }

    if let Ok(path) = std::env::var(ROOT_FOLDER_ENV) {
        if !path.trim().is_empty() {
            return PathBuf::from(path);
        }
    }

    if let Some(path) = &toml_config.root_folder {
        return path.clone();
    }

    default_root_folder()
}

/// Platform location of `callstats.toml`
fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("callstats").join("callstats.toml"))
}

/// OS-dependent default root folder path
pub fn default_root_folder() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("callstats"))
        .unwrap_or_else(|| PathBuf::from("./callstats_data"))
}

/// On-disk layout under the root folder
///
/// A report file lives in exactly one of `inbox`, `archive` or `error`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FolderLayout {
    pub root: PathBuf,
    pub inbox: PathBuf,
    pub archive: PathBuf,
    pub error: PathBuf,
    pub database: PathBuf,
}

impl FolderLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        Self {
            inbox: root.join("inbox"),
            archive: root.join("archive"),
            error: root.join("error"),
            database: root.join(DATABASE_FILENAME),
            root,
        }
    }

    /// Create root, inbox, archive and error directories if missing
    pub fn ensure_directories(&self) -> Result<()> {
        for dir in [&self.root, &self.inbox, &self.archive, &self.error] {
            std::fs::create_dir_all(dir).map_err(|e| {
                Error::Config(format!("Cannot create {}: {}", dir.display(), e))
            })?;
        }
        Ok(())
    }
}
