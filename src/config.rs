//! Configuration loaded from `definer.toml`.
//!
//! Lookup order: explicit `--config` path, `./definer.toml`, then
//! `<config_dir>/definer/config.toml`. A missing file means defaults.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::emit::ScriptNaming;
use crate::error::{DefinerError, Result};

pub const CONFIG_FILE: &str = "definer.toml";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub connection: ConnectionConfig,

    #[serde(default)]
    pub output: OutputConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectionConfig {
    #[serde(default = "default_port")]
    pub port: u16,

    /// `~/.my.cnf` style credentials file. `~/` is expanded.
    #[serde(default)]
    pub credentials_file: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_output_dir")]
    pub dir: PathBuf,

    #[serde(default = "default_forward_prefix")]
    pub forward_prefix: String,

    #[serde(default = "default_rollback_prefix")]
    pub rollback_prefix: String,

    /// Replace existing script files instead of failing.
    #[serde(default)]
    pub overwrite: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default tracing filter when `RUST_LOG` is unset.
    #[serde(default = "default_level")]
    pub level: String,
}

fn default_port() -> u16 {
    3306
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("flyway-views")
}

fn default_forward_prefix() -> String {
    "V".to_string()
}

fn default_rollback_prefix() -> String {
    "U".to_string()
}

fn default_level() -> String {
    "warn".to_string()
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            credentials_file: None,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: default_output_dir(),
            forward_prefix: default_forward_prefix(),
            rollback_prefix: default_rollback_prefix(),
            overwrite: false,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
        }
    }
}

impl Config {
    /// Load from `explicit`, or from the first default location that exists.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }
        match Self::search_paths().into_iter().find(|p| p.exists()) {
            Some(path) => Self::from_file(&path),
            None => Ok(Self::default()),
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| DefinerError::io(path, e))?;
        Self::from_toml(&content)
            .map_err(|e| DefinerError::Config(format!("{}: {}", path.display(), e)))
    }

    pub fn from_toml(content: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    fn search_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from(CONFIG_FILE)];
        if let Some(dir) = dirs::config_dir() {
            paths.push(dir.join("definer").join("config.toml"));
        }
        paths
    }

    /// Credentials file to read: configured path (with `~/` expanded) or `~/.my.cnf`.
    pub fn credentials_path(&self) -> Option<PathBuf> {
        match &self.connection.credentials_file {
            Some(path) => Some(expand_home(path)),
            None => crate::credentials::default_path(),
        }
    }
}

impl OutputConfig {
    pub fn naming(&self) -> ScriptNaming {
        ScriptNaming {
            forward_prefix: self.forward_prefix.clone(),
            rollback_prefix: self.rollback_prefix.clone(),
        }
    }
}

fn expand_home(path: &str) -> PathBuf {
    match (path.strip_prefix("~/"), dirs::home_dir()) {
        (Some(rest), Some(home)) => home.join(rest),
        _ => PathBuf::from(path),
    }
}
