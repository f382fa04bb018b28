//! Service configuration

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::dashboard::DEFAULT_RECENT_ACTIVITIES;
use crate::report::{DEFAULT_FRAMEWORK, DEFAULT_PERIOD};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub reports: ReportsConfig,
    #[serde(default)]
    pub dashboard: DashboardConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Address to bind
    #[serde(default = "default_bind")]
    pub bind: String,

    /// HTTP API port
    #[serde(default = "default_http_port")]
    pub http_port: u16,

    /// Directory served under /static
    #[serde(default = "default_static_dir")]
    pub static_dir: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory holding the collection files
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

/// Defaults applied when a report request omits framework or period
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportsConfig {
    #[serde(default = "default_framework")]
    pub default_framework: String,

    #[serde(default = "default_period")]
    pub default_period: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardConfig {
    /// How many recent activities the dashboard lists
    #[serde(default = "default_recent_activities")]
    pub recent_activities: usize,
}

// Defaults
fn default_bind() -> String { "0.0.0.0".to_string() }
fn default_http_port() -> u16 { 3000 }
fn default_static_dir() -> PathBuf { PathBuf::from("static") }
fn default_data_dir() -> PathBuf { PathBuf::from("data") }
fn default_framework() -> String { DEFAULT_FRAMEWORK.to_string() }
fn default_period() -> String { DEFAULT_PERIOD.to_string() }
fn default_recent_activities() -> usize { DEFAULT_RECENT_ACTIVITIES }

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            http_port: default_http_port(),
            static_dir: default_static_dir(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

impl Default for ReportsConfig {
    fn default() -> Self {
        Self {
            default_framework: default_framework(),
            default_period: default_period(),
        }
    }
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            recent_activities: default_recent_activities(),
        }
    }
}

impl Config {
    /// Read a TOML config file, or the defaults if it does not exist.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            tracing::info!(path = %path.display(), "Config file not found, using defaults");
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }
}
