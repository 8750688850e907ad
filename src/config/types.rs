// Configuration types module
// Defines all configuration-related data structures

use serde::Deserialize;
use std::path::PathBuf;

/// Main configuration structure
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub site: SiteConfig,
    pub storage: StorageConfig,
    pub logging: LoggingConfig,
    pub performance: PerformanceConfig,
    pub http: HttpConfig,
}

/// Server configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

/// Site layout: the static root and the fixed documents inside it
#[derive(Debug, Deserialize, Clone)]
pub struct SiteConfig {
    /// Directory against which asset paths are resolved
    pub root: PathBuf,
    /// Served for `GET /`
    pub index_page: String,
    /// Served for `GET /message`
    pub message_page: String,
    /// Served with 404 for anything that does not resolve
    pub error_page: String,
    /// Template rendered for `GET /read`
    pub listing_template: String,
}

impl SiteConfig {
    pub fn index_path(&self) -> PathBuf {
        self.root.join(&self.index_page)
    }

    pub fn message_path(&self) -> PathBuf {
        self.root.join(&self.message_page)
    }

    pub fn error_path(&self) -> PathBuf {
        self.root.join(&self.error_page)
    }
}

/// Durable record store location
#[derive(Debug, Deserialize, Clone)]
pub struct StorageConfig {
    pub data_file: PathBuf,
}

/// Logging configuration
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    pub level: String,
    pub access_log: bool,
    /// Access log format (combined, common, json, or custom pattern)
    #[serde(default = "default_access_log_format")]
    pub access_log_format: String,
    /// Access log file path (optional, stdout if not set)
    #[serde(default)]
    pub access_log_file: Option<String>,
    /// Error log file path (optional, stderr if not set)
    #[serde(default)]
    pub error_log_file: Option<String>,
}

#[allow(clippy::missing_const_for_fn)]
fn default_access_log_format() -> String {
    "combined".to_string()
}

/// Performance configuration
#[derive(Debug, Deserialize, Clone)]
pub struct PerformanceConfig {
    pub keep_alive: bool,
    pub read_timeout: u64,
    pub write_timeout: u64,
    pub max_connections: Option<u64>,
}

/// HTTP configuration
#[derive(Debug, Deserialize, Clone)]
pub struct HttpConfig {
    pub server_name: String,
    pub max_body_size: u64,
}
