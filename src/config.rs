//! Configuration Module
//!
//! Handles loading and managing server configuration from environment variables.

use std::env;
use std::str::FromStr;

/// Default byte budget: 1 MiB
const DEFAULT_MAX_BYTES: usize = 1024 * 1024;
const DEFAULT_SERVER_PORT: u16 = 9999;

/// Server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Byte budget for keys plus values, 0 = unbounded
    pub max_bytes: usize,
    /// HTTP server port
    pub server_port: u16,
    /// Directory for daily-rotated log files, None = stdout only
    pub log_dir: Option<String>,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `MAX_BYTES` - Cache byte budget, `0` disables eviction (default: 1048576)
    /// - `SERVER_PORT` - HTTP server port (default: 9999)
    /// - `LOG_DIR` - Also write logs to rotating files here (default: unset)
    ///
    /// Values that fail to parse fall back to the default.
    pub fn from_env() -> Self {
        Self {
            max_bytes: env_or("MAX_BYTES", DEFAULT_MAX_BYTES),
            server_port: env_or("SERVER_PORT", DEFAULT_SERVER_PORT),
            log_dir: env::var("LOG_DIR").ok().filter(|dir| !dir.is_empty()),
        }
    }
}

fn env_or<T: FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_bytes: DEFAULT_MAX_BYTES,
            server_port: DEFAULT_SERVER_PORT,
            log_dir: None,
        }
    }
}
