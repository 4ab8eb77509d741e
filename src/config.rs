//! Configuration Module
//!
//! Handles loading client, cache and dev backend configuration from
//! environment variables.

use std::env;
use std::str::FromStr;
use std::time::Duration;

/// Which data source the API client talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataSourceKind {
    /// REST backend at `api_base_url`
    Remote,
    /// Session-local in-memory catalog
    Mock,
}

impl FromStr for DataSourceKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "remote" => Ok(DataSourceKind::Remote),
            "mock" => Ok(DataSourceKind::Mock),
            other => Err(format!("unknown data source: {}", other)),
        }
    }
}

/// Client configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the REST backend, including the `/api` prefix
    pub api_base_url: String,
    /// Per-request timeout in milliseconds
    pub request_timeout_ms: u64,
    /// Data source selected at startup
    pub data_source: DataSourceKind,
    /// Serve mock data when the remote backend is unreachable
    pub offline_fallback: bool,
    /// TTL for item lookups, categories and print settings
    pub item_cache_ttl_ms: u64,
    /// TTL for the recent scan log
    pub logs_cache_ttl_ms: u64,
    /// TTL for the Square connection status
    pub status_cache_ttl_ms: u64,
    /// Interval between background status polls, in seconds
    pub status_poll_interval_secs: u64,
    /// Port for the local dev backend
    pub server_port: u16,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `API_BASE_URL` - Backend base URL (default: http://localhost:3000/api)
    /// - `REQUEST_TIMEOUT_MS` - Request timeout (default: 10000)
    /// - `DATA_SOURCE` - `remote` or `mock` (default: remote)
    /// - `OFFLINE_FALLBACK` - Fall back to mock data on transport errors (default: false)
    /// - `ITEM_CACHE_TTL_MS` - Item cache TTL (default: 300000)
    /// - `LOGS_CACHE_TTL_MS` - Recent logs cache TTL (default: 30000)
    /// - `STATUS_CACHE_TTL_MS` - Square status cache TTL (default: 60000)
    /// - `STATUS_POLL_INTERVAL_SECS` - Status poll interval (default: 60)
    /// - `SERVER_PORT` - Dev backend port (default: 3000)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            api_base_url: env::var("API_BASE_URL").unwrap_or(defaults.api_base_url),
            request_timeout_ms: env_or("REQUEST_TIMEOUT_MS", defaults.request_timeout_ms),
            data_source: env_or("DATA_SOURCE", defaults.data_source),
            offline_fallback: env_or("OFFLINE_FALLBACK", defaults.offline_fallback),
            item_cache_ttl_ms: env_or("ITEM_CACHE_TTL_MS", defaults.item_cache_ttl_ms),
            logs_cache_ttl_ms: env_or("LOGS_CACHE_TTL_MS", defaults.logs_cache_ttl_ms),
            status_cache_ttl_ms: env_or("STATUS_CACHE_TTL_MS", defaults.status_cache_ttl_ms),
            status_poll_interval_secs: env_or(
                "STATUS_POLL_INTERVAL_SECS",
                defaults.status_poll_interval_secs,
            ),
            server_port: env_or("SERVER_PORT", defaults.server_port),
        }
    }

    /// Request timeout as a `Duration`.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
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
            api_base_url: "http://localhost:3000/api".to_string(),
            request_timeout_ms: 10_000,
            data_source: DataSourceKind::Remote,
            offline_fallback: false,
            item_cache_ttl_ms: 5 * 60 * 1000,
            logs_cache_ttl_ms: 30_000,
            status_cache_ttl_ms: 60_000,
            status_poll_interval_secs: 60,
            server_port: 3000,
        }
    }
}
