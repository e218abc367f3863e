//! Configuration Module
//!
//! Handles loading cache tuning parameters from environment variables.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use directories::ProjectDirs;

const DAY_SECS: u64 = 24 * 60 * 60;

/// Cache and server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Fallback TTL in seconds for object cache entries stored without one
    pub object_default_ttl: u64,
    /// Object cache sweep interval in seconds
    pub sweep_interval: u64,
    /// Maximum number of records per media cache
    pub media_max_entries: usize,
    /// Largest media payload accepted, in estimated bytes
    pub media_max_bytes: usize,
    /// Default TTL in seconds for vector icons
    pub icon_ttl: u64,
    /// Default TTL in seconds for raster images
    pub image_ttl: u64,
    /// Directory for the file-backed key-value store, None = platform cache dir
    pub storage_dir: Option<PathBuf>,
    /// HTTP port of the maintenance API
    pub server_port: u16,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `OBJECT_DEFAULT_TTL` - Object cache fallback TTL in seconds (default: 3600)
    /// - `SWEEP_INTERVAL` - Object cache sweep period in seconds (default: 300)
    /// - `MEDIA_MAX_ENTRIES` - Records per media cache (default: 1000)
    /// - `MEDIA_MAX_BYTES` - Largest accepted media payload (default: 5 MiB)
    /// - `ICON_TTL` - Vector icon TTL in seconds (default: 30 days)
    /// - `IMAGE_TTL` - Raster image TTL in seconds (default: 7 days)
    /// - `STORAGE_DIR` - Media store directory (default: platform cache dir)
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            object_default_ttl: parse_var("OBJECT_DEFAULT_TTL")
                .unwrap_or(defaults.object_default_ttl),
            sweep_interval: parse_var("SWEEP_INTERVAL").unwrap_or(defaults.sweep_interval),
            media_max_entries: parse_var("MEDIA_MAX_ENTRIES")
                .unwrap_or(defaults.media_max_entries),
            media_max_bytes: parse_var("MEDIA_MAX_BYTES").unwrap_or(defaults.media_max_bytes),
            icon_ttl: parse_var("ICON_TTL").unwrap_or(defaults.icon_ttl),
            image_ttl: parse_var("IMAGE_TTL").unwrap_or(defaults.image_ttl),
            storage_dir: env::var("STORAGE_DIR")
                .ok()
                .filter(|v| !v.is_empty())
                .map(PathBuf::from),
            server_port: parse_var("SERVER_PORT").unwrap_or(defaults.server_port),
        }
    }

    /// Directory the file-backed store writes to.
    ///
    /// Falls back to the platform cache directory, then to a relative
    /// `.matchday-cache` directory when no home directory can be found.
    pub fn resolved_storage_dir(&self) -> PathBuf {
        if let Some(dir) = &self.storage_dir {
            return dir.clone();
        }
        ProjectDirs::from("", "", "matchday")
            .map(|dirs| dirs.cache_dir().to_path_buf())
            .unwrap_or_else(|| PathBuf::from(".matchday-cache"))
    }

    pub fn object_default_ttl(&self) -> Duration {
        Duration::from_secs(self.object_default_ttl)
    }

    /// Never shorter than one second.
    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval.max(1))
    }

    pub fn icon_ttl(&self) -> Duration {
        Duration::from_secs(self.icon_ttl)
    }

    pub fn image_ttl(&self) -> Duration {
        Duration::from_secs(self.image_ttl)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            object_default_ttl: 3600,
            sweep_interval: 300,
            media_max_entries: 1000,
            media_max_bytes: 5 * 1024 * 1024,
            icon_ttl: 30 * DAY_SECS,
            image_ttl: 7 * DAY_SECS,
            storage_dir: None,
            server_port: 3000,
        }
    }
}

fn parse_var<T: std::str::FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.object_default_ttl, 3600);
        assert_eq!(config.sweep_interval, 300);
        assert_eq!(config.media_max_entries, 1000);
        assert_eq!(config.media_max_bytes, 5 * 1024 * 1024);
        assert_eq!(config.icon_ttl, 30 * DAY_SECS);
        assert_eq!(config.image_ttl, 7 * DAY_SECS);
        assert_eq!(config.server_port, 3000);
        assert!(config.storage_dir.is_none());
    }

    #[test]
    fn test_config_from_env_defaults() {
        // Clear any existing env vars to test defaults
        for name in [
            "OBJECT_DEFAULT_TTL",
            "SWEEP_INTERVAL",
            "MEDIA_MAX_ENTRIES",
            "MEDIA_MAX_BYTES",
            "ICON_TTL",
            "IMAGE_TTL",
            "STORAGE_DIR",
            "SERVER_PORT",
        ] {
            env::remove_var(name);
        }

        let config = Config::from_env();
        assert_eq!(config.object_default_ttl, 3600);
        assert_eq!(config.sweep_interval, 300);
        assert_eq!(config.media_max_entries, 1000);
        assert_eq!(config.server_port, 3000);
    }

    #[test]
    fn test_explicit_storage_dir_wins() {
        let config = Config {
            storage_dir: Some(PathBuf::from("/tmp/matchday-test")),
            ..Config::default()
        };
        assert_eq!(
            config.resolved_storage_dir(),
            PathBuf::from("/tmp/matchday-test")
        );
    }

    #[test]
    fn test_duration_accessors() {
        let config = Config::default();
        assert_eq!(config.object_default_ttl(), Duration::from_secs(3600));
        assert_eq!(config.sweep_interval(), Duration::from_secs(300));

        let zero = Config {
            sweep_interval: 0,
            ..Config::default()
        };
        assert_eq!(zero.sweep_interval(), Duration::from_secs(1));
    }
}
