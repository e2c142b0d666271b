use anyhow::{anyhow, Context};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub app: AppConfig,
    pub storage: StorageBackend,
    pub database: DatabaseConfig,
    pub feed: FeedConfig,
    pub trending: TrendingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub env: String,
    pub host: String,
    pub port: u16,
}

/// Which store implementation backs the read models and write path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    Postgres,
    Memory,
}

impl std::str::FromStr for StorageBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(StorageBackend::Postgres),
            "memory" | "in-memory" => Ok(StorageBackend::Memory),
            other => Err(anyhow!("unknown STORAGE_BACKEND: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Empty when the memory backend is selected.
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedConfig {
    #[serde(default = "default_feed_limit")]
    pub default_limit: u32,
    #[serde(default = "default_feed_max_limit")]
    pub max_limit: u32,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            default_limit: default_feed_limit(),
            max_limit: default_feed_max_limit(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrendingConfig {
    #[serde(default = "default_trending_limit")]
    pub default_limit: u32,
    #[serde(default = "default_trending_window_hours")]
    pub default_window_hours: u32,
    #[serde(default = "default_trending_max_window_hours")]
    pub max_window_hours: u32,
}

impl Default for TrendingConfig {
    fn default() -> Self {
        Self {
            default_limit: default_trending_limit(),
            default_window_hours: default_trending_window_hours(),
            max_window_hours: default_trending_max_window_hours(),
        }
    }
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup so tests do not have to
    /// mutate the process environment.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let storage: StorageBackend = lookup("STORAGE_BACKEND")
            .unwrap_or_else(|| "postgres".to_string())
            .parse()?;

        let url = match (storage, lookup("DATABASE_URL")) {
            (_, Some(url)) => url,
            (StorageBackend::Memory, None) => String::new(),
            (StorageBackend::Postgres, None) => {
                return Err(anyhow!("DATABASE_URL must be set for the postgres backend"))
            }
        };

        let config = Config {
            app: AppConfig {
                env: lookup("APP_ENV").unwrap_or_else(|| "development".to_string()),
                host: lookup("APP_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
                port: parse_or(&lookup, "APP_PORT", 8000)?,
            },
            storage,
            database: DatabaseConfig {
                url,
                max_connections: parse_or(&lookup, "DATABASE_MAX_CONNECTIONS", 10)?,
                min_connections: parse_or(&lookup, "DATABASE_MIN_CONNECTIONS", 1)?,
                acquire_timeout_secs: parse_or(&lookup, "DATABASE_ACQUIRE_TIMEOUT_SECS", 5)?,
            },
            feed: FeedConfig {
                default_limit: parse_or(&lookup, "FEED_DEFAULT_LIMIT", default_feed_limit())?,
                max_limit: parse_or(&lookup, "FEED_MAX_LIMIT", default_feed_max_limit())?,
            },
            trending: TrendingConfig {
                default_limit: parse_or(
                    &lookup,
                    "TRENDING_DEFAULT_LIMIT",
                    default_trending_limit(),
                )?,
                default_window_hours: parse_or(
                    &lookup,
                    "TRENDING_DEFAULT_WINDOW_HOURS",
                    default_trending_window_hours(),
                )?,
                max_window_hours: parse_or(
                    &lookup,
                    "TRENDING_MAX_WINDOW_HOURS",
                    default_trending_max_window_hours(),
                )?,
            },
        };

        if config.feed.default_limit > config.feed.max_limit {
            return Err(anyhow!(
                "FEED_DEFAULT_LIMIT ({}) exceeds FEED_MAX_LIMIT ({})",
                config.feed.default_limit,
                config.feed.max_limit
            ));
        }
        if config.trending.default_window_hours > config.trending.max_window_hours {
            return Err(anyhow!(
                "TRENDING_DEFAULT_WINDOW_HOURS ({}) exceeds TRENDING_MAX_WINDOW_HOURS ({})",
                config.trending.default_window_hours,
                config.trending.max_window_hours
            ));
        }

        Ok(config)
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> anyhow::Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("invalid value for {}: {:?}", key, raw)),
        None => Ok(default),
    }
}

fn default_feed_limit() -> u32 {
    10
}

fn default_feed_max_limit() -> u32 {
    100
}

fn default_trending_limit() -> u32 {
    12
}

fn default_trending_window_hours() -> u32 {
    24
}

fn default_trending_max_window_hours() -> u32 {
    720
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_with_memory_backend() {
        let config = Config::from_lookup(lookup_from(&[("STORAGE_BACKEND", "memory")])).unwrap();

        assert_eq!(config.storage, StorageBackend::Memory);
        assert_eq!(config.app.port, 8000);
        assert_eq!(config.database.max_connections, 10);
        assert_eq!(config.feed.default_limit, 10);
        assert_eq!(config.feed.max_limit, 100);
        assert_eq!(config.trending.default_limit, 12);
        assert_eq!(config.trending.default_window_hours, 24);
        assert_eq!(config.trending.max_window_hours, 720);
    }

    #[test]
    fn test_postgres_requires_database_url() {
        assert!(Config::from_lookup(lookup_from(&[])).is_err());

        let config = Config::from_lookup(lookup_from(&[(
            "DATABASE_URL",
            "postgres://localhost/feed",
        )]))
        .unwrap();
        assert_eq!(config.storage, StorageBackend::Postgres);
        assert_eq!(config.database.url, "postgres://localhost/feed");
    }

    #[test]
    fn test_overrides_and_invalid_values() {
        let config = Config::from_lookup(lookup_from(&[
            ("STORAGE_BACKEND", "memory"),
            ("APP_PORT", "9090"),
            ("TRENDING_DEFAULT_LIMIT", "5"),
        ]))
        .unwrap();
        assert_eq!(config.app.port, 9090);
        assert_eq!(config.trending.default_limit, 5);

        let err = Config::from_lookup(lookup_from(&[
            ("STORAGE_BACKEND", "memory"),
            ("FEED_MAX_LIMIT", "lots"),
        ]));
        assert!(err.is_err());
    }

    #[test]
    fn test_default_limit_may_not_exceed_max() {
        let err = Config::from_lookup(lookup_from(&[
            ("STORAGE_BACKEND", "memory"),
            ("FEED_DEFAULT_LIMIT", "50"),
            ("FEED_MAX_LIMIT", "20"),
        ]));
        assert!(err.is_err());
    }
}
