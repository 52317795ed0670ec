//! Cache layer configuration.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for the cache layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Redis connection configuration.
    #[serde(default)]
    pub redis: RedisConfig,

    /// Deployment discriminator baked into every key prefix.
    #[serde(default = "default_deploy_key")]
    pub deploy_key: String,

    /// Default TTL in seconds applied by the registry when a cache is
    /// registered without one.
    #[serde(default = "default_ttl_secs")]
    pub default_ttl_secs: u64,
}

impl CacheConfig {
    /// Registry default TTL as a `Duration`.
    #[must_use]
    pub const fn default_ttl(&self) -> Duration {
        Duration::from_secs(self.default_ttl_secs)
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            redis: RedisConfig::default(),
            deploy_key: default_deploy_key(),
            default_ttl_secs: default_ttl_secs(),
        }
    }
}

/// Redis connection configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedisConfig {
    /// Redis URL.
    #[serde(default = "default_redis_url")]
    pub url: String,

    /// Connection pool size.
    #[serde(default = "default_pool_size")]
    pub pool_size: usize,
}

impl Default for RedisConfig {
    fn default() -> Self {
        Self {
            url: default_redis_url(),
            pool_size: default_pool_size(),
        }
    }
}

fn default_redis_url() -> String {
    "redis://localhost:6379".to_string()
}

fn default_pool_size() -> usize {
    10
}

fn default_deploy_key() -> String {
    "dev".to_string()
}

fn default_ttl_secs() -> u64 {
    3600 // 1 hour
}
