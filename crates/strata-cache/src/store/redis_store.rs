//! Redis-backed store adapter.

use super::CacheStore;
use crate::config::RedisConfig;
use async_trait::async_trait;
use deadpool_redis::{Config, Pool, Runtime};
use redis::AsyncCommands;
use std::time::Duration;
use strata_core::{CacheError, CacheResult};
use tracing::{debug, info};

/// COUNT hint passed to each SCAN page.
const DEFAULT_SCAN_COUNT: u64 = 1000;

/// Create a Redis connection pool for the cache store.
///
/// Validates the connection with a PING before returning; connection-level
/// errors after that are logged by the pool and surface only through the
/// operations they affect.
pub async fn create_pool(config: &RedisConfig) -> CacheResult<Pool> {
    info!("Creating Redis connection pool for cache store...");

    let cfg = Config::from_url(&config.url);

    let pool = cfg
        .builder()
        .map_err(|e| CacheError::Configuration(format!("Invalid Redis config: {}", e)))?
        .max_size(config.pool_size)
        .runtime(Runtime::Tokio1)
        .build()
        .map_err(|e| CacheError::Configuration(format!("Failed to create pool: {}", e)))?;

    // Test connection
    let mut conn = pool
        .get()
        .await
        .map_err(|e| CacheError::Configuration(format!("Failed to reach Redis: {}", e)))?;
    redis::cmd("PING")
        .query_async::<String>(&mut *conn)
        .await
        .map_err(|e| CacheError::Configuration(format!("Redis ping failed: {}", e)))?;

    info!("Redis connection pool created successfully");

    Ok(pool)
}

/// Redis implementation of [`CacheStore`].
pub struct RedisStore {
    pool: Pool,
    scan_count: u64,
}

impl RedisStore {
    /// Creates a store over an existing pool.
    #[must_use]
    pub fn new(pool: Pool) -> Self {
        Self {
            pool,
            scan_count: DEFAULT_SCAN_COUNT,
        }
    }

    /// Overrides the SCAN page size hint.
    #[must_use]
    pub fn with_scan_count(mut self, scan_count: u64) -> Self {
        self.scan_count = scan_count;
        self
    }

    /// Get a connection from the pool. Each operation maps the pool error
    /// to its own error variant.
    async fn conn(&self) -> Result<deadpool_redis::Connection, deadpool_redis::PoolError> {
        self.pool.get().await
    }
}

#[async_trait]
impl CacheStore for RedisStore {
    async fn get(&self, key: &str) -> CacheResult<Option<String>> {
        let mut conn = self
            .conn()
            .await
            .map_err(|e| CacheError::store_read(key, e))?;
        let value: Option<String> = conn
            .get(key)
            .await
            .map_err(|e| CacheError::store_read(key, e))?;

        match &value {
            Some(_) => debug!("Store hit for key '{}'", key),
            None => debug!("Store miss for key '{}'", key),
        }

        Ok(value)
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> CacheResult<()> {
        let mut conn = self
            .conn()
            .await
            .map_err(|e| CacheError::store_write(key, e))?;
        let ttl_secs = ttl.as_secs().max(1);

        conn.set_ex::<_, _, ()>(key, value, ttl_secs)
            .await
            .map_err(|e| CacheError::store_write(key, e))?;

        debug!("Stored key '{}' with TTL {}s", key, ttl_secs);
        Ok(())
    }

    async fn delete(&self, key: &str) -> CacheResult<bool> {
        let mut conn = self
            .conn()
            .await
            .map_err(|e| CacheError::store_write(key, e))?;
        let deleted: i64 = conn
            .del(key)
            .await
            .map_err(|e| CacheError::store_write(key, e))?;

        debug!("Deleted key '{}': {}", key, deleted > 0);
        Ok(deleted > 0)
    }

    async fn exists(&self, key: &str) -> CacheResult<bool> {
        let mut conn = self
            .conn()
            .await
            .map_err(|e| CacheError::store_read(key, e))?;
        let exists: bool = conn
            .exists(key)
            .await
            .map_err(|e| CacheError::store_read(key, e))?;

        Ok(exists)
    }

    async fn scan(&self, pattern: &str) -> CacheResult<Vec<String>> {
        let mut conn = self
            .conn()
            .await
            .map_err(|e| CacheError::scan(pattern, e))?;
        let mut cursor: u64 = 0;
        let mut keys = Vec::new();

        // SCAN guarantees every key present for the whole iteration is
        // returned exactly once, even when matches are deleted mid-scan.
        loop {
            let (next, batch): (u64, Vec<String>) = redis::cmd("SCAN")
                .arg(cursor)
                .arg("MATCH")
                .arg(pattern)
                .arg("COUNT")
                .arg(self.scan_count)
                .query_async(&mut *conn)
                .await
                .map_err(|e| CacheError::scan(pattern, e))?;

            keys.extend(batch);
            cursor = next;

            if cursor == 0 {
                break;
            }
        }

        debug!("Scan for pattern '{}' returned {} keys", pattern, keys.len());
        Ok(keys)
    }
}
