//! Store adapters.
//!
//! The cache core talks to its backend exclusively through [`CacheStore`];
//! the adapter owns connections, reconnection and transport concerns.

mod memory;
mod redis_store;

pub use memory::MemoryStore;
pub use redis_store::{create_pool, RedisStore};

use async_trait::async_trait;
use std::time::Duration;
use strata_core::CacheResult;

/// Minimal contract the cache layer requires from a backing store.
///
/// All operations are asynchronous and independent; the store itself is the
/// only serialization point for concurrent operations on the same key, and
/// two concurrent writes race last-write-wins under the store's own
/// consistency model.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Reads the raw value stored at `key`; `None` when absent or expired.
    async fn get(&self, key: &str) -> CacheResult<Option<String>>;

    /// Writes `value` at `key` with the given time-to-live.
    async fn set(&self, key: &str, value: &str, ttl: Duration) -> CacheResult<()>;

    /// Deletes `key`, returning whether it existed. Deleting an absent key
    /// is not an error.
    async fn delete(&self, key: &str) -> CacheResult<bool>;

    /// Checks whether `key` currently holds a value.
    async fn exists(&self, key: &str) -> CacheResult<bool>;

    /// Enumerates every key matching the `*`-wildcard `pattern`.
    ///
    /// Implementations must drive an incremental scan to completion: a key
    /// present for the whole scan is always returned, and a key deleted
    /// mid-scan must not cause other matches to be skipped or revisited.
    async fn scan(&self, pattern: &str) -> CacheResult<Vec<String>>;
}
