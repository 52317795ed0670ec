//! The cache abstraction: namespaced keys, TTL policy, codec-driven values.

use crate::codec::{JsonCodec, RawCodec, ValueCodec};
use crate::keys::{self, KeyPrefix};
use crate::metrics::CacheMetrics;
use crate::store::CacheStore;
use serde::{de::DeserializeOwned, Serialize};
use std::collections::HashMap;
use std::future::Future;
use std::marker::PhantomData;
use std::sync::Arc;
use std::time::Duration;
use strata_core::{CacheError, CacheResult};
use tracing::{debug, warn};

/// Options accepted when constructing a cache instance.
#[derive(Debug, Clone, Default)]
pub struct CacheOptions {
    /// Instance TTL; the codec fallback applies when absent.
    pub ttl: Option<Duration>,
    /// Immutable mapping from logical field names to encoded key fragments.
    pub key_map: HashMap<String, String>,
}

/// A namespaced cache over a backing store.
///
/// The codec parameter selects the value representation and the key-space
/// flavor: [`RawCache`] stores opaque strings, [`JsonCache`] round-trips any
/// serde-compatible type. Both share every primitive below; there is no
/// inheritance and no abstract method to call unimplemented.
///
/// The prefix is derived once at construction and immutable afterwards. The
/// instance holds no locks on the data path: concurrent operations race at
/// the store, last-write-wins.
pub struct Cache<C: ValueCodec> {
    store: Arc<dyn CacheStore>,
    prefix: KeyPrefix,
    ttl: Duration,
    key_map: HashMap<String, String>,
    _codec: PhantomData<fn() -> C>,
}

impl<C: ValueCodec> std::fmt::Debug for Cache<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cache")
            .field("prefix", &self.prefix)
            .field("ttl", &self.ttl)
            .field("key_map", &self.key_map)
            .finish_non_exhaustive()
    }
}

/// Cache flavor storing opaque string values.
pub type RawCache = Cache<RawCodec>;

/// Cache flavor round-tripping a typed value through JSON.
pub type JsonCache<T> = Cache<JsonCodec<T>>;

impl<C: ValueCodec> Cache<C> {
    /// Creates a cache instance.
    ///
    /// TTL resolution: `options.ttl` when given, otherwise the codec's
    /// fallback (60s raw, 30s JSON). The registry fills in its own
    /// process-wide default before calling this.
    #[must_use]
    pub fn new(
        store: Arc<dyn CacheStore>,
        type_key: &str,
        deploy_key: &str,
        options: CacheOptions,
    ) -> Self {
        Self {
            prefix: KeyPrefix::new(C::TYPE_PREFIX, type_key, deploy_key),
            ttl: options.ttl.unwrap_or(C::FALLBACK_TTL),
            key_map: options.key_map,
            store,
            _codec: PhantomData,
        }
    }

    /// The fixed leading segment of every key this instance produces.
    #[must_use]
    pub fn prefix(&self) -> &KeyPrefix {
        &self.prefix
    }

    /// The instance TTL.
    #[must_use]
    pub const fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Read-only view of the field-name to key-fragment mapping.
    #[must_use]
    pub const fn key_map(&self) -> &HashMap<String, String> {
        &self.key_map
    }

    /// Renders the full store key for a record, optionally user-scoped.
    #[must_use]
    pub fn build_key(&self, key: &str, current_user_id: Option<&str>) -> String {
        keys::build_key(&self.prefix, key, current_user_id)
    }

    /// Writes a value, encoding it through the codec.
    ///
    /// TTL precedence: `ttl` argument over the instance TTL.
    pub async fn set(
        &self,
        key: &str,
        current_user_id: Option<&str>,
        value: &C::Value,
        ttl: Option<Duration>,
    ) -> CacheResult<()> {
        let cache_key = self.build_key(key, current_user_id);
        let text = C::encode(&cache_key, value)?;
        self.set_text(&cache_key, &text, ttl).await
    }

    /// Reads a value, decoding it through the codec.
    ///
    /// An absent key is [`CacheError::Miss`]; callers branch on it via
    /// [`CacheError::is_miss`].
    pub async fn get(&self, key: &str, current_user_id: Option<&str>) -> CacheResult<C::Value> {
        let cache_key = self.build_key(key, current_user_id);
        let text = self.get_text(&cache_key).await?;
        C::decode(&cache_key, &text)
    }

    /// Checks whether a value is present without reading it.
    pub async fn exists(&self, key: &str, current_user_id: Option<&str>) -> CacheResult<bool> {
        self.store
            .exists(&self.build_key(key, current_user_id))
            .await
    }

    /// Deletes a record's entry. Deleting an absent key succeeds.
    pub async fn delete(&self, key: &str, current_user_id: Option<&str>) -> CacheResult<()> {
        self.store
            .delete(&self.build_key(key, current_user_id))
            .await?;
        CacheMetrics::delete(C::TYPE_PREFIX);
        Ok(())
    }

    /// Reads a value, computing and caching it on a miss.
    ///
    /// The backfill write is best-effort: a store write failure is logged
    /// and the freshly computed value is still returned.
    pub async fn get_or_set<F, Fut>(
        &self,
        key: &str,
        current_user_id: Option<&str>,
        factory: F,
    ) -> CacheResult<C::Value>
    where
        F: FnOnce() -> Fut + Send,
        Fut: Future<Output = CacheResult<C::Value>> + Send,
    {
        match self.get(key, current_user_id).await {
            Ok(value) => Ok(value),
            Err(err) if err.is_miss() => {
                let value = factory().await?;
                if let Err(err) = self.set(key, current_user_id, &value, None).await {
                    warn!("Failed to backfill cache for key '{}': {}", key, err);
                }
                Ok(value)
            }
            Err(err) => Err(err),
        }
    }

    /// Deletes every key of this cache whose record segment is `keyword`,
    /// including user-scoped variants. Returns the number of keys removed.
    ///
    /// The wildcard pattern embeds this cache's prefix, so invalidation is
    /// scoped to one cache type and never touches another cache that stores
    /// the same logical id. A scan failure rejects the whole call; deletes
    /// issued before the failure are not rolled back. Per-key delete
    /// failures do not short-circuit: every scanned key is submitted, and
    /// the first delete error is returned once the pass completes.
    pub async fn delete_all_by_keyword(&self, keyword: &str) -> CacheResult<u64> {
        let pattern = keys::wildcard_pattern(&self.prefix, keyword);
        let matches = self.store.scan(&pattern).await?;

        let mut deleted = 0u64;
        let mut first_error = None;

        for key in &matches {
            match self.store.delete(key).await {
                Ok(existed) => {
                    if existed {
                        deleted += 1;
                    }
                }
                Err(err) => {
                    warn!(
                        "Failed to delete key '{}' during bulk invalidation: {}",
                        key, err
                    );
                    if first_error.is_none() {
                        first_error = Some(err);
                    }
                }
            }
        }

        debug!(
            "Bulk invalidation for keyword '{}' deleted {} of {} matched keys",
            keyword,
            deleted,
            matches.len()
        );
        CacheMetrics::invalidated(C::TYPE_PREFIX, deleted);

        match first_error {
            Some(err) => Err(err),
            None => Ok(deleted),
        }
    }

    /// Writes any serializable value as JSON, regardless of codec flavor.
    pub async fn set_json<T: Serialize + Sync>(
        &self,
        key: &str,
        current_user_id: Option<&str>,
        value: &T,
        ttl: Option<Duration>,
    ) -> CacheResult<()> {
        let cache_key = self.build_key(key, current_user_id);
        let text =
            serde_json::to_string(value).map_err(|e| CacheError::serialization(&cache_key, e))?;
        self.set_text(&cache_key, &text, ttl).await
    }

    /// Reads a JSON value back as `T`, regardless of codec flavor.
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        key: &str,
        current_user_id: Option<&str>,
    ) -> CacheResult<T> {
        let cache_key = self.build_key(key, current_user_id);
        let text = self.get_text(&cache_key).await?;
        serde_json::from_str(&text).map_err(|e| CacheError::deserialization(&cache_key, e))
    }

    async fn set_text(&self, cache_key: &str, text: &str, ttl: Option<Duration>) -> CacheResult<()> {
        self.store
            .set(cache_key, text, ttl.unwrap_or(self.ttl))
            .await?;
        CacheMetrics::write(C::TYPE_PREFIX);
        Ok(())
    }

    async fn get_text(&self, cache_key: &str) -> CacheResult<String> {
        match self.store.get(cache_key).await? {
            Some(text) => {
                CacheMetrics::hit(C::TYPE_PREFIX);
                Ok(text)
            }
            None => {
                CacheMetrics::miss(C::TYPE_PREFIX);
                Err(CacheError::miss(cache_key))
            }
        }
    }
}
