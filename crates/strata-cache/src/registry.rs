//! Per-process cache registry.
//!
//! The registry lazily constructs and memoizes one cache instance per
//! logical key, so every caller asking for "the cache for entity X" shares
//! the same prefix and TTL configuration. This is object-level memoization
//! only; the remote value cache is a separate concern.
//!
//! The registry is an explicit object owned by the composition root. There
//! is no global mutable state.

use crate::cache::{Cache, CacheOptions};
use crate::codec::ValueCodec;
use crate::store::CacheStore;
use parking_lot::Mutex;
use std::any::Any;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use strata_core::{CacheError, CacheResult};
use tracing::debug;

/// Process-wide default TTL applied when a cache is registered without one.
pub const REGISTRY_DEFAULT_TTL: Duration = Duration::from_secs(3600);

/// Construction arguments for a cache registered under a logical key.
///
/// Only the first call for a logical key reads these; later calls return
/// the memoized instance and ignore them, so callers must not vary the
/// configuration for the same key.
#[derive(Debug, Clone, Default)]
pub struct CacheSpec {
    /// Key for the cache's type namespace; defaults to the logical key.
    pub type_key: Option<String>,
    /// Instance TTL; the registry default applies when absent.
    pub default_ttl: Option<Duration>,
    /// Field-name to key-fragment mapping exposed by the cache.
    pub key_map: HashMap<String, String>,
}

/// Lazily constructs and memoizes cache instances per logical key.
///
/// Entries persist for the process lifetime; there is no eviction.
pub struct CacheRegistry {
    store: Arc<dyn CacheStore>,
    deploy_key: String,
    default_ttl: Duration,
    caches: Mutex<HashMap<String, Arc<dyn Any + Send + Sync>>>,
}

impl CacheRegistry {
    /// Creates a registry over a shared store adapter.
    #[must_use]
    pub fn new(store: Arc<dyn CacheStore>, deploy_key: impl Into<String>) -> Self {
        Self {
            store,
            deploy_key: deploy_key.into(),
            default_ttl: REGISTRY_DEFAULT_TTL,
            caches: Mutex::new(HashMap::new()),
        }
    }

    /// Overrides the process-wide default TTL.
    #[must_use]
    pub fn with_default_ttl(mut self, default_ttl: Duration) -> Self {
        self.default_ttl = default_ttl;
        self
    }

    /// Returns the memoized cache for `logical_key`, constructing it on
    /// first use.
    ///
    /// Construction runs under the registry lock, so two racing first
    /// accesses observe the same instance. Requesting an existing logical
    /// key under a different codec type is a caller programming error and
    /// fails with [`CacheError::Registry`].
    pub fn cache_by_key<C: ValueCodec>(
        &self,
        logical_key: &str,
        spec: CacheSpec,
    ) -> CacheResult<Arc<Cache<C>>> {
        let mut caches = self.caches.lock();

        let entry = caches.entry(logical_key.to_string()).or_insert_with(|| {
            debug!("Constructing cache instance for logical key '{}'", logical_key);
            let type_key = spec
                .type_key
                .unwrap_or_else(|| logical_key.to_string());
            let options = CacheOptions {
                ttl: Some(spec.default_ttl.unwrap_or(self.default_ttl)),
                key_map: spec.key_map,
            };
            Arc::new(Cache::<C>::new(
                Arc::clone(&self.store),
                &type_key,
                &self.deploy_key,
                options,
            ))
        });

        Arc::clone(entry).downcast::<Cache<C>>().map_err(|_| {
            CacheError::Registry(format!(
                "cache '{}' is already registered under a different codec type",
                logical_key
            ))
        })
    }

    /// Number of memoized cache instances.
    #[must_use]
    pub fn len(&self) -> usize {
        self.caches.lock().len()
    }

    /// True when no cache has been constructed yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.caches.lock().is_empty()
    }
}
