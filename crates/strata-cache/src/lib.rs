//! # Strata Cache
//!
//! A namespaced caching layer in front of a remote key-value store.
//!
//! - Tag-delimited key encoding with per-type, per-deployment namespaces
//!   and optional per-user scoping
//! - TTL policy with per-call, per-instance and per-flavor resolution
//! - Raw and JSON value codecs selected at construction, no inheritance
//! - Scan-based bulk invalidation of every key sharing a logical id
//! - A per-process registry memoizing one cache instance per logical key
//!
//! The backing store is consumed only through the [`CacheStore`] contract;
//! [`RedisStore`] is the production adapter and [`MemoryStore`] backs tests
//! and Redis-less deployments.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use strata_cache::{
//!     create_pool, CacheRegistry, CacheSpec, JsonCodec, RedisStore,
//! };
//!
//! let pool = create_pool(&config.redis).await?;
//! let store = Arc::new(RedisStore::new(pool));
//! let registry = CacheRegistry::new(store, &config.deploy_key);
//!
//! let orders = registry.cache_by_key::<JsonCodec<Order>>(
//!     "orders",
//!     CacheSpec::default(),
//! )?;
//!
//! orders.set("order:42", None, &order, None).await?;
//! let cached = orders.get("order:42", None).await?;
//!
//! // Drop every cached entry for this order, user-scoped variants included.
//! orders.delete_all_by_keyword("order:42").await?;
//! ```

pub mod cache;
pub mod codec;
pub mod config;
pub mod keys;
pub mod metrics;
pub mod registry;
pub mod store;

pub use cache::{Cache, CacheOptions, JsonCache, RawCache};
pub use codec::{JsonCodec, RawCodec, ValueCodec};
pub use config::{CacheConfig, RedisConfig};
pub use keys::KeyPrefix;
pub use metrics::{register_metrics, CacheMetrics};
pub use registry::{CacheRegistry, CacheSpec, REGISTRY_DEFAULT_TTL};
pub use store::{create_pool, CacheStore, MemoryStore, RedisStore};
pub use strata_core::{CacheError, CacheResult};
