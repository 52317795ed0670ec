//! Value codecs.
//!
//! A codec is the strategy that turns typed values into the store's string
//! representation and back. It also carries the type-prefix discriminator
//! that keeps raw and JSON caches of the same logical key in disjoint key
//! spaces, and the fallback TTL for its flavor.

use serde::{de::DeserializeOwned, Serialize};
use std::marker::PhantomData;
use std::time::Duration;
use strata_core::{CacheError, CacheResult};

/// Encoding strategy for cache values.
///
/// Selected at cache construction; there is no abstract base cache whose
/// methods can be invoked unimplemented.
pub trait ValueCodec: 'static {
    /// The typed value this codec stores and loads.
    type Value: Send + Sync;

    /// Key namespace discriminator for this flavor.
    const TYPE_PREFIX: &'static str;

    /// TTL used when neither the call nor the cache construction supplies
    /// one.
    const FALLBACK_TTL: Duration;

    /// Encodes a value to its stored text form. `key` is attached to encode
    /// errors for context.
    fn encode(key: &str, value: &Self::Value) -> CacheResult<String>;

    /// Decodes stored text back into a value. `key` is attached to decode
    /// errors for context.
    fn decode(key: &str, text: &str) -> CacheResult<Self::Value>;
}

/// Pass-through codec for opaque string values.
pub struct RawCodec;

impl ValueCodec for RawCodec {
    type Value = String;

    const TYPE_PREFIX: &'static str = "craw";
    const FALLBACK_TTL: Duration = Duration::from_secs(60);

    fn encode(_key: &str, value: &String) -> CacheResult<String> {
        Ok(value.clone())
    }

    fn decode(_key: &str, text: &str) -> CacheResult<String> {
        Ok(text.to_owned())
    }
}

/// JSON codec round-tripping any serde-compatible value through text.
pub struct JsonCodec<T>(PhantomData<fn() -> T>);

impl<T> ValueCodec for JsonCodec<T>
where
    T: Serialize + DeserializeOwned + Send + Sync + 'static,
{
    type Value = T;

    const TYPE_PREFIX: &'static str = "cjson";
    const FALLBACK_TTL: Duration = Duration::from_secs(30);

    fn encode(key: &str, value: &T) -> CacheResult<String> {
        serde_json::to_string(value).map_err(|e| CacheError::serialization(key, e))
    }

    fn decode(key: &str, text: &str) -> CacheResult<T> {
        serde_json::from_str(text).map_err(|e| CacheError::deserialization(key, e))
    }
}
