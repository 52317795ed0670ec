//! In-memory store adapter.
//!
//! Implements the same contract as [`RedisStore`](super::RedisStore),
//! including per-entry expiry and `*`-wildcard scans. Backs the test suite
//! and Redis-less deployments.

use super::CacheStore;
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::time::{Duration, Instant};
use strata_core::CacheResult;

struct Entry {
    value: String,
    expires_at: Instant,
}

impl Entry {
    fn is_expired(&self) -> bool {
        Instant::now() >= self.expires_at
    }
}

/// In-memory implementation of [`CacheStore`].
#[derive(Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, Entry>>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Remaining TTL for `key`, if it holds a live entry. Exposed so tests
    /// can assert TTL precedence without waiting out expirations.
    #[must_use]
    pub fn remaining_ttl(&self, key: &str) -> Option<Duration> {
        let entries = self.entries.lock();
        entries
            .get(key)
            .filter(|e| !e.is_expired())
            .map(|e| e.expires_at.duration_since(Instant::now()))
    }

    /// Number of live entries.
    #[must_use]
    pub fn len(&self) -> usize {
        let entries = self.entries.lock();
        entries.values().filter(|e| !e.is_expired()).count()
    }

    /// True when no live entry remains.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// `*`-wildcard match with leftmost-greedy fragment consumption.
fn glob_match(pattern: &str, key: &str) -> bool {
    let fragments: Vec<&str> = pattern.split('*').collect();
    if fragments.len() == 1 {
        return pattern == key;
    }

    let first = fragments[0];
    if !key.starts_with(first) {
        return false;
    }
    let mut remainder = &key[first.len()..];

    for fragment in &fragments[1..fragments.len() - 1] {
        if fragment.is_empty() {
            continue;
        }
        match remainder.find(fragment) {
            Some(pos) => remainder = &remainder[pos + fragment.len()..],
            None => return false,
        }
    }

    remainder.ends_with(fragments[fragments.len() - 1])
}

#[async_trait]
impl CacheStore for MemoryStore {
    async fn get(&self, key: &str) -> CacheResult<Option<String>> {
        let mut entries = self.entries.lock();
        match entries.get(key) {
            Some(entry) if !entry.is_expired() => Ok(Some(entry.value.clone())),
            Some(_) => {
                entries.remove(key);
                Ok(None)
            }
            None => Ok(None),
        }
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> CacheResult<()> {
        let mut entries = self.entries.lock();
        entries.insert(
            key.to_string(),
            Entry {
                value: value.to_string(),
                expires_at: Instant::now() + ttl,
            },
        );
        Ok(())
    }

    async fn delete(&self, key: &str) -> CacheResult<bool> {
        let mut entries = self.entries.lock();
        Ok(matches!(entries.remove(key), Some(entry) if !entry.is_expired()))
    }

    async fn exists(&self, key: &str) -> CacheResult<bool> {
        Ok(self.get(key).await?.is_some())
    }

    async fn scan(&self, pattern: &str) -> CacheResult<Vec<String>> {
        let entries = self.entries.lock();
        Ok(entries
            .iter()
            .filter(|(key, entry)| !entry.is_expired() && glob_match(pattern, key))
            .map(|(key, _)| key.clone())
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_glob_match_plain() {
        assert!(glob_match("abc", "abc"));
        assert!(!glob_match("abc", "abcd"));
    }

    #[test]
    fn test_glob_match_wrapped() {
        assert!(glob_match("*<rky>user:1<|rky>*", "p<rky>user:1<|rky><uid>u9<|uid>"));
        assert!(!glob_match("*<rky>user:1<|rky>*", "p<rky>user:12<|rky>"));
    }

    #[test]
    fn test_glob_match_anchored() {
        assert!(glob_match("pre*", "prefix"));
        assert!(!glob_match("pre*", "xprefix"));
        assert!(glob_match("*fix", "prefix"));
        assert!(!glob_match("*fix", "prefixes"));
    }

    #[tokio::test]
    async fn test_set_get_delete_round_trip() {
        let store = MemoryStore::new();
        store.set("k", "v", Duration::from_secs(60)).await.unwrap();

        assert_eq!(store.get("k").await.unwrap().as_deref(), Some("v"));
        assert!(store.exists("k").await.unwrap());

        assert!(store.delete("k").await.unwrap());
        assert!(!store.delete("k").await.unwrap());
        assert_eq!(store.get("k").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_expired_entry_reads_as_absent() {
        let store = MemoryStore::new();
        store.set("k", "v", Duration::from_nanos(1)).await.unwrap();

        std::thread::sleep(Duration::from_millis(5));
        assert_eq!(store.get("k").await.unwrap(), None);
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_scan_skips_non_matches() {
        let store = MemoryStore::new();
        store.set("a:1", "v", Duration::from_secs(60)).await.unwrap();
        store.set("a:2", "v", Duration::from_secs(60)).await.unwrap();
        store.set("b:1", "v", Duration::from_secs(60)).await.unwrap();

        let mut keys = store.scan("*a:*").await.unwrap();
        keys.sort();
        assert_eq!(keys, vec!["a:1", "a:2"]);
    }
}
