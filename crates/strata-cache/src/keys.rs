//! Tag-delimited cache key encoding.
//!
//! Every key is a sequence of segments wrapped in matched open/close tags,
//! `<tag>value<|tag>`. The close tag makes a rendered key unambiguously
//! decomposable and keeps a wildcard scan over one segment from matching a
//! prefix of another segment's content (`user:1` never matches `user:12`).
//!
//! Tag delimiters must not appear unescaped inside caller-supplied record
//! keys or user ids; the encoder does not sanitize them.

use std::fmt;

/// Segment tag names, fixed by the key format.
mod tag {
    pub const TYPE_PREFIX: &str = "tpf";
    pub const TYPE_KEY: &str = "tpk";
    pub const RECORD_KEY: &str = "rky";
    pub const USER_ID: &str = "uid";
}

fn segment(tag: &str, value: &str) -> String {
    format!("<{}>{}<|{}>", tag, value, tag)
}

/// Immutable leading segment shared by every key a cache instance produces.
///
/// Rendered once at construction as
/// `<tpf>{type_prefix}<|tpf><tpk>{type_key}_{deploy_key}<|tpk>`: the type
/// prefix distinguishes cache flavors (raw vs JSON), and the deploy key
/// namespaces keys per deployment so stale entries from an old release can
/// never be read back by a new one.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyPrefix {
    rendered: String,
}

impl KeyPrefix {
    /// Renders the prefix for a cache type.
    #[must_use]
    pub fn new(type_prefix: &str, type_key: &str, deploy_key: &str) -> Self {
        let deploy_type_key = format!("{}_{}", type_key, deploy_key);
        Self {
            rendered: format!(
                "{}{}",
                segment(tag::TYPE_PREFIX, type_prefix),
                segment(tag::TYPE_KEY, &deploy_type_key)
            ),
        }
    }

    /// The rendered prefix string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.rendered
    }
}

impl fmt::Display for KeyPrefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.rendered)
    }
}

/// Renders the full store key for a record, optionally scoped to a user.
///
/// Deterministic and injective: distinct `(record_key, current_user_id)`
/// pairs under the same prefix always produce distinct strings.
#[must_use]
pub fn build_key(prefix: &KeyPrefix, record_key: &str, current_user_id: Option<&str>) -> String {
    let mut key = format!("{}{}", prefix.as_str(), segment(tag::RECORD_KEY, record_key));

    if let Some(user_id) = current_user_id {
        key.push_str(&segment(tag::USER_ID, user_id));
    }

    key
}

/// Wildcard MATCH pattern covering every key of this cache whose record
/// segment equals `keyword`, including user-scoped variants.
///
/// The pattern embeds the cache's own prefix, so a bulk invalidation is
/// scoped to one cache type and never deletes another cache's keys that
/// happen to embed the same logical id.
#[must_use]
pub fn wildcard_pattern(prefix: &KeyPrefix, keyword: &str) -> String {
    format!("*{}*", build_key(prefix, keyword, None))
}
