//! Search sessions - short opaque keys for stateless pagination / 搜索会话
//!
//! Pagination callbacks only carry the key, the normalized query text lives
//! here. Entries expire after a TTL and the store is capacity bounded.

use std::time::Duration;

use moka::policy::EvictionPolicy;
use moka::sync::Cache;
use sha1::{Digest, Sha1};

/// Hex characters kept from the SHA-1 digest
pub const SESSION_KEY_LEN: usize = 8;

/// Normalize user text for session keys / 规范化查询文本
pub fn normalize_query(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Deterministic key: SHA-1 prefix of the normalized text / 生成会话键
pub fn session_key(normalized: &str) -> String {
    let digest = Sha1::digest(normalized.as_bytes());
    let mut key = hex::encode(digest);
    key.truncate(SESSION_KEY_LEN);
    key
}

/// Session store interface, injected into the gateway / 会话存储接口
pub trait SessionStore: Send + Sync {
    fn insert(&self, key: String, query: String);
    fn get(&self, key: &str) -> Option<String>;
}

/// In-memory session store with capacity and time-to-live / 内存会话存储
#[derive(Debug, Clone)]
pub struct MemorySessionStore {
    cache: Cache<String, String>,
}

impl MemorySessionStore {
    /// Least-recently-used entries are evicted first, so a freshly
    /// registered key always survives a full cache.
    pub fn new(max_sessions: u64, ttl_seconds: u64) -> Self {
        let cache = Cache::builder()
            .max_capacity(max_sessions.max(1))
            .time_to_live(Duration::from_secs(ttl_seconds.max(1)))
            .eviction_policy(EvictionPolicy::lru())
            .build();
        Self { cache }
    }
}

impl SessionStore for MemorySessionStore {
    fn insert(&self, key: String, query: String) {
        self.cache.insert(key, query);
    }

    fn get(&self, key: &str) -> Option<String> {
        self.cache.get(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_key_deterministic() {
        let a = session_key(&normalize_query("  Cat OR Dog "));
        let b = session_key(&normalize_query("cat or dog"));
        assert_eq!(a, b);
        assert_eq!(a.len(), SESSION_KEY_LEN);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(a, session_key("cat"));
    }

    #[test]
    fn test_session_key_known_digest() {
        // sha1("abc") = a9993e36...
        assert_eq!(session_key("abc"), "a9993e36");
    }

    #[test]
    fn test_store_roundtrip_and_unknown() {
        let store = MemorySessionStore::new(16, 3600);
        store.insert("k1".to_string(), "cat".to_string());
        assert_eq!(store.get("k1").as_deref(), Some("cat"));
        assert_eq!(store.get("missing"), None);
    }

    #[test]
    fn test_store_is_bounded() {
        let store = MemorySessionStore::new(2, 3600);
        for i in 0..50 {
            store.insert(format!("k{}", i), format!("q{}", i));
        }
        store.cache.run_pending_tasks();
        assert!(store.cache.entry_count() <= 2);
    }

    #[test]
    fn test_full_store_admits_new_session() {
        let store = MemorySessionStore::new(2, 3600);
        store.insert("old1".to_string(), "a".to_string());
        store.insert("old2".to_string(), "b".to_string());
        for _ in 0..20 {
            store.get("old1");
            store.get("old2");
        }
        store.insert("fresh".to_string(), "c".to_string());
        store.cache.run_pending_tasks();

        assert_eq!(store.get("fresh").as_deref(), Some("c"));
        assert!(store.cache.entry_count() <= 2);
    }

    #[test]
    fn test_zero_settings_are_clamped() {
        let store = MemorySessionStore::new(0, 0);
        store.insert("k".to_string(), "cat".to_string());
        store.cache.run_pending_tasks();
        assert_eq!(store.get("k").as_deref(), Some("cat"));
    }

    #[test]
    fn test_store_expires() {
        let store = MemorySessionStore::new(16, 1);
        store.insert("k".to_string(), "cat".to_string());
        std::thread::sleep(Duration::from_millis(1200));
        assert_eq!(store.get("k"), None);
    }
}
