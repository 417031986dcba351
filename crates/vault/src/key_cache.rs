//! Session-scoped map of note id → unlocking password.
//!
//! Lives only in process memory. Nothing here is serializable, and evicted
//! passwords are wiped when their [`Secret`] drops.

use std::{
    collections::HashMap,
    fmt,
    sync::{RwLock, RwLockReadGuard, RwLockWriteGuard},
};

#[cfg(feature = "metrics")]
use locknote_metrics::{gauge, vault as vault_metrics};
use secrecy::Secret;

/// In-memory password cache for one running session.
///
/// Mutations take the write lock so concurrent `set`/`remove`/`clear` never
/// lose an update; `get` takes the read lock and has no side effects. The
/// lock is never held across an `.await`.
#[derive(Default)]
pub struct SessionKeyCache {
    entries: RwLock<HashMap<String, Secret<String>>>,
}

impl SessionKeyCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store the password for `note_id`, replacing any previous one.
    pub fn set(&self, note_id: impl Into<String>, password: Secret<String>) {
        let mut entries = self.write();
        entries.insert(note_id.into(), password);
        Self::record_size(&entries);
    }

    /// Look up the password for `note_id`.
    pub fn get(&self, note_id: &str) -> Option<Secret<String>> {
        self.read().get(note_id).cloned()
    }

    pub fn contains(&self, note_id: &str) -> bool {
        self.read().contains_key(note_id)
    }

    /// Evict `note_id`. Returns whether an entry was present.
    pub fn remove(&self, note_id: &str) -> bool {
        let mut entries = self.write();
        let removed = entries.remove(note_id).is_some();
        Self::record_size(&entries);
        removed
    }

    /// Evict every entry. Returns how many were dropped.
    pub fn clear(&self) -> usize {
        let mut entries = self.write();
        let count = entries.len();
        entries.clear();
        Self::record_size(&entries);

        #[cfg(feature = "tracing")]
        tracing::debug!(count, "session key cache cleared");

        count
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    fn read(&self) -> RwLockReadGuard<'_, HashMap<String, Secret<String>>> {
        self.entries.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<String, Secret<String>>> {
        self.entries.write().unwrap_or_else(|e| e.into_inner())
    }

    #[allow(unused_variables)]
    fn record_size(entries: &HashMap<String, Secret<String>>) {
        #[cfg(feature = "metrics")]
        gauge!(vault_metrics::CACHED_KEYS).set(entries.len() as f64);
    }
}

impl fmt::Debug for SessionKeyCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionKeyCache")
            .field("entries", &self.len())
            .finish()
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use {super::*, secrecy::ExposeSecret, std::sync::Arc};

    fn pw(s: &str) -> Secret<String> {
        Secret::new(s.to_string())
    }

    #[test]
    fn set_then_get() {
        let cache = SessionKeyCache::new();
        cache.set("n", pw("pw"));
        assert_eq!(cache.get("n").unwrap().expose_secret(), "pw");
        assert!(cache.contains("n"));
    }

    #[test]
    fn get_missing_is_none() {
        let cache = SessionKeyCache::new();
        assert!(cache.get("nope").is_none());
    }

    #[test]
    fn set_overwrites() {
        let cache = SessionKeyCache::new();
        cache.set("n", pw("a"));
        cache.set("n", pw("b"));
        assert_eq!(cache.get("n").unwrap().expose_secret(), "b");
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn remove_evicts_and_is_idempotent() {
        let cache = SessionKeyCache::new();
        cache.set("n", pw("pw"));
        assert!(cache.remove("n"));
        assert!(cache.get("n").is_none());
        assert!(!cache.remove("n"));
    }

    #[test]
    fn clear_empties_everything() {
        let cache = SessionKeyCache::new();
        cache.set("a", pw("1"));
        cache.set("b", pw("2"));
        assert_eq!(cache.clear(), 2);
        assert!(cache.is_empty());
        assert!(cache.get("a").is_none());
        assert!(cache.get("b").is_none());
    }

    #[test]
    fn debug_hides_passwords() {
        let cache = SessionKeyCache::new();
        cache.set("n", pw("hunter2"));
        let rendered = format!("{cache:?}");
        assert!(!rendered.contains("hunter2"));
        assert!(rendered.contains("entries: 1"));
    }

    #[test]
    fn concurrent_sets_are_not_lost() {
        let cache = Arc::new(SessionKeyCache::new());
        let handles: Vec<_> = (0..16)
            .map(|i| {
                let cache = Arc::clone(&cache);
                std::thread::spawn(move || {
                    for j in 0..50 {
                        cache.set(format!("note-{i}-{j}"), pw("pw"));
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(cache.len(), 16 * 50);
    }
}
