use std::{
    collections::HashMap,
    sync::{Arc, RwLock},
    time::{Duration, Instant},
};

use crate::config::CACHE_CAPACITY;

/// Masked policy and value of one position, as handed to the search.
#[derive(Clone, Debug, PartialEq)]
pub struct Evaluation {
    pub policy: Arc<[f32]>,
    pub eval: f32,
}

/// Memo of agent outputs keyed by canonical position key.
///
/// A cache may forget, expire or fail at any time; every failure is a miss.
/// Implementations are shared between concurrent searches.
pub trait EvalCache: Sync {
    fn get(&self, key: &str) -> Option<Evaluation>;
    fn set(&self, key: String, evaluation: Evaluation, ttl: Duration);
}

impl<C: EvalCache + ?Sized> EvalCache for &C {
    fn get(&self, key: &str) -> Option<Evaluation> {
        (**self).get(key)
    }

    fn set(&self, key: String, evaluation: Evaluation, ttl: Duration) {
        (**self).set(key, evaluation, ttl)
    }
}

/// Never remembers anything.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoCache;

impl EvalCache for NoCache {
    fn get(&self, _key: &str) -> Option<Evaluation> {
        None
    }

    fn set(&self, _key: String, _evaluation: Evaluation, _ttl: Duration) {}
}

/// In-process cache with a deadline per entry.
///
/// Holds at most `capacity` entries. A full cache drops its expired entries
/// on the next insert, and forgets everything if none of them had expired.
#[derive(Debug)]
pub struct MemoryCache {
    entries: RwLock<HashMap<String, (Instant, Evaluation)>>,
    capacity: usize,
}

impl Default for MemoryCache {
    fn default() -> Self {
        Self::with_capacity(CACHE_CAPACITY)
    }
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        MemoryCache {
            entries: RwLock::default(),
            capacity: capacity.max(1),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of stored entries, expired ones included.
    pub fn len(&self) -> usize {
        self.entries.read().map(|entries| entries.len()).unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every expired entry.
    pub fn purge_expired(&self) {
        if let Ok(mut entries) = self.entries.write() {
            let now = Instant::now();
            entries.retain(|_, (deadline, _)| *deadline > now);
        }
    }
}

impl EvalCache for MemoryCache {
    fn get(&self, key: &str) -> Option<Evaluation> {
        let entries = self.entries.read().ok()?;
        let (deadline, evaluation) = entries.get(key)?;
        (Instant::now() < *deadline).then(|| evaluation.clone())
    }

    fn set(&self, key: String, evaluation: Evaluation, ttl: Duration) {
        // A poisoned lock only costs us the write.
        if let Ok(mut entries) = self.entries.write() {
            let now = Instant::now();
            if entries.len() >= self.capacity && !entries.contains_key(&key) {
                entries.retain(|_, (deadline, _)| *deadline > now);
                if entries.len() >= self.capacity {
                    entries.clear();
                }
            }
            entries.insert(key, (now + ttl, evaluation));
        }
    }
}

#[cfg(test)]
mod tests {
    use std::{sync::Arc, thread, time::Duration};

    use super::{EvalCache, Evaluation, MemoryCache, NoCache};

    fn evaluation(eval: f32) -> Evaluation {
        Evaluation {
            policy: Arc::from(vec![0.25; 4]),
            eval,
        }
    }

    #[test]
    fn stores_and_returns() {
        let cache = MemoryCache::new();
        assert!(cache.get("a").is_none());
        cache.set("a".to_owned(), evaluation(0.5), Duration::from_secs(60));
        assert_eq!(cache.get("a"), Some(evaluation(0.5)));
        assert!(cache.get("b").is_none());
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn last_write_wins() {
        let cache = MemoryCache::new();
        cache.set("a".to_owned(), evaluation(0.5), Duration::from_secs(60));
        cache.set("a".to_owned(), evaluation(-0.5), Duration::from_secs(60));
        assert_eq!(cache.get("a").map(|e| e.eval), Some(-0.5));
    }

    #[test]
    fn expired_entries_miss() {
        let cache = MemoryCache::new();
        cache.set("a".to_owned(), evaluation(0.5), Duration::ZERO);
        cache.set("b".to_owned(), evaluation(0.5), Duration::from_secs(60));
        assert!(cache.get("a").is_none());
        cache.purge_expired();
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn expired_entries_do_not_pile_up() {
        let cache = MemoryCache::with_capacity(16);
        for i in 0..1000 {
            cache.set(format!("{i}"), evaluation(0.0), Duration::ZERO);
            assert!(cache.len() <= 16);
        }
        assert!(cache.get("999").is_none());
    }

    #[test]
    fn full_cache_starts_over() {
        let cache = MemoryCache::with_capacity(8);
        for i in 0..20 {
            cache.set(format!("{i}"), evaluation(i as f32), Duration::from_secs(60));
            assert!(cache.len() <= 8);
        }
        assert_eq!(cache.get("19").map(|e| e.eval), Some(19.0));
        // overwriting a live key never evicts
        let len = cache.len();
        cache.set("19".to_owned(), evaluation(-1.0), Duration::from_secs(60));
        assert_eq!(cache.len(), len);
    }

    #[test]
    fn no_cache_misses() {
        NoCache.set("a".to_owned(), evaluation(0.5), Duration::from_secs(60));
        assert!(NoCache.get("a").is_none());
    }

    #[test]
    fn shared_between_threads() {
        let cache = MemoryCache::new();
        thread::scope(|s| {
            for t in 0..4 {
                let cache = &cache;
                s.spawn(move || {
                    for i in 0..50 {
                        cache.set(format!("{}", i % 10), evaluation(t as f32), Duration::from_secs(60));
                        let _ = cache.get(&format!("{}", (i + 3) % 10));
                    }
                });
            }
        });
        assert_eq!(cache.len(), 10);
    }
}
