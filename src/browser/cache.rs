use std::num::NonZeroUsize;
use std::time::{Duration, Instant};

use lru::LruCache;

use super::entry::TreeEntry;
use super::path::TreePath;
use crate::constants::LISTING_CACHE_CAPACITY;

/// Per-path listing cache with a fixed time-to-live. A zero TTL disables it.
///
/// Bounded: the least recently used folder is evicted once `capacity` is
/// reached, and expired listings are purged on every insert.
#[derive(Debug)]
pub struct ListingCache {
    ttl: Duration,
    entries: LruCache<TreePath, (Instant, Vec<TreeEntry>)>,
}

impl ListingCache {
    pub fn new(ttl: Duration) -> Self {
        Self::with_capacity(ttl, LISTING_CACHE_CAPACITY)
    }

    pub fn with_capacity(ttl: Duration, capacity: usize) -> Self {
        Self {
            ttl,
            entries: LruCache::new(NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN)),
        }
    }

    pub fn enabled(&self) -> bool {
        !self.ttl.is_zero()
    }

    fn expired(&self, stored_at: Instant, now: Instant) -> bool {
        now.saturating_duration_since(stored_at) >= self.ttl
    }

    pub fn get(&mut self, path: &TreePath, now: Instant) -> Option<Vec<TreeEntry>> {
        if !self.enabled() {
            return None;
        }
        let stored_at = self.entries.peek(path).map(|(at, _)| *at)?;
        if self.expired(stored_at, now) {
            self.entries.pop(path);
            return None;
        }
        self.entries.get(path).map(|(_, entries)| entries.clone())
    }

    pub fn put(&mut self, path: TreePath, entries: Vec<TreeEntry>, now: Instant) {
        if !self.enabled() {
            return;
        }
        self.purge_expired(now);
        self.entries.put(path, (now, entries));
    }

    fn purge_expired(&mut self, now: Instant) {
        let stale: Vec<TreePath> = self
            .entries
            .iter()
            .filter(|(_, (at, _))| self.expired(*at, now))
            .map(|(path, _)| path.clone())
            .collect();
        for path in stale {
            self.entries.pop(&path);
        }
    }

    pub fn forget(&mut self, path: &TreePath) {
        self.entries.pop(path);
    }

    /// Drops every listing a write at `path` can have changed: the path
    /// itself and each of its ancestors.
    pub fn invalidate_write(&mut self, path: &TreePath) {
        let mut cursor = Some(path.clone());
        while let Some(current) = cursor {
            self.entries.pop(&current);
            cursor = current.parent();
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn listing(parent: &str) -> Vec<TreeEntry> {
        vec![TreeEntry::folder(&TreePath::parse(parent), "child")]
    }

    #[test]
    fn zero_ttl_never_caches() {
        let mut cache = ListingCache::new(Duration::ZERO);
        let now = Instant::now();
        cache.put(TreePath::root(), listing(""), now);
        assert!(cache.get(&TreePath::root(), now).is_none());
        assert!(cache.is_empty());
    }

    #[test]
    fn entries_expire_after_ttl() {
        let mut cache = ListingCache::new(Duration::from_secs(30));
        let now = Instant::now();
        let path = TreePath::parse("a");
        cache.put(path.clone(), listing("a"), now);
        assert!(cache.get(&path, now + Duration::from_secs(29)).is_some());
        assert!(cache.get(&path, now + Duration::from_secs(30)).is_none());
        assert!(cache.is_empty());
    }

    #[test]
    fn expired_folders_are_purged_without_being_revisited() {
        let mut cache = ListingCache::with_capacity(Duration::from_secs(1), 20_000);
        let now = Instant::now();
        for i in 0..10_000 {
            cache.put(TreePath::parse(&format!("f{i}")), Vec::new(), now);
        }
        assert_eq!(cache.len(), 10_000);
        cache.put(TreePath::parse("fresh"), Vec::new(), now + Duration::from_secs(3600));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn capacity_evicts_least_recently_used() {
        let mut cache = ListingCache::with_capacity(Duration::from_secs(60), 2);
        let now = Instant::now();
        cache.put(TreePath::parse("a"), listing("a"), now);
        cache.put(TreePath::parse("b"), listing("b"), now);
        assert!(cache.get(&TreePath::parse("a"), now).is_some());
        cache.put(TreePath::parse("c"), listing("c"), now);
        assert_eq!(cache.len(), 2);
        assert!(cache.get(&TreePath::parse("b"), now).is_none());
        assert!(cache.get(&TreePath::parse("a"), now).is_some());
        assert!(cache.get(&TreePath::parse("c"), now).is_some());
    }

    #[test]
    fn write_invalidates_path_and_ancestors_only() {
        let mut cache = ListingCache::new(Duration::from_secs(30));
        let now = Instant::now();
        for p in ["", "a", "a/b", "c"] {
            cache.put(TreePath::parse(p), listing(p), now);
        }
        cache.invalidate_write(&TreePath::parse("a/b/new.wav"));
        assert!(cache.get(&TreePath::parse("c"), now).is_some());
        assert!(cache.get(&TreePath::parse("a/b"), now).is_none());
        assert!(cache.get(&TreePath::parse("a"), now).is_none());
        assert!(cache.get(&TreePath::root(), now).is_none());
    }
}
