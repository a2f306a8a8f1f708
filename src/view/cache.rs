//! Session content cache keyed by content file name.

use lru::LruCache;
use std::{num::NonZeroUsize, sync::Arc};

/// Fetched content, shared with the detail view without copying.
///
/// Unbounded unless a capacity is given, in which case the least recently
/// viewed file is evicted first.
pub struct ContentCache {
    inner: LruCache<String, Arc<str>>,
}

impl ContentCache {
    pub fn unbounded() -> Self {
        Self {
            inner: LruCache::unbounded(),
        }
    }

    /// `None` (or zero) means unbounded.
    pub fn with_capacity(capacity: Option<usize>) -> Self {
        match capacity.and_then(NonZeroUsize::new) {
            Some(cap) => Self {
                inner: LruCache::new(cap),
            },
            None => Self::unbounded(),
        }
    }

    /// Look up and mark as recently used.
    pub fn get(&mut self, file: &str) -> Option<Arc<str>> {
        self.inner.get(file).cloned()
    }

    pub fn contains(&self, file: &str) -> bool {
        self.inner.contains(file)
    }

    pub fn insert(&mut self, file: String, content: Arc<str>) {
        self.inner.put(file, content);
    }
}

impl Default for ContentCache {
    fn default() -> Self {
        Self::unbounded()
    }
}
