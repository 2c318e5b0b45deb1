//! Artifact cache
//!
//! Maps (normalized URL, pixel size) to rendered PNG bytes so identical
//! requests never re-encode. Entries are immutable once written; total
//! size is bounded by a byte budget with least-recently-used eviction.
//! Failed generations are never stored, so an identical retry re-invokes
//! the generator.

use crate::qr::GenerateError;
use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex};

/// A delivered artifact: PNG bytes plus whether they came from the cache.
#[derive(Debug, Clone)]
pub struct Artifact {
    pub bytes: Arc<Vec<u8>>,
    pub from_cache: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    url: String,
    pixel: u32,
}

struct CacheEntry {
    bytes: Arc<Vec<u8>>,
    stamp: u64,
}

#[derive(Default)]
struct CacheInner {
    entries: HashMap<CacheKey, CacheEntry>,
    total_bytes: usize,
    clock: u64,
}

/// Synchronized artifact store shared across all chats.
pub struct ArtifactCache {
    max_bytes: usize,
    inner: Mutex<CacheInner>,
}

impl ArtifactCache {
    /// A `max_bytes` of 0 disables caching entirely.
    pub fn new(max_bytes: usize) -> Self {
        Self {
            max_bytes,
            inner: Mutex::new(CacheInner::default()),
        }
    }

    /// Return the cached artifact for (url, pixel), or run `generate` and
    /// store its result. Concurrent identical misses may both generate;
    /// both observe complete bytes afterwards.
    pub async fn get_or_generate<F, Fut>(
        &self,
        url: &str,
        pixel: u32,
        generate: F,
    ) -> Result<Artifact, GenerateError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Vec<u8>, GenerateError>>,
    {
        if let Some(bytes) = self.lookup(url, pixel) {
            tracing::debug!(url, pixel, "artifact cache hit");
            return Ok(Artifact {
                bytes,
                from_cache: true,
            });
        }

        let bytes = Arc::new(generate().await?);
        self.insert(url, pixel, Arc::clone(&bytes));
        Ok(Artifact {
            bytes,
            from_cache: false,
        })
    }

    fn lookup(&self, url: &str, pixel: u32) -> Option<Arc<Vec<u8>>> {
        let mut inner = self.inner.lock().expect("cache lock poisoned");
        inner.clock += 1;
        let stamp = inner.clock;
        let key = CacheKey {
            url: url.to_string(),
            pixel,
        };
        let entry = inner.entries.get_mut(&key)?;
        entry.stamp = stamp;
        Some(Arc::clone(&entry.bytes))
    }

    fn insert(&self, url: &str, pixel: u32, bytes: Arc<Vec<u8>>) {
        if self.max_bytes == 0 {
            return;
        }
        let size = bytes.len();
        if size > self.max_bytes {
            tracing::debug!(url, pixel, size, "artifact larger than cache budget, not stored");
            return;
        }

        let mut inner = self.inner.lock().expect("cache lock poisoned");
        inner.clock += 1;
        let stamp = inner.clock;
        let key = CacheKey {
            url: url.to_string(),
            pixel,
        };
        if let Some(old) = inner.entries.insert(key, CacheEntry { bytes, stamp }) {
            inner.total_bytes -= old.bytes.len();
        }
        inner.total_bytes += size;

        while inner.total_bytes > self.max_bytes {
            let Some(oldest) = inner
                .entries
                .iter()
                .min_by_key(|(_, entry)| entry.stamp)
                .map(|(key, _)| key.clone())
            else {
                break;
            };
            if let Some(evicted) = inner.entries.remove(&oldest) {
                inner.total_bytes -= evicted.bytes.len();
                tracing::debug!(url = %oldest.url, pixel = oldest.pixel, "evicted artifact from cache");
            }
        }
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.inner.lock().expect("cache lock poisoned").entries.len()
    }
}
