use std::num::NonZeroUsize;
use std::sync::Arc;

use lru::LruCache;
use parking_lot::Mutex;
use xxhash_rust::xxh3::xxh3_64;

use crate::layout::JustifiedLayout;
use crate::models::{Image, Layout};

/// Maximum number of cached layouts to keep in memory.
const MAX_CACHE_ENTRIES: usize = 8;

/// Key for the layout cache, combining the exact container width and list hash.
///
/// Widths are not bucketed: rows are justified to the exact pixel width, so
/// a layout computed for one width is wrong for any other.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
struct CacheKey {
    width_bits: u64,
    list_hash: u64,
}

impl CacheKey {
    fn new(container_width: f64, list_hash: u64) -> Self {
        Self {
            width_bits: container_width.to_bits(),
            list_hash,
        }
    }
}

/// Recently computed layouts, keyed by `(container_width, list_hash)`.
///
/// Resizing back and forth between a few widths (entering and leaving
/// fullscreen, toggling a sidebar) hits the cache instead of re-packing.
pub struct LayoutCache {
    cache: Mutex<LruCache<CacheKey, Arc<Layout>>>,
}

impl LayoutCache {
    /// Creates a new empty layout cache.
    pub fn new() -> Self {
        let capacity = NonZeroUsize::new(MAX_CACHE_ENTRIES).unwrap_or(NonZeroUsize::MIN);
        Self {
            cache: Mutex::new(LruCache::new(capacity)),
        }
    }

    /// Computes a fast hash of the image list.
    ///
    /// Covers id, href and intrinsic size of every image in order, so any
    /// change to the list or its order produces a different hash.
    pub fn compute_list_hash(images: &[Image]) -> u64 {
        let mut hasher_input = Vec::with_capacity(images.len() * 64);

        for image in images {
            for field in [image.id.as_bytes(), image.href.as_bytes()] {
                hasher_input.extend_from_slice(&(field.len() as u64).to_le_bytes());
                hasher_input.extend_from_slice(field);
            }
            hasher_input.extend_from_slice(&image.dimensions.w.to_le_bytes());
            hasher_input.extend_from_slice(&image.dimensions.h.to_le_bytes());
        }

        xxh3_64(&hasher_input)
    }

    /// Returns the cached layout, marking it most recently used.
    pub fn get(&self, container_width: f64, list_hash: u64) -> Option<Arc<Layout>> {
        self.cache
            .lock()
            .get(&CacheKey::new(container_width, list_hash))
            .cloned()
    }

    /// Stores a layout, evicting the least recently used one at capacity.
    pub fn set(&self, container_width: f64, list_hash: u64, rows: Arc<Layout>) {
        self.cache
            .lock()
            .put(CacheKey::new(container_width, list_hash), rows);
    }

    /// Clears the entire cache.
    pub fn clear(&self) {
        self.cache.lock().clear();
    }

    /// Returns the number of cached layouts.
    pub fn len(&self) -> usize {
        self.cache.lock().len()
    }

    /// Returns true if the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.cache.lock().is_empty()
    }
}

impl Default for LayoutCache {
    fn default() -> Self {
        Self::new()
    }
}

/// Combines layout computation with caching.
pub struct CachedLayoutComputer {
    pub layout: JustifiedLayout,
    pub cache: LayoutCache,
}

impl CachedLayoutComputer {
    /// Creates a new cached layout computer with default settings.
    pub fn new() -> Self {
        Self::with_layout(JustifiedLayout::default())
    }

    /// Creates a new cached layout computer with custom layout settings.
    pub fn with_layout(layout: JustifiedLayout) -> Self {
        Self {
            layout,
            cache: LayoutCache::new(),
        }
    }

    /// Computes the layout, reusing a cached result for the same width and list.
    pub fn compute(&self, images: &[Image], container_width: f64) -> Arc<Layout> {
        if images.is_empty() {
            return Arc::new(Vec::new());
        }

        let list_hash = LayoutCache::compute_list_hash(images);
        if let Some(rows) = self.cache.get(container_width, list_hash) {
            tracing::trace!(container_width, "Layout cache hit");
            return rows;
        }

        let rows = Arc::new(self.layout.compute(images, container_width));
        self.cache.set(container_width, list_hash, Arc::clone(&rows));
        rows
    }

    /// Invalidates the cache, forcing recomputation on next call.
    pub fn invalidate(&self) {
        self.cache.clear();
    }
}

impl Default for CachedLayoutComputer {
    fn default() -> Self {
        Self::new()
    }
}
