use std::num::NonZeroUsize;

use lru::LruCache;
use parking_lot::Mutex;
use xxhash_rust::xxh3::xxh3_64;

use crate::config::ZoomLevel;
use crate::layout::flow::{FlowLayout, RowBreak};
use crate::models::{IntrinsicSize, ItemKey, RowModel};

/// Default number of cached layouts kept in memory.
const DEFAULT_CACHE_ENTRIES: usize = 8;

/// Key for the layout cache.
///
/// Row breaks depend on the exact canvas width, so the width is keyed by its
/// bit pattern rather than bucketed.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
pub struct CacheKey {
    width_bits: u64,
    zoom: ZoomLevel,
    rtl: bool,
    list_hash: u64,
}

impl CacheKey {
    pub fn new(canvas_width: f64, zoom: ZoomLevel, rtl: bool, list_hash: u64) -> Self {
        Self {
            width_bits: canvas_width.to_bits(),
            zoom,
            rtl,
            list_hash,
        }
    }
}

/// Cached layout data: the row breaks that can reconstruct the full layout.
#[derive(Debug, Clone)]
struct CachedLayout {
    breaks: Vec<RowBreak>,
    /// Number of items this layout was computed for
    item_count: usize,
}

/// LRU cache of row breaks.
///
/// The list hash covers every key and intrinsic size in the current sort
/// order, so a resort, an added item or a changed label all miss.
pub struct LayoutCache {
    cache: Mutex<LruCache<CacheKey, CachedLayout>>,
}

impl LayoutCache {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CACHE_ENTRIES)
    }

    pub fn with_capacity(entries: usize) -> Self {
        let capacity = NonZeroUsize::new(entries).unwrap_or(NonZeroUsize::MIN);
        Self {
            cache: Mutex::new(LruCache::new(capacity)),
        }
    }

    /// Computes a fast hash of the ordered item list.
    pub fn compute_list_hash<'a, I>(items: I) -> u64
    where
        I: IntoIterator<Item = (&'a ItemKey, &'a IntrinsicSize)>,
    {
        let mut hasher_input = Vec::with_capacity(1024);

        for (key, size) in items {
            hasher_input.extend_from_slice(key.as_str().as_bytes());
            // Separator so "ab"+"c" and "a"+"bc" differ
            hasher_input.push(0);
            for value in [size.width, size.height, size.baseline_offset, size.image_width] {
                hasher_input.extend_from_slice(&value.to_bits().to_le_bytes());
            }
        }

        xxh3_64(&hasher_input)
    }

    #[cfg(test)]
    pub fn get_breaks(&self, key: &CacheKey) -> Option<Vec<RowBreak>> {
        self.cache.lock().get(key).map(|entry| entry.breaks.clone())
    }

    /// Looks up rows for `sizes`, rebuilding them from cached breaks.
    /// Returns None on miss or when the item count no longer matches.
    pub fn get(&self, key: &CacheKey, sizes: &[IntrinsicSize], layout: &FlowLayout, canvas_width: f64) -> Option<Vec<RowModel>> {
        let breaks = {
            let mut cache = self.cache.lock();
            let entry = cache.get(key)?;
            if entry.item_count != sizes.len() {
                return None;
            }
            entry.breaks.clone()
        };

        Some(layout.rows_from_breaks(sizes, &breaks, canvas_width))
    }

    pub fn set(&self, key: CacheKey, breaks: Vec<RowBreak>, item_count: usize) {
        self.cache.lock().put(key, CachedLayout { breaks, item_count });
    }

    /// Stores rows by extracting their breaks.
    #[cfg(test)]
    pub fn set_rows(&self, key: CacheKey, rows: &[RowModel], item_count: usize) {
        let mut breaks = Vec::with_capacity(rows.len());
        let mut current_idx = 0;

        for row in rows {
            let end_idx = current_idx + row.items.len();
            breaks.push(RowBreak {
                start_index: current_idx,
                end_index: end_idx,
                baseline: row.baseline,
            });
            current_idx = end_idx;
        }

        self.set(key, breaks, item_count);
    }

    pub fn clear(&self) {
        self.cache.lock().clear();
    }

    pub fn len(&self) -> usize {
        self.cache.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.lock().is_empty()
    }

    /// Shrinks or grows the cache, dropping least recently used entries.
    pub fn resize(&self, entries: usize) {
        let capacity = NonZeroUsize::new(entries).unwrap_or(NonZeroUsize::MIN);
        self.cache.lock().resize(capacity);
    }
}

impl Default for LayoutCache {
    fn default() -> Self {
        Self::new()
    }
}

/// Layout computation backed by the cache.
pub struct CachedLayoutComputer {
    pub cache: LayoutCache,
}

impl CachedLayoutComputer {
    pub fn new(entries: usize) -> Self {
        Self {
            cache: LayoutCache::with_capacity(entries),
        }
    }

    /// Computes rows, reusing cached breaks when the inputs match a previous pass.
    pub fn compute(
        &self,
        layout: &FlowLayout,
        zoom: ZoomLevel,
        keys: &[ItemKey],
        sizes: &[IntrinsicSize],
        canvas_width: f64,
    ) -> Vec<RowModel> {
        if sizes.is_empty() {
            return Vec::new();
        }

        let list_hash = LayoutCache::compute_list_hash(keys.iter().zip(sizes));
        let key = CacheKey::new(canvas_width, zoom, layout.rtl, list_hash);

        if let Some(rows) = self.cache.get(&key, sizes, layout, canvas_width) {
            tracing::trace!(items = sizes.len(), canvas_width, "Layout cache hit");
            return rows;
        }

        tracing::trace!(items = sizes.len(), canvas_width, "Layout cache miss");
        let breaks = layout.compute_breaks(sizes, canvas_width);
        let rows = layout.rows_from_breaks(sizes, &breaks, canvas_width);
        self.cache.set(key, breaks, sizes.len());

        rows
    }

    pub fn invalidate(&self) {
        self.cache.clear();
    }
}

impl Default for CachedLayoutComputer {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_ENTRIES)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_items(count: usize) -> (Vec<ItemKey>, Vec<IntrinsicSize>) {
        let keys = (0..count).map(|i| ItemKey::from(format!("file:///{}.txt", i))).collect();
        let sizes = (0..count)
            .map(|_| IntrinsicSize::icon_with_label(64.0, 90.0, 30.0))
            .collect();
        (keys, sizes)
    }

    #[test]
    fn test_list_hash_consistency() {
        let (keys, sizes) = make_items(3);
        let hash1 = LayoutCache::compute_list_hash(keys.iter().zip(&sizes));
        let hash2 = LayoutCache::compute_list_hash(keys.iter().zip(&sizes));
        assert_eq!(hash1, hash2);
    }

    #[test]
    fn test_list_hash_changes_on_size() {
        let (keys, mut sizes) = make_items(2);
        let before = LayoutCache::compute_list_hash(keys.iter().zip(&sizes));
        sizes[1].height += 12.0;
        let after = LayoutCache::compute_list_hash(keys.iter().zip(&sizes));
        assert_ne!(before, after);
    }

    #[test]
    fn test_list_hash_changes_on_order() {
        let (mut keys, sizes) = make_items(2);
        let before = LayoutCache::compute_list_hash(keys.iter().zip(&sizes));
        keys.swap(0, 1);
        let after = LayoutCache::compute_list_hash(keys.iter().zip(&sizes));
        assert_ne!(before, after);
    }

    #[test]
    fn test_cache_miss_then_hit() {
        let cache = LayoutCache::new();
        let key = CacheKey::new(800.0, ZoomLevel::Standard, false, 12345);

        assert!(cache.get_breaks(&key).is_none());

        let breaks = vec![
            RowBreak {
                start_index: 0,
                end_index: 3,
                baseline: 72.0,
            },
            RowBreak {
                start_index: 3,
                end_index: 5,
                baseline: 180.0,
            },
        ];
        cache.set(key, breaks, 5);
        assert_eq!(cache.get_breaks(&key).map(|b| b.len()), Some(2));

        let other_zoom = CacheKey::new(800.0, ZoomLevel::Large, false, 12345);
        assert!(cache.get_breaks(&other_zoom).is_none());
    }

    #[test]
    fn test_cache_eviction() {
        let cache = LayoutCache::with_capacity(4);
        let breaks = vec![RowBreak {
            start_index: 0,
            end_index: 1,
            baseline: 72.0,
        }];

        for i in 0..10 {
            cache.set(CacheKey::new(100.0 + i as f64, ZoomLevel::Standard, false, 1), breaks.clone(), 1);
        }
        assert_eq!(cache.len(), 4);
        // Oldest entries went first
        assert!(cache.get_breaks(&CacheKey::new(100.0, ZoomLevel::Standard, false, 1)).is_none());
        assert!(cache.get_breaks(&CacheKey::new(109.0, ZoomLevel::Standard, false, 1)).is_some());
    }

    #[test]
    fn test_cached_computer_matches_direct_layout() {
        let computer = CachedLayoutComputer::default();
        let layout = FlowLayout::default();
        let (keys, sizes) = make_items(10);

        let rows1 = computer.compute(&layout, ZoomLevel::Standard, &keys, &sizes, 500.0);
        assert_eq!(rows1, layout.compute(&sizes, 500.0));

        let rows2 = computer.compute(&layout, ZoomLevel::Standard, &keys, &sizes, 500.0);
        assert_eq!(rows1, rows2);
        assert_eq!(computer.cache.len(), 1);

        computer.compute(&layout, ZoomLevel::Standard, &keys, &sizes, 700.0);
        assert_eq!(computer.cache.len(), 2);

        computer.invalidate();
        assert!(computer.cache.is_empty());
    }

    #[test]
    fn test_item_count_mismatch_misses() {
        let cache = LayoutCache::new();
        let layout = FlowLayout::default();
        let (_, sizes) = make_items(4);
        let key = CacheKey::new(500.0, ZoomLevel::Standard, false, 7);
        cache.set_rows(key, &layout.compute(&sizes, 500.0), sizes.len());

        assert!(cache.get(&key, &sizes, &layout, 500.0).is_some());
        assert!(cache.get(&key, &sizes[..3], &layout, 500.0).is_none());
    }

    #[test]
    fn test_empty_items() {
        let computer = CachedLayoutComputer::default();
        let rows = computer.compute(&FlowLayout::default(), ZoomLevel::Standard, &[], &[], 800.0);
        assert!(rows.is_empty());
    }
}
