//! Tile cache with generation checks, weeding and an optional size cap.

use super::coords::TileRect;
use super::tile::{Tile, TileKey, TileRenderer};
use super::ViewSnapshot;
use crate::config::{Aggregation, CacheConfig};
use crate::data::MatrixSource;
use std::collections::hash_map::Entry;
use std::collections::HashMap;

/// Counters describing cache activity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Tiles rendered (misses and stale replacements).
    pub renders: u64,
    /// Lookups served from the cache.
    pub hits: u64,
    /// Tiles dropped by weeding or the size cap.
    pub evictions: u64,
    /// Full invalidations.
    pub flushes: u64,
}

#[derive(Debug)]
struct CachedTile {
    tile: Tile,
    last_used: u64,
}

/// Rendered tiles keyed by grid position.
///
/// The cache never holds the matrix; it is passed to [`TileCache::get`] so a
/// miss can be rendered on the spot.
#[derive(Debug)]
pub struct TileCache {
    tiles: HashMap<TileKey, CachedTile>,
    config: CacheConfig,
    tick: u64,
    stats: CacheStats,
    protected: Option<TileRect>,
}

impl TileCache {
    /// Create an empty cache.
    pub fn new(config: CacheConfig) -> Self {
        Self {
            tiles: HashMap::new(),
            config,
            tick: 0,
            stats: CacheStats::default(),
            protected: None,
        }
    }

    /// Return the tile at `key` for the snapshot's generation, rendering it
    /// if it is missing or was rendered under an older generation.
    pub fn get(
        &mut self,
        key: TileKey,
        snapshot: &ViewSnapshot,
        matrix: &dyn MatrixSource,
    ) -> &Tile {
        self.tick += 1;
        if !self.tiles.contains_key(&key) {
            self.make_room();
        }

        let aggregation = self.config.aggregation;
        let render = || TileRenderer::new(snapshot, matrix, aggregation).render(key);

        let cached = match self.tiles.entry(key) {
            Entry::Occupied(entry) => {
                let cached = entry.into_mut();
                if cached.tile.generation() == snapshot.generation {
                    self.stats.hits += 1;
                } else {
                    tracing::debug!("Re-rendering stale tile {:?}", key);
                    cached.tile = render();
                    self.stats.renders += 1;
                }
                cached
            },
            Entry::Vacant(entry) => {
                tracing::debug!("Rendering tile {:?}", key);
                self.stats.renders += 1;
                entry.insert(CachedTile {
                    tile: render(),
                    last_used: 0,
                })
            },
        };
        cached.last_used = self.tick;
        &cached.tile
    }

    /// Drop every cached tile.
    pub fn invalidate_all(&mut self) {
        let dropped = self.tiles.len();
        self.tiles.clear();
        self.stats.flushes += 1;
        tracing::info!("Flushed {} tiles", dropped);
    }

    /// Drop tiles outside `visible` grown by `margin` tiles on each side.
    ///
    /// Returns the number of tiles removed.
    pub fn weed(&mut self, visible: TileRect, margin: i32) -> usize {
        let keep = visible.expand(margin);
        let before = self.tiles.len();
        self.tiles.retain(|key, _| keep.contains(*key));
        let removed = before - self.tiles.len();
        if removed > 0 {
            self.stats.evictions += removed as u64;
            tracing::debug!("Weeded {} tiles outside {:?}", removed, keep);
        }
        removed
    }

    /// Exempt tiles inside `rect` from size-cap eviction.
    ///
    /// The cap is exceeded rather than evicting a protected tile, so a
    /// viewport larger than `max_tiles` still keeps every visible tile.
    pub fn protect(&mut self, rect: Option<TileRect>) {
        self.protected = rect;
    }

    /// Cached tile at `key`, without rendering or touching its age.
    pub fn peek(&self, key: TileKey) -> Option<&Tile> {
        self.tiles.get(&key).map(|c| &c.tile)
    }

    /// Whether a tile is cached at `key`.
    pub fn contains(&self, key: TileKey) -> bool {
        self.tiles.contains_key(&key)
    }

    /// Number of cached tiles.
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    /// Whether the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Cached keys in grid order.
    pub fn keys(&self) -> Vec<TileKey> {
        let mut keys: Vec<TileKey> = self.tiles.keys().copied().collect();
        keys.sort();
        keys
    }

    /// Activity counters.
    pub fn stats(&self) -> CacheStats {
        self.stats
    }

    /// Weeding margin from the configuration.
    pub fn weed_margin(&self) -> i32 {
        self.config.weed_margin
    }

    /// Zoomed-out aggregation rule from the configuration.
    pub fn aggregation(&self) -> Aggregation {
        self.config.aggregation
    }

    // Evict least recently used unprotected tiles until one more fits under the cap.
    fn make_room(&mut self) {
        let Some(max) = self.config.max_tiles else {
            return;
        };
        let protected = self.protected;
        while self.tiles.len() >= max.max(1) {
            let oldest = self
                .tiles
                .iter()
                .filter(|(k, _)| !protected.is_some_and(|rect| rect.contains(**k)))
                .min_by_key(|(_, c)| c.last_used)
                .map(|(k, _)| *k);
            let Some(key) = oldest else {
                break;
            };
            self.tiles.remove(&key);
            self.stats.evictions += 1;
            tracing::debug!("Evicted least recently used tile {:?}", key);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Matrix;
    use crate::view2d::colormap::ColorPalette;
    use crate::view2d::ViewState;

    fn snapshot(generation: u64) -> ViewSnapshot {
        ViewSnapshot {
            view: ViewState {
                z_visible_region: 10.0,
                ..ViewState::default()
            },
            palette: ColorPalette::Classic,
            generation,
        }
    }

    fn matrix() -> Matrix {
        Matrix::from_fn("m", 300, 300, |x, y| ((x + y) % 10) as f64)
    }

    #[test]
    fn second_lookup_is_a_hit() {
        let m = matrix();
        let snap = snapshot(0);
        let mut cache = TileCache::new(CacheConfig::default());
        cache.get(TileKey::new(0, 0), &snap, &m);
        cache.get(TileKey::new(0, 0), &snap, &m);
        assert_eq!(cache.stats().renders, 1);
        assert_eq!(cache.stats().hits, 1);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn invalidate_all_forces_fresh_tiles() {
        let m = matrix();
        let mut cache = TileCache::new(CacheConfig::default());
        let old = cache.get(TileKey::new(1, 1), &snapshot(0), &m).generation();
        cache.invalidate_all();
        assert!(cache.is_empty());
        let new = cache.get(TileKey::new(1, 1), &snapshot(1), &m).generation();
        assert_ne!(old, new);
        assert_eq!(cache.stats().renders, 2);
        assert_eq!(cache.stats().flushes, 1);
    }

    #[test]
    fn stale_generation_is_re_rendered() {
        let m = matrix();
        let mut cache = TileCache::new(CacheConfig::default());
        cache.get(TileKey::new(0, 0), &snapshot(3), &m);
        let tile = cache.get(TileKey::new(0, 0), &snapshot(4), &m);
        assert_eq!(tile.generation(), 4);
        assert_eq!(cache.stats().renders, 2);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn weed_keeps_margin_around_visible_rect() {
        let m = matrix();
        let snap = snapshot(0);
        let mut cache = TileCache::new(CacheConfig::default());
        for tx in -3..=3 {
            cache.get(TileKey::new(tx, 0), &snap, &m);
        }
        let visible = TileRect { x0: 0, y0: 0, x1: 0, y1: 0 };
        let removed = cache.weed(visible, 1);
        assert_eq!(removed, 4);
        assert_eq!(
            cache.keys(),
            vec![TileKey::new(-1, 0), TileKey::new(0, 0), TileKey::new(1, 0)]
        );
        assert_eq!(cache.stats().evictions, 4);
    }

    #[test]
    fn size_cap_evicts_least_recently_used() {
        let m = matrix();
        let snap = snapshot(0);
        let mut cache = TileCache::new(CacheConfig {
            max_tiles: Some(2),
            aggregation: Aggregation::Max,
            ..CacheConfig::default()
        });
        cache.get(TileKey::new(0, 0), &snap, &m);
        cache.get(TileKey::new(1, 0), &snap, &m);
        cache.get(TileKey::new(0, 0), &snap, &m);
        cache.get(TileKey::new(2, 0), &snap, &m);
        assert_eq!(cache.keys(), vec![TileKey::new(0, 0), TileKey::new(2, 0)]);
        assert!(cache.peek(TileKey::new(1, 0)).is_none());
    }

    #[test]
    fn size_cap_never_evicts_protected_tiles() {
        let m = matrix();
        let snap = snapshot(0);
        let mut cache = TileCache::new(CacheConfig {
            max_tiles: Some(2),
            ..CacheConfig::default()
        });
        cache.get(TileKey::new(5, 5), &snap, &m);
        let visible = TileRect { x0: 0, y0: 0, x1: 1, y1: 1 };
        cache.protect(Some(visible));
        for key in visible.keys() {
            cache.get(key, &snap, &m);
        }
        // The stale outside tile goes; all four visible tiles stay.
        assert_eq!(cache.len(), 4);
        assert!(!cache.contains(TileKey::new(5, 5)));
        for key in visible.keys() {
            assert!(cache.contains(key));
        }
        for key in visible.keys() {
            cache.get(key, &snap, &m);
        }
        assert_eq!(cache.stats().renders, 5);
        assert_eq!(cache.stats().hits, 4);
    }
}
