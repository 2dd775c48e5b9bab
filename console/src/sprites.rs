//! Bounded cache of decoded sprite buffers, keyed by filename with LRU
//! eviction. Dimensions and depth come from a fixed per-category table
//! (the asset files are raw RGB565 dumps with no header), and a load that
//! cannot produce a complete buffer yields nothing rather than a partial
//! sprite.

use std::io::Read;
use std::sync::Arc;

use crate::storage::Storage;

pub const SPRITE_CACHE_CAPACITY: usize = 16;
pub const MAX_SPRITE_NAME_LEN: usize = 32;

/// Preloaded at construction so the first frame of each screen never
/// stalls on the card.
pub const ESSENTIAL_SPRITES: [&str; 5] = [
    "/spr_logo.bin",
    "/spr_bg_menu.bin",
    "/spr_bg_main.bin",
    "/spr_ship.bin",
    "/spr_bullet.bin",
];

#[derive(Debug)]
pub struct CachedSprite {
    pub name: String,
    pub width: u16,
    pub height: u16,
    pub bits_per_pixel: u8,
    pub data: Box<[u8]>,
    last_used: u64,
}

struct SpriteFormat {
    name_contains: &'static str,
    width: u16,
    height: u16,
    bits_per_pixel: u8,
}

// First substring match wins, so more specific categories come first.
static SPRITE_FORMATS: [SpriteFormat; 7] = [
    SpriteFormat { name_contains: "explosion", width: 24, height: 23, bits_per_pixel: 16 },
    SpriteFormat { name_contains: "comet", width: 24, height: 12, bits_per_pixel: 16 },
    SpriteFormat { name_contains: "asteroid", width: 9, height: 10, bits_per_pixel: 16 },
    SpriteFormat { name_contains: "bullet", width: 4, height: 4, bits_per_pixel: 16 },
    SpriteFormat { name_contains: "ship", width: 17, height: 17, bits_per_pixel: 16 },
    SpriteFormat { name_contains: "logo", width: 128, height: 160, bits_per_pixel: 16 },
    SpriteFormat { name_contains: "bg", width: 128, height: 160, bits_per_pixel: 16 },
];

fn format_for(name: &str) -> Option<&'static SpriteFormat> {
    SPRITE_FORMATS
        .iter()
        .find(|format| name.contains(format.name_contains))
}

pub struct SpriteCache {
    storage: Arc<dyn Storage>,
    entries: [Option<CachedSprite>; SPRITE_CACHE_CAPACITY],
    /// Monotonic use counter; larger means more recently used.
    clock: u64,
}

impl SpriteCache {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        const EMPTY: Option<CachedSprite> = None;
        let mut cache = Self {
            storage,
            entries: [EMPTY; SPRITE_CACHE_CAPACITY],
            clock: 0,
        };
        for name in ESSENTIAL_SPRITES {
            if cache.load(name).is_none() {
                tracing::warn!(name, "essential sprite unavailable at preload");
            }
        }
        cache
    }

    /// Cache hit or a fresh decode; `None` when the asset is unknown,
    /// unreadable, or truncated.
    pub fn load(&mut self, name: &str) -> Option<&CachedSprite> {
        if name.len() > MAX_SPRITE_NAME_LEN {
            tracing::warn!(name, "sprite name exceeds the key length bound");
            return None;
        }

        self.clock += 1;

        let mut hit = None;
        for (index, slot) in self.entries.iter().enumerate() {
            if let Some(sprite) = slot {
                if sprite.name == name {
                    hit = Some(index);
                    break;
                }
            }
        }

        let index = match hit {
            Some(index) => {
                if let Some(sprite) = &mut self.entries[index] {
                    sprite.last_used = self.clock;
                }
                index
            }
            None => {
                let sprite = self.fetch(name)?;
                let slot = self.free_or_evict();
                self.entries[slot] = Some(sprite);
                slot
            }
        };

        self.entries[index].as_ref()
    }

    pub fn len(&self) -> usize {
        self.entries.iter().filter(|slot| slot.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries
            .iter()
            .flatten()
            .any(|sprite| sprite.name == name)
    }

    fn fetch(&self, name: &str) -> Option<CachedSprite> {
        let Some(format) = format_for(name) else {
            tracing::warn!(name, "no format entry for sprite");
            return None;
        };

        let expected = usize::from(format.width)
            * usize::from(format.height)
            * usize::from(format.bits_per_pixel)
            / 8;

        let mut handle = match self.storage.open_read(name) {
            Ok(handle) => handle,
            Err(error) => {
                tracing::warn!(name, "sprite unavailable: {error}");
                return None;
            }
        };

        let mut data = vec![0u8; expected];
        if let Err(error) = handle.read_exact(&mut data) {
            // Truncated asset: reject rather than cache a partial buffer.
            tracing::warn!(name, expected, "sprite data short: {error}");
            return None;
        }

        Some(CachedSprite {
            name: name.to_string(),
            width: format.width,
            height: format.height,
            bits_per_pixel: format.bits_per_pixel,
            data: data.into_boxed_slice(),
            last_used: self.clock,
        })
    }

    fn free_or_evict(&mut self) -> usize {
        if let Some(free) = self.entries.iter().position(Option::is_none) {
            return free;
        }

        let mut oldest = 0;
        let mut oldest_used = u64::MAX;
        for (index, slot) in self.entries.iter().enumerate() {
            if let Some(sprite) = slot {
                if sprite.last_used < oldest_used {
                    oldest_used = sprite.last_used;
                    oldest = index;
                }
            }
        }

        if let Some(evicted) = &self.entries[oldest] {
            tracing::debug!(name = %evicted.name, "evicting least recently used sprite");
        }
        // Dropping the entry frees its buffer, exactly once.
        self.entries[oldest] = None;
        oldest
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::mem::MemStorage;

    fn asteroid_bytes() -> Vec<u8> {
        vec![0x5A; 9 * 10 * 2]
    }

    fn storage_with_asteroids(count: usize) -> Arc<dyn Storage> {
        let mut storage = MemStorage::default();
        for index in 0..count {
            storage = storage.with_file(&format!("/spr_asteroid_{index}.bin"), asteroid_bytes());
        }
        Arc::new(storage)
    }

    #[test]
    fn load_decodes_dimensions_from_the_category_table() {
        let storage = storage_with_asteroids(1);
        let mut cache = SpriteCache::new(storage);

        let sprite = cache.load("/spr_asteroid_0.bin").expect("sprite loads");
        assert_eq!((sprite.width, sprite.height), (9, 10));
        assert_eq!(sprite.bits_per_pixel, 16);
        assert_eq!(sprite.data.len(), 9 * 10 * 2);
    }

    #[test]
    fn cache_never_exceeds_capacity() {
        let storage = storage_with_asteroids(SPRITE_CACHE_CAPACITY * 2);
        let mut cache = SpriteCache::new(storage);

        for index in 0..(SPRITE_CACHE_CAPACITY * 2) {
            cache.load(&format!("/spr_asteroid_{index}.bin"));
        }
        assert_eq!(cache.len(), SPRITE_CACHE_CAPACITY);
    }

    #[test]
    fn eviction_picks_the_least_recently_used_entry() {
        let storage = storage_with_asteroids(SPRITE_CACHE_CAPACITY + 1);
        let mut cache = SpriteCache::new(storage);

        for index in 0..SPRITE_CACHE_CAPACITY {
            assert!(cache.load(&format!("/spr_asteroid_{index}.bin")).is_some());
        }

        // Touch the would-be victim so its neighbor becomes oldest.
        assert!(cache.load("/spr_asteroid_0.bin").is_some());

        let last = format!("/spr_asteroid_{SPRITE_CACHE_CAPACITY}.bin");
        assert!(cache.load(&last).is_some());

        assert!(cache.contains("/spr_asteroid_0.bin"));
        assert!(!cache.contains("/spr_asteroid_1.bin"));
        assert_eq!(cache.len(), SPRITE_CACHE_CAPACITY);
    }

    #[test]
    fn truncated_asset_is_rejected_and_not_cached() {
        let storage =
            MemStorage::default().with_file("/spr_asteroid_0.bin", vec![0x5A; 10]);
        let mut cache = SpriteCache::new(Arc::new(storage));

        assert!(cache.load("/spr_asteroid_0.bin").is_none());
        assert!(!cache.contains("/spr_asteroid_0.bin"));
    }

    #[test]
    fn unknown_category_is_rejected() {
        let storage = MemStorage::default().with_file("/font.bin", vec![0u8; 64]);
        let mut cache = SpriteCache::new(Arc::new(storage));
        assert!(cache.load("/font.bin").is_none());
    }

    #[test]
    fn over_long_names_are_rejected() {
        let mut cache = SpriteCache::new(Arc::new(MemStorage::default()));
        let name = format!("/{}.bin", "x".repeat(MAX_SPRITE_NAME_LEN));
        assert!(cache.load(&name).is_none());
    }

    #[test]
    fn preload_fills_the_cache_with_available_essentials() {
        let storage = MemStorage::default()
            .with_file("/spr_logo.bin", vec![0u8; 128 * 160 * 2])
            .with_file("/spr_ship.bin", vec![0u8; 17 * 17 * 2]);
        let cache = SpriteCache::new(Arc::new(storage));

        assert!(cache.contains("/spr_logo.bin"));
        assert!(cache.contains("/spr_ship.bin"));
        // Missing essentials degrade to a warning, not a failure.
        assert!(!cache.contains("/spr_bg_menu.bin"));
    }

    #[test]
    fn repeated_hits_do_not_duplicate_entries() {
        let storage = storage_with_asteroids(1);
        let mut cache = SpriteCache::new(storage);

        for _ in 0..5 {
            assert!(cache.load("/spr_asteroid_0.bin").is_some());
        }
        assert_eq!(cache.len(), 1);
    }
}
