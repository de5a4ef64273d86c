//! Memoized extraction keyed by image content and color count.

use std::collections::HashMap;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use log::debug;

use crate::config::ExtractOptions;
use crate::error::Result;
use crate::extract::ColorCluster;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
struct CacheKey {
    content: u64,
    len: usize,
    k: usize,
}

impl CacheKey {
    fn new(bytes: &[u8], k: usize) -> Self {
        let mut hasher = DefaultHasher::new();
        bytes.hash(&mut hasher);
        CacheKey { content: hasher.finish(), len: bytes.len(), k }
    }
}

/// Results of [`crate::extract_palette_bytes`] by `(image bytes, k)`.
///
/// Entries are only valid for the options they were computed with, so a
/// cache is bound to one `ExtractOptions` value. Failures are not stored.
#[derive(Debug, Default)]
pub struct PaletteCache {
    options: ExtractOptions,
    entries: HashMap<CacheKey, Vec<ColorCluster>>,
}

impl PaletteCache {
    pub fn new(options: ExtractOptions) -> Self {
        PaletteCache { options, entries: HashMap::new() }
    }

    pub fn options(&self) -> &ExtractOptions {
        &self.options
    }

    pub fn get_or_extract(&mut self, bytes: &[u8], k: usize) -> Result<Vec<ColorCluster>> {
        let key = CacheKey::new(bytes, k);
        if let Some(hit) = self.entries.get(&key) {
            debug!("palette cache hit (k = {k}, {} bytes)", bytes.len());
            return Ok(hit.clone());
        }
        debug!("palette cache miss (k = {k}, {} bytes)", bytes.len());
        let clusters = crate::extract_palette_bytes(bytes, k, &self.options)?;
        self.entries.insert(key, clusters.clone());
        Ok(clusters)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
