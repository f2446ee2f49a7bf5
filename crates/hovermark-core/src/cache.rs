use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex, PoisonError};

use lru::LruCache;

use crate::ast::Block;
use crate::emit::build;
use crate::parser::parse;
use crate::style::StyleConfig;
use crate::styled::StyledText;

const DEFAULT_CAPACITY: NonZeroUsize = match NonZeroUsize::new(64) {
    Some(capacity) => capacity,
    None => NonZeroUsize::MIN,
};

/// Memoizes parsed blocks by source text. Rendering through the cache gives
/// the same output as [`crate::render`].
pub struct ParseCache {
    entries: Mutex<LruCache<String, Arc<Vec<Block>>>>,
}

impl ParseCache {
    pub fn new(capacity: NonZeroUsize) -> Self {
        Self {
            entries: Mutex::new(LruCache::new(capacity)),
        }
    }

    pub fn blocks(&self, source: &str) -> Arc<Vec<Block>> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(blocks) = entries.get(source) {
            tracing::trace!(len = source.len(), "parse cache hit");
            return Arc::clone(blocks);
        }
        tracing::trace!(len = source.len(), "parse cache miss");
        let blocks = Arc::new(parse(source));
        entries.put(source.to_string(), Arc::clone(&blocks));
        blocks
    }

    pub fn render(&self, source: &str, style: &StyleConfig) -> StyledText {
        let blocks = self.blocks(source);
        build(&blocks, style)
    }

    pub fn len(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

impl Default for ParseCache {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}
