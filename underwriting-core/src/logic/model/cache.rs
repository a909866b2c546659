//! Model Cache
//!
//! Holds the most recently trained forest keyed by everything that shapes it
//! (corpus config + forest config). A different key retrains and replaces the
//! entry, so a cache hit is observably identical to retraining.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use serde::Serialize;

use super::forest::{ForestConfig, RandomForest};
use crate::logic::dataset::CorpusConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct ModelKey {
    pub corpus: CorpusConfig,
    pub forest: ForestConfig,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub cached: bool,
}

#[derive(Default)]
pub struct ModelCache {
    slot: Mutex<Option<(ModelKey, Arc<RandomForest>)>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl ModelCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &ModelKey) -> Option<Arc<RandomForest>> {
        self.slot
            .lock()
            .as_ref()
            .filter(|(cached, _)| cached == key)
            .map(|(_, model)| Arc::clone(model))
    }

    /// Return the cached model for `key`, or train and store a new one.
    /// The lock is held while training so concurrent callers train once.
    pub fn get_or_train<E, F>(&self, key: ModelKey, train: F) -> Result<Arc<RandomForest>, E>
    where
        F: FnOnce() -> Result<RandomForest, E>,
    {
        let mut slot = self.slot.lock();

        if let Some((cached, model)) = slot.as_ref() {
            if *cached == key {
                self.hits.fetch_add(1, Ordering::Relaxed);
                return Ok(Arc::clone(model));
            }
            log::debug!("Model cache key changed, retraining");
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        let model = Arc::new(train()?);
        *slot = Some((key, Arc::clone(&model)));
        Ok(model)
    }

    pub fn invalidate(&self) {
        *self.slot.lock() = None;
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            cached: self.slot.lock().is_some(),
        }
    }
}
