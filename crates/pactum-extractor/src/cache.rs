//! In-session reuse of extraction results
//!
//! Keys are SHA-256 digests over schema name, model name and contract text,
//! each terminated by a NUL byte so adjacent fields cannot run together.

use crate::types::{FieldAnomaly, ExtractionMetadata};
use pactum_domain::ExtractionResult;
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::{debug, warn};

/// A cached extraction
#[derive(Debug, Clone)]
pub(crate) struct CachedExtraction {
    pub result: ExtractionResult,
    pub anomalies: Vec<FieldAnomaly>,
    pub metadata: ExtractionMetadata,
}

/// Thread-safe map from content key to extraction
#[derive(Debug, Default)]
pub struct ResultCache {
    entries: Mutex<HashMap<String, CachedExtraction>>,
}

impl ResultCache {
    /// Create an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Hex digest identifying one (schema, model, text) combination
    pub fn key(schema: &str, model: &str, text: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(schema.as_bytes());
        hasher.update([0]);
        hasher.update(model.as_bytes());
        hasher.update([0]);
        hasher.update(text.as_bytes());
        hex::encode(hasher.finalize())
    }

    pub(crate) fn get(&self, key: &str) -> Option<CachedExtraction> {
        let hit = self.lock_entries().get(key).cloned();
        if hit.is_some() {
            debug!("Result cache hit for {}", &key[..12.min(key.len())]);
        }
        hit
    }

    pub(crate) fn insert(&self, key: String, entry: CachedExtraction) {
        self.lock_entries().insert(key, entry);
    }

    /// Number of cached results
    pub fn len(&self) -> usize {
        self.lock_entries().len()
    }

    /// True if nothing is cached
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every cached result
    pub fn clear(&self) {
        self.lock_entries().clear();
    }

    /// Lock the map, recovering it if a holder panicked.
    ///
    /// Entries are only ever inserted whole, so a poisoned map is still consistent.
    fn lock_entries(&self) -> MutexGuard<'_, HashMap<String, CachedExtraction>> {
        self.entries.lock().unwrap_or_else(|poisoned: PoisonError<_>| {
            warn!("Result cache lock was poisoned; recovering");
            poisoned.into_inner()
        })
    }
}
