use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use super::domain::Selection;
use super::smart::SmartRecommendation;

pub const DEFAULT_CACHE_CAPACITY: usize = 256;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    selection: Selection,
    snapshot_version: String,
}

/// Memoized recommendations keyed by the exact selection and snapshot version.
///
/// Absent results are cached too. When full, the whole map is dropped.
#[derive(Debug)]
pub struct RecommendationCache {
    capacity: usize,
    entries: Mutex<HashMap<CacheKey, Option<SmartRecommendation>>>,
}

impl RecommendationCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// `selection` must already be normalized.
    pub fn get_or_compute<F>(
        &self,
        selection: &Selection,
        snapshot_version: &str,
        compute: F,
    ) -> Option<SmartRecommendation>
    where
        F: FnOnce() -> Option<SmartRecommendation>,
    {
        if self.capacity == 0 {
            return compute();
        }

        let key = CacheKey {
            selection: selection.clone(),
            snapshot_version: snapshot_version.to_string(),
        };

        if let Some(hit) = self.lock().get(&key) {
            tracing::debug!(?selection, "recommendation cache hit");
            return hit.clone();
        }

        let computed = compute();

        let mut entries = self.lock();
        if entries.len() >= self.capacity {
            entries.clear();
        }
        entries.insert(key, computed.clone());
        computed
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<CacheKey, Option<SmartRecommendation>>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for RecommendationCache {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn computes_once_per_selection_and_version() {
        let cache = RecommendationCache::new(8);
        let calls = Cell::new(0);
        let selection = Selection::sector("industria");

        for _ in 0..3 {
            cache.get_or_compute(&selection, "v1", || {
                calls.set(calls.get() + 1);
                None
            });
        }
        assert_eq!(calls.get(), 1);

        cache.get_or_compute(&selection, "v2", || {
            calls.set(calls.get() + 1);
            None
        });
        assert_eq!(calls.get(), 2);
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn resets_when_capacity_is_reached() {
        let cache = RecommendationCache::new(2);
        for sector in ["industria", "saude", "construcao"] {
            cache.get_or_compute(&Selection::sector(sector), "v1", || None);
        }
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn zero_capacity_disables_memoization() {
        let cache = RecommendationCache::new(0);
        cache.get_or_compute(&Selection::sector("industria"), "v1", || None);
        assert!(cache.is_empty());
    }
}
