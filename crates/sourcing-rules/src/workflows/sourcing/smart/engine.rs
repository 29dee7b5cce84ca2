use std::sync::Arc;

use tracing::info;

use super::{aggregate, SmartRecommendation};
use crate::workflows::sourcing::domain::Selection;
use crate::workflows::sourcing::memo::RecommendationCache;
use crate::workflows::sourcing::source::{RuleSnapshot, RuleSource, RuleSourceKind};
use crate::workflows::sourcing::tables::ReferenceTables;

/// Aggregator bound to one rule source, with memoized results.
pub struct SmartRulesEngine {
    source: Arc<dyn RuleSource>,
    cache: RecommendationCache,
}

impl SmartRulesEngine {
    pub fn new(source: Arc<dyn RuleSource>, cache_capacity: usize) -> Self {
        let snapshot = source.snapshot();
        info!(
            source = source.kind().label(),
            version = snapshot.version(),
            sectors = snapshot.tables().sectors.len(),
            categories = snapshot.tables().categories.len(),
            clients = snapshot.tables().clients.len(),
            "sourcing rules engine ready"
        );

        Self {
            source,
            cache: RecommendationCache::new(cache_capacity),
        }
    }

    pub fn kind(&self) -> RuleSourceKind {
        self.source.kind()
    }

    pub fn snapshot(&self) -> &RuleSnapshot {
        self.source.snapshot()
    }

    pub fn tables(&self) -> &ReferenceTables {
        self.source.tables()
    }

    pub fn recommend(&self, selection: &Selection) -> Option<SmartRecommendation> {
        let selection = selection.normalized();
        let snapshot = self.source.snapshot();
        self.cache
            .get_or_compute(&selection, snapshot.version(), || {
                aggregate(snapshot.tables(), &selection)
            })
    }

    pub fn cached_entries(&self) -> usize {
        self.cache.len()
    }
}

impl std::fmt::Debug for SmartRulesEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmartRulesEngine")
            .field("source", &self.source.kind())
            .field("version", &self.source.snapshot().version())
            .field("cached", &self.cache.len())
            .finish()
    }
}
