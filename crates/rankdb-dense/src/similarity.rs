use tracing::debug;

use rankdb_core::error::{Error, Result};
use rankdb_core::traits::VectorStore;
use rankdb_core::types::{RankedList, SimilarityMetric};

/// Pool multiplier for thresholded retrieval: ask the provider for more
/// than `k` so the filter still has enough survivors to pick from.
const POOL_FACTOR: usize = 10;

/// A score cutoff tied to the metric it is meaningful under. Constructing
/// one validates the value against the metric's range.
#[derive(Debug, Clone, Copy)]
pub struct ScoreThreshold {
    metric: SimilarityMetric,
    value: f32,
}

impl ScoreThreshold {
    pub fn new(metric: SimilarityMetric, value: f32) -> Result<Self> {
        if !value.is_finite() {
            return Err(Error::Config(format!(
                "similarity threshold must be finite, got {value}"
            )));
        }
        if metric == SimilarityMetric::Cosine && !(-1.0..=1.0).contains(&value) {
            return Err(Error::Config(format!(
                "cosine threshold must be in [-1, 1], got {value}"
            )));
        }
        Ok(Self { metric, value })
    }

    pub fn metric(&self) -> SimilarityMetric {
        self.metric
    }

    pub fn value(&self) -> f32 {
        self.value
    }
}

/// Thin retrieval policy over an external vector-search provider: plain
/// top-k, or thresholded top-k over a larger pool.
pub struct SimilarityRetriever<V> {
    store: V,
}

impl<V: VectorStore> SimilarityRetriever<V> {
    pub fn new(store: V) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &V {
        &self.store
    }

    /// The provider's top-k, verbatim.
    pub fn retrieve(&self, query: &[f32], k: usize) -> Result<RankedList> {
        if k == 0 {
            return Err(Error::InvalidArgument("k must be > 0".to_string()));
        }
        Ok(self.store.search(query, k)?)
    }

    /// Thresholded top-k: over-fetch a pool, drop everything scoring below
    /// the cutoff, return at most k survivors. The result is never padded
    /// with sub-threshold entries, so it may be shorter than k.
    pub fn retrieve_threshold(
        &self,
        query: &[f32],
        k: usize,
        threshold: &ScoreThreshold,
    ) -> Result<RankedList> {
        if k == 0 {
            return Err(Error::InvalidArgument("k must be > 0".to_string()));
        }
        let pool = k.saturating_mul(POOL_FACTOR);
        let hits = self.store.search(query, pool)?;
        let fetched = hits.len();
        let kept: RankedList = hits
            .into_iter()
            .filter(|hit| hit.score >= threshold.value)
            .take(k)
            .collect();
        debug!(pool, fetched, kept = kept.len(), "threshold retrieval");
        Ok(kept)
    }
}
