//! Exact-scan in-memory vector store.
//!
//! A reference implementation of the `VectorStore` contract for demos and
//! tests. Real deployments wrap an external index behind the same trait.

use std::cmp::Ordering;

use rankdb_core::error::{Error, Result};
use rankdb_core::traits::VectorStore;
use rankdb_core::types::{ChunkId, ScoredHit, SimilarityMetric, VectorHit};

use crate::{cosine_similarity, dot_product};

pub struct MemoryVectorStore {
    metric: SimilarityMetric,
    dimension: usize,
    entries: Vec<(ChunkId, Vec<f32>)>,
}

impl MemoryVectorStore {
    pub fn new(dimension: usize, metric: SimilarityMetric) -> Self {
        Self {
            metric,
            dimension,
            entries: Vec::new(),
        }
    }

    pub fn insert(&mut self, id: impl Into<ChunkId>, vector: Vec<f32>) -> Result<()> {
        if vector.len() != self.dimension {
            return Err(Error::InvalidArgument(format!(
                "vector dimension mismatch: expected {}, got {}",
                self.dimension,
                vector.len()
            )));
        }
        self.entries.push((id.into(), vector));
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn scan(&self, query: &[f32], n: usize) -> anyhow::Result<Vec<(usize, f32)>> {
        if query.len() != self.dimension {
            anyhow::bail!(
                "query dimension mismatch: expected {}, got {}",
                self.dimension,
                query.len()
            );
        }
        let mut scored: Vec<(usize, f32)> = self
            .entries
            .iter()
            .enumerate()
            .map(|(i, (_, vector))| {
                let score = match self.metric {
                    SimilarityMetric::Cosine => cosine_similarity(query, vector),
                    SimilarityMetric::DotProduct => dot_product(query, vector),
                };
                (i, score)
            })
            .collect();
        scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
        scored.truncate(n);
        Ok(scored)
    }
}

impl VectorStore for MemoryVectorStore {
    fn search(&self, query: &[f32], n: usize) -> anyhow::Result<Vec<ScoredHit>> {
        Ok(self
            .scan(query, n)?
            .into_iter()
            .map(|(i, score)| ScoredHit {
                id: self.entries[i].0.clone(),
                score,
            })
            .collect())
    }

    fn search_with_vectors(&self, query: &[f32], n: usize) -> anyhow::Result<Vec<VectorHit>> {
        Ok(self
            .scan(query, n)?
            .into_iter()
            .map(|(i, score)| VectorHit {
                id: self.entries[i].0.clone(),
                score,
                vector: self.entries[i].1.clone(),
            })
            .collect())
    }
}
