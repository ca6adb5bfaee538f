//! Reranking: score a candidate set with a pluggable backend, tolerate
//! per-candidate failures, return the survivors strictly by score.

use std::cmp::Ordering;
use std::sync::Arc;
use std::time::Duration;

use futures::stream::{self, StreamExt};
use tracing::{debug, warn};

use rankdb_core::error::{Error, Result};
use rankdb_core::traits::ScoringBackend;
use rankdb_core::types::{ChunkId, RankedList, ScoredHit};

/// A candidate the reranker scores: the id plus the text handed to the
/// backend.
#[derive(Debug, Clone)]
pub struct RerankCandidate {
    pub id: ChunkId,
    pub text: String,
}

/// Reranked output plus the candidates that were dropped because their
/// scoring call failed or timed out.
#[derive(Debug, Clone, Default)]
pub struct RerankOutcome {
    pub ranked: RankedList,
    pub dropped: Vec<ChunkId>,
}

#[derive(Debug, Clone, Copy)]
pub struct RerankOptions {
    /// Upper bound on in-flight scoring calls.
    pub concurrency: usize,
    /// Per-call budget; a call exceeding it drops its candidate.
    pub timeout: Option<Duration>,
}

impl Default for RerankOptions {
    fn default() -> Self {
        Self {
            concurrency: 4,
            timeout: None,
        }
    }
}

pub struct Reranker {
    backend: Arc<dyn ScoringBackend>,
    options: RerankOptions,
}

impl Reranker {
    pub fn new(backend: Arc<dyn ScoringBackend>, options: RerankOptions) -> Result<Self> {
        if options.concurrency == 0 {
            return Err(Error::Config("rerank concurrency must be >= 1".to_string()));
        }
        Ok(Self { backend, options })
    }

    /// Score every candidate (concurrently up to the configured limit) and
    /// return the top `n` strictly by score descending, ties broken by the
    /// incoming order. One failing, panicking, or timed-out call drops one
    /// candidate and reports it in `dropped`; the rest of the batch still
    /// ranks. `n = 0` yields an empty outcome; `n` beyond the candidate
    /// count is clamped.
    pub fn rerank(
        &self,
        query: &str,
        candidates: &[RerankCandidate],
        n: usize,
    ) -> Result<RerankOutcome> {
        if n == 0 || candidates.is_empty() {
            return Ok(RerankOutcome::default());
        }

        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
            .map_err(|e| Error::Backend(e.into()))?;
        let results = runtime.block_on(self.score_all(query, candidates));

        let mut scored: Vec<(usize, f32)> = Vec::new();
        let mut dropped: Vec<(usize, ChunkId)> = Vec::new();
        for (rank, score) in results {
            match score {
                Some(score) => scored.push((rank, score)),
                None => dropped.push((rank, candidates[rank].id.clone())),
            }
        }
        if !dropped.is_empty() {
            warn!(dropped = dropped.len(), "scoring dropped candidates");
        }

        scored.sort_by(|(rank_a, score_a), (rank_b, score_b)| {
            score_b
                .partial_cmp(score_a)
                .unwrap_or(Ordering::Equal)
                .then_with(|| rank_a.cmp(rank_b))
        });
        dropped.sort_by_key(|(rank, _)| *rank);

        let ranked: RankedList = scored
            .into_iter()
            .take(n)
            .map(|(rank, score)| ScoredHit {
                id: candidates[rank].id.clone(),
                score,
            })
            .collect();
        debug!(
            candidates = candidates.len(),
            ranked = ranked.len(),
            dropped = dropped.len(),
            "rerank complete"
        );
        Ok(RerankOutcome {
            ranked,
            dropped: dropped.into_iter().map(|(_, id)| id).collect(),
        })
    }

    async fn score_all(
        &self,
        query: &str,
        candidates: &[RerankCandidate],
    ) -> Vec<(usize, Option<f32>)> {
        stream::iter(candidates.iter().enumerate())
            .map(|(rank, candidate)| {
                let backend = Arc::clone(&self.backend);
                let query = query.to_string();
                let text = candidate.text.clone();
                let timeout = self.options.timeout;
                async move {
                    let call = tokio::task::spawn_blocking(move || backend.score(&query, &text));
                    let joined = match timeout {
                        Some(limit) => match tokio::time::timeout(limit, call).await {
                            Ok(joined) => joined,
                            Err(_) => return (rank, None),
                        },
                        None => call.await,
                    };
                    match joined {
                        Ok(Ok(score)) => (rank, Some(score)),
                        Ok(Err(_)) | Err(_) => (rank, None),
                    }
                }
            })
            .buffer_unordered(self.options.concurrency)
            .collect()
            .await
    }
}
