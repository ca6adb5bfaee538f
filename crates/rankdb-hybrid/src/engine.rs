//! The hybrid engine: one sparse index and one dense retriever behind the
//! library's retrieval operations, with fusion and optional reranking on
//! top.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use rankdb_core::config::RetrievalConfig;
use rankdb_core::error::{Error, Result};
use rankdb_core::traits::{DocumentStore, ScoringBackend, Tokenizer, VectorStore};
use rankdb_core::types::{Chunk, RankedList};
use rankdb_dense::{mmr, MmrParams, ScoreThreshold, SimilarityRetriever};
use rankdb_sparse::{Bm25Index, Bm25Params};

use crate::fusion::{self, RrfParams};
use crate::rerank::{RerankCandidate, RerankOptions, RerankOutcome, Reranker};

/// Owns the BM25 index it builds and the dense retrieval policy over the
/// caller's vector store. The document store and scoring backend are
/// optional; without them only the retrieval and fusion operations are
/// available.
pub struct HybridRetrievalEngine<V: VectorStore> {
    similarity: SimilarityRetriever<V>,
    bm25: Bm25Index,
    tokenizer: Box<dyn Tokenizer>,
    documents: Option<Box<dyn DocumentStore>>,
    reranker: Option<Reranker>,
    config: RetrievalConfig,
}

impl<V: VectorStore> HybridRetrievalEngine<V> {
    pub fn new(store: V, tokenizer: Box<dyn Tokenizer>, config: RetrievalConfig) -> Result<Self> {
        config.validate()?;
        let params = Bm25Params::new(config.bm25.k1, config.bm25.b)?;
        Ok(Self {
            similarity: SimilarityRetriever::new(store),
            bm25: Bm25Index::new(params),
            tokenizer,
            documents: None,
            reranker: None,
            config,
        })
    }

    pub fn with_document_store(mut self, documents: Box<dyn DocumentStore>) -> Self {
        self.documents = Some(documents);
        self
    }

    pub fn with_scoring_backend(mut self, backend: Arc<dyn ScoringBackend>) -> Result<Self> {
        let options = RerankOptions {
            concurrency: self.config.rerank.concurrency,
            timeout: self.config.rerank.timeout_ms.map(Duration::from_millis),
        };
        self.reranker = Some(Reranker::new(backend, options)?);
        Ok(self)
    }

    /// Tokenize one chunk and add it to the sparse index. The dense side is
    /// populated by external ingestion; only the BM25 corpus lives here.
    pub fn index_chunk(&self, chunk: &Chunk) -> Result<()> {
        let tokens = self.tokenizer.tokenize(&chunk.text);
        self.bm25.add_document(&chunk.id, &tokens)
    }

    /// Number of documents in the sparse index.
    pub fn indexed_documents(&self) -> usize {
        self.bm25.len()
    }

    pub fn retrieve_similarity(&self, query: &[f32], k: usize) -> Result<RankedList> {
        self.similarity.retrieve(query, k)
    }

    /// Thresholded dense retrieval; the cutoff is validated against the
    /// configured metric before any provider call is made.
    pub fn retrieve_similarity_threshold(
        &self,
        query: &[f32],
        k: usize,
        threshold: f32,
    ) -> Result<RankedList> {
        let threshold = ScoreThreshold::new(self.config.similarity.metric, threshold)?;
        self.similarity.retrieve_threshold(query, k, &threshold)
    }

    /// Diversity-aware dense retrieval: fetch a pool of `fetch_k`, then
    /// greedily select at most `k` balancing relevance against redundancy.
    pub fn retrieve_mmr(
        &self,
        query: &[f32],
        k: usize,
        fetch_k: usize,
        lambda: f32,
    ) -> Result<RankedList> {
        if k == 0 {
            return Err(Error::InvalidArgument("k must be > 0".to_string()));
        }
        if fetch_k < k {
            return Err(Error::Config(format!(
                "mmr fetch_k ({fetch_k}) must be >= k ({k})"
            )));
        }
        let params = MmrParams::new(lambda)?;
        let pool = self.similarity.store().search_with_vectors(query, fetch_k)?;
        debug!(k, fetch_k, pool = pool.len(), "mmr selection");
        Ok(mmr::select(&pool, k, &params))
    }

    pub fn retrieve_bm25(&self, tokens: &[String], k: usize) -> Result<RankedList> {
        self.bm25.query(tokens, k)
    }

    /// Merge any number of ranked lists by reciprocal rank.
    pub fn fuse(&self, lists: &[RankedList], k_const: f32) -> Result<RankedList> {
        let params = RrfParams::new(k_const)?;
        Ok(fusion::fuse(lists, &params))
    }

    /// Rerank `candidates` with the configured scoring backend, resolving
    /// each candidate's text through the document store. A candidate whose
    /// fetch or scoring call fails is dropped and reported, never fatal.
    pub fn rerank(&self, query: &str, candidates: &RankedList, n: usize) -> Result<RerankOutcome> {
        let reranker = self
            .reranker
            .as_ref()
            .ok_or_else(|| Error::Config("no scoring backend configured".to_string()))?;
        let documents = self
            .documents
            .as_ref()
            .ok_or_else(|| Error::Config("no document store configured".to_string()))?;

        let mut fetched = Vec::with_capacity(candidates.len());
        let mut unfetchable = Vec::new();
        for hit in candidates {
            match documents.fetch(&hit.id) {
                Ok(doc) => fetched.push(RerankCandidate {
                    id: hit.id.clone(),
                    text: doc.text,
                }),
                Err(err) => {
                    warn!(id = %hit.id, error = %err, "document fetch failed, dropping candidate");
                    unfetchable.push(hit.id.clone());
                }
            }
        }

        let mut outcome = reranker.rerank(query, &fetched, n)?;
        // Fetch failures are reported the same way scoring failures are.
        unfetchable.extend(outcome.dropped);
        outcome.dropped = unfetchable;
        Ok(outcome)
    }

    /// Full hybrid query: the dense and sparse branches run concurrently
    /// over the same query, their rankings are fused, and the fused list is
    /// reranked down to `k` when a backend and document store are
    /// configured (otherwise truncated).
    pub fn search(&self, query_text: &str, query_vector: &[f32], k: usize) -> Result<RankedList> {
        if k == 0 {
            return Err(Error::InvalidArgument("k must be > 0".to_string()));
        }
        let tokens = self.tokenizer.tokenize(query_text);

        let (dense, sparse) = std::thread::scope(|scope| {
            let dense = scope.spawn(|| self.similarity.retrieve(query_vector, k));
            let sparse = self.bm25.query(&tokens, k);
            (dense.join(), sparse)
        });
        let dense = dense.map_err(|_| {
            Error::Backend(anyhow::anyhow!("similarity branch panicked"))
        })??;
        let sparse = sparse?;
        debug!(dense = dense.len(), sparse = sparse.len(), "hybrid branches complete");

        let fused = fusion::fuse(&[dense, sparse], &RrfParams::new(self.config.fusion.k)?);
        let results = if self.reranker.is_some() && self.documents.is_some() {
            self.rerank(query_text, &fused, k)?.ranked
        } else {
            let mut fused = fused;
            fused.truncate(k);
            fused
        };
        info!(k, results = results.len(), "hybrid search complete");
        Ok(results)
    }
}
