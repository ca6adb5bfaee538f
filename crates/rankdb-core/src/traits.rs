//! Collaborator contracts consumed by the retrieval engines. All of these
//! are provided by the embedding application; none are implemented here
//! beyond in-memory references for tests and demos.

use crate::types::{Document, ScoredHit, VectorHit};

/// External vector-search provider. `search` returns the top-n entries with
/// scores non-increasing by position.
pub trait VectorStore: Send + Sync {
    fn search(&self, query: &[f32], n: usize) -> anyhow::Result<Vec<ScoredHit>>;

    /// Like `search`, but each hit carries its stored vector so callers can
    /// run diversity-aware selection over the pool.
    fn search_with_vectors(&self, query: &[f32], n: usize) -> anyhow::Result<Vec<VectorHit>>;
}

/// Resolves a chunk id back to its text and metadata.
pub trait DocumentStore: Send + Sync {
    fn fetch(&self, id: &str) -> anyhow::Result<Document>;
}

/// Produces an ordered token sequence from raw text.
pub trait Tokenizer: Send + Sync {
    fn tokenize(&self, text: &str) -> Vec<String>;
}

/// The single capability the reranker is polymorphic over: a cross-encoder,
/// an LLM judge, and a deterministic test stub are all substitutable. Calls
/// may be remote and slow.
pub trait ScoringBackend: Send + Sync {
    fn score(&self, query: &str, text: &str) -> anyhow::Result<f32>;
}
