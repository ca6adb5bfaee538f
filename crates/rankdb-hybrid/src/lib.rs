//! rankdb-hybrid
//!
//! Reciprocal rank fusion, reranking over a pluggable scoring capability,
//! and the engine wiring the sparse and dense retrievers into one pipeline.

pub mod engine;
pub mod fusion;
pub mod rerank;

pub use engine::HybridRetrievalEngine;
pub use fusion::{RrfParams, DEFAULT_RRF_K};
pub use rerank::{RerankCandidate, RerankOptions, RerankOutcome, Reranker};
