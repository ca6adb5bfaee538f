//! Domain types shared by the sparse, dense, and hybrid engines.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub type ChunkId = String;
pub type Meta = HashMap<String, String>;

/// A chunk of a source document, produced by external ingestion and
/// embedding. Immutable once indexed.
///
/// - `id`: globally unique chunk identifier
/// - `text`: the text payload
/// - `vector`: the chunk's embedding
/// - `meta`: free-form key/value metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chunk {
    pub id: ChunkId,
    pub text: String,
    pub vector: Vec<f32>,
    #[serde(default)]
    pub meta: Meta,
}

/// One entry of a ranked result list. Higher score is always better.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredHit {
    pub id: ChunkId,
    pub score: f32,
}

/// An ordered result list: scores are non-increasing by position, and
/// position 1 is rank 1 (best).
pub type RankedList = Vec<ScoredHit>;

/// A candidate-pool entry that carries its stored vector, so callers can
/// run diversity-aware selection over the pool without a second store
/// round-trip.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VectorHit {
    pub id: ChunkId,
    pub score: f32,
    pub vector: Vec<f32>,
}

/// Payload a document store returns for one chunk id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    pub text: String,
    #[serde(default)]
    pub meta: Meta,
}

/// Similarity metric the dense side scores with. Score thresholds are only
/// meaningful relative to the metric they were chosen for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SimilarityMetric {
    #[default]
    Cosine,
    DotProduct,
}
