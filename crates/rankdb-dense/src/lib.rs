//! rankdb-dense
//!
//! Dense retrieval: a thin policy layer over an external vector-search
//! provider, Max Marginal Relevance selection over candidate pools, and an
//! exact-scan in-memory store for demos and tests.

pub mod memory;
pub mod mmr;
pub mod similarity;

pub use memory::MemoryVectorStore;
pub use mmr::MmrParams;
pub use similarity::{ScoreThreshold, SimilarityRetriever};

/// Cosine similarity; 0.0 when either vector has zero norm.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        dot / (norm_a * norm_b)
    }
}

pub(crate) fn dot_product(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b.iter()).map(|(x, y)| x * y).sum()
}
