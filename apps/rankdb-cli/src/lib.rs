//! Demo collaborators for the rankdb binaries: a deterministic
//! hashed-bag-of-words embedder, a whitespace tokenizer, an in-memory
//! document store, and a lexical-overlap scoring stub. These stand in for
//! the real embedding model, tokenizer, and cross-encoder a deployment
//! wires in through the same traits.

use std::collections::HashMap;
use std::hash::Hasher;

use twox_hash::XxHash64;

use rankdb_core::traits::{DocumentStore, ScoringBackend, Tokenizer};
use rankdb_core::types::Document;

pub const DEMO_DIM: usize = 64;

/// Small built-in corpus about 2024 stock market performance.
pub fn corpus() -> Vec<(&'static str, &'static str)> {
    vec![
        (
            "sp500",
            "The S&P 500 gained 23 percent in 2024, led by large cap technology stocks.",
        ),
        (
            "tech",
            "Technology sector earnings beat expectations as AI infrastructure spending surged.",
        ),
        (
            "fed",
            "The Federal Reserve cut interest rates twice in the second half of 2024.",
        ),
        (
            "bonds",
            "Bond yields stayed volatile while investors weighed sticky inflation data.",
        ),
        (
            "energy",
            "Energy stocks lagged the broader market as oil prices drifted lower.",
        ),
        (
            "smallcap",
            "Small cap stocks rallied late in the year on hopes of lower borrowing costs.",
        ),
    ]
}

/// Deterministic bag-of-words embedding: each token hashes into one of
/// `DEMO_DIM` buckets, then the vector is L2-normalized.
pub fn embed(tokens: &[String]) -> Vec<f32> {
    let mut vector = vec![0.0f32; DEMO_DIM];
    for token in tokens {
        let mut hasher = XxHash64::with_seed(0);
        hasher.write(token.as_bytes());
        let bucket = (hasher.finish() % DEMO_DIM as u64) as usize;
        vector[bucket] += 1.0;
    }
    let norm: f32 = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 0.0 {
        for x in &mut vector {
            *x /= norm;
        }
    }
    vector
}

/// Lowercased alphanumeric tokens, in order.
pub struct SimpleTokenizer;

impl Tokenizer for SimpleTokenizer {
    fn tokenize(&self, text: &str) -> Vec<String> {
        text.split(|c: char| !c.is_alphanumeric())
            .filter(|s| !s.is_empty())
            .map(str::to_lowercase)
            .collect()
    }
}

pub struct DemoDocumentStore(HashMap<String, String>);

impl DemoDocumentStore {
    pub fn new(docs: &[(&str, &str)]) -> Self {
        Self(
            docs.iter()
                .map(|(id, text)| ((*id).to_string(), (*text).to_string()))
                .collect(),
        )
    }
}

impl DocumentStore for DemoDocumentStore {
    fn fetch(&self, id: &str) -> anyhow::Result<Document> {
        let text = self
            .0
            .get(id)
            .ok_or_else(|| anyhow::anyhow!("unknown document: {id}"))?;
        Ok(Document {
            text: text.clone(),
            meta: HashMap::new(),
        })
    }
}

/// Scores a candidate by the fraction of query tokens its text contains.
pub struct OverlapScorer;

impl ScoringBackend for OverlapScorer {
    fn score(&self, query: &str, text: &str) -> anyhow::Result<f32> {
        let text = text.to_lowercase();
        let terms: Vec<String> = SimpleTokenizer.tokenize(query);
        if terms.is_empty() {
            return Ok(0.0);
        }
        let matched = terms.iter().filter(|t| text.contains(t.as_str())).count();
        Ok(matched as f32 / terms.len() as f32)
    }
}
