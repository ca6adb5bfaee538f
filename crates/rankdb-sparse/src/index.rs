use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::debug;

use rankdb_core::error::{Error, Result};
use rankdb_core::types::{ChunkId, RankedList, ScoredHit};

/// Term-frequency saturation (`k1`) and length normalization (`b`).
#[derive(Debug, Clone, Copy)]
pub struct Bm25Params {
    pub k1: f32,
    pub b: f32,
}

impl Bm25Params {
    pub fn new(k1: f32, b: f32) -> Result<Self> {
        if !k1.is_finite() || k1 <= 0.0 {
            return Err(Error::Config(format!("bm25 k1 must be > 0, got {k1}")));
        }
        if !b.is_finite() || !(0.0..=1.0).contains(&b) {
            return Err(Error::Config(format!("bm25 b must be in [0, 1], got {b}")));
        }
        Ok(Self { k1, b })
    }
}

impl Default for Bm25Params {
    fn default() -> Self {
        Self { k1: 1.2, b: 0.75 }
    }
}

#[derive(Debug, Clone)]
struct Posting {
    doc: ChunkId,
    tf: u32,
}

#[derive(Debug, Default)]
struct CorpusState {
    /// term -> postings; one entry per document containing the term, so a
    /// term's document frequency is its posting-list length.
    postings: HashMap<String, Vec<Posting>>,
    doc_len: HashMap<ChunkId, u32>,
    total_len: u64,
}

/// BM25 inverted index over externally tokenized documents.
///
/// Writes are serialized through the write lock and a document's postings
/// become visible to readers in one step; queries run concurrently against
/// whichever consistent snapshot the lock hands them.
pub struct Bm25Index {
    params: Bm25Params,
    state: RwLock<CorpusState>,
}

impl Bm25Index {
    pub fn new(params: Bm25Params) -> Self {
        Self {
            params,
            state: RwLock::new(CorpusState::default()),
        }
    }

    pub fn params(&self) -> Bm25Params {
        self.params
    }

    /// Number of indexed documents.
    pub fn len(&self) -> usize {
        self.read().doc_len.len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().doc_len.is_empty()
    }

    /// Index one document's token stream. Documents are immutable once
    /// indexed; re-adding an id is rejected rather than silently corrupting
    /// the document-frequency and length sums.
    pub fn add_document(&self, id: &str, tokens: &[String]) -> Result<()> {
        let mut state = self.write();
        if state.doc_len.contains_key(id) {
            return Err(Error::InvalidArgument(format!(
                "document already indexed: {id}"
            )));
        }

        let mut tf: HashMap<&str, u32> = HashMap::new();
        for token in tokens {
            *tf.entry(token.as_str()).or_insert(0) += 1;
        }
        for (term, freq) in tf {
            state.postings.entry(term.to_string()).or_default().push(Posting {
                doc: id.to_string(),
                tf: freq,
            });
        }
        state.doc_len.insert(id.to_string(), tokens.len() as u32);
        state.total_len += tokens.len() as u64;
        debug!(doc = id, tokens = tokens.len(), "indexed document");
        Ok(())
    }

    /// Score the query tokens against every indexed document sharing at
    /// least one term; top-k by score descending, ties to the smaller doc
    /// id. Repeated query tokens contribute once per occurrence. An empty
    /// token list yields an empty result, not an error.
    pub fn query(&self, tokens: &[String], k: usize) -> Result<RankedList> {
        if k == 0 {
            return Err(Error::InvalidArgument("k must be > 0".to_string()));
        }
        let state = self.read();
        if tokens.is_empty() || state.doc_len.is_empty() {
            return Ok(Vec::new());
        }

        let n = state.doc_len.len() as f32;
        let avgdl = state.total_len as f32 / n;
        let Bm25Params { k1, b } = self.params;

        let mut scores: HashMap<&str, f32> = HashMap::new();
        for term in tokens {
            let Some(postings) = state.postings.get(term.as_str()) else {
                continue;
            };
            let df = postings.len() as f32;
            // The +1 keeps idf non-negative even for a term present in
            // every document; the unsmoothed form goes negative past
            // df > N/2.
            let idf = ((n - df + 0.5) / (df + 0.5) + 1.0).ln();
            for posting in postings {
                let tf = posting.tf as f32;
                let len = state.doc_len.get(&posting.doc).copied().unwrap_or(0) as f32;
                let norm = tf + k1 * (1.0 - b + b * len / avgdl);
                *scores.entry(posting.doc.as_str()).or_insert(0.0) +=
                    idf * tf * (k1 + 1.0) / norm;
            }
        }

        let candidates = scores.len();
        let mut hits: Vec<ScoredHit> = scores
            .into_iter()
            .map(|(id, score)| ScoredHit {
                id: id.to_string(),
                score,
            })
            .collect();
        hits.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.id.cmp(&b.id))
        });
        hits.truncate(k);
        debug!(terms = tokens.len(), candidates, returned = hits.len(), "bm25 query");
        Ok(hits)
    }

    fn read(&self) -> RwLockReadGuard<'_, CorpusState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, CorpusState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}
