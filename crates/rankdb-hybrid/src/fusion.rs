//! Reciprocal rank fusion: merge independently produced ranked lists using
//! rank positions only.

use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

use tracing::debug;

use rankdb_core::error::{Error, Result};
use rankdb_core::types::{RankedList, ScoredHit};

/// Rank-damping constant from the original RRF formulation.
pub const DEFAULT_RRF_K: f32 = 60.0;

#[derive(Debug, Clone, Copy)]
pub struct RrfParams {
    pub k: f32,
}

impl RrfParams {
    pub fn new(k: f32) -> Result<Self> {
        if !k.is_finite() || k <= 0.0 {
            return Err(Error::Config(format!("rrf constant must be > 0, got {k}")));
        }
        Ok(Self { k })
    }
}

impl Default for RrfParams {
    fn default() -> Self {
        Self { k: DEFAULT_RRF_K }
    }
}

#[derive(Default)]
struct Accumulator {
    score: f32,
    lists: usize,
}

/// Fuse `lists` into one ranking: each document accumulates
/// `1 / (k + rank)` over the lists containing it, 1-based ranks, input
/// scores discarded. A doc id repeated within one list counts once, at its
/// best rank. Ties are broken by the number of contributing lists, then by
/// the smaller id, so the output is independent of input-list order.
pub fn fuse(lists: &[RankedList], params: &RrfParams) -> RankedList {
    let mut accum: HashMap<&str, Accumulator> = HashMap::new();
    for list in lists {
        let mut seen: HashSet<&str> = HashSet::new();
        for (position, hit) in list.iter().enumerate() {
            if !seen.insert(hit.id.as_str()) {
                continue;
            }
            let entry = accum.entry(hit.id.as_str()).or_default();
            entry.score += 1.0 / (params.k + (position + 1) as f32);
            entry.lists += 1;
        }
    }

    let mut fused: Vec<(usize, ScoredHit)> = accum
        .into_iter()
        .map(|(id, acc)| {
            (
                acc.lists,
                ScoredHit {
                    id: id.to_string(),
                    score: acc.score,
                },
            )
        })
        .collect();
    fused.sort_by(|(lists_a, a), (lists_b, b)| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(Ordering::Equal)
            .then_with(|| lists_b.cmp(lists_a))
            .then_with(|| a.id.cmp(&b.id))
    });
    debug!(lists = lists.len(), fused = fused.len(), "rrf fusion");
    fused.into_iter().map(|(_, hit)| hit).collect()
}
