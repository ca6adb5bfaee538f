//! Max Marginal Relevance: greedy relevance/diversity re-ordering of a
//! similarity-ranked candidate pool.

use rankdb_core::error::{Error, Result};
use rankdb_core::types::{RankedList, ScoredHit, VectorHit};

use crate::cosine_similarity;

/// Relevance/diversity balance. 1.0 is pure relevance, 0.0 ignores
/// relevance after the first pick.
#[derive(Debug, Clone, Copy)]
pub struct MmrParams {
    pub lambda: f32,
}

impl MmrParams {
    pub fn new(lambda: f32) -> Result<Self> {
        if !lambda.is_finite() || !(0.0..=1.0).contains(&lambda) {
            return Err(Error::Config(format!(
                "mmr lambda must be in [0, 1], got {lambda}"
            )));
        }
        Ok(Self { lambda })
    }
}

/// Greedily pick at most `k` entries from `pool` (similarity-ranked, best
/// first), each round taking the candidate with the highest
/// `lambda * sim_to_query - (1 - lambda) * max_sim_to_selected`. Ties go to
/// the candidate with the better original rank. The reported score is the
/// marginal-relevance score at pick time.
pub fn select(pool: &[VectorHit], k: usize, params: &MmrParams) -> RankedList {
    let mut remaining: Vec<usize> = (0..pool.len()).collect();
    let mut selected: Vec<usize> = Vec::new();
    let mut out: RankedList = Vec::new();

    while out.len() < k && !remaining.is_empty() {
        let mut best_pos = 0;
        let mut best_score = f32::NEG_INFINITY;
        for (pos, &candidate) in remaining.iter().enumerate() {
            let diversity = if selected.is_empty() {
                0.0
            } else {
                selected
                    .iter()
                    .map(|&s| cosine_similarity(&pool[candidate].vector, &pool[s].vector))
                    .fold(f32::NEG_INFINITY, f32::max)
            };
            let score =
                params.lambda * pool[candidate].score - (1.0 - params.lambda) * diversity;
            // Strictly greater: on a tie the earlier (better-ranked)
            // candidate keeps the slot.
            if score > best_score {
                best_score = score;
                best_pos = pos;
            }
        }
        let picked = remaining.remove(best_pos);
        selected.push(picked);
        out.push(ScoredHit {
            id: pool[picked].id.clone(),
            score: best_score,
        });
    }
    out
}
