use rankdb_core::types::{SimilarityMetric, VectorHit};
use rankdb_core::Error;
use rankdb_dense::{
    cosine_similarity, mmr, MemoryVectorStore, MmrParams, ScoreThreshold, SimilarityRetriever,
};

use rankdb_core::traits::VectorStore;

fn store_with(entries: &[(&str, Vec<f32>)]) -> MemoryVectorStore {
    let dim = entries[0].1.len();
    let mut store = MemoryVectorStore::new(dim, SimilarityMetric::Cosine);
    for (id, vector) in entries {
        store.insert(*id, vector.clone()).expect("insert");
    }
    store
}

fn hit(id: &str, score: f32, vector: Vec<f32>) -> VectorHit {
    VectorHit {
        id: id.to_string(),
        score,
        vector,
    }
}

#[test]
fn cosine_similarity_basics() {
    assert!((cosine_similarity(&[1.0, 0.0], &[1.0, 0.0]) - 1.0).abs() < 1e-6);
    assert!(cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]).abs() < 1e-6);
    assert!((cosine_similarity(&[1.0, 0.0], &[-1.0, 0.0]) + 1.0).abs() < 1e-6);
    // Zero-norm input is defined as zero similarity, not NaN.
    assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 0.0]), 0.0);
}

#[test]
fn memory_store_orders_by_similarity() {
    let store = store_with(&[
        ("east", vec![0.0, 1.0]),
        ("north", vec![1.0, 0.0]),
        ("diagonal", vec![0.7071, 0.7071]),
    ]);

    let hits = store.search(&[0.9, 0.1], 10).expect("search");
    assert_eq!(hits.len(), 3);
    assert_eq!(hits[0].id, "north");
    assert_eq!(hits[1].id, "diagonal");
    for window in hits.windows(2) {
        assert!(window[0].score >= window[1].score);
    }
}

#[test]
fn memory_store_rejects_dimension_mismatch() {
    let mut store = MemoryVectorStore::new(3, SimilarityMetric::Cosine);
    assert!(matches!(
        store.insert("short", vec![1.0, 0.0]),
        Err(Error::InvalidArgument(_))
    ));
    assert!(store.search(&[1.0, 0.0], 5).is_err());
}

#[test]
fn memory_store_pool_carries_vectors() {
    let store = store_with(&[("a", vec![1.0, 0.0]), ("b", vec![0.0, 1.0])]);
    let pool = store.search_with_vectors(&[1.0, 0.0], 2).expect("search");
    assert_eq!(pool[0].id, "a");
    assert_eq!(pool[0].vector, vec![1.0, 0.0]);
    assert_eq!(pool[1].vector, vec![0.0, 1.0]);
}

#[test]
fn retrieve_rejects_zero_k() {
    let retriever = SimilarityRetriever::new(store_with(&[("a", vec![1.0, 0.0])]));
    assert!(matches!(
        retriever.retrieve(&[1.0, 0.0], 0),
        Err(Error::InvalidArgument(_))
    ));
}

#[test]
fn retrieve_returns_provider_order_verbatim() {
    let retriever = SimilarityRetriever::new(store_with(&[
        ("far", vec![0.0, 1.0]),
        ("near", vec![1.0, 0.0]),
    ]));
    let hits = retriever.retrieve(&[1.0, 0.0], 2).expect("retrieve");
    assert_eq!(hits[0].id, "near");
    assert_eq!(hits[1].id, "far");
}

#[test]
fn threshold_validates_against_metric_at_construction() {
    assert!(ScoreThreshold::new(SimilarityMetric::Cosine, 0.5).is_ok());
    assert!(ScoreThreshold::new(SimilarityMetric::Cosine, -1.0).is_ok());
    assert!(matches!(
        ScoreThreshold::new(SimilarityMetric::Cosine, 1.5),
        Err(Error::Config(_))
    ));
    assert!(matches!(
        ScoreThreshold::new(SimilarityMetric::Cosine, f32::NAN),
        Err(Error::Config(_))
    ));
    // Dot-product scores are unbounded; any finite cutoff is fine.
    assert!(ScoreThreshold::new(SimilarityMetric::DotProduct, 1e6).is_ok());
}

#[test]
fn threshold_never_returns_sub_threshold_scores() {
    let retriever = SimilarityRetriever::new(store_with(&[
        ("aligned", vec![1.0, 0.0]),
        ("angled", vec![0.7071, 0.7071]),
        ("orthogonal", vec![0.0, 1.0]),
        ("opposed", vec![-1.0, 0.0]),
    ]));
    let threshold = ScoreThreshold::new(SimilarityMetric::Cosine, 0.5).expect("threshold");

    let hits = retriever
        .retrieve_threshold(&[1.0, 0.0], 10, &threshold)
        .expect("retrieve");

    // Only the entries at or above the cutoff survive; nothing is padded in.
    assert_eq!(hits.len(), 2);
    for hit in &hits {
        assert!(hit.score >= 0.5);
    }
}

#[test]
fn threshold_result_is_capped_at_k() {
    let retriever = SimilarityRetriever::new(store_with(&[
        ("a", vec![1.0, 0.0]),
        ("b", vec![0.9, 0.1]),
        ("c", vec![0.8, 0.2]),
    ]));
    let threshold = ScoreThreshold::new(SimilarityMetric::Cosine, 0.0).expect("threshold");

    let hits = retriever
        .retrieve_threshold(&[1.0, 0.0], 2, &threshold)
        .expect("retrieve");
    assert_eq!(hits.len(), 2);
}

#[test]
fn mmr_lambda_validation() {
    assert!(MmrParams::new(0.0).is_ok());
    assert!(MmrParams::new(1.0).is_ok());
    assert!(matches!(MmrParams::new(1.1), Err(Error::Config(_))));
    assert!(matches!(MmrParams::new(-0.1), Err(Error::Config(_))));
    assert!(matches!(MmrParams::new(f32::NAN), Err(Error::Config(_))));
}

#[test]
fn mmr_pure_relevance_reproduces_similarity_order() {
    let pool = vec![
        hit("first", 0.95, vec![1.0, 0.0]),
        hit("second", 0.90, vec![0.99, 0.14]),
        hit("third", 0.80, vec![0.0, 1.0]),
    ];
    let params = MmrParams::new(1.0).expect("params");

    let picked = mmr::select(&pool, 3, &params);
    let ids: Vec<&str> = picked.iter().map(|h| h.id.as_str()).collect();
    assert_eq!(ids, ["first", "second", "third"]);
    // With lambda = 1 the reported scores are the original similarities.
    for (hit, original) in picked.iter().zip(&pool) {
        assert!((hit.score - original.score).abs() < 1e-6);
    }
}

#[test]
fn mmr_prefers_diverse_candidates() {
    // "duplicate" is nearly identical to the top pick; with a balanced
    // lambda the second slot goes to the orthogonal candidate instead.
    let pool = vec![
        hit("top", 0.95, vec![1.0, 0.0]),
        hit("duplicate", 0.94, vec![0.999, 0.045]),
        hit("diverse", 0.80, vec![0.0, 1.0]),
    ];
    let params = MmrParams::new(0.5).expect("params");

    let picked = mmr::select(&pool, 3, &params);
    let ids: Vec<&str> = picked.iter().map(|h| h.id.as_str()).collect();
    assert_eq!(ids, ["top", "diverse", "duplicate"]);
}

#[test]
fn mmr_ties_go_to_better_original_rank() {
    let pool = vec![
        hit("earlier", 0.9, vec![1.0, 0.0]),
        hit("later", 0.9, vec![1.0, 0.0]),
    ];
    let params = MmrParams::new(1.0).expect("params");

    let picked = mmr::select(&pool, 2, &params);
    assert_eq!(picked[0].id, "earlier");
    assert_eq!(picked[1].id, "later");
}

#[test]
fn mmr_exhausts_short_pools() {
    let pool = vec![hit("only", 0.9, vec![1.0, 0.0])];
    let params = MmrParams::new(0.5).expect("params");
    let picked = mmr::select(&pool, 5, &params);
    assert_eq!(picked.len(), 1);
}
