use std::fs;
use tempfile::TempDir;

use rankdb_core::config::RetrievalConfig;
use rankdb_core::types::SimilarityMetric;
use rankdb_core::Error;

#[test]
fn defaults_are_valid() {
    let config = RetrievalConfig::default();
    config.validate().expect("defaults validate");
    assert!((config.bm25.k1 - 1.2).abs() < 1e-6);
    assert!((config.bm25.b - 0.75).abs() < 1e-6);
    assert!((config.fusion.k - 60.0).abs() < 1e-6);
    assert_eq!(config.similarity.metric, SimilarityMetric::Cosine);
    assert_eq!(config.rerank.concurrency, 4);
    assert!(config.rerank.timeout_ms.is_none());
}

#[test]
fn from_file_overrides_selected_keys() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("rankdb.toml");
    fs::write(
        &path,
        r#"
[bm25]
k1 = 1.6

[similarity]
metric = "dot_product"

[rerank]
concurrency = 8
timeout_ms = 250
"#,
    )
    .unwrap();

    let config = RetrievalConfig::from_file(&path).expect("load");
    assert!((config.bm25.k1 - 1.6).abs() < 1e-6);
    // Unset keys keep their defaults
    assert!((config.bm25.b - 0.75).abs() < 1e-6);
    assert_eq!(config.similarity.metric, SimilarityMetric::DotProduct);
    assert_eq!(config.rerank.concurrency, 8);
    assert_eq!(config.rerank.timeout_ms, Some(250));
}

#[test]
fn missing_file_falls_back_to_defaults() {
    let tmp = TempDir::new().unwrap();
    let config = RetrievalConfig::from_file(tmp.path().join("absent.toml")).expect("load");
    assert!((config.fusion.k - 60.0).abs() < 1e-6);
}

#[test]
fn bad_tunables_fail_at_load_time() {
    let cases = [
        ("[bm25]\nk1 = 0.0\n", "bm25.k1"),
        ("[bm25]\nb = 1.5\n", "bm25.b"),
        ("[mmr]\nlambda = 2.0\n", "mmr.lambda"),
        ("[mmr]\nfetch_k = 0\n", "mmr.fetch_k"),
        ("[fusion]\nk = -1.0\n", "fusion.k"),
        ("[rerank]\nconcurrency = 0\n", "rerank.concurrency"),
    ];

    for (toml, key) in cases {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("rankdb.toml");
        fs::write(&path, toml).unwrap();
        match RetrievalConfig::from_file(&path) {
            Err(Error::Config(msg)) => {
                assert!(msg.contains(key), "error for {key} should name it: {msg}")
            }
            other => panic!("{key}: expected Config error, got {other:?}"),
        }
    }
}
