use std::env;
use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use rankdb_cli::{corpus, embed, DemoDocumentStore, OverlapScorer, SimpleTokenizer, DEMO_DIM};
use rankdb_core::config::RetrievalConfig;
use rankdb_core::traits::Tokenizer;
use rankdb_core::types::{Chunk, Meta, SimilarityMetric};
use rankdb_dense::MemoryVectorStore;
use rankdb_hybrid::HybridRetrievalEngine;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        eprintln!("Usage: {} <query> [k] [--json]", args[0]);
        eprintln!("Example: {} 'technology sector earnings' 3", args[0]);
        std::process::exit(1);
    }
    let query = &args[1];
    let k: usize = args
        .get(2)
        .filter(|a| a.as_str() != "--json")
        .and_then(|a| a.parse().ok())
        .unwrap_or(5);
    let json = args.iter().any(|a| a == "--json");

    let tokenizer = SimpleTokenizer;
    let docs = corpus();
    let chunks: Vec<Chunk> = docs
        .iter()
        .map(|(id, text)| Chunk {
            id: (*id).to_string(),
            text: (*text).to_string(),
            vector: embed(&tokenizer.tokenize(text)),
            meta: Meta::new(),
        })
        .collect();

    let mut store = MemoryVectorStore::new(DEMO_DIM, SimilarityMetric::Cosine);
    for chunk in &chunks {
        store.insert(chunk.id.clone(), chunk.vector.clone())?;
    }

    let engine =
        HybridRetrievalEngine::new(store, Box::new(SimpleTokenizer), RetrievalConfig::load()?)?
            .with_document_store(Box::new(DemoDocumentStore::new(&docs)))
            .with_scoring_backend(Arc::new(OverlapScorer))?;
    for chunk in &chunks {
        engine.index_chunk(chunk)?;
    }

    let query_vector = embed(&tokenizer.tokenize(query));
    let results = engine.search(query, &query_vector, k)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&results)?);
        return Ok(());
    }

    println!("🔎 rankdb hybrid search\n=======================");
    println!("Query: {query}");
    println!("\nFound {} result(s):", results.len());
    for (i, hit) in results.iter().enumerate() {
        println!("  {}. score={:.4}  id={}", i + 1, hit.score, hit.id);
        if let Some((_, text)) = docs.iter().find(|(id, _)| *id == hit.id) {
            println!("     📝 {text}");
        }
    }
    Ok(())
}
