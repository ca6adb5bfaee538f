use std::env;

use tracing_subscriber::EnvFilter;

use rankdb_cli::{corpus, SimpleTokenizer};
use rankdb_core::traits::Tokenizer;
use rankdb_sparse::{Bm25Index, Bm25Params};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        eprintln!("Usage: {} <query> [k]", args[0]);
        eprintln!("Example: {} 'interest rates' 3", args[0]);
        std::process::exit(1);
    }
    let query = &args[1];
    let k: usize = args.get(2).and_then(|a| a.parse().ok()).unwrap_or(5);

    let tokenizer = SimpleTokenizer;
    let index = Bm25Index::new(Bm25Params::default());
    let docs = corpus();
    for (id, text) in &docs {
        index.add_document(id, &tokenizer.tokenize(text))?;
    }

    let results = index.query(&tokenizer.tokenize(query), k)?;
    println!("🔎 rankdb bm25 search\n=====================");
    println!("Query: {query}  ({} documents indexed)", index.len());
    println!("\nFound {} result(s):", results.len());
    for (i, hit) in results.iter().enumerate() {
        println!("  {}. score={:.4}  id={}", i + 1, hit.score, hit.id);
        if let Some((_, text)) = docs.iter().find(|(id, _)| *id == hit.id) {
            println!("     📝 {text}");
        }
    }
    Ok(())
}
