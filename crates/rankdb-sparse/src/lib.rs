//! rankdb-sparse
//!
//! BM25 lexical ranking over an in-memory inverted index. Tokens come from
//! an external tokenizer; this crate only owns postings, corpus statistics,
//! and scoring.

pub mod index;

pub use index::{Bm25Index, Bm25Params};
