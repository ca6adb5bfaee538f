//! Typed retrieval configuration.
//!
//! Uses Figment to merge `rankdb.toml` with `RANKDB_*` environment
//! variables (double underscore separates sections, e.g.
//! `RANKDB_BM25__K1=1.5`). Every tunable is validated up front so a bad
//! value fails at load time instead of on the first query.

use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{Error, Result};
use crate::types::SimilarityMetric;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalConfig {
    pub bm25: Bm25Section,
    pub similarity: SimilaritySection,
    pub mmr: MmrSection,
    pub fusion: FusionSection,
    pub rerank: RerankSection,
}

/// Term-frequency saturation and length normalization for the sparse index.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Bm25Section {
    pub k1: f32,
    pub b: f32,
}

impl Default for Bm25Section {
    fn default() -> Self {
        Self { k1: 1.2, b: 0.75 }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SimilaritySection {
    pub metric: SimilarityMetric,
}

/// Defaults for diversity-aware selection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MmrSection {
    pub lambda: f32,
    pub fetch_k: usize,
}

impl Default for MmrSection {
    fn default() -> Self {
        Self {
            lambda: 0.5,
            fetch_k: 20,
        }
    }
}

/// Rank-fusion constant. 60 is the value from the original RRF paper.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FusionSection {
    pub k: f32,
}

impl Default for FusionSection {
    fn default() -> Self {
        Self { k: 60.0 }
    }
}

/// Scoring fan-out limits for the reranker.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RerankSection {
    pub concurrency: usize,
    pub timeout_ms: Option<u64>,
}

impl Default for RerankSection {
    fn default() -> Self {
        Self {
            concurrency: 4,
            timeout_ms: None,
        }
    }
}

impl RetrievalConfig {
    /// Load `rankdb.toml` from the working directory, then layer `RANKDB_*`
    /// environment variables on top. Both sources are optional; missing
    /// keys fall back to the defaults.
    pub fn load() -> Result<Self> {
        Self::extract(
            Figment::new()
                .merge(Toml::file("rankdb.toml"))
                .merge(Env::prefixed("RANKDB_").split("__")),
        )
    }

    /// Load from an explicit TOML file, defaults for anything unset.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::extract(Figment::new().merge(Toml::file(path.as_ref())))
    }

    fn extract(figment: Figment) -> Result<Self> {
        let config: Self = figment.extract().map_err(|e| Error::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.bm25.k1.is_finite() || self.bm25.k1 <= 0.0 {
            return Err(Error::Config(format!(
                "bm25.k1 must be > 0, got {}",
                self.bm25.k1
            )));
        }
        if !self.bm25.b.is_finite() || !(0.0..=1.0).contains(&self.bm25.b) {
            return Err(Error::Config(format!(
                "bm25.b must be in [0, 1], got {}",
                self.bm25.b
            )));
        }
        if !self.mmr.lambda.is_finite() || !(0.0..=1.0).contains(&self.mmr.lambda) {
            return Err(Error::Config(format!(
                "mmr.lambda must be in [0, 1], got {}",
                self.mmr.lambda
            )));
        }
        if self.mmr.fetch_k == 0 {
            return Err(Error::Config("mmr.fetch_k must be >= 1".to_string()));
        }
        if !self.fusion.k.is_finite() || self.fusion.k <= 0.0 {
            return Err(Error::Config(format!(
                "fusion.k must be > 0, got {}",
                self.fusion.k
            )));
        }
        if self.rerank.concurrency == 0 {
            return Err(Error::Config("rerank.concurrency must be >= 1".to_string()));
        }
        Ok(())
    }
}
