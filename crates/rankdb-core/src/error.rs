use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// Invalid tunable at construction time. Fatal: nothing is built from a
    /// bad configuration.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// Per-call misuse: zero result counts, duplicate document ids,
    /// dimension mismatches.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A collaborator (vector store, document store, scoring backend)
    /// failed. Propagated as-is; retry policy belongs to the caller.
    #[error("backend error: {0}")]
    Backend(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
