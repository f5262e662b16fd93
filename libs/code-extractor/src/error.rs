use code_model::{ConvertError, FormatError};
use config::constants::ConfigError;
use std::path::PathBuf;
use thiserror::Error;

/// Failure to load a raw parse tree.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("no parse tree for {}", path.display())]
    NotFound { path: PathBuf },

    #[error("cannot read parse tree for {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed parse tree for {}: {source}", path.display())]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Typed failure of one file extraction.
#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error(transparent)]
    Source(#[from] SourceError),

    #[error("conversion of {} failed: {source}", path.display())]
    Conversion {
        path: PathBuf,
        #[source]
        source: ConvertError,
    },

    /// Settings file or cache directory could not be accessed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A cache entry could not be written.
    #[error("cache format error: {0}")]
    Format(#[from] FormatError),

    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("cannot build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}
