//! Error types for table loading and query parsing.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("data directory not found: {}", path.display())]
    DirectoryNotFound { path: PathBuf },

    #[error("failed to read directory {}: {source}", path.display())]
    DirectoryRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to open {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("failed to read record in {}: {source}", path.display())]
    Record {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("no header row in {}", path.display())]
    MissingHeader { path: PathBuf },

    #[error("failed to read query list {}: {source}", path.display())]
    QueryFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, IngestError>;
