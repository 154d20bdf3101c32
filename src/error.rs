//! Error types for the pipeline stages.
//!
//! Only `WalkError` and, in strict mode, `WriteError` end a run. A
//! `ParseError` is logged and its file dropped from the batch.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Failure to enumerate the input tree. Always fatal.
#[derive(Debug, Error)]
pub enum WalkError {
    #[error("failed to read directory {}", path.display())]
    ReadDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to inspect entry {}", path.display())]
    EntryType {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Failure to turn one file's text into a document. Logged, never fatal.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("{0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("unknown tag !<{0}>")]
    UnknownTag(String),
}

/// Failure to produce the output artifact.
#[derive(Debug, Error)]
pub enum WriteError {
    #[error("failed to create output directory {}", path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to serialize resumes")]
    Serialize(#[from] serde_json::Error),

    #[error("failed to write {}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}
