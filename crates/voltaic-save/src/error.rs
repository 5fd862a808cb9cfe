//! Error types for voltaic-save.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid session document: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Core(#[from] voltaic_core::Error),

    #[error("record {record}: unknown component type {name:?}")]
    UnknownType { record: usize, name: String },

    #[error("record {record}: {message}")]
    Malformed { record: usize, message: String },

    #[error("record {record}: connection index {index} is out of range")]
    BadConnection { record: usize, index: usize },

    #[error("record {record}: cannot connect to record {index}: {source}")]
    Connect {
        record: usize,
        index: usize,
        source: voltaic_core::Error,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
