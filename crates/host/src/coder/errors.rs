// crates/host/src/coder/errors.rs

//! Error types for the Coder agent.

use thiserror::Error;

/// Why a model response could not be turned into files.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResponseError {
    #[error("response has no opening `~~~` delimiter")]
    MissingDelimiter,
    #[error("file header must name the path between two backticks: {line}")]
    MalformedFileHeader { line: String },
}

/// Why `execute` produced no files.
#[derive(Debug, Error)]
pub enum ExecuteError {
    #[error("model returned no usable files after {attempts} attempts")]
    RetriesExhausted { attempts: usize },
}
