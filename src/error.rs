//! Error types for the readalong-pager library.
//!
//! Two distinct error types reflect two distinct failure modes:
//!
//! * [`PaginationError`] — **Fatal**: the word sequence cannot be paginated
//!   at all (empty input, no usable punctuation, bad configuration, unreadable
//!   input file). Returned as `Err(PaginationError)` from [`crate::paginate`]
//!   and the other top-level entry points.
//!
//! * [`ChunkError`] — **Non-fatal**: one chunk of a batch failed but the
//!   other chunks are fine. Yielded per chunk by [`crate::stream::paginate_stream`]
//!   and collected in [`crate::output::BatchOutput::failures`].
//!
//! `NoBreaksFound` is deliberately separate from the input-validation
//! variants: it means "this text is too flat for the punctuation heuristics",
//! not "there was nothing to paginate".

use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the readalong-pager library.
#[derive(Debug, Error)]
pub enum PaginationError {
    // ── Input validation ──────────────────────────────────────────────────
    /// The word list was empty.
    #[error("Cannot paginate an empty word list")]
    EmptyWordList,

    /// Every word was empty or whitespace, so the joined text is empty.
    #[error("Cannot paginate: the text derived from the word list is empty")]
    EmptyText,

    // ── Pagination ────────────────────────────────────────────────────────
    /// No numbered item, protected span or punctuation produced a break.
    #[error(
        "No page breaks found in {words} words.\n\
The text has no punctuation usable for pagination."
    )]
    NoBreaksFound { words: usize },

    // ── Input files ───────────────────────────────────────────────────────
    /// Input file was not found at the given path.
    #[error("Word timestamp file not found: '{path}'")]
    InputNotFound { path: PathBuf },

    /// Process does not have read permission on the file.
    #[error("Permission denied reading '{path}'")]
    PermissionDenied { path: PathBuf },

    /// The file was read but does not hold a word timestamp document.
    #[error("Invalid word timestamp input '{path}': {detail}")]
    InvalidInput { path: PathBuf, detail: String },

    // ── Output ────────────────────────────────────────────────────────────
    /// Could not create or write the output JSON file.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Batch ─────────────────────────────────────────────────────────────
    /// Every chunk of a batch failed; there is nothing to return.
    #[error("All {total} chunks failed to paginate.\nFirst error: {first_error}")]
    AllChunksFailed { total: usize, first_error: String },

    // ── Config ────────────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error, including failed result verification.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// A non-fatal error for a single chunk of a batch.
///
/// `chunk` is the 0-based position of the chunk in the batch input.
#[derive(Debug, Clone, Error, serde::Serialize, serde::Deserialize)]
pub enum ChunkError {
    /// The chunk had no words or only empty words.
    #[error("Chunk {chunk}: no words to paginate")]
    EmptyInput { chunk: usize },

    /// The chunk's text had no usable break points.
    #[error("Chunk {chunk}: no page breaks found in {words} words")]
    NoBreaks { chunk: usize, words: usize },

    /// Any other failure, including a panicked worker.
    #[error("Chunk {chunk}: pagination failed: {detail}")]
    Failed { chunk: usize, detail: String },
}

impl ChunkError {
    /// Classify a fatal engine error as the failure of one batch chunk.
    pub fn from_pagination(chunk: usize, err: &PaginationError) -> Self {
        match err {
            PaginationError::EmptyWordList | PaginationError::EmptyText => {
                ChunkError::EmptyInput { chunk }
            }
            PaginationError::NoBreaksFound { words } => ChunkError::NoBreaks {
                chunk,
                words: *words,
            },
            other => ChunkError::Failed {
                chunk,
                detail: other.to_string(),
            },
        }
    }

    /// 0-based chunk position this error belongs to.
    pub fn chunk(&self) -> usize {
        match self {
            ChunkError::EmptyInput { chunk }
            | ChunkError::NoBreaks { chunk, .. }
            | ChunkError::Failed { chunk, .. } => *chunk,
        }
    }
}
