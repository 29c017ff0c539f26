//! Result types returned by the pagination entry points.
//!
//! Everything here is `Serialize`/`Deserialize` with camelCase field names:
//! the serialised [`PageBreaksResult`] is the pagination JSON that storage
//! persists and the reading UI consumes.

use crate::error::{ChunkError, PaginationError};
use crate::input::WordTimestamp;
use serde::{Deserialize, Serialize};

// ── Protected ranges ─────────────────────────────────────────────────────────

/// Kind of content a [`ProtectedRange`] shields from page breaks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProtectedKind {
    NumberedItem,
    Quotes,
    Parentheses,
    Brackets,
    Braces,
    Guillemets,
}

/// A span of words that must never be split across pages.
///
/// `start` and `end` are inclusive 0-based word positions. A page may end at
/// `end` but never at any position in `start..end`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProtectedRange {
    pub start: usize,
    pub end: usize,
    #[serde(rename = "type")]
    pub kind: ProtectedKind,
    pub char_count: usize,
}

impl ProtectedRange {
    /// True if a page boundary after word `position` would split this range.
    pub fn shields(&self, position: usize) -> bool {
        self.start <= position && position < self.end
    }

    /// True if word `position` lies anywhere in the range, end included.
    pub fn contains(&self, position: usize) -> bool {
        self.start <= position && position <= self.end
    }
}

// ── Break points ─────────────────────────────────────────────────────────────

/// Detector that produced a break point, in priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BreakSource {
    NumberedItem,
    ProtectedContent,
    SentenceEnding,
    MiddlePunctuation,
    Conjunction,
    BreathingGap,
}

impl BreakSource {
    /// 1 (highest) to 6 (lowest). Diagnostic only; all breaks are used.
    pub fn priority(self) -> u8 {
        match self {
            BreakSource::NumberedItem => 1,
            BreakSource::ProtectedContent => 2,
            BreakSource::SentenceEnding => 3,
            BreakSource::MiddlePunctuation => 4,
            BreakSource::Conjunction => 5,
            BreakSource::BreathingGap => 6,
        }
    }
}

/// One applied page boundary with its diagnostic label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageBreakDetail {
    /// 0-based position of the last word before the boundary.
    pub word_index: usize,
    pub word: String,
    pub source: BreakSource,
    pub priority: u8,
}

// ── Pages ────────────────────────────────────────────────────────────────────

/// Silent gap between a page and the next one.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransitionInfo {
    pub gap_start_time: f64,
    pub gap_end_time: f64,
    /// Gap midpoint rounded to milliseconds; the UI advances here.
    pub gap_midpoint_time: f64,
}

/// A contiguous run of words shown on one screen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    pub page_index: usize,
    pub words: Vec<WordTimestamp>,
    pub start_time: f64,
    pub end_time: f64,
    pub word_count: usize,
    pub character_count: usize,
    /// 0-based position of the first word in the paginated input.
    pub start_word_index: usize,
    /// 0-based position of the last word in the paginated input.
    pub end_word_index: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transition_info: Option<TransitionInfo>,
}

impl Page {
    /// The page text, words joined by single spaces.
    pub fn text(&self) -> String {
        crate::pipeline::text::join_words(&self.words)
    }

    pub fn duration(&self) -> f64 {
        self.end_time - self.start_time
    }
}

// ── Summary ──────────────────────────────────────────────────────────────────

/// Break counts per detector.
///
/// The first four count discovered break points; `conjunctions` counts
/// discovered conjunction proposals, `conjunction_splits` and
/// `breathing_gaps` count the splits the long-page splitter applied.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BreakBreakdown {
    pub numbered_items: usize,
    pub protected_content: usize,
    pub sentence_endings: usize,
    pub middle_punctuation: usize,
    pub conjunctions: usize,
    pub conjunction_splits: usize,
    pub breathing_gaps: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationSummary {
    pub total_words: usize,
    pub total_pages: usize,
    /// Mean words per page, rounded to two decimals.
    pub average_page_size: f64,
    /// Number of applied page boundaries (`pageBreaks.len()`).
    pub total_breaks: usize,
    /// Pages still over `max_page_chars` after splitting.
    pub oversized_pages: usize,
    pub breakdown: BreakBreakdown,
}

/// Output of a single pagination call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageBreaksResult {
    /// Last-word positions of every page but the final one.
    pub page_breaks: Vec<usize>,
    pub page_break_details: Vec<PageBreakDetail>,
    pub protected_ranges: Vec<ProtectedRange>,
    pub pages: Vec<Page>,
    pub summary: PaginationSummary,
}

impl PageBreaksResult {
    /// Every word of the result, in page order.
    pub fn words(&self) -> Vec<WordTimestamp> {
        self.pages
            .iter()
            .flat_map(|p| p.words.iter().cloned())
            .collect()
    }

    /// Re-check the structural invariants against the input words.
    ///
    /// * pages partition `words` exactly, in order
    /// * `pageIndex` is `0..N-1` and word positions are contiguous
    /// * no page ends strictly inside a protected range
    pub fn verify(&self, words: &[WordTimestamp]) -> Result<(), PaginationError> {
        let flattened = self.words();
        if flattened.as_slice() != words {
            return Err(PaginationError::Internal(format!(
                "pages hold {} words, input has {}; partition broken",
                flattened.len(),
                words.len()
            )));
        }

        let mut next_position = 0;
        for (k, page) in self.pages.iter().enumerate() {
            if page.page_index != k {
                return Err(PaginationError::Internal(format!(
                    "page at position {k} has pageIndex {}",
                    page.page_index
                )));
            }
            if page.words.is_empty() || page.start_word_index != next_position {
                return Err(PaginationError::Internal(format!(
                    "page {k} starts at word {} (expected {next_position})",
                    page.start_word_index
                )));
            }
            next_position = page.end_word_index + 1;

            if let Some(range) = self
                .protected_ranges
                .iter()
                .find(|r| r.shields(page.end_word_index))
            {
                return Err(PaginationError::Internal(format!(
                    "page {k} ends at word {} inside protected {:?} range {}..={}",
                    page.end_word_index, range.kind, range.start, range.end
                )));
            }
        }
        Ok(())
    }
}

// ── Batch ────────────────────────────────────────────────────────────────────

/// Pagination of one chunk of a batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChunkPagination {
    /// 0-based chunk position in the batch input.
    pub chunk_index: usize,
    pub result: PageBreaksResult,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchStats {
    pub total_chunks: usize,
    pub paginated_chunks: usize,
    pub failed_chunks: usize,
    pub total_pages: usize,
    pub total_duration_ms: u64,
}

/// Output of [`crate::stream::paginate_chunks`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchOutput {
    /// Successful chunks, sorted by `chunk_index`.
    pub chunks: Vec<ChunkPagination>,
    /// Failed chunks, sorted by chunk.
    pub failures: Vec<ChunkError>,
    pub stats: BatchStats,
}

impl BatchOutput {
    /// Treat any failed chunk as an error.
    pub fn into_result(self) -> Result<Vec<ChunkPagination>, PaginationError> {
        match self.failures.first() {
            None => Ok(self.chunks),
            Some(first) => Err(PaginationError::Internal(format!(
                "{}/{} chunks failed; first: {}",
                self.stats.failed_chunks, self.stats.total_chunks, first
            ))),
        }
    }
}
