//! # readalong-pager
//!
//! Split time-aligned words from speech synthesis into screen-sized pages
//! for a read-along player.
//!
//! ## Why this crate?
//!
//! A read-along screen shows one page of text while the narration plays and
//! turns the page when the audio moves on. Cutting pages at fixed word
//! counts splits quotes and list items in half and turns pages in the middle
//! of a clause. This crate picks page boundaries the way a reader would:
//! at sentence ends first, then at clause punctuation, and only for pages
//! that are still too long, before conjunctions or at the narrator's pauses.
//! Short quoted, bracketed and numbered content is never split.
//!
//! ## Pipeline Overview
//!
//! ```text
//! [WordTimestamp]
//!  │
//!  ├─ 1. Protect   numbered items + short delimited spans
//!  ├─ 2. Punctuate sentence endings, then clause punctuation
//!  ├─ 3. Assemble  contiguous pages from the break list
//!  ├─ 4. Transit   silent-gap midpoints between pages
//!  ├─ 5. Split     long pages at conjunctions, then breathing gaps
//!  └─ 6. Output    pages + break diagnostics + summary
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use readalong_pager::{paginate, PaginationConfig, WordTimestamp};
//!
//! let words = vec![
//!     WordTimestamp::new("It", 0.00, 0.12, 0),
//!     WordTimestamp::new("was", 0.15, 0.30, 1),
//!     WordTimestamp::new("late.", 0.33, 0.70, 2),
//!     WordTimestamp::new("Everyone", 0.95, 1.40, 3),
//!     WordTimestamp::new("slept.", 1.45, 1.90, 4),
//! ];
//!
//! let result = paginate(&words, &PaginationConfig::default()).unwrap();
//! assert_eq!(result.pages.len(), 2);
//! assert_eq!(result.pages[0].text(), "It was late.");
//! // The page turns halfway through the pause after "late."
//! let turn = result.pages[0].transition_info.unwrap();
//! assert_eq!(turn.gap_midpoint_time, 0.825);
//! ```
//!
//! ## Word Positions
//!
//! Every position the engine reports (`pageBreaks`, protected range bounds,
//! `startWordIndex`/`endWordIndex`) is a 0-based offset into the slice that
//! was paginated. [`WordTimestamp::index`] is carried through untouched, so
//! producers that number words from 0 or from 1 get identical pages.
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `readalong-pager` binary (clap + anyhow + indicatif + tracing-subscriber) |
//!
//! Disable `cli` when using only the library:
//! ```toml
//! readalong-pager = { version = "0.3", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod error;
pub mod input;
pub mod output;
pub mod paginate;
pub mod pipeline;
pub mod progress;
pub mod stream;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{PaginationConfig, PaginationConfigBuilder, PaginationThresholds};
pub use error::{ChunkError, PaginationError};
pub use input::{load_request, parse_request, PaginationRequest, WordTimestamp};
pub use output::{
    BatchOutput, BatchStats, BreakBreakdown, BreakSource, ChunkPagination, Page,
    PageBreakDetail, PageBreaksResult, PaginationSummary, ProtectedKind, ProtectedRange,
    TransitionInfo,
};
pub use paginate::{
    paginate, paginate_request, paginate_to_file, paginate_with_source_text, write_json,
    write_result,
};
pub use progress::{NoopProgressCallback, PaginationProgressCallback, ProgressCallback};
pub use stream::{paginate_chunks, paginate_chunks_sync, paginate_stream, ChunkStream};
