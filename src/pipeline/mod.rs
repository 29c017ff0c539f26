//! Pipeline stages for word-timestamp pagination.
//!
//! Each submodule implements exactly one step. Stages take and return plain
//! values (word slices, break lists, `Vec<Page>`), so each is testable on
//! its own and the orchestrator in [`crate::paginate`] only wires them.
//!
//! ## Data Flow
//!
//! ```text
//! protected ──▶ punctuation ──▶ assemble ──▶ transition ──▶ split ──▶ transition
//! (ranges)      (breaks)        (pages)      (gaps)         (long pages)
//! ```
//!
//! 1. [`protected`]   — numbered items and short delimited spans; yields
//!    ranges that suppress breaks, plus a break at each range end
//! 2. [`punctuation`] — sentence-ending and clause-punctuation breaks
//! 3. [`assemble`]    — cut the word list after each break
//! 4. [`transition`]  — silent-gap midpoints for page turns
//! 5. [`split`]       — conjunction and breathing-gap passes for pages over
//!    the character cap
//!
//! [`text`] holds the word/text helpers the stages share.

pub mod assemble;
pub mod protected;
pub mod punctuation;
pub mod split;
pub mod text;
pub mod transition;
