//! Long-page splitter.
//!
//! Pages assembled from punctuation breaks can still be too long for one
//! screen (a run-on sentence with no commas). Two passes shorten them:
//!
//! 1. **Conjunctions**: split just before `and`, `or`, `but`, ... when
//!    such a word falls inside the page.
//! 2. **Breathing gaps**: split where the narrator paused for at least
//!    `breathing_gap_ms` between two words.
//!
//! Only pages over `max_page_chars` are touched, and a page with no
//! candidate is returned unchanged. The cap is a soft target.

use super::assemble::{assemble_pages, renumber};
use super::text::normalise_token;
use crate::input::WordTimestamp;
use crate::output::{Page, ProtectedRange};
use tracing::debug;

/// Words that open a new clause and make a natural page start.
pub const CONJUNCTIONS: &[&str] = &["and", "or", "but", "nor", "yet", "so", "however"];

pub fn is_conjunction(word: &str) -> bool {
    let token = normalise_token(word);
    CONJUNCTIONS.contains(&token.as_str())
}

/// Break proposals just before each conjunction.
///
/// `primary` must be sorted. A conjunction that is itself a primary break
/// or lies inside a protected range proposes nothing, and no proposal
/// lands on a shielded or primary position.
pub fn conjunction_breaks(
    words: &[WordTimestamp],
    ranges: &[ProtectedRange],
    primary: &[usize],
) -> Vec<usize> {
    (1..words.len())
        .filter(|&i| is_conjunction(&words[i].word))
        .filter(|i| primary.binary_search(i).is_err())
        .filter(|&i| !ranges.iter().any(|r| r.contains(i)))
        .map(|i| i - 1)
        .filter(|&b| !ranges.iter().any(|r| r.shields(b)))
        .filter(|b| primary.binary_search(b).is_err())
        .collect()
}

/// Pages after a splitting pass and how many new boundaries it applied.
#[derive(Debug, Clone, PartialEq)]
pub struct SplitOutcome {
    pub pages: Vec<Page>,
    pub splits: usize,
}

/// Split each long page at the conjunction proposals that fall inside it.
///
/// `proposals` are absolute word positions, sorted.
pub fn split_at_conjunctions(pages: Vec<Page>, proposals: &[usize], max_page_chars: usize) -> SplitOutcome {
    split_long_pages(pages, max_page_chars, |page| {
        let first = page.start_word_index;
        proposals
            .iter()
            .filter(|&&b| first <= b && b < page.end_word_index)
            .map(|&b| b - first)
            .collect()
    })
}

/// Split each long page after every pause of at least `breathing_gap_ms`.
///
/// `shielded` is the protection mask over absolute word positions.
pub fn split_at_breathing_gaps(
    pages: Vec<Page>,
    shielded: &[bool],
    breathing_gap_ms: f64,
    max_page_chars: usize,
) -> SplitOutcome {
    split_long_pages(pages, max_page_chars, |page| {
        page.words
            .windows(2)
            .enumerate()
            .filter(|(_, pair)| (pair[1].start - pair[0].end) * 1000.0 >= breathing_gap_ms)
            .map(|(k, _)| k)
            .filter(|&k| !shielded.get(page.start_word_index + k).copied().unwrap_or(false))
            .collect()
    })
}

/// Run `candidates` over every page above the cap and re-assemble it.
///
/// `candidates` returns break positions relative to the page.
fn split_long_pages<F>(pages: Vec<Page>, max_page_chars: usize, candidates: F) -> SplitOutcome
where
    F: Fn(&Page) -> Vec<usize>,
{
    let mut out = Vec::with_capacity(pages.len());
    let mut splits = 0;

    for page in pages {
        if page.character_count <= max_page_chars {
            out.push(page);
            continue;
        }
        let breaks = candidates(&page);
        if breaks.is_empty() {
            out.push(page);
            continue;
        }

        let pieces = assemble_pages(&page.words, &breaks, page.start_word_index);
        debug!(
            "Split page {} ({} chars) into {} pieces",
            page.page_index,
            page.character_count,
            pieces.len()
        );
        splits += pieces.len().saturating_sub(1);
        out.extend(pieces);
    }

    renumber(&mut out);
    SplitOutcome { pages: out, splits }
}
