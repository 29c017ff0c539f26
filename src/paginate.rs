//! Pagination entry points.
//!
//! [`paginate`] is the primary API: a pure, synchronous function from a word
//! timestamp slice to a [`PageBreaksResult`]. Use
//! [`crate::stream::paginate_chunks`] to paginate many chunks concurrently.

use crate::config::PaginationConfig;
use crate::error::PaginationError;
use crate::input::{PaginationRequest, WordTimestamp};
use crate::output::{
    BreakBreakdown, BreakSource, Page, PageBreakDetail, PageBreaksResult, PaginationSummary,
};
use crate::pipeline::{assemble, protected, punctuation, split, text, transition};
use serde::Serialize;
use std::io::Write;
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info, trace, warn};

/// Paginate a word sequence into screen-sized pages.
///
/// Delimited content is detected on the words joined with single spaces.
///
/// # Errors
/// * [`PaginationError::EmptyWordList`] if `words` is empty
/// * [`PaginationError::EmptyText`] if every word is blank
/// * [`PaginationError::NoBreaksFound`] if no punctuation, numbered item or
///   protected span yields a break
///
/// # Example
/// ```rust
/// use readalong_pager::{paginate, PaginationConfig, WordTimestamp};
///
/// let words: Vec<WordTimestamp> = ["Hello", "there.", "How", "are", "you?"]
///     .iter()
///     .enumerate()
///     .map(|(i, w)| WordTimestamp::new(*w, i as f64 * 0.4, i as f64 * 0.4 + 0.3, i as i64))
///     .collect();
///
/// let result = paginate(&words, &PaginationConfig::default()).unwrap();
/// assert_eq!(result.pages.len(), 2);
/// assert_eq!(result.page_breaks, vec![1]);
/// ```
pub fn paginate(
    words: &[WordTimestamp],
    config: &PaginationConfig,
) -> Result<PageBreaksResult, PaginationError> {
    if words.is_empty() {
        return Err(PaginationError::EmptyWordList);
    }
    let joined = text::join_words(words);
    run(words, &joined, config)
}

/// Like [`paginate`], but scan `source_text` for delimited content.
///
/// Use this when the original text is available and its spacing differs
/// from the words joined with single spaces. Blank words are
/// [`PaginationError::EmptyText`] whatever `source_text` holds.
pub fn paginate_with_source_text(
    words: &[WordTimestamp],
    source_text: &str,
    config: &PaginationConfig,
) -> Result<PageBreaksResult, PaginationError> {
    if words.is_empty() {
        return Err(PaginationError::EmptyWordList);
    }
    run(words, source_text, config)
}

/// Paginate a loaded request, applying its thresholds on top of `config`.
pub fn paginate_request(
    request: &PaginationRequest,
    config: &PaginationConfig,
) -> Result<PageBreaksResult, PaginationError> {
    let config = config.with_thresholds(&request.thresholds)?;
    match request.text.as_deref() {
        Some(source) if !source.trim().is_empty() => {
            paginate_with_source_text(&request.words, source, &config)
        }
        _ => paginate(&request.words, &config),
    }
}

/// Paginate and write the result as pretty JSON to `output_path`.
///
/// Uses atomic write (temp file in the target directory + rename) so a
/// reader never sees a partial file.
pub fn paginate_to_file(
    words: &[WordTimestamp],
    output_path: impl AsRef<Path>,
    config: &PaginationConfig,
) -> Result<PageBreaksResult, PaginationError> {
    let result = paginate(words, config)?;
    write_result(&result, output_path.as_ref())?;
    Ok(result)
}

/// Atomically write a result as pretty JSON.
pub fn write_result(result: &PageBreaksResult, path: &Path) -> Result<(), PaginationError> {
    write_json(result, path, false)
}

/// Atomically write any serialisable value (a result, a batch) as JSON.
///
/// The JSON goes to a temp file in the target directory, which is then
/// renamed over `path`.
pub fn write_json<T: Serialize>(
    value: &T,
    path: &Path,
    compact: bool,
) -> Result<(), PaginationError> {
    let write_err = |source: std::io::Error| PaginationError::OutputWriteFailed {
        path: path.to_path_buf(),
        source,
    };

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir).map_err(write_err)?;

    let json = if compact {
        serde_json::to_vec(value)
    } else {
        serde_json::to_vec_pretty(value)
    }
    .map_err(|e| PaginationError::Internal(format!("serialise output: {e}")))?;

    let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(write_err)?;
    tmp.write_all(&json).map_err(write_err)?;
    tmp.write_all(b"\n").map_err(write_err)?;
    tmp.persist(path).map_err(|e| write_err(e.error))?;

    debug!("Wrote {} bytes to {}", json.len() + 1, path.display());
    Ok(())
}

// ── Pipeline ─────────────────────────────────────────────────────────────

/// Break positions found by each detector, before page assembly.
struct Discovered {
    numbered: Vec<usize>,
    protected: Vec<usize>,
    sentence: Vec<usize>,
    middle: Vec<usize>,
    conjunctions: Vec<usize>,
}

impl Discovered {
    /// Highest-priority detector that proposed `position`.
    fn source_of(&self, position: usize) -> BreakSource {
        let lists = [
            (&self.numbered, BreakSource::NumberedItem),
            (&self.protected, BreakSource::ProtectedContent),
            (&self.sentence, BreakSource::SentenceEnding),
            (&self.middle, BreakSource::MiddlePunctuation),
            (&self.conjunctions, BreakSource::Conjunction),
        ];
        lists
            .iter()
            .find(|(list, _)| list.binary_search(&position).is_ok())
            .map_or(BreakSource::BreathingGap, |(_, source)| *source)
    }
}

fn run(
    words: &[WordTimestamp],
    source_text: &str,
    config: &PaginationConfig,
) -> Result<PageBreaksResult, PaginationError> {
    let started = Instant::now();
    if source_text.trim().is_empty() || text::join_words(words).trim().is_empty() {
        return Err(PaginationError::EmptyText);
    }

    // ── Step 1: Protected ranges ─────────────────────────────────────────
    let numbered = protected::detect_numbered_items(words);
    let offsets = text::OffsetMap::build(source_text, words);
    let delimited =
        protected::detect_delimited(source_text, &offsets, config.protected_max_chars);

    let mut ranges = numbered.ranges;
    ranges.extend(delimited.ranges);
    let shielded = protected::shield_mask(&ranges, words.len());
    debug!("Found {} protected ranges", ranges.len());

    // A range end can fall inside a different range; such a break would
    // split the other range.
    let unshielded = |breaks: Vec<usize>| -> Vec<usize> {
        breaks.into_iter().filter(|&b| !shielded[b]).collect()
    };

    // ── Step 2: Punctuation ──────────────────────────────────────────────
    let mut found = Discovered {
        numbered: unshielded(numbered.breaks),
        protected: unshielded(delimited.breaks),
        sentence: punctuation::sentence_breaks(words, &shielded),
        middle: punctuation::middle_breaks(words, &shielded),
        conjunctions: Vec::new(),
    };

    let mut primary: Vec<usize> = found
        .numbered
        .iter()
        .chain(&found.protected)
        .chain(&found.sentence)
        .chain(&found.middle)
        .copied()
        .collect();
    text::sort_unique(&mut primary);

    if primary.is_empty() {
        return Err(PaginationError::NoBreaksFound { words: words.len() });
    }
    debug!(
        "Primary breaks: {} numbered, {} protected, {} sentence, {} middle",
        found.numbered.len(),
        found.protected.len(),
        found.sentence.len(),
        found.middle.len()
    );

    found.conjunctions = split::conjunction_breaks(words, &ranges, &primary);

    // ── Step 3: Assemble + transitions ───────────────────────────────────
    let mut pages = assemble::assemble_pages(words, &primary, 0);
    transition::annotate_transitions(&mut pages, config.transition_min_gap_secs);

    // ── Step 4: Long-page splitting ──────────────────────────────────────
    let mut breakdown = BreakBreakdown {
        numbered_items: found.numbered.len(),
        protected_content: found.protected.len(),
        sentence_endings: found.sentence.len(),
        middle_punctuation: found.middle.len(),
        conjunctions: found.conjunctions.len(),
        ..Default::default()
    };

    if config.split_long_pages {
        let by_conjunction =
            split::split_at_conjunctions(pages, &found.conjunctions, config.max_page_chars);
        breakdown.conjunction_splits = by_conjunction.splits;
        pages = by_conjunction.pages;
        transition::annotate_transitions(&mut pages, config.transition_min_gap_secs);

        let by_gap = split::split_at_breathing_gaps(
            pages,
            &shielded,
            config.breathing_gap_ms,
            config.max_page_chars,
        );
        breakdown.breathing_gaps = by_gap.splits;
        pages = by_gap.pages;
        transition::annotate_transitions(&mut pages, config.transition_min_gap_secs);
    }

    let oversized = count_oversized(&pages, config.max_page_chars);

    // ── Step 5: Result ───────────────────────────────────────────────────
    let page_breaks: Vec<usize> = pages
        .iter()
        .take(pages.len().saturating_sub(1))
        .map(|p| p.end_word_index)
        .collect();

    let page_break_details: Vec<PageBreakDetail> = page_breaks
        .iter()
        .map(|&pos| {
            let source = found.source_of(pos);
            PageBreakDetail {
                word_index: pos,
                word: words[pos].word.clone(),
                source,
                priority: source.priority(),
            }
        })
        .collect();

    let summary = PaginationSummary {
        total_words: words.len(),
        total_pages: pages.len(),
        average_page_size: round2(words.len() as f64 / pages.len() as f64),
        total_breaks: page_breaks.len(),
        oversized_pages: oversized,
        breakdown,
    };

    let result = PageBreaksResult {
        page_breaks,
        page_break_details,
        protected_ranges: ranges,
        pages,
        summary,
    };

    if config.debug {
        for detail in &result.page_break_details {
            trace!(
                "Break after word {} ({:?}) from {:?}",
                detail.word_index,
                detail.word,
                detail.source
            );
        }
        result.verify(words)?;
    }

    info!(
        "Paginated {} words into {} pages in {}µs",
        result.summary.total_words,
        result.summary.total_pages,
        started.elapsed().as_micros()
    );
    Ok(result)
}

fn count_oversized(pages: &[Page], max_page_chars: usize) -> usize {
    let mut count = 0;
    for page in pages.iter().filter(|p| p.character_count > max_page_chars) {
        warn!(
            "Page {} has {} characters (max {}) and no usable split point",
            page.page_index, page.character_count, max_page_chars
        );
        count += 1;
    }
    count
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::ProtectedKind;

    fn words(list: &[&str]) -> Vec<WordTimestamp> {
        list.iter()
            .enumerate()
            .map(|(i, w)| WordTimestamp::new(*w, i as f64 * 0.3, i as f64 * 0.3 + 0.25, i as i64))
            .collect()
    }

    #[test]
    fn empty_input_is_an_error() {
        let err = paginate(&[], &PaginationConfig::default()).unwrap_err();
        assert!(matches!(err, PaginationError::EmptyWordList));
    }

    #[test]
    fn blank_words_are_empty_text() {
        let ws = words(&["", "  "]);
        let err = paginate(&ws, &PaginationConfig::default()).unwrap_err();
        assert!(matches!(err, PaginationError::EmptyText));
    }

    #[test]
    fn blank_words_with_source_text_are_empty_text() {
        let ws = words(&["", " "]);
        let err = paginate_with_source_text(&ws, "Hello there.", &PaginationConfig::default())
            .unwrap_err();
        assert!(matches!(err, PaginationError::EmptyText));
    }

    #[test]
    fn no_punctuation_is_no_breaks() {
        let ws = words(&["just", "some", "words"]);
        let err = paginate(&ws, &PaginationConfig::default()).unwrap_err();
        assert!(matches!(err, PaginationError::NoBreaksFound { words: 3 }));
    }

    #[test]
    fn numbered_item_beats_conjunction() {
        let ws = words(&["1.", "Buy", "milk", "and", "eggs", "today."]);
        let result = paginate(&ws, &PaginationConfig::default()).unwrap();

        assert_eq!(result.protected_ranges.len(), 1);
        let r = &result.protected_ranges[0];
        assert_eq!((r.start, r.end, r.kind), (0, 3, ProtectedKind::NumberedItem));
        assert_eq!(result.summary.breakdown.conjunctions, 0);
        assert!(result.page_breaks.iter().all(|&b| b >= 3));
        assert_eq!(result.page_breaks, vec![3]);
        assert_eq!(result.page_break_details[0].source, BreakSource::NumberedItem);
        assert_eq!(result.page_break_details[0].priority, 1);
        assert!(result.verify(&ws).is_ok());
    }

    #[test]
    fn quoted_span_is_never_split() {
        let ws = words(&["He", "said", "\"Hello", "world\"", "to", "me."]);
        let result = paginate(&ws, &PaginationConfig::default()).unwrap();
        assert!(!result.page_breaks.contains(&2));
        assert_eq!(result.page_breaks, vec![3]);
        assert_eq!(
            result.page_break_details[0].source,
            BreakSource::ProtectedContent
        );
    }

    #[test]
    fn breaks_ending_inside_another_range_are_dropped() {
        // The numbered range 1..=4 ends on "tea" inside the quote 0..=5.
        let ws = words(&["\"Say", "1.", "hot", "black", "tea", "please\"", "now."]);
        let result = paginate(&ws, &PaginationConfig::default()).unwrap();
        assert_eq!(result.page_breaks, vec![5]);
        assert!(result.verify(&ws).is_ok());
    }

    #[test]
    fn summary_counts_and_average() {
        let ws = words(&["One.", "Two,", "three.", "Four"]);
        let result = paginate(&ws, &PaginationConfig::default()).unwrap();
        assert_eq!(result.summary.total_pages, 4);
        assert_eq!(result.summary.total_breaks, 3);
        assert_eq!(result.summary.average_page_size, 1.0);
        assert_eq!(result.summary.breakdown.sentence_endings, 2);
        assert_eq!(result.summary.breakdown.middle_punctuation, 1);
        assert_eq!(result.summary.oversized_pages, 0);
    }

    #[test]
    fn splitting_can_be_disabled() {
        let ws = words(&[
            "The", "quick", "brown", "fox", "jumps", "over", "the", "lazy", "dog", "and",
            "keeps", "running", "far", "away.",
        ]);
        let off = PaginationConfig::builder()
            .split_long_pages(false)
            .build()
            .unwrap();
        assert_eq!(paginate(&ws, &off).unwrap().pages.len(), 1);

        let on = PaginationConfig::builder().max_page_chars(30).build().unwrap();
        let result = paginate(&ws, &on).unwrap();
        assert_eq!(result.pages.len(), 2);
        assert_eq!(result.page_breaks, vec![8]);
        assert_eq!(result.page_break_details[0].source, BreakSource::Conjunction);
        assert_eq!(result.summary.breakdown.conjunction_splits, 1);
    }

    #[test]
    fn source_text_drives_delimiter_scan() {
        let ws = words(&["He", "said", "\"Hi", "there\"", "ok."]);
        let text = "He  said\t\"Hi there\"  ok.";
        let result = paginate_with_source_text(&ws, text, &PaginationConfig::default()).unwrap();
        assert_eq!(result.protected_ranges.len(), 1);
        assert_eq!(result.protected_ranges[0].start, 2);
        assert_eq!(result.protected_ranges[0].end, 3);
    }

    #[test]
    fn request_thresholds_override_gap() {
        let mut ws = words(&[
            "alpha", "beta", "gamma", "delta", "epsilon", "zeta", "eta", "theta", "iota",
            "kappa", "lambda", "mu", "nu", "xi", "omicron", "pi.",
        ]);
        for w in ws.iter_mut().skip(8) {
            w.start += 0.05;
            w.end += 0.05;
        }
        let mut request = PaginationRequest {
            words: ws,
            ..Default::default()
        };
        let config = PaginationConfig::default();
        assert_eq!(paginate_request(&request, &config).unwrap().pages.len(), 2);

        request.thresholds.break_pause_second = Some(150.0);
        assert_eq!(paginate_request(&request, &config).unwrap().pages.len(), 1);
    }

    #[test]
    fn debug_mode_verifies_result() {
        let ws = words(&["Hello,", "world.", "Bye."]);
        let config = PaginationConfig::builder().debug(true).build().unwrap();
        let result = paginate(&ws, &config).unwrap();
        assert_eq!(result.pages.len(), 3);
    }

    #[test]
    fn writes_result_atomically() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("pages.json");
        let ws = words(&["Hello.", "World."]);
        let result = paginate_to_file(&ws, &path, &PaginationConfig::default()).unwrap();

        let raw = std::fs::read_to_string(&path).unwrap();
        let back: PageBreaksResult = serde_json::from_str(&raw).unwrap();
        assert_eq!(back, result);
        assert!(raw.contains("\"pageBreaks\""));
    }
}
