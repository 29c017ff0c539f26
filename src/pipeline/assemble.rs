//! Page assembly: turn a break list into contiguous pages.

use super::text::joined_char_count;
use crate::input::WordTimestamp;
use crate::output::Page;

/// Split `words` after every position in `breaks`.
///
/// `breaks` are positions relative to `words`; they are sorted and
/// deduplicated here and positions past the end are ignored. `offset` is the
/// position of `words[0]` in the full input, so pages built from a sub-slice
/// still report absolute word positions. Empty spans never become pages.
pub fn assemble_pages(words: &[WordTimestamp], breaks: &[usize], offset: usize) -> Vec<Page> {
    let mut sorted: Vec<usize> = breaks.iter().copied().filter(|&b| b < words.len()).collect();
    sorted.sort_unstable();
    sorted.dedup();

    let mut pages = Vec::with_capacity(sorted.len() + 1);
    let mut start = 0;
    for b in sorted {
        if b < start {
            continue;
        }
        pages.push(build_page(&words[start..=b], offset + start, pages.len()));
        start = b + 1;
    }
    if start < words.len() {
        pages.push(build_page(&words[start..], offset + start, pages.len()));
    }
    pages
}

/// Build one page from a non-empty run of words starting at `first_position`.
pub fn build_page(words: &[WordTimestamp], first_position: usize, page_index: usize) -> Page {
    debug_assert!(!words.is_empty());
    let start_time = words.first().map_or(0.0, |w| w.start);
    let end_time = words.last().map_or(0.0, |w| w.end);
    Page {
        page_index,
        words: words.to_vec(),
        start_time,
        end_time,
        word_count: words.len(),
        character_count: joined_char_count(words),
        start_word_index: first_position,
        end_word_index: first_position + words.len().saturating_sub(1),
        transition_info: None,
    }
}

/// Reassign `page_index` as `0..N-1`.
pub fn renumber(pages: &mut [Page]) {
    for (k, page) in pages.iter_mut().enumerate() {
        page.page_index = k;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(n: usize) -> Vec<WordTimestamp> {
        (0..n)
            .map(|i| WordTimestamp::new(format!("w{i}"), i as f64, i as f64 + 0.5, i as i64 + 1))
            .collect()
    }

    #[test]
    fn splits_after_each_break() {
        let ws = words(6);
        let pages = assemble_pages(&ws, &[1, 3], 0);
        let spans: Vec<_> = pages
            .iter()
            .map(|p| (p.page_index, p.start_word_index, p.end_word_index))
            .collect();
        assert_eq!(spans, vec![(0, 0, 1), (1, 2, 3), (2, 4, 5)]);
        assert_eq!(pages[1].start_time, 2.0);
        assert_eq!(pages[1].end_time, 3.5);
        assert_eq!(pages[1].character_count, "w2 w3".len());
    }

    #[test]
    fn break_at_last_word_leaves_no_empty_page() {
        let ws = words(3);
        let pages = assemble_pages(&ws, &[2], 0);
        assert_eq!(pages.len(), 1);
        assert_eq!(pages[0].word_count, 3);
    }

    #[test]
    fn unsorted_and_duplicate_breaks_are_normalised() {
        let ws = words(5);
        let pages = assemble_pages(&ws, &[3, 0, 3, 9], 0);
        let counts: Vec<_> = pages.iter().map(|p| p.word_count).collect();
        assert_eq!(counts, vec![1, 3, 1]);
    }

    #[test]
    fn offset_shifts_positions() {
        let ws = words(10);
        let pages = assemble_pages(&ws[4..8], &[1], 4);
        assert_eq!(pages[0].start_word_index, 4);
        assert_eq!(pages[0].end_word_index, 5);
        assert_eq!(pages[1].start_word_index, 6);
        assert_eq!(pages[1].end_word_index, 7);
        assert_eq!(pages[1].words[0].index, 7);
    }

    #[test]
    fn renumber_restores_sequence() {
        let ws = words(4);
        let mut pages = assemble_pages(&ws, &[0], 0);
        pages.extend(assemble_pages(&ws[2..], &[], 2));
        renumber(&mut pages);
        let idx: Vec<_> = pages.iter().map(|p| p.page_index).collect();
        assert_eq!(idx, vec![0, 1, 2]);
    }
}
