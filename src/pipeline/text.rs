//! Word and text helpers shared by every stage.
//!
//! The delimiter scan in [`super::protected`] works on character offsets
//! into a text, while every other stage works on word positions.
//! [`OffsetMap`] bridges the two. It is built by *searching the text* for
//! each word in order rather than by assuming the text is the words joined
//! with single spaces, so tabs, doubled spaces or a caller-supplied source
//! text do not shift the mapping.

use crate::input::WordTimestamp;
use tracing::debug;

/// Words joined with single spaces.
pub fn join_words(words: &[WordTimestamp]) -> String {
    let mut out = String::with_capacity(words.iter().map(|w| w.word.len() + 1).sum());
    for (i, w) in words.iter().enumerate() {
        if i > 0 {
            out.push(' ');
        }
        out.push_str(&w.word);
    }
    out
}

/// Character length of the single-space join, without allocating it.
pub fn joined_char_count(words: &[WordTimestamp]) -> usize {
    if words.is_empty() {
        return 0;
    }
    words.iter().map(|w| w.word.chars().count()).sum::<usize>() + words.len() - 1
}

/// Lower-cased word with leading/trailing punctuation removed.
pub fn normalise_token(word: &str) -> String {
    word.trim_matches(|c: char| !c.is_alphanumeric())
        .to_lowercase()
}

/// Sort and deduplicate a break list in place.
pub fn sort_unique(breaks: &mut Vec<usize>) {
    breaks.sort_unstable();
    breaks.dedup();
}

/// Byte span of one word inside the scanned text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WordSpan {
    pub start: usize,
    pub end: usize,
}

/// Maps byte offsets in a text back to word positions.
#[derive(Debug, Clone)]
pub struct OffsetMap {
    spans: Vec<WordSpan>,
}

impl OffsetMap {
    /// Locate each word in `text`, left to right.
    ///
    /// A word that cannot be found after the previous match gets an empty
    /// span at the current cursor; the scan continues with the next word.
    pub fn build(text: &str, words: &[WordTimestamp]) -> Self {
        let mut spans = Vec::with_capacity(words.len());
        let mut cursor = 0;
        let mut misses = 0usize;

        for w in words {
            let needle = w.word.trim();
            if needle.is_empty() {
                spans.push(WordSpan {
                    start: cursor,
                    end: cursor,
                });
                continue;
            }
            match text[cursor..].find(needle) {
                Some(rel) => {
                    let start = cursor + rel;
                    let end = start + needle.len();
                    spans.push(WordSpan { start, end });
                    cursor = end;
                }
                None => {
                    misses += 1;
                    spans.push(WordSpan {
                        start: cursor,
                        end: cursor,
                    });
                }
            }
        }

        if misses > 0 {
            debug!("{} of {} words not found in source text", misses, words.len());
        }
        Self { spans }
    }

    /// Position of the word covering (or last starting before) `offset`.
    pub fn word_at(&self, offset: usize) -> usize {
        self.spans
            .partition_point(|s| s.start <= offset)
            .saturating_sub(1)
    }

    pub fn span(&self, position: usize) -> Option<WordSpan> {
        self.spans.get(position).copied()
    }

    pub fn len(&self) -> usize {
        self.spans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(list: &[&str]) -> Vec<WordTimestamp> {
        list.iter()
            .enumerate()
            .map(|(i, w)| WordTimestamp::new(*w, i as f64, i as f64 + 0.5, i as i64))
            .collect()
    }

    #[test]
    fn join_and_count_agree() {
        let ws = words(&["Héllo", "wörld.", "ok"]);
        let joined = join_words(&ws);
        assert_eq!(joined, "Héllo wörld. ok");
        assert_eq!(joined_char_count(&ws), joined.chars().count());
        assert_eq!(joined_char_count(&[]), 0);
    }

    #[test]
    fn normalise_strips_edges_only() {
        assert_eq!(normalise_token("And,"), "and");
        assert_eq!(normalise_token("(However"), "however");
        assert_eq!(normalise_token("\"so\""), "so");
        assert_eq!(normalise_token("well-known"), "well-known");
        assert_eq!(normalise_token("..."), "");
    }

    #[test]
    fn offsets_follow_joined_text() {
        let ws = words(&["He", "said", "\"Hello", "world\""]);
        let text = join_words(&ws);
        let map = OffsetMap::build(&text, &ws);
        assert_eq!(map.len(), 4);
        assert_eq!(map.span(2), Some(WordSpan { start: 8, end: 14 }));
        assert_eq!(map.word_at(0), 0);
        assert_eq!(map.word_at(2), 0); // the space after "He"
        assert_eq!(map.word_at(8), 2);
        assert_eq!(map.word_at(text.len() - 1), 3);
    }

    #[test]
    fn offsets_survive_irregular_whitespace() {
        let ws = words(&["one", "two", "three"]);
        let text = "one\t\ttwo   three";
        let map = OffsetMap::build(text, &ws);
        assert_eq!(map.span(1), Some(WordSpan { start: 5, end: 8 }));
        assert_eq!(map.word_at(text.find("three").unwrap()), 2);
    }

    #[test]
    fn repeated_words_map_in_order() {
        let ws = words(&["la", "la", "la"]);
        let map = OffsetMap::build("la la la", &ws);
        assert_eq!(map.span(2), Some(WordSpan { start: 6, end: 8 }));
    }

    #[test]
    fn missing_word_gets_empty_span() {
        let ws = words(&["alpha", "zzz", "beta"]);
        let map = OffsetMap::build("alpha beta", &ws);
        assert_eq!(map.span(1), Some(WordSpan { start: 5, end: 5 }));
        assert_eq!(map.span(2), Some(WordSpan { start: 6, end: 10 }));
    }

    #[test]
    fn sort_unique_dedups() {
        let mut b = vec![5, 1, 5, 3, 1];
        sort_unique(&mut b);
        assert_eq!(b, vec![1, 3, 5]);
    }
}
