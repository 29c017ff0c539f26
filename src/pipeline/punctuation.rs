//! Punctuation break finder.
//!
//! Sentence endings (`.`, `!`, `?`) are the preferred page boundaries; middle
//! punctuation (commas, semicolons, colons, dashes, ellipses) is the fallback.
//! Neither is emitted inside a protected range.

use super::text::sort_unique;
use crate::input::WordTimestamp;
use once_cell::sync::Lazy;
use regex::Regex;

static RE_SENTENCE_END: Lazy<Regex> = Lazy::new(|| Regex::new(r"[.!?]+$").unwrap());

static RE_MIDDLE_PUNCT: Lazy<Regex> = Lazy::new(|| Regex::new(r"[,;:—–…-]+$").unwrap());

pub fn is_sentence_end(word: &str) -> bool {
    RE_SENTENCE_END.is_match(word.trim_end())
}

pub fn is_middle_punctuation(word: &str) -> bool {
    RE_MIDDLE_PUNCT.is_match(word.trim_end())
}

/// Positions of unshielded words ending a sentence.
pub fn sentence_breaks(words: &[WordTimestamp], shielded: &[bool]) -> Vec<usize> {
    let mut breaks: Vec<usize> = words
        .iter()
        .enumerate()
        .filter(|(i, w)| !is_shielded(shielded, *i) && is_sentence_end(&w.word))
        .map(|(i, _)| i)
        .collect();
    sort_unique(&mut breaks);
    breaks
}

/// Positions of unshielded words ending in clause punctuation.
///
/// A word that also ends a sentence is left to [`sentence_breaks`].
pub fn middle_breaks(words: &[WordTimestamp], shielded: &[bool]) -> Vec<usize> {
    let mut breaks: Vec<usize> = words
        .iter()
        .enumerate()
        .filter(|(i, w)| {
            !is_shielded(shielded, *i)
                && !is_sentence_end(&w.word)
                && is_middle_punctuation(&w.word)
        })
        .map(|(i, _)| i)
        .collect();
    sort_unique(&mut breaks);
    breaks
}

fn is_shielded(mask: &[bool], position: usize) -> bool {
    mask.get(position).copied().unwrap_or(false)
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
    fn classifies_endings() {
        assert!(is_sentence_end("done."));
        assert!(is_sentence_end("really?!"));
        assert!(is_sentence_end("wait..."));
        assert!(!is_sentence_end("\"quoted.\""));
        assert!(is_middle_punctuation("first,"));
        assert!(is_middle_punctuation("then;"));
        assert!(is_middle_punctuation("so—"));
        assert!(is_middle_punctuation("-"));
        assert!(is_middle_punctuation("and…"));
        assert!(!is_middle_punctuation("well-known"));
    }

    #[test]
    fn finds_sentence_and_middle_breaks() {
        let ws = words(&["Hello,", "world.", "How", "are", "you?", "Fine;", "thanks"]);
        let mask = vec![false; ws.len()];
        assert_eq!(sentence_breaks(&ws, &mask), vec![1, 4]);
        assert_eq!(middle_breaks(&ws, &mask), vec![0, 5]);
    }

    #[test]
    fn ellipsis_counts_once_as_sentence() {
        let ws = words(&["Well...", "maybe"]);
        let mask = vec![false; ws.len()];
        assert_eq!(sentence_breaks(&ws, &mask), vec![0]);
        assert!(middle_breaks(&ws, &mask).is_empty());
    }

    #[test]
    fn shielded_positions_are_skipped() {
        let ws = words(&["1.", "Buy", "milk,", "eggs.", "Done."]);
        let mask = vec![true, true, true, false, false];
        assert_eq!(sentence_breaks(&ws, &mask), vec![3, 4]);
        assert!(middle_breaks(&ws, &mask).is_empty());
    }
}
