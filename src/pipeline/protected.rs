//! Protected-range detection: spans that must never be split across pages.
//!
//! Two detectors, each returning its own [`Detection`]:
//!
//! * [`detect_numbered_items`] — list markers (`1.`, `#2)`, `3:`, `4 -`)
//!   plus the next few words, so a list item never starts on one page and
//!   finishes on another.
//! * [`detect_delimited`] — short quoted, parenthesised, bracketed, braced
//!   or `<< >>`-guillemet content. Spans whose enclosed text exceeds the cap
//!   are left unprotected.
//!
//! The orchestrator concatenates both range lists; overlaps are harmless
//! because suppression only asks "is this position shielded by *any* range".

use super::text::{joined_char_count, sort_unique, OffsetMap};
use crate::input::WordTimestamp;
use crate::output::{ProtectedKind, ProtectedRange};
use once_cell::sync::Lazy;
use regex::Regex;

/// Ranges found by one detector and the break emitted at each range end.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Detection {
    pub ranges: Vec<ProtectedRange>,
    /// Sorted, unique.
    pub breaks: Vec<usize>,
}

// ── Numbered items ───────────────────────────────────────────────────────────

static RE_NUMBERED_MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^#?(\d+)[.:)\]]+").unwrap());

static RE_BARE_NUMBER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^#?\d+$").unwrap());

/// Words after a marker that carries its own text (`1.Text`).
const ATTACHED_MARKER_EXTRA_WORDS: usize = 2;
/// Words after a bare marker (`1.`, `2 -`).
const BARE_MARKER_EXTRA_WORDS: usize = 3;

/// Protect each numbered list marker together with its first few words.
///
/// Ranges near the end of the input are truncated rather than dropped, and
/// the scan resumes after each range so numbered ranges never overlap.
pub fn detect_numbered_items(words: &[WordTimestamp]) -> Detection {
    let mut detection = Detection::default();
    let last = match words.len().checked_sub(1) {
        Some(last) => last,
        None => return detection,
    };

    let mut i = 0;
    while i < words.len() {
        let extra = match marker_extra_words(words, i) {
            Some(extra) => extra,
            None => {
                i += 1;
                continue;
            }
        };

        let end = (i + extra).min(last);
        detection.ranges.push(ProtectedRange {
            start: i,
            end,
            kind: ProtectedKind::NumberedItem,
            char_count: joined_char_count(&words[i..=end]),
        });
        detection.breaks.push(end);
        i = end + 1;
    }

    sort_unique(&mut detection.breaks);
    detection
}

/// How many following words a marker at `i` pulls in, or `None` if the
/// word is not a list marker.
fn marker_extra_words(words: &[WordTimestamp], i: usize) -> Option<usize> {
    let word = words[i].word.trim();
    if let Some(m) = RE_NUMBERED_MARKER.find(word) {
        return Some(if m.end() < word.len() {
            ATTACHED_MARKER_EXTRA_WORDS
        } else {
            BARE_MARKER_EXTRA_WORDS
        });
    }
    let followed_by_dash = words.get(i + 1).is_some_and(|next| next.word.trim() == "-");
    if RE_BARE_NUMBER.is_match(word) && followed_by_dash {
        return Some(BARE_MARKER_EXTRA_WORDS);
    }
    None
}

// ── Delimited content ────────────────────────────────────────────────────────

/// Delimiter kinds, scanned one at a time.
const DELIMITED_KINDS: [ProtectedKind; 5] = [
    ProtectedKind::Quotes,
    ProtectedKind::Parentheses,
    ProtectedKind::Brackets,
    ProtectedKind::Braces,
    ProtectedKind::Guillemets,
];

/// Protect short delimited spans found in `text`.
///
/// `map` must have been built from the same `text`. Each kind is scanned
/// with its own cursor, so a quote inside parentheses is reported as well
/// as the parentheses. Quotes and guillemets do not nest (the first closing
/// delimiter wins); parentheses, brackets and braces track depth so an
/// inner pair of the same kind is consumed by its outer match.
pub fn detect_delimited(text: &str, map: &OffsetMap, max_chars: usize) -> Detection {
    let mut detection = Detection::default();
    if map.is_empty() {
        return detection;
    }

    for kind in DELIMITED_KINDS {
        scan_kind(text, map, max_chars, kind, &mut detection);
    }

    detection.ranges.sort_by_key(|r| (r.start, r.end));
    sort_unique(&mut detection.breaks);
    detection
}

fn scan_kind(
    text: &str,
    map: &OffsetMap,
    max_chars: usize,
    kind: ProtectedKind,
    detection: &mut Detection,
) {
    // All delimiters are ASCII, so byte scanning never lands inside a
    // multi-byte character.
    let bytes = text.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        let Some((content_start, content_end, resume)) = match_at(bytes, i, kind) else {
            i += 1;
            continue;
        };

        let char_count = text[content_start..content_end].chars().count();
        if char_count > max_chars {
            i += 1;
            continue;
        }

        let end = map.word_at(content_end);
        detection.ranges.push(ProtectedRange {
            start: map.word_at(i),
            end,
            kind,
            char_count,
        });
        detection.breaks.push(end);
        i = resume;
    }
}

/// `(content_start, content_end, resume)` for a `kind` span opening at `i`.
fn match_at(bytes: &[u8], i: usize, kind: ProtectedKind) -> Option<(usize, usize, usize)> {
    match (kind, bytes[i]) {
        (ProtectedKind::Quotes, b'"') => {
            find_byte(bytes, i + 1, b'"').map(|close| (i + 1, close, close + 1))
        }
        (ProtectedKind::Parentheses, b'(') => {
            find_nested_close(bytes, i, b'(', b')').map(|close| (i + 1, close, close + 1))
        }
        (ProtectedKind::Brackets, b'[') => {
            find_nested_close(bytes, i, b'[', b']').map(|close| (i + 1, close, close + 1))
        }
        (ProtectedKind::Braces, b'{') => {
            find_nested_close(bytes, i, b'{', b'}').map(|close| (i + 1, close, close + 1))
        }
        (ProtectedKind::Guillemets, b'<') if bytes.get(i + 1) == Some(&b'<') => {
            find_pair(bytes, i + 2, b'>').map(|close| (i + 2, close, close + 2))
        }
        _ => None,
    }
}

fn find_byte(bytes: &[u8], from: usize, needle: u8) -> Option<usize> {
    bytes
        .get(from..)?
        .iter()
        .position(|&b| b == needle)
        .map(|rel| from + rel)
}

/// Position of the first doubled `needle` at or after `from`.
fn find_pair(bytes: &[u8], from: usize, needle: u8) -> Option<usize> {
    bytes
        .get(from..)?
        .windows(2)
        .position(|w| w[0] == needle && w[1] == needle)
        .map(|rel| from + rel)
}

/// Position of the delimiter closing the opener at `open`.
fn find_nested_close(bytes: &[u8], open: usize, opener: u8, closer: u8) -> Option<usize> {
    let mut depth = 0usize;
    for (pos, &b) in bytes.iter().enumerate().skip(open) {
        if b == opener {
            depth += 1;
        } else if b == closer {
            depth -= 1;
            if depth == 0 {
                return Some(pos);
            }
        }
    }
    None
}

// ── Suppression ──────────────────────────────────────────────────────────────

/// `mask[p]` is true when a page boundary after word `p` would split a range.
pub fn shield_mask(ranges: &[ProtectedRange], word_count: usize) -> Vec<bool> {
    let mut mask = vec![false; word_count];
    for r in ranges {
        for slot in mask
            .iter_mut()
            .take(r.end.min(word_count))
            .skip(r.start)
        {
            *slot = true;
        }
    }
    mask
}
