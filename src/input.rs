//! Input model and loading: word timestamps produced by speech alignment.
//!
//! The synthesis/alignment layer hands the pager an ordered array of
//! `{word, start, end, index}` objects, optionally wrapped together with a
//! thresholds object and the original source text:
//!
//! ```json
//! [{"word": "Hello.", "start": 0.0, "end": 0.42, "index": 0}]
//! ```
//!
//! ```json
//! {"words": [...], "thresholds": {"breakPauseSecond": 80}, "text": "Hello."}
//! ```
//!
//! We validate shape here so callers get a path-qualified error instead of a
//! bare serde message.

use crate::config::PaginationThresholds;
use crate::error::PaginationError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// One synthesized word with its audio timing.
///
/// `index` is whatever the producer assigned (0- or 1-based); the pager
/// never interprets it. All engine positions are 0-based offsets into the
/// slice passed to [`crate::paginate`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WordTimestamp {
    pub word: String,
    /// Seconds from the start of the chunk's audio.
    pub start: f64,
    /// Seconds from the start of the chunk's audio.
    pub end: f64,
    #[serde(default)]
    pub index: i64,
}

impl WordTimestamp {
    pub fn new(word: impl Into<String>, start: f64, end: f64, index: i64) -> Self {
        Self {
            word: word.into(),
            start,
            end,
            index,
        }
    }
}

/// A complete pagination request as read from JSON.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PaginationRequest {
    pub words: Vec<WordTimestamp>,
    #[serde(default)]
    pub thresholds: PaginationThresholds,
    /// Original source text, when the producer kept it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl From<Vec<WordTimestamp>> for PaginationRequest {
    fn from(words: Vec<WordTimestamp>) -> Self {
        Self {
            words,
            ..Default::default()
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RequestDocument {
    Bare(Vec<WordTimestamp>),
    Wrapped(PaginationRequest),
}

/// Parse an in-memory JSON document. `origin` labels errors (a path or `-`).
pub fn parse_request(raw: &str, origin: &Path) -> Result<PaginationRequest, PaginationError> {
    let doc: RequestDocument =
        serde_json::from_str(raw).map_err(|e| PaginationError::InvalidInput {
            path: origin.to_path_buf(),
            detail: format!(
                "expected a word array or an object with a \"words\" array: {e}"
            ),
        })?;

    let request = match doc {
        RequestDocument::Bare(words) => PaginationRequest::from(words),
        RequestDocument::Wrapped(request) => request,
    };

    if let Some(pos) = request.words.iter().position(|w| w.end < w.start) {
        return Err(PaginationError::InvalidInput {
            path: origin.to_path_buf(),
            detail: format!(
                "word {pos} ('{}') ends before it starts",
                request.words[pos].word
            ),
        });
    }

    debug!(
        "Parsed {} words from {}",
        request.words.len(),
        origin.display()
    );
    Ok(request)
}

/// Read and parse a word timestamp file.
pub fn load_request(path: impl AsRef<Path>) -> Result<PaginationRequest, PaginationError> {
    let path = path.as_ref();
    let raw = std::fs::read_to_string(path).map_err(|e| classify_read_error(path, e))?;
    parse_request(&raw, path)
}

fn classify_read_error(path: &Path, e: std::io::Error) -> PaginationError {
    let path: PathBuf = path.to_path_buf();
    match e.kind() {
        std::io::ErrorKind::NotFound => PaginationError::InputNotFound { path },
        std::io::ErrorKind::PermissionDenied => PaginationError::PermissionDenied { path },
        _ => PaginationError::InvalidInput {
            path,
            detail: e.to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn parses_bare_array() {
        let raw = r#"[{"word": "Hi.", "start": 0.0, "end": 0.3, "index": 1}]"#;
        let req = parse_request(raw, Path::new("-")).unwrap();
        assert_eq!(req.words.len(), 1);
        assert_eq!(req.words[0].index, 1);
        assert_eq!(req.thresholds, PaginationThresholds::default());
        assert!(req.text.is_none());
    }

    #[test]
    fn parses_wrapped_object_with_thresholds() {
        let raw = r#"{
            "words": [{"word": "Hi.", "start": 0.0, "end": 0.3, "index": 0}],
            "thresholds": {"breakPauseSecond": 75, "useSecondary": true},
            "text": "Hi."
        }"#;
        let req = parse_request(raw, Path::new("req.json")).unwrap();
        assert_eq!(req.thresholds.break_pause_second, Some(75.0));
        assert_eq!(req.thresholds.use_secondary, Some(true));
        assert_eq!(req.text.as_deref(), Some("Hi."));
    }

    #[test]
    fn missing_index_defaults_to_zero() {
        let raw = r#"[{"word": "Hi.", "start": 0.0, "end": 0.3}]"#;
        let req = parse_request(raw, Path::new("-")).unwrap();
        assert_eq!(req.words[0].index, 0);
    }

    #[test]
    fn rejects_malformed_json() {
        let err = parse_request(r#"{"pages": []}"#, Path::new("bad.json")).unwrap_err();
        match err {
            PaginationError::InvalidInput { path, detail } => {
                assert_eq!(path, PathBuf::from("bad.json"));
                assert!(detail.contains("words"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn rejects_negative_duration_word() {
        let raw = r#"[{"word": "Hi.", "start": 0.5, "end": 0.3, "index": 0}]"#;
        let err = parse_request(raw, Path::new("-")).unwrap_err();
        assert!(err.to_string().contains("ends before it starts"));
    }

    #[test]
    fn missing_file_is_not_found() {
        let err = load_request("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, PaginationError::InputNotFound { .. }));
    }

    #[test]
    fn loads_from_disk() {
        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        write!(
            tmp,
            r#"[{{"word": "One.", "start": 0.0, "end": 0.2, "index": 0}}]"#
        )
        .unwrap();
        let req = load_request(tmp.path()).unwrap();
        assert_eq!(req.words[0].word, "One.");
    }
}
