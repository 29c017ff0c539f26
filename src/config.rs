//! Configuration types for word-timestamp pagination.
//!
//! All pagination behaviour is controlled through [`PaginationConfig`], built
//! via its [`PaginationConfigBuilder`]. Every knob lives in one struct so a
//! config can be shared across batch workers and logged whole.
//!
//! The external "thresholds" object sent alongside word timestamps is modelled
//! separately as [`PaginationThresholds`] and folded into the builder with
//! [`PaginationConfigBuilder::thresholds`].

use crate::error::PaginationError;
use crate::progress::ProgressCallback;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Default long-page threshold, in characters.
pub const DEFAULT_MAX_PAGE_CHARS: usize = 64;
/// Default breathing-gap threshold, in milliseconds.
pub const DEFAULT_BREATHING_GAP_MS: f64 = 60.0;
/// Default cap on delimited protected content, in characters.
pub const DEFAULT_PROTECTED_MAX_CHARS: usize = 64;
/// Default minimum silent gap before a page gets transition info, in seconds.
pub const DEFAULT_TRANSITION_MIN_GAP_SECS: f64 = 0.01;

/// Configuration for a pagination call.
///
/// Built via [`PaginationConfig::builder()`] or using
/// [`PaginationConfig::default()`].
///
/// # Example
/// ```rust
/// use readalong_pager::PaginationConfig;
///
/// let config = PaginationConfig::builder()
///     .max_page_chars(80)
///     .breathing_gap_ms(75.0)
///     .build()
///     .unwrap();
/// assert_eq!(config.max_page_chars, 80);
/// ```
#[derive(Clone)]
pub struct PaginationConfig {
    /// Pages whose `characterCount` exceeds this are handed to the long-page
    /// splitter. Default: 64.
    pub max_page_chars: usize,

    /// Minimum pause between two consecutive words, in milliseconds, that
    /// counts as a breathing gap. Default: 60.
    ///
    /// Only consulted for pages still over `max_page_chars` after the
    /// conjunction pass.
    pub breathing_gap_ms: f64,

    /// Maximum enclosed length for quoted/bracketed content to be protected.
    /// Default: 64. Longer spans are not protected at all.
    pub protected_max_chars: usize,

    /// Gaps between pages must exceed this (seconds) to produce
    /// `transitionInfo`. Default: 0.01.
    pub transition_min_gap_secs: f64,

    /// Run the conjunction and breathing-gap passes. Default: true.
    pub split_long_pages: bool,

    /// Emit per-break trace logs and verify the result before returning.
    /// Default: false.
    pub debug: bool,

    /// Number of chunks paginated at once by the batch helpers. Default: 4.
    pub concurrency: usize,

    /// Optional progress callback for batch pagination.
    pub progress_callback: Option<ProgressCallback>,

    /// Thresholds received from the caller, kept verbatim.
    pub thresholds: PaginationThresholds,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            max_page_chars: DEFAULT_MAX_PAGE_CHARS,
            breathing_gap_ms: DEFAULT_BREATHING_GAP_MS,
            protected_max_chars: DEFAULT_PROTECTED_MAX_CHARS,
            transition_min_gap_secs: DEFAULT_TRANSITION_MIN_GAP_SECS,
            split_long_pages: true,
            debug: false,
            concurrency: 4,
            progress_callback: None,
            thresholds: PaginationThresholds::default(),
        }
    }
}

impl fmt::Debug for PaginationConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PaginationConfig")
            .field("max_page_chars", &self.max_page_chars)
            .field("breathing_gap_ms", &self.breathing_gap_ms)
            .field("protected_max_chars", &self.protected_max_chars)
            .field("transition_min_gap_secs", &self.transition_min_gap_secs)
            .field("split_long_pages", &self.split_long_pages)
            .field("debug", &self.debug)
            .field("concurrency", &self.concurrency)
            .field(
                "progress_callback",
                &self
                    .progress_callback
                    .as_ref()
                    .map(|_| "<dyn PaginationProgressCallback>"),
            )
            .field("thresholds", &self.thresholds)
            .finish()
    }
}

impl PaginationConfig {
    /// Create a new builder for `PaginationConfig`.
    pub fn builder() -> PaginationConfigBuilder {
        PaginationConfigBuilder {
            config: Self::default(),
        }
    }

    /// A copy of this config with a request's thresholds folded in.
    pub fn with_thresholds(
        &self,
        thresholds: &PaginationThresholds,
    ) -> Result<Self, PaginationError> {
        PaginationConfigBuilder {
            config: self.clone(),
        }
        .thresholds(thresholds)
        .build()
    }
}

/// Builder for [`PaginationConfig`].
#[derive(Debug)]
pub struct PaginationConfigBuilder {
    config: PaginationConfig,
}

impl PaginationConfigBuilder {
    pub fn max_page_chars(mut self, chars: usize) -> Self {
        self.config.max_page_chars = chars;
        self
    }

    pub fn breathing_gap_ms(mut self, ms: f64) -> Self {
        self.config.breathing_gap_ms = ms;
        self
    }

    pub fn protected_max_chars(mut self, chars: usize) -> Self {
        self.config.protected_max_chars = chars;
        self
    }

    pub fn transition_min_gap_secs(mut self, secs: f64) -> Self {
        self.config.transition_min_gap_secs = secs;
        self
    }

    pub fn split_long_pages(mut self, v: bool) -> Self {
        self.config.split_long_pages = v;
        self
    }

    pub fn debug(mut self, v: bool) -> Self {
        self.config.debug = v;
        self
    }

    pub fn concurrency(mut self, n: usize) -> Self {
        self.config.concurrency = n.max(1);
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Fold a caller-supplied thresholds object into the config.
    ///
    /// `breakPauseSecond` overrides the breathing-gap threshold; the other
    /// fields are stored but not consulted.
    pub fn thresholds(mut self, thresholds: &PaginationThresholds) -> Self {
        if let Some(ms) = thresholds.break_pause_second {
            self.config.breathing_gap_ms = ms;
        }
        self.config.thresholds = thresholds.clone();
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<PaginationConfig, PaginationError> {
        let c = &self.config;
        if c.max_page_chars == 0 {
            return Err(PaginationError::InvalidConfig(
                "max_page_chars must be ≥ 1".into(),
            ));
        }
        if !c.breathing_gap_ms.is_finite() || c.breathing_gap_ms < 0.0 {
            return Err(PaginationError::InvalidConfig(format!(
                "breathing_gap_ms must be a non-negative number, got {}",
                c.breathing_gap_ms
            )));
        }
        if c.protected_max_chars == 0 {
            return Err(PaginationError::InvalidConfig(
                "protected_max_chars must be ≥ 1".into(),
            ));
        }
        if !c.transition_min_gap_secs.is_finite() || c.transition_min_gap_secs < 0.0 {
            return Err(PaginationError::InvalidConfig(format!(
                "transition_min_gap_secs must be a non-negative number, got {}",
                c.transition_min_gap_secs
            )));
        }
        if c.concurrency == 0 {
            return Err(PaginationError::InvalidConfig(
                "Concurrency must be ≥ 1".into(),
            ));
        }
        Ok(self.config)
    }
}

// ── External thresholds ───────────────────────────────────────────────────

/// Thresholds object accepted alongside word timestamps.
///
/// | Field | Consumed | Meaning |
/// |-------|----------|---------|
/// | `breakPauseFirst`  | no  | reserved pause threshold (ms) |
/// | `breakPauseSecond` | yes | breathing-gap threshold (ms) |
/// | `usePrimary`       | no  | reserved |
/// | `useSecondary`     | no  | reserved |
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationThresholds {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub break_pause_first: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub break_pause_second: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub use_primary: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub use_secondary: Option<bool>,
}
