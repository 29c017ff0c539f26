//! Progress-callback trait for per-chunk batch pagination events.
//!
//! Inject an [`Arc<dyn PaginationProgressCallback>`] via
//! [`crate::config::PaginationConfigBuilder::progress_callback`] to receive
//! events as [`crate::stream::paginate_chunks`] works through a batch.
//!
//! A single [`crate::paginate`] call never fires these events; it is a pure
//! function and has nothing to report until it returns.
//!
//! # Example
//!
//! ```rust
//! use readalong_pager::{PaginationConfig, PaginationProgressCallback};
//! use std::sync::{Arc, atomic::{AtomicUsize, Ordering}};
//!
//! struct CountingCallback {
//!     pages: Arc<AtomicUsize>,
//! }
//!
//! impl PaginationProgressCallback for CountingCallback {
//!     fn on_chunk_complete(&self, chunk: usize, total_chunks: usize, page_count: usize) {
//!         self.pages.fetch_add(page_count, Ordering::SeqCst);
//!         eprintln!("Chunk {}/{} -> {} pages", chunk + 1, total_chunks, page_count);
//!     }
//! }
//!
//! let counter = Arc::new(CountingCallback {
//!     pages: Arc::new(AtomicUsize::new(0)),
//! });
//!
//! let config = PaginationConfig::builder()
//!     .progress_callback(counter as Arc<dyn PaginationProgressCallback>)
//!     .build()
//!     .unwrap();
//! ```

use std::sync::Arc;

/// Called by the batch helpers as each chunk is paginated.
///
/// Implementations must be `Send + Sync`: chunks run concurrently on the
/// tokio blocking pool, so `on_chunk_start`, `on_chunk_complete` and
/// `on_chunk_error` may be called from different threads at once. All
/// methods default to no-ops.
pub trait PaginationProgressCallback: Send + Sync {
    /// Called once before any chunk is paginated.
    fn on_batch_start(&self, total_chunks: usize) {
        let _ = total_chunks;
    }

    /// Called just before a chunk is handed to the engine.
    ///
    /// * `chunk` — 0-based chunk position
    fn on_chunk_start(&self, chunk: usize, total_chunks: usize) {
        let _ = (chunk, total_chunks);
    }

    /// Called when a chunk paginates successfully.
    ///
    /// * `page_count` — number of pages produced for the chunk
    fn on_chunk_complete(&self, chunk: usize, total_chunks: usize, page_count: usize) {
        let _ = (chunk, total_chunks, page_count);
    }

    /// Called when a chunk fails.
    fn on_chunk_error(&self, chunk: usize, total_chunks: usize, error: &str) {
        let _ = (chunk, total_chunks, error);
    }

    /// Called once after every chunk has been attempted.
    fn on_batch_complete(&self, total_chunks: usize, success_count: usize) {
        let _ = (total_chunks, success_count);
    }
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopProgressCallback;

impl PaginationProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::config::PaginationConfig`].
pub type ProgressCallback = Arc<dyn PaginationProgressCallback>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct TrackingCallback {
        starts: AtomicUsize,
        pages: AtomicUsize,
        errors: AtomicUsize,
        batch_total: AtomicUsize,
        batch_success: AtomicUsize,
    }

    impl PaginationProgressCallback for TrackingCallback {
        fn on_batch_start(&self, total_chunks: usize) {
            self.batch_total.store(total_chunks, Ordering::SeqCst);
        }

        fn on_chunk_start(&self, _chunk: usize, _total_chunks: usize) {
            self.starts.fetch_add(1, Ordering::SeqCst);
        }

        fn on_chunk_complete(&self, _chunk: usize, _total_chunks: usize, page_count: usize) {
            self.pages.fetch_add(page_count, Ordering::SeqCst);
        }

        fn on_chunk_error(&self, _chunk: usize, _total_chunks: usize, _error: &str) {
            self.errors.fetch_add(1, Ordering::SeqCst);
        }

        fn on_batch_complete(&self, _total_chunks: usize, success_count: usize) {
            self.batch_success.store(success_count, Ordering::SeqCst);
        }
    }

    #[test]
    fn noop_callback_does_not_panic() {
        let cb = NoopProgressCallback;
        cb.on_batch_start(2);
        cb.on_chunk_start(0, 2);
        cb.on_chunk_complete(0, 2, 5);
        cb.on_chunk_error(1, 2, "no breaks");
        cb.on_batch_complete(2, 1);
    }

    #[test]
    fn tracking_callback_receives_events() {
        let tracker = TrackingCallback::default();

        tracker.on_batch_start(3);
        tracker.on_chunk_start(0, 3);
        tracker.on_chunk_complete(0, 3, 4);
        tracker.on_chunk_start(1, 3);
        tracker.on_chunk_complete(1, 3, 2);
        tracker.on_chunk_start(2, 3);
        tracker.on_chunk_error(2, 3, "empty");
        tracker.on_batch_complete(3, 2);

        assert_eq!(tracker.batch_total.load(Ordering::SeqCst), 3);
        assert_eq!(tracker.starts.load(Ordering::SeqCst), 3);
        assert_eq!(tracker.pages.load(Ordering::SeqCst), 6);
        assert_eq!(tracker.errors.load(Ordering::SeqCst), 1);
        assert_eq!(tracker.batch_success.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn arc_dyn_callback_works() {
        let cb: ProgressCallback = Arc::new(NoopProgressCallback);
        cb.on_batch_start(1);
        cb.on_chunk_complete(0, 1, 3);
    }
}
