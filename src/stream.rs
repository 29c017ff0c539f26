//! Batch pagination: many independent chunks, paginated concurrently.
//!
//! The synthesis layer splits long texts into chunks and aligns each one
//! separately, so a single document arrives as several word lists. Each
//! chunk is an independent [`crate::paginate`] call; this module fans them
//! out over the tokio blocking pool, at most `config.concurrency` at a time.
//!
//! [`paginate_stream`] yields chunks in completion order as they finish;
//! [`paginate_chunks`] waits for all of them and returns a sorted
//! [`BatchOutput`].

use crate::config::PaginationConfig;
use crate::error::{ChunkError, PaginationError};
use crate::input::PaginationRequest;
use crate::output::{BatchOutput, BatchStats, ChunkPagination};
use crate::paginate::paginate_request;
use futures::stream::{self, StreamExt};
use std::pin::Pin;
use std::sync::Arc;
use std::time::Instant;
use tokio_stream::Stream;
use tracing::{debug, info, warn};

/// A boxed stream of per-chunk pagination results.
pub type ChunkStream = Pin<Box<dyn Stream<Item = Result<ChunkPagination, ChunkError>> + Send>>;

/// Paginate chunks concurrently, yielding each as it completes.
///
/// Items arrive in completion order; sort by `chunk_index` if order
/// matters. Each chunk's own thresholds and source text are honoured.
/// The stream must be polled inside a tokio runtime.
///
/// # Example
/// ```rust
/// use futures::StreamExt;
/// use readalong_pager::{paginate_stream, PaginationConfig, WordTimestamp};
///
/// # #[tokio::main]
/// # async fn main() {
/// let chunk = vec![
///     WordTimestamp::new("Hello.", 0.0, 0.4, 0),
///     WordTimestamp::new("Goodbye.", 0.6, 1.0, 1),
/// ];
/// let mut stream = paginate_stream(vec![chunk.clone(), chunk], &PaginationConfig::default());
/// while let Some(item) = stream.next().await {
///     match item {
///         Ok(c) => println!("chunk {}: {} pages", c.chunk_index, c.result.pages.len()),
///         Err(e) => eprintln!("{e}"),
///     }
/// }
/// # }
/// ```
pub fn paginate_stream<I>(chunks: I, config: &PaginationConfig) -> ChunkStream
where
    I: IntoIterator,
    I::Item: Into<PaginationRequest>,
{
    let requests: Vec<PaginationRequest> = chunks.into_iter().map(Into::into).collect();
    let total = requests.len();
    let concurrency = config.concurrency.max(1);
    let config = Arc::new(config.clone());

    let s = stream::iter(requests.into_iter().enumerate().map(move |(chunk, request)| {
        let cfg = Arc::clone(&config);
        async move { paginate_chunk(chunk, total, request, cfg).await }
    }))
    .buffer_unordered(concurrency);

    Box::pin(s)
}

/// Paginate every chunk and collect the results.
///
/// # Returns
/// `Ok(BatchOutput)` even if some chunks failed (check
/// `output.failures`). Successful chunks are sorted by `chunk_index`.
///
/// # Errors
/// [`PaginationError::AllChunksFailed`] when every chunk of a non-empty
/// batch failed.
pub async fn paginate_chunks<I>(
    chunks: I,
    config: &PaginationConfig,
) -> Result<BatchOutput, PaginationError>
where
    I: IntoIterator,
    I::Item: Into<PaginationRequest>,
{
    let started = Instant::now();
    let requests: Vec<PaginationRequest> = chunks.into_iter().map(Into::into).collect();
    let total = requests.len();
    info!(
        "Paginating {} chunks (concurrency {})",
        total, config.concurrency
    );

    if let Some(ref cb) = config.progress_callback {
        cb.on_batch_start(total);
    }

    let outcomes: Vec<Result<ChunkPagination, ChunkError>> =
        paginate_stream(requests, config).collect().await;

    let mut paginated = Vec::with_capacity(total);
    let mut failures = Vec::new();
    for outcome in outcomes {
        match outcome {
            Ok(chunk) => paginated.push(chunk),
            Err(e) => failures.push(e),
        }
    }
    paginated.sort_by_key(|c| c.chunk_index);
    failures.sort_by_key(ChunkError::chunk);

    if let Some(ref cb) = config.progress_callback {
        cb.on_batch_complete(total, paginated.len());
    }

    if total > 0 && paginated.is_empty() {
        let first_error = failures
            .first()
            .map(|e| e.to_string())
            .unwrap_or_else(|| "Unknown error".to_string());
        return Err(PaginationError::AllChunksFailed { total, first_error });
    }

    let stats = BatchStats {
        total_chunks: total,
        paginated_chunks: paginated.len(),
        failed_chunks: failures.len(),
        total_pages: paginated.iter().map(|c| c.result.pages.len()).sum(),
        total_duration_ms: started.elapsed().as_millis() as u64,
    };
    info!(
        "Batch complete: {}/{} chunks, {} pages, {}ms",
        stats.paginated_chunks, stats.total_chunks, stats.total_pages, stats.total_duration_ms
    );

    Ok(BatchOutput {
        chunks: paginated,
        failures,
        stats,
    })
}

/// Synchronous wrapper around [`paginate_chunks`].
///
/// Creates a temporary tokio runtime internally; do not call from inside
/// an async context.
pub fn paginate_chunks_sync<I>(
    chunks: I,
    config: &PaginationConfig,
) -> Result<BatchOutput, PaginationError>
where
    I: IntoIterator,
    I::Item: Into<PaginationRequest>,
{
    tokio::runtime::Runtime::new()
        .map_err(|e| PaginationError::Internal(format!("Failed to create tokio runtime: {}", e)))?
        .block_on(paginate_chunks(chunks, config))
}

/// Run one chunk on the blocking pool and report progress.
async fn paginate_chunk(
    chunk: usize,
    total: usize,
    request: PaginationRequest,
    config: Arc<PaginationConfig>,
) -> Result<ChunkPagination, ChunkError> {
    if let Some(ref cb) = config.progress_callback {
        cb.on_chunk_start(chunk, total);
    }
    debug!("Chunk {}: {} words", chunk, request.words.len());

    let worker_config = Arc::clone(&config);
    let outcome =
        tokio::task::spawn_blocking(move || paginate_request(&request, &worker_config)).await;

    let result = match outcome {
        Ok(Ok(result)) => Ok(ChunkPagination {
            chunk_index: chunk,
            result,
        }),
        Ok(Err(e)) => Err(ChunkError::from_pagination(chunk, &e)),
        Err(e) => Err(ChunkError::Failed {
            chunk,
            detail: format!("worker task failed: {e}"),
        }),
    };

    match &result {
        Ok(c) => {
            if let Some(ref cb) = config.progress_callback {
                cb.on_chunk_complete(chunk, total, c.result.pages.len());
            }
        }
        Err(e) => {
            warn!("{}", e);
            if let Some(ref cb) = config.progress_callback {
                cb.on_chunk_error(chunk, total, &e.to_string());
            }
        }
    }
    result
}
