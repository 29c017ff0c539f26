//! CLI binary for readalong-pager.
//!
//! A thin shim over the library crate that maps CLI flags to
//! `PaginationConfig`, reads word timestamp JSON and prints the pagination.

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use readalong_pager::{
    load_request, paginate_chunks, paginate_request, parse_request, write_json, write_result,
    PageBreaksResult, PaginationConfig, PaginationProgressCallback, PaginationRequest,
    ProgressCallback,
};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers ──────────────────────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}
fn cyan(s: &str) -> String {
    format!("\x1b[36m{s}\x1b[0m")
}

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Progress bar over the input files of a batch. Chunks complete out of
/// order, so each line names its file.
struct CliProgressCallback {
    bar: ProgressBar,
    labels: Vec<String>,
    errors: AtomicUsize,
}

impl CliProgressCallback {
    fn new(labels: Vec<String>) -> Arc<Self> {
        let style = ProgressStyle::with_template(
            "{spinner:.cyan} {prefix:.bold}  \
             [{bar:42.green/238}] {pos:>3}/{len} files  ⏱ {elapsed_precise}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏  ")
        .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]);

        let bar = ProgressBar::new(labels.len() as u64);
        bar.set_style(style);
        bar.set_prefix("Paginating");
        bar.enable_steady_tick(Duration::from_millis(80));

        Arc::new(Self {
            bar,
            labels,
            errors: AtomicUsize::new(0),
        })
    }

    fn label(&self, chunk: usize) -> &str {
        self.labels.get(chunk).map_or("?", String::as_str)
    }
}

impl PaginationProgressCallback for CliProgressCallback {
    fn on_batch_start(&self, total_chunks: usize) {
        self.bar.set_length(total_chunks as u64);
        self.bar.println(format!(
            "{} {}",
            cyan("◆"),
            bold(&format!("Paginating {total_chunks} files…"))
        ));
    }

    fn on_chunk_complete(&self, chunk: usize, total_chunks: usize, page_count: usize) {
        self.bar.println(format!(
            "  {} {:>3}/{:<3}  {}  {}",
            green("✓"),
            chunk + 1,
            total_chunks,
            self.label(chunk),
            dim(&format!("{page_count} pages")),
        ));
        self.bar.inc(1);
    }

    fn on_chunk_error(&self, chunk: usize, total_chunks: usize, error: &str) {
        self.errors.fetch_add(1, Ordering::SeqCst);
        let msg: String = if error.chars().count() > 80 {
            format!("{}\u{2026}", error.chars().take(79).collect::<String>())
        } else {
            error.to_string()
        };
        self.bar.println(format!(
            "  {} {:>3}/{:<3}  {}  {}",
            red("✗"),
            chunk + 1,
            total_chunks,
            self.label(chunk),
            red(&msg),
        ));
        self.bar.inc(1);
    }

    fn on_batch_complete(&self, total_chunks: usize, success_count: usize) {
        let failed = total_chunks.saturating_sub(success_count);
        self.bar.finish_and_clear();
        if failed == 0 {
            eprintln!(
                "{} {} files paginated successfully",
                green("✔"),
                bold(&success_count.to_string())
            );
        } else {
            eprintln!(
                "{} {}/{} files paginated  ({} failed)",
                if failed == total_chunks {
                    red("✘")
                } else {
                    cyan("⚠")
                },
                bold(&success_count.to_string()),
                total_chunks,
                red(&failed.to_string()),
            );
        }
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Paginate one chunk (JSON to stdout)
  readalong-pager words.json

  # Read from stdin, write to a file
  cat words.json | readalong-pager - -o pages.json

  # Human-readable page listing
  readalong-pager --summary words.json

  # Wider screens, more patient page turns
  readalong-pager --max-page-chars 96 --breathing-gap-ms 90 words.json

  # Several chunks at once (prints a batch document)
  readalong-pager chunk-*.json -o book-pages.json

INPUT FORMAT:
  Either a bare array of words:
    [{"word": "Hello.", "start": 0.0, "end": 0.42, "index": 0}, ...]
  or an object carrying thresholds and the source text:
    {"words": [...], "thresholds": {"breakPauseSecond": 80}, "text": "..."}

ENVIRONMENT VARIABLES:
  RUST_LOG                      Override the log filter (e.g. readalong_pager=trace)
  READALONG_MAX_PAGE_CHARS      Long-page threshold
  READALONG_BREATHING_GAP_MS    Breathing-gap threshold
"#;

/// Split TTS word timestamps into read-along pages.
#[derive(Parser, Debug)]
#[command(
    name = "readalong-pager",
    version,
    about = "Split TTS word timestamps into read-along pages",
    long_about = "Split time-aligned words from speech synthesis into screen-sized pages. \
Pages break at sentence ends and clause punctuation, never inside short quotes, brackets or \
numbered items; long pages are split before conjunctions or at the narrator's pauses.",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Word timestamp JSON files (`-` reads stdin).
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Write JSON to this file instead of stdout.
    #[arg(short, long, env = "READALONG_OUTPUT")]
    output: Option<PathBuf>,

    /// Pages longer than this many characters are split further.
    #[arg(long, env = "READALONG_MAX_PAGE_CHARS", default_value_t = 64,
          value_parser = clap::value_parser!(u64).range(1..))]
    max_page_chars: u64,

    /// Minimum pause (ms) between two words that counts as a breathing gap.
    #[arg(long, env = "READALONG_BREATHING_GAP_MS", default_value_t = 60.0)]
    breathing_gap_ms: f64,

    /// Longest quoted/bracketed content (characters) kept on one page.
    #[arg(long, env = "READALONG_PROTECTED_MAX_CHARS", default_value_t = 64,
          value_parser = clap::value_parser!(u64).range(1..))]
    protected_max_chars: u64,

    /// Minimum silence (seconds) between pages that produces transition info.
    #[arg(long, env = "READALONG_TRANSITION_MIN_GAP", default_value_t = 0.01)]
    transition_min_gap: f64,

    /// Skip the conjunction and breathing-gap splitting of long pages.
    #[arg(long, env = "READALONG_NO_SPLIT")]
    no_split: bool,

    /// Number of files paginated at once.
    #[arg(short, long, env = "READALONG_CONCURRENCY", default_value_t = 4)]
    concurrency: usize,

    /// Print a page listing to stderr.
    #[arg(long)]
    summary: bool,

    /// Emit compact JSON instead of pretty-printed.
    #[arg(long)]
    compact: bool,

    /// Disable progress bar.
    #[arg(long, env = "READALONG_NO_PROGRESS")]
    no_progress: bool,

    /// Per-break trace logs and result verification.
    #[arg(long, env = "READALONG_DEBUG")]
    debug: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "READALONG_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "READALONG_QUIET")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    let batch = cli.inputs.len() > 1;
    let show_progress = batch && !cli.quiet && !cli.no_progress;
    let filter = if cli.verbose || cli.debug {
        "debug"
    } else if cli.quiet || show_progress {
        "error"
    } else {
        "warn"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    // ── Load inputs ──────────────────────────────────────────────────────
    let requests = cli
        .inputs
        .iter()
        .map(|path| read_input(path))
        .collect::<Result<Vec<_>>>()?;

    let progress_cb: Option<ProgressCallback> = if show_progress {
        let labels = cli.inputs.iter().map(|p| p.display().to_string()).collect();
        Some(CliProgressCallback::new(labels) as Arc<dyn PaginationProgressCallback>)
    } else {
        None
    };
    let config = build_config(&cli, progress_cb)?;

    // ── Single chunk ─────────────────────────────────────────────────────
    if !batch {
        let request = &requests[0];
        let result = paginate_request(request, &config)
            .with_context(|| format!("Failed to paginate {}", cli.inputs[0].display()))?;

        if cli.summary && !cli.quiet {
            print_summary(&result);
        }
        match cli.output {
            Some(ref path) if !cli.compact => {
                write_result(&result, path).context("Failed to write output")?;
                if !cli.quiet {
                    eprintln!(
                        "{}  {} words  →  {} pages  →  {}",
                        green("✔"),
                        result.summary.total_words,
                        result.summary.total_pages,
                        bold(&path.display().to_string()),
                    );
                }
            }
            _ => emit_json(&result, cli.output.as_deref(), cli.compact)?,
        }
        return Ok(());
    }

    // ── Batch ────────────────────────────────────────────────────────────
    let output = paginate_chunks(requests, &config)
        .await
        .context("Pagination failed")?;

    if cli.summary && !cli.quiet {
        for chunk in &output.chunks {
            eprintln!(
                "{}",
                bold(&cli.inputs[chunk.chunk_index].display().to_string())
            );
            print_summary(&chunk.result);
        }
    }
    emit_json(&output, cli.output.as_deref(), cli.compact)?;

    if !cli.quiet && !show_progress {
        eprintln!(
            "Paginated {}/{} files into {} pages in {}ms",
            output.stats.paginated_chunks,
            output.stats.total_chunks,
            output.stats.total_pages,
            output.stats.total_duration_ms
        );
    }
    Ok(())
}

/// Read one input file, or stdin for `-`.
fn read_input(path: &Path) -> Result<PaginationRequest> {
    if path.as_os_str() == "-" {
        let mut raw = String::new();
        io::stdin()
            .read_to_string(&mut raw)
            .context("Failed to read stdin")?;
        return parse_request(&raw, path).context("Invalid input on stdin");
    }
    load_request(path).with_context(|| format!("Failed to load {}", path.display()))
}

/// Map CLI args to `PaginationConfig`.
fn build_config(cli: &Cli, progress: Option<ProgressCallback>) -> Result<PaginationConfig> {
    let mut builder = PaginationConfig::builder()
        .max_page_chars(cli.max_page_chars as usize)
        .breathing_gap_ms(cli.breathing_gap_ms)
        .protected_max_chars(cli.protected_max_chars as usize)
        .transition_min_gap_secs(cli.transition_min_gap)
        .split_long_pages(!cli.no_split)
        .debug(cli.debug)
        .concurrency(cli.concurrency);

    if let Some(cb) = progress {
        builder = builder.progress_callback(cb);
    }

    builder.build().context("Invalid configuration")
}

/// Serialise `value` to `path` (atomically) or stdout.
fn emit_json<T: serde::Serialize>(value: &T, path: Option<&Path>, compact: bool) -> Result<()> {
    if let Some(path) = path {
        return write_json(value, path, compact)
            .with_context(|| format!("Failed to write {}", path.display()));
    }

    let json = if compact {
        serde_json::to_string(value)
    } else {
        serde_json::to_string_pretty(value)
    }
    .context("Failed to serialise output")?;

    let stdout = io::stdout();
    let mut handle = stdout.lock();
    writeln!(handle, "{json}").context("Failed to write to stdout")
}

/// One line per page on stderr.
fn print_summary(result: &PageBreaksResult) {
    let s = &result.summary;
    eprintln!(
        "{} words  →  {} pages  (avg {:.2} words/page, {} oversized)",
        s.total_words, s.total_pages, s.average_page_size, s.oversized_pages
    );
    for page in &result.pages {
        let turn = page
            .transition_info
            .map(|t| format!("  turn @{:.3}s", t.gap_midpoint_time))
            .unwrap_or_default();
        eprintln!(
            "  [{:>3}] {}  {}  {}{}",
            page.page_index,
            dim(&format!("{:>7.2}–{:<7.2}", page.start_time, page.end_time)),
            dim(&format!("{:>3} chars", page.character_count)),
            page.text(),
            dim(&turn),
        );
    }
}
