//! CLI binary for edgequake-pdf2sum.
//!
//! A thin shim over the library crate that maps CLI flags
//! to `SummaryConfig` and prints results.

use anyhow::{Context, Result};
use clap::Parser;
use edgequake_pdf2sum::{
    convert, inspect, ChunkStrategy, LlmSummarizer, OverflowPolicy, ProgressCallback,
    SummaryConfig, SummaryProgressCallback,
};
use indicatif::{ProgressBar, ProgressStyle};
use std::collections::HashMap;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
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

const TICKS: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"];

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Terminal progress callback: a live bar plus one log line per chunk.
/// Chunks may finish out of order when `--concurrency > 1`.
struct CliProgressCallback {
    bar: ProgressBar,
    start_times: Mutex<HashMap<usize, Instant>>,
    errors: AtomicUsize,
}

impl CliProgressCallback {
    /// Spinner until `on_summary_start` tells us the chunk count.
    fn new_dynamic() -> Arc<Self> {
        let bar = ProgressBar::new(0);
        let spinner_style = ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(TICKS);

        bar.set_style(spinner_style);
        bar.set_prefix("Preparing");
        bar.set_message("Reading PDF…");
        bar.enable_steady_tick(Duration::from_millis(80));

        Arc::new(Self {
            bar,
            start_times: Mutex::new(HashMap::new()),
            errors: AtomicUsize::new(0),
        })
    }

    fn activate_bar(&self, total: usize) {
        let progress_style = ProgressStyle::with_template(
            "{spinner:.cyan} {prefix:.bold}  \
             [{bar:42.green/238}] {pos:>3}/{len} chunks  \
             ⏱ {elapsed_precise}  ETA {eta_precise}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏  ")
        .tick_strings(TICKS);

        self.bar.set_length(total as u64);
        self.bar.set_style(progress_style);
        self.bar.set_prefix("Summarising");
        self.bar.reset_eta();
    }

    fn elapsed_secs(&self, chunk_num: usize) -> f64 {
        self.start_times
            .lock()
            .ok()
            .and_then(|mut m| m.remove(&chunk_num))
            .map(|t| t.elapsed().as_secs_f64())
            .unwrap_or(0.0)
    }
}

impl SummaryProgressCallback for CliProgressCallback {
    fn on_summary_start(&self, total_chunks: usize) {
        self.activate_bar(total_chunks);
        self.bar.println(format!(
            "{} {}",
            cyan("◆"),
            bold(&format!("Summarising {total_chunks} chunk(s)…"))
        ));
    }

    fn on_chunk_start(&self, chunk_num: usize, _total: usize) {
        if let Ok(mut m) = self.start_times.lock() {
            m.insert(chunk_num, Instant::now());
        }
        self.bar.set_message(format!("chunk {chunk_num}"));
    }

    fn on_chunk_complete(&self, chunk_num: usize, total: usize, summary_len: usize) {
        let secs = self.elapsed_secs(chunk_num);
        self.bar.println(format!(
            "  {} Chunk {:>3}/{:<3}  {:<8}  {}",
            green("✓"),
            chunk_num,
            total,
            dim(&format!("{summary_len:>5} chars")),
            dim(&format!("{secs:.1}s")),
        ));
        self.bar.inc(1);
    }

    fn on_chunk_error(&self, chunk_num: usize, total: usize, error: &str) {
        let secs = self.elapsed_secs(chunk_num);
        self.errors.fetch_add(1, Ordering::SeqCst);

        let msg: String = if error.chars().count() > 80 {
            format!("{}\u{2026}", error.chars().take(79).collect::<String>())
        } else {
            error.to_string()
        };

        self.bar.println(format!(
            "  {} Chunk {:>3}/{:<3}  {}  {}",
            red("✗"),
            chunk_num,
            total,
            red(&msg),
            dim(&format!("{secs:.1}s")),
        ));
        self.bar.inc(1);
    }

    fn on_summary_complete(&self, total_chunks: usize, success_count: usize) {
        self.bar.finish_and_clear();
        if success_count == total_chunks && self.errors.load(Ordering::SeqCst) == 0 {
            eprintln!(
                "{} {} chunk(s) summarised",
                green("✔"),
                bold(&success_count.to_string())
            );
        } else {
            eprintln!(
                "{} summary aborted after {}/{} chunk(s)",
                red("✘"),
                bold(&success_count.to_string()),
                total_chunks,
            );
        }
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Summarise to report.summary.pdf next to the input
  pdf2sum report.pdf

  # Choose the output path
  pdf2sum report.pdf -o /tmp/summary.pdf

  # Shorter summaries, sentence-aware chunking
  pdf2sum --max-length 300 --min-length 50 --strategy boundary report.pdf

  # Use a specific model
  pdf2sum --model gpt-4.1-mini --provider openai report.pdf

  # Inspect PDF metadata (no API key needed)
  pdf2sum --inspect-only report.pdf

  # JSON output with per-chunk results and stats
  pdf2sum --json report.pdf > summary.json

ENVIRONMENT VARIABLES:
  OPENAI_API_KEY          OpenAI API key
  ANTHROPIC_API_KEY       Anthropic API key
  GEMINI_API_KEY          Google Gemini API key
  EDGEQUAKE_LLM_PROVIDER  Override provider (openai, anthropic, gemini, ollama)
  EDGEQUAKE_MODEL         Override model ID
  PDF2SUM_*               Fallback for every flag, e.g. PDF2SUM_CHUNK_SIZE=2048
"#;

/// Summarise PDF files with Language Models.
#[derive(Parser, Debug)]
#[command(
    name = "pdf2sum",
    version,
    about = "Summarise PDF files with Language Models",
    long_about = "Extract the text of a PDF, summarise it chunk by chunk with a Language Model, \
and write a new PDF holding both the original text and the summary. Supports OpenAI, \
Anthropic, Google Gemini, Azure OpenAI, and any OpenAI-compatible endpoint (Ollama, vLLM, etc.).",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Local PDF file path.
    input: PathBuf,

    /// Output PDF path [default: <input stem>.summary.pdf next to the input].
    #[arg(short, long, env = "PDF2SUM_OUTPUT")]
    output: Option<PathBuf>,

    /// LLM model ID (e.g. gpt-4.1-nano, gpt-4.1-mini, claude-sonnet-4-20250514).
    #[arg(long, env = "EDGEQUAKE_MODEL")]
    model: Option<String>,

    /// LLM provider: openai, anthropic, gemini, ollama, azure.
    #[arg(long, env = "EDGEQUAKE_PROVIDER")]
    provider: Option<String>,

    /// Maximum characters per chunk sent to the model.
    #[arg(long, env = "PDF2SUM_CHUNK_SIZE", default_value_t = 1024)]
    chunk_size: usize,

    /// Upper bound on each partial summary's length.
    #[arg(long, env = "PDF2SUM_MAX_LENGTH", default_value_t = 1000)]
    max_length: usize,

    /// Lower bound on each partial summary's length.
    #[arg(long, env = "PDF2SUM_MIN_LENGTH", default_value_t = 100)]
    min_length: usize,

    /// Chunk boundary strategy: fixed or boundary.
    #[arg(long, env = "PDF2SUM_STRATEGY", value_enum, default_value = "fixed")]
    strategy: StrategyArg,

    /// Number of concurrent model calls.
    #[arg(short, long, env = "PDF2SUM_CONCURRENCY", default_value_t = 1)]
    concurrency: usize,

    /// Retries per chunk on transient model failure.
    #[arg(long, env = "PDF2SUM_MAX_RETRIES", default_value_t = 2)]
    max_retries: u32,

    /// Per-chunk model call timeout in seconds (0 disables).
    #[arg(long, env = "PDF2SUM_API_TIMEOUT", default_value_t = 120)]
    api_timeout: u64,

    /// LLM temperature (0.0–2.0).
    #[arg(long, env = "PDF2SUM_TEMPERATURE", default_value_t = 0.3)]
    temperature: f32,

    /// Path to a text file containing a custom system prompt.
    #[arg(long, env = "PDF2SUM_SYSTEM_PROMPT")]
    system_prompt: Option<PathBuf>,

    /// What to do when text is wider than the page: truncate or fail.
    #[arg(long, env = "PDF2SUM_OVERFLOW", value_enum, default_value = "truncate")]
    overflow: OverflowArg,

    /// Print structured JSON (SummaryOutput) instead of plain text.
    #[arg(long, env = "PDF2SUM_JSON")]
    json: bool,

    /// Disable progress bar.
    #[arg(long, env = "PDF2SUM_NO_PROGRESS")]
    no_progress: bool,

    /// Print PDF metadata only, no summarisation.
    #[arg(long)]
    inspect_only: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "PDF2SUM_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "PDF2SUM_QUIET")]
    quiet: bool,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum StrategyArg {
    Fixed,
    Boundary,
}

impl From<StrategyArg> for ChunkStrategy {
    fn from(v: StrategyArg) -> Self {
        match v {
            StrategyArg::Fixed => ChunkStrategy::Fixed,
            StrategyArg::Boundary => ChunkStrategy::Boundary,
        }
    }
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum OverflowArg {
    Truncate,
    Fail,
}

impl From<OverflowArg> for OverflowPolicy {
    fn from(v: OverflowArg) -> Self {
        match v {
            OverflowArg::Truncate => OverflowPolicy::Truncate,
            OverflowArg::Fail => OverflowPolicy::Fail,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // The progress bar replaces INFO logs; --verbose brings them all back.
    let show_progress = !cli.quiet && !cli.no_progress && !cli.json;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    // ── Inspect-only mode ────────────────────────────────────────────────
    if cli.inspect_only {
        let meta = inspect(&cli.input).await.context("Failed to inspect PDF")?;

        if cli.json {
            println!(
                "{}",
                serde_json::to_string_pretty(&meta).context("Failed to serialize metadata")?
            );
        } else {
            println!("File:         {}", cli.input.display());
            if let Some(ref t) = meta.title {
                println!("Title:        {}", t);
            }
            if let Some(ref a) = meta.author {
                println!("Author:       {}", a);
            }
            if let Some(ref s) = meta.subject {
                println!("Subject:      {}", s);
            }
            println!("Pages:        {}", meta.page_count);
            println!("PDF Version:  {}", meta.pdf_version);
            println!("Encrypted:    {}", meta.is_encrypted);
            if let Some(ref p) = meta.producer {
                println!("Producer:     {}", p);
            }
            if let Some(ref c) = meta.creator {
                println!("Creator:      {}", c);
            }
        }
        return Ok(());
    }

    // ── Build summarizer and config ──────────────────────────────────────
    let summarizer = build_summarizer(&cli).await?;

    let progress_cb: Option<ProgressCallback> = if show_progress {
        Some(CliProgressCallback::new_dynamic() as Arc<dyn SummaryProgressCallback>)
    } else {
        None
    };
    let config = build_config(&cli, progress_cb)?;

    let output_path = cli
        .output
        .clone()
        .unwrap_or_else(|| default_output_path(&cli.input));

    // ── Run ──────────────────────────────────────────────────────────────
    let output = convert(&cli.input, &output_path, &summarizer, &config)
        .await
        .context("Summarisation failed")?;

    if cli.json {
        let json = serde_json::to_string_pretty(&output).context("Failed to serialise output")?;
        println!("{json}");
    } else if !cli.quiet {
        let stdout = io::stdout();
        let mut handle = stdout.lock();
        writeln!(
            handle,
            "Original Text:\n{}\n\nSummary:\n{}",
            output.original_text, output.summary
        )
        .context("Failed to write to stdout")?;
    }

    if !cli.quiet && !cli.json {
        eprintln!(
            "{}  {} chunk(s)  {}ms  →  {}",
            green("✔"),
            output.stats.chunk_count,
            output.stats.total_duration_ms,
            bold(&output_path.display().to_string()),
        );
        eprintln!(
            "   {} tokens in  /  {} tokens out",
            dim(&output.stats.total_input_tokens.to_string()),
            dim(&output.stats.total_output_tokens.to_string()),
        );
    }

    summarizer.dispose();
    Ok(())
}

/// Resolve the provider and apply CLI-level model settings.
async fn build_summarizer(cli: &Cli) -> Result<LlmSummarizer> {
    let mut summarizer = LlmSummarizer::create(cli.provider.as_deref(), cli.model.as_deref())
        .context("Failed to configure LLM provider")?
        .with_temperature(cli.temperature);

    if let Some(ref path) = cli.system_prompt {
        let prompt = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read system prompt from {:?}", path))?;
        summarizer = summarizer.with_system_prompt(prompt);
    }
    Ok(summarizer)
}

/// Map CLI args to `SummaryConfig`.
fn build_config(cli: &Cli, progress: Option<ProgressCallback>) -> Result<SummaryConfig> {
    let mut builder = SummaryConfig::builder()
        .chunk_size(cli.chunk_size)
        .max_length(cli.max_length)
        .min_length(cli.min_length)
        .chunk_strategy(cli.strategy.into())
        .concurrency(cli.concurrency)
        .max_retries(cli.max_retries)
        .api_timeout_secs(cli.api_timeout)
        .overflow(cli.overflow.into());

    if let Some(cb) = progress {
        builder = builder.progress_callback(cb);
    }

    builder.build().context("Invalid configuration")
}

/// `dir/report.pdf` → `dir/report.summary.pdf`.
fn default_output_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output".to_string());
    input.with_file_name(format!("{stem}.summary.pdf"))
}
