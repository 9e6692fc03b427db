//! Orchestration entry points: Reader → Pipeline → Writer.
//!
//! [`convert`] is the full run: extract the text of a PDF, summarise it, and
//! write the original text and summary to a new PDF. [`summarize_document`]
//! stops before writing, for callers that only want the text.
//!
//! Every stage failure is fatal. Because the writer persists atomically,
//! the destination path holds a complete document if and only if `convert`
//! returned `Ok`.

use crate::config::SummaryConfig;
use crate::error::Pdf2SumError;
use crate::output::{DocumentMetadata, SummaryOutput, SummaryStats};
use crate::pipeline::extract::{self, ExtractedDocument};
use crate::pipeline::write;
use crate::summarize::summarize;
use crate::summarizer::Summarizer;
use std::path::Path;
use std::time::Instant;
use tracing::info;

/// Summarise a PDF file without writing an output document.
///
/// # Errors
/// - Read errors (missing file, permission denied, not a PDF, corrupt PDF)
/// - [`Pdf2SumError::SummarizationFailed`] if any chunk fails
pub async fn summarize_document(
    input_path: impl AsRef<Path>,
    summarizer: &dyn Summarizer,
    config: &SummaryConfig,
) -> Result<SummaryOutput, Pdf2SumError> {
    let total_start = Instant::now();
    let input_path = input_path.as_ref();
    info!("Starting summary: {}", input_path.display());

    config.validate()?;

    // ── Step 1: Extract text ─────────────────────────────────────────────
    let extract_start = Instant::now();
    let document = extract::extract_document(input_path).await?;
    let extract_duration_ms = extract_start.elapsed().as_millis() as u64;

    summarize_extracted(document, summarizer, config, extract_duration_ms, total_start).await
}

/// Summarise an in-memory PDF without writing an output document.
pub async fn summarize_bytes(
    bytes: Vec<u8>,
    summarizer: &dyn Summarizer,
    config: &SummaryConfig,
) -> Result<SummaryOutput, Pdf2SumError> {
    let total_start = Instant::now();
    config.validate()?;

    let extract_start = Instant::now();
    let document = extract::read_bytes(bytes).await?;
    let extract_duration_ms = extract_start.elapsed().as_millis() as u64;

    summarize_extracted(document, summarizer, config, extract_duration_ms, total_start).await
}

/// Summarise a PDF and write original text plus summary to `output_path`.
///
/// Creates or overwrites `output_path`. On error no output file is created.
pub async fn convert(
    input_path: impl AsRef<Path>,
    output_path: impl AsRef<Path>,
    summarizer: &dyn Summarizer,
    config: &SummaryConfig,
) -> Result<SummaryOutput, Pdf2SumError> {
    let total_start = Instant::now();
    let mut output = summarize_document(input_path, summarizer, config).await?;

    // ── Step 3: Write output document ────────────────────────────────────
    let output_path = output_path.as_ref();
    write::write_pdf(
        output_path,
        &output.original_text,
        &output.summary,
        config.overflow,
    )
    .await?;

    output.stats.total_duration_ms = total_start.elapsed().as_millis() as u64;
    info!(
        "Summary complete: {} chunk(s), {}ms total → {}",
        output.stats.chunk_count,
        output.stats.total_duration_ms,
        output_path.display()
    );
    Ok(output)
}

/// Synchronous wrapper around [`convert`].
///
/// Creates a temporary tokio runtime internally.
pub fn convert_sync(
    input_path: impl AsRef<Path>,
    output_path: impl AsRef<Path>,
    summarizer: &dyn Summarizer,
    config: &SummaryConfig,
) -> Result<SummaryOutput, Pdf2SumError> {
    tokio::runtime::Runtime::new()
        .map_err(|e| Pdf2SumError::Internal(format!("Failed to create tokio runtime: {}", e)))?
        .block_on(convert(input_path, output_path, summarizer, config))
}

/// Extract PDF metadata without summarising anything.
///
/// Does not require a model or API key.
pub async fn inspect(input_path: impl AsRef<Path>) -> Result<DocumentMetadata, Pdf2SumError> {
    extract::extract_metadata(input_path).await
}

// ── Internal helpers ─────────────────────────────────────────────────────

async fn summarize_extracted(
    document: ExtractedDocument,
    summarizer: &dyn Summarizer,
    config: &SummaryConfig,
    extract_duration_ms: u64,
    total_start: Instant,
) -> Result<SummaryOutput, Pdf2SumError> {
    let ExtractedDocument { text, metadata } = document;
    info!(
        "Extracted {} chars from {} pages in {}ms",
        text.chars().count(),
        metadata.page_count,
        extract_duration_ms
    );

    // ── Step 2: Chunk, summarise, aggregate ──────────────────────────────
    let llm_start = Instant::now();
    let result = summarize(&text, summarizer, config).await?;
    let llm_duration_ms = llm_start.elapsed().as_millis() as u64;

    let stats = SummaryStats {
        total_pages: metadata.page_count,
        total_chars: text.chars().count(),
        chunk_count: result.chunks.len(),
        total_input_tokens: result.chunks.iter().map(|c| c.input_tokens as u64).sum(),
        total_output_tokens: result.chunks.iter().map(|c| c.output_tokens as u64).sum(),
        total_retries: result.chunks.iter().map(|c| c.retries as u64).sum(),
        extract_duration_ms,
        llm_duration_ms,
        total_duration_ms: total_start.elapsed().as_millis() as u64,
    };

    Ok(SummaryOutput {
        original_text: text,
        summary: result.summary,
        chunks: result.chunks,
        metadata,
        stats,
    })
}
