//! The chunking-and-aggregation pipeline.
//!
//! Adapts text of any length to a capability with a bounded input size:
//!
//! 1. partition the text into chunks of at most `chunk_size` characters
//! 2. invoke the capability exactly once per chunk (retries aside)
//! 3. join the partial summaries with a single space, in chunk order
//!
//! Chunks are independent, so with `concurrency > 1` several invocations run
//! at once. `StreamExt::buffered` yields results in submission order, never
//! completion order, so the join order is the chunk order either way.
//!
//! The run is all-or-nothing: the first chunk (in chunk order) that fails
//! aborts it, pending invocations are dropped, and no summary is returned.
//! Callers that want partial results use [`crate::stream::summarize_stream`].

use crate::config::SummaryConfig;
use crate::error::Pdf2SumError;
use crate::output::{ChunkResult, SummaryResult};
use crate::pipeline::chunk::chunk_text;
use crate::pipeline::llm;
use crate::summarizer::Summarizer;
use futures::stream::{self, StreamExt, TryStreamExt};
use tracing::{debug, info};

/// Summarise `text` chunk by chunk and join the partial summaries.
///
/// Empty `text` returns an empty summary without calling the capability.
///
/// # Errors
/// - [`Pdf2SumError::InvalidConfig`] if `config` fails validation
/// - [`Pdf2SumError::SummarizationFailed`] naming the first failing chunk
pub async fn summarize(
    text: &str,
    summarizer: &dyn Summarizer,
    config: &SummaryConfig,
) -> Result<SummaryResult, Pdf2SumError> {
    config.validate()?;

    let chunks = chunk_text(text, config.chunk_size, config.chunk_strategy);
    let total = chunks.len();
    if total == 0 {
        debug!("Empty input, nothing to summarise");
        return Ok(SummaryResult::default());
    }
    info!(
        "Summarising {} chars in {} chunk(s) of ≤{} chars",
        text.chars().count(),
        total,
        config.chunk_size
    );

    if let Some(ref cb) = config.progress_callback {
        cb.on_summary_start(total);
    }

    let outcome: Result<Vec<ChunkResult>, Pdf2SumError> = stream::iter(chunks.iter())
        .map(|chunk| llm::process_chunk(summarizer, chunk, total, config))
        .buffered(config.concurrency)
        .try_collect()
        .await;

    match outcome {
        Ok(results) => {
            if let Some(ref cb) = config.progress_callback {
                cb.on_summary_complete(total, results.len());
            }
            Ok(SummaryResult {
                summary: join_partials(&results),
                chunks: results,
            })
        }
        Err(e) => {
            // Results arrive in chunk order, so every chunk before the
            // failing one succeeded.
            if let (Some(cb), Pdf2SumError::SummarizationFailed { chunk, .. }) =
                (config.progress_callback.as_ref(), &e)
            {
                cb.on_summary_complete(total, *chunk);
            }
            Err(e)
        }
    }
}

/// Contract-shaped convenience wrapper around [`summarize`].
///
/// Uses the default retry, timeout, and concurrency settings with the given
/// length bounds and chunk size, and returns only the Final Summary.
pub async fn summarize_text(
    text: &str,
    summarizer: &dyn Summarizer,
    max_length: usize,
    min_length: usize,
    chunk_size: usize,
) -> Result<String, Pdf2SumError> {
    let config = SummaryConfig::builder()
        .max_length(max_length)
        .min_length(min_length)
        .chunk_size(chunk_size)
        .build()?;
    Ok(summarize(text, summarizer, &config).await?.summary)
}

/// Synchronous wrapper around [`summarize`].
///
/// Creates a temporary tokio runtime internally; do not call from within
/// an async context.
pub fn summarize_sync(
    text: &str,
    summarizer: &dyn Summarizer,
    config: &SummaryConfig,
) -> Result<SummaryResult, Pdf2SumError> {
    tokio::runtime::Runtime::new()
        .map_err(|e| Pdf2SumError::Internal(format!("Failed to create tokio runtime: {}", e)))?
        .block_on(summarize(text, summarizer, config))
}

/// Join partial summaries with a single space, in the order given.
pub fn join_partials(results: &[ChunkResult]) -> String {
    results
        .iter()
        .map(|r| r.summary.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}
