//! Per-chunk capability invocation with retry, backoff, and timeout.
//!
//! This is the only stage that talks to the model. Prompting lives behind
//! the [`Summarizer`] implementation, so the logic here is purely about
//! getting exactly one successful answer per chunk, or a precise error.
//!
//! ## Retry Strategy
//!
//! Transient failures (API errors, timeouts) are retried with exponential
//! backoff (`retry_backoff_ms * 2^attempt`): with 500 ms base and 2 retries
//! the wait sequence is 500 ms → 1 s. Permanent failures (invalid bounds,
//! unconfigured capability) fail immediately. A chunk either yields one
//! partial summary or the whole run fails; a retried chunk never
//! contributes more than one partial.

use crate::config::SummaryConfig;
use crate::error::{ChunkError, Pdf2SumError};
use crate::output::ChunkResult;
use crate::pipeline::chunk::Chunk;
use crate::summarizer::{ChunkSummary, Summarizer};
use std::time::Instant;
use tokio::time::{sleep, timeout, Duration};
use tracing::{debug, warn};

/// Summarise one chunk, retrying transient failures.
///
/// Fires the chunk-level progress callbacks. `total_chunks` is only used
/// for those callbacks and for log lines.
pub async fn process_chunk(
    summarizer: &dyn Summarizer,
    chunk: &Chunk<'_>,
    total_chunks: usize,
    config: &SummaryConfig,
) -> Result<ChunkResult, Pdf2SumError> {
    let chunk_num = chunk.index + 1;
    if let Some(ref cb) = config.progress_callback {
        cb.on_chunk_start(chunk_num, total_chunks);
    }

    let start = Instant::now();
    let mut last_err: Option<ChunkError> = None;
    let mut attempts = 0u32;

    for attempt in 0..=config.max_retries {
        if attempt > 0 {
            let backoff = backoff_ms(config.retry_backoff_ms, attempt);
            warn!(
                "Chunk {}/{}: retry {}/{} after {}ms",
                chunk_num, total_chunks, attempt, config.max_retries, backoff
            );
            sleep(Duration::from_millis(backoff)).await;
        }
        attempts += 1;

        match invoke(summarizer, chunk.text, config).await {
            Ok(summary) => {
                let duration = start.elapsed();
                debug!(
                    "Chunk {}/{} (offset {}): {} input tokens, {} output tokens, {:?}",
                    chunk_num,
                    total_chunks,
                    chunk.offset,
                    summary.input_tokens,
                    summary.output_tokens,
                    duration
                );
                if let Some(ref cb) = config.progress_callback {
                    cb.on_chunk_complete(chunk_num, total_chunks, summary.text.chars().count());
                }

                return Ok(ChunkResult {
                    index: chunk.index,
                    offset: chunk.offset,
                    char_len: chunk.len,
                    summary: summary.text,
                    input_tokens: summary.input_tokens,
                    output_tokens: summary.output_tokens,
                    duration_ms: duration.as_millis() as u64,
                    retries: attempt,
                });
            }
            Err(e) => {
                warn!(
                    "Chunk {}/{}: attempt {} failed: {}",
                    chunk_num,
                    total_chunks,
                    attempt + 1,
                    e
                );
                let retryable = e.is_retryable();
                last_err = Some(e);
                if !retryable {
                    break;
                }
            }
        }
    }

    let source = last_err.unwrap_or_else(|| ChunkError::Capability {
        detail: "no attempt was made".to_string(),
    });
    if let Some(ref cb) = config.progress_callback {
        cb.on_chunk_error(chunk_num, total_chunks, &source.to_string());
    }

    Err(Pdf2SumError::SummarizationFailed {
        chunk: chunk.index,
        offset: chunk.offset,
        attempts,
        source,
    })
}

/// One invocation, bounded by `api_timeout_secs` unless that is 0.
async fn invoke(
    summarizer: &dyn Summarizer,
    text: &str,
    config: &SummaryConfig,
) -> Result<ChunkSummary, ChunkError> {
    let call = summarizer.summarize_one(text, config.max_length, config.min_length);
    if config.api_timeout_secs == 0 {
        return call.await;
    }
    timeout(Duration::from_secs(config.api_timeout_secs), call)
        .await
        .map_err(|_| ChunkError::Timeout {
            secs: config.api_timeout_secs,
        })?
}

fn backoff_ms(base_ms: u64, attempt: u32) -> u64 {
    base_ms.saturating_mul(1u64 << (attempt.saturating_sub(1)).min(16))
}
