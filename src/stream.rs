//! Streaming API: emit partial summaries as they become available.
//!
//! [`crate::summarize::summarize`] is all-or-nothing. This module is the
//! alternative for callers who would rather keep what succeeded: every
//! chunk yields one item, `Ok(ChunkResult)` or `Err(SummarizationFailed)`,
//! and a failed chunk does not stop later chunks from being processed.
//!
//! Items arrive in chunk order even when `concurrency > 1`.

use crate::config::SummaryConfig;
use crate::error::Pdf2SumError;
use crate::output::ChunkResult;
use crate::pipeline::chunk::chunk_text;
use crate::pipeline::llm;
use crate::summarizer::Summarizer;
use futures::stream::{self, StreamExt};
use std::pin::Pin;
use tokio_stream::Stream;
use tracing::info;

/// A boxed stream of per-chunk results, borrowing the input text.
pub type ChunkStream<'a> = Pin<Box<dyn Stream<Item = Result<ChunkResult, Pdf2SumError>> + Send + 'a>>;

/// Summarise `text`, yielding each chunk's result in chunk order.
///
/// # Errors
/// Returns `Err` up front only if `config` is invalid.
pub fn summarize_stream<'a>(
    text: &'a str,
    summarizer: &'a dyn Summarizer,
    config: &'a SummaryConfig,
) -> Result<ChunkStream<'a>, Pdf2SumError> {
    config.validate()?;

    let chunks = chunk_text(text, config.chunk_size, config.chunk_strategy);
    let total = chunks.len();
    info!("Streaming summary of {} chunk(s)", total);

    let s = stream::iter(chunks)
        .map(move |chunk| async move { llm::process_chunk(summarizer, &chunk, total, config).await })
        .buffered(config.concurrency);

    Ok(Box::pin(s))
}
