//! Result types produced by the pipeline.
//!
//! Everything here derives `Serialize` so the CLI's `--json` mode can dump a
//! complete run record, and `Deserialize` so such records can be loaded back
//! for comparison.

use serde::{Deserialize, Serialize};

/// One chunk's partial summary plus bookkeeping.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChunkResult {
    /// 0-indexed position of the chunk in the document.
    pub index: usize,
    /// Character offset of the chunk's first character in the full text.
    pub offset: usize,
    /// Number of characters in the chunk.
    pub char_len: usize,
    /// The partial summary returned by the capability.
    pub summary: String,
    pub input_tokens: usize,
    pub output_tokens: usize,
    pub duration_ms: u64,
    /// Attempts beyond the first that were needed.
    pub retries: u32,
}

/// The Final Summary together with the partials it was assembled from.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SummaryResult {
    /// Partial summaries joined with a single space, in chunk order.
    pub summary: String,
    /// One entry per chunk, in chunk order.
    pub chunks: Vec<ChunkResult>,
}

/// Document-level metadata read from the PDF trailer.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct DocumentMetadata {
    pub title: Option<String>,
    pub author: Option<String>,
    pub subject: Option<String>,
    pub creator: Option<String>,
    pub producer: Option<String>,
    pub page_count: usize,
    pub pdf_version: String,
    pub is_encrypted: bool,
}

/// Counters and timings for one run.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SummaryStats {
    pub total_pages: usize,
    /// Characters in the extracted text.
    pub total_chars: usize,
    pub chunk_count: usize,
    pub total_input_tokens: u64,
    pub total_output_tokens: u64,
    pub total_retries: u64,
    pub extract_duration_ms: u64,
    pub llm_duration_ms: u64,
    pub total_duration_ms: u64,
}

/// The complete record of a document summarisation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryOutput {
    /// Text extracted from the source PDF.
    pub original_text: String,
    /// The Final Summary.
    pub summary: String,
    pub chunks: Vec<ChunkResult>,
    pub metadata: DocumentMetadata,
    pub stats: SummaryStats,
}
