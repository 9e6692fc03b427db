//! # edgequake-pdf2sum
//!
//! Summarise PDF documents with Language Models.
//!
//! Extracts the text of a PDF, condenses it with a summarisation model, and
//! writes a new PDF holding both the original text and the summary.
//!
//! ## Pipeline Overview
//!
//! ```text
//! PDF
//!  │
//!  ├─ 1. Read       concatenate per-page text (lopdf, spawn_blocking)
//!  ├─ 2. Chunk      fixed-size character windows (optionally boundary-aware)
//!  ├─ 3. Summarise  one capability call per chunk, retry + timeout
//!  ├─ 4. Aggregate  join partial summaries with " ", in chunk order
//!  └─ 5. Write      one-page PDF: "Original Text:" / text / "Summary:" / summary
//! ```
//!
//! Models accept bounded input; documents do not. Chunking is what lets an
//! arbitrarily long document pass through a model with a fixed context
//! window. Each chunk is summarised on its own, without seeing its
//! neighbours.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use edgequake_pdf2sum::{convert, LlmSummarizer, SummaryConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Provider auto-detected from OPENAI_API_KEY / ANTHROPIC_API_KEY / GEMINI_API_KEY
//!     let summarizer = LlmSummarizer::create(None, None)?;
//!     let config = SummaryConfig::default();
//!     let output = convert("report.pdf", "report.summary.pdf", &summarizer, &config).await?;
//!     println!("{}", output.summary);
//!     summarizer.dispose();
//!     Ok(())
//! }
//! ```
//!
//! ## Bringing your own model
//!
//! Anything that implements [`Summarizer`] can drive the pipeline: a local
//! model, a hosted endpoint, or a test double:
//!
//! ```rust
//! use async_trait::async_trait;
//! use edgequake_pdf2sum::{summarize_text, ChunkError, ChunkSummary, Summarizer};
//!
//! struct FirstWord;
//!
//! #[async_trait]
//! impl Summarizer for FirstWord {
//!     async fn summarize_one(&self, text: &str, _max: usize, _min: usize)
//!         -> Result<ChunkSummary, ChunkError>
//!     {
//!         Ok(ChunkSummary::new(text.split_whitespace().next().unwrap_or("")))
//!     }
//! }
//!
//! # tokio_test::block_on(async {
//! let summary = summarize_text("alpha beta gamma delta", &FirstWord, 100, 10, 11).await.unwrap();
//! assert_eq!(summary, "alpha gamma");
//! # });
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `pdf2sum` binary (clap + anyhow + tracing-subscriber + indicatif) |

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod convert;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod progress;
pub mod prompts;
pub mod stream;
pub mod summarize;
pub mod summarizer;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{ChunkStrategy, OverflowPolicy, SummaryConfig, SummaryConfigBuilder};
pub use convert::{convert, convert_sync, inspect, summarize_bytes, summarize_document};
pub use error::{ChunkError, ErrorKind, Pdf2SumError};
pub use output::{ChunkResult, DocumentMetadata, SummaryOutput, SummaryResult, SummaryStats};
pub use pipeline::chunk::{chunk_text, Chunk};
pub use pipeline::extract::read_text;
pub use pipeline::write::write_pdf;
pub use progress::{NoopProgressCallback, ProgressCallback, SummaryProgressCallback};
pub use stream::summarize_stream;
pub use summarize::{summarize, summarize_sync, summarize_text};
pub use summarizer::{ChunkSummary, LlmSummarizer, Summarizer};
