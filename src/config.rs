//! Configuration types for PDF summarisation.
//!
//! All pipeline behaviour is controlled through [`SummaryConfig`], built via
//! its [`SummaryConfigBuilder`]. Model selection is deliberately *not* part
//! of this struct: the summarisation capability is constructed separately
//! (see [`crate::summarizer::LlmSummarizer`]) and passed into the pipeline,
//! so one config can drive any capability, including test doubles.

use crate::error::Pdf2SumError;
use crate::progress::ProgressCallback;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Configuration for the chunking-and-aggregation pipeline and the writer.
///
/// # Example
/// ```rust
/// use edgequake_pdf2sum::SummaryConfig;
///
/// let config = SummaryConfig::builder()
///     .chunk_size(2048)
///     .max_length(400)
///     .min_length(50)
///     .build()
///     .unwrap();
/// assert_eq!(config.chunk_size, 2048);
/// ```
#[derive(Clone)]
pub struct SummaryConfig {
    /// Characters per chunk. Default: 1024.
    ///
    /// Each chunk is one capability invocation. Larger chunks mean fewer
    /// calls but longer per-call latency, and must stay within what the
    /// model accepts as input.
    pub chunk_size: usize,

    /// Advisory upper bound on each partial summary's length. Default: 1000.
    ///
    /// Passed to the capability verbatim; never enforced locally.
    pub max_length: usize,

    /// Advisory lower bound on each partial summary's length. Default: 100.
    pub min_length: usize,

    /// How chunk boundaries are chosen. Default: [`ChunkStrategy::Fixed`].
    pub chunk_strategy: ChunkStrategy,

    /// Number of chunks summarised concurrently. Default: 1 (sequential).
    ///
    /// Results are always aggregated in chunk order regardless of the order
    /// in which invocations complete.
    pub concurrency: usize,

    /// Extra attempts per chunk on a transient capability failure. Default: 2.
    pub max_retries: u32,

    /// Initial retry delay in milliseconds, doubled after each attempt. Default: 500.
    pub retry_backoff_ms: u64,

    /// Per-invocation timeout in seconds; `0` disables it. Default: 120.
    pub api_timeout_secs: u64,

    /// What the writer does with text wider than the page. Default: [`OverflowPolicy::Truncate`].
    pub overflow: OverflowPolicy,

    /// Receives per-chunk progress events.
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for SummaryConfig {
    fn default() -> Self {
        Self {
            chunk_size: 1024,
            max_length: 1000,
            min_length: 100,
            chunk_strategy: ChunkStrategy::default(),
            concurrency: 1,
            max_retries: 2,
            retry_backoff_ms: 500,
            api_timeout_secs: 120,
            overflow: OverflowPolicy::default(),
            progress_callback: None,
        }
    }
}

impl fmt::Debug for SummaryConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SummaryConfig")
            .field("chunk_size", &self.chunk_size)
            .field("max_length", &self.max_length)
            .field("min_length", &self.min_length)
            .field("chunk_strategy", &self.chunk_strategy)
            .field("concurrency", &self.concurrency)
            .field("max_retries", &self.max_retries)
            .field("retry_backoff_ms", &self.retry_backoff_ms)
            .field("api_timeout_secs", &self.api_timeout_secs)
            .field("overflow", &self.overflow)
            .field(
                "progress_callback",
                &self
                    .progress_callback
                    .as_ref()
                    .map(|_| "<dyn SummaryProgressCallback>"),
            )
            .finish()
    }
}

impl SummaryConfig {
    /// Create a new builder for `SummaryConfig`.
    pub fn builder() -> SummaryConfigBuilder {
        SummaryConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`SummaryConfig`].
#[derive(Debug)]
pub struct SummaryConfigBuilder {
    config: SummaryConfig,
}

impl SummaryConfigBuilder {
    pub fn chunk_size(mut self, n: usize) -> Self {
        self.config.chunk_size = n;
        self
    }

    pub fn max_length(mut self, n: usize) -> Self {
        self.config.max_length = n;
        self
    }

    pub fn min_length(mut self, n: usize) -> Self {
        self.config.min_length = n;
        self
    }

    pub fn chunk_strategy(mut self, strategy: ChunkStrategy) -> Self {
        self.config.chunk_strategy = strategy;
        self
    }

    pub fn concurrency(mut self, n: usize) -> Self {
        self.config.concurrency = n.max(1);
        self
    }

    pub fn max_retries(mut self, n: u32) -> Self {
        self.config.max_retries = n;
        self
    }

    pub fn retry_backoff_ms(mut self, ms: u64) -> Self {
        self.config.retry_backoff_ms = ms;
        self
    }

    pub fn api_timeout_secs(mut self, secs: u64) -> Self {
        self.config.api_timeout_secs = secs;
        self
    }

    pub fn overflow(mut self, policy: OverflowPolicy) -> Self {
        self.config.overflow = policy;
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<SummaryConfig, Pdf2SumError> {
        self.config.validate()?;
        Ok(self.config)
    }
}

impl SummaryConfig {
    /// Check the invariants the pipeline relies on.
    ///
    /// The length bounds are not checked here: they belong to the
    /// [`crate::Summarizer`], which reports unusable bounds per chunk.
    ///
    /// Called by [`SummaryConfigBuilder::build`] and again at the start of
    /// every pipeline run, since the fields are public.
    pub fn validate(&self) -> Result<(), Pdf2SumError> {
        if self.chunk_size == 0 {
            return Err(Pdf2SumError::InvalidConfig(
                "chunk_size must be ≥ 1".into(),
            ));
        }
        if self.concurrency == 0 {
            return Err(Pdf2SumError::InvalidConfig(
                "concurrency must be ≥ 1".into(),
            ));
        }
        Ok(())
    }
}

// ── Enums ────────────────────────────────────────────────────────────────

/// How the pipeline decides where one chunk ends and the next begins.
///
/// Both strategies cover the input exactly (no gaps, no overlap) and never
/// produce a chunk longer than `chunk_size` characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ChunkStrategy {
    /// Cut every `chunk_size` characters, regardless of words or sentences. (default)
    #[default]
    Fixed,
    /// Pull each cut back to the last sentence end, or failing that the last
    /// whitespace, found in the second half of the window.
    Boundary,
}

/// What the writer does when a text element is wider than the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum OverflowPolicy {
    /// Draw the text anyway; whatever runs past the page edge is not visible. (default)
    #[default]
    Truncate,
    /// Refuse to write the document.
    Fail,
}
