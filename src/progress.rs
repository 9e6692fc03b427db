//! Progress-callback trait for per-chunk summarisation events.
//!
//! Inject an [`Arc<dyn SummaryProgressCallback>`] via
//! [`crate::config::SummaryConfigBuilder::progress_callback`] to receive
//! events as the pipeline works through the chunks of a document.
//!
//! # Example
//!
//! ```rust
//! use edgequake_pdf2sum::{SummaryProgressCallback, SummaryConfig};
//! use std::sync::{Arc, atomic::{AtomicUsize, Ordering}};
//!
//! struct CountingCallback {
//!     completed: Arc<AtomicUsize>,
//! }
//!
//! impl SummaryProgressCallback for CountingCallback {
//!     fn on_chunk_complete(&self, chunk_num: usize, total_chunks: usize, summary_len: usize) {
//!         self.completed.fetch_add(1, Ordering::SeqCst);
//!         eprintln!("Chunk {}/{} done ({} chars)", chunk_num, total_chunks, summary_len);
//!     }
//! }
//!
//! let counter = Arc::new(CountingCallback {
//!     completed: Arc::new(AtomicUsize::new(0)),
//! });
//!
//! let config = SummaryConfig::builder()
//!     .progress_callback(counter as Arc<dyn SummaryProgressCallback>)
//!     .build()
//!     .unwrap();
//! ```

use std::sync::Arc;

/// Called by the pipeline as it processes each chunk.
///
/// All methods default to no-ops so callers only override what they need.
/// With `concurrency > 1` the per-chunk methods may be called for several
/// chunks at once and in any order; protect shared state accordingly.
pub trait SummaryProgressCallback: Send + Sync {
    /// Called once, after partitioning and before the first invocation.
    fn on_summary_start(&self, total_chunks: usize) {
        let _ = total_chunks;
    }

    /// Called just before a chunk is sent to the capability.
    ///
    /// `chunk_num` is 1-indexed.
    fn on_chunk_start(&self, chunk_num: usize, total_chunks: usize) {
        let _ = (chunk_num, total_chunks);
    }

    /// Called when a chunk produced its partial summary.
    ///
    /// `summary_len` is the partial summary's length in characters.
    fn on_chunk_complete(&self, chunk_num: usize, total_chunks: usize, summary_len: usize) {
        let _ = (chunk_num, total_chunks, summary_len);
    }

    /// Called when a chunk failed after all retries.
    fn on_chunk_error(&self, chunk_num: usize, total_chunks: usize, error: &str) {
        let _ = (chunk_num, total_chunks, error);
    }

    /// Called once when the run ends, successfully or not.
    ///
    /// `success_count` is the number of leading chunks that were summarised.
    fn on_summary_complete(&self, total_chunks: usize, success_count: usize) {
        let _ = (total_chunks, success_count);
    }
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopProgressCallback;

impl SummaryProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::config::SummaryConfig`].
pub type ProgressCallback = Arc<dyn SummaryProgressCallback>;
