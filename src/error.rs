//! Error types for the edgequake-pdf2sum library.
//!
//! Two error types reflect two levels of failure:
//!
//! * [`Pdf2SumError`] is **fatal**: the run cannot produce a result (missing
//!   or corrupt input, a chunk that could not be summarised, an unwritable
//!   destination). Returned as `Err(Pdf2SumError)` from every top-level
//!   entry point.
//!
//! * [`ChunkError`] means a single capability invocation failed. It never
//!   escapes on its own: the pipeline retries it where that makes sense and
//!   otherwise wraps it in [`Pdf2SumError::SummarizationFailed`] together
//!   with the index and character offset of the chunk that failed.
//!
//! [`Pdf2SumError::kind`] folds the fatal variants into the three stages of
//! the pipeline (read, summarise, write) so callers can branch on the stage
//! without matching every variant.

use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the edgequake-pdf2sum library.
#[derive(Debug, Error)]
pub enum Pdf2SumError {
    // ── Read errors ───────────────────────────────────────────────────────
    /// Input file was not found at the given path.
    #[error("PDF file not found: '{path}'\nCheck the path exists and is readable.")]
    FileNotFound { path: PathBuf },

    /// Process does not have read permission on the file.
    #[error("Permission denied reading '{path}'\nTry: chmod +r {path:?}")]
    PermissionDenied { path: PathBuf },

    /// Reading the file failed for a reason other than absence or permissions.
    #[error("Failed to read '{path}': {source}")]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file exists and was read, but is not a PDF.
    #[error("File is not a valid PDF: '{path}'\nFirst bytes: {magic:?}")]
    NotAPdf { path: PathBuf, magic: [u8; 4] },

    /// PDF header/trailer/xref is corrupt and cannot be parsed.
    #[error("PDF '{path}' is corrupt: {detail}")]
    CorruptPdf { path: PathBuf, detail: String },

    /// The document parsed but the text of one page could not be decoded.
    #[error("Text extraction failed for page {page} of '{path}': {detail}")]
    TextExtractionFailed {
        path: PathBuf,
        page: u32,
        detail: String,
    },

    // ── Summarisation errors ──────────────────────────────────────────────
    /// The configured provider is not initialised (missing API key etc.).
    #[error("LLM provider '{provider}' is not configured.\n{hint}")]
    ProviderNotConfigured { provider: String, hint: String },

    /// A chunk could not be summarised; no summary is produced for the run.
    #[error("Summarisation failed for chunk {chunk} (offset {offset}) after {attempts} attempt(s): {source}")]
    SummarizationFailed {
        chunk: usize,
        offset: usize,
        attempts: u32,
        #[source]
        source: ChunkError,
    },

    // ── Write errors ──────────────────────────────────────────────────────
    /// Could not create or write the output PDF file.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The output document could not be assembled or serialised.
    #[error("Failed to build output PDF '{path}': {detail}")]
    PdfBuildFailed { path: PathBuf, detail: String },

    /// A text element is wider than the page and the overflow policy is `Fail`.
    #[error("{element} does not fit on the page ({width:.0}pt wide, {max_width:.0}pt available)")]
    TextOverflow {
        element: String,
        width: f32,
        max_width: f32,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// The pipeline stage a [`Pdf2SumError`] belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Source file missing, unreadable, or not a valid PDF.
    DocumentRead,
    /// A capability invocation failed or timed out for some chunk.
    Summarization,
    /// Destination not writable, or the output could not be rendered.
    DocumentWrite,
    /// Rejected configuration.
    Config,
    /// Anything else.
    Internal,
}

impl Pdf2SumError {
    /// Classify this error by pipeline stage.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Pdf2SumError::FileNotFound { .. }
            | Pdf2SumError::PermissionDenied { .. }
            | Pdf2SumError::ReadFailed { .. }
            | Pdf2SumError::NotAPdf { .. }
            | Pdf2SumError::CorruptPdf { .. }
            | Pdf2SumError::TextExtractionFailed { .. } => ErrorKind::DocumentRead,
            Pdf2SumError::ProviderNotConfigured { .. }
            | Pdf2SumError::SummarizationFailed { .. } => ErrorKind::Summarization,
            Pdf2SumError::OutputWriteFailed { .. }
            | Pdf2SumError::PdfBuildFailed { .. }
            | Pdf2SumError::TextOverflow { .. } => ErrorKind::DocumentWrite,
            Pdf2SumError::InvalidConfig(_) => ErrorKind::Config,
            Pdf2SumError::Internal(_) => ErrorKind::Internal,
        }
    }
}

/// A failed invocation of the summarisation capability for one chunk.
#[derive(Debug, Clone, Error, serde::Serialize, serde::Deserialize)]
pub enum ChunkError {
    /// The capability returned an error (API failure, model unavailable, …).
    #[error("capability error: {detail}")]
    Capability { detail: String },

    /// The invocation did not complete within the configured timeout.
    #[error("timed out after {secs}s")]
    Timeout { secs: u64 },

    /// The length bounds are unusable; retrying cannot help.
    #[error("invalid length bounds (min {min_length}, max {max_length})")]
    InvalidBounds {
        max_length: usize,
        min_length: usize,
    },

    /// The capability is not set up; retrying cannot help.
    #[error("capability not configured: {detail}")]
    NotConfigured { detail: String },
}

impl ChunkError {
    /// Whether another attempt at the same chunk may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ChunkError::Capability { .. } | ChunkError::Timeout { .. })
    }
}
