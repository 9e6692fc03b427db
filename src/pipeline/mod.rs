//! Pipeline stages for PDF summarisation.
//!
//! Each submodule implements exactly one step, so each is independently
//! testable and can be swapped without touching the others.
//!
//! ## Data Flow
//!
//! ```text
//! input ──▶ extract ──▶ chunk ──▶ llm ──▶ (aggregate) ──▶ write
//! (path)    (lopdf)    (slices)  (model)  (join " ")     (lopdf)
//! ```
//!
//! 1. [`input`]: validate the user-supplied path (exists, readable, `%PDF`)
//! 2. [`extract`]: concatenate per-page text in page order; `spawn_blocking`
//! 3. [`chunk`]: positional partitioning into bounded [`chunk::Chunk`]s
//! 4. [`llm`]: one capability call per chunk with retry/backoff/timeout
//! 5. [`postprocess`]: cleanup rules applied to raw model answers
//! 6. [`write`]: fixed single-page layout, atomic persist
//!
//! Aggregation itself lives in [`crate::summarize`].

pub mod chunk;
pub mod extract;
pub mod input;
pub mod llm;
pub mod postprocess;
pub mod write;
