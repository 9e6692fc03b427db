//! Prompts for LLM-backed summarisation.
//!
//! Every prompt lives here so that changing the default behaviour means
//! editing one place, and so tests can inspect prompts without a model.
//! Callers can override the system prompt via
//! [`crate::summarizer::LlmSummarizer::with_system_prompt`].

/// Default system prompt for summarising one chunk of extracted PDF text.
pub const DEFAULT_SYSTEM_PROMPT: &str = r#"You are an expert summariser. You will receive a fragment of text extracted from a PDF document and must write a condensed summary of it.

Follow these rules precisely:

1. CONTENT
   - Summarise only what the fragment says; do not add outside facts
   - Keep names, figures, and dates that carry meaning
   - The fragment may start or end mid-sentence or mid-word; summarise what is there

2. FORM
   - Write plain prose in the language of the fragment
   - No headings, lists, or Markdown
   - Do NOT prefix the output with "Summary:" or similar labels
   - Do NOT add commentary about the task or the fragment

3. LENGTH
   - Respect the length bounds given with the fragment"#;

/// Build the length instruction sent ahead of each chunk.
///
/// The bounds are advisory: models treat them as a target, not a contract.
pub fn length_instruction(max_length: usize, min_length: usize) -> String {
    format!(
        "Write a summary between {} and {} tokens long of the following text:",
        min_length, max_length
    )
}

/// Assemble the user message for one chunk.
pub fn chunk_message(text: &str, max_length: usize, min_length: usize) -> String {
    format!(
        "{}\n\n\"\"\"{}\"\"\"",
        length_instruction(max_length, min_length),
        text
    )
}
