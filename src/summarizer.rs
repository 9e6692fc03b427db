//! The summarisation capability: the seam between the pipeline and a model.
//!
//! The pipeline only ever sees [`Summarizer`], a single async method that
//! turns one chunk of text into one partial summary. It never assumes a
//! model family, vocabulary, or tokenizer.
//!
//! [`LlmSummarizer`] is the production implementation, backed by any
//! [`edgequake_llm::LLMProvider`]. It is an explicitly constructed value:
//! create it once, pass `&summarizer` into the pipeline, and dispose of it
//! when done. Nothing about the model lives in process-wide state.

use crate::error::{ChunkError, Pdf2SumError};
use crate::pipeline::postprocess;
use crate::prompts::{chunk_message, DEFAULT_SYSTEM_PROMPT};
use async_trait::async_trait;
use edgequake_llm::{ChatMessage, CompletionOptions, LLMProvider, ProviderFactory};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info};

/// Default model when a provider is named without one.
pub const DEFAULT_MODEL: &str = "gpt-4.1-nano";

/// One partial summary as returned by the capability.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChunkSummary {
    pub text: String,
    /// Prompt tokens reported by the backend, or 0 if unknown.
    pub input_tokens: usize,
    /// Completion tokens reported by the backend, or 0 if unknown.
    pub output_tokens: usize,
}

impl ChunkSummary {
    /// A summary with no token accounting.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Default::default()
        }
    }
}

/// Reduces a bounded piece of text to a shorter summary.
///
/// `max_length` and `min_length` are advisory targets; implementations may
/// interpret them in tokens or characters and are not required to meet them
/// exactly. Implementations must be `Send + Sync`: with `concurrency > 1`
/// the pipeline invokes the same instance for several chunks at once.
#[async_trait]
pub trait Summarizer: Send + Sync {
    async fn summarize_one(
        &self,
        text: &str,
        max_length: usize,
        min_length: usize,
    ) -> Result<ChunkSummary, ChunkError>;
}

/// A [`Summarizer`] that asks a chat-completion LLM for each summary.
#[derive(Clone)]
pub struct LlmSummarizer {
    provider: Arc<dyn LLMProvider>,
    model: String,
    temperature: f32,
    system_prompt: Option<String>,
}

impl fmt::Debug for LlmSummarizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LlmSummarizer")
            .field("provider", &"<dyn LLMProvider>")
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("system_prompt", &self.system_prompt.as_ref().map(|_| "<custom>"))
            .finish()
    }
}

impl LlmSummarizer {
    /// Construct a summariser for the given provider and model.
    ///
    /// Resolution, from most to least specific:
    ///
    /// 1. **Named provider**: `provider_name` set: build it with `model`
    ///    (or [`DEFAULT_MODEL`]); the API key comes from that provider's
    ///    usual environment variable.
    /// 2. **Environment pair**: `EDGEQUAKE_LLM_PROVIDER` and
    ///    `EDGEQUAKE_MODEL` both set.
    /// 3. **OpenAI key present**: `OPENAI_API_KEY` set: OpenAI with `model`.
    /// 4. **Auto-detection**: [`ProviderFactory::from_env`].
    pub fn create(provider_name: Option<&str>, model: Option<&str>) -> Result<Self, Pdf2SumError> {
        if let Some(name) = provider_name {
            let model = model.unwrap_or(DEFAULT_MODEL);
            return Self::named(name, model);
        }

        if let (Ok(prov), Ok(env_model)) = (
            std::env::var("EDGEQUAKE_LLM_PROVIDER"),
            std::env::var("EDGEQUAKE_MODEL"),
        ) {
            if !prov.is_empty() && !env_model.is_empty() {
                let model = model.unwrap_or(&env_model);
                return Self::named(&prov, model);
            }
        }

        if let Ok(openai_key) = std::env::var("OPENAI_API_KEY") {
            if !openai_key.is_empty() {
                return Self::named("openai", model.unwrap_or(DEFAULT_MODEL));
            }
        }

        Self::from_env(model)
    }

    /// Auto-detect a provider from whichever API key is present.
    pub fn from_env(model: Option<&str>) -> Result<Self, Pdf2SumError> {
        let (provider, _embedding) =
            ProviderFactory::from_env().map_err(|e| Pdf2SumError::ProviderNotConfigured {
                provider: "auto".to_string(),
                hint: format!(
                    "No LLM provider could be auto-detected from environment.\n\
                    Set OPENAI_API_KEY, ANTHROPIC_API_KEY, or configure a provider.\n\
                    Error: {}",
                    e
                ),
            })?;
        let model = model.unwrap_or("provider default").to_string();
        info!("Summariser ready (auto-detected provider, model {})", model);
        Ok(Self::with_provider(provider, model))
    }

    /// Wrap a pre-built provider, e.g. one with custom middleware.
    pub fn from_provider(provider: Arc<dyn LLMProvider>, model: impl Into<String>) -> Self {
        Self::with_provider(provider, model.into())
    }

    fn named(provider_name: &str, model: &str) -> Result<Self, Pdf2SumError> {
        let provider = ProviderFactory::create_llm_provider(provider_name, model).map_err(|e| {
            Pdf2SumError::ProviderNotConfigured {
                provider: provider_name.to_string(),
                hint: format!("{e}"),
            }
        })?;
        info!("Summariser ready ({} / {})", provider_name, model);
        Ok(Self::with_provider(provider, model.to_string()))
    }

    fn with_provider(provider: Arc<dyn LLMProvider>, model: String) -> Self {
        Self {
            provider,
            model,
            temperature: 0.3,
            system_prompt: None,
        }
    }

    /// Sampling temperature, clamped to 0.0–2.0. Default: 0.3.
    pub fn with_temperature(mut self, t: f32) -> Self {
        self.temperature = t.clamp(0.0, 2.0);
        self
    }

    /// Replace [`DEFAULT_SYSTEM_PROMPT`].
    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(prompt.into());
        self
    }

    /// Model identifier this summariser was created for.
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Release the provider. Dropping has the same effect; this makes the
    /// end of the summariser's lifetime explicit at the call site.
    pub fn dispose(self) {
        debug!("Disposing summariser for model {}", self.model);
    }

    fn build_options(&self, max_length: usize) -> CompletionOptions {
        CompletionOptions {
            temperature: Some(self.temperature),
            max_tokens: Some(max_length),
            ..Default::default()
        }
    }
}

#[async_trait]
impl Summarizer for LlmSummarizer {
    async fn summarize_one(
        &self,
        text: &str,
        max_length: usize,
        min_length: usize,
    ) -> Result<ChunkSummary, ChunkError> {
        if max_length == 0 || min_length > max_length {
            return Err(ChunkError::InvalidBounds {
                max_length,
                min_length,
            });
        }

        let system_prompt = self
            .system_prompt
            .as_deref()
            .unwrap_or(DEFAULT_SYSTEM_PROMPT);
        let messages = vec![
            ChatMessage::system(system_prompt),
            ChatMessage::user(chunk_message(text, max_length, min_length)),
        ];
        let options = self.build_options(max_length);

        let response = self
            .provider
            .chat(&messages, Some(&options))
            .await
            .map_err(|e| ChunkError::Capability {
                detail: format!("{}", e),
            })?;

        Ok(ChunkSummary {
            text: postprocess::clean_summary(&response.content),
            input_tokens: response.prompt_tokens,
            output_tokens: response.completion_tokens,
        })
    }
}
