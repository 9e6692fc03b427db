//! Integration tests for the chunking-and-aggregation pipeline.
//!
//! Every test drives the pipeline with an in-process [`Summarizer`] so no
//! network access or API key is needed.

use async_trait::async_trait;
use edgequake_llm::MockProvider;
use edgequake_pdf2sum::{
    summarize, summarize_stream, summarize_text, ChunkError, ChunkStrategy, ChunkSummary,
    ErrorKind, LlmSummarizer, Pdf2SumError, SummaryConfig, SummaryProgressCallback, Summarizer,
};
use futures::StreamExt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

// ── Test doubles ─────────────────────────────────────────────────────────────

/// Records every input and answers with a fixed function of it.
struct Recording<F: Fn(&str) -> String + Send + Sync> {
    calls: Mutex<Vec<String>>,
    answer: F,
}

impl<F: Fn(&str) -> String + Send + Sync> Recording<F> {
    fn new(answer: F) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            answer,
        }
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl<F: Fn(&str) -> String + Send + Sync> Summarizer for Recording<F> {
    async fn summarize_one(
        &self,
        text: &str,
        _max_length: usize,
        _min_length: usize,
    ) -> Result<ChunkSummary, ChunkError> {
        self.calls.lock().unwrap().push(text.to_string());
        Ok(ChunkSummary::new((self.answer)(text)))
    }
}

/// Fails every call whose input starts with `poison`.
struct FailOn {
    poison: char,
    retryable: bool,
    calls: AtomicUsize,
}

#[async_trait]
impl Summarizer for FailOn {
    async fn summarize_one(&self, text: &str, _: usize, _: usize) -> Result<ChunkSummary, ChunkError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if text.starts_with(self.poison) {
            if self.retryable {
                return Err(ChunkError::Capability {
                    detail: "503 Service Unavailable".into(),
                });
            }
            return Err(ChunkError::NotConfigured {
                detail: "no API key".into(),
            });
        }
        Ok(ChunkSummary::new(text.chars().take(1).collect::<String>()))
    }
}

/// Fails the first `failures` calls, then succeeds.
struct Flaky {
    failures: usize,
    calls: AtomicUsize,
}

#[async_trait]
impl Summarizer for Flaky {
    async fn summarize_one(&self, _: &str, _: usize, _: usize) -> Result<ChunkSummary, ChunkError> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst);
        if n < self.failures {
            return Err(ChunkError::Capability {
                detail: format!("transient failure #{}", n + 1),
            });
        }
        Ok(ChunkSummary::new("recovered"))
    }
}

/// Sleeps longer for earlier chunks so completion order is reversed.
struct SlowFirst;

#[async_trait]
impl Summarizer for SlowFirst {
    async fn summarize_one(&self, text: &str, _: usize, _: usize) -> Result<ChunkSummary, ChunkError> {
        let label: String = text.chars().take(1).collect();
        let rank = label.chars().next().map(|c| c as u64 - 'a' as u64).unwrap_or(0);
        tokio::time::sleep(Duration::from_millis(200u64.saturating_sub(rank * 40))).await;
        Ok(ChunkSummary::new(label))
    }
}

struct Hangs;

#[async_trait]
impl Summarizer for Hangs {
    async fn summarize_one(&self, _: &str, _: usize, _: usize) -> Result<ChunkSummary, ChunkError> {
        tokio::time::sleep(Duration::from_secs(10)).await;
        Ok(ChunkSummary::new("too late"))
    }
}

#[derive(Default)]
struct Counting {
    started: AtomicUsize,
    completed: AtomicUsize,
    errors: AtomicUsize,
    finished: Mutex<Option<(usize, usize)>>,
}

impl SummaryProgressCallback for Counting {
    fn on_chunk_start(&self, _: usize, _: usize) {
        self.started.fetch_add(1, Ordering::SeqCst);
    }
    fn on_chunk_complete(&self, _: usize, _: usize, _: usize) {
        self.completed.fetch_add(1, Ordering::SeqCst);
    }
    fn on_chunk_error(&self, _: usize, _: usize, _: &str) {
        self.errors.fetch_add(1, Ordering::SeqCst);
    }
    fn on_summary_complete(&self, total: usize, success: usize) {
        *self.finished.lock().unwrap() = Some((total, success));
    }
}

fn fast_config(chunk_size: usize) -> SummaryConfig {
    SummaryConfig::builder()
        .chunk_size(chunk_size)
        .retry_backoff_ms(1)
        .build()
        .unwrap()
}

/// Five 10-char chunks labelled a..e.
fn labelled_text() -> String {
    ['a', 'b', 'c', 'd', 'e']
        .iter()
        .map(|c| c.to_string().repeat(10))
        .collect()
}

// ── Aggregation ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn empty_text_makes_no_calls() {
    let s = Recording::new(|t| t.to_uppercase());
    let result = summarize("", &s, &fast_config(1024)).await.unwrap();
    assert_eq!(result.summary, "");
    assert!(result.chunks.is_empty());
    assert!(s.calls().is_empty());
}

#[tokio::test]
async fn single_chunk_passes_through_unchanged() {
    let s = Recording::new(|_| "  exact answer, untouched  ".to_string());
    let result = summarize("short document", &s, &fast_config(1024))
        .await
        .unwrap();
    assert_eq!(result.summary, "  exact answer, untouched  ");
    assert_eq!(s.calls(), vec!["short document".to_string()]);
}

#[tokio::test]
async fn long_text_is_split_and_joined_in_order() {
    let text: String = "x".repeat(2500);
    let s = Recording::new(|t| format!("S{}", t.chars().count()));

    let result = summarize(&text, &s, &fast_config(1024)).await.unwrap();

    let lens: Vec<usize> = s.calls().iter().map(|c| c.chars().count()).collect();
    assert_eq!(lens, vec![1024, 1024, 452]);
    assert_eq!(result.summary, "S1024 S1024 S452");

    let offsets: Vec<usize> = result.chunks.iter().map(|c| c.offset).collect();
    assert_eq!(offsets, vec![0, 1024, 2048]);
}

#[tokio::test]
async fn exact_multiple_has_no_empty_tail() {
    let text: String = "y".repeat(2048);
    let s = Recording::new(|_| "s".to_string());
    summarize(&text, &s, &fast_config(1024)).await.unwrap();
    assert_eq!(s.calls().len(), 2);
}

#[tokio::test]
async fn concurrent_results_keep_chunk_order() {
    let config = SummaryConfig::builder()
        .chunk_size(10)
        .concurrency(4)
        .build()
        .unwrap();

    let result = summarize(&labelled_text(), &SlowFirst, &config)
        .await
        .unwrap();
    assert_eq!(result.summary, "a b c d e");
}

#[tokio::test]
async fn summarize_text_uses_given_chunk_size() {
    let s = Recording::new(|t| t.chars().take(1).collect());
    let summary = summarize_text(&labelled_text(), &s, 100, 10, 10).await.unwrap();
    assert_eq!(summary, "a b c d e");
    assert_eq!(s.calls().len(), 5);
}

#[tokio::test]
async fn boundary_strategy_still_covers_whole_text() {
    let text = "One sentence here. Another sentence follows. And a third one ends it.";
    let config = SummaryConfig::builder()
        .chunk_size(30)
        .chunk_strategy(ChunkStrategy::Boundary)
        .build()
        .unwrap();
    let s = Recording::new(|t| t.to_string());

    summarize(text, &s, &config).await.unwrap();

    let calls = s.calls();
    assert_eq!(calls.concat(), text);
    assert!(calls.iter().all(|c| c.chars().count() <= 30));
}

// ── Failure handling ─────────────────────────────────────────────────────────

#[tokio::test]
async fn failing_chunk_aborts_with_its_offset() {
    let s = FailOn {
        poison: 'c',
        retryable: false,
        calls: AtomicUsize::new(0),
    };
    let err = summarize(&labelled_text(), &s, &fast_config(10))
        .await
        .unwrap_err();

    match err {
        Pdf2SumError::SummarizationFailed {
            chunk,
            offset,
            attempts,
            source,
        } => {
            assert_eq!(chunk, 2);
            assert_eq!(offset, 20);
            assert_eq!(attempts, 1);
            assert!(matches!(source, ChunkError::NotConfigured { .. }));
        }
        other => panic!("expected SummarizationFailed, got {other:?}"),
    }
}

#[tokio::test]
async fn non_retryable_error_is_not_retried() {
    let s = FailOn {
        poison: 'a',
        retryable: false,
        calls: AtomicUsize::new(0),
    };
    let config = SummaryConfig::builder()
        .chunk_size(10)
        .max_retries(5)
        .retry_backoff_ms(1)
        .build()
        .unwrap();

    assert!(summarize(&labelled_text(), &s, &config).await.is_err());
    assert_eq!(s.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn retryable_error_exhausts_retries() {
    let s = FailOn {
        poison: 'a',
        retryable: true,
        calls: AtomicUsize::new(0),
    };
    let config = SummaryConfig::builder()
        .chunk_size(10)
        .max_retries(2)
        .retry_backoff_ms(1)
        .build()
        .unwrap();

    let err = summarize(&labelled_text(), &s, &config).await.unwrap_err();
    assert!(matches!(
        err,
        Pdf2SumError::SummarizationFailed { attempts: 3, .. }
    ));
    assert_eq!(s.calls.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn transient_failure_recovers_with_single_partial() {
    let s = Flaky {
        failures: 2,
        calls: AtomicUsize::new(0),
    };
    let result = summarize("one chunk", &s, &fast_config(1024)).await.unwrap();

    assert_eq!(result.summary, "recovered");
    assert_eq!(result.chunks.len(), 1);
    assert_eq!(result.chunks[0].retries, 2);
}

#[tokio::test]
async fn slow_call_times_out() {
    let config = SummaryConfig::builder()
        .api_timeout_secs(1)
        .max_retries(0)
        .build()
        .unwrap();

    let err = summarize("anything", &Hangs, &config).await.unwrap_err();
    assert!(matches!(
        err,
        Pdf2SumError::SummarizationFailed {
            source: ChunkError::Timeout { secs: 1 },
            ..
        }
    ));
}

/// Answers with the bounds it was handed, e.g. "60/50".
struct EchoBounds;

#[async_trait]
impl Summarizer for EchoBounds {
    async fn summarize_one(&self, _: &str, max: usize, min: usize) -> Result<ChunkSummary, ChunkError> {
        Ok(ChunkSummary::new(format!("{min}/{max}")))
    }
}

#[tokio::test]
async fn length_bounds_reach_the_summarizer_verbatim() {
    // Inverted on purpose: interpreting the bounds is the summarizer's call.
    let summary = summarize_text("abc", &EchoBounds, 10, 50, 1024).await.unwrap();
    assert_eq!(summary, "50/10");

    let summary = summarize_text("abc", &EchoBounds, 0, 0, 1024).await.unwrap();
    assert_eq!(summary, "0/0");
}

#[tokio::test]
async fn empty_text_ignores_unusable_bounds() {
    let s = Recording::new(|t| t.to_string());
    let mut config = SummaryConfig::default();
    config.min_length = config.max_length + 1;

    let result = summarize("", &s, &config).await.unwrap();
    assert_eq!(result.summary, "");
    assert!(s.calls().is_empty());
}

#[tokio::test]
async fn llm_summarizer_reports_inverted_bounds_for_the_chunk() {
    let summarizer = LlmSummarizer::from_provider(Arc::new(MockProvider::new()), "mock-model");
    let config = SummaryConfig::builder()
        .max_length(10)
        .min_length(50)
        .build()
        .unwrap();

    let err = summarize("some text", &summarizer, &config)
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Summarization);
    match err {
        Pdf2SumError::SummarizationFailed {
            chunk,
            offset,
            attempts,
            source,
        } => {
            assert_eq!((chunk, offset, attempts), (0, 0, 1));
            assert!(matches!(
                source,
                ChunkError::InvalidBounds {
                    max_length: 10,
                    min_length: 50
                }
            ));
        }
        other => panic!("expected SummarizationFailed, got {other:?}"),
    }
}

#[tokio::test]
async fn llm_summarizer_cleans_the_model_answer() {
    let provider = Arc::new(MockProvider::new());
    provider.add_response("**Summary:** A short\nanswer.").await;
    let summarizer = LlmSummarizer::from_provider(provider, "mock-model");

    let result = summarize("some text", &summarizer, &fast_config(1024))
        .await
        .unwrap();
    assert_eq!(result.summary, "A short answer.");
}

// ── Progress ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn progress_callback_sees_every_chunk() {
    let cb = Arc::new(Counting::default());
    let config = SummaryConfig::builder()
        .chunk_size(10)
        .progress_callback(cb.clone())
        .build()
        .unwrap();
    let s = Recording::new(|t| t.to_string());

    summarize(&labelled_text(), &s, &config).await.unwrap();

    assert_eq!(cb.started.load(Ordering::SeqCst), 5);
    assert_eq!(cb.completed.load(Ordering::SeqCst), 5);
    assert_eq!(cb.errors.load(Ordering::SeqCst), 0);
    assert_eq!(*cb.finished.lock().unwrap(), Some((5, 5)));
}

#[tokio::test]
async fn progress_reports_leading_successes_on_failure() {
    let cb = Arc::new(Counting::default());
    let config = SummaryConfig::builder()
        .chunk_size(10)
        .retry_backoff_ms(1)
        .progress_callback(cb.clone())
        .build()
        .unwrap();
    let s = FailOn {
        poison: 'd',
        retryable: false,
        calls: AtomicUsize::new(0),
    };

    assert!(summarize(&labelled_text(), &s, &config).await.is_err());
    assert_eq!(cb.errors.load(Ordering::SeqCst), 1);
    assert_eq!(*cb.finished.lock().unwrap(), Some((5, 3)));
}

// ── Streaming ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn stream_yields_in_order_and_continues_past_errors() {
    let s = FailOn {
        poison: 'b',
        retryable: false,
        calls: AtomicUsize::new(0),
    };
    let text = labelled_text();
    let config = SummaryConfig::builder()
        .chunk_size(10)
        .concurrency(3)
        .build()
        .unwrap();

    let items: Vec<_> = summarize_stream(&text, &s, &config)
        .unwrap()
        .collect()
        .await;

    assert_eq!(items.len(), 5);
    assert!(items[1].is_err());
    let ok: Vec<String> = items
        .into_iter()
        .filter_map(Result::ok)
        .map(|r| r.summary)
        .collect();
    assert_eq!(ok, vec!["a", "c", "d", "e"]);
}

#[tokio::test]
async fn stream_of_empty_text_is_empty() {
    let s = Recording::new(|t| t.to_string());
    let config = SummaryConfig::default();
    let items: Vec<_> = summarize_stream("", &s, &config).unwrap().collect().await;
    assert!(items.is_empty());
}
