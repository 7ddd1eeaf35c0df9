//! External summarization provider
//!
//! The lifecycle controller only sees the `Summarizer` trait; the Gemini
//! client is the production implementation.

pub mod gemini;

pub use gemini::{GeminiSummarizer, DEFAULT_BASE_URL, DEFAULT_MODEL};

use anyhow::Result;

/// Text-generation provider that turns a transcript into a summary
///
/// Implementations own their timeout policy. Errors are converted into a
/// placeholder summary by the caller, never retried.
#[async_trait::async_trait]
pub trait Summarizer: Send + Sync {
    /// Summarize a non-blank transcript
    async fn summarize(&self, transcript: &str) -> Result<String>;

    /// Provider name for logging
    fn name(&self) -> &str;
}
