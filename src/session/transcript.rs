use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single finalized piece of transcript text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptFragment {
    /// Trimmed, non-empty text
    pub text: String,

    /// When the server received this fragment
    pub received_at: DateTime<Utc>,
}

/// Append-only, arrival-ordered buffer of transcript fragments
#[derive(Debug, Clone, Default)]
pub struct Transcript {
    fragments: Vec<TranscriptFragment>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a fragment, returning false if it was blank
    pub fn push(&mut self, text: &str) -> bool {
        let text = text.trim();
        if text.is_empty() {
            return false;
        }

        self.fragments.push(TranscriptFragment {
            text: text.to_string(),
            received_at: Utc::now(),
        });
        true
    }

    /// All fragments joined with a single space, in arrival order
    pub fn joined(&self) -> String {
        self.fragments
            .iter()
            .map(|f| f.text.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Summarization input: a non-blank client override wins over the accumulated text
    pub fn snapshot(&self, client_override: Option<&str>) -> String {
        match client_override {
            Some(text) if !text.trim().is_empty() => text.to_string(),
            _ => self.joined(),
        }
    }

    pub fn fragments(&self) -> &[TranscriptFragment] {
        &self.fragments
    }

    pub fn len(&self) -> usize {
        self.fragments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }
}
