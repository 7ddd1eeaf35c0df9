use serde::{Deserialize, Serialize};

/// Status text broadcast when a session starts summarizing
pub const SUMMARIZING_STATUS: &str = "Generating summary...";

/// Summary placeholder used when the provider fails
pub const SUMMARY_ERROR_MESSAGE: &str = "Error generating summary. Please try again.";

/// Summary placeholder used when there is no transcript to summarize
pub const EMPTY_TRANSCRIPT_MESSAGE: &str =
    "No transcript available to summarize. Please speak during the recording.";

/// Event sent by a client over the WebSocket
///
/// Frames look like `{"event": "join-session", "data": "s1"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "kebab-case")]
pub enum ClientEvent {
    /// Join the fan-out group of a session, creating the session if needed
    JoinSession(String),
    /// Incremental transcript text for a session
    TranscriptChunk(TranscriptChunk),
    /// Terminate a session and request its summary
    StopSession(StopSession),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranscriptChunk {
    pub session_id: String,
    /// Missing text is treated the same as blank text
    #[serde(default)]
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StopSession {
    pub session_id: String,
    /// Client-assembled transcript; overrides the server-side one when non-blank
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transcript: Option<String>,
}

/// Event broadcast by the server to every member of a session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "kebab-case")]
pub enum ServerEvent {
    /// Informational, emitted when the session enters summarizing
    ProcessingStatus { status: String },
    /// Terminal event carrying the summary or a placeholder
    ProcessingComplete { summary: String },
}

impl ServerEvent {
    pub fn summarizing() -> Self {
        ServerEvent::ProcessingStatus {
            status: SUMMARIZING_STATUS.to_string(),
        }
    }

    pub fn complete(summary: impl Into<String>) -> Self {
        ServerEvent::ProcessingComplete {
            summary: summary.into(),
        }
    }

    pub fn is_complete(&self) -> bool {
        matches!(self, ServerEvent::ProcessingComplete { .. })
    }
}
