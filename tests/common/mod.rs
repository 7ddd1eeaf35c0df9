// Shared test doubles for the integration tests
#![allow(dead_code)]

use anyhow::{bail, Result};
use scribe_live::ServerEvent;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::{mpsc, Semaphore};

/// How the fake provider answers
#[derive(Clone, Copy)]
pub enum Reply {
    Echo,
    Fail,
    Panic,
}

/// Summarizer that records its inputs and can be held until released
pub struct FakeSummarizer {
    reply: Reply,
    calls: Mutex<Vec<String>>,
    gate: Option<Arc<Semaphore>>,
}

impl FakeSummarizer {
    pub fn echo() -> Arc<Self> {
        Arc::new(Self::with_reply(Reply::Echo))
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self::with_reply(Reply::Fail))
    }

    pub fn panicking() -> Arc<Self> {
        Arc::new(Self::with_reply(Reply::Panic))
    }

    /// Echo summarizer that blocks until `gate` receives a permit
    pub fn gated() -> (Arc<Self>, Arc<Semaphore>) {
        let gate = Arc::new(Semaphore::new(0));
        let summarizer = Self {
            gate: Some(Arc::clone(&gate)),
            ..Self::with_reply(Reply::Echo)
        };
        (Arc::new(summarizer), gate)
    }

    fn with_reply(reply: Reply) -> Self {
        Self {
            reply,
            calls: Mutex::new(Vec::new()),
            gate: None,
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

pub fn summary_of(transcript: &str) -> String {
    format!("summary of: {}", transcript)
}

#[async_trait::async_trait]
impl scribe_live::Summarizer for FakeSummarizer {
    async fn summarize(&self, transcript: &str) -> Result<String> {
        self.calls.lock().unwrap().push(transcript.to_string());

        if let Some(gate) = &self.gate {
            gate.acquire().await?.forget();
        }

        match self.reply {
            Reply::Echo => Ok(summary_of(transcript)),
            Reply::Fail => bail!("provider unavailable"),
            Reply::Panic => panic!("provider blew up"),
        }
    }

    fn name(&self) -> &str {
        "fake"
    }
}

/// Wait for the next event on a connection, failing the test after 2s
pub async fn next_event(events: &mut mpsc::UnboundedReceiver<ServerEvent>) -> ServerEvent {
    tokio::time::timeout(Duration::from_secs(2), events.recv())
        .await
        .expect("timed out waiting for server event")
        .expect("outbound queue closed")
}
