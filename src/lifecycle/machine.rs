use crate::protocol::{ServerEvent, EMPTY_TRANSCRIPT_MESSAGE, SUMMARY_ERROR_MESSAGE};
use crate::session::SessionRegistry;
use anyhow::Result;
use tracing::{debug, info, warn};

/// Input to the lifecycle state machine
#[derive(Debug)]
pub enum LifecycleEvent {
    /// A transcript chunk arrived for a session
    Chunk { session_id: String, text: String },

    /// A participant asked to stop the session
    Terminate {
        session_id: String,
        transcript: Option<String>,
    },

    /// The summarization provider finished for a session
    SummaryResolved {
        session_id: String,
        result: Result<String>,
    },
}

/// Side effect requested by the state machine
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Deliver an event to every current member of the session
    Broadcast { session_id: String, event: ServerEvent },

    /// Call the summarization provider and feed the result back as `SummaryResolved`
    Summarize { session_id: String, transcript: String },

    /// Remove the session from the registry
    Evict { session_id: String },
}

/// Apply one event to the registry and return the effects to perform
pub fn handle(registry: &mut SessionRegistry, event: LifecycleEvent) -> Vec<Effect> {
    match event {
        LifecycleEvent::Chunk { session_id, text } => {
            on_chunk(registry, &session_id, &text);
            Vec::new()
        }
        LifecycleEvent::Terminate {
            session_id,
            transcript,
        } => on_terminate(registry, session_id, transcript.as_deref()),
        LifecycleEvent::SummaryResolved { session_id, result } => {
            on_summary(registry, session_id, result)
        }
    }
}

fn on_chunk(registry: &mut SessionRegistry, session_id: &str, text: &str) {
    if registry.append(session_id, text) {
        let preview: String = text.trim().chars().take(50).collect();
        debug!("Stored transcript for {}: {}...", session_id, preview);
        return;
    }

    match registry.get(session_id) {
        None => debug!("Dropped chunk for unknown session {}", session_id),
        Some(session) if !session.is_active() => debug!(
            "Dropped chunk for session {} in state {:?}",
            session_id,
            session.state()
        ),
        Some(_) => {}
    }
}

fn on_terminate(
    registry: &mut SessionRegistry,
    session_id: String,
    client_transcript: Option<&str>,
) -> Vec<Effect> {
    let Some(session) = registry.get_mut(&session_id) else {
        warn!("Ignoring stop for unknown session {}", session_id);
        return Vec::new();
    };

    if !session.begin_summarizing() {
        info!("Ignoring duplicate stop for session {}", session_id);
        return Vec::new();
    }

    let transcript = session.transcript().snapshot(client_transcript);
    info!(
        "Stopping session {} ({} chars of transcript)",
        session_id,
        transcript.len()
    );

    let mut effects = vec![Effect::Broadcast {
        session_id: session_id.clone(),
        event: ServerEvent::summarizing(),
    }];

    if transcript.trim().is_empty() {
        info!("Session {} has no transcript, skipping summarization", session_id);
        session.terminate();
        effects.push(Effect::Broadcast {
            session_id: session_id.clone(),
            event: ServerEvent::complete(EMPTY_TRANSCRIPT_MESSAGE),
        });
        effects.push(Effect::Evict { session_id });
        return effects;
    }

    effects.push(Effect::Summarize {
        session_id,
        transcript,
    });
    effects
}

fn on_summary(
    registry: &mut SessionRegistry,
    session_id: String,
    result: Result<String>,
) -> Vec<Effect> {
    let Some(session) = registry.get_mut(&session_id) else {
        warn!("Summary resolved for unknown session {}", session_id);
        return Vec::new();
    };

    if !session.terminate() {
        warn!(
            "Summary resolved for session {} in state {:?}",
            session_id,
            session.state()
        );
        return Vec::new();
    }

    let summary = match result {
        Ok(summary) => {
            info!("Summary generated for {}", session_id);
            summary
        }
        Err(e) => {
            warn!("Error generating summary for {}: {:#}", session_id, e);
            SUMMARY_ERROR_MESSAGE.to_string()
        }
    };

    vec![
        Effect::Broadcast {
            session_id: session_id.clone(),
            event: ServerEvent::complete(summary),
        },
        Effect::Evict { session_id },
    ]
}
