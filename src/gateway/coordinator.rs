use super::rooms::{Outbound, Rooms};
use crate::lifecycle::{self, Effect, LifecycleEvent};
use crate::protocol::{ClientEvent, ServerEvent};
use crate::session::{ConnectionId, SessionRegistry, SessionStats, TranscriptFragment};
use crate::summarize::Summarizer;
use anyhow::{anyhow, Context, Result};
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{info, warn};

/// Result of asking a session to stop
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StopOutcome {
    /// Session moved to summarizing
    Started,
    /// Transcript was blank; the session completed without a summary
    NothingToSummarize,
    /// Session was already summarizing; request ignored
    AlreadyStopping,
    /// No such session; request ignored
    UnknownSession,
}

/// Work item for the coordinator task
#[derive(Debug)]
enum Command {
    Connect {
        connection: ConnectionId,
        outbound: Outbound,
    },
    Disconnect {
        connection: ConnectionId,
    },
    Client {
        connection: ConnectionId,
        event: ClientEvent,
    },
    Stop {
        session_id: String,
        transcript: Option<String>,
        reply: oneshot::Sender<StopOutcome>,
    },
    Stats {
        session_id: String,
        reply: oneshot::Sender<Option<SessionStats>>,
    },
    Transcript {
        session_id: String,
        reply: oneshot::Sender<Option<Vec<TranscriptFragment>>>,
    },
    /// Stop taking commands and exit once in-flight summaries are delivered
    Shutdown,
}

/// Summarization result posted back to the coordinator
struct Resolution {
    session_id: String,
    result: Result<String>,
}

/// Single task that owns the session registry and the room table
///
/// Every mutation happens inside `run`, one command at a time. The only
/// suspension point is the summarization call, which runs on a separate
/// task and re-enters the loop as a `Resolution`.
pub struct Coordinator {
    registry: SessionRegistry,
    rooms: Rooms,
    summarizer: Arc<dyn Summarizer>,
    commands: mpsc::UnboundedReceiver<Command>,
    resolutions_tx: mpsc::UnboundedSender<Resolution>,
    resolutions_rx: mpsc::UnboundedReceiver<Resolution>,
    pending_summaries: usize,
    accepting: bool,
}

impl Coordinator {
    pub fn new(summarizer: Arc<dyn Summarizer>) -> (Self, CoordinatorHandle) {
        let (commands_tx, commands) = mpsc::unbounded_channel();
        let (resolutions_tx, resolutions_rx) = mpsc::unbounded_channel();

        let coordinator = Self {
            registry: SessionRegistry::new(),
            rooms: Rooms::new(),
            summarizer,
            commands,
            resolutions_tx,
            resolutions_rx,
            pending_summaries: 0,
            accepting: true,
        };

        (coordinator, CoordinatorHandle { commands: commands_tx })
    }

    /// Create a coordinator and run it on its own task
    pub fn spawn(summarizer: Arc<dyn Summarizer>) -> (CoordinatorHandle, JoinHandle<()>) {
        let (coordinator, handle) = Self::new(summarizer);
        let task = tokio::spawn(coordinator.run());
        (handle, task)
    }

    /// Process commands until shutdown (or every handle is dropped) and no summary is in flight
    pub async fn run(mut self) {
        info!("Session coordinator started (summarizer: {})", self.summarizer.name());

        loop {
            let accepting = self.accepting;

            tokio::select! {
                command = self.commands.recv(), if accepting => match command {
                    Some(command) => self.process(command),
                    None => self.accepting = false,
                },
                Some(resolution) = self.resolutions_rx.recv() => {
                    self.pending_summaries -= 1;
                    self.dispatch(LifecycleEvent::SummaryResolved {
                        session_id: resolution.session_id,
                        result: resolution.result,
                    });
                }
            }

            if !self.accepting && self.pending_summaries == 0 {
                break;
            }
        }

        info!(
            "Session coordinator stopped ({} session(s) dropped)",
            self.registry.len()
        );
    }

    fn process(&mut self, command: Command) {
        match command {
            Command::Connect {
                connection,
                outbound,
            } => {
                info!("Client connected {}", connection);
                self.rooms.connect(connection, outbound);
            }
            Command::Disconnect { connection } => {
                info!("Client disconnected {}", connection);
                self.rooms.disconnect(&mut self.registry, connection);
            }
            Command::Client { connection, event } => self.on_client_event(connection, event),
            Command::Stop {
                session_id,
                transcript,
                reply,
            } => {
                let outcome = self.stop(session_id, transcript);
                let _ = reply.send(outcome);
            }
            Command::Stats { session_id, reply } => {
                let _ = reply.send(self.registry.get(&session_id).map(|s| s.stats()));
            }
            Command::Transcript { session_id, reply } => {
                let fragments = self
                    .registry
                    .get(&session_id)
                    .map(|s| s.transcript().fragments().to_vec());
                let _ = reply.send(fragments);
            }
            Command::Shutdown => {
                info!(
                    "Coordinator shutting down ({} summary(ies) pending)",
                    self.pending_summaries
                );
                self.accepting = false;
            }
        }
    }

    fn on_client_event(&mut self, connection: ConnectionId, event: ClientEvent) {
        match event {
            ClientEvent::JoinSession(session_id) => {
                self.rooms.join(&mut self.registry, connection, &session_id);
            }
            ClientEvent::TranscriptChunk(chunk) => self.dispatch(LifecycleEvent::Chunk {
                session_id: chunk.session_id,
                text: chunk.text,
            }),
            ClientEvent::StopSession(stop) => {
                self.stop(stop.session_id, stop.transcript);
            }
        }
    }

    fn stop(&mut self, session_id: String, transcript: Option<String>) -> StopOutcome {
        let outcome = match self.registry.get(&session_id) {
            None => StopOutcome::UnknownSession,
            Some(session) if !session.is_active() => StopOutcome::AlreadyStopping,
            Some(_) => StopOutcome::Started,
        };

        self.dispatch(LifecycleEvent::Terminate {
            session_id: session_id.clone(),
            transcript,
        });

        // A blank transcript completes and evicts within the same command
        if outcome == StopOutcome::Started && !self.registry.contains(&session_id) {
            return StopOutcome::NothingToSummarize;
        }
        outcome
    }

    fn dispatch(&mut self, event: LifecycleEvent) {
        let effects = lifecycle::handle(&mut self.registry, event);
        for effect in effects {
            self.apply(effect);
        }
    }

    fn apply(&mut self, effect: Effect) {
        match effect {
            Effect::Broadcast { session_id, event } => {
                self.rooms.broadcast(&self.registry, &session_id, &event);
            }
            Effect::Summarize {
                session_id,
                transcript,
            } => self.start_summary(session_id, transcript),
            Effect::Evict { session_id } => {
                self.registry.delete(&session_id);
            }
        }
    }

    fn start_summary(&mut self, session_id: String, transcript: String) {
        self.pending_summaries += 1;

        let summarizer = Arc::clone(&self.summarizer);
        let resolutions = self.resolutions_tx.clone();

        tokio::spawn(async move {
            // A panicking provider must still resolve the session
            let call = tokio::spawn(async move { summarizer.summarize(&transcript).await });
            let result = match call.await {
                Ok(result) => result,
                Err(e) => Err(anyhow!("Summarizer task failed: {}", e)),
            };

            if resolutions.send(Resolution { session_id, result }).is_err() {
                warn!("Coordinator gone before summary resolved");
            }
        });
    }
}

/// Cloneable front door to a running coordinator
#[derive(Clone)]
pub struct CoordinatorHandle {
    commands: mpsc::UnboundedSender<Command>,
}

impl CoordinatorHandle {
    fn submit(&self, command: Command) -> Result<()> {
        self.commands
            .send(command)
            .map_err(|_| anyhow!("Session coordinator is not running"))
    }

    /// Register a new connection and return its id and outbound event queue
    pub fn connect(&self) -> Result<(ConnectionId, mpsc::UnboundedReceiver<ServerEvent>)> {
        let connection = ConnectionId::new();
        let (outbound, events) = mpsc::unbounded_channel();
        self.submit(Command::Connect {
            connection,
            outbound,
        })?;
        Ok((connection, events))
    }

    /// Ask the coordinator to exit once pending summaries are broadcast
    ///
    /// Handles still held elsewhere (open sockets) do not keep it alive.
    pub fn shutdown(&self) -> Result<()> {
        self.submit(Command::Shutdown)
    }

    pub fn disconnect(&self, connection: ConnectionId) -> Result<()> {
        self.submit(Command::Disconnect { connection })
    }

    /// Route a client-originated event
    pub fn send(&self, connection: ConnectionId, event: ClientEvent) -> Result<()> {
        self.submit(Command::Client { connection, event })
    }

    /// Stop a session outside of any connection (HTTP control API)
    pub async fn stop_session(
        &self,
        session_id: impl Into<String>,
        transcript: Option<String>,
    ) -> Result<StopOutcome> {
        let (reply, rx) = oneshot::channel();
        self.submit(Command::Stop {
            session_id: session_id.into(),
            transcript,
            reply,
        })?;
        rx.await.context("Coordinator dropped stop request")
    }

    pub async fn session_stats(&self, session_id: impl Into<String>) -> Result<Option<SessionStats>> {
        let (reply, rx) = oneshot::channel();
        self.submit(Command::Stats {
            session_id: session_id.into(),
            reply,
        })?;
        rx.await.context("Coordinator dropped stats request")
    }

    pub async fn transcript(
        &self,
        session_id: impl Into<String>,
    ) -> Result<Option<Vec<TranscriptFragment>>> {
        let (reply, rx) = oneshot::channel();
        self.submit(Command::Transcript {
            session_id: session_id.into(),
            reply,
        })?;
        rx.await.context("Coordinator dropped transcript request")
    }
}
