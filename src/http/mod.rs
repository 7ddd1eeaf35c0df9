//! HTTP and WebSocket server
//!
//! - GET /ws - Live session events (join, chunks, stop, summaries)
//! - POST /sessions/:id/stop - Stop a session and summarize it
//! - GET /sessions/:id/status - Query session status
//! - GET /sessions/:id/transcript - Get accumulated transcript
//! - GET /health - Health check

mod handlers;
mod routes;
mod socket;
mod state;

pub use routes::create_router;
pub use state::AppState;
