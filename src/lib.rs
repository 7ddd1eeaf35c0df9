pub mod config;
pub mod gateway;
pub mod http;
pub mod lifecycle;
pub mod protocol;
pub mod session;
pub mod summarize;

pub use config::Config;
pub use gateway::{Coordinator, CoordinatorHandle, StopOutcome};
pub use http::{create_router, AppState};
pub use protocol::{ClientEvent, ServerEvent};
pub use session::{ConnectionId, SessionRegistry, SessionState, SessionStats, TranscriptFragment};
pub use summarize::{GeminiSummarizer, Summarizer};
