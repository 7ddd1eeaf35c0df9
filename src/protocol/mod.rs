pub mod messages;

pub use messages::{
    ClientEvent, ServerEvent, StopSession, TranscriptChunk, EMPTY_TRANSCRIPT_MESSAGE,
    SUMMARIZING_STATUS, SUMMARY_ERROR_MESSAGE,
};
