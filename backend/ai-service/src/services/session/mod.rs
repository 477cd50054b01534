// ============================================
// Conversation Session Module
// ============================================
//
// In-memory conversation state for the AI guide:
// - bounded per-session message history (FIFO eviction)
// - derived context from keyword scanning and message metadata
// - sliding inactivity expiry, lazy on access plus an explicit sweep
//
// Sessions are owned exclusively by the store; callers only ever hold
// opaque session ids and receive snapshots.

mod context;
mod store;

pub use context::{ContextSnapshot, ContextUpdate, SessionContext};
pub use store::{
    MemoryStats, SessionExport, SessionStatsReport, SessionStore, SessionSummary,
};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("session not found: {0}")]
    NotFound(String),
}

pub type Result<T> = std::result::Result<T, SessionError>;
