// Re-export route modules
pub mod chat;
pub mod recommendations;
pub mod sessions;
pub mod stats;
