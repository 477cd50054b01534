use super::{ContextSnapshot, ContextUpdate, Result, SessionContext, SessionError};
use crate::models::{Message, Role};
use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use serde::Serialize;
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, info};

pub const DEFAULT_MAX_HISTORY: usize = 50;
pub const DEFAULT_TIMEOUT_SECS: i64 = 3600;

#[derive(Debug, Clone, Default, Serialize)]
pub struct SessionStats {
    pub message_count: u64,
    pub intent_distribution: HashMap<String, u64>,
    pub response_ratings: Vec<f64>,
}

#[derive(Debug)]
struct Session {
    session_id: String,
    user_id: Option<String>,
    created_at: DateTime<Utc>,
    last_activity: DateTime<Utc>,
    history: VecDeque<Message>,
    context: SessionContext,
    stats: SessionStats,
}

impl Session {
    fn new(session_id: &str, user_id: Option<&str>, capacity: usize) -> Self {
        let now = Utc::now();
        Self {
            session_id: session_id.to_string(),
            user_id: user_id.map(|id| id.to_string()),
            created_at: now,
            last_activity: now,
            history: VecDeque::with_capacity(capacity),
            context: SessionContext::default(),
            stats: SessionStats::default(),
        }
    }

    fn duration_minutes(&self) -> f64 {
        let seconds = (self.last_activity - self.created_at).num_milliseconds() as f64 / 1000.0;
        (seconds / 60.0 * 100.0).round() / 100.0
    }
}

/// Lightweight external view of a live session.
#[derive(Debug, Clone, Serialize)]
pub struct SessionSummary {
    pub session_id: String,
    pub user_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub last_activity: DateTime<Utc>,
    pub message_count: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct SessionStatsReport {
    pub message_count: u64,
    pub intent_distribution: HashMap<String, u64>,
    pub response_ratings: Vec<f64>,
    pub duration_minutes: f64,
    pub context_topics: usize,
    pub monuments_discussed: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct SessionExport {
    pub session_id: String,
    pub user_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub last_activity: DateTime<Utc>,
    pub duration_minutes: f64,
    pub message_history: Vec<Message>,
    pub context: ContextSnapshot,
    pub stats: SessionStatsReport,
}

#[derive(Debug, Clone, Serialize)]
pub struct MemoryStats {
    pub total_sessions_created: u64,
    pub active_sessions: usize,
    pub total_messages_processed: u64,
    pub messages_in_memory: usize,
    pub average_messages_per_session: f64,
}

/// Concurrent in-memory session store with bounded history and sliding
/// inactivity expiry. Mutations to one session key are serialized by the
/// map's entry locking; no critical section spans an await point.
pub struct SessionStore {
    sessions: DashMap<String, Session>,
    max_history: usize,
    timeout: Duration,
    total_sessions: AtomicU64,
    total_messages: AtomicU64,
}

impl SessionStore {
    pub fn new(max_history: usize, timeout_secs: i64) -> Self {
        info!(
            max_history = max_history,
            timeout_secs = timeout_secs,
            "Session store initialized"
        );
        Self {
            sessions: DashMap::new(),
            max_history,
            timeout: Duration::seconds(timeout_secs),
            total_sessions: AtomicU64::new(0),
            total_messages: AtomicU64::new(0),
        }
    }

    fn expired(&self, session: &Session, now: DateTime<Utc>) -> bool {
        now - session.last_activity > self.timeout
    }

    /// Lazy expiry check: removes the session if its inactivity window has
    /// passed. Returns whether an eviction happened.
    fn evict_if_expired(&self, session_id: &str) -> bool {
        let now = Utc::now();
        let is_expired = match self.sessions.get(session_id) {
            Some(session) => self.expired(&session, now),
            None => return false,
        };
        // The guard is dropped before removal; a concurrent add_message that
        // loses this race simply re-creates the session.
        if is_expired && self.sessions.remove(session_id).is_some() {
            info!(session_id = session_id, "Session expired");
        }
        is_expired
    }

    /// Idempotent create: an existing unexpired session is returned
    /// untouched. Returns whether a new session was allocated.
    pub fn create(&self, session_id: &str, user_id: Option<&str>) -> bool {
        self.evict_if_expired(session_id);
        let mut created = false;
        self.sessions.entry(session_id.to_string()).or_insert_with(|| {
            created = true;
            Session::new(session_id, user_id, self.max_history)
        });
        if created {
            self.total_sessions.fetch_add(1, Ordering::Relaxed);
            info!(session_id = session_id, "Created new session");
        }
        created
    }

    /// Summary of a live session; absent (and evicted) if expired.
    pub fn get(&self, session_id: &str) -> Option<SessionSummary> {
        self.evict_if_expired(session_id);
        self.sessions.get(session_id).map(|session| SessionSummary {
            session_id: session.session_id.clone(),
            user_id: session.user_id.clone(),
            created_at: session.created_at,
            last_activity: session.last_activity,
            message_count: session.history.len(),
        })
    }

    /// Append a message, auto-creating the session if absent or just
    /// expired. Oldest entry is dropped once the history is at capacity.
    /// Context and stats are updated from metadata and, for user messages,
    /// from keyword scanning of the content. Never fails: unknown or
    /// wrong-typed metadata is ignored.
    pub fn add_message(
        &self,
        session_id: &str,
        role: Role,
        content: &str,
        metadata: Option<HashMap<String, serde_json::Value>>,
    ) {
        self.evict_if_expired(session_id);

        let mut created = false;
        let mut session = self.sessions.entry(session_id.to_string()).or_insert_with(|| {
            created = true;
            Session::new(session_id, None, self.max_history)
        });
        if created {
            self.total_sessions.fetch_add(1, Ordering::Relaxed);
            info!(session_id = session_id, "Created new session");
        }

        let now = Utc::now();
        let metadata = metadata.unwrap_or_default();

        if session.history.len() >= self.max_history {
            session.history.pop_front();
        }
        session.history.push_back(Message {
            role,
            content: content.to_string(),
            timestamp: now,
            metadata: metadata.clone(),
        });
        session.last_activity = now;
        session.stats.message_count += 1;

        if role == Role::User {
            session.context.scan_user_text(content);
        }

        if let Some(intent) = metadata.get("intent").and_then(|value| value.as_str()) {
            *session
                .stats
                .intent_distribution
                .entry(intent.to_string())
                .or_insert(0) += 1;
        }
        if let Some(monument) = metadata.get("monument_id").and_then(|value| value.as_str()) {
            session.context.current_monument = Some(monument.to_string());
        }
        if let Some(location) = metadata.get("location").and_then(|value| value.as_str()) {
            session.context.current_location = Some(location.to_string());
        }
        if let Some(rating) = metadata.get("user_rating").and_then(|value| value.as_f64()) {
            session.stats.response_ratings.push(rating);
        }
        drop(session);

        self.total_messages.fetch_add(1, Ordering::Relaxed);
        debug!(session_id = session_id, role = role.as_str(), "Added message");
    }

    /// Conversation history, most-recent-last. Empty if the session is
    /// absent or expired. With `limit`, only the last `limit` entries.
    pub fn get_history(&self, session_id: &str, limit: Option<usize>) -> Vec<Message> {
        self.evict_if_expired(session_id);
        let Some(session) = self.sessions.get(session_id) else {
            return Vec::new();
        };
        let history = &session.history;
        let skip = match limit {
            Some(limit) => history.len().saturating_sub(limit),
            None => 0,
        };
        history.iter().skip(skip).cloned().collect()
    }

    /// Context snapshot; default (empty) context if absent.
    pub fn get_context(&self, session_id: &str) -> ContextSnapshot {
        self.evict_if_expired(session_id);
        self.sessions
            .get(session_id)
            .map(|session| session.context.snapshot())
            .unwrap_or_default()
    }

    /// Merge a partial context update into a live session.
    pub fn update_context(&self, session_id: &str, update: ContextUpdate) -> Result<()> {
        self.evict_if_expired(session_id);
        let Some(mut session) = self.sessions.get_mut(session_id) else {
            return Err(SessionError::NotFound(session_id.to_string()));
        };
        session.context.apply(update);
        session.last_activity = Utc::now();
        debug!(session_id = session_id, "Updated context");
        Ok(())
    }

    /// Remove every session whose inactivity window has passed.
    pub fn sweep_expired(&self) -> usize {
        let now = Utc::now();
        let before = self.sessions.len();
        self.sessions.retain(|_, session| !self.expired(session, now));
        let removed = before.saturating_sub(self.sessions.len());
        if removed > 0 {
            info!(removed = removed, "Cleaned up expired sessions");
        }
        removed
    }

    pub fn clear(&self, session_id: &str) -> bool {
        self.sessions.remove(session_id).is_some()
    }

    pub fn clear_all(&self) -> usize {
        let count = self.sessions.len();
        self.sessions.clear();
        info!(cleared = count, "Cleared all sessions");
        count
    }

    pub fn session_duration_minutes(&self, session_id: &str) -> Option<f64> {
        self.evict_if_expired(session_id);
        self.sessions
            .get(session_id)
            .map(|session| session.duration_minutes())
    }

    pub fn session_stats(&self, session_id: &str) -> Option<SessionStatsReport> {
        self.evict_if_expired(session_id);
        self.sessions.get(session_id).map(|session| SessionStatsReport {
            message_count: session.stats.message_count,
            intent_distribution: session.stats.intent_distribution.clone(),
            response_ratings: session.stats.response_ratings.clone(),
            duration_minutes: session.duration_minutes(),
            context_topics: session.context.topics.len(),
            monuments_discussed: session.context.monuments_discussed.len(),
        })
    }

    /// Full session snapshot for analysis or backup.
    pub fn export_session(&self, session_id: &str) -> Option<SessionExport> {
        self.evict_if_expired(session_id);
        self.sessions.get(session_id).map(|session| SessionExport {
            session_id: session.session_id.clone(),
            user_id: session.user_id.clone(),
            created_at: session.created_at,
            last_activity: session.last_activity,
            duration_minutes: session.duration_minutes(),
            message_history: session.history.iter().cloned().collect(),
            context: session.context.snapshot(),
            stats: SessionStatsReport {
                message_count: session.stats.message_count,
                intent_distribution: session.stats.intent_distribution.clone(),
                response_ratings: session.stats.response_ratings.clone(),
                duration_minutes: session.duration_minutes(),
                context_topics: session.context.topics.len(),
                monuments_discussed: session.context.monuments_discussed.len(),
            },
        })
    }

    /// Store-wide usage statistics. Sweeps expired sessions first so the
    /// active count is accurate.
    pub fn memory_stats(&self) -> MemoryStats {
        self.sweep_expired();
        let active = self.sessions.len();
        let in_memory: usize = self
            .sessions
            .iter()
            .map(|session| session.history.len())
            .sum();
        MemoryStats {
            total_sessions_created: self.total_sessions.load(Ordering::Relaxed),
            active_sessions: active,
            total_messages_processed: self.total_messages.load(Ordering::Relaxed),
            messages_in_memory: in_memory,
            average_messages_per_session: if active == 0 {
                0.0
            } else {
                in_memory as f64 / active as f64
            },
        }
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_HISTORY, DEFAULT_TIMEOUT_SECS)
    }
}

#[cfg(test)]
impl SessionStore {
    /// Push a session's last activity into the past to exercise expiry.
    fn backdate(&self, session_id: &str, secs: i64) {
        if let Some(mut session) = self.sessions.get_mut(session_id) {
            session.last_activity = Utc::now() - Duration::seconds(secs);
        }
    }
}
