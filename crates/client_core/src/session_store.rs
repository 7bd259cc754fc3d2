use shared::domain::SessionId;
use tracing::debug;

use crate::types::{Session, SessionSummary};

/// Issues session ids from the wall clock in milliseconds, bumped so that ids
/// are strictly increasing within the process.
#[derive(Debug, Default)]
pub struct SessionClock {
    last_issued: Option<i64>,
}

impl SessionClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_id(&mut self) -> SessionId {
        self.next_id_at(chrono::Utc::now().timestamp_millis())
    }

    pub fn next_id_at(&mut self, now_millis: i64) -> SessionId {
        let id = match self.last_issued {
            Some(last) if now_millis <= last => last + 1,
            _ => now_millis,
        };
        self.last_issued = Some(id);
        SessionId(id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenameOutcome {
    Renamed,
    Unchanged,
    NotFound,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted { was_active: bool },
    NotFound,
}

/// Ordered, newest-first collection of sessions plus the active reference.
#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: Vec<Session>,
    active: Option<SessionId>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create_and_activate(&mut self, session: Session) -> SessionId {
        let id = session.id;
        debug_assert!(self.get(id).is_none(), "session id {id} issued twice");
        self.sessions.insert(0, session);
        self.active = Some(id);
        id
    }

    pub fn rename(&mut self, id: SessionId, new_title: &str) -> RenameOutcome {
        let new_title = new_title.trim();
        let Some(session) = self.sessions.iter_mut().find(|s| s.id == id) else {
            return RenameOutcome::NotFound;
        };
        if new_title.is_empty() || new_title == session.title {
            return RenameOutcome::Unchanged;
        }
        session.title = new_title.to_string();
        // a rename always shows the final title
        session.is_revealing = false;
        RenameOutcome::Renamed
    }

    pub fn delete(&mut self, id: SessionId) -> DeleteOutcome {
        let Some(position) = self.sessions.iter().position(|s| s.id == id) else {
            return DeleteOutcome::NotFound;
        };
        self.sessions.remove(position);
        let was_active = self.active == Some(id);
        if was_active {
            self.active = None;
        }
        DeleteOutcome::Deleted { was_active }
    }

    pub fn select(&mut self, id: SessionId) -> Option<&Session> {
        let session = self.sessions.iter().find(|s| s.id == id)?;
        self.active = Some(id);
        Some(session)
    }

    pub fn clear_active(&mut self) {
        self.active = None;
    }

    pub fn mark_revealed(&mut self, id: SessionId) -> bool {
        match self.sessions.iter_mut().find(|s| s.id == id) {
            Some(session) if session.is_revealing => {
                session.is_revealing = false;
                true
            }
            Some(_) => false,
            None => {
                debug!(session_id = id.0, "reveal finished for a deleted session");
                false
            }
        }
    }

    pub fn get(&self, id: SessionId) -> Option<&Session> {
        self.sessions.iter().find(|s| s.id == id)
    }

    pub fn active_id(&self) -> Option<SessionId> {
        self.active
    }

    pub fn active(&self) -> Option<&Session> {
        self.active.and_then(|id| self.get(id))
    }

    pub fn sessions(&self) -> &[Session] {
        &self.sessions
    }

    pub fn nth(&self, position: usize) -> Option<&Session> {
        position.checked_sub(1).and_then(|index| self.sessions.get(index))
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    pub fn summaries(&self) -> Vec<SessionSummary> {
        self.sessions
            .iter()
            .map(|session| SessionSummary {
                id: session.id,
                title: session.title.clone(),
                result_count: session.results.len(),
                is_active: self.active == Some(session.id),
                is_revealing: session.is_revealing,
            })
            .collect()
    }
}

#[cfg(test)]
#[path = "tests/session_store_tests.rs"]
mod tests;
