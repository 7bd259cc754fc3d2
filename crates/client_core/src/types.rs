use std::sync::Arc;

use serde::{Deserialize, Serialize};
use shared::domain::{Item, SessionId};

#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub id: SessionId,
    pub query: String,
    pub title: String,
    pub results: Arc<[Item]>,
    pub is_revealing: bool,
}

impl Session {
    pub fn new(
        id: SessionId,
        query: impl Into<String>,
        title: impl Into<String>,
        results: &[Item],
    ) -> Self {
        Self {
            id,
            query: query.into(),
            title: title.into(),
            results: Arc::from(results),
            is_revealing: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TranscriptRole {
    User,
    System,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscriptEntry {
    pub role: TranscriptRole,
    pub content: String,
}

impl TranscriptEntry {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: TranscriptRole::User,
            content: content.into(),
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: TranscriptRole::System,
            content: content.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSummary {
    pub id: SessionId,
    pub title: String,
    pub result_count: usize,
    pub is_active: bool,
    pub is_revealing: bool,
}

#[derive(Debug, Clone)]
pub struct ClientSnapshot {
    pub pending: bool,
    pub error: Option<String>,
    pub input: String,
    pub transcript: Vec<TranscriptEntry>,
    pub results: Arc<[Item]>,
    pub active_session_id: Option<SessionId>,
    pub sessions: Vec<SessionSummary>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoredReason {
    EmptyQuery,
    RequestPending,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    Ignored(IgnoredReason),
    Created { session_id: SessionId, result_count: usize },
    Failed { message: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientEvent {
    QueryStarted {
        query: String,
    },
    SessionCreated {
        session_id: SessionId,
        title: String,
        result_count: usize,
    },
    QueryFailed {
        message: String,
    },
    SessionRenamed {
        session_id: SessionId,
        title: String,
    },
    SessionDeleted {
        session_id: SessionId,
        was_active: bool,
    },
    ActiveSessionChanged(Option<SessionId>),
    RevealFinished {
        session_id: SessionId,
    },
}
