use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde_json::Value;
use shared::{
    domain::{Item, SessionId},
    protocol::{RecommendationRequest, ResponseEnvelope},
};
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use crate::{
    backend::RecommendationBackend,
    config::ClientSettings,
    error::RecommendError,
    normalizer::{derive_title, normalize},
    session_store::{DeleteOutcome, RenameOutcome, SessionClock, SessionStore},
    types::{
        ClientEvent, ClientSnapshot, IgnoredReason, Session, SubmitOutcome, TranscriptEntry,
    },
};

pub const FAILURE_TRANSCRIPT: &str =
    "❌ Failed to get recommendations. Please check if the API is running.";

struct ControllerState {
    store: SessionStore,
    clock: SessionClock,
    pending: bool,
    error: Option<String>,
    input: String,
    transcript: Vec<TranscriptEntry>,
    results: Arc<[Item]>,
}

impl ControllerState {
    fn new() -> Self {
        Self {
            store: SessionStore::new(),
            clock: SessionClock::new(),
            pending: false,
            error: None,
            input: String::new(),
            transcript: Vec::new(),
            results: empty_results(),
        }
    }

    fn clear_display(&mut self) {
        self.results = empty_results();
        self.transcript.clear();
        self.error = None;
        self.input.clear();
    }
}

fn empty_results() -> Arc<[Item]> {
    Arc::from(Vec::new())
}

/// Drives one recommendation request at a time and owns the session history.
///
/// State lives behind a plain mutex that is never held across the backend
/// call, so `submit` can be raced from several tasks and only the first one
/// reaches the backend.
pub struct QueryController {
    backend: Arc<dyn RecommendationBackend>,
    title_word_limit: usize,
    state: Mutex<ControllerState>,
    events: broadcast::Sender<ClientEvent>,
}

/// Returns the controller to idle however `submit` exits, including when its
/// future is dropped mid-request.
struct InFlight<'a> {
    controller: &'a QueryController,
    armed: bool,
}

impl InFlight<'_> {
    /// Goes idle inside an update the caller already holds the lock for, so
    /// events emitted afterwards observe an idle controller.
    fn settle(mut self, state: &mut ControllerState) {
        state.pending = false;
        state.input.clear();
        self.armed = false;
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if self.armed {
            let mut state = self.controller.lock();
            state.pending = false;
            state.input.clear();
        }
    }
}

impl QueryController {
    pub fn new(backend: Arc<dyn RecommendationBackend>) -> Arc<Self> {
        Self::with_settings(backend, &ClientSettings::default())
    }

    pub fn with_settings(
        backend: Arc<dyn RecommendationBackend>,
        settings: &ClientSettings,
    ) -> Arc<Self> {
        let (events, _) = broadcast::channel(256);
        Arc::new(Self {
            backend,
            title_word_limit: settings.title_word_limit,
            state: Mutex::new(ControllerState::new()),
            events,
        })
    }

    fn lock(&self) -> MutexGuard<'_, ControllerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn emit(&self, event: ClientEvent) {
        let _ = self.events.send(event);
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<ClientEvent> {
        self.events.subscribe()
    }

    pub fn set_input(&self, text: impl Into<String>) {
        self.lock().input = text.into();
    }

    pub fn input(&self) -> String {
        self.lock().input.clone()
    }

    pub fn is_pending(&self) -> bool {
        self.lock().pending
    }

    pub fn error(&self) -> Option<String> {
        self.lock().error.clone()
    }

    pub async fn submit_input(&self) -> SubmitOutcome {
        let text = self.input();
        self.submit(&text).await
    }

    pub async fn submit(&self, query_text: &str) -> SubmitOutcome {
        let query = query_text.to_string();
        let trimmed = query.trim();
        {
            let mut state = self.lock();
            if trimmed.is_empty() {
                debug!("ignoring empty query");
                return SubmitOutcome::Ignored(IgnoredReason::EmptyQuery);
            }
            if state.pending {
                debug!("ignoring query while a request is in flight");
                return SubmitOutcome::Ignored(IgnoredReason::RequestPending);
            }
            state.pending = true;
            state.error = None;
            state.transcript.push(TranscriptEntry::user(query.clone()));
        }
        let in_flight = InFlight {
            controller: self,
            armed: true,
        };

        info!(query = %trimmed, "requesting recommendations");
        self.emit(ClientEvent::QueryStarted {
            query: query.clone(),
        });

        let request = RecommendationRequest {
            query: trimmed.to_string(),
        };
        match self
            .backend
            .recommend(&request)
            .await
            .and_then(accept_envelope)
        {
            Ok(data) => self.complete(in_flight, &query, &data),
            Err(err) => self.fail(in_flight, &err),
        }
    }

    fn complete(&self, in_flight: InFlight<'_>, query: &str, data: &Value) -> SubmitOutcome {
        let normalized = normalize(data);
        let title = normalized
            .suggested_title
            .unwrap_or_else(|| derive_title(query, self.title_word_limit));
        let result_count = normalized.items.len();

        let session_id = {
            let mut state = self.lock();
            let session_id = state.clock.next_id();
            let session = Session::new(session_id, query, title.clone(), &normalized.items);
            state.results = Arc::clone(&session.results);
            state.store.create_and_activate(session);
            state.transcript.push(TranscriptEntry::system(format!(
                "Found {result_count} recommendations for \"{query}\"."
            )));
            in_flight.settle(&mut state);
            session_id
        };

        info!(session_id = session_id.0, result_count, %title, "session created");
        self.emit(ClientEvent::SessionCreated {
            session_id,
            title,
            result_count,
        });
        self.emit(ClientEvent::ActiveSessionChanged(Some(session_id)));
        SubmitOutcome::Created {
            session_id,
            result_count,
        }
    }

    fn fail(&self, in_flight: InFlight<'_>, err: &RecommendError) -> SubmitOutcome {
        let message = err.user_message();
        warn!(error = %message, transport = err.is_transport(), "recommendation request failed");
        {
            let mut state = self.lock();
            state.error = Some(message.clone());
            state
                .transcript
                .push(TranscriptEntry::system(FAILURE_TRANSCRIPT));
            in_flight.settle(&mut state);
        }
        self.emit(ClientEvent::QueryFailed {
            message: message.clone(),
        });
        SubmitOutcome::Failed { message }
    }

    pub fn rename(&self, session_id: SessionId, new_title: &str) -> RenameOutcome {
        let outcome = self.lock().store.rename(session_id, new_title);
        if outcome == RenameOutcome::Renamed {
            self.emit(ClientEvent::SessionRenamed {
                session_id,
                title: new_title.trim().to_string(),
            });
        }
        outcome
    }

    pub fn delete(&self, session_id: SessionId) -> DeleteOutcome {
        let outcome = {
            let mut state = self.lock();
            let outcome = state.store.delete(session_id);
            if let DeleteOutcome::Deleted { was_active: true } = outcome {
                state.clear_display();
            }
            outcome
        };
        if let DeleteOutcome::Deleted { was_active } = outcome {
            info!(session_id = session_id.0, was_active, "session deleted");
            self.emit(ClientEvent::SessionDeleted {
                session_id,
                was_active,
            });
            if was_active {
                self.emit(ClientEvent::ActiveSessionChanged(None));
            }
        }
        outcome
    }

    pub fn select(&self, session_id: SessionId) -> bool {
        let selected = {
            let mut state = self.lock();
            let results = state
                .store
                .select(session_id)
                .map(|session| Arc::clone(&session.results));
            match results {
                Some(results) => {
                    state.results = results;
                    true
                }
                None => false,
            }
        };
        if selected {
            self.emit(ClientEvent::ActiveSessionChanged(Some(session_id)));
        }
        selected
    }

    pub fn new_chat(&self) {
        {
            let mut state = self.lock();
            state.store.clear_active();
            state.clear_display();
        }
        self.emit(ClientEvent::ActiveSessionChanged(None));
    }

    pub fn reveal_target(&self, session_id: SessionId) -> Option<String> {
        self.lock()
            .store
            .get(session_id)
            .filter(|session| session.is_revealing)
            .map(|session| session.title.clone())
    }

    pub fn finish_reveal(&self, session_id: SessionId) -> bool {
        let finished = self.lock().store.mark_revealed(session_id);
        if finished {
            self.emit(ClientEvent::RevealFinished { session_id });
        }
        finished
    }

    pub fn session(&self, session_id: SessionId) -> Option<Session> {
        self.lock().store.get(session_id).cloned()
    }

    pub fn session_at(&self, position: usize) -> Option<Session> {
        self.lock().store.nth(position).cloned()
    }

    pub fn session_count(&self) -> usize {
        self.lock().store.len()
    }

    pub fn active_session_id(&self) -> Option<SessionId> {
        self.lock().store.active_id()
    }

    pub fn results(&self) -> Arc<[Item]> {
        Arc::clone(&self.lock().results)
    }

    pub fn snapshot(&self) -> ClientSnapshot {
        let state = self.lock();
        ClientSnapshot {
            pending: state.pending,
            error: state.error.clone(),
            input: state.input.clone(),
            transcript: state.transcript.clone(),
            results: Arc::clone(&state.results),
            active_session_id: state.store.active_id(),
            sessions: state.store.summaries(),
        }
    }
}

fn accept_envelope(envelope: ResponseEnvelope) -> Result<Value, RecommendError> {
    if envelope.success {
        Ok(envelope.data)
    } else {
        Err(RecommendError::Rejected(envelope.error))
    }
}

#[cfg(test)]
#[path = "tests/controller_tests.rs"]
mod tests;
