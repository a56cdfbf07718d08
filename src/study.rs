use crate::api::LearningService;
use crate::error::{SessionError, SessionResult};
use crate::logger;
use crate::models::{SessionEvent, StudyItem};
use std::fmt;
use std::sync::Arc;
use tokio::sync::RwLock;
use tokio::sync::mpsc::UnboundedSender;

/// Where a flashcard study session stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StudyState {
    Loading,
    Presenting(usize),
    Flipped(usize),
    Complete,
    /// The service had nothing to study. Terminal.
    Empty,
}

impl fmt::Display for StudyState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StudyState::Loading => write!(f, "loading"),
            StudyState::Presenting(i) => write!(f, "presenting card {}", i + 1),
            StudyState::Flipped(i) => write!(f, "showing the back of card {}", i + 1),
            StudyState::Complete => write!(f, "complete"),
            StudyState::Empty => write!(f, "empty"),
        }
    }
}

#[derive(Debug)]
struct StudyInner {
    state: StudyState,
    items: Vec<StudyItem>,
    generation: u64,
    in_flight: bool,
    alive: bool,
    events: Option<UnboundedSender<SessionEvent>>,
}

impl StudyInner {
    fn guard(&self, op: &'static str) -> SessionResult<()> {
        if !self.alive {
            return Err(SessionError::state(op, "abandoned"));
        }
        if self.in_flight {
            return Err(SessionError::state(op, "a request is in flight"));
        }
        Ok(())
    }

    fn is_current(&self, ticket: u64) -> bool {
        self.alive && self.generation == ticket
    }
}

/// Snapshot for the host screen.
#[derive(Debug, Clone, PartialEq)]
pub struct StudyView {
    pub state: StudyState,
    pub item: Option<StudyItem>,
    pub position: usize,
    pub total: usize,
    pub progress: f64,
    pub busy: bool,
}

/// Flashcard study over a queue fixed at start.
///
/// Cloning yields another handle to the same session.
#[derive(Clone)]
pub struct StudySession {
    inner: Arc<RwLock<StudyInner>>,
    service: Arc<dyn LearningService>,
}

impl StudySession {
    pub fn new(
        service: Arc<dyn LearningService>,
        events: Option<UnboundedSender<SessionEvent>>,
    ) -> Self {
        Self {
            inner: Arc::new(RwLock::new(StudyInner {
                state: StudyState::Loading,
                items: Vec::new(),
                generation: 0,
                in_flight: false,
                alive: true,
                events,
            })),
            service,
        }
    }

    /// Fetches the queue. Fails with `EmptyQueue` (terminal) when there
    /// is nothing to study; a transport failure leaves the session loading
    /// so `start` can be retried.
    pub async fn start(&self) -> SessionResult<()> {
        let ticket = {
            let mut inner = self.inner.write().await;
            inner.guard("start")?;
            if inner.state != StudyState::Loading {
                return Err(SessionError::state("start", inner.state.to_string()));
            }
            inner.generation += 1;
            inner.in_flight = true;
            inner.generation
        };
        logger::log("Study: fetching queue");

        let response = self.service.fetch_study_queue().await;

        let mut inner = self.inner.write().await;
        if !inner.is_current(ticket) {
            logger::log("Study: discarding stale queue response");
            return Err(SessionError::Superseded);
        }
        inner.in_flight = false;
        match response {
            Err(e) => {
                logger::log(&format!("Study: queue fetch failed: {}", e));
                Err(SessionError::Transport(e))
            }
            Ok(items) if items.is_empty() => {
                logger::log("Study: queue is empty");
                inner.state = StudyState::Empty;
                Err(SessionError::EmptyQueue)
            }
            Ok(items) => {
                logger::log(&format!("Study: {} cards queued", items.len()));
                inner.items = items;
                inner.state = StudyState::Presenting(0);
                Ok(())
            }
        }
    }

    /// Turns the current card over, or back again.
    pub async fn flip(&self) -> SessionResult<StudyState> {
        let mut inner = self.inner.write().await;
        inner.guard("flip")?;
        inner.state = match inner.state {
            StudyState::Presenting(i) => StudyState::Flipped(i),
            StudyState::Flipped(i) => StudyState::Presenting(i),
            other => {
                logger::log(&format!("Study: rejected flip while {}", other));
                return Err(SessionError::state("flip", other.to_string()));
            }
        };
        Ok(inner.state)
    }

    /// Marks the flipped card as learned and advances once the service
    /// acknowledges. On failure the card stays flipped for a retry.
    pub async fn confirm(&self) -> SessionResult<StudyState> {
        let (ticket, index, word) = {
            let mut inner = self.inner.write().await;
            inner.guard("confirm")?;
            let StudyState::Flipped(index) = inner.state else {
                logger::log(&format!("Study: rejected confirm while {}", inner.state));
                return Err(SessionError::state("confirm", inner.state.to_string()));
            };
            let word = inner.items[index].word.clone();
            inner.generation += 1;
            inner.in_flight = true;
            (inner.generation, index, word)
        };
        logger::log(&format!("Study: confirming '{}'", word));

        let response = self.service.confirm_study_item(&word).await;

        let mut inner = self.inner.write().await;
        if !inner.is_current(ticket) {
            logger::log(&format!("Study: discarding stale confirmation of '{}'", word));
            return Err(SessionError::Superseded);
        }
        inner.in_flight = false;
        if let Err(e) = response {
            logger::log(&format!("Study: confirmation of '{}' failed: {}", word, e));
            return Err(SessionError::Transport(e));
        }

        let next = index + 1;
        if next == inner.items.len() {
            inner.state = StudyState::Complete;
            logger::log("Study: session complete");
            if let Some(events) = &inner.events {
                let _ = events.send(SessionEvent::StudyComplete);
            }
        } else {
            inner.state = StudyState::Presenting(next);
        }
        Ok(inner.state)
    }

    /// The host screen went away; later responses must not touch the session.
    pub async fn abandon(&self) {
        let mut inner = self.inner.write().await;
        if inner.alive {
            logger::log("Study: abandoned");
        }
        inner.alive = false;
        inner.generation += 1;
    }

    pub async fn state(&self) -> StudyState {
        self.inner.read().await.state
    }

    pub async fn progress(&self) -> f64 {
        let inner = self.inner.read().await;
        progress_of(inner.state, inner.items.len())
    }

    pub async fn view(&self) -> StudyView {
        let inner = self.inner.read().await;
        let position = match inner.state {
            StudyState::Presenting(i) | StudyState::Flipped(i) => i,
            StudyState::Complete => inner.items.len(),
            StudyState::Loading | StudyState::Empty => 0,
        };
        let item = match inner.state {
            StudyState::Presenting(i) | StudyState::Flipped(i) => inner.items.get(i).cloned(),
            _ => None,
        };
        StudyView {
            state: inner.state,
            item,
            position,
            total: inner.items.len(),
            progress: progress_of(inner.state, inner.items.len()),
            busy: inner.in_flight,
        }
    }
}

fn progress_of(state: StudyState, total: usize) -> f64 {
    match state {
        StudyState::Presenting(i) | StudyState::Flipped(i) if total > 0 => i as f64 / total as f64,
        StudyState::Complete => 1.0,
        _ => 0.0,
    }
}
