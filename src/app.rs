use crate::api::LearningService;
use crate::collector::AnswerCollector;
use crate::config::DisplayConfig;
use crate::error::{ApiError, SessionError, SessionResult};
use crate::input::{KeyContext, UiCommand};
use crate::logger;
use crate::models::{
    AppState, ExitReason, LearnerStats, QuestionKind, QuizQuestion, QuizResult, SessionEvent,
};
use crate::quiz::{QuizSession, QuizState, QuizView};
use crate::study::{StudySession, StudyState, StudyView};
use std::sync::Arc;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

pub const MENU_ITEMS: [&str; 3] = ["Study new words", "Review", "Quit"];

const RETRY_LOAD: &str = "r to retry";
const RETRY_CONFIRM: &str = "Enter to retry";
const RETRY_SUBMIT: &str = "Ctrl+S to resend";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AssembleRow {
    #[default]
    Pool,
    Assembled,
}

/// Highlight position inside the quiz answer area. Reset with every question.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QuizCursor {
    pub choice: usize,
    pub row: AssembleRow,
    pub token: usize,
}

/// Outcomes of network-bound operations, delivered back to the event loop.
#[derive(Debug)]
pub enum AppMsg {
    Stats(Result<LearnerStats, ApiError>),
    StudyStarted(SessionResult<()>),
    StudyConfirmed(SessionResult<StudyState>),
    QuizLoaded(SessionResult<QuizQuestion>),
    QuizSubmitted(SessionResult<QuizResult>),
}

pub struct App {
    pub state: AppState,
    pub display: DisplayConfig,
    pub menu_index: usize,
    pub stats: Option<LearnerStats>,
    pub study: Option<StudySession>,
    pub study_view: Option<StudyView>,
    pub quiz: Option<QuizSession>,
    pub quiz_view: Option<QuizView>,
    pub cursor: QuizCursor,
    /// One-line notice for recoverable failures.
    pub notice: Option<String>,
    /// Full-screen message, e.g. nothing to review.
    pub message: Option<String>,
    pub should_quit: bool,
    service: Arc<dyn LearningService>,
    tx: UnboundedSender<AppMsg>,
    events_tx: UnboundedSender<SessionEvent>,
    events_rx: UnboundedReceiver<SessionEvent>,
}

impl App {
    pub fn new(
        service: Arc<dyn LearningService>,
        display: DisplayConfig,
    ) -> (Self, UnboundedReceiver<AppMsg>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let app = Self {
            state: AppState::Menu,
            display,
            menu_index: 0,
            stats: None,
            study: None,
            study_view: None,
            quiz: None,
            quiz_view: None,
            cursor: QuizCursor::default(),
            notice: None,
            message: None,
            should_quit: false,
            service,
            tx,
            events_tx,
            events_rx,
        };
        (app, rx)
    }

    pub fn load_stats(&self) {
        let service = self.service.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let _ = tx.send(AppMsg::Stats(service.fetch_learner_stats().await));
        });
    }

    pub fn context(&self) -> KeyContext {
        match self.state {
            AppState::Menu => KeyContext::Menu,
            AppState::Message => KeyContext::Message,
            AppState::Study => match self.study_view.as_ref().map(|v| v.state) {
                Some(StudyState::Presenting(_)) | Some(StudyState::Flipped(_)) => KeyContext::Study,
                Some(StudyState::Complete) | Some(StudyState::Empty) => KeyContext::Message,
                Some(StudyState::Loading) | None => KeyContext::Waiting,
            },
            AppState::Quiz => match self.quiz_view.as_ref().map(|v| &v.state) {
                Some(QuizState::Presenting { question, .. }) => match question {
                    QuizQuestion::MultipleChoice { .. } => KeyContext::QuizChoice,
                    QuizQuestion::Input { .. } => KeyContext::QuizInput,
                    QuizQuestion::Assemble { .. } => KeyContext::QuizAssemble,
                },
                Some(QuizState::Answered { .. }) => KeyContext::QuizResult,
                Some(QuizState::Exited(_)) => KeyContext::Message,
                Some(QuizState::Loading) | None => KeyContext::Waiting,
            },
        }
    }

    pub fn collector(&self) -> Option<&AnswerCollector> {
        match self.quiz_view.as_ref().map(|v| &v.state) {
            Some(QuizState::Presenting { collector, .. }) => Some(collector),
            _ => None,
        }
    }

    pub async fn handle(&mut self, command: UiCommand) {
        match command {
            UiCommand::Ignore => return,
            UiCommand::Quit => {
                self.leave_sessions().await;
                self.should_quit = true;
            }
            UiCommand::MenuUp => self.menu_index = self.menu_index.saturating_sub(1),
            UiCommand::MenuDown => {
                if self.menu_index < MENU_ITEMS.len() - 1 {
                    self.menu_index += 1;
                }
            }
            UiCommand::MenuSelect => match self.menu_index {
                0 => self.open_study(),
                1 => self.open_quiz(),
                _ => self.should_quit = true,
            },
            UiCommand::Back => self.back().await,
            UiCommand::Flip => {
                if let Some(study) = &self.study {
                    let outcome = study.flip().await.map(|_| ());
                    self.report(outcome, None);
                }
            }
            UiCommand::Confirm => self.spawn_confirm(),
            UiCommand::Retry => self.retry(),
            UiCommand::CursorPrev => self.move_cursor(-1),
            UiCommand::CursorNext => self.move_cursor(1),
            UiCommand::SwitchRow => {
                self.cursor.row = match self.cursor.row {
                    AssembleRow::Pool => AssembleRow::Assembled,
                    AssembleRow::Assembled => AssembleRow::Pool,
                };
                self.cursor.token = 0;
            }
            UiCommand::Activate => self.activate().await,
            UiCommand::Type(c) => self.edit(move |col| col.push_char(c)).await,
            UiCommand::Backspace => self.edit(|col| col.pop_char()).await,
            UiCommand::Submit => self.spawn_submit(),
            UiCommand::NextQuestion => self.spawn_next(),
        }
        self.refresh().await;
    }

    pub async fn apply(&mut self, msg: AppMsg) {
        match msg {
            AppMsg::Stats(Ok(stats)) => self.stats = Some(stats),
            AppMsg::Stats(Err(e)) => logger::log(&format!("Learner stats unavailable: {}", e)),
            AppMsg::StudyStarted(outcome) => self.report(outcome, Some(RETRY_LOAD)),
            AppMsg::StudyConfirmed(outcome) => {
                self.report(outcome.map(|_| ()), Some(RETRY_CONFIRM))
            }
            AppMsg::QuizLoaded(Ok(_)) => {
                self.cursor = QuizCursor::default();
                self.notice = None;
            }
            AppMsg::QuizLoaded(Err(SessionError::NoReviewableItems(detail))) => {
                self.message = Some(format!("No learned items to review! {}", detail));
            }
            AppMsg::QuizLoaded(Err(e)) => self.report(Err(e), Some(RETRY_LOAD)),
            AppMsg::QuizSubmitted(outcome) => {
                self.report(outcome.map(|_| ()), Some(RETRY_SUBMIT))
            }
        }
        self.drain_events();
        self.refresh().await;
    }

    /// Pulls fresh snapshots from the live controllers for drawing.
    pub async fn refresh(&mut self) {
        self.study_view = match &self.study {
            Some(study) => Some(study.view().await),
            None => None,
        };
        self.quiz_view = match &self.quiz {
            Some(quiz) => Some(quiz.view().await),
            None => None,
        };
    }

    fn drain_events(&mut self) {
        while let Ok(event) = self.events_rx.try_recv() {
            logger::log(&format!("Session event: {:?}", event));
            match event {
                SessionEvent::StudyComplete => {}
                SessionEvent::QuizExited(ExitReason::NoReviewableItems) => {
                    self.quiz = None;
                    self.state = AppState::Message;
                }
                SessionEvent::QuizExited(ExitReason::UserExit) => {
                    self.quiz = None;
                    self.state = AppState::Menu;
                }
            }
        }
    }

    /// `retry` names the key that repeats the failed request on the
    /// screen the user is left on.
    fn report(&mut self, outcome: SessionResult<()>, retry: Option<&str>) {
        match outcome {
            Ok(()) => self.notice = None,
            Err(SessionError::Superseded) => {}
            // terminal outcomes have their own screens
            Err(e) if e.is_terminal() => {}
            Err(e @ SessionError::Transport(_)) => {
                self.notice = Some(match retry {
                    Some(hint) => format!("{} ({})", e, hint),
                    None => e.to_string(),
                })
            }
            Err(e) => self.notice = Some(e.to_string()),
        }
    }

    fn open_study(&mut self) {
        let study = StudySession::new(self.service.clone(), Some(self.events_tx.clone()));
        self.study = Some(study.clone());
        self.state = AppState::Study;
        self.notice = None;
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let _ = tx.send(AppMsg::StudyStarted(study.start().await));
        });
    }

    fn open_quiz(&mut self) {
        self.quiz = Some(QuizSession::new(
            self.service.clone(),
            Some(self.events_tx.clone()),
        ));
        self.state = AppState::Quiz;
        self.notice = None;
        self.message = None;
        self.spawn_next();
    }

    fn spawn_confirm(&self) {
        if let Some(study) = self.study.clone() {
            let tx = self.tx.clone();
            tokio::spawn(async move {
                let _ = tx.send(AppMsg::StudyConfirmed(study.confirm().await));
            });
        }
    }

    fn spawn_next(&mut self) {
        if let Some(quiz) = self.quiz.clone() {
            self.cursor = QuizCursor::default();
            let tx = self.tx.clone();
            tokio::spawn(async move {
                let _ = tx.send(AppMsg::QuizLoaded(quiz.next().await));
            });
        }
    }

    fn spawn_submit(&self) {
        if let Some(quiz) = self.quiz.clone() {
            let tx = self.tx.clone();
            tokio::spawn(async move {
                let _ = tx.send(AppMsg::QuizSubmitted(quiz.submit_collected().await));
            });
        }
    }

    fn retry(&mut self) {
        match self.state {
            AppState::Study => {
                if let Some(study) = self.study.clone() {
                    let tx = self.tx.clone();
                    tokio::spawn(async move {
                        let _ = tx.send(AppMsg::StudyStarted(study.start().await));
                    });
                }
            }
            AppState::Quiz => self.spawn_next(),
            _ => {}
        }
    }

    async fn back(&mut self) {
        match self.state {
            AppState::Menu => {}
            AppState::Study | AppState::Quiz | AppState::Message => {
                self.leave_sessions().await;
                self.drain_events();
                self.state = AppState::Menu;
                self.message = None;
                self.notice = None;
                self.load_stats();
            }
        }
    }

    async fn leave_sessions(&mut self) {
        if let Some(study) = self.study.take() {
            study.abandon().await;
        }
        if let Some(quiz) = self.quiz.take() {
            // already exited sessions just report a state error here
            let _ = quiz.exit().await;
            quiz.abandon().await;
        }
    }

    fn move_cursor(&mut self, delta: isize) {
        let Some(collector) = self.collector() else {
            return;
        };
        let is_choice = matches!(collector, AnswerCollector::Choice { .. });
        let (len, slot) = match collector {
            AnswerCollector::Choice { options, .. } => (options.len(), self.cursor.choice),
            AnswerCollector::Assemble { pool, assembled } => match self.cursor.row {
                AssembleRow::Pool => (pool.len(), self.cursor.token),
                AssembleRow::Assembled => (assembled.len(), self.cursor.token),
            },
            AnswerCollector::Input { .. } => return,
        };
        if len == 0 {
            return;
        }
        let moved = (slot as isize + delta).clamp(0, len as isize - 1) as usize;
        if is_choice {
            self.cursor.choice = moved;
        } else {
            self.cursor.token = moved;
        }
    }

    async fn activate(&mut self) {
        let cursor = self.cursor;
        let kind = match self.collector() {
            Some(AnswerCollector::Choice { .. }) => QuestionKind::MultipleChoice,
            Some(AnswerCollector::Assemble { .. }) => QuestionKind::Assemble,
            _ => return,
        };
        match kind {
            QuestionKind::MultipleChoice => {
                self.edit(move |col| col.select(cursor.choice)).await;
            }
            QuestionKind::Assemble => {
                self.edit(move |col| match cursor.row {
                    AssembleRow::Pool => col.assemble(cursor.token),
                    AssembleRow::Assembled => col.unassemble(cursor.token),
                })
                .await;
                self.refresh().await;
                let remaining = match (self.collector(), cursor.row) {
                    (Some(col), AssembleRow::Pool) => col.pool().len(),
                    (Some(col), AssembleRow::Assembled) => col.assembled().len(),
                    (None, _) => 0,
                };
                self.cursor.token = self.cursor.token.min(remaining.saturating_sub(1));
            }
            QuestionKind::Input => {}
        }
    }

    async fn edit<F>(&mut self, edit: F)
    where
        F: FnOnce(&mut AnswerCollector) -> SessionResult<()>,
    {
        let Some(quiz) = &self.quiz else {
            return;
        };
        let outcome = quiz.with_collector(edit).await.and_then(|inner| inner);
        self.report(outcome, None);
    }
}
