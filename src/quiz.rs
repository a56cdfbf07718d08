use crate::api::LearningService;
use crate::collector::AnswerCollector;
use crate::error::{ApiError, SessionError, SessionResult};
use crate::logger;
use crate::models::{Answer, ExitReason, QuizQuestion, QuizResult, SessionEvent};
use std::fmt;
use std::sync::Arc;
use tokio::sync::RwLock;
use tokio::sync::mpsc::UnboundedSender;

#[derive(Debug, Clone, PartialEq)]
pub enum QuizState {
    /// Waiting for (or about to request) the next question.
    Loading,
    Presenting {
        question: QuizQuestion,
        collector: AnswerCollector,
    },
    Answered {
        question: QuizQuestion,
        result: QuizResult,
    },
    Exited(ExitReason),
}

impl fmt::Display for QuizState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuizState::Loading => write!(f, "loading"),
            QuizState::Presenting { question, .. } => {
                write!(f, "presenting {}", question.question_id())
            }
            QuizState::Answered { question, .. } => {
                write!(f, "showing the result of {}", question.question_id())
            }
            QuizState::Exited(_) => write!(f, "exited"),
        }
    }
}

/// Running totals for the session summary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QuizTally {
    pub answered: u32,
    pub correct: u32,
    pub xp: u32,
    pub gems: u32,
}

impl QuizTally {
    fn record(&mut self, result: &QuizResult) {
        // amounts come from the server; totals stop at the ceiling
        self.answered = self.answered.saturating_add(1);
        if result.correct {
            self.correct = self.correct.saturating_add(1);
        }
        self.xp = self.xp.saturating_add(result.xp_gained);
        self.gems = self.gems.saturating_add(result.gems_awarded);
    }
}

#[derive(Debug)]
struct QuizInner {
    state: QuizState,
    /// Bumped by every `next`, `exit` and `abandon`; a response is applied
    /// only if the generation it was issued under is still current.
    generation: u64,
    submitting: bool,
    alive: bool,
    tally: QuizTally,
    events: Option<UnboundedSender<SessionEvent>>,
}

impl QuizInner {
    fn is_current(&self, ticket: u64) -> bool {
        self.alive && self.generation == ticket
    }

    fn enter_exited(&mut self, reason: ExitReason) {
        self.state = QuizState::Exited(reason);
        self.generation += 1;
        self.submitting = false;
        if let Some(events) = &self.events {
            let _ = events.send(SessionEvent::QuizExited(reason));
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct QuizView {
    pub state: QuizState,
    pub tally: QuizTally,
    pub progress: f64,
    pub busy: bool,
}

/// Review loop: request a question, collect an answer, show the result.
///
/// Cloning yields another handle to the same session.
#[derive(Clone)]
pub struct QuizSession {
    inner: Arc<RwLock<QuizInner>>,
    service: Arc<dyn LearningService>,
}

impl QuizSession {
    pub fn new(
        service: Arc<dyn LearningService>,
        events: Option<UnboundedSender<SessionEvent>>,
    ) -> Self {
        Self {
            inner: Arc::new(RwLock::new(QuizInner {
                state: QuizState::Loading,
                generation: 0,
                submitting: false,
                alive: true,
                tally: QuizTally::default(),
                events,
            })),
            service,
        }
    }

    /// Requests a question. Allowed while loading (a newer call supersedes
    /// an older one still in flight) and after a result was shown.
    pub async fn next(&self) -> SessionResult<QuizQuestion> {
        let ticket = {
            let mut inner = self.inner.write().await;
            if !inner.alive {
                return Err(SessionError::state("next", "abandoned"));
            }
            match inner.state {
                QuizState::Loading | QuizState::Answered { .. } => {}
                ref other => {
                    logger::log(&format!("Quiz: rejected next while {}", other));
                    return Err(SessionError::state("next", other.to_string()));
                }
            }
            inner.generation += 1;
            inner.state = QuizState::Loading;
            inner.generation
        };
        logger::log(&format!("Quiz: requesting question (request {})", ticket));

        let response = self.service.fetch_quiz_question().await;

        let mut inner = self.inner.write().await;
        if !inner.is_current(ticket) {
            logger::log(&format!("Quiz: discarding stale response to request {}", ticket));
            return Err(SessionError::Superseded);
        }
        match response {
            Ok(question) => {
                logger::log(&format!(
                    "Quiz: presenting {} ({})",
                    question.question_id(),
                    question.kind().label()
                ));
                inner.state = QuizState::Presenting {
                    collector: AnswerCollector::for_question(&question),
                    question: question.clone(),
                };
                Ok(question)
            }
            Err(ApiError::NotFound(detail)) => {
                logger::log(&format!("Quiz: nothing to review: {}", detail));
                inner.enter_exited(ExitReason::NoReviewableItems);
                Err(SessionError::NoReviewableItems(detail))
            }
            Err(e) => {
                logger::log(&format!("Quiz: question fetch failed: {}", e));
                Err(SessionError::Transport(e))
            }
        }
    }

    /// Sends `answer` for the presented question. The answer shape must
    /// match the question variant; validation failures never reach the
    /// service. At most one submission per question is in flight.
    pub async fn submit(&self, answer: Answer) -> SessionResult<QuizResult> {
        let (ticket, question_id, wire) = {
            let mut inner = self.inner.write().await;
            if !inner.alive {
                return Err(SessionError::state("submit", "abandoned"));
            }
            let QuizState::Presenting { question, .. } = &inner.state else {
                logger::log(&format!("Quiz: rejected submit while {}", inner.state));
                return Err(SessionError::state("submit", inner.state.to_string()));
            };
            if inner.submitting {
                return Err(SessionError::state("submit", "a submission is in flight"));
            }
            let wire = wire_answer(question, &answer)?;
            let question_id = question.question_id().to_string();
            inner.submitting = true;
            (inner.generation, question_id, wire)
        };
        logger::log(&format!("Quiz: submitting '{}' for {}", wire, question_id));

        let response = self.service.submit_quiz_answer(&question_id, &wire).await;

        let mut inner = self.inner.write().await;
        if !inner.is_current(ticket) {
            logger::log(&format!("Quiz: discarding stale result for {}", question_id));
            return Err(SessionError::Superseded);
        }
        inner.submitting = false;
        let result = match response {
            Ok(result) => result,
            Err(e) => {
                logger::log(&format!("Quiz: submission for {} failed: {}", question_id, e));
                return Err(SessionError::Transport(e));
            }
        };

        let question = match std::mem::replace(&mut inner.state, QuizState::Loading) {
            QuizState::Presenting { question, .. } => question,
            other => {
                inner.state = other;
                return Err(SessionError::Superseded);
            }
        };
        logger::log(&format!(
            "Quiz: {} answered {}, +{} xp",
            question_id,
            if result.correct { "correctly" } else { "incorrectly" },
            result.xp_gained
        ));
        inner.tally.record(&result);
        inner.state = QuizState::Answered {
            question,
            result: result.clone(),
        };
        Ok(result)
    }

    /// Submits whatever the current collector holds.
    pub async fn submit_collected(&self) -> SessionResult<QuizResult> {
        let answer = {
            let inner = self.inner.read().await;
            match &inner.state {
                QuizState::Presenting { collector, .. } => collector.answer()?,
                other => return Err(SessionError::state("submit", other.to_string())),
            }
        };
        self.submit(answer).await
    }

    /// Edits the collector of the presented question.
    pub async fn with_collector<R>(
        &self,
        edit: impl FnOnce(&mut AnswerCollector) -> R,
    ) -> SessionResult<R> {
        let mut inner = self.inner.write().await;
        if inner.submitting {
            return Err(SessionError::state("edit answer", "a submission is in flight"));
        }
        match &mut inner.state {
            QuizState::Presenting { collector, .. } => Ok(edit(collector)),
            other => Err(SessionError::state("edit answer", other.to_string())),
        }
    }

    /// User-initiated exit. Makes no service call.
    pub async fn exit(&self) -> SessionResult<()> {
        let mut inner = self.inner.write().await;
        if let QuizState::Exited(_) = inner.state {
            return Err(SessionError::state("exit", "exited"));
        }
        logger::log("Quiz: user exit");
        inner.enter_exited(ExitReason::UserExit);
        Ok(())
    }

    /// The host screen went away; later responses must not touch the session.
    pub async fn abandon(&self) {
        let mut inner = self.inner.write().await;
        if inner.alive {
            logger::log("Quiz: abandoned");
        }
        inner.alive = false;
        inner.generation += 1;
    }

    pub async fn state(&self) -> QuizState {
        self.inner.read().await.state.clone()
    }

    pub async fn tally(&self) -> QuizTally {
        self.inner.read().await.tally
    }

    pub async fn progress(&self) -> f64 {
        progress_of(&self.inner.read().await.state)
    }

    pub async fn view(&self) -> QuizView {
        let inner = self.inner.read().await;
        QuizView {
            state: inner.state.clone(),
            tally: inner.tally,
            progress: progress_of(&inner.state),
            busy: inner.submitting || inner.state == QuizState::Loading,
        }
    }
}

/// Per-question progress: nothing until the result is in.
fn progress_of(state: &QuizState) -> f64 {
    match state {
        QuizState::Answered { .. } | QuizState::Exited(_) => 1.0,
        QuizState::Loading | QuizState::Presenting { .. } => 0.0,
    }
}

fn wire_answer(question: &QuizQuestion, answer: &Answer) -> SessionResult<String> {
    match (question, answer) {
        (QuizQuestion::MultipleChoice { options, .. }, Answer::Text(choice)) => {
            if options.iter().any(|option| option == choice) {
                Ok(choice.clone())
            } else {
                Err(SessionError::Validation(format!(
                    "'{}' is not one of the options",
                    choice
                )))
            }
        }
        (QuizQuestion::Input { .. }, Answer::Text(text)) => {
            let trimmed = text.trim();
            if trimmed.is_empty() {
                Err(SessionError::Validation("answer is empty".to_string()))
            } else {
                Ok(trimmed.to_string())
            }
        }
        (QuizQuestion::Assemble { .. }, Answer::Tokens(tokens)) => {
            if tokens.is_empty() {
                Err(SessionError::Validation("no tokens assembled".to_string()))
            } else {
                Ok(answer.to_wire())
            }
        }
        (question, _) => Err(SessionError::Validation(format!(
            "answer shape does not fit a {} question",
            question.kind().label()
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::service::StubService;
    use crate::models::QuestionPrompt;
    use tokio::sync::mpsc;

    fn prompt(id: &str) -> QuestionPrompt {
        QuestionPrompt {
            question_id: id.to_string(),
            prompt_text: format!("prompt for {}", id),
            word: Some("猫".to_string()),
            kana: Some("ねこ".to_string()),
            romaji: None,
        }
    }

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn input(id: &str) -> QuizQuestion {
        QuizQuestion::Input { prompt: prompt(id) }
    }

    fn choice(id: &str) -> QuizQuestion {
        QuizQuestion::MultipleChoice {
            prompt: prompt(id),
            options: strings(&["cat", "dog", "fish", "bird"]),
        }
    }

    fn assemble(id: &str) -> QuizQuestion {
        QuizQuestion::Assemble {
            prompt: prompt(id),
            tokens: strings(&["猫", "が", "好き"]),
        }
    }

    fn result(correct: bool) -> QuizResult {
        QuizResult {
            correct,
            correct_answers: vec!["cat".to_string()],
            explanation: Some("猫 (ねこ) means 'cat'".to_string()),
            xp_gained: if correct { 10 } else { 0 },
            gems_awarded: if correct { 1 } else { 0 },
        }
    }

    fn session(stub: &Arc<StubService>) -> QuizSession {
        QuizSession::new(stub.clone(), None)
    }

    #[tokio::test]
    async fn test_assembled_answer_is_sent_as_space_joined_string() {
        let stub = Arc::new(StubService::new());
        stub.push_question(Ok(assemble("s:1")));
        stub.push_result(Ok(result(true)));
        let quiz = session(&stub);

        quiz.next().await.unwrap();
        for _ in 0..3 {
            quiz.with_collector(|c| c.assemble(0)).await.unwrap().unwrap();
        }
        let outcome = quiz.submit_collected().await.unwrap();

        assert!(outcome.correct);
        assert_eq!(
            *stub.submitted.lock().unwrap(),
            vec![("s:1".to_string(), "猫 が 好き".to_string())]
        );
        assert!(matches!(quiz.state().await, QuizState::Answered { .. }));
    }

    #[tokio::test]
    async fn test_second_next_supersedes_first_when_resolved_out_of_order() {
        let stub = Arc::new(StubService::new().gated_questions());
        let quiz = session(&stub);

        let first = {
            let quiz = quiz.clone();
            tokio::spawn(async move { quiz.next().await })
        };
        while stub.question_calls() < 1 {
            tokio::task::yield_now().await;
        }
        let second = {
            let quiz = quiz.clone();
            tokio::spawn(async move { quiz.next().await })
        };
        while stub.question_calls() < 2 {
            tokio::task::yield_now().await;
        }

        // the newer request resolves first, the stale one afterwards
        stub.resolve_question(1, Ok(input("q-new")));
        assert_eq!(second.await.unwrap().unwrap(), input("q-new"));
        stub.resolve_question(0, Ok(input("q-old")));
        assert_eq!(first.await.unwrap(), Err(SessionError::Superseded));

        match quiz.state().await {
            QuizState::Presenting { question, .. } => assert_eq!(question.question_id(), "q-new"),
            other => panic!("unexpected state {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_stale_response_arriving_first_is_still_discarded() {
        let stub = Arc::new(StubService::new().gated_questions());
        let quiz = session(&stub);

        let first = {
            let quiz = quiz.clone();
            tokio::spawn(async move { quiz.next().await })
        };
        while stub.question_calls() < 1 {
            tokio::task::yield_now().await;
        }
        let second = {
            let quiz = quiz.clone();
            tokio::spawn(async move { quiz.next().await })
        };
        while stub.question_calls() < 2 {
            tokio::task::yield_now().await;
        }

        stub.resolve_question(0, Ok(input("q-old")));
        assert_eq!(first.await.unwrap(), Err(SessionError::Superseded));
        assert_eq!(quiz.state().await, QuizState::Loading);

        stub.resolve_question(1, Ok(input("q-new")));
        assert!(second.await.unwrap().is_ok());
        match quiz.state().await {
            QuizState::Presenting { question, .. } => assert_eq!(question.question_id(), "q-new"),
            other => panic!("unexpected state {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_empty_input_never_reaches_service() {
        let stub = Arc::new(StubService::new());
        stub.push_question(Ok(input("q1")));
        let quiz = session(&stub);
        quiz.next().await.unwrap();

        quiz.with_collector(|c| c.set_text("   ")).await.unwrap().unwrap();
        let err = quiz.submit_collected().await.unwrap_err();
        assert!(matches!(err, SessionError::Validation(_)));

        let err = quiz.submit(Answer::Text(String::new())).await.unwrap_err();
        assert!(matches!(err, SessionError::Validation(_)));

        assert_eq!(stub.submit_calls(), 0);
        assert!(matches!(quiz.state().await, QuizState::Presenting { .. }));
    }

    #[tokio::test]
    async fn test_mismatched_answer_shape_is_a_validation_error() {
        let stub = Arc::new(StubService::new());
        stub.push_question(Ok(choice("q1")));
        let quiz = session(&stub);
        quiz.next().await.unwrap();

        let err = quiz.submit(Answer::Tokens(strings(&["cat"]))).await.unwrap_err();
        assert!(matches!(err, SessionError::Validation(_)));
        let err = quiz.submit(Answer::Text("lion".to_string())).await.unwrap_err();
        assert!(matches!(err, SessionError::Validation(_)));
        assert_eq!(stub.submit_calls(), 0);
    }

    #[tokio::test]
    async fn test_input_answer_is_trimmed_before_sending() {
        let stub = Arc::new(StubService::new());
        stub.push_question(Ok(input("q1")));
        stub.push_result(Ok(result(true)));
        let quiz = session(&stub);
        quiz.next().await.unwrap();

        quiz.submit(Answer::Text("  cat ".to_string())).await.unwrap();
        assert_eq!(stub.submitted.lock().unwrap()[0].1, "cat");
    }

    #[tokio::test]
    async fn test_no_reviewable_items_forces_exit() {
        let stub = Arc::new(StubService::new());
        stub.push_question(Err(ApiError::NotFound(
            "No learned vocabulary available. Use Study Mode first.".to_string(),
        )));
        let (tx, mut rx) = mpsc::unbounded_channel();
        let quiz = QuizSession::new(stub.clone(), Some(tx));

        let err = quiz.next().await.unwrap_err();
        assert!(matches!(err, SessionError::NoReviewableItems(ref m) if m.contains("Study Mode")));
        assert!(err.is_terminal());
        assert_eq!(
            quiz.state().await,
            QuizState::Exited(ExitReason::NoReviewableItems)
        );
        assert_eq!(
            rx.try_recv().unwrap(),
            SessionEvent::QuizExited(ExitReason::NoReviewableItems)
        );
        assert!(quiz.next().await.is_err());
        assert_eq!(stub.question_calls(), 1);
    }

    #[tokio::test]
    async fn test_transport_failure_on_next_is_retryable() {
        let stub = Arc::new(StubService::new());
        stub.push_question(Err(ApiError::Network("timeout".to_string())));
        stub.push_question(Ok(input("q1")));
        let quiz = session(&stub);

        assert!(matches!(
            quiz.next().await,
            Err(SessionError::Transport(_))
        ));
        assert_eq!(quiz.state().await, QuizState::Loading);
        assert!(quiz.next().await.is_ok());
    }

    #[tokio::test]
    async fn test_failed_submission_keeps_question_and_input() {
        let stub = Arc::new(StubService::new());
        stub.push_question(Ok(input("q1")));
        stub.push_result(Err(ApiError::Status {
            code: 502,
            body: "bad gateway".to_string(),
        }));
        stub.push_result(Ok(result(false)));
        let quiz = session(&stub);
        quiz.next().await.unwrap();
        quiz.with_collector(|c| c.set_text("dog")).await.unwrap().unwrap();

        assert!(matches!(
            quiz.submit_collected().await,
            Err(SessionError::Transport(_))
        ));
        match quiz.state().await {
            QuizState::Presenting { collector, .. } => assert_eq!(collector.text(), Some("dog")),
            other => panic!("unexpected state {:?}", other),
        }

        let outcome = quiz.submit_collected().await.unwrap();
        assert!(!outcome.correct);
        assert_eq!(stub.submit_calls(), 2);
    }

    #[tokio::test]
    async fn test_submit_outside_presenting_is_rejected() {
        let stub = Arc::new(StubService::new());
        stub.push_question(Ok(input("q1")));
        stub.push_result(Ok(result(true)));
        let quiz = session(&stub);

        let err = quiz.submit(Answer::Text("cat".to_string())).await.unwrap_err();
        assert!(matches!(err, SessionError::State { op: "submit", .. }));

        quiz.next().await.unwrap();
        quiz.submit(Answer::Text("cat".to_string())).await.unwrap();
        // the question is spent once answered
        let err = quiz.submit(Answer::Text("cat".to_string())).await.unwrap_err();
        assert!(matches!(err, SessionError::State { .. }));
        assert_eq!(stub.submit_calls(), 1);
    }

    #[tokio::test]
    async fn test_next_while_presenting_is_rejected() {
        let stub = Arc::new(StubService::new());
        stub.push_question(Ok(input("q1")));
        let quiz = session(&stub);
        quiz.next().await.unwrap();

        assert!(matches!(
            quiz.next().await,
            Err(SessionError::State { op: "next", .. })
        ));
        assert_eq!(stub.question_calls(), 1);
    }

    #[tokio::test]
    async fn test_concurrent_second_submit_is_rejected() {
        let stub = Arc::new(StubService::new().gated_submits());
        stub.push_question(Ok(input("q1")));
        let quiz = session(&stub);
        quiz.next().await.unwrap();

        let pending = {
            let quiz = quiz.clone();
            tokio::spawn(async move { quiz.submit(Answer::Text("cat".to_string())).await })
        };
        while stub.submit_calls() < 1 {
            tokio::task::yield_now().await;
        }

        let err = quiz.submit(Answer::Text("cat".to_string())).await.unwrap_err();
        assert!(matches!(err, SessionError::State { .. }));
        assert!(quiz.with_collector(|_| ()).await.is_err());

        stub.resolve_submit(0, Ok(result(true)));
        assert!(pending.await.unwrap().is_ok());
        assert_eq!(stub.submit_calls(), 1);
        assert_eq!(quiz.tally().await.answered, 1);
    }

    #[tokio::test]
    async fn test_exit_drops_in_flight_result() {
        let stub = Arc::new(StubService::new().gated_submits());
        stub.push_question(Ok(input("q1")));
        let (tx, mut rx) = mpsc::unbounded_channel();
        let quiz = QuizSession::new(stub.clone(), Some(tx));
        quiz.next().await.unwrap();

        let pending = {
            let quiz = quiz.clone();
            tokio::spawn(async move { quiz.submit(Answer::Text("cat".to_string())).await })
        };
        while stub.submit_calls() < 1 {
            tokio::task::yield_now().await;
        }
        quiz.exit().await.unwrap();
        stub.resolve_submit(0, Ok(result(true)));

        assert_eq!(pending.await.unwrap(), Err(SessionError::Superseded));
        assert_eq!(quiz.state().await, QuizState::Exited(ExitReason::UserExit));
        assert_eq!(quiz.tally().await, QuizTally::default());
        assert_eq!(
            rx.try_recv().unwrap(),
            SessionEvent::QuizExited(ExitReason::UserExit)
        );
        assert!(quiz.exit().await.is_err());
    }

    #[tokio::test]
    async fn test_abandon_drops_in_flight_question() {
        let stub = Arc::new(StubService::new().gated_questions());
        let quiz = session(&stub);

        let pending = {
            let quiz = quiz.clone();
            tokio::spawn(async move { quiz.next().await })
        };
        while stub.question_calls() < 1 {
            tokio::task::yield_now().await;
        }
        quiz.abandon().await;
        stub.resolve_question(0, Ok(input("q1")));

        assert_eq!(pending.await.unwrap(), Err(SessionError::Superseded));
        assert_eq!(quiz.state().await, QuizState::Loading);
        assert!(quiz.next().await.is_err());
        assert_eq!(stub.question_calls(), 1);
    }

    #[tokio::test]
    async fn test_exit_without_service_calls() {
        let stub = Arc::new(StubService::new());
        let quiz = session(&stub);
        quiz.exit().await.unwrap();
        assert_eq!(stub.question_calls(), 0);
        assert_eq!(stub.submit_calls(), 0);
        assert_eq!(quiz.progress().await, 1.0);
    }

    #[tokio::test]
    async fn test_next_question_gets_fresh_collector() {
        let stub = Arc::new(StubService::new());
        stub.push_question(Ok(assemble("s:1")));
        stub.push_result(Ok(result(false)));
        stub.push_question(Ok(QuizQuestion::Assemble {
            prompt: prompt("s:2"),
            tokens: strings(&["犬", "は", "走る"]),
        }));
        let quiz = session(&stub);

        quiz.next().await.unwrap();
        quiz.with_collector(|c| c.assemble(1)).await.unwrap().unwrap();
        quiz.submit_collected().await.unwrap();
        quiz.next().await.unwrap();

        match quiz.state().await {
            QuizState::Presenting { collector, .. } => {
                assert!(collector.assembled().is_empty());
                assert_eq!(collector.pool(), strings(&["犬", "は", "走る"]).as_slice());
            }
            other => panic!("unexpected state {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_tally_accumulates_results() {
        let stub = Arc::new(StubService::new());
        stub.push_question(Ok(choice("q1")));
        stub.push_result(Ok(result(true)));
        stub.push_question(Ok(choice("q2")));
        stub.push_result(Ok(result(false)));
        let quiz = session(&stub);

        quiz.next().await.unwrap();
        quiz.with_collector(|c| c.select(0)).await.unwrap().unwrap();
        quiz.submit_collected().await.unwrap();
        assert_eq!(quiz.progress().await, 1.0);
        quiz.next().await.unwrap();
        assert_eq!(quiz.progress().await, 0.0);
        quiz.submit(Answer::Text("dog".to_string())).await.unwrap();

        assert_eq!(
            quiz.tally().await,
            QuizTally {
                answered: 2,
                correct: 1,
                xp: 10,
                gems: 1,
            }
        );
    }

    #[tokio::test]
    async fn test_tally_saturates_on_huge_rewards() {
        let stub = Arc::new(StubService::new());
        for id in ["q1", "q2"] {
            stub.push_question(Ok(input(id)));
            stub.push_result(Ok(QuizResult {
                xp_gained: u32::MAX,
                gems_awarded: u32::MAX,
                ..result(true)
            }));
        }
        let quiz = session(&stub);

        for _ in 0..2 {
            quiz.next().await.unwrap();
            quiz.submit(Answer::Text("cat".to_string())).await.unwrap();
        }

        let tally = quiz.tally().await;
        assert_eq!(tally.answered, 2);
        assert_eq!(tally.correct, 2);
        assert_eq!(tally.xp, u32::MAX);
        assert_eq!(tally.gems, u32::MAX);
        assert!(matches!(quiz.state().await, QuizState::Answered { .. }));
    }
}
