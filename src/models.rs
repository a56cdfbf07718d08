use serde::{Deserialize, Serialize};

/// A vocabulary card as served by the study endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudyItem {
    pub word: String,
    pub kana: String,
    #[serde(default)]
    pub romaji: String,
    pub meaning: String,
    #[serde(default)]
    pub pitch_pattern: Option<String>,
    #[serde(default)]
    pub example_sentence: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Fields shared by every question variant.
#[derive(Debug, Clone, PartialEq)]
pub struct QuestionPrompt {
    pub question_id: String,
    pub prompt_text: String,
    pub word: Option<String>,
    pub kana: Option<String>,
    pub romaji: Option<String>,
}

/// One review question. Each variant carries only the data it needs.
#[derive(Debug, Clone, PartialEq)]
pub enum QuizQuestion {
    MultipleChoice {
        prompt: QuestionPrompt,
        options: Vec<String>,
    },
    Input {
        prompt: QuestionPrompt,
    },
    Assemble {
        prompt: QuestionPrompt,
        tokens: Vec<String>,
    },
}

impl QuizQuestion {
    pub fn prompt(&self) -> &QuestionPrompt {
        match self {
            QuizQuestion::MultipleChoice { prompt, .. }
            | QuizQuestion::Input { prompt }
            | QuizQuestion::Assemble { prompt, .. } => prompt,
        }
    }

    pub fn question_id(&self) -> &str {
        &self.prompt().question_id
    }

    pub fn kind(&self) -> QuestionKind {
        match self {
            QuizQuestion::MultipleChoice { .. } => QuestionKind::MultipleChoice,
            QuizQuestion::Input { .. } => QuestionKind::Input,
            QuizQuestion::Assemble { .. } => QuestionKind::Assemble,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuestionKind {
    MultipleChoice,
    Input,
    Assemble,
}

impl QuestionKind {
    pub fn label(&self) -> &'static str {
        match self {
            QuestionKind::MultipleChoice => "multiple choice",
            QuestionKind::Input => "input",
            QuestionKind::Assemble => "assemble",
        }
    }
}

/// Grading outcome for one submitted answer.
#[derive(Debug, Clone, PartialEq)]
pub struct QuizResult {
    pub correct: bool,
    /// Never empty; the decoder rejects a result without answers.
    pub correct_answers: Vec<String>,
    pub explanation: Option<String>,
    pub xp_gained: u32,
    pub gems_awarded: u32,
}

impl QuizResult {
    pub fn primary_answer(&self) -> &str {
        self.correct_answers
            .first()
            .map(String::as_str)
            .unwrap_or_default()
    }
}

/// A submit-ready answer. The shape must match the question variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Answer {
    Text(String),
    Tokens(Vec<String>),
}

impl Answer {
    /// Wire encoding: text verbatim, tokens joined by exactly one ASCII space.
    pub fn to_wire(&self) -> String {
        match self {
            Answer::Text(text) => text.clone(),
            Answer::Tokens(tokens) => tokens.join(" "),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct LearnerStats {
    pub xp: u32,
    pub level: u32,
    pub streak: u32,
    pub hearts: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitReason {
    UserExit,
    NoReviewableItems,
}

/// Signals a controller raises towards the host screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    StudyComplete,
    QuizExited(ExitReason),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Menu,
    Study,
    Quiz,
    Message,
}
