use crate::error::{SessionError, SessionResult};
use crate::models::{Answer, QuizQuestion};

/// In-progress input for exactly one question.
///
/// Built fresh from each question; there is no way to carry a collector
/// over to another question except through [`AnswerCollector::reset`],
/// which rebuilds it from scratch.
#[derive(Debug, Clone, PartialEq)]
pub enum AnswerCollector {
    Choice {
        options: Vec<String>,
        selected: Option<usize>,
    },
    Input {
        text: String,
    },
    Assemble {
        pool: Vec<String>,
        assembled: Vec<String>,
    },
}

impl AnswerCollector {
    pub fn for_question(question: &QuizQuestion) -> Self {
        match question {
            QuizQuestion::MultipleChoice { options, .. } => AnswerCollector::Choice {
                options: options.clone(),
                selected: None,
            },
            QuizQuestion::Input { .. } => AnswerCollector::Input {
                text: String::new(),
            },
            QuizQuestion::Assemble { tokens, .. } => AnswerCollector::Assemble {
                pool: tokens.clone(),
                assembled: Vec::new(),
            },
        }
    }

    pub fn reset(&mut self, question: &QuizQuestion) {
        *self = Self::for_question(question);
    }

    fn variant_name(&self) -> &'static str {
        match self {
            AnswerCollector::Choice { .. } => "collecting a choice",
            AnswerCollector::Input { .. } => "collecting free text",
            AnswerCollector::Assemble { .. } => "assembling tokens",
        }
    }

    pub fn select(&mut self, index: usize) -> SessionResult<()> {
        let name = self.variant_name();
        match self {
            AnswerCollector::Choice { options, selected } => {
                if index >= options.len() {
                    return Err(SessionError::Validation(format!(
                        "option {} does not exist",
                        index
                    )));
                }
                *selected = Some(index);
                Ok(())
            }
            _ => Err(SessionError::state("select", name)),
        }
    }

    pub fn selected(&self) -> Option<&str> {
        match self {
            AnswerCollector::Choice {
                options,
                selected: Some(index),
            } => options.get(*index).map(String::as_str),
            _ => None,
        }
    }

    #[cfg(test)]
    pub fn set_text(&mut self, value: &str) -> SessionResult<()> {
        let name = self.variant_name();
        match self {
            AnswerCollector::Input { text } => {
                *text = value.to_string();
                Ok(())
            }
            _ => Err(SessionError::state("set_text", name)),
        }
    }

    pub fn push_char(&mut self, c: char) -> SessionResult<()> {
        let name = self.variant_name();
        match self {
            AnswerCollector::Input { text } => {
                text.push(c);
                Ok(())
            }
            _ => Err(SessionError::state("push_char", name)),
        }
    }

    pub fn pop_char(&mut self) -> SessionResult<()> {
        let name = self.variant_name();
        match self {
            AnswerCollector::Input { text } => {
                text.pop();
                Ok(())
            }
            _ => Err(SessionError::state("pop_char", name)),
        }
    }

    pub fn text(&self) -> Option<&str> {
        match self {
            AnswerCollector::Input { text } => Some(text),
            _ => None,
        }
    }

    /// Moves `pool[index]` to the end of the assembled sequence.
    pub fn assemble(&mut self, index: usize) -> SessionResult<()> {
        let name = self.variant_name();
        match self {
            AnswerCollector::Assemble { pool, assembled } => {
                if index >= pool.len() {
                    return Err(SessionError::Validation(format!(
                        "no token at pool position {}",
                        index
                    )));
                }
                assembled.push(pool.remove(index));
                Ok(())
            }
            _ => Err(SessionError::state("assemble", name)),
        }
    }

    /// Returns `assembled[index]` to the end of the pool. Remaining
    /// assembled tokens keep their relative order.
    pub fn unassemble(&mut self, index: usize) -> SessionResult<()> {
        let name = self.variant_name();
        match self {
            AnswerCollector::Assemble { pool, assembled } => {
                if index >= assembled.len() {
                    return Err(SessionError::Validation(format!(
                        "no token at assembled position {}",
                        index
                    )));
                }
                pool.push(assembled.remove(index));
                Ok(())
            }
            _ => Err(SessionError::state("unassemble", name)),
        }
    }

    pub fn pool(&self) -> &[String] {
        match self {
            AnswerCollector::Assemble { pool, .. } => pool,
            _ => &[],
        }
    }

    pub fn assembled(&self) -> &[String] {
        match self {
            AnswerCollector::Assemble { assembled, .. } => assembled,
            _ => &[],
        }
    }

    pub fn is_ready(&self) -> bool {
        self.answer().is_ok()
    }

    pub fn answer(&self) -> SessionResult<Answer> {
        match self {
            AnswerCollector::Choice { .. } => self
                .selected()
                .map(|option| Answer::Text(option.to_string()))
                .ok_or_else(|| SessionError::Validation("no option selected".to_string())),
            AnswerCollector::Input { text } => {
                let trimmed = text.trim();
                if trimmed.is_empty() {
                    Err(SessionError::Validation("answer is empty".to_string()))
                } else {
                    Ok(Answer::Text(trimmed.to_string()))
                }
            }
            AnswerCollector::Assemble { assembled, .. } => {
                if assembled.is_empty() {
                    Err(SessionError::Validation("no tokens assembled".to_string()))
                } else {
                    Ok(Answer::Tokens(assembled.clone()))
                }
            }
        }
    }

    /// The answer in its transmitted form.
    pub fn wire_answer(&self) -> SessionResult<String> {
        self.answer().map(|answer| answer.to_wire())
    }
}
