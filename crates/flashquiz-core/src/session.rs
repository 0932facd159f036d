//! Quiz session state machine.
//!
//! ```text
//! NotStarted -> Presenting(0) -> Answered(0) -> Presenting(1) -> ... -> Finished
//! ```
//!
//! The session owns the question order and the running score. It knows
//! nothing about consoles; see [`crate::runner`] for the interactive loop.

use std::fmt;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::error::SessionError;
use crate::model::{normalize_label, Question};

/// Where a session is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    NotStarted,
    /// Question `i` is shown and waiting for an answer.
    Presenting(usize),
    /// Question `i` has been answered; the outcome is available.
    Answered(usize),
    Finished,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionState::NotStarted => write!(f, "not started"),
            SessionState::Presenting(i) => write!(f, "presenting question {}", i + 1),
            SessionState::Answered(i) => write!(f, "showing answer to question {}", i + 1),
            SessionState::Finished => write!(f, "finished"),
        }
    }
}

/// What happened when an answer was submitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerOutcome {
    /// Normalized input as compared.
    pub given: String,
    pub correct: bool,
    /// Whether the input named one of the question's choices at all.
    pub recognized: bool,
    pub correct_label: String,
    pub correct_text: String,
}

/// Tally for a session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QuizScore {
    pub total: usize,
    pub correct: usize,
    pub incorrect: usize,
    /// Questions never answered because the session ended early.
    pub unanswered: usize,
}

impl QuizScore {
    pub fn answered(&self) -> usize {
        self.correct + self.incorrect
    }

    /// Percentage of answered questions that were correct.
    pub fn percent(&self) -> Option<f64> {
        let answered = self.answered();
        if answered == 0 {
            None
        } else {
            Some(self.correct as f64 / answered as f64 * 100.0)
        }
    }
}

/// One pass through a list of questions.
#[derive(Debug, Clone)]
pub struct QuizSession {
    questions: Vec<Question>,
    state: SessionState,
    correct: usize,
    incorrect: usize,
}

impl QuizSession {
    pub fn new(questions: Vec<Question>) -> Self {
        Self {
            questions,
            state: SessionState::NotStarted,
            correct: 0,
            incorrect: 0,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    /// Randomize the question order. Only allowed before the session starts.
    pub fn shuffle<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<(), SessionError> {
        self.expect_not_started("shuffle")?;
        self.questions.shuffle(rng);
        Ok(())
    }

    /// Keep only the first `limit` questions. Only allowed before the session starts.
    pub fn truncate(&mut self, limit: usize) -> Result<(), SessionError> {
        self.expect_not_started("truncate")?;
        self.questions.truncate(limit);
        Ok(())
    }

    pub fn start(&mut self) -> Result<(), SessionError> {
        self.expect_not_started("start")?;
        self.state = if self.questions.is_empty() {
            SessionState::Finished
        } else {
            SessionState::Presenting(0)
        };
        Ok(())
    }

    /// The question being presented, with its 0-based position.
    pub fn current(&self) -> Option<(usize, &Question)> {
        match self.state {
            SessionState::Presenting(i) | SessionState::Answered(i) => {
                self.questions.get(i).map(|q| (i, q))
            }
            _ => None,
        }
    }

    /// Submit an answer for the question being presented.
    ///
    /// Input that is not a label of this question counts as incorrect.
    pub fn answer(&mut self, input: &str) -> Result<AnswerOutcome, SessionError> {
        let SessionState::Presenting(i) = self.state else {
            return Err(self.invalid("answer"));
        };
        let question = &self.questions[i];

        let given = normalize_label(input);
        let recognized = question.is_valid_label(&given);
        let correct = recognized && question.is_correct(&given);

        if correct {
            self.correct += 1;
        } else {
            self.incorrect += 1;
        }

        let outcome = AnswerOutcome {
            given,
            correct,
            recognized,
            correct_label: question.correct.clone(),
            correct_text: question.correct_text().unwrap_or_default().to_string(),
        };
        tracing::debug!(
            "question {} ({}): given {:?}, correct: {}",
            i + 1,
            question.id,
            outcome.given,
            outcome.correct
        );

        self.state = SessionState::Answered(i);
        Ok(outcome)
    }

    /// Move past an answered question.
    pub fn advance(&mut self) -> Result<SessionState, SessionError> {
        let SessionState::Answered(i) = self.state else {
            return Err(self.invalid("advance"));
        };
        self.state = if i + 1 < self.questions.len() {
            SessionState::Presenting(i + 1)
        } else {
            SessionState::Finished
        };
        Ok(self.state)
    }

    /// End the session now; questions not yet answered count as unanswered.
    pub fn finish(&mut self) {
        self.state = SessionState::Finished;
    }

    pub fn is_finished(&self) -> bool {
        self.state == SessionState::Finished
    }

    pub fn score(&self) -> QuizScore {
        let total = self.questions.len();
        QuizScore {
            total,
            correct: self.correct,
            incorrect: self.incorrect,
            unanswered: total - self.correct - self.incorrect,
        }
    }

    fn expect_not_started(&self, action: &'static str) -> Result<(), SessionError> {
        if self.state == SessionState::NotStarted {
            Ok(())
        } else {
            Err(self.invalid(action))
        }
    }

    fn invalid(&self, action: &'static str) -> SessionError {
        SessionError::InvalidState {
            action,
            state: self.state.to_string(),
        }
    }
}
