//! Core data model types for flashquiz.
//!
//! A [`Question`] is one multiple-choice record: a stem, an ordered list of
//! choices, and the label of the correct choice. Labels are positional, so
//! `A` always names `choices[0]`, `B` names `choices[1]`, and so on.

use serde::{Deserialize, Serialize};

use crate::error::QuestionError;

/// Highest number of choices a question can carry (labels `A`..=`Z`).
pub const MAX_CHOICES: usize = 26;

/// A single multiple-choice question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    /// Unique key within the database, e.g. `chapter1_3`.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    /// Name of the text file this question was extracted from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_file: Option<String>,
    /// The question text.
    pub stem: String,
    /// Answer options in display order.
    pub choices: Vec<String>,
    /// Label of the correct choice.
    pub correct: String,
}

impl Question {
    /// Index of the correct choice, if `correct` is a label in range.
    pub fn correct_index(&self) -> Option<usize> {
        label_index(&self.correct).filter(|&i| i < self.choices.len())
    }

    /// Text of the correct choice.
    pub fn correct_text(&self) -> Option<&str> {
        self.correct_index().map(|i| self.choices[i].as_str())
    }

    /// Iterate over `(label, text)` pairs in display order.
    pub fn labeled_choices(&self) -> impl Iterator<Item = (char, &str)> {
        self.choices
            .iter()
            .enumerate()
            .filter_map(|(i, text)| choice_label(i).map(|label| (label, text.as_str())))
    }

    /// Whether `input` names the correct choice.
    pub fn is_correct(&self, input: &str) -> bool {
        match (label_index(input), self.correct_index()) {
            (Some(given), Some(expected)) => given == expected,
            _ => false,
        }
    }

    /// Whether `input` names any choice of this question.
    pub fn is_valid_label(&self, input: &str) -> bool {
        label_index(input).is_some_and(|i| i < self.choices.len())
    }

    /// Check the record invariants: a non-empty stem, at least two choices,
    /// and a correct label that names one of them.
    pub fn validate(&self) -> Result<(), QuestionError> {
        if self.stem.trim().is_empty() {
            return Err(QuestionError::EmptyStem);
        }
        if self.choices.len() < 2 {
            return Err(QuestionError::TooFewChoices {
                found: self.choices.len(),
            });
        }
        if self.choices.len() > MAX_CHOICES {
            return Err(QuestionError::TooManyChoices {
                found: self.choices.len(),
            });
        }
        if label_index(&self.correct).is_none() {
            return Err(QuestionError::InvalidLabel(self.correct.clone()));
        }
        if self.correct_index().is_none() {
            return Err(QuestionError::CorrectOutOfRange {
                label: self.correct.clone(),
                choices: self.choices.len(),
            });
        }
        Ok(())
    }
}

/// Positional label for the choice at `index`: 0 is `A`, 25 is `Z`.
pub fn choice_label(index: usize) -> Option<char> {
    if index < MAX_CHOICES {
        Some((b'A' + index as u8) as char)
    } else {
        None
    }
}

/// Index named by a label. Surrounding whitespace and letter case are
/// ignored; anything other than a single ASCII letter yields `None`.
pub fn label_index(label: &str) -> Option<usize> {
    let mut chars = label.trim().chars();
    let c = chars.next()?;
    if chars.next().is_some() || !c.is_ascii_alphabetic() {
        return None;
    }
    // `c` is an ASCII letter here, so it fits in a byte at or above `b'A'`.
    Some((c.to_ascii_uppercase() as u8 - b'A') as usize)
}

/// Canonical form of a label as typed by a user or found in a file.
pub fn normalize_label(input: &str) -> String {
    input.trim().to_uppercase()
}
