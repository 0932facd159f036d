//! Error types.
//!
//! Typed errors for the places where callers need to tell failures apart.
//! File and directory plumbing elsewhere uses `anyhow` with context.

use std::path::PathBuf;

use thiserror::Error;

/// A question record that breaks the database invariants.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QuestionError {
    /// The stem is empty or whitespace.
    #[error("question stem is empty")]
    EmptyStem,

    /// Fewer than two choices.
    #[error("question needs at least 2 choices, found {found}")]
    TooFewChoices { found: usize },

    /// More choices than there are labels.
    #[error("question has {found} choices, at most 26 are supported")]
    TooManyChoices { found: usize },

    /// The correct answer is not a single-letter label.
    #[error("correct answer '{0}' is not a choice label")]
    InvalidLabel(String),

    /// The correct label names a choice that does not exist.
    #[error("correct answer '{label}' is out of range for {choices} choices")]
    CorrectOutOfRange { label: String, choices: usize },
}

/// Failure to load a question database.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The file could not be read (usually: it does not exist).
    #[error("could not read question database {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file is not a JSON array of question objects.
    #[error("malformed question database {}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The file parsed, but no record survived validation.
    #[error("no valid questions in {}", path.display())]
    Empty { path: PathBuf },
}

/// A line pattern that cannot be used by the parser.
#[derive(Debug, Error)]
pub enum PatternError {
    /// The regular expression did not compile.
    #[error("invalid {kind} pattern")]
    Invalid {
        kind: &'static str,
        #[source]
        source: regex::Error,
    },

    /// The pattern compiled but lacks a capture group the parser reads.
    #[error("{kind} pattern is missing the named group (?P<{group}>...)")]
    MissingGroup {
        kind: &'static str,
        group: &'static str,
    },
}

/// An operation issued in a quiz state that does not allow it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("cannot {action} while quiz is {state}")]
    InvalidState {
        action: &'static str,
        state: String,
    },
}
