//! The question database: an ordered list of questions stored as a JSON array.

use std::collections::HashSet;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::error::LoadError;
use crate::model::{normalize_label, Question};
use crate::parser::assign_unique_ids;

/// Ordered collection of questions, serialized as a bare JSON array.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuestionDb {
    pub questions: Vec<Question>,
}

/// A problem found by [`QuestionDb::check_file`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DbIssue {
    /// 1-based position of the record in the file.
    pub position: usize,
    pub id: String,
    pub message: String,
}

impl QuestionDb {
    pub fn new(questions: Vec<Question>) -> Self {
        Self { questions }
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    /// Write the database as pretty-printed JSON, replacing any existing file.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let json =
            serde_json::to_string_pretty(self).context("failed to serialize question database")?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        std::fs::write(path, json)
            .with_context(|| format!("failed to write questions to {}", path.display()))?;
        Ok(())
    }

    /// Load a database for quizzing.
    ///
    /// A missing file or a document that is not a JSON array is an error.
    /// Elements that are not question objects, and records that break the
    /// invariants, are skipped with a warning. Labels are normalized to
    /// uppercase; records without an id get their 1-based position, and ids
    /// are then made unique across the file.
    pub fn load_json(path: &Path) -> Result<Self, LoadError> {
        let records = read_records(path)?;
        let before = records.len();

        let mut questions = Vec::with_capacity(before);
        for (idx, value) in records.into_iter().enumerate() {
            let position = idx + 1;
            let mut question = match serde_json::from_value::<Question>(value) {
                Ok(q) => q,
                Err(e) => {
                    tracing::warn!("skipping malformed question #{position}: {e}");
                    continue;
                }
            };
            question.correct = normalize_label(&question.correct);
            if question.id.is_empty() {
                question.id = position.to_string();
            }
            match question.validate() {
                Ok(()) => questions.push(question),
                Err(e) => {
                    tracing::warn!(
                        "skipping malformed question #{position} ({}): {e}",
                        question.id
                    );
                }
            }
        }
        assign_unique_ids(&mut questions);

        if questions.is_empty() {
            return Err(LoadError::Empty {
                path: path.to_path_buf(),
            });
        }
        if questions.len() < before {
            tracing::warn!(
                "loaded {} of {} questions from {}",
                questions.len(),
                before,
                path.display()
            );
        } else {
            tracing::debug!("loaded {} questions from {}", before, path.display());
        }

        Ok(Self::new(questions))
    }

    /// Read a database file and report every record that is not a question
    /// object or breaks an invariant, plus duplicate ids. Nothing is
    /// normalized or dropped.
    pub fn check_file(path: &Path) -> Result<CheckReport, LoadError> {
        let records = read_records(path)?;
        let mut report = CheckReport {
            records: records.len(),
            ..CheckReport::default()
        };
        let mut seen_ids = HashSet::new();

        for (idx, value) in records.into_iter().enumerate() {
            let position = idx + 1;
            let question = match serde_json::from_value::<Question>(value) {
                Ok(q) => q,
                Err(e) => {
                    report.issues.push(DbIssue {
                        position,
                        id: String::new(),
                        message: format!("not a question record: {e}"),
                    });
                    continue;
                }
            };

            match question.validate() {
                Ok(()) => report.usable += 1,
                Err(e) => report.issues.push(DbIssue {
                    position,
                    id: question.id.clone(),
                    message: e.to_string(),
                }),
            }

            if !question.id.is_empty() && !seen_ids.insert(question.id.clone()) {
                report.issues.push(DbIssue {
                    position,
                    id: question.id.clone(),
                    message: format!("duplicate id: {}", question.id),
                });
            }
        }

        Ok(report)
    }
}

/// Result of [`QuestionDb::check_file`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckReport {
    /// Elements in the top-level array.
    pub records: usize,
    /// Records that would survive [`QuestionDb::load_json`].
    pub usable: usize,
    pub issues: Vec<DbIssue>,
}

fn read_records(path: &Path) -> Result<Vec<serde_json::Value>, LoadError> {
    let content = std::fs::read_to_string(path).map_err(|source| LoadError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&content).map_err(|source| LoadError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

impl From<Vec<Question>> for QuestionDb {
    fn from(questions: Vec<Question>) -> Self {
        Self::new(questions)
    }
}
