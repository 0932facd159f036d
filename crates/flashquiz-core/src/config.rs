//! Configuration loading.
//!
//! The line patterns used by the parser vary between question banks, so they
//! live in `flashquiz.toml` rather than in code.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Default question line: `12. Text` or `12) Text`.
pub const DEFAULT_QUESTION_PATTERN: &str = r"^\s*(?P<number>\d+)\s*[.)]\s*(?P<text>.*)$";

/// Default choice line: `b. Text`, `B) Text`, `*c. Text` (the `*` marks the answer).
pub const DEFAULT_CHOICE_PATTERN: &str =
    r"^\s*(?P<marker>\*?)\s*(?P<label>[A-Za-z])\s*[.)]\s*(?P<text>.*)$";

/// Default answer-key line: `Answer: B`, `Ans - b`, `Correct answer: (c)`.
pub const DEFAULT_ANSWER_PATTERN: &str =
    r"(?i)^\s*(?:correct\s+answer|answer|ans)\s*[:=-]\s*\(?(?P<label>[A-Za-z])\)?\s*\.?\s*$";

/// Line patterns recognized by the parser.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternConfig {
    /// Starts a new question; needs a `text` group, `number` is optional.
    #[serde(default = "default_question_pattern")]
    pub question_pattern: String,
    /// A choice; needs `label` and `text` groups, `marker` is optional.
    #[serde(default = "default_choice_pattern")]
    pub choice_pattern: String,
    /// An answer-key line; needs a `label` group.
    #[serde(default = "default_answer_pattern")]
    pub answer_pattern: String,
    /// Blocks with fewer choices are discarded.
    #[serde(default = "default_min_choices")]
    pub min_choices: usize,
}

impl Default for PatternConfig {
    fn default() -> Self {
        Self {
            question_pattern: default_question_pattern(),
            choice_pattern: default_choice_pattern(),
            answer_pattern: default_answer_pattern(),
            min_choices: default_min_choices(),
        }
    }
}

fn default_question_pattern() -> String {
    DEFAULT_QUESTION_PATTERN.to_string()
}
fn default_choice_pattern() -> String {
    DEFAULT_CHOICE_PATTERN.to_string()
}
fn default_answer_pattern() -> String {
    DEFAULT_ANSWER_PATTERN.to_string()
}
fn default_min_choices() -> usize {
    2
}

/// `[parser]` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParserConfig {
    /// File extensions to scan, without the dot.
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,
    /// Descend into subdirectories.
    #[serde(default)]
    pub recursive: bool,
    #[serde(flatten)]
    pub patterns: PatternConfig,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            extensions: default_extensions(),
            recursive: false,
            patterns: PatternConfig::default(),
        }
    }
}

fn default_extensions() -> Vec<String> {
    vec!["txt".to_string()]
}

/// `[quiz]` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizConfig {
    /// Database written by `parse` and read by `quiz`.
    #[serde(default = "default_database")]
    pub database: PathBuf,
    /// Present questions in random order.
    #[serde(default)]
    pub shuffle: bool,
}

impl Default for QuizConfig {
    fn default() -> Self {
        Self {
            database: default_database(),
            shuffle: false,
        }
    }
}

fn default_database() -> PathBuf {
    PathBuf::from("questions.json")
}

/// Top-level flashquiz configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlashquizConfig {
    #[serde(default)]
    pub parser: ParserConfig,
    #[serde(default)]
    pub quiz: QuizConfig,
}

/// Load configuration from well-known paths.
///
/// Search order:
/// 1. `flashquiz.toml` in the current directory
/// 2. `~/.config/flashquiz/config.toml`
///
/// Environment variable override: `FLASHQUIZ_DATABASE`.
pub fn load_config() -> Result<FlashquizConfig> {
    load_config_from(None)
}

/// Load config from an explicit path, or search the default locations.
pub fn load_config_from(path: Option<&Path>) -> Result<FlashquizConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("flashquiz.toml");
        if local.exists() {
            Some(local)
        } else {
            dirs_path()
                .map(|dir| dir.join("config.toml"))
                .filter(|global| global.exists())
        }
    };

    let mut config = match config_path {
        Some(path) => {
            tracing::debug!("loading config from {}", path.display());
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            parse_config_str(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?
        }
        None => FlashquizConfig::default(),
    };

    if let Ok(database) = std::env::var("FLASHQUIZ_DATABASE") {
        if !database.is_empty() {
            config.quiz.database = PathBuf::from(database);
        }
    }

    Ok(config)
}

/// Parse a TOML string into a config (useful for testing).
pub fn parse_config_str(content: &str) -> Result<FlashquizConfig> {
    let config: FlashquizConfig = toml::from_str(content)?;
    anyhow::ensure!(
        config.parser.patterns.min_choices >= 2,
        "parser.min_choices must be at least 2"
    );
    anyhow::ensure!(
        !config.parser.extensions.is_empty(),
        "parser.extensions must list at least one extension"
    );
    Ok(config)
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("flashquiz"))
}
