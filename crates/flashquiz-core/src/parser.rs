//! Plain-text question parser.
//!
//! Question banks are loosely formatted text files:
//!
//! ```text
//! 1. What color is the sky?
//! A. Red
//! B. Blue
//! C. Green
//! Answer: B
//!
//! 2. Which of these is a prime
//!    number?
//! a) 4
//! *b) 7
//! c) 9
//! ```
//!
//! Each numbered line opens a block; lettered lines are choices; the correct
//! choice is marked with a leading `*` or named on an answer-key line. Any
//! other line continues the stem or the last choice. The three line patterns
//! come from [`PatternConfig`] so other conventions can be matched too.
//!
//! Extraction is best-effort: a block that cannot produce a complete record
//! is dropped with a warning, and a file without any matching block simply
//! contributes nothing.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use encoding_rs::WINDOWS_1252;
use regex::{Captures, Regex};
use thiserror::Error;

use crate::config::{ParserConfig, PatternConfig};
use crate::error::PatternError;
use crate::model::{choice_label, label_index, Question, MAX_CHOICES};

/// Why a detected block did not become a question.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DiscardReason {
    #[error("question text is empty")]
    EmptyStem,
    #[error("only {found} choice(s), need at least {min}")]
    TooFewChoices { found: usize, min: usize },
    #[error("{found} choices, at most 26 are supported")]
    TooManyChoices { found: usize },
    #[error("choice {0} has no text")]
    EmptyChoice(char),
    #[error("choice label {0} appears more than once")]
    DuplicateLabel(char),
    #[error("no correct answer marked")]
    NoAnswer,
    #[error("answer key names {0}, which is not one of the choices")]
    UnknownAnswer(char),
    #[error("more than one correct answer marked")]
    ConflictingAnswers,
}

/// A block that was detected but dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscardedBlock {
    /// 1-based line of the question line that opened the block.
    pub line: usize,
    pub reason: DiscardReason,
}

/// Result of parsing one file's text.
#[derive(Debug, Clone, Default)]
pub struct Extraction {
    pub questions: Vec<Question>,
    pub discarded: Vec<DiscardedBlock>,
}

/// Which files a directory scan picks up.
#[derive(Debug, Clone)]
pub struct ScanOptions {
    /// Extensions without the leading dot, compared case-insensitively.
    pub extensions: Vec<String>,
    pub recursive: bool,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            extensions: vec!["txt".to_string()],
            recursive: false,
        }
    }
}

impl From<&ParserConfig> for ScanOptions {
    fn from(config: &ParserConfig) -> Self {
        Self {
            extensions: config.extensions.clone(),
            recursive: config.recursive,
        }
    }
}

/// Per-file outcome of a directory scan.
#[derive(Debug, Clone)]
pub struct FileSummary {
    pub path: PathBuf,
    pub questions: usize,
    pub discarded: usize,
    /// Set when the file could not be read at all.
    pub error: Option<String>,
}

/// Everything a directory scan produced.
#[derive(Debug, Clone, Default)]
pub struct ParseReport {
    pub files: Vec<FileSummary>,
    pub questions: Vec<Question>,
}

impl ParseReport {
    pub fn total_discarded(&self) -> usize {
        self.files.iter().map(|f| f.discarded).sum()
    }
}

/// Compiled line patterns.
#[derive(Debug, Clone)]
pub struct QuestionParser {
    question_re: Regex,
    choice_re: Regex,
    answer_re: Regex,
    min_choices: usize,
}

impl QuestionParser {
    /// Compile the configured patterns, checking that each carries the named
    /// groups the parser reads.
    pub fn new(patterns: &PatternConfig) -> Result<Self, PatternError> {
        let question_re = compile("question", &patterns.question_pattern, &["text"])?;
        let choice_re = compile("choice", &patterns.choice_pattern, &["label", "text"])?;
        let answer_re = compile("answer", &patterns.answer_pattern, &["label"])?;

        Ok(Self {
            question_re,
            choice_re,
            answer_re,
            min_choices: patterns.min_choices.max(2),
        })
    }

    /// Parse one file's text, returning only the complete questions.
    pub fn parse_str(&self, content: &str, source_name: &str) -> Vec<Question> {
        self.extract(content, source_name).questions
    }

    /// Parse one file's text, keeping track of dropped blocks.
    ///
    /// `source_name` is the file name; its stem prefixes the question ids.
    pub fn extract(&self, content: &str, source_name: &str) -> Extraction {
        let id_prefix = Path::new(source_name)
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| source_name.to_string());

        let mut extraction = Extraction::default();
        let mut current: Option<BlockBuilder> = None;
        let mut ordinal = 0usize;

        for (idx, raw) in content.lines().enumerate() {
            let line_num = idx + 1;
            let line = raw.trim();
            if line.is_empty() {
                continue;
            }

            if let Some(caps) = self.question_re.captures(line) {
                if let Some(block) = current.take() {
                    self.finish_block(block, &id_prefix, source_name, &mut extraction);
                }
                ordinal += 1;
                let number = group(&caps, "number")
                    .map(str::to_string)
                    .unwrap_or_else(|| ordinal.to_string());
                current = Some(BlockBuilder::new(
                    number,
                    group(&caps, "text").unwrap_or_default(),
                    line_num,
                ));
                continue;
            }

            let Some(block) = current.as_mut() else {
                tracing::trace!("{source_name}:{line_num}: outside any question, ignored");
                continue;
            };

            if let Some(caps) = self.answer_re.captures(line) {
                if let Some(label) = group(&caps, "label").and_then(single_letter) {
                    block.answer_key.push(label);
                    block.last = LastLine::AnswerKey;
                    continue;
                }
            }

            if let Some(caps) = self.choice_re.captures(line) {
                if let Some(label) = group(&caps, "label").and_then(single_letter) {
                    block.choices.push(RawChoice {
                        label,
                        text: group(&caps, "text").unwrap_or_default().to_string(),
                        marked: group(&caps, "marker").is_some_and(|m| !m.is_empty()),
                    });
                    block.last = LastLine::Choice;
                    continue;
                }
            }

            block.continue_with(line);
        }

        if let Some(block) = current.take() {
            self.finish_block(block, &id_prefix, source_name, &mut extraction);
        }

        extraction
    }

    /// Read and parse a single file.
    pub fn parse_file(&self, path: &Path) -> Result<Extraction> {
        let bytes = std::fs::read(path)
            .with_context(|| format!("failed to read question file: {}", path.display()))?;
        let content = match String::from_utf8(bytes) {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!(
                    "{} is not valid UTF-8, decoding as Windows-1252",
                    path.display()
                );
                let (text, _) = WINDOWS_1252.decode_without_bom_handling(e.as_bytes());
                text.into_owned()
            }
        };

        let source_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        Ok(self.extract(&content, &source_name))
    }

    /// Parse every matching file under `dir`, in sorted path order.
    ///
    /// Unreadable files are logged and skipped; the batch only fails when
    /// `dir` itself cannot be scanned.
    pub fn parse_directory(&self, dir: &Path, options: &ScanOptions) -> Result<ParseReport> {
        let mut paths = Vec::new();
        collect_files(dir, options, &mut paths)?;
        paths.sort();

        let mut report = ParseReport::default();

        for path in paths {
            match self.parse_file(&path) {
                Ok(extraction) => {
                    if extraction.questions.is_empty() {
                        tracing::warn!("no questions found in {}", path.display());
                    } else {
                        tracing::debug!(
                            "{}: {} question(s)",
                            path.display(),
                            extraction.questions.len()
                        );
                    }
                    report.files.push(FileSummary {
                        path,
                        questions: extraction.questions.len(),
                        discarded: extraction.discarded.len(),
                        error: None,
                    });
                    report.questions.extend(extraction.questions);
                }
                Err(e) => {
                    tracing::warn!("skipping {}: {:#}", path.display(), e);
                    report.files.push(FileSummary {
                        path,
                        questions: 0,
                        discarded: 0,
                        error: Some(format!("{e:#}")),
                    });
                }
            }
        }

        assign_unique_ids(&mut report.questions);
        Ok(report)
    }

    fn finish_block(
        &self,
        block: BlockBuilder,
        id_prefix: &str,
        source_name: &str,
        extraction: &mut Extraction,
    ) {
        let line = block.start_line;
        match block.build(id_prefix, source_name, self.min_choices) {
            Ok(question) => extraction.questions.push(question),
            Err(reason) => {
                tracing::warn!("{source_name}:{line}: discarding question: {reason}");
                extraction.discarded.push(DiscardedBlock { line, reason });
            }
        }
    }
}

/// Make ids unique across a batch by suffixing repeats with `-2`, `-3`, ...
pub fn assign_unique_ids(questions: &mut [Question]) {
    let mut seen = HashSet::new();
    for question in questions.iter_mut() {
        if seen.insert(question.id.clone()) {
            continue;
        }
        let mut n = 2;
        let unique = loop {
            let candidate = format!("{}-{n}", question.id);
            if !seen.contains(&candidate) {
                break candidate;
            }
            n += 1;
        };
        seen.insert(unique.clone());
        question.id = unique;
    }
}

fn compile(
    kind: &'static str,
    pattern: &str,
    required: &[&'static str],
) -> Result<Regex, PatternError> {
    let re = Regex::new(pattern).map_err(|source| PatternError::Invalid { kind, source })?;
    for &name in required {
        if !re.capture_names().any(|n| n == Some(name)) {
            return Err(PatternError::MissingGroup { kind, group: name });
        }
    }
    Ok(re)
}

fn group<'t>(caps: &Captures<'t>, name: &str) -> Option<&'t str> {
    caps.name(name).map(|m| m.as_str().trim())
}

fn single_letter(s: &str) -> Option<char> {
    label_index(s).and_then(choice_label)
}

fn collect_files(dir: &Path, options: &ScanOptions, out: &mut Vec<PathBuf>) -> Result<()> {
    if !dir.is_dir() {
        anyhow::bail!("not a directory: {}", dir.display());
    }

    for entry in std::fs::read_dir(dir)
        .with_context(|| format!("failed to read directory: {}", dir.display()))?
    {
        let entry = entry?;
        let path = entry.path();

        if path.is_dir() {
            if options.recursive {
                collect_files(&path, options, out)?;
            }
        } else if has_extension(&path, &options.extensions) {
            out.push(path);
        }
    }

    Ok(())
}

fn has_extension(path: &Path, extensions: &[String]) -> bool {
    path.extension()
        .map(|ext| ext.to_string_lossy())
        .is_some_and(|ext| extensions.iter().any(|e| e.eq_ignore_ascii_case(&ext)))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LastLine {
    Question,
    Choice,
    AnswerKey,
}

#[derive(Debug)]
struct RawChoice {
    /// Label as written in the file, uppercased.
    label: char,
    text: String,
    marked: bool,
}

#[derive(Debug)]
struct BlockBuilder {
    number: String,
    stem: String,
    choices: Vec<RawChoice>,
    answer_key: Vec<char>,
    last: LastLine,
    start_line: usize,
}

impl BlockBuilder {
    fn new(number: String, stem: &str, start_line: usize) -> Self {
        Self {
            number,
            stem: stem.to_string(),
            choices: Vec::new(),
            answer_key: Vec::new(),
            last: LastLine::Question,
            start_line,
        }
    }

    fn continue_with(&mut self, line: &str) {
        match self.last {
            LastLine::Question => append(&mut self.stem, line),
            LastLine::Choice => {
                if let Some(choice) = self.choices.last_mut() {
                    append(&mut choice.text, line);
                }
            }
            LastLine::AnswerKey => {}
        }
    }

    fn build(
        self,
        id_prefix: &str,
        source_name: &str,
        min_choices: usize,
    ) -> Result<Question, DiscardReason> {
        let stem = self.stem.trim();
        if stem.is_empty() {
            return Err(DiscardReason::EmptyStem);
        }
        if self.choices.len() < min_choices {
            return Err(DiscardReason::TooFewChoices {
                found: self.choices.len(),
                min: min_choices,
            });
        }
        if self.choices.len() > MAX_CHOICES {
            return Err(DiscardReason::TooManyChoices {
                found: self.choices.len(),
            });
        }

        let mut labels = HashSet::new();
        for choice in &self.choices {
            if !labels.insert(choice.label) {
                return Err(DiscardReason::DuplicateLabel(choice.label));
            }
            if choice.text.trim().is_empty() {
                return Err(DiscardReason::EmptyChoice(choice.label));
            }
        }

        let mut correct: Vec<usize> = self
            .choices
            .iter()
            .enumerate()
            .filter(|(_, c)| c.marked)
            .map(|(i, _)| i)
            .collect();
        for &label in &self.answer_key {
            let index = self
                .choices
                .iter()
                .position(|c| c.label == label)
                .ok_or(DiscardReason::UnknownAnswer(label))?;
            correct.push(index);
        }
        correct.sort_unstable();
        correct.dedup();

        let index = match correct.as_slice() {
            [] => return Err(DiscardReason::NoAnswer),
            [index] => *index,
            _ => return Err(DiscardReason::ConflictingAnswers),
        };
        let correct = choice_label(index).ok_or(DiscardReason::TooManyChoices {
            found: self.choices.len(),
        })?;

        Ok(Question {
            id: format!("{id_prefix}_{}", self.number),
            source_file: Some(source_name.to_string()),
            stem: stem.to_string(),
            choices: self
                .choices
                .into_iter()
                .map(|c| c.text.trim().to_string())
                .collect(),
            correct: correct.to_string(),
        })
    }
}

fn append(target: &mut String, line: &str) {
    if !target.is_empty() {
        target.push(' ');
    }
    target.push_str(line);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parser() -> QuestionParser {
        QuestionParser::new(&PatternConfig::default()).unwrap()
    }

    const SKY: &str = "\
1. What color is the sky?
A. Red
B. Blue
C. Green
Answer: B
";

    #[test]
    fn parse_answer_key_block() {
        let questions = parser().parse_str(SKY, "sky.txt");
        assert_eq!(questions.len(), 1);
        let q = &questions[0];
        assert_eq!(q.id, "sky_1");
        assert_eq!(q.source_file.as_deref(), Some("sky.txt"));
        assert_eq!(q.stem, "What color is the sky?");
        assert_eq!(q.choices, vec!["Red", "Blue", "Green"]);
        assert_eq!(q.correct, "B");
        assert!(q.validate().is_ok());
    }

    #[test]
    fn parse_star_marker_and_continuations() {
        let text = "\
Chapter 3 review

1. Which of these
   is a prime number?
a) 4
*b) 7
c) 9, which is
   three squared

2. Rust is
a. garbage collected
*b. memory safe without a GC
";
        let questions = parser().parse_str(text, "chapter3.txt");
        assert_eq!(questions.len(), 2);

        assert_eq!(questions[0].stem, "Which of these is a prime number?");
        assert_eq!(questions[0].choices[2], "9, which is three squared");
        assert_eq!(questions[0].correct, "B");

        assert_eq!(questions[1].id, "chapter3_2");
        assert_eq!(questions[1].correct, "B");
        assert_eq!(questions[1].choices.len(), 2);
    }

    #[test]
    fn correct_label_is_positional() {
        let text = "\
7. Odd one out
b. Apple
d. Carrot
f. Banana
Answer: d
";
        let questions = parser().parse_str(text, "odd.txt");
        assert_eq!(questions.len(), 1);
        assert_eq!(questions[0].correct, "B");
        assert_eq!(questions[0].correct_text(), Some("Carrot"));
        assert_eq!(questions[0].id, "odd_7");
    }

    #[test]
    fn answer_key_variants() {
        for key in ["Answer: C", "answer - c", "ANS: (c)", "Correct answer: C.", "Ans = c"] {
            let text = format!("1. Pick C\nA. one\nB. two\nC. three\n{key}\n");
            let questions = parser().parse_str(&text, "t.txt");
            assert_eq!(questions.len(), 1, "answer line {key:?}");
            assert_eq!(questions[0].correct, "C");
        }
    }

    #[test]
    fn marker_and_key_agreeing_is_fine() {
        let text = "1. Q\nA. x\n*B. y\nAnswer: B\n";
        let questions = parser().parse_str(text, "t.txt");
        assert_eq!(questions.len(), 1);
        assert_eq!(questions[0].correct, "B");
    }

    #[test]
    fn incomplete_blocks_are_discarded() {
        let text = "\
1. No answer here
A. x
B. y

2. Only one choice
*A. x

3. Two answers
*A. x
*B. y

4. Key names a missing choice
A. x
B. y
Answer: D

5. Marker and key disagree
*A. x
B. y
Answer: B

6. Keeps working
A. x
B. y
Answer: A
";
        let extraction = parser().extract(text, "mixed.txt");
        assert_eq!(extraction.questions.len(), 1);
        assert_eq!(extraction.questions[0].id, "mixed_6");

        let reasons: Vec<_> = extraction.discarded.iter().map(|d| d.reason.clone()).collect();
        assert_eq!(
            reasons,
            vec![
                DiscardReason::NoAnswer,
                DiscardReason::TooFewChoices { found: 1, min: 2 },
                DiscardReason::ConflictingAnswers,
                DiscardReason::UnknownAnswer('D'),
                DiscardReason::ConflictingAnswers,
            ]
        );
        assert_eq!(extraction.discarded[0].line, 1);
    }

    #[test]
    fn duplicate_labels_are_discarded() {
        let text = "1. Q\nA. x\nA. y\nAnswer: A\n";
        let extraction = parser().extract(text, "t.txt");
        assert!(extraction.questions.is_empty());
        assert_eq!(
            extraction.discarded[0].reason,
            DiscardReason::DuplicateLabel('A')
        );
    }

    #[test]
    fn lines_after_answer_key_are_ignored() {
        let text = "1. Q\nA. x\nB. y\nAnswer: A\nExplanation: x is right.\n";
        let questions = parser().parse_str(text, "t.txt");
        assert_eq!(questions[0].choices, vec!["x", "y"]);
    }

    #[test]
    fn non_matching_text_yields_nothing() {
        let text = "Shopping list\n- eggs\n- milk\n";
        let extraction = parser().extract(text, "notes.txt");
        assert!(extraction.questions.is_empty());
        assert!(extraction.discarded.is_empty());
    }

    #[test]
    fn custom_patterns() {
        let patterns = PatternConfig {
            question_pattern: r"^Q(?P<number>\d+):\s*(?P<text>.*)$".into(),
            choice_pattern: r"^\((?P<label>[a-z])\)\s*(?P<text>.*)$".into(),
            answer_pattern: r"^KEY\s+(?P<label>[a-z])$".into(),
            min_choices: 3,
        };
        let parser = QuestionParser::new(&patterns).unwrap();
        let text = "Q1: Largest planet?\n(a) Mars\n(b) Jupiter\n(c) Venus\nKEY b\n\
                    Q2: Too short\n(a) yes\n(b) no\nKEY a\n";
        let extraction = parser.extract(text, "space.txt");
        assert_eq!(extraction.questions.len(), 1);
        assert_eq!(extraction.questions[0].correct, "B");
        assert_eq!(extraction.questions[0].id, "space_1");
        assert_eq!(
            extraction.discarded[0].reason,
            DiscardReason::TooFewChoices { found: 2, min: 3 }
        );
    }

    #[test]
    fn patterns_without_required_groups_are_rejected() {
        let patterns = PatternConfig {
            answer_pattern: r"^Answer: ([A-Z])$".into(),
            ..Default::default()
        };
        assert!(matches!(
            QuestionParser::new(&patterns),
            Err(PatternError::MissingGroup {
                kind: "answer",
                group: "label"
            })
        ));

        let patterns = PatternConfig {
            question_pattern: r"^(?P<text>[".into(),
            ..Default::default()
        };
        assert!(matches!(
            QuestionParser::new(&patterns),
            Err(PatternError::Invalid { kind: "question", .. })
        ));
    }

    #[test]
    fn unique_ids_across_batch() {
        let mut questions = parser().parse_str(&format!("{SKY}{SKY}"), "sky.txt");
        questions.extend(parser().parse_str(SKY, "sky.txt"));
        assign_unique_ids(&mut questions);
        let ids: Vec<_> = questions.iter().map(|q| q.id.as_str()).collect();
        assert_eq!(ids, vec!["sky_1", "sky_1-2", "sky_1-3"]);
    }

    #[test]
    fn parse_directory_skips_and_sorts() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("b.txt"), SKY).unwrap();
        std::fs::write(dir.path().join("a.txt"), "1. First\n*A. yes\nB. no\n").unwrap();
        std::fs::write(dir.path().join("junk.txt"), "nothing to see").unwrap();
        std::fs::write(dir.path().join("ignored.md"), SKY).unwrap();
        std::fs::create_dir(dir.path().join("nested")).unwrap();
        std::fs::write(dir.path().join("nested").join("c.txt"), SKY).unwrap();

        let report = parser()
            .parse_directory(dir.path(), &ScanOptions::default())
            .unwrap();
        assert_eq!(report.files.len(), 3);
        let ids: Vec<_> = report.questions.iter().map(|q| q.id.as_str()).collect();
        assert_eq!(ids, vec!["a_1", "b_1"]);

        let recursive = ScanOptions {
            recursive: true,
            ..Default::default()
        };
        let report = parser().parse_directory(dir.path(), &recursive).unwrap();
        assert_eq!(report.questions.len(), 3);
        assert_eq!(report.questions[2].id, "c_1");
    }

    #[test]
    fn parse_directory_rejects_missing_dir() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");
        let err = parser()
            .parse_directory(&missing, &ScanOptions::default())
            .unwrap_err();
        assert!(err.to_string().contains("not a directory"));
    }

    #[test]
    fn parse_file_decodes_windows_1252() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("latin1.txt");
        let mut bytes = b"1. Caf".to_vec();
        bytes.push(0xE9);
        bytes.extend_from_slice(b"?\nA. yes\nB. no\nAnswer: A\n");
        std::fs::write(&path, bytes).unwrap();

        let extraction = parser().parse_file(&path).unwrap();
        assert_eq!(extraction.questions.len(), 1);
        assert_eq!(extraction.questions[0].stem, "Café?");
    }
}
