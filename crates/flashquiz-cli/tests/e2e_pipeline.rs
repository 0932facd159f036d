//! End-to-end pipeline tests: text files -> parser -> JSON database -> quiz.
//!
//! The two halves share nothing but the database file, so each test writes
//! it to disk and reloads it before quizzing.

use std::io::Cursor;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;

use flashquiz_core::config::PatternConfig;
use flashquiz_core::db::QuestionDb;
use flashquiz_core::parser::{QuestionParser, ScanOptions};
use flashquiz_core::runner::run_quiz;
use flashquiz_core::session::QuizSession;

const BIOLOGY: &str = "\
Unit 1 review questions

1. Which organelle produces most of a cell's ATP?
a. Ribosome
*b. Mitochondrion
c. Golgi apparatus
d. Lysosome

2. DNA is copied during which
   phase of the cell cycle?
A) G1
B) S
C) G2
Answer: B

3. This one has no answer marked
a. yes
b. no
";

const CHEMISTRY: &str = "\
1. What is the chemical symbol for sodium?
A. So
B. Sd
C. Na
Answer: C
";

fn write_bank(dir: &Path) {
    std::fs::write(dir.join("biology.txt"), BIOLOGY).unwrap();
    std::fs::write(dir.join("chemistry.txt"), CHEMISTRY).unwrap();
    std::fs::write(dir.join("readme.txt"), "Put your question files here.\n").unwrap();
}

fn parse_and_save(source: &Path, output: &Path) -> QuestionDb {
    let parser = QuestionParser::new(&PatternConfig::default()).unwrap();
    let report = parser
        .parse_directory(source, &ScanOptions::default())
        .unwrap();
    let db = QuestionDb::new(report.questions);
    db.save_json(output).unwrap();
    db
}

#[test]
fn every_parsed_question_is_complete() {
    let source = tempfile::tempdir().unwrap();
    write_bank(source.path());
    let out = tempfile::tempdir().unwrap();

    let db = parse_and_save(source.path(), &out.path().join("questions.json"));

    let ids: Vec<_> = db.questions.iter().map(|q| q.id.as_str()).collect();
    assert_eq!(ids, vec!["biology_1", "biology_2", "chemistry_1"]);
    for question in &db.questions {
        assert!(question.validate().is_ok(), "{} is incomplete", question.id);
        assert!(question.correct_index().is_some());
    }
    assert_eq!(
        db.questions[1].stem,
        "DNA is copied during which phase of the cell cycle?"
    );
}

#[test]
fn reload_yields_identical_sequence() {
    let source = tempfile::tempdir().unwrap();
    write_bank(source.path());
    let out = tempfile::tempdir().unwrap();
    let path = out.path().join("questions.json");

    let saved = parse_and_save(source.path(), &path);
    let loaded = QuestionDb::load_json(&path).unwrap();

    assert_eq!(loaded, saved);
}

#[test]
fn scripted_quiz_over_parsed_bank() {
    let source = tempfile::tempdir().unwrap();
    write_bank(source.path());
    let out = tempfile::tempdir().unwrap();
    let path = out.path().join("questions.json");
    parse_and_save(source.path(), &path);

    let db = QuestionDb::load_json(&path).unwrap();

    // All correct.
    let answers: String = db
        .questions
        .iter()
        .map(|q| format!("{}\n", q.correct.to_lowercase()))
        .collect();
    let mut session = QuizSession::new(db.questions.clone());
    let score = run_quiz(&mut session, Cursor::new(answers), Vec::new()).unwrap();
    assert_eq!(score.correct, 3);
    assert_eq!(score.incorrect, 0);

    // One right, one wrong label, one garbage.
    let mut session = QuizSession::new(db.questions.clone());
    let score = run_quiz(&mut session, Cursor::new("b\nA\n???\n"), Vec::new()).unwrap();
    let expected = db
        .questions
        .iter()
        .zip(["b", "A", "???"])
        .filter(|(q, a)| q.is_correct(a))
        .count();
    assert_eq!(score.correct, expected);
    assert_eq!(score.correct, 1);
    assert_eq!(score.incorrect, 2);
}

#[test]
fn cli_parse_then_quiz() {
    let dir = tempfile::tempdir().unwrap();
    let source = dir.path().join("questions");
    std::fs::create_dir(&source).unwrap();
    write_bank(&source);

    #[allow(deprecated)]
    Command::cargo_bin("flashquiz")
        .unwrap()
        .current_dir(dir.path())
        .env("HOME", dir.path())
        .env_remove("FLASHQUIZ_DATABASE")
        .arg("parse")
        .assert()
        .success()
        .stdout(predicate::str::contains("Saved 3 questions"));

    #[allow(deprecated)]
    Command::cargo_bin("flashquiz")
        .unwrap()
        .current_dir(dir.path())
        .env("HOME", dir.path())
        .env_remove("FLASHQUIZ_DATABASE")
        .arg("quiz")
        .write_stdin("B\nB\nA\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Question 3/3"))
        .stdout(predicate::str::contains("Correct answer: C) Na"))
        .stdout(predicate::str::contains("2 correct, 1 incorrect"));
}
