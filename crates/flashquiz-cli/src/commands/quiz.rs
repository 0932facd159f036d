//! The `flashquiz quiz` command.

use std::io;
use std::path::PathBuf;

use anyhow::Result;
use comfy_table::{Cell, Table};
use rand::rngs::StdRng;
use rand::SeedableRng;

use flashquiz_core::config::load_config_from;
use flashquiz_core::db::QuestionDb;
use flashquiz_core::runner::run_quiz;
use flashquiz_core::session::{QuizScore, QuizSession};

pub fn execute(
    database: Option<PathBuf>,
    shuffle: bool,
    seed: Option<u64>,
    limit: Option<usize>,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;
    let path = database.unwrap_or(config.quiz.database);

    let db = QuestionDb::load_json(&path)?;
    eprintln!("Loaded {} questions from {}", db.len(), path.display());

    let mut session = QuizSession::new(db.questions);
    if shuffle || seed.is_some() || config.quiz.shuffle {
        tracing::debug!("shuffling questions (seed: {seed:?})");
        match seed {
            Some(seed) => session.shuffle(&mut StdRng::seed_from_u64(seed))?,
            None => session.shuffle(&mut rand::thread_rng())?,
        }
    }
    if let Some(limit) = limit {
        anyhow::ensure!(limit >= 1, "limit must be at least 1");
        session.truncate(limit)?;
    }

    println!("Type the letter of your answer and press Enter. Ctrl-D ends the quiz.\n");

    let score = run_quiz(&mut session, io::stdin().lock(), io::stdout().lock())?;
    print_summary(&score);

    Ok(())
}

fn print_summary(score: &QuizScore) {
    let mut table = Table::new();
    table.set_header(vec!["Questions", "Answered", "Correct", "Incorrect", "Score"]);

    let percent = match score.percent() {
        Some(p) => format!("{}/{} ({p:.1}%)", score.correct, score.answered()),
        None => "-".to_string(),
    };
    table.add_row(vec![
        Cell::new(score.total),
        Cell::new(score.answered()),
        Cell::new(score.correct),
        Cell::new(score.incorrect),
        Cell::new(percent),
    ]);

    println!("Session summary:\n{table}");
    println!("{} correct, {} incorrect", score.correct, score.incorrect);
}
