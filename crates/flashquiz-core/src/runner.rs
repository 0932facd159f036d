//! Line-oriented console loop for a [`QuizSession`].
//!
//! Generic over the reader and writer so tests can script the answers.

use std::io::{BufRead, Write};

use anyhow::{Context, Result};

use crate::model::Question;
use crate::session::{AnswerOutcome, QuizScore, QuizSession};

const RULE: &str = "======================================================================";

/// Present every question, read one line per answer and report each outcome.
///
/// End of input ends the session early. Returns the final score; printing a
/// summary is left to the caller.
pub fn run_quiz<R, W>(session: &mut QuizSession, mut input: R, mut out: W) -> Result<QuizScore>
where
    R: BufRead,
    W: Write,
{
    session.start()?;
    let total = session.len();
    let mut line = String::new();

    while let Some((index, question)) = session.current() {
        present(&mut out, index, total, question)?;
        write!(out, "\nYour answer: ")?;
        out.flush()?;

        line.clear();
        let read = input.read_line(&mut line).context("failed to read answer")?;
        if read == 0 {
            writeln!(out, "\n\nNo more input, ending quiz.")?;
            session.finish();
            break;
        }

        let outcome = session.answer(&line)?;
        report(&mut out, &outcome)?;
        session.advance()?;
    }

    out.flush()?;
    Ok(session.score())
}

fn present<W: Write>(out: &mut W, index: usize, total: usize, question: &Question) -> Result<()> {
    writeln!(out, "{RULE}")?;
    writeln!(out, "Question {}/{}", index + 1, total)?;
    writeln!(out, "{}", question.stem)?;
    writeln!(out)?;
    for (label, text) in question.labeled_choices() {
        writeln!(out, "  {label}) {text}")?;
    }
    Ok(())
}

fn report<W: Write>(out: &mut W, outcome: &AnswerOutcome) -> Result<()> {
    if outcome.correct {
        writeln!(out, "\nCorrect!")?;
    } else {
        if outcome.recognized {
            writeln!(out, "\nIncorrect.")?;
        } else if outcome.given.is_empty() {
            writeln!(out, "\nNo answer given, counted as incorrect.")?;
        } else {
            writeln!(
                out,
                "\n'{}' is not one of the choices, counted as incorrect.",
                outcome.given
            )?;
        }
        writeln!(
            out,
            "Correct answer: {}) {}",
            outcome.correct_label, outcome.correct_text
        )?;
    }
    writeln!(out)?;
    Ok(())
}
