//! The `flashquiz check` command.

use std::path::PathBuf;

use anyhow::Result;

use flashquiz_core::config::load_config_from;
use flashquiz_core::db::QuestionDb;

pub fn execute(database: Option<PathBuf>, config_path: Option<PathBuf>) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;
    let path = database.unwrap_or(config.quiz.database);

    let report = QuestionDb::check_file(&path)?;
    println!("Database: {} ({} questions)", path.display(), report.records);

    let issues = &report.issues;
    for issue in issues {
        let id = if issue.id.is_empty() {
            String::new()
        } else {
            format!(" [{}]", issue.id)
        };
        println!("  #{}{id} WARNING: {}", issue.position, issue.message);
    }

    if issues.is_empty() {
        println!("All questions valid.");
    } else {
        println!(
            "\n{} issue(s) found, {} of {} questions usable.",
            issues.len(),
            report.usable,
            report.records
        );
    }

    Ok(())
}
