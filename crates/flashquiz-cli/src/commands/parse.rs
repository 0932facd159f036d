//! The `flashquiz parse` command.

use std::path::PathBuf;

use anyhow::Result;
use comfy_table::{Cell, Table};

use flashquiz_core::config::load_config_from;
use flashquiz_core::db::QuestionDb;
use flashquiz_core::parser::{ParseReport, QuestionParser, ScanOptions};

pub fn execute(
    source: PathBuf,
    output: Option<PathBuf>,
    recursive: bool,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;

    let parser = QuestionParser::new(&config.parser.patterns)?;
    let mut options = ScanOptions::from(&config.parser);
    options.recursive |= recursive;
    tracing::debug!("scanning {} with {:?}", source.display(), options);

    let report = parser.parse_directory(&source, &options)?;

    if report.files.is_empty() {
        println!(
            "No .{} files found in {}",
            options.extensions.join("/."),
            source.display()
        );
        return Ok(());
    }

    print_file_table(&report);
    eprintln!(
        "Total: {} question(s) from {} file(s), {} block(s) discarded",
        report.questions.len(),
        report.files.len(),
        report.total_discarded()
    );

    if report.questions.is_empty() {
        println!("No questions parsed, nothing written.");
        return Ok(());
    }

    let output = output.unwrap_or(config.quiz.database);
    let db = QuestionDb::new(report.questions);
    db.save_json(&output)?;
    println!("Saved {} questions to {}", db.len(), output.display());

    Ok(())
}

fn print_file_table(report: &ParseReport) {
    let mut table = Table::new();
    table.set_header(vec!["File", "Questions", "Discarded", "Status"]);

    for file in &report.files {
        let name = file
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| file.path.display().to_string());
        let status = match &file.error {
            Some(e) => format!("skipped: {e}"),
            None if file.questions == 0 => "no questions".to_string(),
            None => "ok".to_string(),
        };
        table.add_row(vec![
            Cell::new(name),
            Cell::new(file.questions),
            Cell::new(file.discarded),
            Cell::new(status),
        ]);
    }

    eprintln!("{table}");
}
