//! The `flashquiz init` command.

use anyhow::Result;

pub fn execute() -> Result<()> {
    if std::path::Path::new("flashquiz.toml").exists() {
        println!("flashquiz.toml already exists, skipping.");
    } else {
        std::fs::write("flashquiz.toml", SAMPLE_CONFIG)?;
        println!("Created flashquiz.toml");
    }

    std::fs::create_dir_all("questions")?;
    let sample_path = std::path::Path::new("questions/sample.txt");
    if sample_path.exists() {
        println!("questions/sample.txt already exists, skipping.");
    } else {
        std::fs::write(sample_path, SAMPLE_QUESTIONS)?;
        println!("Created questions/sample.txt");
    }

    println!("\nNext steps:");
    println!("  1. Add your own question files to questions/");
    println!("  2. Run: flashquiz parse questions");
    println!("  3. Run: flashquiz quiz");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# flashquiz configuration

[parser]
extensions = ["txt"]
recursive = false
min_choices = 2

# Line patterns (Rust regex syntax). Each needs the named groups shown.
question_pattern = '^\s*(?P<number>\d+)\s*[.)]\s*(?P<text>.*)$'
choice_pattern = '^\s*(?P<marker>\*?)\s*(?P<label>[A-Za-z])\s*[.)]\s*(?P<text>.*)$'
answer_pattern = '(?i)^\s*(?:correct\s+answer|answer|ans)\s*[:=-]\s*\(?(?P<label>[A-Za-z])\)?\s*\.?\s*$'

[quiz]
database = "questions.json"
shuffle = false
"#;

const SAMPLE_QUESTIONS: &str = "\
1. What color is the sky on a clear day?
A. Red
B. Blue
C. Green
Answer: B

2. Which keyword declares an immutable binding in Rust?
a. var
*b. let
c. const mut
d. static mut

3. How many bits are in a byte?
A) 4
B) 8
C) 16
Answer: B
";
