//! flashquiz CLI — turn question files into a JSON deck and quiz yourself.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "flashquiz",
    version,
    about = "Multiple-choice flashcards from plain-text question files"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a directory of question files into a JSON database
    Parse {
        /// Directory containing the question files
        #[arg(default_value = "questions")]
        source: PathBuf,

        /// Where to write the database (default: quiz.database from config)
        #[arg(long, short)]
        output: Option<PathBuf>,

        /// Also parse files in subdirectories
        #[arg(long)]
        recursive: bool,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Run an interactive quiz over a JSON database
    Quiz {
        /// Question database (default: quiz.database from config)
        database: Option<PathBuf>,

        /// Present questions in random order
        #[arg(long)]
        shuffle: bool,

        /// Seed for a reproducible shuffle (implies --shuffle)
        #[arg(long)]
        seed: Option<u64>,

        /// Ask at most this many questions
        #[arg(long)]
        limit: Option<usize>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Check a JSON database for broken or duplicate records
    Check {
        /// Question database (default: quiz.database from config)
        database: Option<PathBuf>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Create a starter config and a sample question file
    Init,
}

fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("flashquiz=info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Parse {
            source,
            output,
            recursive,
            config,
        } => commands::parse::execute(source, output, recursive, config),
        Commands::Quiz {
            database,
            shuffle,
            seed,
            limit,
            config,
        } => commands::quiz::execute(database, shuffle, seed, limit, config),
        Commands::Check { database, config } => commands::check::execute(database, config),
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
