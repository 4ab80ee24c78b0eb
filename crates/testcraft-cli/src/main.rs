//! testcraft CLI: the user-facing command-line interface.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "testcraft",
    version,
    about = "Survey and test builder with scoring and analytics"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate test-set files
    Validate {
        /// Path to test-set file or directory
        #[arg(long)]
        test_set: PathBuf,
    },

    /// Print a plain-text preview of a test
    Preview {
        /// Path to test-set file or directory
        #[arg(long)]
        test_set: PathBuf,
    },

    /// Answer a test from a JSON answers file and score it
    Take {
        /// Path to the test-set file
        #[arg(long)]
        test_set: PathBuf,

        /// JSON answers: a list of responses or a question-id map
        #[arg(long)]
        answers: PathBuf,

        /// Write the scored response as JSON
        #[arg(long)]
        save: Option<PathBuf>,
    },

    /// Print analytics tables for tests and their responses
    Stats {
        /// Path to test-set file or directory
        #[arg(long)]
        test_set: PathBuf,

        /// Responses JSON file or directory
        #[arg(long)]
        responses: PathBuf,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Write an analytics report
    Report {
        /// Path to test-set file or directory
        #[arg(long)]
        test_set: PathBuf,

        /// Responses JSON file or directory
        #[arg(long)]
        responses: PathBuf,

        /// Output directory (defaults to the configured output_dir)
        #[arg(long)]
        output: Option<PathBuf>,

        /// Output format: html, json, all
        #[arg(long, default_value = "html")]
        format: String,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Log in as a configured demo user
    Login {
        /// Username to log in as
        #[arg(long)]
        username: String,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Create starter config and example test set
    Init,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("testcraft=info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Validate { test_set } => commands::validate::execute(test_set),
        Commands::Preview { test_set } => commands::preview::execute(test_set),
        Commands::Take {
            test_set,
            answers,
            save,
        } => commands::take::execute(test_set, answers, save),
        Commands::Stats {
            test_set,
            responses,
            config,
        } => commands::stats::execute(test_set, responses, config),
        Commands::Report {
            test_set,
            responses,
            output,
            format,
            config,
        } => commands::report::execute(test_set, responses, output, format, config),
        Commands::Login { username, config } => commands::login::execute(username, config),
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
