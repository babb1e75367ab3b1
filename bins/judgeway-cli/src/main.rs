mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "judgeway-cli")]
#[command(about = "Judgeway CLI - Run code and test suites against the execution sandbox", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List supported languages
    Languages {
        /// Only show languages the sandbox currently offers
        #[arg(long, default_value = "false")]
        remote: bool,
    },

    /// Print the starter source for a language
    Boilerplate {
        /// Language ID or name (e.g., 71 or "python")
        #[arg(short, long)]
        language: String,
    },

    /// Execute a source file once
    Run {
        /// Language ID or name
        #[arg(short, long)]
        language: String,

        /// Source file to execute
        #[arg(short, long)]
        file: PathBuf,

        /// File to feed as standard input
        #[arg(short, long)]
        stdin: Option<PathBuf>,

        /// CPU time limit in seconds
        #[arg(long, default_value = "2")]
        time_limit: f64,

        /// Memory limit in KB
        #[arg(long, default_value = "128000")]
        memory_limit: u64,
    },

    /// Validate a source file against a JSON list of test cases
    Test {
        /// Language ID or name
        #[arg(short, long)]
        language: String,

        /// Source file to validate
        #[arg(short, long)]
        file: PathBuf,

        /// JSON file with [{"input": ..., "expected_output": ...}]
        #[arg(short, long)]
        cases: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Languages { remote } => {
            commands::list_languages(remote).await?;
        }
        Commands::Boilerplate { language } => {
            commands::print_boilerplate(commands::resolve_language(&language)?)?;
        }
        Commands::Run {
            language,
            file,
            stdin,
            time_limit,
            memory_limit,
        } => {
            let language = commands::resolve_language(&language)?;
            commands::run_file(language, &file, stdin.as_deref(), time_limit, memory_limit).await?;
        }
        Commands::Test {
            language,
            file,
            cases,
        } => {
            let language = commands::resolve_language(&language)?;
            let all_passed = commands::test_file(language, &file, &cases).await?;
            if !all_passed {
                std::process::exit(1);
            }
        }
    }

    Ok(())
}
