use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;
mod config;

#[derive(Parser)]
#[command(name = "parley", about = "CEFR speaking evaluation from transcripts")]
#[command(version, propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate a transcript against the CEFR rubric
    Evaluate(commands::evaluate::EvaluateArgs),
    /// Check an evaluation JSON file against the rubric
    Validate(commands::validate::ValidateArgs),
    /// Print the JSON Schema sent to the model
    Schema,
    /// Manage configuration
    Config(commands::config::ConfigArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so `--json` output stays clean.
    let default = if cli.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Evaluate(args) => commands::evaluate::run(args).await,
        Commands::Validate(args) => commands::validate::run(args),
        Commands::Schema => commands::schema::run(),
        Commands::Config(args) => commands::config::run(args),
    }
}
