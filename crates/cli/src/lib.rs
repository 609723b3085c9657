pub mod commands;

use clap::{Parser, Subcommand};
use std::process::ExitCode;

use commands::{recommend::RecommendArgs, similar::SimilarArgs};

#[derive(Debug, Parser)]
#[command(
    name = "recommender",
    about = "Product recommender operator CLI",
    long_about = "Inspect configuration, check dataset readiness, and run recommendation queries against the configured catalog.",
    after_help = "Examples:\n  recommender doctor --json\n  recommender recommend --category Laptops --sort-by price_asc --limit 5\n  recommender similar --id 42"
)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(
        about = "Inspect effective configuration values with source attribution"
    )]
    Config,
    #[command(about = "Validate config and check that the dataset loads into a usable catalog")]
    Doctor {
        #[arg(long, help = "Emit machine-readable JSON output")]
        json: bool,
    },
    #[command(about = "Filter the catalog and print ranked recommendations as JSON")]
    Recommend(RecommendArgs),
    #[command(about = "Print products in the same category ranked by similarity as JSON")]
    Similar(SimilarArgs),
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Config => {
            commands::CommandResult { exit_code: 0, output: commands::config::run() }
        }
        Command::Doctor { json } => commands::doctor::run(json),
        Command::Recommend(args) => commands::recommend::run(&args),
        Command::Similar(args) => commands::similar::run(&args),
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}
