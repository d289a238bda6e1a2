pub mod commands;

use std::process::ExitCode;

use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(
    name = "closet",
    about = "Closet operator CLI",
    long_about = "Operate the closet service: readiness checks, migrations, config inspection, \
                  and offline outfit recommendations.",
    after_help = "Examples:\n  closet doctor --json\n  closet config\n  \
                  closet recommend --wardrobe closet.json --style casual --age 28 --sex female"
)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Apply pending database migrations and return structured status output")]
    Migrate,
    #[command(
        about = "Inspect effective configuration values with source attribution and redaction"
    )]
    Config,
    #[command(about = "Validate config, database connectivity, and image storage readiness")]
    Doctor {
        #[arg(long, help = "Emit machine-readable JSON output")]
        json: bool,
    },
    #[command(about = "Recommend an outfit from a wardrobe JSON file without the HTTP server")]
    Recommend(commands::recommend::RecommendArgs),
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Migrate => commands::migrate::run(),
        Command::Config => {
            commands::CommandResult { exit_code: 0, output: commands::config::run() }
        }
        Command::Doctor { json } => commands::doctor::run(json),
        Command::Recommend(args) => commands::recommend::run(&args),
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}

