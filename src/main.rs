use std::process::ExitCode;

use clap::{Parser, Subcommand};

use labeler::action;
use labeler::error::LabelerError;

mod commands;
mod format;
mod telemetry;

/// Label contribution pull requests by category
///
/// Contributions live under one directory, grouped by category and then by
/// author folder. For every pull request the labeler checks that all changed
/// files belong to exactly one category and one author folder, adds that
/// category's label, and adds the proposal label when the pull request starts
/// a new submission.
///
/// IN A WORKFLOW:
///
///   contrib-labeler run
///
///   # inputs come from INPUT_GITHUB-TOKEN, INPUT_CONFIGURATION-PATH,
///   # GITHUB_REPOSITORY, GITHUB_EVENT_PATH and GITHUB_SHA
///
/// LOCALLY:
///
///   contrib-labeler check-config .github/labeler.yml
///   contrib-labeler classify added:contributions/essay/ana/README.md
///   contrib-labeler run --repository octo/course --pr 12 --dry-run
#[derive(Parser)]
#[command(name = "contrib-labeler")]
#[command(version, about)]
#[command(propagate_version = true)]
#[command(after_help = "See 'contrib-labeler <command> --help' \
                         for more information on a specific command.")]
struct Cli {
    /// Log format on stderr: text or json
    #[arg(long, global = true, default_value = "text")]
    log_format: telemetry::LogFormat,

    /// Emit workflow commands (set by GitHub Actions)
    #[arg(long, global = true, env = "GITHUB_ACTIONS", hide = true)]
    github_actions: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    Run(commands::RunArgs),

    Classify(commands::ClassifyArgs),

    #[command(name = "check-config")]
    CheckConfig(commands::CheckConfigArgs),

    Stats(commands::StatsArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    telemetry::init(cli.log_format);

    let result = match &cli.command {
        Commands::Run(args) => commands::run(args, cli.github_actions),
        Commands::Classify(args) => commands::classify(args),
        Commands::CheckConfig(args) => commands::check_config(args),
        Commands::Stats(args) => commands::stats(args),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            // LabelerError messages already include their cause.
            let message = if err.downcast_ref::<LabelerError>().is_some() {
                err.to_string()
            } else {
                format!("{err:#}")
            };
            eprintln!("error: {message}");
            if cli.github_actions {
                println!("{}", action::error_annotation(&message));
            }
            ExitCode::FAILURE
        }
    }
}
