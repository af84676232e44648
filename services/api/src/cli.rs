use crate::demo::{run_demo, run_insights, run_score, DemoArgs, InsightsArgs, ScoreArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use fitscore::error::AppError;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "FitScore",
    about = "Score candidate questionnaires and serve the FitScore dashboard API",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Score one questionnaire from the command line
    Score(ScoreArgs),
    /// Aggregate dashboard insights from an evaluations CSV export
    Insights(InsightsArgs),
    /// Run an in-memory walkthrough of intake, insights, reports and background jobs
    Demo(DemoArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
    /// Preload the in-memory store from an evaluations CSV export
    #[arg(long)]
    pub(crate) seed_csv: Option<PathBuf>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Score(args) => run_score(args),
        Command::Insights(args) => run_insights(args),
        Command::Demo(args) => run_demo(args).await,
    }
}
