use crate::report::{run_lookup, run_rankings_report, LookupArgs, RankingsArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use leaderboard::error::AppError;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "Sales Leaderboard",
    about = "Serve and inspect branch, region, and rookie sales leaderboards",
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
    /// Print the branch, region, and rookie boards for a dataset file
    Rankings(RankingsArgs),
    /// Print one employee's standing across the whole dataset
    Lookup(LookupArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
    /// Dataset file restored at startup and overwritten by uploads
    #[arg(long)]
    pub(crate) dataset: Option<PathBuf>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Rankings(args) => run_rankings_report(args),
        Command::Lookup(args) => run_lookup(args),
    }
}
