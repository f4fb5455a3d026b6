use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;
mod config;

use config::Config;

/// Batch tools for the sales desk: spreadsheet merging, direct-debit
/// transaction matching, customer grouping, and call-center reports.
#[derive(Debug, Parser)]
#[command(version)]
struct Args {
    /// Path to the TOML config file carrying input/output paths.
    #[arg(long, default_value = "ddsuite.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Merge the source customer sheets into one unified spreadsheet
    Merge,
    /// Match customers against direct-debit transactions
    Match,
    /// Group the matched spreadsheet by customer with subtotals
    Group,
    /// Print call statistics per agent extension
    CallStats,
    /// Write the HTML call statistics report
    CallReport,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let args = Args::parse();
    let config = Config::load_or_default(&args.config)?;

    match args.command {
        Command::Merge => commands::run_merge(&config.merge),
        Command::Match => commands::run_match(&config.matching),
        Command::Group => commands::run_group(&config.group),
        Command::CallStats => commands::run_call_stats(&config.calls),
        Command::CallReport => commands::run_call_report(&config.calls),
    }
}
