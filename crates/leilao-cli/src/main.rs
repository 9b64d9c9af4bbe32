mod commands;
mod config;
mod input;
mod output;
mod prompt;

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;
use tracing::Level;

use commands::checklist::ChecklistArgs;
use commands::costs::CostsArgs;
use commands::format::FormatArgs;
use commands::steps::StepsArgs;

/// Step-by-step checklist and cost calculator for buying property at auction
#[derive(Parser)]
#[command(
    name = "leilao",
    version,
    about = "Checklist and cost calculator for buying property at judicial or extrajudicial auction",
    long_about = "Walks a buyer through the steps of acquiring a property at auction \
                  (documents, occupancy, payment, post-auction duties), aggregates the \
                  acquisition costs (commission, ITBI, registry, debts, settlement, \
                  renovation) and renders a final report with values in R$."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// YAML or JSON settings file with default rates
    #[arg(long, global = true)]
    config: Option<String>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Aggregate acquisition costs for a bid
    Costs(CostsArgs),
    /// Format an amount as Brazilian currency text (1.234,56)
    FormatBrl(FormatArgs),
    /// Run the purchase checklist and generate the final report
    Checklist(ChecklistArgs),
    /// List the checklist steps
    Steps(StepsArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
    Text,
}

fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = match config::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    };

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Costs(args) => commands::costs::run_costs(args, &config),
        Commands::FormatBrl(args) => commands::format::run_format_brl(args),
        Commands::Checklist(args) => commands::checklist::run_checklist(args, &config),
        Commands::Steps(args) => commands::steps::run_steps(args),
        Commands::Version => {
            println!("leilao {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
