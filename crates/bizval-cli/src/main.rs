mod commands;
mod input;
mod logging;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;

use commands::ebitda::EbitdaArgs;
use commands::grading::ScoreArgs;
use commands::multiplier::MultiplierArgs;
use commands::naics::NaicsArgs;
use commands::value::ValueArgs;

/// Business valuation from adjusted EBITDA and industry multiples
#[derive(Parser)]
#[command(
    name = "bizval",
    version,
    about = "Business valuation from adjusted EBITDA and industry multiples",
    long_about = "Estimates an enterprise value range for a small business: normalises \
                  EBITDA with owner adjustments, grades ten value drivers, and prices the \
                  result with an EBITDA multiple resolved through the NAICS hierarchy. \
                  Estimates are indicative only and are not an appraisal."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// NAICS multiplier table (JSON or YAML) replacing the built-in table
    #[arg(long, global = true)]
    naics_table: Option<String>,

    /// Log verbosity on stderr (RUST_LOG takes precedence)
    #[arg(long, default_value = "warn", global = true)]
    log_level: LogLevel,
}

#[derive(Subcommand)]
enum Commands {
    /// Value a business from an assessment form
    Value(ValueArgs),
    /// Composite score and overall grade from value-driver grades
    Score(ScoreArgs),
    /// Resolve the EBITDA multiple for a score and NAICS code
    Multiplier(MultiplierArgs),
    /// Base and adjusted EBITDA from statement and adjustment amounts
    Ebitda(EbitdaArgs),
    /// Browse the NAICS multiplier table
    Naics(NaicsArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

fn main() {
    let cli = Cli::parse();
    logging::init_logging(cli.log_level);

    let table = cli.naics_table.as_deref();
    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Value(args) => commands::value::run_value(args, table),
        Commands::Score(args) => commands::grading::run_score(args),
        Commands::Multiplier(args) => commands::multiplier::run_multiplier(args, table),
        Commands::Ebitda(args) => commands::ebitda::run_ebitda(args),
        Commands::Naics(args) => commands::naics::run_naics(args, table),
        Commands::Version => {
            println!("bizval {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            tracing::debug!(error = %e, "command failed");
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
