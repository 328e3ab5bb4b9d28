mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;
use tracing_subscriber::EnvFilter;

use commands::investment::IncomeArgs;
use commands::loan::LoanArgs;
use commands::portfolio::EvaluateArgs;

/// Borrow-to-invest cash-flow calculator
#[derive(Parser)]
#[command(
    name = "findeck",
    version,
    about = "Borrow-to-invest cash-flow calculator",
    long_about = "Evaluates whether borrowing to invest produces positive net cash flow. \
                  Computes loan payments (amortizing or interest-only), investment cash \
                  income, and the portfolio-level net spread with decimal precision."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true, env = "FINDECK_OUTPUT")]
    output: OutputFormat,

    /// Log debug detail to stderr (RUST_LOG takes precedence)
    #[arg(long, short, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Monthly payment and annual cost of one loan
    Payment(LoanArgs),
    /// Month-by-month repayment schedule of one loan
    Schedule(LoanArgs),
    /// Annual cash income of one investment
    Income(IncomeArgs),
    /// Net cash flow of a set of loans and investments
    Evaluate(EvaluateArgs),
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

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Payment(args) => commands::loan::run_payment(args),
        Commands::Schedule(args) => commands::loan::run_schedule(args),
        Commands::Income(args) => commands::investment::run_income(args),
        Commands::Evaluate(args) => commands::portfolio::run_evaluate(args),
        Commands::Version => {
            println!("findeck {}", env!("CARGO_PKG_VERSION"));
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
