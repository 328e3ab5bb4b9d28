pub mod csv_out;
pub mod minimal;
pub mod table;

use colored::Colorize;

use crate::OutputFormat;
use rust_decimal::Decimal;
use serde_json::Value;

/// Dispatch output to the appropriate formatter.
pub fn format_output(format: &OutputFormat, value: &Value) {
    match format {
        OutputFormat::Json => print_json(value),
        OutputFormat::Table => table::print_table(value),
        OutputFormat::Csv => csv_out::print_csv(value),
        OutputFormat::Minimal => minimal::print_minimal(value),
    }
}

fn print_json(value: &Value) {
    match serde_json::to_string_pretty(value) {
        Ok(s) => println!("{s}"),
        Err(e) => eprintln!("{} {e}", "Failed to render JSON:".red()),
    }
}

/// Decimals arrive as strings; show them to the cent for human-facing formats.
pub(crate) fn display_decimal(s: &str) -> String {
    match s.parse::<Decimal>() {
        Ok(d) if d.scale() > 2 => d.round_dp(2).normalize().to_string(),
        _ => s.to_string(),
    }
}
