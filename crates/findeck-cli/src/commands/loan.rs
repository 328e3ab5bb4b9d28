use clap::{Args, ValueEnum};
use rust_decimal::Decimal;
use serde_json::Value;

use findeck_core::loan::{self, Loan, LoanType, RepaymentMethod};
use findeck_core::schedule;

use crate::input;

/// Repayment method as accepted on the command line
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum MethodArg {
    /// Level payment of interest and principal
    Amortizing,
    /// Interest only, principal repaid at maturity
    InterestOnly,
}

impl From<MethodArg> for RepaymentMethod {
    fn from(arg: MethodArg) -> Self {
        match arg {
            MethodArg::Amortizing => RepaymentMethod::Amortizing,
            MethodArg::InterestOnly => RepaymentMethod::InterestOnly,
        }
    }
}

/// Arguments describing a single loan
#[derive(Args)]
pub struct LoanArgs {
    /// Path to JSON file with a single loan, or - for stdin (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Loan type: mortgage, personal_credit, policy_loan, or free text
    #[arg(long, default_value = "mortgage")]
    pub loan_type: String,

    /// Principal borrowed
    #[arg(long)]
    pub principal: Option<Decimal>,

    /// Annual interest rate in percent (e.g. 2.5)
    #[arg(long)]
    pub rate: Option<Decimal>,

    /// Term in years (1-40)
    #[arg(long)]
    pub years: Option<u32>,

    /// Repayment method
    #[arg(long, value_enum, default_value = "amortizing")]
    pub method: MethodArg,
}

/// Parse a loan type name; unknown names are kept as free text.
pub fn parse_loan_type(s: &str) -> LoanType {
    match s.trim().to_lowercase().replace('-', "_").as_str() {
        "mortgage" => LoanType::Mortgage,
        "personal_credit" | "credit" => LoanType::PersonalCredit,
        "policy_loan" | "policy" => LoanType::PolicyLoan,
        _ => LoanType::Other(s.trim().to_string()),
    }
}

/// Parse a repayment method name.
pub fn parse_method(s: &str) -> Result<RepaymentMethod, String> {
    match s.trim().to_lowercase().replace('-', "_").as_str() {
        "amortizing" | "amortising" => Ok(RepaymentMethod::Amortizing),
        "interest_only" | "io" => Ok(RepaymentMethod::InterestOnly),
        other => Err(format!(
            "Unknown repayment method '{other}'. Use: amortizing, interest-only"
        )),
    }
}

fn resolve_loan(args: LoanArgs) -> Result<Loan, Box<dyn std::error::Error>> {
    if let Some(ref path) = args.input {
        return Ok(input::file::read_json(path)?);
    }
    if args.principal.is_none() {
        if let Some(loan) = input::stdin::read_stdin()? {
            return Ok(loan);
        }
    }
    Ok(Loan {
        loan_type: parse_loan_type(&args.loan_type),
        principal: args
            .principal
            .ok_or("--principal is required (or provide --input)")?,
        annual_rate_pct: args.rate.ok_or("--rate is required (or provide --input)")?,
        term_years: args.years.ok_or("--years is required (or provide --input)")?,
        repayment_method: args.method.into(),
    })
}

pub fn run_payment(args: LoanArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let loan = resolve_loan(args)?;
    let result = loan::calculate_loan_metrics(&loan)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_schedule(args: LoanArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let loan = resolve_loan(args)?;
    let result = schedule::calculate_schedule(&loan)?;
    Ok(serde_json::to_value(result)?)
}
