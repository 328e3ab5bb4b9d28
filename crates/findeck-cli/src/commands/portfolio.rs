use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use findeck_core::aggregator;
use findeck_core::investment::Investment;
use findeck_core::loan::Loan;
use findeck_core::portfolio::Portfolio;

use super::investment::parse_asset_type;
use super::loan::{parse_loan_type, parse_method};
use crate::input;

/// Arguments for evaluating a borrow-to-invest portfolio
#[derive(Args)]
pub struct EvaluateArgs {
    /// Path to JSON file with {"loans": [...], "investments": [...]}, or - for stdin
    #[arg(long)]
    pub input: Option<String>,

    /// Inline loan "type:principal:rate_pct:years[:method]" (repeatable)
    #[arg(long = "loan", value_parser = parse_loan_spec)]
    pub loans: Vec<Loan>,

    /// Inline investment "type:amount:yield_pct[:growth_pct]" (repeatable)
    #[arg(long = "investment", value_parser = parse_investment_spec)]
    pub investments: Vec<Investment>,

    /// Remove the loan at this index before evaluating (repeatable, applied in order)
    #[arg(long)]
    pub remove_loan: Vec<usize>,

    /// Remove the investment at this index before evaluating (repeatable, applied in order)
    #[arg(long)]
    pub remove_investment: Vec<usize>,
}

fn parse_decimal(field: &str, raw: &str) -> Result<Decimal, String> {
    raw.trim()
        .parse::<Decimal>()
        .map_err(|e| format!("invalid {field} '{raw}': {e}"))
}

/// Parse "type:principal:rate_pct:years[:method]".
pub fn parse_loan_spec(spec: &str) -> Result<Loan, String> {
    let parts: Vec<&str> = spec.split(':').collect();
    if !(4..=5).contains(&parts.len()) {
        return Err(format!(
            "expected type:principal:rate_pct:years[:method], got '{spec}'"
        ));
    }

    let term_years = parts[3]
        .trim()
        .parse::<u32>()
        .map_err(|e| format!("invalid years '{}': {e}", parts[3]))?;
    let method = match parts.get(4) {
        Some(m) => parse_method(m)?,
        None => Default::default(),
    };

    Loan::new(
        parse_loan_type(parts[0]),
        parse_decimal("principal", parts[1])?,
        parse_decimal("rate", parts[2])?,
        term_years,
        method,
    )
    .map_err(|e| e.to_string())
}

/// Parse "type:amount:yield_pct[:growth_pct]".
pub fn parse_investment_spec(spec: &str) -> Result<Investment, String> {
    let parts: Vec<&str> = spec.split(':').collect();
    if !(3..=4).contains(&parts.len()) {
        return Err(format!(
            "expected type:amount:yield_pct[:growth_pct], got '{spec}'"
        ));
    }

    let growth = parts
        .get(3)
        .map(|g| parse_decimal("growth", g))
        .transpose()?;

    Investment::new(
        parse_asset_type(parts[0]),
        parse_decimal("amount", parts[1])?,
        parse_decimal("yield", parts[2])?,
        growth,
    )
    .map_err(|e| e.to_string())
}

fn resolve_portfolio(args: &EvaluateArgs) -> Result<Portfolio, Box<dyn std::error::Error>> {
    if let Some(ref path) = args.input {
        let mut portfolio: Portfolio = input::file::read_json(path)?;
        append_inline(&mut portfolio, args)?;
        return Ok(portfolio);
    }
    if args.loans.is_empty() && args.investments.is_empty() {
        if let Some(portfolio) = input::stdin::read_stdin()? {
            return Ok(portfolio);
        }
        return Err(
            "Provide --input, --loan/--investment, or pipe portfolio JSON via stdin".into(),
        );
    }
    let mut portfolio = Portfolio::new();
    append_inline(&mut portfolio, args)?;
    Ok(portfolio)
}

fn append_inline(
    portfolio: &mut Portfolio,
    args: &EvaluateArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    for loan in &args.loans {
        portfolio.push_loan(loan.clone())?;
    }
    for investment in &args.investments {
        portfolio.push_investment(investment.clone())?;
    }
    Ok(())
}

pub fn run_evaluate(args: EvaluateArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let mut portfolio = resolve_portfolio(&args)?;

    for &index in &args.remove_loan {
        portfolio.remove_loan(index)?;
    }
    for &index in &args.remove_investment {
        portfolio.remove_investment(index)?;
    }

    let result = aggregator::evaluate_portfolio(&portfolio)?;
    Ok(serde_json::to_value(result)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use findeck_core::investment::AssetType;
    use findeck_core::loan::{LoanType, RepaymentMethod};
    use rust_decimal_macros::dec;

    fn decimal(value: &Value) -> Decimal {
        value.as_str().and_then(|s| s.parse().ok()).unwrap_or_default()
    }

    #[test]
    fn test_parse_loan_spec_full() {
        let loan = parse_loan_spec("mortgage:1000000:2.5:20:interest-only").unwrap();
        assert_eq!(loan.loan_type, LoanType::Mortgage);
        assert_eq!(loan.principal, dec!(1000000));
        assert_eq!(loan.annual_rate_pct, dec!(2.5));
        assert_eq!(loan.term_years, 20);
        assert_eq!(loan.repayment_method, RepaymentMethod::InterestOnly);
    }

    #[test]
    fn test_parse_loan_spec_defaults_to_amortizing() {
        let loan = parse_loan_spec("policy:300000:4:5").unwrap();
        assert_eq!(loan.loan_type, LoanType::PolicyLoan);
        assert_eq!(loan.repayment_method, RepaymentMethod::Amortizing);
    }

    #[test]
    fn test_parse_loan_spec_rejects_bad_input() {
        assert!(parse_loan_spec("mortgage:1000").is_err());
        assert!(parse_loan_spec("mortgage:abc:2:10").is_err());
        assert!(parse_loan_spec("mortgage:1000:2:0").is_err());
        assert!(parse_loan_spec("mortgage:-1000:2:10").is_err());
    }

    #[test]
    fn test_parse_investment_spec() {
        let inv = parse_investment_spec("bond_etf:1000000:5").unwrap();
        assert_eq!(inv.asset_type, AssetType::BondEtf);
        assert_eq!(inv.yield_pct, dec!(5));
        assert_eq!(inv.growth_pct, None);

        let inv = parse_investment_spec("stock:500000:2:7.5").unwrap();
        assert_eq!(inv.growth_pct, Some(dec!(7.5)));

        assert!(parse_investment_spec("stock:500000").is_err());
        assert!(parse_investment_spec("stock:500000:-1").is_err());
    }

    #[test]
    fn test_run_evaluate_inline_with_removal() {
        let args = EvaluateArgs {
            input: None,
            loans: vec![
                parse_loan_spec("mortgage:1000000:2.5:20:interest-only").unwrap(),
                parse_loan_spec("credit:500000:6:7").unwrap(),
            ],
            investments: vec![parse_investment_spec("bond_etf:1000000:5").unwrap()],
            remove_loan: vec![1],
            remove_investment: vec![],
        };
        let value = run_evaluate(args).unwrap();
        assert_eq!(value["result"]["state"], "evaluated");
        assert_eq!(value["result"]["status"], "positive");
        assert_eq!(value["result"]["is_positive"], true);
    }

    #[test]
    fn test_run_evaluate_bad_removal_index() {
        let args = EvaluateArgs {
            input: None,
            loans: vec![parse_loan_spec("mortgage:1000:1:1").unwrap()],
            investments: vec![],
            remove_loan: vec![0, 0],
            remove_investment: vec![],
        };
        assert!(run_evaluate(args).is_err());
    }

    #[test]
    fn test_run_evaluate_input_file_with_inline_additions() {
        let path = std::env::temp_dir().join("findeck-run-evaluate-portfolio.json");
        std::fs::write(
            &path,
            r#"{ "loans": [ { "principal": "1000000", "annual_rate_pct": "2.5", "term_years": 20,
                              "repayment_method": "interest_only" } ] }"#,
        )
        .unwrap();
        let args = EvaluateArgs {
            input: Some(path.display().to_string()),
            loans: vec![],
            investments: vec![parse_investment_spec("bond_etf:1000000:5").unwrap()],
            remove_loan: vec![],
            remove_investment: vec![],
        };
        let value = run_evaluate(args).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(value["result"]["state"], "evaluated");
        assert_eq!(decimal(&value["result"]["net_annual_cashflow"]), dec!(25000));
        assert_eq!(value["result"]["capital_structure"], "fully_deployed");
    }

    #[test]
    fn test_run_evaluate_input_file_with_invalid_record() {
        let path = std::env::temp_dir().join("findeck-run-evaluate-invalid.json");
        std::fs::write(
            &path,
            r#"{ "investments": [ { "amount": "1000", "yield_pct": "-1" } ] }"#,
        )
        .unwrap();
        let args = EvaluateArgs {
            input: Some(path.display().to_string()),
            loans: vec![],
            investments: vec![],
            remove_loan: vec![],
            remove_investment: vec![],
        };
        let result = run_evaluate(args);
        std::fs::remove_file(&path).ok();
        let err = result.unwrap_err();
        assert!(err.to_string().contains("investments[0].yield_pct"), "got {err}");
    }
}
