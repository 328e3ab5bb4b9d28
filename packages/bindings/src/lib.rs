use napi::Result as NapiResult;
use napi_derive::napi;
use serde::Deserialize;

use findeck_core::investment::{investment_metrics, Investment};
use findeck_core::loan::{self, Loan, LoanType, RepaymentMethod};
use findeck_core::portfolio::Portfolio;
use findeck_core::{aggregator, schedule, Money, Percent};

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

#[derive(Deserialize)]
struct PaymentInput {
    principal: Money,
    annual_rate_pct: Percent,
    term_years: u32,
    #[serde(default)]
    repayment_method: RepaymentMethod,
}

// ---------------------------------------------------------------------------
// Loans
// ---------------------------------------------------------------------------

#[napi]
pub fn monthly_payment(input_json: String) -> NapiResult<String> {
    let input: PaymentInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let loan = Loan::new(
        LoanType::default(),
        input.principal,
        input.annual_rate_pct,
        input.term_years,
        input.repayment_method,
    )
    .map_err(to_napi_error)?;
    serde_json::to_string(&loan.monthly_payment()).map_err(to_napi_error)
}

#[napi]
pub fn loan_metrics(input_json: String) -> NapiResult<String> {
    let input: Loan = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = loan::calculate_loan_metrics(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn amortization_schedule(input_json: String) -> NapiResult<String> {
    let input: Loan = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = schedule::calculate_schedule(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Investments
// ---------------------------------------------------------------------------

#[napi]
pub fn investment_income(input_json: String) -> NapiResult<String> {
    let input: Investment = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    input.validate().map_err(to_napi_error)?;
    serde_json::to_string(&investment_metrics(&input)).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Portfolio
// ---------------------------------------------------------------------------

#[napi]
pub fn evaluate_portfolio(input_json: String) -> NapiResult<String> {
    let input: Portfolio = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = aggregator::evaluate_portfolio(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}
