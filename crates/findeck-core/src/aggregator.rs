//! Portfolio-level cash-flow aggregation and classification.
//!
//! Every figure is recomputed from the current loans and investments on each
//! call; nothing is cached between evaluations. Borrowed capital is treated
//! as funding invested capital in aggregate, never pairwise.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::debug;

use crate::investment::{investment_metrics, Investment, InvestmentMetrics};
use crate::loan::{loan_metrics, Loan, LoanMetrics};
use crate::portfolio::Portfolio;
use crate::time_value::PERIODS_PER_YEAR;
use crate::types::{with_metadata, ComputationOutput, Money, Percent, MAX_AMOUNT, MAX_RATE_PCT};
use crate::FinDeckResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Sign of the net annual cash flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CashFlowStatus {
    /// Income exceeds service cost; the arbitrage is viable.
    Positive,
    /// Exactly zero. Acceptable, not a failure.
    Breakeven,
    /// Service cost exceeds income.
    Negative,
}

impl CashFlowStatus {
    /// `true` for positive and breakeven.
    pub fn is_non_negative(self) -> bool {
        !matches!(self, CashFlowStatus::Negative)
    }
}

/// How borrowed principal compares with invested principal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CapitalStructure {
    /// More was borrowed than invested.
    IdleCapital,
    FullyDeployed,
    /// More was invested than borrowed; the surplus is own money.
    SelfFunded,
}

impl CapitalStructure {
    pub fn from_gap(gap: Money) -> Self {
        if gap > Decimal::ZERO {
            CapitalStructure::IdleCapital
        } else if gap < Decimal::ZERO {
            CapitalStructure::SelfFunded
        } else {
            CapitalStructure::FullyDeployed
        }
    }
}

/// Full set of portfolio figures.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioMetrics {
    pub loans: Vec<LoanMetrics>,
    pub investments: Vec<InvestmentMetrics>,
    pub total_annual_loan_cost: Money,
    pub total_annual_investment_income: Money,
    pub net_annual_cashflow: Money,
    pub net_monthly_cashflow: Money,
    pub weighted_average_loan_rate: Percent,
    pub weighted_average_yield: Percent,
    /// Weighted yield minus weighted loan rate, in percentage points.
    pub rate_spread: Percent,
    pub total_loan_principal: Money,
    pub total_invested: Money,
    pub capital_gap: Money,
    pub capital_structure: CapitalStructure,
    pub status: CashFlowStatus,
    /// `net_annual_cashflow >= 0`.
    pub is_positive: bool,
    /// Negative cash flow while at least one loan amortizes principal.
    pub amortization_pressure: bool,
    pub verdict: String,
}

/// Result of evaluating a portfolio.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum PortfolioEvaluation {
    /// Loans or investments are still missing; show a prompt, not a result.
    NotEvaluable { reason: String },
    Evaluated(PortfolioMetrics),
}

impl PortfolioEvaluation {
    pub fn metrics(&self) -> Option<&PortfolioMetrics> {
        match self {
            PortfolioEvaluation::Evaluated(m) => Some(m),
            PortfolioEvaluation::NotEvaluable { .. } => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Aggregation
// ---------------------------------------------------------------------------

/// Σ `monthly_payment * 12` over all loans.
pub fn total_annual_loan_cost(loans: &[Loan]) -> Money {
    loans.iter().map(Loan::annual_cost).sum()
}

/// Σ `amount * yield_pct / 100`. Growth is excluded.
pub fn total_annual_investment_income(investments: &[Investment]) -> Money {
    investments.iter().map(Investment::annual_income).sum()
}

pub fn net_annual_cashflow(loans: &[Loan], investments: &[Investment]) -> Money {
    total_annual_investment_income(investments) - total_annual_loan_cost(loans)
}

fn bounded_amount(amount: Money) -> Money {
    amount.clamp(Decimal::ZERO, MAX_AMOUNT)
}

fn bounded_pct(pct: Percent) -> Percent {
    pct.clamp(Decimal::ZERO, MAX_RATE_PCT)
}

/// `Σ(amount·rate) / Σ amount`, or zero when the amounts sum to zero.
pub fn weighted_average_rate<T>(
    items: &[T],
    amount: impl Fn(&T) -> Money,
    rate: impl Fn(&T) -> Percent,
) -> Percent {
    let (weighted, total) = items
        .iter()
        .fold((Decimal::ZERO, Decimal::ZERO), |(weighted, total), item| {
            let a = amount(item);
            (weighted + a * rate(item), total + a)
        });

    if total.is_zero() {
        return Decimal::ZERO;
    }
    weighted / total
}

pub fn weighted_average_loan_rate(loans: &[Loan]) -> Percent {
    weighted_average_rate(
        loans,
        |l| bounded_amount(l.principal),
        |l| bounded_pct(l.annual_rate_pct),
    )
}

pub fn weighted_average_yield(investments: &[Investment]) -> Percent {
    weighted_average_rate(
        investments,
        |i| bounded_amount(i.amount),
        |i| bounded_pct(i.yield_pct),
    )
}

pub fn total_loan_principal(loans: &[Loan]) -> Money {
    loans.iter().map(|l| bounded_amount(l.principal)).sum()
}

pub fn total_invested(investments: &[Investment]) -> Money {
    investments.iter().map(|i| bounded_amount(i.amount)).sum()
}

/// Borrowed principal minus invested principal.
pub fn capital_gap(loans: &[Loan], investments: &[Investment]) -> Money {
    total_loan_principal(loans) - total_invested(investments)
}

pub fn classify(net_annual_cashflow: Money) -> CashFlowStatus {
    if net_annual_cashflow > Decimal::ZERO {
        CashFlowStatus::Positive
    } else if net_annual_cashflow < Decimal::ZERO {
        CashFlowStatus::Negative
    } else {
        CashFlowStatus::Breakeven
    }
}

fn verdict(status: CashFlowStatus, net: Money, amortization_pressure: bool) -> String {
    match status {
        CashFlowStatus::Positive => format!(
            "Cash-flow positive: the structure generates {} per year",
            net.round_dp(0)
        ),
        CashFlowStatus::Breakeven => {
            "Breakeven: investment income exactly covers loan service".to_string()
        }
        CashFlowStatus::Negative if amortization_pressure => format!(
            "Cash-flow negative: shortfall of {} per year, compounded by principal repayments on amortizing loans",
            (-net).round_dp(0)
        ),
        CashFlowStatus::Negative => format!(
            "Cash-flow negative: shortfall of {} per year; consider a lower rate or a higher-yield allocation",
            (-net).round_dp(0)
        ),
    }
}

// ---------------------------------------------------------------------------
// Evaluation
// ---------------------------------------------------------------------------

/// Compute every portfolio figure from the current collections.
pub fn evaluate(portfolio: &Portfolio) -> PortfolioEvaluation {
    let loans = portfolio.loans();
    let investments = portfolio.investments();

    if !portfolio.is_evaluable() {
        let reason = match (loans.is_empty(), investments.is_empty()) {
            (true, true) => "Add at least one loan and one investment",
            (true, false) => "Add at least one loan",
            _ => "Add at least one investment",
        };
        return PortfolioEvaluation::NotEvaluable {
            reason: reason.to_string(),
        };
    }

    let loan_rows: Vec<LoanMetrics> = loans.iter().map(loan_metrics).collect();
    let investment_rows: Vec<InvestmentMetrics> =
        investments.iter().map(investment_metrics).collect();

    let cost: Money = loan_rows.iter().map(|l| l.annual_cost).sum();
    let income: Money = investment_rows.iter().map(|i| i.annual_income).sum();
    let net = income - cost;

    let loan_rate = weighted_average_loan_rate(loans);
    let yield_rate = weighted_average_yield(investments);
    let borrowed = total_loan_principal(loans);
    let invested = total_invested(investments);
    let gap = borrowed - invested;

    let status = classify(net);
    let amortization_pressure =
        status == CashFlowStatus::Negative && loans.iter().any(Loan::is_amortizing);

    debug!(%cost, %income, %net, ?status, "portfolio evaluated");

    PortfolioEvaluation::Evaluated(PortfolioMetrics {
        loans: loan_rows,
        investments: investment_rows,
        total_annual_loan_cost: cost,
        total_annual_investment_income: income,
        net_annual_cashflow: net,
        net_monthly_cashflow: net / Decimal::from(PERIODS_PER_YEAR),
        weighted_average_loan_rate: loan_rate,
        weighted_average_yield: yield_rate,
        rate_spread: yield_rate - loan_rate,
        total_loan_principal: borrowed,
        total_invested: invested,
        capital_gap: gap,
        capital_structure: CapitalStructure::from_gap(gap),
        status,
        is_positive: status.is_non_negative(),
        amortization_pressure,
        verdict: verdict(status, net, amortization_pressure),
    })
}

/// Validate the portfolio and evaluate it inside the standard envelope.
pub fn evaluate_portfolio(
    portfolio: &Portfolio,
) -> FinDeckResult<ComputationOutput<PortfolioEvaluation>> {
    let start = Instant::now();
    portfolio.validate()?;

    let mut warnings: Vec<String> = Vec::new();
    let evaluation = evaluate(portfolio);

    if let Some(m) = evaluation.metrics() {
        if m.status == CashFlowStatus::Negative {
            warnings.push(m.verdict.clone());
        }
        match m.capital_structure {
            CapitalStructure::IdleCapital => warnings.push(format!(
                "Borrowed capital exceeds invested capital by {}; idle funds accrue interest without income",
                m.capital_gap
            )),
            CapitalStructure::SelfFunded => warnings.push(format!(
                "Invested capital exceeds borrowed capital by {}; the surplus is self-funded",
                -m.capital_gap
            )),
            CapitalStructure::FullyDeployed => {}
        }
        if m.rate_spread < Decimal::ZERO {
            warnings.push(format!(
                "Weighted yield {}% is below weighted borrowing rate {}%",
                m.weighted_average_yield.round_dp(4),
                m.weighted_average_loan_rate.round_dp(4)
            ));
        }
    }

    if portfolio
        .investments()
        .iter()
        .any(|i| matches!(i.growth_pct, Some(g) if !g.is_zero()))
    {
        warnings.push(
            "Capital appreciation is unrealized and excluded from cash-flow figures".into(),
        );
    }

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Borrow-to-invest net cash flow (annualized)",
        &serde_json::json!({
            "loan_count": portfolio.loans().len(),
            "investment_count": portfolio.investments().len(),
            "payments_per_year": PERIODS_PER_YEAR,
            "income_basis": "cash yield only",
        }),
        warnings,
        elapsed,
        evaluation,
    ))
}
