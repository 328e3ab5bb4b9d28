//! Borrowing facilities and the monthly payment calculator.
//!
//! A loan is serviced monthly under one of two repayment methods. Amortizing
//! loans pay a level annuity that retires principal by maturity; interest-only
//! loans pay interest each month and leave principal untouched until the end
//! of the term.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::warn;

use crate::error::FinDeckError;
use crate::time_value::{annuity_payment, monthly_rate, PERIODS_PER_YEAR};
use crate::types::{
    pct_to_rate, with_metadata, ComputationOutput, Money, Percent, Rate, MAX_AMOUNT, MAX_RATE_PCT,
};
use crate::FinDeckResult;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

pub const MIN_TERM_YEARS: u32 = 1;
pub const MAX_TERM_YEARS: u32 = 40;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Borrowing category as offered by the entry form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoanType {
    #[default]
    Mortgage,
    PersonalCredit,
    PolicyLoan,
    Other(String),
}

/// How principal is repaid over the term.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RepaymentMethod {
    /// Level payment of interest plus principal; balance reaches zero at maturity.
    #[default]
    Amortizing,
    /// Interest only; principal is repaid as a bullet at maturity.
    InterestOnly,
}

/// A single borrowing facility.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Loan {
    #[serde(default)]
    pub loan_type: LoanType,
    /// Amount borrowed.
    pub principal: Money,
    /// Annual interest rate in percent (2.5 = 2.5%).
    pub annual_rate_pct: Percent,
    /// Term in whole years, 1 to 40.
    pub term_years: u32,
    #[serde(default)]
    pub repayment_method: RepaymentMethod,
}

/// Derived figures for one loan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanMetrics {
    pub loan_type: LoanType,
    pub repayment_method: RepaymentMethod,
    pub principal: Money,
    pub annual_rate_pct: Percent,
    pub term_years: u32,
    pub monthly_payment: Money,
    pub annual_cost: Money,
    /// Every payment over the term, including the bullet for interest-only.
    pub total_repayment: Money,
    pub total_interest: Money,
    pub first_year_interest: Money,
    pub first_year_principal: Money,
}

// ---------------------------------------------------------------------------
// Payment calculator
// ---------------------------------------------------------------------------

/// Monthly cash outflow required to service a loan.
///
/// Zero principal always yields zero. Out-of-contract values are clamped
/// into the accepted ranges (principal and rate from zero up to
/// `MAX_AMOUNT` and `MAX_RATE_PCT`, term to 1..=40 years) so the function
/// is total.
///
/// Interest-only: `P * r`. Amortizing: `P * r(1+r)^n / ((1+r)^n - 1)`, or
/// `P / n` when the rate is zero. Here `r = pct / 100 / 12` and
/// `n = years * 12`.
pub fn monthly_payment(
    principal: Money,
    annual_rate_pct: Percent,
    term_years: u32,
    method: RepaymentMethod,
) -> Money {
    if principal.is_zero() {
        return Decimal::ZERO;
    }

    let (principal, annual_rate_pct, term_years) =
        clamp_inputs(principal, annual_rate_pct, term_years);
    if principal.is_zero() {
        return Decimal::ZERO;
    }

    let r = monthly_rate(annual_rate_pct);
    match method {
        RepaymentMethod::InterestOnly => principal * r,
        RepaymentMethod::Amortizing => {
            annuity_payment(r, term_years * PERIODS_PER_YEAR, principal)
        }
    }
}

/// Annualized service cost, `monthly_payment * 12`.
///
/// Interest-only cost is taken directly as `P * pct / 100`; it is the same
/// quantity but stays exact where `pct / 1200` would not terminate.
pub fn annual_cost(
    principal: Money,
    annual_rate_pct: Percent,
    term_years: u32,
    method: RepaymentMethod,
) -> Money {
    match method {
        RepaymentMethod::InterestOnly => {
            let (principal, annual_rate_pct, _) =
                clamp_inputs(principal, annual_rate_pct, term_years);
            principal * pct_to_rate(annual_rate_pct)
        }
        RepaymentMethod::Amortizing => {
            monthly_payment(principal, annual_rate_pct, term_years, method)
                * Decimal::from(PERIODS_PER_YEAR)
        }
    }
}

/// Split one month's payment into (interest, principal) on `balance`.
///
/// The principal portion never exceeds the outstanding balance.
pub fn split_payment(balance: Money, rate: Rate, payment: Money) -> (Money, Money) {
    let interest = balance * rate;
    let principal = (payment - interest).max(Decimal::ZERO).min(balance);
    (interest, principal)
}

fn clamp_inputs(principal: Money, annual_rate_pct: Percent, term_years: u32) -> (Money, Percent, u32) {
    let clamped = (
        principal.clamp(Decimal::ZERO, MAX_AMOUNT),
        annual_rate_pct.clamp(Decimal::ZERO, MAX_RATE_PCT),
        clamp_term(term_years),
    );
    if clamped != (principal, annual_rate_pct, term_years) {
        warn!(
            %principal,
            %annual_rate_pct,
            term_years,
            "out-of-contract loan input clamped"
        );
    }
    clamped
}

fn clamp_term(term_years: u32) -> u32 {
    term_years.clamp(MIN_TERM_YEARS, MAX_TERM_YEARS)
}

// ---------------------------------------------------------------------------
// Loan
// ---------------------------------------------------------------------------

impl Loan {
    /// Build a validated loan.
    pub fn new(
        loan_type: LoanType,
        principal: Money,
        annual_rate_pct: Percent,
        term_years: u32,
        repayment_method: RepaymentMethod,
    ) -> FinDeckResult<Self> {
        let loan = Self {
            loan_type,
            principal,
            annual_rate_pct,
            term_years,
            repayment_method,
        };
        loan.validate()?;
        Ok(loan)
    }

    pub fn validate(&self) -> FinDeckResult<()> {
        if self.principal < Decimal::ZERO {
            return Err(FinDeckError::InvalidInput {
                field: "principal".into(),
                reason: "Principal cannot be negative".into(),
            });
        }
        if self.principal > MAX_AMOUNT {
            return Err(FinDeckError::InvalidInput {
                field: "principal".into(),
                reason: format!("Principal cannot exceed {MAX_AMOUNT}"),
            });
        }
        if self.annual_rate_pct < Decimal::ZERO {
            return Err(FinDeckError::InvalidInput {
                field: "annual_rate_pct".into(),
                reason: "Interest rate cannot be negative".into(),
            });
        }
        if self.annual_rate_pct > MAX_RATE_PCT {
            return Err(FinDeckError::InvalidInput {
                field: "annual_rate_pct".into(),
                reason: format!("Interest rate cannot exceed {MAX_RATE_PCT}%"),
            });
        }
        if !(MIN_TERM_YEARS..=MAX_TERM_YEARS).contains(&self.term_years) {
            return Err(FinDeckError::InvalidInput {
                field: "term_years".into(),
                reason: format!("Term must be between {MIN_TERM_YEARS} and {MAX_TERM_YEARS} years"),
            });
        }
        Ok(())
    }

    pub fn months(&self) -> u32 {
        clamp_term(self.term_years) * PERIODS_PER_YEAR
    }

    pub fn monthly_rate(&self) -> Rate {
        monthly_rate(self.annual_rate_pct.clamp(Decimal::ZERO, MAX_RATE_PCT))
    }

    pub fn monthly_payment(&self) -> Money {
        monthly_payment(
            self.principal,
            self.annual_rate_pct,
            self.term_years,
            self.repayment_method,
        )
    }

    pub fn annual_cost(&self) -> Money {
        annual_cost(
            self.principal,
            self.annual_rate_pct,
            self.term_years,
            self.repayment_method,
        )
    }

    pub fn is_amortizing(&self) -> bool {
        self.repayment_method == RepaymentMethod::Amortizing
    }
}

/// Payment, cost and interest breakdown for one loan.
pub fn loan_metrics(loan: &Loan) -> LoanMetrics {
    let principal = loan.principal.clamp(Decimal::ZERO, MAX_AMOUNT);
    let monthly = loan.monthly_payment();
    let annual = loan.annual_cost();
    let years = Decimal::from(clamp_term(loan.term_years));

    let total_repayment = match loan.repayment_method {
        RepaymentMethod::Amortizing => monthly * Decimal::from(loan.months()),
        RepaymentMethod::InterestOnly => annual * years + principal,
    };

    let (first_year_interest, first_year_principal) = match loan.repayment_method {
        RepaymentMethod::InterestOnly => (annual, Decimal::ZERO),
        RepaymentMethod::Amortizing => {
            let r = loan.monthly_rate();
            let mut balance = principal;
            let mut interest_sum = Decimal::ZERO;
            let mut principal_sum = Decimal::ZERO;
            for _ in 0..PERIODS_PER_YEAR {
                let (interest, repaid) = split_payment(balance, r, monthly);
                interest_sum += interest;
                principal_sum += repaid;
                balance -= repaid;
            }
            (interest_sum, principal_sum)
        }
    };

    LoanMetrics {
        loan_type: loan.loan_type.clone(),
        repayment_method: loan.repayment_method,
        principal: loan.principal,
        annual_rate_pct: loan.annual_rate_pct,
        term_years: loan.term_years,
        monthly_payment: monthly,
        annual_cost: annual,
        total_repayment,
        total_interest: total_repayment - principal,
        first_year_interest,
        first_year_principal,
    }
}

/// Validate a loan and compute its metrics inside the standard envelope.
pub fn calculate_loan_metrics(loan: &Loan) -> FinDeckResult<ComputationOutput<LoanMetrics>> {
    let start = Instant::now();
    loan.validate()?;

    let mut warnings: Vec<String> = Vec::new();
    if loan.principal.is_zero() {
        warnings.push("Zero principal: no payment is due".into());
    }
    if loan.repayment_method == RepaymentMethod::InterestOnly && !loan.principal.is_zero() {
        warnings.push(format!(
            "Interest-only: principal of {} remains due at maturity",
            loan.principal
        ));
    }

    let output = loan_metrics(loan);

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Monthly loan payment (level annuity / interest-only)",
        &serde_json::json!({
            "principal": loan.principal.to_string(),
            "annual_rate_pct": loan.annual_rate_pct.to_string(),
            "term_years": loan.term_years,
            "repayment_method": loan.repayment_method,
            "payments_per_year": PERIODS_PER_YEAR,
        }),
        warnings,
        elapsed,
        output,
    ))
}
