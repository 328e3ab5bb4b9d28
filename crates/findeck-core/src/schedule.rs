//! Month-by-month repayment schedule for a single loan.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::loan::{split_payment, Loan, RepaymentMethod};
use crate::types::{with_metadata, ComputationOutput, Money, MAX_AMOUNT};
use crate::FinDeckResult;

/// A single month in the repayment schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchedulePeriod {
    pub month: u32,
    pub beginning_balance: Money,
    pub payment: Money,
    pub interest: Money,
    pub principal: Money,
    pub ending_balance: Money,
}

/// Schedule plus its column totals.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleOutput {
    pub periods: Vec<SchedulePeriod>,
    pub total_payments: Money,
    pub total_interest: Money,
    pub total_principal: Money,
}

/// Build the full schedule. Amortizing loans close at a zero balance, with
/// any rounding residual folded into the last payment; interest-only loans
/// repay the whole balance in the final month.
pub fn amortization_schedule(loan: &Loan) -> Vec<SchedulePeriod> {
    let months = loan.months();
    let rate = loan.monthly_rate();
    let scheduled = loan.monthly_payment();

    let mut periods = Vec::with_capacity(months as usize);
    let mut balance = loan.principal.clamp(Decimal::ZERO, MAX_AMOUNT);

    for month in 1..=months {
        let beginning_balance = balance;
        let is_final = month == months;

        let (interest, principal) = match loan.repayment_method {
            RepaymentMethod::Amortizing => {
                let (interest, principal) = split_payment(balance, rate, scheduled);
                if is_final {
                    (interest, balance)
                } else {
                    (interest, principal)
                }
            }
            RepaymentMethod::InterestOnly => {
                let interest = balance * rate;
                (interest, if is_final { balance } else { Decimal::ZERO })
            }
        };

        balance -= principal;
        periods.push(SchedulePeriod {
            month,
            beginning_balance,
            payment: interest + principal,
            interest,
            principal,
            ending_balance: balance,
        });
    }

    periods
}

/// Validate a loan and produce its schedule inside the standard envelope.
pub fn calculate_schedule(loan: &Loan) -> FinDeckResult<ComputationOutput<ScheduleOutput>> {
    let start = Instant::now();
    loan.validate()?;

    let periods = amortization_schedule(loan);
    let total_payments: Money = periods.iter().map(|p| p.payment).sum();
    let total_interest: Money = periods.iter().map(|p| p.interest).sum();
    let total_principal: Money = periods.iter().map(|p| p.principal).sum();

    let mut warnings: Vec<String> = Vec::new();
    if loan.repayment_method == RepaymentMethod::InterestOnly && !loan.principal.is_zero() {
        warnings.push(format!(
            "Final payment includes a bullet repayment of {}",
            loan.principal
        ));
    }

    let output = ScheduleOutput {
        periods,
        total_payments,
        total_interest,
        total_principal,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Monthly amortization schedule",
        &serde_json::json!({
            "principal": loan.principal.to_string(),
            "annual_rate_pct": loan.annual_rate_pct.to_string(),
            "term_years": loan.term_years,
            "repayment_method": loan.repayment_method,
        }),
        warnings,
        elapsed,
        output,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loan::LoanType;
    use rust_decimal_macros::dec;

    #[test]
    fn test_amortizing_schedule_closes_at_zero() {
        let loan = Loan::new(LoanType::Mortgage, dec!(240_000), dec!(6), 10, RepaymentMethod::Amortizing)
            .unwrap();
        let periods = amortization_schedule(&loan);
        assert_eq!(periods.len(), 120);
        assert_eq!(periods.last().unwrap().ending_balance, Decimal::ZERO);

        let repaid: Money = periods.iter().map(|p| p.principal).sum();
        assert!((repaid - dec!(240_000)).abs() < dec!(0.000001));

        // Interest share declines as the balance falls
        assert!(periods[0].interest > periods[60].interest);
        assert!(periods[0].principal < periods[60].principal);
    }

    #[test]
    fn test_final_payment_matches_level_payment() {
        let loan = Loan::new(LoanType::Mortgage, dec!(240_000), dec!(6), 10, RepaymentMethod::Amortizing)
            .unwrap();
        let periods = amortization_schedule(&loan);
        let last = periods.last().unwrap();
        assert!((last.payment - loan.monthly_payment()).abs() < dec!(0.0001));
    }

    #[test]
    fn test_interest_only_schedule_bullet() {
        let loan = Loan::new(
            LoanType::PolicyLoan,
            dec!(100_000),
            dec!(6),
            1,
            RepaymentMethod::InterestOnly,
        )
        .unwrap();
        let periods = amortization_schedule(&loan);
        assert_eq!(periods.len(), 12);
        assert!(periods[..11].iter().all(|p| p.principal.is_zero()));
        assert!(periods[..11].iter().all(|p| p.payment == dec!(500)));
        assert_eq!(periods[11].payment, dec!(100_500));
        assert_eq!(periods[11].ending_balance, Decimal::ZERO);
    }

    #[test]
    fn test_zero_rate_schedule() {
        let loan = Loan::new(LoanType::Mortgage, dec!(12_000), Decimal::ZERO, 1, RepaymentMethod::Amortizing)
            .unwrap();
        let out = calculate_schedule(&loan).unwrap();
        assert_eq!(out.result.total_interest, Decimal::ZERO);
        assert_eq!(out.result.total_payments, dec!(12_000));
        assert!(out.result.periods.iter().all(|p| p.payment == dec!(1000)));
    }
}
