//! Time-value primitives behind the loan payment calculator.

use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;

use crate::types::{pct_to_rate, Money, Percent, Rate};

/// Months per year; all loans here pay monthly.
pub const PERIODS_PER_YEAR: u32 = 12;

/// Monthly rate from an annual percentage: `pct / 100 / 12`.
pub fn monthly_rate(annual_rate_pct: Percent) -> Rate {
    pct_to_rate(annual_rate_pct) / Decimal::from(PERIODS_PER_YEAR)
}

/// `(1 + rate)^nper` by integer exponentiation. `None` on overflow.
pub fn compound_factor(rate: Rate, nper: u32) -> Option<Decimal> {
    (Decimal::ONE + rate).checked_powu(u64::from(nper))
}

/// Level payment that retires `present_value` over `nper` periods.
///
/// Returned as a positive outflow. A zero rate degrades to straight-line
/// repayment and `nper == 0` yields zero.
pub fn annuity_payment(rate: Rate, nper: u32, present_value: Money) -> Money {
    if nper == 0 || present_value.is_zero() {
        return Decimal::ZERO;
    }

    if rate.is_zero() {
        return present_value / Decimal::from(nper);
    }

    // r·f / (f − 1) rewritten as r / (1 − 1/f) so large factors stay in range.
    let Some(factor) = compound_factor(rate, nper) else {
        // Factor beyond 96-bit range: the payment has converged to pure interest.
        return present_value * rate;
    };
    let denominator = Decimal::ONE - Decimal::ONE / factor;
    if denominator.is_zero() {
        return present_value / Decimal::from(nper);
    }

    present_value * rate / denominator
}
