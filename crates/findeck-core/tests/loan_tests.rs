use findeck_core::loan::{self, Loan, LoanType, RepaymentMethod};
use findeck_core::time_value;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

// ===========================================================================
// Monthly payment calculator
// ===========================================================================

const METHODS: [RepaymentMethod; 2] = [RepaymentMethod::Amortizing, RepaymentMethod::InterestOnly];

#[test]
fn test_payment_never_negative() {
    let principals = [dec!(0), dec!(1), dec!(50_000), dec!(3_000_000)];
    let rates = [dec!(0), dec!(0.5), dec!(7.25), dec!(20)];
    let years = [1, 15, 40];

    for p in principals {
        for r in rates {
            for y in years {
                for m in METHODS {
                    let pmt = loan::monthly_payment(p, r, y, m);
                    assert!(pmt >= Decimal::ZERO, "negative payment for {p} {r} {y} {m:?}");
                }
            }
        }
    }
}

#[test]
fn test_zero_principal_always_zero() {
    for m in METHODS {
        for y in [1, 20, 40] {
            assert_eq!(loan::monthly_payment(Decimal::ZERO, dec!(4.5), y, m), Decimal::ZERO);
        }
    }
}

#[test]
fn test_interest_only_formula() {
    let p = dec!(750_000);
    let r = dec!(3.6);
    let expected = p * (r / dec!(100) / dec!(12));
    for y in [1, 10, 40] {
        assert_eq!(
            loan::monthly_payment(p, r, y, RepaymentMethod::InterestOnly),
            expected
        );
    }
}

#[test]
fn test_amortizing_zero_rate_formula() {
    for y in [1u32, 5, 30] {
        let p = dec!(360_000);
        let expected = p / Decimal::from(y * 12);
        assert_eq!(
            loan::monthly_payment(p, Decimal::ZERO, y, RepaymentMethod::Amortizing),
            expected
        );
    }
}

#[test]
fn test_amortizing_total_interest_positive_when_rate_positive() {
    for r in [dec!(0.1), dec!(2.5), dec!(12)] {
        let l = Loan::new(LoanType::Mortgage, dec!(400_000), r, 25, RepaymentMethod::Amortizing)
            .unwrap();
        let m = loan::loan_metrics(&l);
        let payments = l.monthly_payment() * Decimal::from(l.months());
        assert!(m.total_interest > Decimal::ZERO);
        assert!((payments - (l.principal + m.total_interest)).abs() < dec!(0.01));
    }
}

#[test]
fn test_amortizing_payment_matches_textbook_values() {
    // 300,000 @ 6% over 30 years => 1,798.65
    let pmt = loan::monthly_payment(dec!(300_000), dec!(6), 30, RepaymentMethod::Amortizing);
    assert!((pmt - dec!(1798.65)).abs() < dec!(0.01), "got {pmt}");

    // 100,000 @ 20% over 1 year => 9,263.45
    let pmt = loan::monthly_payment(dec!(100_000), dec!(20), 1, RepaymentMethod::Amortizing);
    assert!((pmt - dec!(9263.45)).abs() < dec!(0.01), "got {pmt}");
}

#[test]
fn test_amortizing_payment_exceeds_interest_only() {
    let amort = loan::monthly_payment(dec!(500_000), dec!(4), 30, RepaymentMethod::Amortizing);
    let io = loan::monthly_payment(dec!(500_000), dec!(4), 30, RepaymentMethod::InterestOnly);
    assert!(amort > io);
}

#[test]
fn test_longer_term_lowers_amortizing_payment() {
    let short = loan::monthly_payment(dec!(500_000), dec!(4), 10, RepaymentMethod::Amortizing);
    let long = loan::monthly_payment(dec!(500_000), dec!(4), 40, RepaymentMethod::Amortizing);
    assert!(long < short);
}

// ---------------------------------------------------------------------------
// Scenario 1 & 2: 1,000,000 @ 2.5% over 20 years
// ---------------------------------------------------------------------------

#[test]
fn test_scenario_amortizing_mortgage() {
    let l = Loan::new(
        LoanType::Mortgage,
        dec!(1_000_000),
        dec!(2.5),
        20,
        RepaymentMethod::Amortizing,
    )
    .unwrap();
    let pmt = l.monthly_payment();
    assert!((pmt - dec!(5300)).abs() <= dec!(5), "monthly payment {pmt}");
    let annual = l.annual_cost();
    assert!((annual - dec!(63_600)).abs() <= dec!(60), "annual cost {annual}");
}

#[test]
fn test_scenario_interest_only_mortgage() {
    let l = Loan::new(
        LoanType::Mortgage,
        dec!(1_000_000),
        dec!(2.5),
        20,
        RepaymentMethod::InterestOnly,
    )
    .unwrap();
    assert_eq!(l.monthly_payment().round_dp(2), dec!(2083.33));
    assert_eq!(l.annual_cost(), dec!(25_000));
}

#[test]
fn test_calculate_loan_metrics_rejects_invalid_term() {
    let l = Loan {
        loan_type: LoanType::Other("bridge".into()),
        principal: dec!(10_000),
        annual_rate_pct: dec!(5),
        term_years: 0,
        repayment_method: RepaymentMethod::Amortizing,
    };
    assert!(loan::calculate_loan_metrics(&l).is_err());
}

#[test]
fn test_monthly_rate_matches_loan() {
    let l = Loan::new(LoanType::Mortgage, dec!(1), dec!(6), 1, RepaymentMethod::Amortizing).unwrap();
    assert_eq!(l.monthly_rate(), time_value::monthly_rate(dec!(6)));
    assert_eq!(l.monthly_rate(), dec!(0.005));
}
