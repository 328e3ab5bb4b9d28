//! Session-owned collections of loans and investments.
//!
//! A `Portfolio` is created when a session starts, mutated only through the
//! add/remove operations below and dropped when the session ends. Records
//! have no identity beyond their index; removing one shifts later indices
//! down by one.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::FinDeckError;
use crate::investment::{AssetType, Investment};
use crate::loan::{Loan, LoanType, RepaymentMethod};
use crate::types::{Money, Percent};
use crate::FinDeckResult;

/// Deserialized portfolios are validated record by record, so every
/// `Portfolio` value holds only in-range loans and investments.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "PortfolioRecords")]
pub struct Portfolio {
    loans: Vec<Loan>,
    investments: Vec<Investment>,
}

#[derive(Deserialize)]
struct PortfolioRecords {
    #[serde(default)]
    loans: Vec<Loan>,
    #[serde(default)]
    investments: Vec<Investment>,
}

impl TryFrom<PortfolioRecords> for Portfolio {
    type Error = FinDeckError;

    fn try_from(records: PortfolioRecords) -> Result<Self, Self::Error> {
        Portfolio::from_parts(records.loans, records.investments)
    }
}

impl Portfolio {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from existing records, validating every one.
    pub fn from_parts(loans: Vec<Loan>, investments: Vec<Investment>) -> FinDeckResult<Self> {
        let portfolio = Self { loans, investments };
        portfolio.validate()?;
        Ok(portfolio)
    }

    /// Append a loan and return its index.
    pub fn add_loan(
        &mut self,
        loan_type: LoanType,
        principal: Money,
        annual_rate_pct: Percent,
        term_years: u32,
        repayment_method: RepaymentMethod,
    ) -> FinDeckResult<usize> {
        let loan = Loan::new(loan_type, principal, annual_rate_pct, term_years, repayment_method)?;
        self.push_loan(loan)
    }

    /// Append an already-built loan, validating it first.
    pub fn push_loan(&mut self, loan: Loan) -> FinDeckResult<usize> {
        loan.validate()?;
        debug!(?loan, "loan added");
        self.loans.push(loan);
        Ok(self.loans.len() - 1)
    }

    /// Append an investment and return its index.
    pub fn add_investment(
        &mut self,
        asset_type: AssetType,
        amount: Money,
        yield_pct: Percent,
        growth_pct: Option<Percent>,
    ) -> FinDeckResult<usize> {
        let investment = Investment::new(asset_type, amount, yield_pct, growth_pct)?;
        self.push_investment(investment)
    }

    pub fn push_investment(&mut self, investment: Investment) -> FinDeckResult<usize> {
        investment.validate()?;
        debug!(?investment, "investment added");
        self.investments.push(investment);
        Ok(self.investments.len() - 1)
    }

    pub fn remove_loan(&mut self, index: usize) -> FinDeckResult<Loan> {
        if index >= self.loans.len() {
            return Err(FinDeckError::IndexOutOfRange {
                collection: "loans".into(),
                index,
                len: self.loans.len(),
            });
        }
        Ok(self.loans.remove(index))
    }

    pub fn remove_investment(&mut self, index: usize) -> FinDeckResult<Investment> {
        if index >= self.investments.len() {
            return Err(FinDeckError::IndexOutOfRange {
                collection: "investments".into(),
                index,
                len: self.investments.len(),
            });
        }
        Ok(self.investments.remove(index))
    }

    pub fn loans(&self) -> &[Loan] {
        &self.loans
    }

    pub fn investments(&self) -> &[Investment] {
        &self.investments
    }

    pub fn is_empty(&self) -> bool {
        self.loans.is_empty() && self.investments.is_empty()
    }

    /// Both sides present, so a spread can be computed.
    pub fn is_evaluable(&self) -> bool {
        !self.loans.is_empty() && !self.investments.is_empty()
    }

    pub fn clear(&mut self) {
        self.loans.clear();
        self.investments.clear();
    }

    /// Check every record; used after deserializing untrusted input.
    pub fn validate(&self) -> FinDeckResult<()> {
        for (i, loan) in self.loans.iter().enumerate() {
            loan.validate().map_err(|e| prefix_field(e, "loans", i))?;
        }
        for (i, investment) in self.investments.iter().enumerate() {
            investment
                .validate()
                .map_err(|e| prefix_field(e, "investments", i))?;
        }
        Ok(())
    }
}

fn prefix_field(err: FinDeckError, collection: &str, index: usize) -> FinDeckError {
    match err {
        FinDeckError::InvalidInput { field, reason } => FinDeckError::InvalidInput {
            field: format!("{collection}[{index}].{field}"),
            reason,
        },
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn sample() -> Portfolio {
        let mut p = Portfolio::new();
        p.add_loan(LoanType::Mortgage, dec!(1_000_000), dec!(2.5), 20, RepaymentMethod::Amortizing)
            .unwrap();
        p.add_loan(LoanType::PersonalCredit, dec!(500_000), dec!(3.5), 7, RepaymentMethod::Amortizing)
            .unwrap();
        p.add_loan(LoanType::PolicyLoan, dec!(300_000), dec!(4), 5, RepaymentMethod::InterestOnly)
            .unwrap();
        p.add_investment(AssetType::BondEtf, dec!(1_000_000), dec!(5), None)
            .unwrap();
        p
    }

    #[test]
    fn test_add_returns_index() {
        let mut p = sample();
        let idx = p
            .add_investment(AssetType::Stock, dec!(10), dec!(1), Some(dec!(7)))
            .unwrap();
        assert_eq!(idx, 1);
        assert_eq!(p.investments().len(), 2);
    }

    #[test]
    fn test_remove_shifts_indices() {
        let mut p = sample();
        let removed = p.remove_loan(0).unwrap();
        assert_eq!(removed.loan_type, LoanType::Mortgage);
        assert_eq!(p.loans().len(), 2);
        assert_eq!(p.loans()[0].loan_type, LoanType::PersonalCredit);
        assert_eq!(p.loans()[1].loan_type, LoanType::PolicyLoan);
    }

    #[test]
    fn test_remove_out_of_range() {
        let mut p = sample();
        let err = p.remove_investment(3).unwrap_err();
        assert!(matches!(
            err,
            FinDeckError::IndexOutOfRange { index: 3, len: 1, .. }
        ));
        assert_eq!(p.investments().len(), 1);
    }

    #[test]
    fn test_invalid_add_leaves_portfolio_unchanged() {
        let mut p = sample();
        assert!(p
            .add_loan(LoanType::Mortgage, dec!(-5), dec!(1), 1, RepaymentMethod::Amortizing)
            .is_err());
        assert_eq!(p.loans().len(), 3);
    }

    #[test]
    fn test_evaluable_requires_both_sides() {
        let mut p = Portfolio::new();
        assert!(p.is_empty());
        assert!(!p.is_evaluable());
        p.add_investment(AssetType::Bond, dec!(1), dec!(1), None).unwrap();
        assert!(!p.is_evaluable());
        p.add_loan(LoanType::Mortgage, dec!(1), dec!(1), 1, RepaymentMethod::Amortizing)
            .unwrap();
        assert!(p.is_evaluable());
        p.clear();
        assert!(p.is_empty());
    }

    #[test]
    fn test_validate_names_offending_record() {
        let loan = Loan {
            loan_type: LoanType::Mortgage,
            principal: dec!(1000),
            annual_rate_pct: dec!(2),
            term_years: 99,
            repayment_method: RepaymentMethod::Amortizing,
        };
        let err = Portfolio::from_parts(vec![sample().loans()[0].clone(), loan], vec![]).unwrap_err();
        match err {
            FinDeckError::InvalidInput { field, .. } => assert_eq!(field, "loans[1].term_years"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_deserialize_rejects_invalid_records() {
        let json = serde_json::json!({
            "loans": [
                { "principal": 1000, "annual_rate_pct": 2, "term_years": 10 },
                { "principal": 1000, "annual_rate_pct": 2, "term_years": 99 }
            ]
        });
        let err = serde_json::from_value::<Portfolio>(json).unwrap_err();
        assert!(err.to_string().contains("loans[1].term_years"), "got {err}");
    }

    #[test]
    fn test_deserialize_defaults_missing_sides() {
        let json = serde_json::json!({
            "investments": [{ "asset_type": "bond_etf", "amount": "1000000", "yield_pct": "5" }]
        });
        let p: Portfolio = serde_json::from_value(json).unwrap();
        assert!(p.loans().is_empty());
        assert_eq!(p.investments().len(), 1);
    }
}
