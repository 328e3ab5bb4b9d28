//! Investment allocations funded by borrowed capital.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::FinDeckError;
use crate::time_value::PERIODS_PER_YEAR;
use crate::types::{pct_to_rate, Money, Percent, MAX_AMOUNT, MAX_RATE_PCT};
use crate::FinDeckResult;

/// Asset category as offered by the entry form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetType {
    #[default]
    Stock,
    EquityEtf,
    BondEtf,
    Bond,
    Insurance,
    RealEstate,
    Other(String),
}

/// A single investment allocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Investment {
    #[serde(default)]
    pub asset_type: AssetType,
    /// Amount invested.
    pub amount: Money,
    /// Distributable annual cash yield in percent.
    pub yield_pct: Percent,
    /// Expected capital appreciation in percent. Unrealized, so it never
    /// enters a cash-flow figure.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub growth_pct: Option<Percent>,
}

/// Derived cash income for one investment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvestmentMetrics {
    pub asset_type: AssetType,
    pub amount: Money,
    pub yield_pct: Percent,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub growth_pct: Option<Percent>,
    pub annual_income: Money,
    pub monthly_income: Money,
}

/// Annual distributable income, `amount * yield_pct / 100`.
///
/// Inputs outside the accepted ranges are clamped into them.
pub fn annual_income(amount: Money, yield_pct: Percent) -> Money {
    amount.clamp(Decimal::ZERO, MAX_AMOUNT) * pct_to_rate(yield_pct.clamp(Decimal::ZERO, MAX_RATE_PCT))
}

impl Investment {
    /// Build a validated investment.
    pub fn new(
        asset_type: AssetType,
        amount: Money,
        yield_pct: Percent,
        growth_pct: Option<Percent>,
    ) -> FinDeckResult<Self> {
        let investment = Self {
            asset_type,
            amount,
            yield_pct,
            growth_pct,
        };
        investment.validate()?;
        Ok(investment)
    }

    pub fn validate(&self) -> FinDeckResult<()> {
        if self.amount < Decimal::ZERO {
            return Err(FinDeckError::InvalidInput {
                field: "amount".into(),
                reason: "Invested amount cannot be negative".into(),
            });
        }
        if self.amount > MAX_AMOUNT {
            return Err(FinDeckError::InvalidInput {
                field: "amount".into(),
                reason: format!("Invested amount cannot exceed {MAX_AMOUNT}"),
            });
        }
        if self.yield_pct < Decimal::ZERO {
            return Err(FinDeckError::InvalidInput {
                field: "yield_pct".into(),
                reason: "Yield cannot be negative".into(),
            });
        }
        if self.yield_pct > MAX_RATE_PCT {
            return Err(FinDeckError::InvalidInput {
                field: "yield_pct".into(),
                reason: format!("Yield cannot exceed {MAX_RATE_PCT}%"),
            });
        }
        match self.growth_pct {
            Some(g) if g < Decimal::ZERO => Err(FinDeckError::InvalidInput {
                field: "growth_pct".into(),
                reason: "Growth rate cannot be negative".into(),
            }),
            Some(g) if g > MAX_RATE_PCT => Err(FinDeckError::InvalidInput {
                field: "growth_pct".into(),
                reason: format!("Growth rate cannot exceed {MAX_RATE_PCT}%"),
            }),
            _ => Ok(()),
        }
    }

    pub fn annual_income(&self) -> Money {
        annual_income(self.amount, self.yield_pct)
    }
}

pub fn investment_metrics(investment: &Investment) -> InvestmentMetrics {
    let annual = investment.annual_income();
    InvestmentMetrics {
        asset_type: investment.asset_type.clone(),
        amount: investment.amount,
        yield_pct: investment.yield_pct,
        growth_pct: investment.growth_pct,
        annual_income: annual,
        monthly_income: annual / Decimal::from(PERIODS_PER_YEAR),
    }
}
