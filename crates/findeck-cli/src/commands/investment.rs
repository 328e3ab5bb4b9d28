use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use findeck_core::investment::{investment_metrics, AssetType, Investment};

/// Arguments for a single investment's cash income
#[derive(Args)]
pub struct IncomeArgs {
    /// Asset type: stock, equity_etf, bond_etf, bond, insurance, real_estate, or free text
    #[arg(long, default_value = "stock")]
    pub asset_type: String,

    /// Amount invested
    #[arg(long)]
    pub amount: Decimal,

    /// Annual cash yield in percent (e.g. 5)
    #[arg(long = "yield")]
    pub yield_pct: Decimal,

    /// Expected capital appreciation in percent (reported, not counted as cash)
    #[arg(long)]
    pub growth: Option<Decimal>,
}

/// Parse an asset type name; unknown names are kept as free text.
pub fn parse_asset_type(s: &str) -> AssetType {
    match s.trim().to_lowercase().replace('-', "_").as_str() {
        "stock" | "stocks" => AssetType::Stock,
        "equity_etf" => AssetType::EquityEtf,
        "bond_etf" => AssetType::BondEtf,
        "bond" | "bonds" => AssetType::Bond,
        "insurance" => AssetType::Insurance,
        "real_estate" | "property" => AssetType::RealEstate,
        _ => AssetType::Other(s.trim().to_string()),
    }
}

pub fn run_income(args: IncomeArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let investment = Investment::new(
        parse_asset_type(&args.asset_type),
        args.amount,
        args.yield_pct,
        args.growth,
    )?;
    Ok(serde_json::to_value(investment_metrics(&investment))?)
}
