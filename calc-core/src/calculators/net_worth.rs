//! Net worth from a list of assets and total liabilities.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::wealth_level::calculate_wealth_level;
use super::{Calculator, CalculatorInput, unknown};
use crate::calculations::common::{percentage_of, round_half_up};
use crate::calculations::formulas::percentage_split;
use crate::models::{
    Asset, Entry, EntryList, EntryStore, FieldError, FieldKind, FieldSpec, FieldValue,
};
use crate::presentation::{Presentable, Report, ReportTable, ReportValue};

const FIELDS: &[FieldSpec] = &[
    FieldSpec::number(
        "total_liabilities",
        "Total liabilities",
        FieldKind::Currency,
        dec!(0),
        dec!(100000000000),
        "Mortgage balance, loans, credit cards and other debts",
    ),
    FieldSpec::toggle(
        "is_household",
        "Household",
        "Assets and debts are shared by two adults",
    ),
];

/// Input values for the net worth calculator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetWorthInput {
    pub assets: EntryList<Asset>,
    pub total_liabilities: Decimal,
    pub is_household: bool,
}

impl Default for NetWorthInput {
    fn default() -> Self {
        let mut assets = EntryList::new();
        for (name, value) in [
            ("Cash & savings", dec!(25000)),
            ("Retirement accounts", dec!(180000)),
            ("Home equity", dec!(150000)),
        ] {
            assets.push_with(|id| Asset {
                id,
                name: name.to_string(),
                value,
            });
        }

        Self {
            assets,
            total_liabilities: dec!(40000),
            is_household: false,
        }
    }
}

impl CalculatorInput for NetWorthInput {
    fn fields() -> &'static [FieldSpec] {
        FIELDS
    }

    fn get(
        &self,
        field: &str,
    ) -> Result<FieldValue, FieldError> {
        match field {
            "total_liabilities" => Ok(self.total_liabilities.into()),
            "is_household" => Ok(self.is_household.into()),
            _ => Err(unknown(field)),
        }
    }

    fn set(
        &mut self,
        field: &str,
        value: FieldValue,
    ) -> Result<(), FieldError> {
        match field {
            "total_liabilities" => self.total_liabilities = value.into_number(field)?,
            "is_household" => self.is_household = value.into_flag(field)?,
            _ => return Err(unknown(field)),
        }
        Ok(())
    }

    fn entry_fields() -> &'static [FieldSpec] {
        Asset::fields()
    }

    fn entries(&self) -> Option<&dyn EntryStore> {
        Some(&self.assets)
    }

    fn entries_mut(&mut self) -> Option<&mut dyn EntryStore> {
        Some(&mut self.assets)
    }
}

/// An asset's share of total assets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetShare {
    pub name: String,
    pub value: Decimal,
    pub share: Decimal,
}

/// Result of the net worth calculation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetWorthResult {
    pub total_assets: Decimal,
    pub total_liabilities: Decimal,
    pub net_worth: Decimal,
    /// Liabilities as a percentage of assets; 0 without assets.
    pub debt_to_asset_ratio: Decimal,
    pub allocation: Vec<AssetShare>,
    pub wealth_level: String,
}

/// Calculator for household or individual net worth.
#[derive(Debug, Clone, Copy, Default)]
pub struct NetWorthCalculator;

impl Calculator for NetWorthCalculator {
    type Input = NetWorthInput;
    type Output = NetWorthResult;

    const SLUG: &'static str = "net-worth";
    const TITLE: &'static str = "Net Worth Calculator";

    fn calculate(
        &self,
        input: &NetWorthInput,
    ) -> NetWorthResult {
        let values: Vec<Decimal> = input.assets.iter().map(|asset| asset.value).collect();
        let total_assets: Decimal = values.iter().copied().sum();
        let net_worth = total_assets - input.total_liabilities;

        debug!(%total_assets, %net_worth, "calculated net worth");

        let allocation = input
            .assets
            .iter()
            .zip(percentage_split(&values, 1))
            .map(|(asset, share)| AssetShare {
                name: asset.name.clone(),
                value: round_half_up(asset.value),
                share,
            })
            .collect();

        NetWorthResult {
            total_assets: round_half_up(total_assets),
            total_liabilities: round_half_up(input.total_liabilities),
            net_worth: round_half_up(net_worth),
            debt_to_asset_ratio: round_half_up(percentage_of(
                input.total_liabilities,
                total_assets,
            )),
            allocation,
            wealth_level: calculate_wealth_level(net_worth, input.is_household),
        }
    }
}

impl Presentable for NetWorthResult {
    fn report(&self) -> Report {
        let mut allocation = ReportTable::new("Asset allocation", &["Asset", "Value", "Share"]);
        for asset in &self.allocation {
            allocation.push_row(vec![
                ReportValue::text(asset.name.as_str()),
                ReportValue::dollars(asset.value),
                ReportValue::share(asset.share),
            ]);
        }

        Report::new(NetWorthCalculator::TITLE)
            .row("Total assets", ReportValue::dollars(self.total_assets))
            .row("Total liabilities", ReportValue::dollars(self.total_liabilities))
            .row("Net worth", ReportValue::dollars(self.net_worth))
            .row("Debt to assets", ReportValue::share(self.debt_to_asset_ratio))
            .row("Wealth level", ReportValue::text(self.wealth_level.as_str()))
            .table(allocation)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::calculators::NOT_YET_CLASSIFIED;
    use crate::models::EntryId;

    #[test]
    fn calculate_default_balance_sheet() {
        let result = NetWorthCalculator.calculate(&NetWorthInput::default());

        assert_eq!(result.total_assets, dec!(355000));
        assert_eq!(result.net_worth, dec!(315000));
        assert_eq!(result.debt_to_asset_ratio, dec!(11.27));
        assert_eq!(result.wealth_level, NOT_YET_CLASSIFIED);
    }

    #[test]
    fn calculate_allocation_assigns_remainder_to_last_asset() {
        let result = NetWorthCalculator.calculate(&NetWorthInput::default());

        let shares: Vec<Decimal> = result.allocation.iter().map(|a| a.share).collect();
        assert_eq!(shares, vec![dec!(7.0), dec!(50.7), dec!(42.3)]);
    }

    #[test]
    fn calculate_without_assets_has_zero_ratio() {
        let input = NetWorthInput {
            assets: EntryList::new(),
            total_liabilities: dec!(12000),
            is_household: false,
        };

        let result = NetWorthCalculator.calculate(&input);

        assert_eq!(result.net_worth, dec!(-12000));
        assert_eq!(result.debt_to_asset_ratio, dec!(0));
        assert!(result.allocation.is_empty());
    }

    #[test]
    fn calculate_classifies_large_net_worth() {
        let mut input = NetWorthInput::default();
        input
            .assets
            .update(EntryId(3), "value", FieldValue::from(dec!(4000000)))
            .unwrap();

        let result = NetWorthCalculator.calculate(&input);

        assert_eq!(result.net_worth, dec!(4165000));
        assert_eq!(result.wealth_level, "The comfortably off");
    }

    #[test]
    fn calculate_household_halves_net_worth_for_level() {
        let mut input = NetWorthInput::default();
        input
            .assets
            .update(EntryId(3), "value", FieldValue::from(dec!(4000000)))
            .unwrap();
        input.set("is_household", FieldValue::from(true)).unwrap();

        let result = NetWorthCalculator.calculate(&input);

        assert_eq!(result.wealth_level, "The comfortable poor");
    }

    #[test]
    fn report_lists_allocation_table() {
        let report = NetWorthCalculator
            .calculate(&NetWorthInput::default())
            .report();

        assert_eq!(report.value_of("Net worth"), Some("$315,000".to_string()));
        assert_eq!(report.value_of("Debt to assets"), Some("11.3%".to_string()));
        assert_eq!(report.tables[0].rows.len(), 3);
    }
}
