//! Wealth level classification.
//!
//! Net worth is placed on a fixed ladder of wealth levels. Households are
//! assessed per adult, so a couple's combined net worth is halved first.
//!
//! | Level | Net worth |
//! |-------|-----------|
//! | The everyday millionaire | $1M to $2M |
//! | The comfortable poor | $2M to $4M |
//! | The comfortably off | $4M to $10M |
//! | The affluent | $10M to $30M |
//! | The rich | $30M to $100M |
//! | The super rich | $100M and up |

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{Calculator, CalculatorInput, unknown};
use crate::calculations::common::{at_least, round_half_up};
use crate::models::{FieldError, FieldKind, FieldSpec, FieldValue, TierBand, TierTable};
use crate::presentation::{Presentable, Report, ReportTable, ReportValue};

/// Label for net worth below the first level.
pub const NOT_YET_CLASSIFIED: &str = "Not yet on the wealth scale";

const HOUSEHOLD_ADULTS: Decimal = dec!(2);

const FIELDS: &[FieldSpec] = &[
    FieldSpec::number(
        "net_worth",
        "Net worth",
        FieldKind::Currency,
        dec!(-1000000000000),
        dec!(1000000000000),
        "Everything owned minus everything owed",
    ),
    FieldSpec::toggle(
        "is_household",
        "Household",
        "Net worth is shared by two adults and is assessed per adult",
    ),
];

/// The wealth ladder.
pub fn wealth_table() -> TierTable {
    TierTable::from_static(
        vec![
            TierBand::new(dec!(1000000), Some(dec!(2000000)), "The everyday millionaire"),
            TierBand::new(dec!(2000000), Some(dec!(4000000)), "The comfortable poor"),
            TierBand::new(dec!(4000000), Some(dec!(10000000)), "The comfortably off"),
            TierBand::new(dec!(10000000), Some(dec!(30000000)), "The affluent"),
            TierBand::new(dec!(30000000), Some(dec!(100000000)), "The rich"),
            TierBand::new(dec!(100000000), None, "The super rich"),
        ],
        NOT_YET_CLASSIFIED,
    )
}

/// Net worth used for classification: halved for households.
pub fn assessed_net_worth(
    net_worth: Decimal,
    is_household: bool,
) -> Decimal {
    if is_household {
        net_worth / HOUSEHOLD_ADULTS
    } else {
        net_worth
    }
}

/// Returns the wealth level label for a net worth.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use calc_core::calculators::calculate_wealth_level;
///
/// assert_eq!(calculate_wealth_level(dec!(5000000), false), "The comfortably off");
/// assert_eq!(calculate_wealth_level(dec!(0), false), "Not yet on the wealth scale");
/// ```
pub fn calculate_wealth_level(
    net_worth: Decimal,
    is_household: bool,
) -> String {
    wealth_table()
        .classify(assessed_net_worth(net_worth, is_household))
        .to_string()
}

/// Input values for the wealth level calculator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WealthLevelInput {
    pub net_worth: Decimal,
    pub is_household: bool,
}

impl Default for WealthLevelInput {
    fn default() -> Self {
        Self {
            net_worth: dec!(500000),
            is_household: false,
        }
    }
}

impl CalculatorInput for WealthLevelInput {
    fn fields() -> &'static [FieldSpec] {
        FIELDS
    }

    fn get(
        &self,
        field: &str,
    ) -> Result<FieldValue, FieldError> {
        match field {
            "net_worth" => Ok(self.net_worth.into()),
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
            "net_worth" => self.net_worth = value.into_number(field)?,
            "is_household" => self.is_household = value.into_flag(field)?,
            _ => return Err(unknown(field)),
        }
        Ok(())
    }
}

/// Result of the wealth level classification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WealthLevelResult {
    /// Net worth the level was decided on (per adult for households).
    pub assessed_net_worth: Decimal,
    pub level: String,
    /// The level above the current one, `None` at the top of the ladder.
    pub next_level: Option<String>,
    /// Additional assessed net worth needed to reach `next_level`.
    pub amount_to_next_level: Decimal,
    pub levels: Vec<TierBand>,
}

/// Calculator that places a net worth on the wealth ladder.
#[derive(Debug, Clone, Copy, Default)]
pub struct WealthLevelCalculator;

impl Calculator for WealthLevelCalculator {
    type Input = WealthLevelInput;
    type Output = WealthLevelResult;

    const SLUG: &'static str = "wealth-level";
    const TITLE: &'static str = "Wealth Level Calculator";

    fn calculate(
        &self,
        input: &WealthLevelInput,
    ) -> WealthLevelResult {
        let table = wealth_table();
        let assessed = assessed_net_worth(input.net_worth, input.is_household);
        let level = table.classify(assessed).to_string();
        let next = table.next_band_above(assessed);

        debug!(%assessed, %level, "classified wealth level");

        WealthLevelResult {
            assessed_net_worth: round_half_up(assessed),
            level,
            next_level: next.map(|band| band.label.clone()),
            amount_to_next_level: next
                .map(|band| round_half_up(at_least(band.min - assessed, Decimal::ZERO)))
                .unwrap_or(Decimal::ZERO),
            levels: table.bands().to_vec(),
        }
    }
}

impl Presentable for WealthLevelResult {
    fn report(&self) -> Report {
        let mut levels = ReportTable::new("Wealth levels", &["Level", "From", "Up to"]);
        for band in &self.levels {
            levels.push_row(vec![
                ReportValue::text(band.label.as_str()),
                ReportValue::dollars(band.min),
                match band.max {
                    Some(max) => ReportValue::dollars(max),
                    None => ReportValue::text("and up"),
                },
            ]);
        }

        Report::new(WealthLevelCalculator::TITLE)
            .row("Assessed net worth", ReportValue::dollars(self.assessed_net_worth))
            .row("Wealth level", ReportValue::text(self.level.as_str()))
            .row(
                "Next level",
                ReportValue::text(self.next_level.as_deref().unwrap_or("None")),
            )
            .row("Needed for next level", ReportValue::dollars(self.amount_to_next_level))
            .table(levels)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    // =========================================================================
    // calculate_wealth_level tests
    // =========================================================================

    #[test]
    fn wealth_table_is_valid() {
        assert_eq!(wealth_table().validate(), Ok(()));
    }

    #[test]
    fn calculate_wealth_level_mid_band() {
        assert_eq!(calculate_wealth_level(dec!(5000000), false), "The comfortably off");
    }

    #[test]
    fn calculate_wealth_level_band_floor_is_inclusive() {
        assert_eq!(calculate_wealth_level(dec!(2000000), false), "The comfortable poor");
        assert_eq!(calculate_wealth_level(dec!(1999999.99), false), "The everyday millionaire");
    }

    #[test]
    fn calculate_wealth_level_below_ladder() {
        assert_eq!(calculate_wealth_level(dec!(0), false), NOT_YET_CLASSIFIED);
        assert_eq!(calculate_wealth_level(dec!(-25000), false), NOT_YET_CLASSIFIED);
    }

    #[test]
    fn calculate_wealth_level_open_top_band() {
        assert_eq!(calculate_wealth_level(dec!(5000000000), false), "The super rich");
    }

    #[test]
    fn calculate_wealth_level_household_is_per_adult() {
        assert_eq!(calculate_wealth_level(dec!(3000000), true), "The everyday millionaire");
        assert_eq!(calculate_wealth_level(dec!(3000000), false), "The comfortable poor");
    }

    // =========================================================================
    // calculate tests
    // =========================================================================

    #[test]
    fn calculate_reports_distance_to_next_level() {
        let input = WealthLevelInput {
            net_worth: dec!(2500000),
            is_household: false,
        };

        let result = WealthLevelCalculator.calculate(&input);

        assert_eq!(result.level, "The comfortable poor");
        assert_eq!(result.next_level.as_deref(), Some("The comfortably off"));
        assert_eq!(result.amount_to_next_level, dec!(1500000));
    }

    #[test]
    fn calculate_top_level_has_no_next_level() {
        let input = WealthLevelInput {
            net_worth: dec!(250000000),
            is_household: false,
        };

        let result = WealthLevelCalculator.calculate(&input);

        assert_eq!(result.next_level, None);
        assert_eq!(result.amount_to_next_level, dec!(0));
    }

    #[test]
    fn calculate_default_is_below_ladder() {
        let result = WealthLevelCalculator.calculate(&WealthLevelInput::default());

        assert_eq!(result.level, NOT_YET_CLASSIFIED);
        assert_eq!(result.amount_to_next_level, dec!(500000));
    }

    // =========================================================================
    // field access / report tests
    // =========================================================================

    #[test]
    fn set_household_requires_flag() {
        let mut input = WealthLevelInput::default();

        input.set("is_household", FieldValue::from(true)).unwrap();
        let mismatch = input.set("is_household", FieldValue::from(dec!(1)));

        assert!(input.is_household);
        assert!(matches!(mismatch, Err(FieldError::KindMismatch { .. })));
    }

    #[test]
    fn report_shows_level_text() {
        let input = WealthLevelInput {
            net_worth: dec!(12000000),
            is_household: false,
        };

        let report = WealthLevelCalculator.calculate(&input).report();

        assert_eq!(report.value_of("Wealth level"), Some("The affluent".to_string()));
        assert_eq!(report.value_of("Next level"), Some("The rich".to_string()));
        assert_eq!(report.tables[0].rows.len(), 6);
    }
}
