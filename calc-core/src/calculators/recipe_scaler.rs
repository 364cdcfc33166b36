//! Recipe scaling with unit promotion.
//!
//! Every quantity is multiplied by `desired / original` servings. Quantities
//! in a known unit are converted to their measurement family's base unit and
//! shown in the largest unit the amount reaches, so 12 tablespoons become
//! 0.75 cup. Unknown units and bare counts are scaled and kept as typed.
//!
//! | Family | Base | Promotion |
//! |--------|------|-----------|
//! | US volume | tsp | 3 tsp → tbsp, 12 tsp → cup |
//! | Metric volume | ml | 1000 ml → l |
//! | Imperial mass | oz | 16 oz → lb |
//! | Metric mass | g | 1000 g → kg |

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{Calculator, CalculatorInput, unknown};
use crate::calculations::common::{round_to, safe_div};
use crate::models::{
    Entry, EntryList, EntryStore, FieldError, FieldKind, FieldSpec, FieldValue, Ingredient,
    RateSchedule, RateStep,
};
use crate::presentation::{Presentable, Report, ReportTable, ReportValue};

const QUANTITY_DP: u32 = 2;

const FIELDS: &[FieldSpec] = &[
    FieldSpec::number(
        "original_servings",
        "Original servings",
        FieldKind::Integer,
        dec!(1),
        dec!(1000),
        "Servings the recipe makes as written",
    ),
    FieldSpec::number(
        "desired_servings",
        "Desired servings",
        FieldKind::Integer,
        dec!(1),
        dec!(1000),
        "",
    ),
];

/// A group of units convertible into each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Measure {
    UsVolume,
    MetricVolume,
    ImperialMass,
    MetricMass,
}

/// A unit a quantity may be displayed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct DisplayUnit {
    name: &'static str,
    /// How many base units one of this unit holds.
    per_base: Decimal,
}

const TSP: DisplayUnit = DisplayUnit {
    name: "tsp",
    per_base: dec!(1),
};
const TBSP: DisplayUnit = DisplayUnit {
    name: "tbsp",
    per_base: dec!(3),
};
const CUP: DisplayUnit = DisplayUnit {
    name: "cup",
    per_base: dec!(48),
};
const ML: DisplayUnit = DisplayUnit {
    name: "ml",
    per_base: dec!(1),
};
const LITRE: DisplayUnit = DisplayUnit {
    name: "l",
    per_base: dec!(1000),
};
const OZ: DisplayUnit = DisplayUnit {
    name: "oz",
    per_base: dec!(1),
};
const LB: DisplayUnit = DisplayUnit {
    name: "lb",
    per_base: dec!(16),
};
const GRAM: DisplayUnit = DisplayUnit {
    name: "g",
    per_base: dec!(1),
};
const KG: DisplayUnit = DisplayUnit {
    name: "kg",
    per_base: dec!(1000),
};

/// Accepted spellings, matched case-insensitively.
const ALIASES: &[(&str, Measure, DisplayUnit)] = &[
    ("tsp", Measure::UsVolume, TSP),
    ("tsps", Measure::UsVolume, TSP),
    ("teaspoon", Measure::UsVolume, TSP),
    ("teaspoons", Measure::UsVolume, TSP),
    ("tbsp", Measure::UsVolume, TBSP),
    ("tbsps", Measure::UsVolume, TBSP),
    ("tbs", Measure::UsVolume, TBSP),
    ("tablespoon", Measure::UsVolume, TBSP),
    ("tablespoons", Measure::UsVolume, TBSP),
    ("cup", Measure::UsVolume, CUP),
    ("cups", Measure::UsVolume, CUP),
    ("ml", Measure::MetricVolume, ML),
    ("milliliter", Measure::MetricVolume, ML),
    ("milliliters", Measure::MetricVolume, ML),
    ("millilitre", Measure::MetricVolume, ML),
    ("millilitres", Measure::MetricVolume, ML),
    ("l", Measure::MetricVolume, LITRE),
    ("liter", Measure::MetricVolume, LITRE),
    ("liters", Measure::MetricVolume, LITRE),
    ("litre", Measure::MetricVolume, LITRE),
    ("litres", Measure::MetricVolume, LITRE),
    ("oz", Measure::ImperialMass, OZ),
    ("ounce", Measure::ImperialMass, OZ),
    ("ounces", Measure::ImperialMass, OZ),
    ("lb", Measure::ImperialMass, LB),
    ("lbs", Measure::ImperialMass, LB),
    ("pound", Measure::ImperialMass, LB),
    ("pounds", Measure::ImperialMass, LB),
    ("g", Measure::MetricMass, GRAM),
    ("gram", Measure::MetricMass, GRAM),
    ("grams", Measure::MetricMass, GRAM),
    ("kg", Measure::MetricMass, KG),
    ("kilogram", Measure::MetricMass, KG),
    ("kilograms", Measure::MetricMass, KG),
];

fn resolve_unit(unit: &str) -> Option<(Measure, DisplayUnit)> {
    let unit = unit.trim().to_ascii_lowercase();
    ALIASES
        .iter()
        .find(|(alias, _, _)| *alias == unit)
        .map(|(_, measure, display)| (*measure, *display))
}

fn step(
    threshold: Decimal,
    unit: DisplayUnit,
) -> RateStep<DisplayUnit> {
    RateStep {
        threshold,
        value: unit,
    }
}

/// Display unit for an amount in the family's base unit.
fn promotion_schedule(measure: Measure) -> RateSchedule<DisplayUnit> {
    let steps = match measure {
        Measure::UsVolume => vec![step(dec!(0), TSP), step(dec!(3), TBSP), step(dec!(12), CUP)],
        Measure::MetricVolume => vec![step(dec!(0), ML), step(dec!(1000), LITRE)],
        Measure::ImperialMass => vec![step(dec!(0), OZ), step(dec!(16), LB)],
        Measure::MetricMass => vec![step(dec!(0), GRAM), step(dec!(1000), KG)],
    };
    RateSchedule::from_static(steps)
}

/// Scales `quantity` of `unit` by `factor`, promoting to a larger unit when
/// the scaled amount reaches it.
pub fn scale_quantity(
    quantity: Decimal,
    unit: &str,
    factor: Decimal,
) -> (Decimal, String) {
    let scaled = quantity * factor;
    let Some((measure, from)) = resolve_unit(unit) else {
        return (round_to(scaled, QUANTITY_DP).normalize(), unit.trim().to_string());
    };

    let base = scaled * from.per_base;
    let to = promotion_schedule(measure)
        .lookup(base)
        .copied()
        .unwrap_or(from);
    let converted = safe_div(base, to.per_base);
    (round_to(converted, QUANTITY_DP).normalize(), to.name.to_string())
}

/// Input values for the recipe scaler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipeScalerInput {
    pub original_servings: u32,
    pub desired_servings: u32,
    pub ingredients: EntryList<Ingredient>,
}

impl Default for RecipeScalerInput {
    fn default() -> Self {
        let mut ingredients = EntryList::new();
        for (name, quantity, unit) in [
            ("Flour", dec!(2), "cup"),
            ("Butter", dec!(8), "tbsp"),
            ("Vanilla extract", dec!(1), "tsp"),
            ("Eggs", dec!(2), ""),
            ("Salt", dec!(0.5), "tsp"),
        ] {
            ingredients.push_with(|id| Ingredient {
                id,
                name: name.to_string(),
                quantity,
                unit: unit.to_string(),
            });
        }

        Self {
            original_servings: 4,
            desired_servings: 6,
            ingredients,
        }
    }
}

impl CalculatorInput for RecipeScalerInput {
    fn fields() -> &'static [FieldSpec] {
        FIELDS
    }

    fn get(
        &self,
        field: &str,
    ) -> Result<FieldValue, FieldError> {
        match field {
            "original_servings" => Ok(self.original_servings.into()),
            "desired_servings" => Ok(self.desired_servings.into()),
            _ => Err(unknown(field)),
        }
    }

    fn set(
        &mut self,
        field: &str,
        value: FieldValue,
    ) -> Result<(), FieldError> {
        match field {
            "original_servings" => self.original_servings = value.into_count(field)?,
            "desired_servings" => self.desired_servings = value.into_count(field)?,
            _ => return Err(unknown(field)),
        }
        Ok(())
    }

    fn entry_fields() -> &'static [FieldSpec] {
        Ingredient::fields()
    }

    fn entries(&self) -> Option<&dyn EntryStore> {
        Some(&self.ingredients)
    }

    fn entries_mut(&mut self) -> Option<&mut dyn EntryStore> {
        Some(&mut self.ingredients)
    }
}

/// One ingredient before and after scaling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScaledIngredient {
    pub name: String,
    pub original_quantity: Decimal,
    pub original_unit: String,
    pub quantity: Decimal,
    pub unit: String,
}

impl ScaledIngredient {
    /// Scaled amount with its unit, e.g. `0.75 cup` or `3`.
    pub fn amount(&self) -> String {
        join_amount(self.quantity, &self.unit)
    }

    pub fn original_amount(&self) -> String {
        join_amount(self.original_quantity.normalize(), &self.original_unit)
    }
}

fn join_amount(
    quantity: Decimal,
    unit: &str,
) -> String {
    if unit.is_empty() {
        quantity.to_string()
    } else {
        format!("{quantity} {unit}")
    }
}

/// Result of scaling a recipe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipeScalerResult {
    pub scale_factor: Decimal,
    pub ingredients: Vec<ScaledIngredient>,
}

/// Calculator that rescales a recipe to a new number of servings.
#[derive(Debug, Clone, Copy, Default)]
pub struct RecipeScalerCalculator;

impl Calculator for RecipeScalerCalculator {
    type Input = RecipeScalerInput;
    type Output = RecipeScalerResult;

    const SLUG: &'static str = "recipe-scaler";
    const TITLE: &'static str = "Recipe Scaler";

    fn calculate(
        &self,
        input: &RecipeScalerInput,
    ) -> RecipeScalerResult {
        let factor = safe_div(
            Decimal::from(input.desired_servings),
            Decimal::from(input.original_servings),
        );

        debug!(%factor, ingredients = input.ingredients.len(), "scaling recipe");

        let ingredients = input
            .ingredients
            .iter()
            .map(|ingredient| {
                let (quantity, unit) = scale_quantity(ingredient.quantity, &ingredient.unit, factor);
                ScaledIngredient {
                    name: ingredient.name.clone(),
                    original_quantity: ingredient.quantity,
                    original_unit: ingredient.unit.trim().to_string(),
                    quantity,
                    unit,
                }
            })
            .collect();

        RecipeScalerResult {
            scale_factor: round_to(factor, 4).normalize(),
            ingredients,
        }
    }
}

impl Presentable for RecipeScalerResult {
    fn report(&self) -> Report {
        let mut table =
            ReportTable::new("Scaled ingredients", &["Ingredient", "Original", "Scaled"]);
        let mut report = Report::new(RecipeScalerCalculator::TITLE)
            .row("Scale factor", ReportValue::number(self.scale_factor, 2));

        for ingredient in &self.ingredients {
            table.push_row(vec![
                ReportValue::text(ingredient.name.as_str()),
                ReportValue::text(ingredient.original_amount()),
                ReportValue::text(ingredient.amount()),
            ]);
            report = report.row(ingredient.name.as_str(), ReportValue::text(ingredient.amount()));
        }

        report.table(table)
    }
}
