use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors found while validating a lookup table.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LookupTableError {
    #[error("lookup table has no entries")]
    Empty,

    #[error("band '{label}' has min {min} not below its max {max}")]
    InvertedBand {
        label: String,
        min: Decimal,
        max: Decimal,
    },

    #[error("band '{label}' starts at {min} but the previous band ends at {previous_max}")]
    NotContiguous {
        label: String,
        min: Decimal,
        previous_max: Decimal,
    },

    #[error("band '{label}' has no upper bound but is not the last band")]
    UnboundedBeforeEnd { label: String },

    #[error("step threshold {threshold} does not increase on previous threshold {previous}")]
    UnorderedSteps {
        threshold: Decimal,
        previous: Decimal,
    },
}

/// A labelled half-open range `[min, max)`. `max = None` means unbounded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierBand {
    pub min: Decimal,
    pub max: Option<Decimal>,
    pub label: String,
}

impl TierBand {
    pub fn new(
        min: Decimal,
        max: Option<Decimal>,
        label: impl Into<String>,
    ) -> Self {
        Self {
            min,
            max,
            label: label.into(),
        }
    }

    pub fn contains(
        &self,
        value: Decimal,
    ) -> bool {
        value >= self.min && self.max.is_none_or(|max| value < max)
    }
}

/// Ordered, contiguous, non-overlapping bands used to classify a value.
///
/// Values outside every band classify as the table's sentinel label.
/// Deserializing goes through [`TierTable::new`], so a loaded table is
/// validated like a constructed one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "TierTableParts")]
pub struct TierTable {
    bands: Vec<TierBand>,
    sentinel: String,
}

#[derive(Deserialize)]
struct TierTableParts {
    bands: Vec<TierBand>,
    sentinel: String,
}

impl TryFrom<TierTableParts> for TierTable {
    type Error = LookupTableError;

    fn try_from(parts: TierTableParts) -> Result<Self, Self::Error> {
        Self::new(parts.bands, parts.sentinel)
    }
}

impl TierTable {
    /// Builds a table after checking the bands are ordered and contiguous.
    ///
    /// # Errors
    ///
    /// Returns [`LookupTableError`] if the table is empty, a band is inverted,
    /// two neighbouring bands leave a gap or overlap, or an unbounded band is
    /// followed by another band.
    pub fn new(
        bands: Vec<TierBand>,
        sentinel: impl Into<String>,
    ) -> Result<Self, LookupTableError> {
        let table = Self {
            bands,
            sentinel: sentinel.into(),
        };
        table.validate()?;
        Ok(table)
    }

    /// Builds one of the built-in tables. Their bands are checked by tests
    /// rather than at runtime.
    pub(crate) fn from_static(
        bands: Vec<TierBand>,
        sentinel: impl Into<String>,
    ) -> Self {
        let table = Self {
            bands,
            sentinel: sentinel.into(),
        };
        debug_assert!(table.validate().is_ok(), "built-in tier table is invalid");
        table
    }

    /// Validates band ordering and contiguity.
    pub fn validate(&self) -> Result<(), LookupTableError> {
        if self.bands.is_empty() {
            return Err(LookupTableError::Empty);
        }

        let mut previous_max: Option<Decimal> = None;
        for (index, band) in self.bands.iter().enumerate() {
            if index > 0 {
                match previous_max {
                    None => {
                        return Err(LookupTableError::UnboundedBeforeEnd {
                            label: self.bands[index - 1].label.clone(),
                        });
                    }
                    Some(previous) if previous != band.min => {
                        return Err(LookupTableError::NotContiguous {
                            label: band.label.clone(),
                            min: band.min,
                            previous_max: previous,
                        });
                    }
                    Some(_) => {}
                }
            }

            if let Some(max) = band.max {
                if band.min >= max {
                    return Err(LookupTableError::InvertedBand {
                        label: band.label.clone(),
                        min: band.min,
                        max,
                    });
                }
            }
            previous_max = band.max;
        }
        Ok(())
    }

    /// Returns the first band with `min <= value < max`.
    pub fn band_for(
        &self,
        value: Decimal,
    ) -> Option<&TierBand> {
        self.bands.iter().find(|band| band.contains(value))
    }

    /// Returns the label of the band containing `value`, or the sentinel.
    pub fn classify(
        &self,
        value: Decimal,
    ) -> &str {
        self.band_for(value)
            .map(|band| band.label.as_str())
            .unwrap_or(&self.sentinel)
    }

    /// Returns the first band that starts above `value`.
    pub fn next_band_above(
        &self,
        value: Decimal,
    ) -> Option<&TierBand> {
        self.bands.iter().find(|band| band.min > value)
    }

    pub fn sentinel(&self) -> &str {
        &self.sentinel
    }

    pub fn bands(&self) -> &[TierBand] {
        &self.bands
    }
}

/// A threshold and the value that applies from it upwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateStep<T> {
    pub threshold: Decimal,
    pub value: T,
}

/// Step schedule resolved by "last step whose threshold is at most the value".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RateScheduleParts<T>")]
pub struct RateSchedule<T> {
    steps: Vec<RateStep<T>>,
}

#[derive(Deserialize)]
struct RateScheduleParts<T> {
    steps: Vec<RateStep<T>>,
}

impl<T> TryFrom<RateScheduleParts<T>> for RateSchedule<T> {
    type Error = LookupTableError;

    fn try_from(parts: RateScheduleParts<T>) -> Result<Self, Self::Error> {
        Self::new(parts.steps)
    }
}

impl<T> RateSchedule<T> {
    /// Builds a schedule from steps in strictly increasing threshold order.
    pub fn new(steps: Vec<RateStep<T>>) -> Result<Self, LookupTableError> {
        if steps.is_empty() {
            return Err(LookupTableError::Empty);
        }
        for pair in steps.windows(2) {
            if pair[1].threshold <= pair[0].threshold {
                return Err(LookupTableError::UnorderedSteps {
                    threshold: pair[1].threshold,
                    previous: pair[0].threshold,
                });
            }
        }
        Ok(Self { steps })
    }

    /// Builds one of the built-in schedules without the ordering check.
    pub(crate) fn from_static(steps: Vec<RateStep<T>>) -> Self {
        debug_assert!(
            steps.windows(2).all(|pair| pair[0].threshold < pair[1].threshold),
            "built-in rate schedule is unordered"
        );
        Self { steps }
    }

    /// Returns the step that applies to `value`, or `None` below the first threshold.
    pub fn step_for(
        &self,
        value: Decimal,
    ) -> Option<&RateStep<T>> {
        self.steps.iter().rev().find(|step| step.threshold <= value)
    }

    pub fn lookup(
        &self,
        value: Decimal,
    ) -> Option<&T> {
        self.step_for(value).map(|step| &step.value)
    }

    pub fn steps(&self) -> &[RateStep<T>] {
        &self.steps
    }
}
