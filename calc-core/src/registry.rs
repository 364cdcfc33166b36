use std::collections::HashMap;
use std::marker::PhantomData;

use thiserror::Error;

use crate::calculators::{
    BusinessProfitCalculator, Calculator, CalculatorInput, CommuteCostCalculator, LoanCalculator,
    NetWorthCalculator, RecipeScalerCalculator, RetirementCalculator, TariffImpactCalculator,
    WealthLevelCalculator, WorkHoursCalculator,
};
use crate::models::{EntryId, FieldError, FieldSpec, FieldValue};
use crate::presentation::{Presentable, Report};
use crate::state::CalculatorState;

/// Errors raised while routing to a calculator.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("unknown calculator '{slug}'; available: {available:?}")]
    UnknownCalculator {
        slug: String,
        available: Vec<&'static str>,
    },
}

/// Object-safe handle on a mounted calculator.
///
/// Hosts drive every calculator through this trait without knowing its
/// input or result types. Values cross it as raw text or [`FieldValue`] and
/// results come back as a [`Report`].
pub trait CalculatorSession {
    fn slug(&self) -> &'static str;

    fn title(&self) -> &'static str;

    fn fields(&self) -> &'static [FieldSpec];

    /// Field declarations of the list entries, empty without a list.
    fn entry_fields(&self) -> &'static [FieldSpec];

    fn field_value(
        &self,
        field: &str,
    ) -> Result<FieldValue, FieldError>;

    fn update(
        &mut self,
        field: &str,
        value: FieldValue,
    ) -> Result<(), FieldError>;

    fn update_raw(
        &mut self,
        field: &str,
        raw: &str,
    ) -> Result<(), FieldError>;

    fn reset(&mut self);

    fn entry_ids(&self) -> Vec<EntryId>;

    fn entry_value(
        &self,
        id: EntryId,
        field: &str,
    ) -> Result<FieldValue, FieldError>;

    fn add_entry(&mut self) -> Result<EntryId, FieldError>;

    fn remove_entry(
        &mut self,
        id: EntryId,
    ) -> Result<(), FieldError>;

    fn update_entry_raw(
        &mut self,
        id: EntryId,
        field: &str,
        raw: &str,
    ) -> Result<(), FieldError>;

    /// Runs the calculation and returns the fresh result's report.
    fn calculate(&mut self) -> Report;

    /// Report of the last calculation, if any since mount or reset.
    fn last_report(&self) -> Option<Report>;
}

impl<C: Calculator> CalculatorSession for CalculatorState<C> {
    fn slug(&self) -> &'static str {
        C::SLUG
    }

    fn title(&self) -> &'static str {
        C::TITLE
    }

    fn fields(&self) -> &'static [FieldSpec] {
        C::Input::fields()
    }

    fn entry_fields(&self) -> &'static [FieldSpec] {
        C::Input::entry_fields()
    }

    fn field_value(
        &self,
        field: &str,
    ) -> Result<FieldValue, FieldError> {
        self.input().get(field)
    }

    fn update(
        &mut self,
        field: &str,
        value: FieldValue,
    ) -> Result<(), FieldError> {
        CalculatorState::update(self, field, value)
    }

    fn update_raw(
        &mut self,
        field: &str,
        raw: &str,
    ) -> Result<(), FieldError> {
        CalculatorState::update_raw(self, field, raw)
    }

    fn reset(&mut self) {
        CalculatorState::reset(self)
    }

    fn entry_ids(&self) -> Vec<EntryId> {
        CalculatorState::entry_ids(self)
    }

    fn entry_value(
        &self,
        id: EntryId,
        field: &str,
    ) -> Result<FieldValue, FieldError> {
        self.input()
            .entries()
            .ok_or(FieldError::NoEntries)?
            .get_field(id, field)
    }

    fn add_entry(&mut self) -> Result<EntryId, FieldError> {
        CalculatorState::add_entry(self)
    }

    fn remove_entry(
        &mut self,
        id: EntryId,
    ) -> Result<(), FieldError> {
        CalculatorState::remove_entry(self, id)
    }

    fn update_entry_raw(
        &mut self,
        id: EntryId,
        field: &str,
        raw: &str,
    ) -> Result<(), FieldError> {
        CalculatorState::update_entry_raw(self, id, field, raw)
    }

    fn calculate(&mut self) -> Report {
        CalculatorState::calculate(self).report()
    }

    fn last_report(&self) -> Option<Report> {
        self.result().map(Presentable::report)
    }
}

/// Mounts fresh sessions of one calculator.
pub trait CalculatorFactory {
    /// Route name, unique within a registry.
    fn slug(&self) -> &'static str;

    fn title(&self) -> &'static str;

    /// A new session holding the calculator's default input.
    fn mount(&self) -> Box<dyn CalculatorSession>;
}

/// Factory for any calculator whose defaults are self-contained.
pub struct Route<C>(PhantomData<fn() -> C>);

impl<C> Route<C> {
    pub fn new() -> Self {
        Self(PhantomData)
    }
}

impl<C> Default for Route<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Calculator + Default + 'static> CalculatorFactory for Route<C> {
    fn slug(&self) -> &'static str {
        C::SLUG
    }

    fn title(&self) -> &'static str {
        C::TITLE
    }

    fn mount(&self) -> Box<dyn CalculatorSession> {
        Box::new(CalculatorState::new(C::default()))
    }
}

/// Registry of [`CalculatorFactory`] instances, keyed by slug.
///
/// Typical lifetime:
/// 1. Create with `CalculatorRegistry::new()` (or `with_builtin_calculators`).
/// 2. Call `register` once per calculator.
/// 3. Call `mount` whenever a route is visited.
pub struct CalculatorRegistry {
    factories: HashMap<&'static str, Box<dyn CalculatorFactory>>,
}

impl CalculatorRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            factories: HashMap::new(),
        }
    }

    /// A registry holding every calculator in this crate.
    pub fn with_builtin_calculators() -> Self {
        let mut registry = Self::new();
        registry.route::<BusinessProfitCalculator>();
        registry.route::<CommuteCostCalculator>();
        registry.route::<LoanCalculator>();
        registry.route::<NetWorthCalculator>();
        registry.route::<RecipeScalerCalculator>();
        registry.route::<RetirementCalculator>();
        registry.route::<TariffImpactCalculator>();
        registry.route::<WealthLevelCalculator>();
        registry.route::<WorkHoursCalculator>();
        registry
    }

    /// Register a factory. A factory with the same slug is replaced.
    pub fn register(
        &mut self,
        factory: Box<dyn CalculatorFactory>,
    ) {
        self.factories.insert(factory.slug(), factory);
    }

    /// Register a calculator under its own slug.
    pub fn route<C: Calculator + Default + 'static>(&mut self) {
        self.register(Box::new(Route::<C>::new()));
    }

    /// Slugs of every registered calculator, sorted alphabetically.
    pub fn available(&self) -> Vec<&'static str> {
        let mut slugs: Vec<_> = self.factories.keys().copied().collect();
        slugs.sort_unstable();
        slugs
    }

    pub fn title_of(
        &self,
        slug: &str,
    ) -> Option<&'static str> {
        self.factories.get(slug).map(|factory| factory.title())
    }

    /// Mount a fresh session of the calculator registered under `slug`.
    ///
    /// # Errors
    /// [`RegistryError::UnknownCalculator`] when nothing is registered under
    /// `slug`.
    pub fn mount(
        &self,
        slug: &str,
    ) -> Result<Box<dyn CalculatorSession>, RegistryError> {
        let factory =
            self.factories
                .get(slug)
                .ok_or_else(|| RegistryError::UnknownCalculator {
                    slug: slug.to_string(),
                    available: self.available(),
                })?;
        Ok(factory.mount())
    }
}

impl Default for CalculatorRegistry {
    fn default() -> Self {
        Self::new()
    }
}
