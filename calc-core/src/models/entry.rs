use std::fmt;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::field::{FieldError, FieldKind, FieldSpec, FieldValue};

/// Stable identifier of a list entry.
///
/// Ids are handed out in increasing order and never reused by the list that
/// issued them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntryId(pub u32);

impl fmt::Display for EntryId {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A named sub-record held in a list-valued input field.
pub trait Entry: Clone + fmt::Debug + PartialEq {
    /// Field declarations shared by every entry of this type.
    fn fields() -> &'static [FieldSpec];

    /// A new, empty entry carrying `id`.
    fn blank(id: EntryId) -> Self;

    fn id(&self) -> EntryId;

    fn get(
        &self,
        field: &str,
    ) -> Result<FieldValue, FieldError>;

    fn set(
        &mut self,
        field: &str,
        value: FieldValue,
    ) -> Result<(), FieldError>;
}

/// Ordered list of entries with stable ids.
///
/// Entries keep insertion order; removal never reorders the survivors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryList<T> {
    entries: Vec<T>,
    next_id: u32,
}

impl<T> Default for EntryList<T> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            next_id: 1,
        }
    }
}

impl<T: Entry> EntryList<T> {
    pub fn new() -> Self {
        Self::default()
    }

    fn allocate_id(&mut self) -> EntryId {
        let id = EntryId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Appends a blank entry and returns its id.
    pub fn add(&mut self) -> EntryId {
        self.push_with(T::blank)
    }

    /// Appends an entry built by `build` from a freshly allocated id.
    pub fn push_with(
        &mut self,
        build: impl FnOnce(EntryId) -> T,
    ) -> EntryId {
        let id = self.allocate_id();
        self.entries.push(build(id));
        id
    }

    /// Removes the entry with `id`, returning it.
    pub fn remove(
        &mut self,
        id: EntryId,
    ) -> Result<T, FieldError> {
        let index = self
            .entries
            .iter()
            .position(|entry| entry.id() == id)
            .ok_or(FieldError::EntryNotFound(id))?;
        Ok(self.entries.remove(index))
    }

    /// Sets one field of the entry with `id`.
    pub fn update(
        &mut self,
        id: EntryId,
        field: &str,
        value: FieldValue,
    ) -> Result<(), FieldError> {
        self.entries
            .iter_mut()
            .find(|entry| entry.id() == id)
            .ok_or(FieldError::EntryNotFound(id))?
            .set(field, value)
    }

    pub fn get(
        &self,
        id: EntryId,
    ) -> Option<&T> {
        self.entries.iter().find(|entry| entry.id() == id)
    }

    pub fn contains(
        &self,
        id: EntryId,
    ) -> bool {
        self.get(id).is_some()
    }

    pub fn ids(&self) -> Vec<EntryId> {
        self.entries.iter().map(|entry| entry.id()).collect()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Object-safe view of an [`EntryList`], used by the state holder to manage
/// list-valued fields without knowing the entry type.
pub trait EntryStore {
    fn ids(&self) -> Vec<EntryId>;

    fn add(&mut self) -> EntryId;

    fn remove(
        &mut self,
        id: EntryId,
    ) -> Result<(), FieldError>;

    fn update(
        &mut self,
        id: EntryId,
        field: &str,
        value: FieldValue,
    ) -> Result<(), FieldError>;

    fn get_field(
        &self,
        id: EntryId,
        field: &str,
    ) -> Result<FieldValue, FieldError>;
}

impl<T: Entry> EntryStore for EntryList<T> {
    fn ids(&self) -> Vec<EntryId> {
        EntryList::ids(self)
    }

    fn add(&mut self) -> EntryId {
        EntryList::add(self)
    }

    fn remove(
        &mut self,
        id: EntryId,
    ) -> Result<(), FieldError> {
        EntryList::remove(self, id).map(|_| ())
    }

    fn update(
        &mut self,
        id: EntryId,
        field: &str,
        value: FieldValue,
    ) -> Result<(), FieldError> {
        EntryList::update(self, id, field, value)
    }

    fn get_field(
        &self,
        id: EntryId,
        field: &str,
    ) -> Result<FieldValue, FieldError> {
        self.get(id)
            .ok_or(FieldError::EntryNotFound(id))?
            .get(field)
    }
}

impl<'a, T> IntoIterator for &'a EntryList<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

// ---------------------------------------------------------------------------
// Entry types
// ---------------------------------------------------------------------------

/// A source of monthly business revenue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevenueStream {
    pub id: EntryId,
    pub name: String,
    /// Monthly revenue.
    pub revenue: Decimal,
}

impl RevenueStream {
    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::text("name", "Stream name", "What this revenue comes from"),
        FieldSpec::number(
            "revenue",
            "Monthly revenue",
            FieldKind::Currency,
            dec!(0),
            dec!(100000000),
            "Average revenue this stream brings in per month",
        ),
    ];
}

impl Entry for RevenueStream {
    fn fields() -> &'static [FieldSpec] {
        Self::FIELDS
    }

    fn blank(id: EntryId) -> Self {
        Self {
            id,
            name: format!("Revenue stream {id}"),
            revenue: Decimal::ZERO,
        }
    }

    fn id(&self) -> EntryId {
        self.id
    }

    fn get(
        &self,
        field: &str,
    ) -> Result<FieldValue, FieldError> {
        match field {
            "name" => Ok(FieldValue::from(self.name.as_str())),
            "revenue" => Ok(FieldValue::from(self.revenue)),
            _ => Err(FieldError::UnknownField(field.to_string())),
        }
    }

    fn set(
        &mut self,
        field: &str,
        value: FieldValue,
    ) -> Result<(), FieldError> {
        match field {
            "name" => self.name = value.into_text(field)?,
            "revenue" => self.revenue = value.into_number(field)?,
            _ => return Err(FieldError::UnknownField(field.to_string())),
        }
        Ok(())
    }
}

/// Something owned, at its current market value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Asset {
    pub id: EntryId,
    pub name: String,
    pub value: Decimal,
}

impl Asset {
    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::text("name", "Asset name", "Cash, investments, property, ..."),
        FieldSpec::number(
            "value",
            "Current value",
            FieldKind::Currency,
            dec!(0),
            dec!(100000000000),
            "What the asset would sell for today",
        ),
    ];
}

impl Entry for Asset {
    fn fields() -> &'static [FieldSpec] {
        Self::FIELDS
    }

    fn blank(id: EntryId) -> Self {
        Self {
            id,
            name: format!("Asset {id}"),
            value: Decimal::ZERO,
        }
    }

    fn id(&self) -> EntryId {
        self.id
    }

    fn get(
        &self,
        field: &str,
    ) -> Result<FieldValue, FieldError> {
        match field {
            "name" => Ok(FieldValue::from(self.name.as_str())),
            "value" => Ok(FieldValue::from(self.value)),
            _ => Err(FieldError::UnknownField(field.to_string())),
        }
    }

    fn set(
        &mut self,
        field: &str,
        value: FieldValue,
    ) -> Result<(), FieldError> {
        match field {
            "name" => self.name = value.into_text(field)?,
            "value" => self.value = value.into_number(field)?,
            _ => return Err(FieldError::UnknownField(field.to_string())),
        }
        Ok(())
    }
}

/// One line of a recipe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ingredient {
    pub id: EntryId,
    pub name: String,
    pub quantity: Decimal,
    /// Unit as typed (`cup`, `tbsp`, `g`, ...). Unknown units are kept verbatim.
    pub unit: String,
}

impl Ingredient {
    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::text("name", "Ingredient", ""),
        FieldSpec::number(
            "quantity",
            "Quantity",
            FieldKind::Decimal,
            dec!(0),
            dec!(100000),
            "Amount used by the original recipe",
        ),
        FieldSpec::text(
            "unit",
            "Unit",
            "tsp, tbsp, cup, ml, l, g, kg, oz, lb, or any count word",
        ),
    ];
}

impl Entry for Ingredient {
    fn fields() -> &'static [FieldSpec] {
        Self::FIELDS
    }

    fn blank(id: EntryId) -> Self {
        Self {
            id,
            name: format!("Ingredient {id}"),
            quantity: Decimal::ZERO,
            unit: String::new(),
        }
    }

    fn id(&self) -> EntryId {
        self.id
    }

    fn get(
        &self,
        field: &str,
    ) -> Result<FieldValue, FieldError> {
        match field {
            "name" => Ok(FieldValue::from(self.name.as_str())),
            "quantity" => Ok(FieldValue::from(self.quantity)),
            "unit" => Ok(FieldValue::from(self.unit.as_str())),
            _ => Err(FieldError::UnknownField(field.to_string())),
        }
    }

    fn set(
        &mut self,
        field: &str,
        value: FieldValue,
    ) -> Result<(), FieldError> {
        match field {
            "name" => self.name = value.into_text(field)?,
            "quantity" => self.quantity = value.into_number(field)?,
            "unit" => self.unit = value.into_text(field)?,
            _ => return Err(FieldError::UnknownField(field.to_string())),
        }
        Ok(())
    }
}
