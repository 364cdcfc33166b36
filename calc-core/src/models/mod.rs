mod entry;
mod field;
mod lookup_table;

pub use entry::{Asset, Entry, EntryId, EntryList, EntryStore, Ingredient, RevenueStream};
pub use field::{FieldError, FieldKind, FieldSpec, FieldValue, find_spec};
pub use lookup_table::{LookupTableError, RateSchedule, RateStep, TierBand, TierTable};
