pub mod calculations;
pub mod calculators;
pub mod models;
pub mod normalize;
pub mod presentation;
pub mod registry;
pub mod state;

pub use calculators::{Calculator, CalculatorInput};
pub use models::*;
pub use presentation::{Presentable, Report, ReportRow, ReportTable, ReportValue};
pub use registry::{CalculatorFactory, CalculatorRegistry, CalculatorSession, RegistryError, Route};
pub use state::CalculatorState;
