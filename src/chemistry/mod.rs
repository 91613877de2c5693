//! Chemistry reference data: the periodic table and flat formula parsing.

mod element;
mod formula;

pub use element::{Element, ParseElementError};
pub use formula::{Formula, ParseFormulaError};
