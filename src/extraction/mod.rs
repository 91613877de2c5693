//! Element/formula extraction from natural-language queries.
//!
//! Text is split into tokens and each token is offered to an ordered list of
//! [`TokenClassifier`] strategies:
//!
//! 1. Full element names ("iron")
//! 2. One- and two-letter symbols, any case ("Fe", "fe", "O")
//! 3. Formulas ("Fe2O3", "NaCl")

mod classifier;
mod extractor;
mod types;

pub use classifier::{
    default_classifiers, ElementNameClassifier, FormulaClassifier, SymbolClassifier,
    TokenClassifier,
};
pub use extractor::ElementExtractor;
pub use types::{ElementToken, Extraction};
