//! Token recognition strategies.
//!
//! The extractor asks each [`TokenClassifier`] in turn; the first one that
//! recognizes a token wins.

use crate::chemistry::{Element, Formula};

use super::types::ElementToken;

/// A single recognition strategy.
pub trait TokenClassifier: Send + Sync {
    /// Short name, used in logs.
    fn name(&self) -> &'static str;

    /// Recognize one separator-free token.
    fn classify(&self, token: &str) -> Option<ElementToken>;
}

/// The built-in strategy order.
pub fn default_classifiers() -> Vec<Box<dyn TokenClassifier>> {
    vec![
        Box::new(ElementNameClassifier),
        Box::new(SymbolClassifier),
        Box::new(FormulaClassifier),
    ]
}

/// The English pronoun "I" (or "i"); never read as iodine.
fn is_pronoun(token: &str) -> bool {
    token.eq_ignore_ascii_case("i")
}

// ============================================================================
// Strategies
// ============================================================================

/// Full English element names, any case ("iron", "Oxygen", "CARBON").
pub struct ElementNameClassifier;

impl TokenClassifier for ElementNameClassifier {
    fn name(&self) -> &'static str {
        "element_name"
    }

    fn classify(&self, token: &str) -> Option<ElementToken> {
        Element::from_name(token).map(ElementToken::Element)
    }
}

/// One- and two-letter symbols in any case ("Fe", "fe", "FE", "o").
///
/// Runs before formula parsing, so "NI" is nickel and "CO" is cobalt.
pub struct SymbolClassifier;

impl TokenClassifier for SymbolClassifier {
    fn name(&self) -> &'static str {
        "symbol"
    }

    fn classify(&self, token: &str) -> Option<ElementToken> {
        if token.len() > 2 || is_pronoun(token) {
            return None;
        }
        Element::from_symbol_ignore_case(token).map(ElementToken::Element)
    }
}

/// Flat formulas ("Fe2O3", "NaCl", "CO2").
pub struct FormulaClassifier;

impl TokenClassifier for FormulaClassifier {
    fn name(&self) -> &'static str {
        "formula"
    }

    fn classify(&self, token: &str) -> Option<ElementToken> {
        if is_pronoun(token) {
            return None;
        }
        Formula::parse(token).ok().map(ElementToken::Formula)
    }
}
