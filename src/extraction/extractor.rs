//! Natural-language element and formula extraction.

use tracing::debug;

use crate::error::ExtractionError;

use super::classifier::{default_classifiers, TokenClassifier};
use super::types::{ElementToken, Extraction};

/// Turns free text into an ordered set of element symbols and formulas.
pub struct ElementExtractor {
    classifiers: Vec<Box<dyn TokenClassifier>>,
}

impl Default for ElementExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl ElementExtractor {
    /// Extractor with the built-in strategies: names, symbols, then formulas.
    pub fn new() -> Self {
        Self {
            classifiers: default_classifiers(),
        }
    }

    /// Extractor with an explicit strategy list.
    pub fn with_classifiers(classifiers: Vec<Box<dyn TokenClassifier>>) -> Self {
        Self { classifiers }
    }

    /// Append a strategy, consulted after the existing ones.
    pub fn with_classifier(mut self, classifier: impl TokenClassifier + 'static) -> Self {
        self.classifiers.push(Box::new(classifier));
        self
    }

    /// Extract chemistry from `text`.
    ///
    /// Fails when the text is blank or nothing in it is recognized.
    pub fn extract(&self, text: &str) -> Result<Extraction, ExtractionError> {
        if text.trim().is_empty() {
            return Err(ExtractionError::EmptyQuery);
        }

        let tokens: Vec<ElementToken> = tokenize(text)
            .filter_map(|token| self.classify(token))
            .collect();

        let extraction = Extraction::from_tokens(tokens);
        if extraction.is_empty() {
            debug!(text_len = text.len(), "No chemistry recognized");
            return Err(ExtractionError::NothingRecognized(text.trim().chars().count()));
        }

        debug!(
            symbols = ?extraction.symbols(),
            is_formula = extraction.is_formula(),
            "Extracted query chemistry"
        );
        Ok(extraction)
    }

    fn classify(&self, token: &str) -> Option<ElementToken> {
        self.classifiers.iter().find_map(|classifier| {
            let found = classifier.classify(token)?;
            debug!(token, strategy = classifier.name(), "Token recognized");
            Some(found)
        })
    }
}

/// Split on anything that is not a letter or digit, dropping the
/// connective "and" and numeric-only tokens.
fn tokenize(text: &str) -> impl Iterator<Item = &str> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|token| !token.is_empty())
        .filter(|token| !token.eq_ignore_ascii_case("and"))
        .filter(|token| !token.chars().all(|c| c.is_ascii_digit()))
}
