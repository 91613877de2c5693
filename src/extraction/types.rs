//! Types produced by the element/formula extractor.

use serde::{Deserialize, Serialize};

use crate::chemistry::{Element, Formula};

// ============================================================================
// Element Token
// ============================================================================

/// One recognized piece of chemistry in the user's text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "type", content = "value")]
pub enum ElementToken {
    /// A single element, always in canonical symbol case
    Element(Element),
    /// A flat chemical formula such as Fe2O3
    Formula(Formula),
}

impl ElementToken {
    /// Elements this token contributes to the display set.
    pub fn elements(&self) -> Vec<Element> {
        match self {
            Self::Element(element) => vec![*element],
            Self::Formula(formula) => formula.elements(),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Element(element) => element.symbol(),
            Self::Formula(formula) => formula.as_str(),
        }
    }
}

// ============================================================================
// Extraction
// ============================================================================

/// Ordered, de-duplicated extraction result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Extraction {
    tokens: Vec<ElementToken>,
    elements: Vec<Element>,
    is_formula: bool,
}

impl Extraction {
    /// Build from tokens in order of appearance. Repeats are dropped.
    pub fn from_tokens(tokens: impl IntoIterator<Item = ElementToken>) -> Self {
        let mut unique: Vec<ElementToken> = Vec::new();
        for token in tokens {
            if !unique.contains(&token) {
                unique.push(token);
            }
        }

        let mut elements = Vec::new();
        for element in unique.iter().flat_map(ElementToken::elements) {
            if !elements.contains(&element) {
                elements.push(element);
            }
        }

        let is_formula = unique
            .iter()
            .any(|t| matches!(t, ElementToken::Formula(_)));

        Self {
            tokens: unique,
            elements,
            is_formula,
        }
    }

    pub fn tokens(&self) -> &[ElementToken] {
        &self.tokens
    }

    /// Display element set: standalone elements and formula constituents,
    /// in order of first appearance.
    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    pub fn symbols(&self) -> Vec<&'static str> {
        self.elements.iter().map(|e| e.symbol()).collect()
    }

    /// Formula tokens in order of appearance.
    pub fn formulas(&self) -> Vec<Formula> {
        self.tokens
            .iter()
            .filter_map(|t| match t {
                ElementToken::Formula(f) => Some(f.clone()),
                ElementToken::Element(_) => None,
            })
            .collect()
    }

    pub fn is_formula(&self) -> bool {
        self.is_formula
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}
