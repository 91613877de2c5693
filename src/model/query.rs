//! The immutable description of one search.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::chemistry::{Element, Formula};
use crate::extraction::Extraction;

use super::fields::{ELEMENTS_FIELD, FORMULA_FIELD};
use super::record::MaterialRecord;

/// Where records come from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchMode {
    /// The remote materials service; requires a credential.
    #[default]
    Live,
    /// The bundled offline dataset.
    Demo,
}

impl SearchMode {
    pub fn from_demo_flag(demo: bool) -> Self {
        if demo {
            Self::Demo
        } else {
            Self::Live
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Live => "live",
            Self::Demo => "demo",
        }
    }
}

impl fmt::Display for SearchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An opaque API key. Never printed in full.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    /// Wrap a key; blank input yields `None`.
    pub fn new(raw: impl Into<String>) -> Option<Self> {
        let raw = raw.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    /// The raw key, for placing in an outbound request header only.
    pub fn expose(&self) -> &str {
        &self.0
    }

    /// `********abcd` for keys longer than eight characters, `********` otherwise.
    pub fn masked(&self) -> String {
        let chars: Vec<char> = self.0.chars().collect();
        if chars.len() > 8 {
            let tail: String = chars[chars.len() - 4..].iter().collect();
            format!("********{}", tail)
        } else {
            "********".to_string()
        }
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(<redacted>)")
    }
}

impl fmt::Display for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.masked())
    }
}

/// What a record must contain to match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Criteria {
    /// Composition must be a superset of these elements.
    Elements(Vec<Element>),
    /// Reduced composition must equal one of these formulas.
    Formulas(Vec<Formula>),
}

impl Criteria {
    /// Formula mode wins whenever the extraction produced a formula.
    pub fn from_extraction(extraction: &Extraction) -> Self {
        let formulas = extraction.formulas();
        if formulas.is_empty() {
            Criteria::Elements(extraction.elements().to_vec())
        } else {
            Criteria::Formulas(formulas)
        }
    }

    pub fn is_formula(&self) -> bool {
        matches!(self, Criteria::Formulas(_))
    }

    /// Human-readable form: `Fe-O` for element systems, `Fe2O3, NaCl` for formulas.
    pub fn describe(&self) -> String {
        match self {
            Criteria::Elements(elements) => {
                let mut symbols: Vec<&str> = elements.iter().map(|e| e.symbol()).collect();
                symbols.sort_unstable();
                symbols.join("-")
            }
            Criteria::Formulas(formulas) => formulas
                .iter()
                .map(|f| f.as_str())
                .collect::<Vec<_>>()
                .join(", "),
        }
    }

    /// In-memory match used against locally held records.
    pub fn matches(&self, record: &MaterialRecord) -> bool {
        match self {
            Criteria::Elements(wanted) => {
                let present = record_elements(record);
                wanted.iter().all(|e| present.contains(e))
            }
            Criteria::Formulas(wanted) => record
                .get(FORMULA_FIELD)
                .and_then(|v| v.as_str())
                .and_then(|s| Formula::parse(s).ok())
                .is_some_and(|formula| wanted.iter().any(|w| w.same_composition(&formula))),
        }
    }
}

/// Elements listed on a record, falling back to its formula.
fn record_elements(record: &MaterialRecord) -> BTreeSet<Element> {
    if let Some(list) = record.get(ELEMENTS_FIELD).and_then(|v| v.as_array()) {
        return list
            .iter()
            .filter_map(|v| v.as_str())
            .filter_map(Element::from_symbol)
            .collect();
    }

    record
        .get(FORMULA_FIELD)
        .and_then(|v| v.as_str())
        .and_then(|s| Formula::parse(s).ok())
        .map(|f| f.elements().into_iter().collect())
        .unwrap_or_default()
}

/// The validated input to one retrieval.
#[derive(Debug, Clone)]
pub struct Query {
    criteria: Criteria,
    max_results: usize,
    properties: Vec<String>,
    mode: SearchMode,
    credential: Option<Credential>,
}

impl Query {
    pub fn new(
        criteria: Criteria,
        max_results: usize,
        properties: Vec<String>,
        mode: SearchMode,
        credential: Option<Credential>,
    ) -> Self {
        Self {
            criteria,
            max_results,
            properties,
            mode,
            credential,
        }
    }

    pub fn criteria(&self) -> &Criteria {
        &self.criteria
    }

    pub fn max_results(&self) -> usize {
        self.max_results
    }

    /// Requested properties, identifier excluded, in request order.
    pub fn properties(&self) -> &[String] {
        &self.properties
    }

    pub fn mode(&self) -> SearchMode {
        self.mode
    }

    pub fn credential(&self) -> Option<&Credential> {
        self.credential.as_ref()
    }
}
