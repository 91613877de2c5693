//! Chemical formula parsing ("Fe2O3", "NaCl", "LiFePO4").

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

use super::element::Element;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseFormulaError {
    #[error("'{0}' is not a formula (expected symbol chunks such as Fe2O3)")]
    Syntax(String),

    #[error("'{symbol}' in '{formula}' is not an element symbol")]
    UnknownSymbol { formula: String, symbol: String },

    #[error("zero count for '{symbol}' in '{formula}'")]
    ZeroCount { formula: String, symbol: String },

    #[error("count for '{symbol}' in '{formula}' is too large")]
    CountOverflow { formula: String, symbol: String },
}

/// A flat formula: capital-led symbol chunks, each optionally followed by a count.
#[derive(Debug, Clone)]
pub struct Formula {
    text: String,
    /// Parsed chunks in written order.
    parts: Vec<(Element, u32)>,
    /// Total atom count per element.
    composition: BTreeMap<Element, u32>,
}

impl Formula {
    pub fn parse(text: &str) -> Result<Self, ParseFormulaError> {
        if !FORMULA_PATTERN.is_match(text) {
            return Err(ParseFormulaError::Syntax(text.to_string()));
        }

        let mut parts = Vec::new();
        let mut composition: BTreeMap<Element, u32> = BTreeMap::new();
        for caps in CHUNK_PATTERN.captures_iter(text) {
            let symbol = &caps[1];
            let element =
                Element::from_symbol(symbol).ok_or_else(|| ParseFormulaError::UnknownSymbol {
                    formula: text.to_string(),
                    symbol: symbol.to_string(),
                })?;
            let count = match caps.get(2).map(|m| m.as_str()).filter(|s| !s.is_empty()) {
                Some(digits) => digits
                    .parse::<u32>()
                    .map_err(|_| ParseFormulaError::Syntax(text.to_string()))?,
                None => 1,
            };
            if count == 0 {
                return Err(ParseFormulaError::ZeroCount {
                    formula: text.to_string(),
                    symbol: symbol.to_string(),
                });
            }
            let total = composition.entry(element).or_insert(0);
            *total = total
                .checked_add(count)
                .ok_or_else(|| ParseFormulaError::CountOverflow {
                    formula: text.to_string(),
                    symbol: symbol.to_string(),
                })?;
            parts.push((element, count));
        }

        Ok(Self {
            text: text.to_string(),
            parts,
            composition,
        })
    }

    /// The formula as written.
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Constituent elements in order of first appearance.
    pub fn elements(&self) -> Vec<Element> {
        let mut seen = Vec::new();
        for (element, _) in &self.parts {
            if !seen.contains(element) {
                seen.push(*element);
            }
        }
        seen
    }

    /// Total atom count per element.
    pub fn composition(&self) -> BTreeMap<Element, u32> {
        self.composition.clone()
    }

    /// Composition divided by the greatest common divisor of its counts.
    pub fn reduced_composition(&self) -> BTreeMap<Element, u32> {
        let composition = self.composition();
        let divisor = composition.values().copied().fold(0, gcd).max(1);
        composition
            .into_iter()
            .map(|(element, count)| (element, count / divisor))
            .collect()
    }

    /// Whether two formulas describe the same reduced composition
    /// ("Fe4O6" matches "Fe2O3", "ClNa" matches "NaCl").
    pub fn same_composition(&self, other: &Formula) -> bool {
        self.reduced_composition() == other.reduced_composition()
    }
}

impl PartialEq for Formula {
    fn eq(&self, other: &Self) -> bool {
        self.text == other.text
    }
}

impl Eq for Formula {}

impl fmt::Display for Formula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl FromStr for Formula {
    type Err = ParseFormulaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Formula::parse(s)
    }
}

impl Serialize for Formula {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.text)
    }
}

impl<'de> Deserialize<'de> for Formula {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Formula::parse(&s).map_err(serde::de::Error::custom)
    }
}

fn gcd(a: u32, b: u32) -> u32 {
    if b == 0 {
        a
    } else {
        gcd(b, a % b)
    }
}

static FORMULA_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:[A-Z][a-z]?\d*)+$").expect("Invalid regex"));
static CHUNK_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([A-Z][a-z]?)(\d*)").expect("Invalid regex"));
