//! Extraction behavior across the whole periodic table.

use matscout::{Element, ElementExtractor, ElementToken, ErrorKind, ScoutError};

#[test]
fn test_every_element_name_is_recognized() {
    let extractor = ElementExtractor::new();
    for element in Element::all() {
        for text in [
            element.name().to_string(),
            element.name().to_uppercase(),
            element.name().to_lowercase(),
        ] {
            let extraction = extractor.extract(&text).unwrap();
            assert_eq!(extraction.elements(), &[element], "name '{}'", text);
        }
    }
}

#[test]
fn test_every_symbol_is_recognized_in_any_case() {
    let extractor = ElementExtractor::new();
    // "I" is always the pronoun; iodine is reachable by name.
    for element in Element::all().filter(|e| e.symbol() != "I") {
        for text in [
            element.symbol().to_string(),
            element.symbol().to_lowercase(),
            element.symbol().to_uppercase(),
        ] {
            let extraction = extractor.extract(&format!("materials with {}", text)).unwrap();
            assert_eq!(extraction.elements(), &[element], "symbol '{}'", text);
            assert!(!extraction.is_formula(), "symbol '{}'", text);
        }
    }
}

#[test]
fn test_uppercase_pairs_are_symbols_not_formulas() {
    let extractor = ElementExtractor::new();
    for (text, symbol) in [("NI", "Ni"), ("SC", "Sc"), ("CO", "Co"), ("o", "O"), ("c", "C")] {
        let extraction = extractor.extract(text).unwrap();
        assert_eq!(extraction.symbols(), vec![symbol], "{}", text);
        assert!(!extraction.is_formula());
    }

    let iodine = extractor.extract("I need iodine").unwrap();
    assert_eq!(iodine.symbols(), vec!["I"]);
}

#[test]
fn test_oversized_formula_counts_fail_cleanly() {
    let err = ElementExtractor::new()
        .extract("H4000000000H4000000000")
        .unwrap_err();
    assert_eq!(ScoutError::from(err).kind(), ErrorKind::Extraction);
}

#[test]
fn test_extraction_is_deterministic() {
    let extractor = ElementExtractor::new();
    let query = "Show me compounds of lithium, Fe, phosphorus and oxygen like LiFePO4";
    let first = extractor.extract(query).unwrap();
    for _ in 0..10 {
        assert_eq!(extractor.extract(query).unwrap(), first);
    }
}

#[test]
fn test_formula_tokens_keep_their_spelling() {
    let extractor = ElementExtractor::new();
    let extraction = extractor.extract("compare LiFePO4 with Fe2O3").unwrap();

    let formulas: Vec<&str> = extraction
        .tokens()
        .iter()
        .filter_map(|t| match t {
            ElementToken::Formula(f) => Some(f.as_str()),
            ElementToken::Element(_) => None,
        })
        .collect();
    assert_eq!(formulas, vec!["LiFePO4", "Fe2O3"]);
    assert!(extraction.is_formula());
    assert_eq!(extraction.symbols(), vec!["Li", "Fe", "P", "O"]);
}

#[test]
fn test_prose_without_chemistry_fails() {
    let extractor = ElementExtractor::new();
    for query in ["", "   ", "what is the weather like", "1234 5678", "I and I"] {
        let err = extractor.extract(query).unwrap_err();
        assert_eq!(ScoutError::from(err).kind(), ErrorKind::Extraction, "{:?}", query);
    }
}
