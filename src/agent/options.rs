//! Option coercion for search requests.

use crate::config::SearchConfig;
use crate::model::IDENTIFIER_FIELD;

/// Effective result cap.
///
/// Missing or non-positive values use the configured default; larger values
/// are clamped to the configured cap.
pub fn effective_max_results(requested: Option<i64>, config: &SearchConfig) -> usize {
    match requested {
        Some(n) if n > 0 => usize::try_from(n)
            .unwrap_or(usize::MAX)
            .min(config.max_results_cap),
        _ => config.default_max_results.min(config.max_results_cap),
    }
}

/// Effective property list, identifier excluded.
///
/// Names are trimmed, blanks dropped and duplicates collapsed. An empty
/// selection falls back to the configured defaults.
pub fn effective_properties(requested: &[String], config: &SearchConfig) -> Vec<String> {
    let selected = normalize(requested);
    if selected.is_empty() {
        normalize(&config.default_properties)
    } else {
        selected
    }
}

/// Result columns: the identifier followed by `properties`.
pub fn result_columns(properties: &[String]) -> Vec<String> {
    std::iter::once(IDENTIFIER_FIELD.to_string())
        .chain(properties.iter().cloned())
        .collect()
}

fn normalize(names: &[String]) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for name in names {
        let name = name.trim();
        if name.is_empty() || name == IDENTIFIER_FIELD {
            continue;
        }
        if !out.iter().any(|existing| existing == name) {
            out.push(name.to_string());
        }
    }
    out
}
