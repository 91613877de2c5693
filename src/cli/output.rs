//! Output formatting for CLI commands.
//!
//! This module handles formatting output as either JSON or human-readable text.

use anyhow::Result;
use matscout::{
    agent::{AgentResponse, CredentialStatus, ResponseStatus},
    mcp::ListPropertiesResponse,
    ResultSet,
};

/// Widest a table column is allowed to grow.
const MAX_COLUMN_WIDTH: usize = 40;

/// Print a search response.
pub fn print_search_response(response: &AgentResponse, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(response)?);
        return Ok(());
    }

    match response.status {
        ResponseStatus::Error => {
            eprintln!("{}", response.message);
            if let Some(kind) = response.error_kind {
                eprintln!("(error kind: {})", kind);
            }
        }
        ResponseStatus::Empty => {
            println!("{}", response.message);
            print_recognized(response);
        }
        ResponseStatus::Success => {
            println!("{}", response.message);
            print_recognized(response);
            if let Some(results) = &response.results {
                println!();
                print_table(results);
                println!(
                    "\n{} results ({}ms)",
                    results.len(),
                    response.stats.total_time_ms
                );
            }
        }
    }
    Ok(())
}

fn print_recognized(response: &AgentResponse) {
    if !response.formulas.is_empty() {
        let formulas: Vec<&str> = response.formulas.iter().map(|f| f.as_str()).collect();
        println!("Formula: {}", formulas.join(", "));
    }
    println!("Elements: {}", response.symbols().join(", "));
}

/// Render a result set as an aligned text table.
fn print_table(results: &ResultSet) {
    let labels = results.labels();
    let cells: Vec<Vec<String>> = results
        .rows()
        .iter()
        .map(|row| row.values().map(|v| truncate(&v.to_string())).collect())
        .collect();

    let widths: Vec<usize> = labels
        .iter()
        .enumerate()
        .map(|(i, label)| {
            cells
                .iter()
                .map(|row| row[i].chars().count())
                .chain(std::iter::once(label.chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let header: Vec<String> = labels
        .iter()
        .zip(&widths)
        .map(|(label, width)| format!("{:<width$}", label, width = width))
        .collect();
    println!("{}", header.join("  ").trim_end());
    println!("{}", "-".repeat(widths.iter().sum::<usize>() + 2 * widths.len().saturating_sub(1)));

    for row in &cells {
        let line: Vec<String> = row
            .iter()
            .zip(&widths)
            .map(|(cell, width)| format!("{:<width$}", cell, width = width))
            .collect();
        println!("{}", line.join("  ").trim_end());
    }
}

fn truncate(text: &str) -> String {
    if text.chars().count() > MAX_COLUMN_WIDTH {
        let kept: String = text.chars().take(MAX_COLUMN_WIDTH - 3).collect();
        format!("{}...", kept)
    } else {
        text.to_string()
    }
}

/// Print the selectable properties.
pub fn print_properties(response: &ListPropertiesResponse, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(response)?);
        return Ok(());
    }

    println!("{:<40} LABEL", "PROPERTY");
    println!("{}", "-".repeat(60));
    for property in &response.properties {
        println!("{:<40} {}", property.name, property.label);
    }
    println!(
        "\nTotal: {} properties (default: {})",
        response.properties.len(),
        response.default_properties.join(", ")
    );
    Ok(())
}

/// Print an API key check result.
pub fn print_credential_status(status: &CredentialStatus, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(status)?);
    } else {
        println!("{}", status.message);
    }
    Ok(())
}
