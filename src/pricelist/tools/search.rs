use std::collections::BTreeSet;
use std::path::Path;

use serde_json::{Value, json};
use tracing::{info, instrument};

use crate::pricelist::tools::combine::AggregateTable;
use crate::pricelist::tools::error::{Result, ToolError};
use crate::pricelist::tools::io::excel_read;
use crate::pricelist::tools::model::CellValue;

/// Line framing each rendered match.
const SEPARATOR: &str = "--------------------------------------------------";

/// Result set of one search run.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchResults {
    pub query: String,
    /// Payload columns that matched in at least one result row, sorted
    /// alphabetically. These are the columns worth displaying for the whole
    /// result set.
    pub display_columns: Vec<String>,
    pub matches: Vec<RowMatch>,
}

/// One matching row: its provenance plus every populated payload cell.
#[derive(Debug, Clone, PartialEq)]
pub struct RowMatch {
    pub source_file: String,
    pub sheet_name: String,
    pub row_number: u32,
    pub fields: Vec<(String, CellValue)>,
}

/// Loads the aggregated price list and returns the rows matching `query`.
#[instrument(level = "info", skip_all, fields(input = %input.display()))]
pub fn run(query: &str, input: &Path) -> Result<SearchResults> {
    if !input.is_file() {
        return Err(ToolError::MissingAggregate(input.to_path_buf()));
    }

    let table = excel_read::read_aggregate(input)?;
    info!(rows = table.rows.len(), "loaded aggregated table");
    Ok(find_matches(&table, query))
}

/// Scans the whole table for rows where any cell contains `query` as a
/// case-insensitive substring. Empty cells never match; provenance cells are
/// scanned like any other but are never recorded as matched columns.
pub fn find_matches(table: &AggregateTable, query: &str) -> SearchResults {
    let needle = query.to_lowercase();
    let mut display: BTreeSet<String> = BTreeSet::new();
    let mut matches = Vec::new();

    for row in &table.rows {
        let mut hit = contains(&row.source_file, &needle)
            || contains(&row.sheet_name, &needle)
            || contains(&row.row_number.to_string(), &needle);

        let mut matched_columns: Vec<String> = Vec::new();
        for (name, value) in table.payload_columns.iter().zip(&row.values) {
            if let Some(text) = value.to_text() {
                if contains(&text, &needle) {
                    hit = true;
                    matched_columns.push(name.clone());
                }
            }
        }

        if hit {
            display.extend(matched_columns);
            matches.push(RowMatch {
                source_file: row.source_file.clone(),
                sheet_name: row.sheet_name.clone(),
                row_number: row.row_number,
                fields: table
                    .payload_columns
                    .iter()
                    .cloned()
                    .zip(row.values.iter().cloned())
                    .filter(|(_, value)| !value.is_empty())
                    .collect(),
            });
        }
    }

    SearchResults {
        query: query.to_string(),
        display_columns: display.into_iter().collect(),
        matches,
    }
}

/// Renders the result set for the console. With `show_all` set, every
/// populated payload column of a row is printed instead of only the columns
/// that matched somewhere in the result set.
pub fn render_results(results: &SearchResults, show_all: bool) -> String {
    if results.matches.is_empty() {
        return "No results found.\n".to_string();
    }

    let noun = if results.matches.len() == 1 { "row" } else { "rows" };
    let mut out = format!("Found {} matching {noun}:\n", results.matches.len());

    for row in &results.matches {
        out.push_str(SEPARATOR);
        out.push('\n');
        out.push_str(&format!(
            "Match in '{}', sheet '{}', row {}\n",
            row.source_file, row.sheet_name, row.row_number
        ));
        if show_all {
            for (name, value) in &row.fields {
                push_field(&mut out, name, value);
            }
        } else {
            for name in &results.display_columns {
                if let Some((_, value)) = row.fields.iter().find(|(field, _)| field == name) {
                    push_field(&mut out, name, value);
                }
            }
        }
        out.push_str(SEPARATOR);
        out.push('\n');
    }

    out
}

/// Serialises the result set as a pretty-printed JSON document.
pub fn results_to_json(results: &SearchResults) -> Result<String> {
    let rows: Vec<Value> = results
        .matches
        .iter()
        .map(|row| {
            let fields: serde_json::Map<String, Value> = row
                .fields
                .iter()
                .map(|(name, value)| (name.clone(), value.to_json()))
                .collect();
            json!({
                "source_file": row.source_file,
                "sheet_name": row.sheet_name,
                "row_number": row.row_number,
                "fields": fields,
            })
        })
        .collect();

    let document = json!({
        "query": results.query,
        "match_count": results.matches.len(),
        "matched_columns": results.display_columns,
        "rows": rows,
    });
    Ok(serde_json::to_string_pretty(&document)?)
}

fn contains(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(needle)
}

fn push_field(out: &mut String, name: &str, value: &CellValue) {
    if let Some(text) = value.to_text() {
        out.push_str(&format!("  {name}: {text}\n"));
    }
}
