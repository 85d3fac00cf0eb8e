use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info, instrument, warn};

use crate::pricelist::tools::combine::{self, SheetTable};
use crate::pricelist::tools::error::{Result, ToolError};
use crate::pricelist::tools::io::{excel_read, excel_write};

/// File extensions recognised as spreadsheet price lists.
const SPREADSHEET_EXTENSIONS: [&str; 5] = ["xls", "xlsx", "xlsm", "xlsb", "ods"];

/// Terminal state of an aggregation run.
#[derive(Debug, Clone, PartialEq)]
pub enum AggregateOutcome {
    /// The source directory held no spreadsheet files. Nothing was written.
    NoSourceFiles,
    /// Files were found but no sheet yielded a data row. Nothing was written.
    NoRowsExtracted,
    /// The combined table was written to the output path.
    Written(AggregateSummary),
}

/// Counters describing a completed aggregation run.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregateSummary {
    pub rows: usize,
    pub columns: usize,
    pub files_found: usize,
    pub sheets_read: usize,
    pub sheets_skipped: usize,
}

/// Combines every price list found in `source_dir` into one workbook at
/// `output`.
///
/// Failures are contained at the smallest unit: an unreadable sheet or file is
/// logged and skipped, never aborting the run. Only a missing source
/// directory or a failure to write the output propagates as an error.
#[instrument(
    level = "info",
    skip_all,
    fields(source_dir = %source_dir.display(), output = %output.display())
)]
pub fn run(source_dir: &Path, output: &Path) -> Result<AggregateOutcome> {
    if !source_dir.is_dir() {
        return Err(ToolError::MissingInput(source_dir.to_path_buf()));
    }

    let files = discover_source_files(source_dir)?;
    if files.is_empty() {
        return Ok(AggregateOutcome::NoSourceFiles);
    }
    info!(file_count = files.len(), "discovered price list files");

    let mut sheets: Vec<SheetTable> = Vec::new();
    let mut sheets_skipped = 0usize;

    for path in &files {
        let file_name = base_name(path);
        let mut workbook = match excel_read::open_source(path) {
            Ok(workbook) => workbook,
            Err(error) => {
                warn!(file = %file_name, %error, "skipping unreadable file");
                continue;
            }
        };

        for sheet_name in excel_read::sheet_names(&workbook) {
            match excel_read::read_sheet(&mut workbook, &file_name, &sheet_name) {
                Ok(table) if table.rows.is_empty() => {
                    debug!(file = %file_name, sheet = %sheet_name, "skipping sheet without data rows");
                    sheets_skipped += 1;
                }
                Ok(table) => {
                    debug!(file = %file_name, sheet = %sheet_name, rows = table.rows.len(), "sheet read");
                    sheets.push(table);
                }
                Err(error) => {
                    warn!(file = %file_name, sheet = %sheet_name, %error, "skipping unreadable sheet");
                    sheets_skipped += 1;
                }
            }
        }
    }

    let sheets_read = sheets.len();
    let table = combine::build_table(sheets);
    if table.rows.is_empty() {
        return Ok(AggregateOutcome::NoRowsExtracted);
    }
    debug!(
        rows = table.rows.len(),
        columns = table.payload_columns.len(),
        "combined table built"
    );

    excel_write::write_table(output, &table)?;
    info!(rows = table.rows.len(), "aggregated table written");

    Ok(AggregateOutcome::Written(AggregateSummary {
        rows: table.rows.len(),
        columns: table.header().len(),
        files_found: files.len(),
        sheets_read,
        sheets_skipped,
    }))
}

/// Enumerates the spreadsheet files in `dir`, sorted by path so runs process
/// sources in a stable order.
pub fn discover_source_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if !path.is_file() {
            continue;
        }
        let Some(extension) = path.extension().and_then(|ext| ext.to_str()) else {
            continue;
        };
        if SPREADSHEET_EXTENSIONS
            .iter()
            .any(|known| extension.eq_ignore_ascii_case(known))
        {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

fn base_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn discovery_matches_extensions_case_insensitively() {
        let dir = tempdir().expect("temporary directory");
        for name in ["a.XLSX", "b.xls", "c.ods", "notes.txt", "d.xlsx.bak"] {
            fs::write(dir.path().join(name), b"").expect("file written");
        }
        fs::create_dir(dir.path().join("nested.xlsx")).expect("directory created");

        let files = discover_source_files(dir.path()).expect("directory listed");
        let names: Vec<String> = files.iter().map(|path| base_name(path)).collect();

        assert_eq!(names, vec!["a.XLSX", "b.xls", "c.ods"]);
    }

    #[test]
    fn missing_directory_is_an_error() {
        let dir = tempdir().expect("temporary directory");
        let missing = dir.path().join("absent");

        let result = run(&missing, &dir.path().join("out.xlsx"));
        assert!(matches!(result, Err(ToolError::MissingInput(_))));
    }
}
