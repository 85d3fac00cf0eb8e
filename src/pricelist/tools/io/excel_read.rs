use std::path::Path;

use calamine::{DataType, Reader, Sheets, open_workbook_auto};

use crate::pricelist::tools::combine::{
    AggregateTable, PriceRow, ROW_NUMBER_COLUMN, SHEET_NAME_COLUMN, SOURCE_FILE_COLUMN, SheetTable,
};
use crate::pricelist::tools::error::{Result, ToolError};
use crate::pricelist::tools::model::CellValue;

/// Workbook handle able to read every supported spreadsheet format.
pub type SourceWorkbook = Sheets<std::io::BufReader<std::fs::File>>;

/// Opens a source spreadsheet, auto-detecting its format from the content.
pub fn open_source(path: &Path) -> Result<SourceWorkbook> {
    Ok(open_workbook_auto(path)?)
}

/// Lists the sheets contained in the workbook, in file order.
pub fn sheet_names(workbook: &SourceWorkbook) -> Vec<String> {
    workbook.sheet_names().to_vec()
}

/// Reads one sheet as a table whose first row is the header.
pub fn read_sheet(
    workbook: &mut SourceWorkbook,
    source_file: &str,
    sheet_name: &str,
) -> Result<SheetTable> {
    let range = workbook
        .worksheet_range(sheet_name)
        .ok_or_else(|| ToolError::InvalidWorkbook(format!("missing sheet '{sheet_name}'")))??;

    let mut rows = range.rows();
    let headers: Vec<String> = match rows.next() {
        Some(first_row) => first_row.iter().map(|cell| cell_to_string(Some(cell))).collect(),
        None => Vec::new(),
    };
    let data = rows
        .map(|row| row.iter().map(convert_cell).collect())
        .collect();

    Ok(SheetTable {
        source_file: source_file.to_string(),
        sheet_name: sheet_name.to_string(),
        headers,
        rows: data,
    })
}

/// Reads a previously aggregated workbook back into an [`AggregateTable`].
///
/// The first sheet is taken as the table; the three provenance columns are
/// resolved by name, every remaining column is payload in file order.
pub fn read_aggregate(path: &Path) -> Result<AggregateTable> {
    let mut workbook = open_source(path)?;

    let names = workbook.sheet_names().to_vec();
    let first_sheet = names
        .first()
        .ok_or_else(|| ToolError::InvalidWorkbook("workbook contains no sheets".into()))?;
    let range = workbook
        .worksheet_range(first_sheet)
        .ok_or_else(|| ToolError::InvalidWorkbook(format!("missing sheet '{first_sheet}'")))??;

    let mut rows_iter = range.rows();
    let header: Vec<String> = match rows_iter.next() {
        Some(first_row) => first_row.iter().map(|cell| cell_to_string(Some(cell))).collect(),
        None => Vec::new(),
    };

    let source_slot = require_column(&header, SOURCE_FILE_COLUMN)?;
    let sheet_slot = require_column(&header, SHEET_NAME_COLUMN)?;
    let number_slot = require_column(&header, ROW_NUMBER_COLUMN)?;

    let payload_slots: Vec<usize> = (0..header.len())
        .filter(|index| ![source_slot, sheet_slot, number_slot].contains(index))
        .collect();
    let payload_columns: Vec<String> = payload_slots
        .iter()
        .map(|&index| header[index].clone())
        .collect();

    let mut rows = Vec::new();
    for cells in rows_iter {
        let values = payload_slots
            .iter()
            .map(|&index| cells.get(index).map(convert_cell).unwrap_or(CellValue::Empty))
            .collect();
        rows.push(PriceRow {
            source_file: cell_to_string(cells.get(source_slot)),
            sheet_name: cell_to_string(cells.get(sheet_slot)),
            row_number: parse_row_number(cells.get(number_slot)),
            values,
        });
    }

    Ok(AggregateTable {
        payload_columns,
        rows,
    })
}

fn require_column(header: &[String], name: &str) -> Result<usize> {
    header.iter().position(|column| column == name).ok_or_else(|| {
        ToolError::InvalidWorkbook(format!(
            "missing '{name}' column; the file does not look like an aggregated price list"
        ))
    })
}

fn convert_cell(cell: &DataType) -> CellValue {
    match cell {
        DataType::String(value) if value.is_empty() => CellValue::Empty,
        DataType::String(value) => CellValue::Text(value.clone()),
        DataType::Float(value) => CellValue::Number(*value),
        DataType::Int(value) => CellValue::Number(*value as f64),
        DataType::Bool(value) => CellValue::Boolean(*value),
        DataType::Empty | DataType::Error(_) => CellValue::Empty,
        other => CellValue::Text(other.to_string()),
    }
}

fn cell_to_string(cell: Option<&DataType>) -> String {
    match cell {
        Some(DataType::String(value)) => value.clone(),
        Some(DataType::Float(value)) => value.to_string(),
        Some(DataType::Int(value)) => value.to_string(),
        Some(DataType::Bool(value)) => value.to_string(),
        Some(DataType::Empty) | None => String::new(),
        Some(other) => other.to_string(),
    }
}

fn parse_row_number(cell: Option<&DataType>) -> u32 {
    match cell {
        Some(DataType::Float(value)) => *value as u32,
        Some(DataType::Int(value)) => *value as u32,
        Some(DataType::String(value)) => value.trim().parse().unwrap_or(0),
        _ => 0,
    }
}
