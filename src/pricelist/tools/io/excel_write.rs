use std::path::Path;

use rust_xlsxwriter::{Workbook, Worksheet};

use crate::pricelist::tools::combine::{AGGREGATE_SHEET, AggregateTable};
use crate::pricelist::tools::error::Result;
use crate::pricelist::tools::model::CellValue;

/// Writes the combined table to the given path, replacing any existing file.
pub fn write_table(path: &Path, table: &AggregateTable) -> Result<()> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(AGGREGATE_SHEET)?;

    let header = table.header();
    for (col_idx, name) in header.iter().enumerate() {
        worksheet.write_string(0, col_idx as u16, name.as_str())?;
    }

    for (row_idx, row) in table.rows.iter().enumerate() {
        let excel_row = (row_idx + 1) as u32;
        worksheet.write_string(excel_row, 0, row.source_file.as_str())?;
        worksheet.write_string(excel_row, 1, row.sheet_name.as_str())?;
        worksheet.write_number(excel_row, 2, f64::from(row.row_number))?;
        for (offset, cell) in row.values.iter().enumerate() {
            write_cell(worksheet, excel_row, (offset + 3) as u16, cell)?;
        }
    }

    let col_end = (header.len() as u16).saturating_sub(1);
    let row_end = table.rows.len() as u32;
    worksheet.autofilter(0, 0, row_end, col_end)?;

    workbook.save(path)?;
    Ok(())
}

fn write_cell(worksheet: &mut Worksheet, row: u32, col: u16, cell: &CellValue) -> Result<()> {
    match cell {
        CellValue::Text(value) => {
            worksheet.write_string(row, col, value.as_str())?;
        }
        CellValue::Number(value) => {
            worksheet.write_number(row, col, *value)?;
        }
        CellValue::Boolean(value) => {
            worksheet.write_boolean(row, col, *value)?;
        }
        CellValue::Empty => {}
    }
    Ok(())
}
