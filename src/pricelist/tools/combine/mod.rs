use std::collections::HashMap;

use crate::pricelist::tools::model::CellValue;

/// Column holding the base name of the file a row came from.
pub const SOURCE_FILE_COLUMN: &str = "source_file";
/// Column holding the name of the sheet a row came from.
pub const SHEET_NAME_COLUMN: &str = "sheet_name";
/// Column holding the 1-based row number within the original sheet.
pub const ROW_NUMBER_COLUMN: &str = "row_number";

/// Provenance columns, in the fixed order they lead the aggregated header.
pub const PROVENANCE_COLUMNS: [&str; 3] =
    [SOURCE_FILE_COLUMN, SHEET_NAME_COLUMN, ROW_NUMBER_COLUMN];

/// Sheet name used for the combined table in the output workbook.
pub const AGGREGATE_SHEET: &str = "Aggregated";

/// Row number assigned to the first data row of a sheet. The header occupies
/// row 1, so data starts at 2. Sheets with multi-row headers keep this
/// convention; their numbering is a known limitation.
pub const FIRST_DATA_ROW: u32 = 2;

/// One successfully read source sheet: its provenance plus the raw table.
#[derive(Debug, Clone, PartialEq)]
pub struct SheetTable {
    pub source_file: String,
    pub sheet_name: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<CellValue>>,
}

/// A single aggregated row. Payload values are aligned to the owning table's
/// `payload_columns`; cells the source sheet did not have are `Empty`.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceRow {
    pub source_file: String,
    pub sheet_name: String,
    pub row_number: u32,
    pub values: Vec<CellValue>,
}

/// The combined table produced by aggregation and read back by search.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregateTable {
    /// Non-provenance columns, in the order they were first seen.
    pub payload_columns: Vec<String>,
    pub rows: Vec<PriceRow>,
}

impl AggregateTable {
    /// Full output header: provenance columns first, payload columns after.
    pub fn header(&self) -> Vec<String> {
        let mut header = Vec::with_capacity(PROVENANCE_COLUMNS.len() + self.payload_columns.len());
        header.extend(PROVENANCE_COLUMNS.iter().map(|name| name.to_string()));
        header.extend(self.payload_columns.iter().cloned());
        header
    }
}

/// Ordered column registry. Column names are assigned an index the first time
/// they are seen; later sheets reuse the existing slot.
#[derive(Debug, Default)]
struct ColumnIndex {
    names: Vec<String>,
    by_name: HashMap<String, usize>,
}

impl ColumnIndex {
    fn intern(&mut self, name: &str) -> usize {
        if let Some(&index) = self.by_name.get(name) {
            return index;
        }
        let index = self.names.len();
        self.names.push(name.to_string());
        self.by_name.insert(name.to_string(), index);
        index
    }

    fn len(&self) -> usize {
        self.names.len()
    }

    fn into_names(self) -> Vec<String> {
        self.names
    }
}

/// Combines all collected sheets into one table.
///
/// Payload columns are the union of all sheet headers in first-seen order.
/// A header cell that is blank, or that shadows one of the provenance column
/// names, is dropped: the provenance value wins over a same-named source
/// column. Rows read before a column existed are padded with `Empty` once the
/// final width is known.
pub fn build_table(sheets: Vec<SheetTable>) -> AggregateTable {
    let mut columns = ColumnIndex::default();
    let mut rows: Vec<PriceRow> = Vec::new();

    for sheet in sheets {
        let slots: Vec<Option<usize>> = sheet
            .headers
            .iter()
            .map(|header| {
                let name = header.trim();
                if name.is_empty() || PROVENANCE_COLUMNS.contains(&name) {
                    None
                } else {
                    Some(columns.intern(name))
                }
            })
            .collect();

        for (offset, cells) in sheet.rows.into_iter().enumerate() {
            let mut values = vec![CellValue::Empty; columns.len()];
            for (slot, cell) in slots.iter().zip(cells) {
                if let Some(index) = slot {
                    values[*index] = cell;
                }
            }
            rows.push(PriceRow {
                source_file: sheet.source_file.clone(),
                sheet_name: sheet.sheet_name.clone(),
                row_number: offset as u32 + FIRST_DATA_ROW,
                values,
            });
        }
    }

    let width = columns.len();
    for row in &mut rows {
        row.values.resize(width, CellValue::Empty);
    }

    AggregateTable {
        payload_columns: columns.into_names(),
        rows,
    }
}
