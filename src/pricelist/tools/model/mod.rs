use serde::{Deserialize, Serialize};

/// Represents a single spreadsheet cell as it flows through aggregation and
/// search. Source files mix types freely, so the value keeps the loose shape
/// a spreadsheet cell actually has instead of forcing a record schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum CellValue {
    /// Plain text cell.
    Text(String),
    /// Numeric cell. Spreadsheets store every number as a float.
    Number(f64),
    /// Boolean cell.
    Boolean(bool),
    /// Blank cell, or one whose value could not be read.
    Empty,
}

impl CellValue {
    /// Returns `true` for cells that carry no value.
    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }

    /// Converts the cell into the text form used for matching and display.
    /// Empty cells have no text representation and therefore never match.
    pub fn to_text(&self) -> Option<String> {
        match self {
            CellValue::Text(value) => Some(value.clone()),
            CellValue::Number(value) => Some(value.to_string()),
            CellValue::Boolean(value) => Some(value.to_string()),
            CellValue::Empty => None,
        }
    }

    /// Converts the cell into the JSON representation used by the `--json`
    /// output mode.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            CellValue::Text(value) => serde_json::Value::String(value.clone()),
            CellValue::Number(value) => serde_json::Number::from_f64(*value)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            CellValue::Boolean(value) => serde_json::Value::Bool(*value),
            CellValue::Empty => serde_json::Value::Null,
        }
    }
}
