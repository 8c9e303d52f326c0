//! Column-oriented sheets
//!
//! A sheet is what the workbook adapter hands the engine: named columns of
//! cells, column order preserved. Columns may have different lengths.

use serde::{Deserialize, Serialize};

use super::cell::CellValue;

/// One named column of cells
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Column {
    pub header: String,
    #[serde(default)]
    pub cells: Vec<CellValue>,
}

impl Column {
    pub fn new(header: impl Into<String>, cells: Vec<CellValue>) -> Self {
        Self {
            header: header.into(),
            cells,
        }
    }

    /// Column of numeric cells
    pub fn numbers(header: impl Into<String>, values: impl IntoIterator<Item = f64>) -> Self {
        Self::new(header, values.into_iter().map(CellValue::Number).collect())
    }

    /// Column of text cells
    pub fn texts<S: Into<String>>(header: impl Into<String>, values: impl IntoIterator<Item = S>) -> Self {
        Self::new(
            header,
            values.into_iter().map(|s| CellValue::Text(s.into())).collect(),
        )
    }

    /// Cells coerced to amounts
    pub fn amounts(&self) -> Vec<f64> {
        self.cells.iter().map(CellValue::as_amount).collect()
    }
}

/// A named, column-oriented table
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Sheet {
    pub name: String,
    #[serde(default)]
    pub columns: Vec<Column>,
}

impl Sheet {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            columns: Vec::new(),
        }
    }

    /// Builder-style column append
    pub fn with_column(mut self, column: Column) -> Self {
        self.columns.push(column);
        self
    }

    /// Append a column, replacing any existing column with the same header
    pub fn set_column(&mut self, column: Column) {
        if let Some(existing) = self.columns.iter_mut().find(|c| c.header == column.header) {
            *existing = column;
        } else {
            self.columns.push(column);
        }
    }

    /// Look up a column by header
    pub fn column(&self, header: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.header == header)
    }

    pub fn has_column(&self, header: &str) -> bool {
        self.column(header).is_some()
    }

    /// Cell at a row of a column, or `Empty` past the end
    pub fn cell(&self, header: &str, row: usize) -> CellValue {
        self.column(header)
            .and_then(|c| c.cells.get(row))
            .cloned()
            .unwrap_or_default()
    }

    /// Length of the longest column
    pub fn row_count(&self) -> usize {
        self.columns.iter().map(|c| c.cells.len()).max().unwrap_or(0)
    }

    /// True when the sheet has no columns or no non-blank cell
    pub fn is_blank(&self) -> bool {
        self.columns
            .iter()
            .all(|c| c.cells.iter().all(CellValue::is_blank))
    }

    /// Pad every column with empty cells to the longest column's length
    pub fn equalize(&mut self) {
        let rows = self.row_count();
        for column in &mut self.columns {
            column.cells.resize(rows, CellValue::Empty);
        }
    }

    /// Non-blank text values of a column (used for type lists)
    pub fn non_blank_texts(&self, header: &str) -> Vec<String> {
        self.column(header)
            .map(|c| {
                c.cells
                    .iter()
                    .filter(|cell| !cell.is_blank())
                    .map(|cell| cell.as_text().trim().to_string())
                    .collect()
            })
            .unwrap_or_default()
    }
}
