//! In-memory tabular row set
//!
//! The pipeline consumes the issue-tracker export as a flat table of named
//! columns. Blank cells are empty strings, never a null-like sentinel, and
//! repeated columns (`Fix Version/s`, `Fix Version/s 2`, …) stay distinct.
//! Ingestion lives in the storage layer; this type is plain data.

use std::collections::HashMap;

/// A flat table with named columns
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    headers: Vec<String>,
    /// Header → column index, for cell lookups by name
    index: HashMap<String, usize>,
    rows: Vec<Vec<String>>,
}

impl Table {
    /// Builds a table from headers and rows. Short rows are padded with
    /// empty cells so every row has one cell per header.
    pub fn from_parts(headers: Vec<String>, mut rows: Vec<Vec<String>>) -> Self {
        for row in &mut rows {
            row.resize(headers.len(), String::new());
        }
        let index = headers
            .iter()
            .enumerate()
            .map(|(i, h)| (h.clone(), i))
            .collect();
        Self { headers, index, rows }
    }

    /// Column headers in export order
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns true if the table has no rows
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Cell value by row index and header; empty string when the column
    /// does not exist or the cell is blank.
    pub fn value(&self, row: usize, header: &str) -> &str {
        let Some(&col) = self.index.get(header) else {
            return "";
        };
        self.rows
            .get(row)
            .and_then(|cells| cells.get(col))
            .map(String::as_str)
            .unwrap_or("")
    }

    /// Returns true if a column with this exact header exists
    pub fn has_column(&self, header: &str) -> bool {
        self.index.contains_key(header)
    }
}
