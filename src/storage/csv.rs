//! CSV ingestion
//!
//! Reads the issue-tracker export into a [`Table`]. Blank cells come back
//! as empty strings, and repeated headers (Jira exports one `Fix Version/s`
//! column per value) are disambiguated with a numeric suffix so they stay
//! distinct while keeping the shared prefix.

use std::collections::HashMap;
use std::path::Path;

use anyhow::{bail, Context, Result};
use tracing::info;

use crate::domain::Table;

/// Reads a CSV export from disk.
///
/// `delimiter` must be a single ASCII character. Short records are padded
/// to the header width by [`Table::from_parts`].
pub fn read_csv(path: &Path, delimiter: &str) -> Result<Table> {
    let delimiter = match delimiter.as_bytes() {
        [b] if delimiter.len() == 1 => *b,
        _ => bail!("CSV delimiter must be a single character, got {delimiter:?}"),
    };

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("Failed to open CSV file: {}", path.display()))?;

    let headers = disambiguate_headers(
        reader
            .headers()
            .with_context(|| format!("Failed to read CSV headers: {}", path.display()))?
            .iter()
            .map(str::to_string)
            .collect(),
    );

    let mut rows = Vec::new();
    for record in reader.records() {
        let record =
            record.with_context(|| format!("Failed to parse CSV file: {}", path.display()))?;
        rows.push(record.iter().map(str::to_string).collect());
    }

    info!(
        file = %path.display(),
        rows = rows.len(),
        columns = headers.len(),
        "loaded CSV export"
    );
    Ok(Table::from_parts(headers, rows))
}

/// Appends ` 2`, ` 3`, … to repeated headers, keeping the first occurrence
/// unchanged. The suffix preserves the original header as a prefix, which
/// the version-column scan relies on.
fn disambiguate_headers(headers: Vec<String>) -> Vec<String> {
    let mut seen: HashMap<String, usize> = HashMap::new();
    let mut result = Vec::with_capacity(headers.len());
    for header in headers {
        let count = seen.entry(header.clone()).or_insert(0);
        *count += 1;
        if *count == 1 {
            result.push(header);
        } else {
            result.push(format!("{} {}", header, count));
        }
    }
    result
}
