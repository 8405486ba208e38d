//! Annotated task rows
//!
//! The raw export table is turned into a set of [`TaskRow`]s once per run:
//! mapped columns are renamed to their canonical internal names, component
//! membership is derived from the version-bearing cells, and the per-row
//! report text is prepared. Grouping stages treat the result as read-only.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;
use tracing::{error, warn};

use super::fields::{FieldNames, FieldSpec, REPORT_TEXT_FIELD};
use super::table::Table;
use super::version::{self, PrefixEntry};

/// Fallback report text for rows without a description or summary
pub const NO_DESCRIPTION_LABEL: &str = "No description.";

/// One export row with canonical field names and derived annotations
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TaskRow {
    /// Resolved fields, keyed by canonical internal name
    #[serde(flatten)]
    pub fields: BTreeMap<String, String>,

    /// Components this row belongs to, deduplicated and sorted
    pub components: Vec<String>,
}

impl TaskRow {
    /// Field value by internal name; `None` when the column was absent
    /// from the export (blank cells are present as empty strings).
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    /// Unique key of the row, or empty when the key column was absent
    pub fn key<'a>(&'a self, names: &FieldNames) -> &'a str {
        self.field(&names.key).unwrap_or("")
    }
}

/// The annotated row set plus the set of populated internal field names
#[derive(Debug, Clone, Default)]
pub struct RowSet {
    pub rows: Vec<TaskRow>,
    fields: BTreeSet<String>,
}

impl RowSet {
    /// Builds a row set, deriving the populated-field index from the rows
    pub fn from_rows(rows: Vec<TaskRow>) -> Self {
        let fields = rows
            .iter()
            .flat_map(|row| row.fields.keys().cloned())
            .collect();
        Self { rows, fields }
    }

    /// Returns true if any row carries this internal field
    pub fn has_field(&self, name: &str) -> bool {
        self.fields.contains(name)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Builds the annotated row set from the raw table.
///
/// Columns are selected and renamed per the field mapping, component
/// membership comes from running the extractor over every version-bearing
/// cell, and the report text is derived from customer description, summary
/// and links. A missing unique-key column is the one mandatory failure:
/// it is logged and yields an empty row set.
pub fn annotate_rows(
    table: &Table,
    mappings: &[FieldSpec],
    names: &FieldNames,
    source_header: &str,
    prefixes: &[PrefixEntry],
    links_label: &str,
) -> RowSet {
    if table.is_empty() {
        warn!("input table is empty, nothing to annotate");
        return RowSet::default();
    }

    let version_columns = version::version_columns(table, source_header);
    if version_columns.is_empty() {
        warn!(header = source_header, "no version columns found, rows will have no components");
    }

    // External header → internal name, in mapping order. The version base
    // column is handled separately through the extractor.
    let mut column_map: Vec<(&str, &str)> = Vec::new();
    for spec in mappings {
        let (Some(header), Some(internal)) = (spec.csv_header.as_deref(), spec.effective_internal_name())
        else {
            continue;
        };
        if header != source_header && table.has_column(header) {
            column_map.push((header, internal));
        }
    }

    // Fields the pipeline needs even when the mapping does not cover them,
    // picked up from raw columns that already use the internal name.
    let required = [
        names.key.as_str(),
        names.summary.as_str(),
        names.issue_type.as_str(),
        names.priority.as_str(),
        names.setup_instructions.as_str(),
    ];

    let join_raw_versions = mappings.iter().any(|spec| {
        spec.effective_internal_name() == Some(names.versions_display.as_str())
            && spec.display_in_changes
    });

    let mut rows = Vec::with_capacity(table.len());
    for row_idx in 0..table.len() {
        let mut fields = BTreeMap::new();
        for &(header, internal) in &column_map {
            fields.insert(internal.to_string(), table.value(row_idx, header).to_string());
        }
        for internal in required {
            if !fields.contains_key(internal) && table.has_column(internal) {
                fields.insert(internal.to_string(), table.value(row_idx, internal).to_string());
            }
        }

        let mut components: BTreeSet<String> = BTreeSet::new();
        for column in &version_columns {
            let token = table.value(row_idx, column);
            if let (Some(component), _) = version::extract(token, prefixes) {
                components.insert(component.to_string());
            }
        }

        let report_text = prepare_report_text(&fields, names, links_label);
        fields.insert(REPORT_TEXT_FIELD.to_string(), report_text);

        if join_raw_versions {
            let joined: Vec<&str> = version_columns
                .iter()
                .map(|column| table.value(row_idx, column).trim())
                .filter(|token| !token.is_empty())
                .collect();
            fields.insert(names.versions_display.clone(), joined.join(", "));
        }

        rows.push(TaskRow {
            fields,
            components: components.into_iter().collect(),
        });
    }

    let set = RowSet::from_rows(rows);
    if !set.has_field(&names.key) {
        error!(
            field = %names.key,
            "unique key column is missing from the export, discarding all rows"
        );
        return RowSet::default();
    }
    set
}

/// Report text: customer description, else summary, else a fixed label;
/// a non-blank links field is appended in parentheses.
fn prepare_report_text(
    fields: &BTreeMap<String, String>,
    names: &FieldNames,
    links_label: &str,
) -> String {
    let non_blank = |name: &str| {
        fields
            .get(name)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    };

    let mut text = non_blank(&names.customer_desc)
        .or_else(|| non_blank(&names.summary))
        .unwrap_or(NO_DESCRIPTION_LABEL)
        .to_string();

    if let Some(links) = non_blank(&names.links) {
        text.push_str(&format!(" ({links_label}: {links})"));
    }
    text
}
