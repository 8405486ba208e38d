//! Field name resolution
//!
//! Jira exports label their columns however the instance is configured, so
//! the pipeline never works with raw column labels. The field mapping
//! configuration ties each external label to a canonical internal name, and
//! the whole mapping is resolved once into a [`FieldNames`] table at startup.
//! Every later stage queries the table by typed field.

use serde::{Deserialize, Serialize};
use tracing::debug;

fn default_order() -> u32 {
    99
}

/// A single entry of the field mapping configuration.
///
/// `csv_header` is the column label as exported; `internal_name` is the
/// identifier the pipeline uses. The remaining attributes only drive which
/// fields the report renderer shows and in what order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldSpec {
    pub csv_header: Option<String>,
    pub internal_name: Option<String>,

    /// Label printed in front of the value in the report
    pub report_label: Option<String>,

    /// Show this field in the change-list section
    pub display_in_changes: bool,
    pub changes_order: u32,

    /// Show this field in the setup-instructions section
    pub display_in_setup: bool,
    pub setup_order: u32,
}

impl Default for FieldSpec {
    fn default() -> Self {
        Self {
            csv_header: None,
            internal_name: None,
            report_label: None,
            display_in_changes: false,
            changes_order: default_order(),
            display_in_setup: false,
            setup_order: default_order(),
        }
    }
}

impl FieldSpec {
    /// Returns the internal name, falling back to the raw header
    pub fn effective_internal_name(&self) -> Option<&str> {
        self.internal_name.as_deref().or(self.csv_header.as_deref())
    }
}

/// Resolves one canonical internal name from the mapping list.
///
/// Entries whose internal name equals `default_internal` (or one of
/// `alt_internals`) win over entries whose external label matches
/// `standard_label` case-insensitively. When nothing matches the caller's
/// default is returned, so resolution never yields an empty name.
pub fn resolve(
    mappings: &[FieldSpec],
    standard_label: &str,
    default_internal: &str,
    alt_internals: &[&str],
) -> String {
    for spec in mappings {
        if let Some(internal) = spec.internal_name.as_deref() {
            if internal == default_internal || alt_internals.contains(&internal) {
                return internal.to_string();
            }
        }
    }

    let wanted = standard_label.to_lowercase();
    for spec in mappings {
        if let Some(header) = spec.csv_header.as_deref() {
            if header.to_lowercase() == wanted {
                return spec
                    .internal_name
                    .clone()
                    .unwrap_or_else(|| header.to_string());
            }
        }
    }

    debug!(
        label = standard_label,
        fallback = default_internal,
        "no mapping entry for standard label, using default internal name"
    );
    default_internal.to_string()
}

/// Canonical internal names for every field the pipeline reads.
///
/// Built once from the mapping list; stages query typed fields instead of
/// re-scanning the mapping with string lookups.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldNames {
    pub key: String,
    pub summary: String,
    pub customer_desc: String,
    pub links: String,
    pub issue_type: String,
    pub priority: String,
    pub setup_instructions: String,
    pub versions_display: String,
}

/// Internal name of the derived per-row report text
pub const REPORT_TEXT_FIELD: &str = "task_report_text";

impl FieldNames {
    /// Resolves the canonical field table from the mapping list
    pub fn from_mappings(mappings: &[FieldSpec]) -> Self {
        Self {
            key: resolve(mappings, "issue key", "issue_key", &[]),
            summary: resolve(mappings, "summary", "summary_text", &["summary"]),
            customer_desc: resolve(
                mappings,
                "custom field (description for the customer)",
                "description_for_customer",
                &[],
            ),
            links: resolve(mappings, "links", "links_text", &[]),
            issue_type: resolve(mappings, "issue type", "type", &["issue_type"]),
            priority: resolve(mappings, "priority", "priority_val", &["priority"]),
            setup_instructions: resolve(
                mappings,
                "custom field (setup instructions)",
                "setup_instructions",
                &[],
            ),
            versions_display: resolve(mappings, "fix version/s", "fix_versions_display_all", &[]),
        }
    }
}
