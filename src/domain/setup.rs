//! Setup-instructions grouping
//!
//! Rows carrying non-blank setup instructions are reduced to a small
//! projection, fanned out per component, and grouped one level deep. The
//! intra-bucket ordering follows the same fallback chain as the change
//! list, applied to the projection.

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::{error, info, warn};

use super::fields::FieldNames;
use super::row::RowSet;
use super::sort::{order_components, SortOptions, SortPlan};

/// Summary label for rows without a summary
pub const UNTITLED_LABEL: &str = "Untitled";

/// Reduced projection of a row with setup instructions
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SetupEntry {
    pub key: String,
    pub summary: String,
    pub instructions: String,

    /// Value of the configured sort field, captured at projection time
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_value: Option<String>,
}

/// Setup entries of one component
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ComponentSetup {
    pub component: String,
    pub entries: Vec<SetupEntry>,
}

/// The ordered setup grouping: component → entries
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SetupGrouping {
    pub components: Vec<ComponentSetup>,
}

impl SetupGrouping {
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }
}

/// Builds the ordered setup-instructions grouping.
///
/// An input without setup instructions yields an empty grouping, a valid
/// "no setup section" outcome. The unique key is the mandatory field; a
/// missing setup-instructions column just means there is nothing to show.
pub fn build_setup_grouping(
    rows: &RowSet,
    names: &FieldNames,
    options: &SortOptions,
) -> SetupGrouping {
    if rows.is_empty() {
        warn!("no rows to group for the setup section");
        return SetupGrouping::default();
    }
    if !rows.has_field(&names.key) {
        error!(field = %names.key, "unique key column is missing, the setup section will be empty");
        return SetupGrouping::default();
    }
    if !rows.has_field(&names.setup_instructions) {
        warn!(
            field = %names.setup_instructions,
            "setup instructions column is missing, the setup section will be empty"
        );
        return SetupGrouping::default();
    }
    if !rows.has_field(&names.summary) {
        warn!(field = %names.summary, "summary column is missing, entries will be untitled");
    }

    let plan = SortPlan::new(options, names);

    let mut buckets: BTreeMap<String, Vec<SetupEntry>> = BTreeMap::new();
    let mut retained = 0usize;
    for row in &rows.rows {
        let instructions = row
            .field(&names.setup_instructions)
            .map(str::trim)
            .filter(|v| !v.is_empty());
        let Some(instructions) = instructions else {
            continue;
        };
        retained += 1;

        let entry = SetupEntry {
            key: row.key(names).to_string(),
            summary: row
                .field(&names.summary)
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .unwrap_or(UNTITLED_LABEL)
                .to_string(),
            instructions: instructions.to_string(),
            sort_value: row.field(plan.sort_field()).map(str::to_string),
        };
        for component in &row.components {
            buckets.entry(component.clone()).or_default().push(entry.clone());
        }
    }

    if retained == 0 {
        warn!("no rows carry setup instructions");
        return SetupGrouping::default();
    }
    if buckets.is_empty() {
        warn!("no setup rows are associated with any component");
        return SetupGrouping::default();
    }
    info!(rows = retained, "found rows with setup instructions");

    let mut component_names: Vec<String> = buckets.keys().cloned().collect();
    order_components(&mut component_names, options.sort_components_by);

    let mut components = Vec::with_capacity(component_names.len());
    for name in component_names {
        let mut entries = buckets.remove(&name).unwrap_or_default();
        sort_entries(&plan, &mut entries);
        components.push(ComponentSetup {
            component: name,
            entries,
        });
    }
    SetupGrouping { components }
}

/// Same fallback chain as the change list, on the reduced projection:
/// priority rank, then captured sort value, then the unique key.
fn sort_entries(plan: &SortPlan, entries: &mut [SetupEntry]) {
    if plan.uses_priority_rank() {
        entries.sort_by_key(|e| plan.rank_of(e.sort_value.as_deref()));
        return;
    }
    if entries.iter().any(|e| e.sort_value.is_some()) {
        entries.sort_by(|a, b| {
            a.sort_value
                .as_deref()
                .unwrap_or("")
                .cmp(b.sort_value.as_deref().unwrap_or(""))
        });
        return;
    }
    entries.sort_by(|a, b| a.key.cmp(&b.key));
}
