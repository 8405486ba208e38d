//! Change-list grouping
//!
//! Rows fan out once per associated component, land in
//! component → issue-type buckets, and every level is ordered from
//! configuration so the result is reproducible run to run.

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::{error, info, warn};

use super::fields::FieldNames;
use super::row::{RowSet, TaskRow};
use super::sort::{order_components, SortOptions, SortPlan};

/// Bucket label for rows without an issue type
pub const UNKNOWN_ISSUE_TYPE: &str = "Unknown type";

/// Rows of one issue type within a component
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TypeGroup {
    pub issue_type: String,
    pub rows: Vec<TaskRow>,
}

/// All change entries of one component, grouped by issue type
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ComponentChanges {
    pub component: String,
    pub issue_types: Vec<TypeGroup>,
}

/// The ordered change list: component → issue type → rows
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ChangeGrouping {
    pub components: Vec<ComponentChanges>,
}

impl ChangeGrouping {
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }
}

/// Builds the ordered change-list grouping.
///
/// Rows without component membership are dropped silently; a row with N
/// components contributes N independent entries. A missing issue-type
/// column is the mandatory failure here: logged, empty grouping. An input
/// with no memberships at all is a valid "no changes" outcome.
pub fn build_change_grouping(
    rows: &RowSet,
    names: &FieldNames,
    options: &SortOptions,
) -> ChangeGrouping {
    if rows.is_empty() {
        warn!("no rows to group for the change list");
        return ChangeGrouping::default();
    }
    if !rows.has_field(&names.issue_type) {
        error!(
            field = %names.issue_type,
            "issue type column is missing, the change list will be empty"
        );
        return ChangeGrouping::default();
    }
    if !rows.has_field(&names.priority) {
        warn!(
            field = %names.priority,
            "priority column is missing, priority ordering will not apply"
        );
    }

    // Fan-out, then bucket by component and issue type. Vec order inside a
    // bucket preserves input order for the stable sort below.
    let mut buckets: BTreeMap<String, BTreeMap<String, Vec<TaskRow>>> = BTreeMap::new();
    for row in &rows.rows {
        for component in &row.components {
            let issue_type = row
                .field(&names.issue_type)
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .unwrap_or(UNKNOWN_ISSUE_TYPE);
            buckets
                .entry(component.clone())
                .or_default()
                .entry(issue_type.to_string())
                .or_default()
                .push(row.clone());
        }
    }
    if buckets.is_empty() {
        warn!("no rows are associated with any component, the change list is empty");
        return ChangeGrouping::default();
    }

    let plan = SortPlan::new(options, names);
    let mut component_names: Vec<String> = buckets.keys().cloned().collect();
    order_components(&mut component_names, options.sort_components_by);

    let mut components = Vec::with_capacity(component_names.len());
    for name in component_names {
        let mut type_buckets = buckets.remove(&name).unwrap_or_default();
        let mut issue_types = Vec::with_capacity(type_buckets.len());

        // Explicitly ordered types first, only when present in the data
        for wanted in &options.issue_type_order {
            if let Some(mut bucket_rows) = type_buckets.remove(wanted) {
                plan.sort_rows(&mut bucket_rows, names);
                issue_types.push(TypeGroup {
                    issue_type: wanted.clone(),
                    rows: bucket_rows,
                });
            }
        }
        // Remaining types alphabetically (BTreeMap iteration order)
        for (issue_type, mut bucket_rows) in type_buckets {
            plan.sort_rows(&mut bucket_rows, names);
            issue_types.push(TypeGroup { issue_type, rows: bucket_rows });
        }

        components.push(ComponentChanges {
            component: name,
            issue_types,
        });
    }

    info!(components = components.len(), "built change-list grouping");
    ChangeGrouping { components }
}
