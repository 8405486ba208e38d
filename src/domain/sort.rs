//! Sort configuration and the intra-bucket ordering plan
//!
//! Rows inside a bucket are ordered by a four-tier fallback: a configured
//! priority rank table, then the configured sort field, then the unique
//! key, then original order. The plan is built once per run; each tier is
//! applied with a stable sort so ties keep their relative input order.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::fields::FieldNames;
use super::row::TaskRow;

/// Direction for ordering component buckets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComponentOrder {
    #[default]
    NameAsc,
    NameDesc,
}

/// Sort configuration, as read from the main config
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SortOptions {
    /// Component bucket order
    pub sort_components_by: ComponentOrder,

    /// Issue types listed here come first, in this order; the rest follow
    /// alphabetically
    pub issue_type_order: Vec<String>,

    /// Internal field name rows are sorted by within a bucket; empty means
    /// the unique key
    pub sort_tasks_by: String,

    /// Priority values from highest to lowest; unlisted priorities sort
    /// after all listed ones
    pub priority_order: Vec<String>,
}

/// Resolved ordering plan for one pipeline run
#[derive(Debug, Clone)]
pub struct SortPlan {
    sort_field: String,
    key_field: String,
    priority_field: String,
    /// Lowercased priority → rank
    priority_rank: HashMap<String, usize>,
}

impl SortPlan {
    pub fn new(options: &SortOptions, names: &FieldNames) -> Self {
        let sort_field = if options.sort_tasks_by.trim().is_empty() {
            names.key.clone()
        } else {
            options.sort_tasks_by.clone()
        };
        let priority_rank = options
            .priority_order
            .iter()
            .enumerate()
            .map(|(rank, priority)| (priority.to_lowercase(), rank))
            .collect();
        Self {
            sort_field,
            key_field: names.key.clone(),
            priority_field: names.priority.clone(),
            priority_rank,
        }
    }

    /// The effective intra-bucket sort field
    pub fn sort_field(&self) -> &str {
        &self.sort_field
    }

    /// True when the first tier applies: sorting by the priority field with
    /// a configured rank list
    pub fn uses_priority_rank(&self) -> bool {
        self.sort_field == self.priority_field && !self.priority_rank.is_empty()
    }

    /// Rank of a priority value, case-insensitive; missing and unlisted
    /// priorities rank after all listed ones
    pub fn rank_of(&self, priority: Option<&str>) -> usize {
        priority
            .and_then(|p| self.priority_rank.get(&p.to_lowercase()))
            .copied()
            .unwrap_or(self.priority_rank.len())
    }

    /// Orders one bucket of rows through the fallback tiers
    pub fn sort_rows(&self, rows: &mut [TaskRow], names: &FieldNames) {
        if self.uses_priority_rank() {
            rows.sort_by_key(|row| self.rank_of(row.field(&self.priority_field)));
            return;
        }
        if rows.iter().any(|row| row.field(&self.sort_field).is_some()) {
            rows.sort_by(|a, b| {
                a.field(&self.sort_field)
                    .unwrap_or("")
                    .cmp(b.field(&self.sort_field).unwrap_or(""))
            });
            return;
        }
        if rows.iter().any(|row| row.field(&self.key_field).is_some()) {
            warn!(
                field = %self.sort_field,
                "sort field is absent from the rows, sorting by unique key"
            );
            rows.sort_by(|a, b| a.key(names).cmp(b.key(names)));
            return;
        }
        // No usable field at all: keep original order.
    }
}

/// Orders component names ascending or descending
pub fn order_components(components: &mut Vec<String>, order: ComponentOrder) {
    components.sort_unstable();
    if order == ComponentOrder::NameDesc {
        components.reverse();
    }
}
