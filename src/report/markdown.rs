//! Markdown rendering of the release-notes report
//!
//! Sections: title, component-version table, change list
//! (component → issue type → numbered items), setup instructions
//! (component → bulleted items). Which fields a change item shows, and in
//! what order, comes from the rendering attributes of the field mapping.

use chrono::Utc;
use tracing::{info, warn};

use crate::domain::{FieldNames, FieldSpec, TaskRow, REPORT_TEXT_FIELD};
use crate::storage::SectionTitles;

use super::ReportData;

/// Renders the whole report into a Markdown string
pub fn render_markdown(
    data: &ReportData,
    mappings: &[FieldSpec],
    names: &FieldNames,
    titles: &SectionTitles,
) -> String {
    let mut out = String::new();

    out.push_str(&format!("# {}\n\n", data.title));
    out.push_str(&format!("_Generated on {}_\n\n", Utc::now().format("%Y-%m-%d")));

    render_versions_table(&mut out, data, titles);
    render_changes(&mut out, data, mappings, names, titles);
    render_setup(&mut out, data, titles);

    info!(bytes = out.len(), "rendered Markdown report");
    out
}

fn render_versions_table(out: &mut String, data: &ReportData, titles: &SectionTitles) {
    if data.component_versions.is_empty() {
        warn!("no component versions, skipping the versions table");
        return;
    }
    out.push_str(&format!("## {}\n\n", titles.versions_table));
    out.push_str("| Component | Version |\n");
    out.push_str("| --- | --- |\n");
    for entry in &data.component_versions {
        out.push_str(&format!("| {} | {} |\n", entry.component, entry.version));
    }
    out.push('\n');
}

fn render_changes(
    out: &mut String,
    data: &ReportData,
    mappings: &[FieldSpec],
    names: &FieldNames,
    titles: &SectionTitles,
) {
    out.push_str(&format!("## {}\n\n", titles.main_changes));
    if data.changes.is_empty() {
        out.push_str(&format!("_{}_\n\n", titles.no_changes_text));
        return;
    }

    let display_fields = changes_display_fields(mappings);
    if display_fields.is_empty() {
        warn!("no fields are marked display_in_changes, items fall back to key and report text");
    }

    for component in &data.changes.components {
        out.push_str(&format!("### {}\n\n", component.component));
        for group in &component.issue_types {
            out.push_str(&format!("#### {}\n\n", group.issue_type));
            for (position, row) in group.rows.iter().enumerate() {
                let item = render_change_item(row, &display_fields, names);
                out.push_str(&format!("{}. {}\n", position + 1, item));
            }
            out.push('\n');
        }
    }
}

/// Fields shown per change item, ordered by `changes_order`; ties keep
/// mapping order.
fn changes_display_fields(mappings: &[FieldSpec]) -> Vec<&FieldSpec> {
    let mut fields: Vec<&FieldSpec> = mappings
        .iter()
        .filter(|spec| spec.display_in_changes)
        .collect();
    fields.sort_by_key(|spec| spec.changes_order);
    fields
}

fn render_change_item(row: &TaskRow, display_fields: &[&FieldSpec], names: &FieldNames) -> String {
    if display_fields.is_empty() {
        let key = row.key(names);
        let text = row.field(REPORT_TEXT_FIELD).unwrap_or("");
        if key.is_empty() {
            return text.to_string();
        }
        return format!("**{key}**: {text}");
    }

    let mut parts = Vec::new();
    for spec in display_fields {
        let Some(internal) = spec.effective_internal_name() else {
            continue;
        };
        let Some(value) = row.field(internal).map(str::trim).filter(|v| !v.is_empty()) else {
            continue;
        };
        let value = if internal == names.key {
            format!("**{value}**")
        } else {
            value.to_string()
        };
        match spec.report_label.as_deref() {
            Some(label) if !label.is_empty() => parts.push(format!("{label} {value}")),
            _ => parts.push(value),
        }
    }
    parts.join(" ")
}

fn render_setup(out: &mut String, data: &ReportData, titles: &SectionTitles) {
    if data.setup.is_empty() {
        info!("no setup instructions, skipping the setup section");
        return;
    }
    out.push_str(&format!("## {}\n\n", titles.system_setup));
    for component in &data.setup.components {
        out.push_str(&format!("### {}\n\n", component.component));
        for entry in &component.entries {
            out.push_str(&format!("- **{}: {}**\n", entry.key, entry.summary));
            for line in entry.instructions.lines() {
                out.push_str(&format!("  {}\n", line));
            }
        }
        out.push('\n');
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        ChangeGrouping, ComponentChanges, ComponentSetup, ComponentVersion, SetupEntry,
        SetupGrouping, TypeGroup,
    };
    use std::collections::BTreeMap;

    fn names() -> FieldNames {
        FieldNames::from_mappings(&[])
    }

    fn row(pairs: &[(&str, &str)]) -> TaskRow {
        TaskRow {
            fields: pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect::<BTreeMap<_, _>>(),
            components: Vec::new(),
        }
    }

    fn data(changes: ChangeGrouping, setup: SetupGrouping) -> ReportData {
        ReportData {
            title: "Release notes 1.2.3".to_string(),
            global_version: "1.2.3".to_string(),
            component_versions: vec![ComponentVersion {
                component: "Auth".to_string(),
                version: "1.0.0".to_string(),
            }],
            changes,
            setup,
        }
    }

    fn one_change() -> ChangeGrouping {
        ChangeGrouping {
            components: vec![ComponentChanges {
                component: "Auth".to_string(),
                issue_types: vec![TypeGroup {
                    issue_type: "Bug".to_string(),
                    rows: vec![row(&[
                        ("issue_key", "A-1"),
                        (REPORT_TEXT_FIELD, "Fixed the login loop"),
                    ])],
                }],
            }],
        }
    }

    #[test]
    fn renders_title_and_versions_table() {
        let md = render_markdown(
            &data(ChangeGrouping::default(), SetupGrouping::default()),
            &[],
            &names(),
            &SectionTitles::default(),
        );
        assert!(md.starts_with("# Release notes 1.2.3\n"));
        assert!(md.contains("| Auth | 1.0.0 |"));
    }

    #[test]
    fn renders_change_items_with_fallback_format() {
        let md = render_markdown(
            &data(one_change(), SetupGrouping::default()),
            &[],
            &names(),
            &SectionTitles::default(),
        );
        assert!(md.contains("### Auth"));
        assert!(md.contains("#### Bug"));
        assert!(md.contains("1. **A-1**: Fixed the login loop"));
    }

    #[test]
    fn display_fields_control_item_content() {
        let mappings = vec![
            FieldSpec {
                csv_header: Some("Issue key".to_string()),
                internal_name: Some("issue_key".to_string()),
                display_in_changes: true,
                changes_order: 1,
                ..FieldSpec::default()
            },
            FieldSpec {
                internal_name: Some(REPORT_TEXT_FIELD.to_string()),
                report_label: Some("—".to_string()),
                display_in_changes: true,
                changes_order: 2,
                ..FieldSpec::default()
            },
        ];
        let md = render_markdown(
            &data(one_change(), SetupGrouping::default()),
            &mappings,
            &names(),
            &SectionTitles::default(),
        );
        assert!(md.contains("1. **A-1** — Fixed the login loop"));
    }

    #[test]
    fn empty_changes_show_placeholder_text() {
        let md = render_markdown(
            &data(ChangeGrouping::default(), SetupGrouping::default()),
            &[],
            &names(),
            &SectionTitles::default(),
        );
        assert!(md.contains("_No changes in this release._"));
    }

    #[test]
    fn setup_section_lists_entries_and_is_skipped_when_empty() {
        let setup = SetupGrouping {
            components: vec![ComponentSetup {
                component: "Auth".to_string(),
                entries: vec![SetupEntry {
                    key: "A-1".to_string(),
                    summary: "Token rotation".to_string(),
                    instructions: "Run the migration\nRestart the service".to_string(),
                    sort_value: None,
                }],
            }],
        };
        let with_setup = render_markdown(
            &data(ChangeGrouping::default(), setup),
            &[],
            &names(),
            &SectionTitles::default(),
        );
        assert!(with_setup.contains("## System setup"));
        assert!(with_setup.contains("- **A-1: Token rotation**"));
        assert!(with_setup.contains("  Restart the service"));

        let without = render_markdown(
            &data(ChangeGrouping::default(), SetupGrouping::default()),
            &[],
            &names(),
            &SectionTitles::default(),
        );
        assert!(!without.contains("## System setup"));
    }
}
