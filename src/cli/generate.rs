//! Report generation commands
//!
//! `generate` runs the whole pipeline from CSV export to Markdown report;
//! `versions` runs only the detection stage and prints what it found.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde::Serialize;
use tracing::info;

use super::output::Output;
use crate::domain::{
    annotate_rows, build_change_grouping, build_setup_grouping, detect_component_versions,
    detect_global_version, ComponentVersion, FieldNames, Table,
};
use crate::report::{output_path, render_markdown, report_title, ReportData};
use crate::storage::{load_config, load_field_mappings, read_csv, AppConfig};

/// Runs the full pipeline and writes the report
pub fn generate(
    output: &Output,
    config_dir: &Path,
    input: Option<&Path>,
    output_file: Option<&Path>,
) -> Result<()> {
    let config = load_config(config_dir)?;
    let mappings = load_field_mappings(config_dir)?;
    let names = FieldNames::from_mappings(&mappings);

    let table = read_input(&config, input, output)?;

    let global_version = resolve_global_version(&config, &table);
    let component_versions = resolve_component_versions(&config, &table);

    let rows = annotate_rows(
        &table,
        &mappings,
        &names,
        &config.components.version_source_header,
        &config.components.prefixes,
        &config.links_label,
    );
    output.verbose(&format!("annotated {} rows", rows.len()));

    let data = ReportData {
        title: report_title(&config.report_title_template, &global_version),
        global_version: global_version.clone(),
        component_versions,
        changes: build_change_grouping(&rows, &names, &config.sort),
        setup: build_setup_grouping(&rows, &names, &config.sort),
    };

    if output.is_json() {
        output.data(&data);
        return Ok(());
    }

    let markdown = render_markdown(&data, &mappings, &names, &config.section_titles);
    let path = match output_file {
        Some(path) => path.to_path_buf(),
        None => output_path(&config.output_report_file, &global_version),
    };
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create output directory: {}", parent.display())
            })?;
        }
    }
    fs::write(&path, &markdown)
        .with_context(|| format!("Failed to write report: {}", path.display()))?;

    info!(file = %path.display(), "report written");
    output.success(&format!("Report written to {}", path.display()));
    Ok(())
}

#[derive(Debug, Serialize)]
struct VersionReport {
    global_version: String,
    component_versions: Vec<ComponentVersion>,
}

/// Runs only version detection and prints the result
pub fn versions(output: &Output, config_dir: &Path, input: Option<&Path>) -> Result<()> {
    let config = load_config(config_dir)?;
    let table = read_input(&config, input, output)?;

    let report = VersionReport {
        global_version: resolve_global_version(&config, &table),
        component_versions: resolve_component_versions(&config, &table),
    };

    if output.is_json() {
        output.data(&report);
        return Ok(());
    }

    println!("Global version: {}", report.global_version);
    if report.component_versions.is_empty() {
        println!("No component versions detected");
    } else {
        println!("Component versions:");
        for entry in &report.component_versions {
            println!("  {}: {}", entry.component, entry.version);
        }
    }
    Ok(())
}

fn read_input(config: &AppConfig, input: Option<&Path>, output: &Output) -> Result<Table> {
    let path: PathBuf = match input {
        Some(path) => path.to_path_buf(),
        None if config.input_csv_file.trim().is_empty() => {
            bail!("No input file: set input_csv_file in config.json or pass --input")
        }
        None => PathBuf::from(&config.input_csv_file),
    };
    output.verbose(&format!("reading CSV export from {}", path.display()));
    read_csv(&path, &config.csv_delimiter)
}

fn resolve_global_version(config: &AppConfig, table: &Table) -> String {
    if config.auto_detect_global_version {
        if let Some(version) = detect_global_version(
            table,
            &config.components.version_source_header,
            &config.components.prefixes,
        ) {
            return version;
        }
        info!(
            fallback = %config.global_release_version,
            "global version detection found nothing, using the configured value"
        );
    }
    config.global_release_version.clone()
}

fn resolve_component_versions(config: &AppConfig, table: &Table) -> Vec<ComponentVersion> {
    if config.auto_detect_component_versions {
        detect_component_versions(
            table,
            &config.components.version_source_header,
            &config.components.prefixes,
        )
    } else {
        config.component_versions.clone()
    }
}
