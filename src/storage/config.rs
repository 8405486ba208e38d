//! Configuration handling
//!
//! Configuration lives in a config directory as two JSON files:
//! `config.json` (main settings) and `fields_mapping.json` (the ordered
//! field mapping list). Loading is the one stage of the pipeline allowed
//! to fail hard; everything downstream degrades to empty results instead.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::domain::{ComponentVersion, FieldSpec, PrefixEntry, SortOptions};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    NotFound(String),

    #[error("Failed to parse configuration: {0}")]
    Parse(String),
}

/// Where component version codes come from
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComponentConfig {
    /// Base header of the version-bearing columns; repeated columns share
    /// this prefix
    pub version_source_header: String,

    /// Ordered prefix table, iteration order = precedence order
    pub prefixes: Vec<PrefixEntry>,
}

/// Section headings and placeholder texts of the report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SectionTitles {
    pub versions_table: String,
    pub main_changes: String,
    pub system_setup: String,
    pub no_changes_text: String,
}

impl Default for SectionTitles {
    fn default() -> Self {
        Self {
            versions_table: "Component versions".to_string(),
            main_changes: "Changes".to_string(),
            system_setup: "System setup".to_string(),
            no_changes_text: "No changes in this release.".to_string(),
        }
    }
}

/// Main application configuration (`config.json`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Path to the CSV export, relative to the working directory
    pub input_csv_file: String,

    /// Field delimiter of the export, a single character
    pub csv_delimiter: String,

    /// Output file template; `{global_release_version}` is replaced with
    /// the sanitized global version
    pub output_report_file: String,

    /// Report title template with the same placeholder
    pub report_title_template: String,

    /// Label in front of the links suffix of the report text
    pub links_label: String,

    pub section_titles: SectionTitles,

    /// Static global version, used when detection is off or finds nothing
    pub global_release_version: String,
    pub auto_detect_global_version: bool,

    /// Static component versions, used when detection is off
    pub component_versions: Vec<ComponentVersion>,
    pub auto_detect_component_versions: bool,

    pub components: ComponentConfig,
    pub sort: SortOptions,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            input_csv_file: String::new(),
            csv_delimiter: ",".to_string(),
            output_report_file: "output/ReleaseNotes_{global_release_version}.md".to_string(),
            report_title_template: "Release notes {global_release_version}".to_string(),
            links_label: "implemented in".to_string(),
            section_titles: SectionTitles::default(),
            global_release_version: "N/A".to_string(),
            auto_detect_global_version: false,
            component_versions: Vec::new(),
            auto_detect_component_versions: false,
            components: ComponentConfig::default(),
            sort: SortOptions::default(),
        }
    }
}

/// Loads the main configuration from `{config_dir}/config.json`
pub fn load_config(config_dir: &Path) -> Result<AppConfig> {
    let config: AppConfig = load_json(&config_dir.join("config.json"))?;
    info!(dir = %config_dir.display(), "loaded main configuration");
    Ok(config)
}

/// Loads the field mapping list from `{config_dir}/fields_mapping.json`
pub fn load_field_mappings(config_dir: &Path) -> Result<Vec<FieldSpec>> {
    let mappings: Vec<FieldSpec> = load_json(&config_dir.join("fields_mapping.json"))?;
    info!(entries = mappings.len(), "loaded field mapping");
    Ok(mappings)
}

fn load_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    if !path.exists() {
        return Err(ConfigError::NotFound(path.display().to_string()).into());
    }
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    serde_json::from_str(&content)
        .map_err(|e| ConfigError::Parse(e.to_string()))
        .with_context(|| format!("Failed to parse config file: {}", path.display()))
}
