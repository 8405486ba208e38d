//! Report assembly
//!
//! Takes the pipeline outputs and renders the release-notes document.
//! Styling is out of scope; the renderer emits plain Markdown.

mod markdown;

use std::path::PathBuf;

use serde::Serialize;
use tracing::warn;

use crate::domain::{ChangeGrouping, ComponentVersion, SetupGrouping};

pub use markdown::render_markdown;

/// Fallback file-name fragment when the global version sanitizes to nothing
const UNKNOWN_VERSION_FILENAME: &str = "UNKNOWN_VERSION";

/// Placeholder recognized in the title and output-file templates
pub const GLOBAL_VERSION_PLACEHOLDER: &str = "{global_release_version}";

/// Everything the renderer needs for one report
#[derive(Debug, Clone, Serialize)]
pub struct ReportData {
    pub title: String,
    pub global_version: String,
    pub component_versions: Vec<ComponentVersion>,
    pub changes: ChangeGrouping,
    pub setup: SetupGrouping,
}

/// Expands the report title template
pub fn report_title(template: &str, global_version: &str) -> String {
    template.replace(GLOBAL_VERSION_PLACEHOLDER, global_version)
}

/// Expands the output-file template with a filesystem-safe version string
pub fn output_path(template: &str, global_version: &str) -> PathBuf {
    PathBuf::from(template.replace(
        GLOBAL_VERSION_PLACEHOLDER,
        &sanitize_for_filename(global_version),
    ))
}

/// Makes a version string safe for file names: path and wildcard
/// characters become dashes, quoting and angle characters are dropped.
fn sanitize_for_filename(version: &str) -> String {
    let sanitized: String = version
        .chars()
        .filter_map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' => Some('-'),
            '"' | '<' | '>' | '|' => None,
            c => Some(c),
        })
        .collect();
    let sanitized = sanitized.trim().to_string();
    if sanitized.is_empty() {
        warn!(version, "global version sanitizes to nothing, using a placeholder file name");
        return UNKNOWN_VERSION_FILENAME.to_string();
    }
    sanitized
}
