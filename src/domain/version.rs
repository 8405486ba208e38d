//! Version code parsing and release version detection
//!
//! Fix-version cells carry composite tokens such as `AUTH-1.2.3`, where an
//! ordered prefix table maps `AUTH-` to a component name, or release-wide
//! tokens such as `1.4.0 (GLOBAL)`. This module extracts component/version
//! pairs from single tokens, aggregates the highest version seen per
//! component, and detects the global release version.

use std::collections::{BTreeMap, BTreeSet};

use semver::Version;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::table::Table;

/// Marker identifying a release-wide version token
pub const GLOBAL_VERSION_MARKER: &str = "(GLOBAL)";

/// One entry of the ordered prefix table. Earlier entries win when
/// prefixes overlap.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrefixEntry {
    pub prefix: String,
    pub component: String,
}

/// A component together with the highest version observed for it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentVersion {
    pub component: String,
    pub version: String,
}

/// Splits a composite version token into component name and version.
///
/// The first prefix matching case-insensitively at the start of the trimmed
/// token wins; the remainder (trimmed) becomes the version, or `None` when
/// nothing follows the prefix. Blank tokens and tokens carrying the global
/// marker are ignored silently; anything else without a matching prefix is
/// reported as unrecognized. Pure function: no state, identical inputs give
/// identical outputs.
pub fn extract<'a>(token: &str, prefixes: &'a [PrefixEntry]) -> (Option<&'a str>, Option<String>) {
    let trimmed = token.trim();
    if trimmed.is_empty() {
        return (None, None);
    }

    for entry in prefixes {
        let Some(head) = trimmed.get(..entry.prefix.len()) else {
            continue;
        };
        if head.eq_ignore_ascii_case(&entry.prefix) {
            let rest = trimmed[entry.prefix.len()..].trim();
            if rest.is_empty() {
                debug!(token = trimmed, prefix = %entry.prefix, "prefix matched but no version part");
                return (Some(&entry.component), None);
            }
            return (Some(&entry.component), Some(rest.to_string()));
        }
    }

    if !trimmed.to_uppercase().contains(GLOBAL_VERSION_MARKER) {
        debug!(token = trimmed, "unrecognized version token");
    }
    (None, None)
}

/// Strips free-text annotations from a captured version: everything from
/// the first space or opening parenthesis on is dropped.
fn clean_version(raw: &str) -> &str {
    raw.split([' ', '(']).next().unwrap_or("").trim()
}

/// Parses a dotted version, padding one- and two-part numeric versions to
/// the three parts semver requires (`1.2` → `1.2.0`).
fn parse_version(raw: &str) -> Option<Version> {
    if let Ok(v) = Version::parse(raw) {
        return Some(v);
    }
    let parts: Vec<&str> = raw.split('.').collect();
    let numeric = parts
        .iter()
        .all(|p| !p.is_empty() && p.bytes().all(|b| b.is_ascii_digit()));
    if numeric && (parts.len() == 1 || parts.len() == 2) {
        let padded = if parts.len() == 1 {
            format!("{raw}.0.0")
        } else {
            format!("{raw}.0")
        };
        return Version::parse(&padded).ok();
    }
    None
}

/// Sorted list of columns whose header starts with the configured base
/// header, covering repeated columns like `Fix Version/s`, `Fix Version/s 2`.
pub(crate) fn version_columns<'a>(table: &'a Table, source_header: &str) -> Vec<&'a str> {
    let mut columns: Vec<&str> = table
        .headers()
        .iter()
        .filter(|h| h.starts_with(source_header))
        .map(String::as_str)
        .collect();
    columns.sort_unstable();
    columns
}

/// Scans all version-bearing columns and keeps the highest parsed version
/// per component. Unparsable tokens are skipped with a warning; an absent
/// source column yields an empty list, never an error.
pub fn detect_component_versions(
    table: &Table,
    source_header: &str,
    prefixes: &[PrefixEntry],
) -> Vec<ComponentVersion> {
    if source_header.trim().is_empty() {
        warn!("version source header is not configured, skipping component version detection");
        return Vec::new();
    }
    let columns = version_columns(table, source_header);
    if columns.is_empty() {
        warn!(
            header = source_header,
            "no version columns found, skipping component version detection"
        );
        return Vec::new();
    }

    let mut highest: BTreeMap<String, Version> = BTreeMap::new();
    for row in 0..table.len() {
        for column in &columns {
            let token = table.value(row, column);
            if token.is_empty() {
                continue;
            }
            let (component, version) = extract(token, prefixes);
            let (Some(component), Some(version)) = (component, version) else {
                continue;
            };
            let cleaned = clean_version(&version);
            match parse_version(cleaned) {
                Some(parsed) => {
                    highest
                        .entry(component.to_string())
                        .and_modify(|current| {
                            if parsed > *current {
                                *current = parsed.clone();
                            }
                        })
                        .or_insert(parsed);
                }
                None => {
                    warn!(
                        component,
                        version = %version,
                        cleaned,
                        "could not parse version token, skipping"
                    );
                }
            }
        }
    }

    let detected: Vec<ComponentVersion> = highest
        .into_iter()
        .map(|(component, version)| ComponentVersion {
            component,
            version: version.to_string(),
        })
        .collect();
    if detected.is_empty() {
        warn!("no component versions could be detected");
    } else {
        info!(count = detected.len(), "detected component versions");
    }
    detected
}

/// Detects the global release version from tokens carrying the global
/// marker.
///
/// A recognized component prefix is stripped first, then the candidate is
/// the text preceding the marker with surrounding parentheses stripped,
/// accepted only if it contains a digit. With several distinct candidates
/// the lexicographically smallest wins and an ambiguity warning is emitted;
/// with none the caller falls back to its configured default.
pub fn detect_global_version(
    table: &Table,
    source_header: &str,
    prefixes: &[PrefixEntry],
) -> Option<String> {
    if source_header.trim().is_empty() {
        warn!("version source header is not configured, skipping global version detection");
        return None;
    }
    let columns = version_columns(table, source_header);
    if columns.is_empty() {
        warn!(
            header = source_header,
            "no version columns found, skipping global version detection"
        );
        return None;
    }

    let mut candidates: BTreeSet<String> = BTreeSet::new();
    for row in 0..table.len() {
        for column in &columns {
            let token = table.value(row, column).trim();
            let rest = match extract(token, prefixes) {
                (Some(_), Some(version)) => version,
                _ => token.to_string(),
            };
            let upper = rest.to_uppercase();
            let Some(marker_at) = upper.find(GLOBAL_VERSION_MARKER) else {
                continue;
            };
            let candidate = upper[..marker_at].replace(['(', ')'], "");
            let candidate = candidate.trim();
            if !candidate.is_empty() && candidate.bytes().any(|b| b.is_ascii_digit()) {
                candidates.insert(candidate.to_string());
            } else {
                debug!(token, "global marker found but no version before it");
            }
        }
    }

    if candidates.is_empty() {
        warn!(marker = GLOBAL_VERSION_MARKER, "no global release version found");
        return None;
    }
    if candidates.len() > 1 {
        let chosen = candidates.iter().next().cloned();
        warn!(
            candidates = ?candidates,
            chosen = chosen.as_deref(),
            "multiple global release versions found, using the smallest"
        );
        return chosen;
    }
    let version = candidates.into_iter().next();
    info!(version = version.as_deref(), "detected global release version");
    version
}
