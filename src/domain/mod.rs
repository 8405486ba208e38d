//! Domain models and the transformation pipeline
//!
//! Contains the core pipeline logic without any I/O concerns: field name
//! resolution, version code extraction, row annotation, and the two
//! grouping engines. Everything here is deterministic over its inputs.

mod fields;
mod grouping;
mod row;
mod setup;
mod sort;
mod table;
mod version;

pub use fields::{resolve, FieldNames, FieldSpec, REPORT_TEXT_FIELD};
pub use grouping::{
    build_change_grouping, ChangeGrouping, ComponentChanges, TypeGroup, UNKNOWN_ISSUE_TYPE,
};
pub use row::{annotate_rows, RowSet, TaskRow, NO_DESCRIPTION_LABEL};
pub use setup::{build_setup_grouping, ComponentSetup, SetupEntry, SetupGrouping, UNTITLED_LABEL};
pub use sort::{ComponentOrder, SortOptions, SortPlan};
pub use table::Table;
pub use version::{
    detect_component_versions, detect_global_version, extract, ComponentVersion, PrefixEntry,
    GLOBAL_VERSION_MARKER,
};
