//! relnotes - Release-notes reports from issue-tracker CSV exports
//!
//! Reads a Jira-style CSV export, detects component and global release
//! versions from version codes, groups the rows into an ordered change
//! list and setup-instruction list, and renders a Markdown report.

pub mod cli;
pub mod domain;
pub mod report;
pub mod storage;

pub use domain::{ChangeGrouping, ComponentVersion, SetupGrouping, TaskRow};
