//! # Storage Layer
//!
//! I/O collaborators around the pure pipeline: JSON configuration files
//! and CSV ingestion.
//!
//! | Data | Format | Location |
//! |------|--------|----------|
//! | Main config | JSON | `{config_dir}/config.json` |
//! | Field mapping | JSON | `{config_dir}/fields_mapping.json` |
//! | Issue export | CSV | configured via `input_csv_file` |

mod config;
mod csv;

pub use config::{
    load_config, load_field_mappings, AppConfig, ComponentConfig, ConfigError, SectionTitles,
};
pub use csv::read_csv;
