//! # Command-Line Interface
//!
//! User-facing CLI commands and output formatting.
//!
//! | Command | Purpose |
//! |---------|---------|
//! | `generate` | Run the pipeline and write the Markdown report |
//! | `versions` | Run version detection only and print the result |
//!
//! All commands support the `--format` flag (`text` or `json`) and a
//! `--verbose` (`-v`) switch for debug output on stderr.
//!
//! Call [`run()`] to parse arguments and execute the appropriate command.

mod app;
mod generate;
mod output;

pub use app::{run, Cli, Commands};
pub use output::{Output, OutputFormat};
