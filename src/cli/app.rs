//! Main CLI application structure

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use super::generate;
use super::output::{Output, OutputFormat};

#[derive(Parser)]
#[command(name = "relnotes")]
#[command(author, version, about = "Release-notes reports from issue-tracker CSV exports")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format
    #[arg(long, short = 'f', global = true, default_value = "text")]
    pub format: OutputFormat,

    /// Enable verbose output for debugging
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate the release-notes report
    Generate {
        /// Directory holding config.json and fields_mapping.json
        #[arg(long, short = 'c', default_value = "configs")]
        config_dir: PathBuf,

        /// CSV export to read (overrides input_csv_file from the config)
        #[arg(long, short = 'i')]
        input: Option<PathBuf>,

        /// Report file to write (overrides output_report_file from the config)
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },

    /// Detect and print component and global versions without generating
    Versions {
        /// Directory holding config.json and fields_mapping.json
        #[arg(long, short = 'c', default_value = "configs")]
        config_dir: PathBuf,

        /// CSV export to read (overrides input_csv_file from the config)
        #[arg(long, short = 'i')]
        input: Option<PathBuf>,
    },
}

/// Main entry point for the CLI
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let output = Output::new(cli.format, cli.verbose);

    match cli.command {
        Commands::Generate {
            config_dir,
            input,
            output: output_file,
        } => generate::generate(
            &output,
            &config_dir,
            input.as_deref(),
            output_file.as_deref(),
        )?,

        Commands::Versions { config_dir, input } => {
            generate::versions(&output, &config_dir, input.as_deref())?
        }
    }

    Ok(())
}

/// Diagnostics go to stderr so they never mix with report or JSON output.
/// `RUST_LOG` overrides the verbosity chosen by `--verbose`.
fn init_tracing(verbose: bool) {
    let default = if verbose { "relnotes=debug" } else { "relnotes=warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
