//! Command-line interface components.

use crate::config::ConverterConfig;
use crate::models::{ConversionOutcome, Dialect};
use crate::processor::summary::DistributionSummary;
use clap::Parser;
use colored::*;
use std::path::PathBuf;

#[derive(Parser, Debug, Clone)]
#[command(name = "msems_processor")]
#[command(
    about = "Converts raw, igor-inverted or uav-reader-inverted mSEMS data file to netcdf"
)]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Args {
    /// Path to the data file
    #[arg(long, value_name = "PATH")]
    pub file: PathBuf,

    /// Path to the output directory (defaults to the current directory)
    #[arg(long = "output_dir", visible_alias = "output-dir", value_name = "PATH")]
    pub output_dir: Option<PathBuf>,

    /// Treat the file as raw instrument output regardless of its header
    #[arg(long)]
    pub raw: bool,

    /// Print a per-bin summary instead of writing NetCDF
    #[arg(long)]
    pub inspect: bool,

    /// Refuse to replace an existing output file
    #[arg(long)]
    pub no_clobber: bool,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Only report errors
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}

impl Args {
    /// Log level implied by the verbosity flags
    pub fn get_log_level(&self) -> &'static str {
        if self.quiet {
            "error"
        } else {
            match self.verbose {
                0 => "warn",
                1 => "info",
                2 => "debug",
                _ => "trace",
            }
        }
    }

    /// Build the converter configuration, resolving the output directory
    pub fn to_config(&self, current_dir: PathBuf) -> ConverterConfig {
        ConverterConfig {
            output_dir: self.output_dir.clone().unwrap_or(current_dir),
            force_dialect: self.raw.then_some(Dialect::Raw),
            inspect_only: self.inspect,
            overwrite: !self.no_clobber,
        }
    }
}

/// Line announcing the detected dialect
pub fn file_type_line(dialect: Dialect) -> String {
    format!("{} {}", "File type:".bright_cyan(), dialect.tag())
}

/// Print the detected dialect before extraction starts
pub fn report_file_type(args: &Args, dialect: Dialect) {
    if !args.quiet {
        println!("{}", file_type_line(dialect));
    }
}

/// Print the user-facing result of a conversion
pub fn report(args: &Args, outcome: &ConversionOutcome) {
    if args.quiet {
        return;
    }

    println!(
        "{} {}",
        "Number of Scans:".bright_cyan(),
        outcome.scans.to_string().bright_white().bold()
    );

    if args.inspect {
        print!(
            "{}",
            DistributionSummary::from_distribution(&outcome.distribution)
        );
    }

    if let Some(path) = &outcome.output_path {
        println!("  {} {}", "Output:".bright_cyan(), path.display());
        println!(
            "  {} {} bins, {} metadata entries in {} ms",
            "Wrote".bright_green(),
            outcome.bins,
            outcome.metadata_entries,
            outcome.processing_time_ms
        );
    }

    println!("{}", "Done!".bright_green().bold());
}
