//! Configuration for a single conversion run.
//!
//! Collects the output destination and dialect handling options, and
//! validates them before any file is touched.

use crate::error::{MsemsError, Result};
use crate::models::Dialect;
use std::path::PathBuf;
use tracing::debug;

/// Settings controlling how one input file is converted
#[derive(Debug, Clone, PartialEq)]
pub struct ConverterConfig {
    /// Directory receiving `<base_name>.nc`
    pub output_dir: PathBuf,

    /// Skip header detection and treat the file as this dialect
    pub force_dialect: Option<Dialect>,

    /// Detect and extract only; nothing is written
    pub inspect_only: bool,

    /// Replace an existing output file
    pub overwrite: bool,
}

impl Default for ConverterConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("."),
            force_dialect: None,
            inspect_only: false,
            overwrite: true,
        }
    }
}

impl ConverterConfig {
    /// Config writing into the given directory
    pub fn with_output_dir(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            ..Default::default()
        }
    }

    /// Check the destination before processing starts
    ///
    /// Inspect-only runs never write, so their output directory is not checked.
    pub fn validate(&self) -> Result<()> {
        if self.inspect_only {
            return Ok(());
        }

        if self.output_dir.as_os_str().is_empty() {
            return Err(MsemsError::Configuration {
                message: "output directory must not be empty".to_string(),
            });
        }

        if !self.output_dir.is_dir() {
            return Err(MsemsError::DestinationNotWritable {
                path: self.output_dir.clone(),
                reason: "output directory does not exist".to_string(),
            });
        }

        debug!("Configuration validated: {:?}", self);
        Ok(())
    }
}
