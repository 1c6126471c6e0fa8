//! Conversion engine for mSEMS scan files.
//!
//! Runs the three stages for one input file in order: dialect detection,
//! table extraction, and NetCDF writing.

pub mod columns;
pub mod extract;
pub mod summary;
pub mod writer;

#[cfg(test)]
pub mod tests;

use self::extract::extract_table;
use self::writer::{NetCdfWriter, build_distribution};

use crate::config::ConverterConfig;
use crate::error::{MsemsError, Result};
use crate::header::{detect_dialect, scan_header};
use crate::models::{ConversionOutcome, Dialect, Metadata};

use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info};

/// Converter for a single mSEMS file
#[derive(Debug)]
pub struct MsemsConverter {
    config: ConverterConfig,
    writer: NetCdfWriter,
}

impl MsemsConverter {
    /// Create a converter, validating its configuration
    pub fn new(config: ConverterConfig) -> Result<Self> {
        config.validate()?;
        let writer = NetCdfWriter::new(config.output_dir.clone()).with_overwrite(config.overwrite);
        Ok(Self { config, writer })
    }

    pub fn config(&self) -> &ConverterConfig {
        &self.config
    }

    /// Where the output for `file_path` will be written
    pub fn output_path(&self, file_path: &Path) -> PathBuf {
        self.writer.output_path(file_path)
    }

    /// Detect the dialect of a file, honoring a forced dialect
    pub fn detect(&self, file_path: &Path) -> Result<(Dialect, Metadata)> {
        if !file_path.is_file() {
            return Err(MsemsError::FileNotFound {
                path: file_path.to_path_buf(),
            });
        }

        match self.config.force_dialect {
            Some(dialect) => {
                let scan = scan_header(file_path)?;
                if let Some(found) = scan.primary_dialect() {
                    if found != dialect {
                        info!("Header suggests {} but {} was forced", found, dialect);
                    }
                }
                Ok((dialect, scan.metadata))
            }
            None => {
                let detected = detect_dialect(file_path)?;
                Ok((detected.dialect, detected.metadata))
            }
        }
    }

    /// Convert one file: detect, extract, and (unless inspecting) write
    pub fn convert(&self, file_path: &Path) -> Result<ConversionOutcome> {
        let (dialect, metadata) = self.detect(file_path)?;
        self.convert_detected(file_path, dialect, metadata)
    }

    /// Extract and write a file whose dialect is already known
    pub fn convert_detected(
        &self,
        file_path: &Path,
        dialect: Dialect,
        metadata: Metadata,
    ) -> Result<ConversionOutcome> {
        let start_time = Instant::now();
        info!("File type: {}", dialect);

        let table = extract_table(file_path, dialect)?;
        let scans = table.scan_count();
        let bins = table.bin_count();
        let metadata_entries = metadata.len();

        let distribution = build_distribution(table, &metadata, dialect);

        let output_path = if self.config.inspect_only {
            debug!("Inspect mode - skipping NetCDF output");
            None
        } else {
            let path = self.writer.write(&distribution, file_path)?;
            info!("Wrote {}", path.display());
            Some(path)
        };

        Ok(ConversionOutcome {
            dialect,
            output_path,
            scans,
            bins,
            metadata_entries,
            distribution,
            processing_time_ms: start_time.elapsed().as_millis(),
        })
    }
}
